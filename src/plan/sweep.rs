use super::PointerSet;
use crate::heap::Heap;
use crate::util::log::{debug, info};

/// What a sweep found.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Objects left in place.
    pub live: usize,
    /// Slots freed.
    pub reclaimed: usize,
}

/// Free every slot holding an object outside `marked`.
///
/// A freed slot becomes [`Pointer::FREE`](crate::heap::Pointer::FREE), and the object that lived
/// there loses its block location and has every field set to nil. Marked objects are untouched,
/// so sweeping twice with the same set frees nothing the second time.
pub fn sweep(heap: &mut Heap, marked: &PointerSet) -> SweepStats {
    let mut stats = SweepStats::default();
    for block in heap.block_ids().collect::<Vec<_>>() {
        let dead: Vec<usize> = heap
            .block(block)
            .objects()
            .filter(|&(_, p)| !marked.contains(p))
            .map(|(slot, _)| slot)
            .collect();
        stats.live += heap.block(block).objects().count() - dead.len();
        for slot in dead {
            if let Some(p) = heap.reclaim(block, slot) {
                debug!("Sweep: free {} from block {} slot {}", p, block, slot);
                stats.reclaimed += 1;
            }
        }
    }
    info!("Sweep: {} live, {} reclaimed", stats.live, stats.reclaimed);
    stats
}
