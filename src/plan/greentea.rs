use super::{Collector, CollectorSelector, Cursor, MarkState, Phase, PointerSet, TracingView};
use crate::heap::{BlockId, Heap, HeapError, Pointer, Root};
use crate::util::log::{debug, trace};
use crate::util::worklist::Queue;

/// The green tea trace: marking works on whole blocks instead of single objects.
///
/// Marking an object does not queue the object. It queues the block the object lives in, unless
/// that block is queued already. Each step then works on the block at the head of the queue:
/// it finds the first marked object in the block that has not been scanned, and follows that
/// object's next field. Once every field of the object has been followed, the object is scanned.
/// Only when the head block has no marked, unscanned object left is it dequeued, and the next
/// block gets its turn.
///
/// Every block remembers where its scan got to, and the next visit to the block picks up from
/// there rather than from the block's first slot. An object that is marked behind that position
/// while the block is away (or while it is being scanned) is found by wrapping around to the
/// start of the block before the block is given up on.
pub struct GreenTea<'a> {
    // Immutable.
    roots: &'a [Root],
    heap: &'a Heap,

    // Mutable.
    roots_processed: usize,
    queue: Queue<BlockId>,
    state: MarkState,
    scanned: PointerSet,
    /// Per block, the slot the scan resumes from.
    scan_positions: Vec<usize>,
    cursor: Cursor,
}

impl<'a> GreenTea<'a> {
    pub fn new(roots: &'a [Root], heap: &'a Heap) -> Result<Self, HeapError> {
        heap.check_roots(roots)?;
        Ok(GreenTea {
            roots,
            heap,
            roots_processed: 0,
            queue: Queue::new(),
            state: MarkState::new(heap),
            scanned: PointerSet::new(),
            scan_positions: vec![0; heap.blocks().len()],
            cursor: Cursor::EMPTY,
        })
    }

    pub fn queue(&self) -> &Queue<BlockId> {
        &self.queue
    }

    pub fn scanned(&self) -> &PointerSet {
        &self.scanned
    }

    pub fn is_scanned(&self, p: Pointer) -> bool {
        self.scanned.contains(p)
    }

    /// The slot the next scan of `block` starts from.
    pub fn scan_position(&self, block: BlockId) -> usize {
        self.scan_positions[block.index()]
    }

    /// Consume a finished collector, returning what it marked.
    ///
    /// # Panics
    /// Panics if the trace has not finished.
    pub fn finish(self) -> PointerSet {
        assert!(
            self.is_done(),
            "GreenTea finished while in phase {}",
            self.phase()
        );
        self.state.into_marked()
    }

    /// Queue the block holding newly marked `p`.
    fn enqueue_block_of(&mut self, p: Pointer) {
        let (block, _) = self
            .heap
            .slot_of(p)
            .unwrap_or_else(|| panic!("Marked {:?} is not resident in any block", p));
        if self.queue.push_unique(block) {
            trace!("Enqueue block {} for {}", block, p);
        }
    }

    /// Find the first marked, unscanned object in `block`, starting at the block's scan position
    /// and wrapping around to its first slot.
    fn next_unscanned(&self, block: BlockId) -> Option<(usize, Pointer)> {
        let slots = &self.heap.block(block).slots;
        let start = self.scan_positions[block.index()].min(slots.len());
        (start..slots.len())
            .chain(0..start)
            .map(|slot| (slot, slots[slot]))
            .find(|&(_, p)| !p.is_sentinel() && self.state.is_marked(p) && !self.is_scanned(p))
    }

    fn process_root(&mut self) {
        let r = self.roots_processed;
        let p = self.roots[r].pointer;
        self.cursor = Cursor::at_root(r);
        if !p.is_nil() && self.state.mark(p) {
            trace!("Root {} ({}): mark {}", r, self.roots[r].name, p);
            self.enqueue_block_of(p);
        } else {
            trace!("Root {} ({}): {} needs no work", r, self.roots[r].name, p);
        }
        self.roots_processed += 1;
        if self.roots_processed == self.roots.len() {
            debug!(
                "GreenTea: all {} roots processed, queue {}",
                self.roots.len(),
                self.queue
            );
        }
    }

    /// Work on the object at `slot` of `block`.
    fn process_object(&mut self, block: BlockId, slot: usize, p: Pointer) {
        self.cursor.object = Some(p);
        if self.state.is_exhausted(self.heap, p) {
            trace!("{} scanned", p);
            self.scanned.insert(p);
            self.scan_positions[block.index()] = slot + 1;
            self.cursor.field = None;
            return;
        }
        self.scan_positions[block.index()] = slot;
        let visit = self.state.visit_next_field(self.heap, p);
        self.cursor.field = Some(visit.field);
        match visit.newly_marked {
            Some(target) => {
                trace!("{}.{}: mark {}", p, visit.field, target);
                self.enqueue_block_of(target);
            }
            None => trace!("{}.{}: nothing new", p, visit.field),
        }
    }
}

impl Collector for GreenTea<'_> {
    fn selector(&self) -> CollectorSelector {
        CollectorSelector::GreenTea
    }

    fn step(&mut self) -> bool {
        if self.roots_processed < self.roots.len() {
            self.process_root();
            return true;
        }
        self.cursor.root = None;
        while let Some(&block) = self.queue.peek() {
            self.cursor.block = Some(block);
            match self.next_unscanned(block) {
                Some((slot, p)) => {
                    self.process_object(block, slot, p);
                    return true;
                }
                None => {
                    self.queue.pop();
                    debug!(
                        "Dequeue block {} ({}), queue {}",
                        block,
                        self.heap.block(block).label(),
                        self.queue
                    );
                    self.cursor.object = None;
                    self.cursor.field = None;
                }
            }
        }
        if !self.cursor.is_empty() {
            debug!("GreenTea: done, {} marked", self.state.marked().len());
        }
        self.cursor.clear();
        false
    }

    fn phase(&self) -> Phase {
        if self.roots_processed < self.roots.len() {
            Phase::Roots
        } else if !self.queue.is_empty() {
            Phase::Heap
        } else {
            Phase::Done
        }
    }

    fn heap(&self) -> &Heap {
        self.heap
    }

    fn roots(&self) -> &[Root] {
        self.roots
    }

    fn roots_processed(&self) -> usize {
        self.roots_processed
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn mark_state(&self) -> &MarkState {
        &self.state
    }

    fn tracing_view(&self) -> TracingView<'_> {
        TracingView::GreenTea {
            queue: &self.queue,
            scanned: &self.scanned,
        }
    }

    fn is_pending(&self, p: Pointer) -> bool {
        self.state.is_marked(p) && !self.is_scanned(p)
    }

    fn is_block_queued(&self, block: BlockId) -> bool {
        self.queue.contains(&block)
    }

    fn reset(&mut self) {
        self.roots_processed = 0;
        self.queue.clear();
        self.state = MarkState::new(self.heap);
        self.scanned = PointerSet::new();
        self.scan_positions.iter_mut().for_each(|s| *s = 0);
        self.cursor.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{blk, field, fixture, obj};

    fn ptr(i: usize) -> Pointer {
        Pointer::new(i)
    }

    fn block(i: usize) -> BlockId {
        BlockId::new(i)
    }

    fn queued(gt: &GreenTea) -> Vec<BlockId> {
        gt.queue().iter().copied().collect()
    }

    #[test]
    fn roots_queue_blocks() {
        let (roots, heap) = fixture::make_heap();
        let mut gt = GreenTea::new(&roots, &heap).unwrap();
        assert!(gt.step());
        assert_eq!(gt.cursor(), Cursor::at_root(0));
        assert_eq!(queued(&gt), vec![block(0)]);
        assert!(gt.step());
        assert_eq!(queued(&gt), vec![block(0), block(2)]);
        assert!(gt.is_block_queued(block(2)));
        assert!(!gt.is_block_queued(block(1)));
        assert!(gt.is_pending(ptr(2)));
    }

    #[test]
    fn head_block_is_drained_first() {
        let (roots, heap) = fixture::make_heap();
        let mut gt = GreenTea::new(&roots, &heap).unwrap();
        gt.step();
        gt.step();

        // Head is block A (0xa000): 2.0 marks 4, which queues block B.
        assert!(gt.step());
        assert_eq!(gt.cursor().block, Some(block(0)));
        assert!(gt.cursor().is_on_field(ptr(2), 0));
        assert_eq!(queued(&gt), vec![block(0), block(2), block(1)]);

        // 2 is scanned, and nothing else in A is marked.
        assert!(gt.step());
        assert!(gt.is_scanned(ptr(2)));
        assert_eq!(gt.scan_position(block(0)), 1);

        // A is dequeued, and block C (0xc000) is worked on in the same step.
        assert!(gt.step());
        assert_eq!(gt.cursor().block, Some(block(2)));
        assert!(gt.cursor().is_on_field(ptr(6), 0));
        assert_eq!(queued(&gt), vec![block(2), block(1)]);
        // 5 is in B, which is queued already.
        assert!(gt.is_marked(ptr(5)));
    }

    #[test]
    fn dependents_deferred_until_block_drained() {
        let (roots, heap) = fixture::make_heap();
        let mut gt = GreenTea::new(&roots, &heap).unwrap();
        let finished = finish_order(&mut gt);
        // 4 and 5 share a block, so both are scanned before any of 4's dependents (7, 12).
        assert_eq!(finished, vec![2, 6, 4, 5, 7, 9, 8, 12, 13]);
    }

    #[test]
    fn scan_position_persists_across_visits() {
        let (roots, heap) = fixture::make_heap();
        let mut gt = GreenTea::new(&roots, &heap).unwrap();
        while gt.step() {
            if gt.is_scanned(ptr(6)) {
                break;
            }
        }
        // 6 lives in slot 2 of block C; C's next visit starts after it.
        assert_eq!(gt.scan_position(block(2)), 3);
    }

    #[test]
    fn mark_behind_scan_position_is_found() {
        // Block A holds [3, 2]. 2 is the root, and points back at 3, which sits behind it.
        let heap = Heap::builder()
            .object(2, obj("T", [field(0, 3)]))
            .object(3, obj("T", [field(0, fixture::NIL)]))
            .block(blk(0xa000, 16, [3, 2]))
            .build()
            .unwrap();
        let roots = vec![Root::new("var x *T", ptr(2))];
        let mut gt = GreenTea::new(&roots, &heap).unwrap();
        gt.run_to_end();
        assert!(gt.is_scanned(ptr(2)));
        assert!(gt.is_scanned(ptr(3)));
        assert_eq!(gt.fields_visited(ptr(3)), 1);
        assert!(gt.queue().is_empty());
    }

    fn finish_order(gt: &mut GreenTea) -> Vec<usize> {
        let mut finished = vec![];
        while gt.step() {
            let c = gt.cursor();
            if let (Some(p), None) = (c.object, c.field) {
                finished.push(p.index());
            }
        }
        finished
    }

    #[test]
    fn revisited_block_resumes_from_scan_position() {
        // Block A holds [3, 2, 4] and block B holds [5]. Only 2 is marked on A's first visit, so
        // A's scan position ends up after 2. 5 then marks 3 (behind it) and 4 (ahead of it).
        let heap = Heap::builder()
            .object(2, obj("T", [field(0, 5)]))
            .object(3, obj("T", [field(0, fixture::NIL)]))
            .object(4, obj("T", [field(0, fixture::NIL)]))
            .object(5, obj("[2]*T", [field(0, 3), field(8, 4)]))
            .block(blk(0xa000, 16, [3, 2, 4]))
            .block(blk(0xb000, 32, [5]))
            .build()
            .unwrap();
        let roots = vec![Root::new("var x *T", ptr(2))];
        let mut gt = GreenTea::new(&roots, &heap).unwrap();
        // On its return A resumes at 4, and only then wraps around to 3.
        assert_eq!(finish_order(&mut gt), vec![2, 5, 4, 3]);
        assert_eq!(gt.scan_position(block(0)), 1);
        assert!(gt.queue().is_empty());
    }

    #[test]
    fn object_without_fields() {
        let heap = Heap::builder()
            .object(2, obj("struct{}", []))
            .block(blk(0xa000, 8, [2]))
            .build()
            .unwrap();
        let roots = vec![Root::new("var e struct{}", ptr(2))];
        let mut gt = GreenTea::new(&roots, &heap).unwrap();
        assert_eq!(gt.run_to_end(), 2);
        assert!(gt.is_scanned(ptr(2)));
    }

    #[test]
    fn reset_starts_over() {
        let (roots, heap) = fixture::make_heap();
        let mut gt = GreenTea::new(&roots, &heap).unwrap();
        let first = gt.run_to_end();
        let marked = gt.marked().clone();
        gt.reset();
        assert_eq!(gt.phase(), Phase::Roots);
        assert!(gt.scanned().is_empty());
        assert_eq!(gt.scan_position(block(0)), 0);
        assert_eq!(gt.run_to_end(), first);
        assert_eq!(gt.finish(), marked);
    }
}
