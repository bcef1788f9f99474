use std::fmt;

use itertools::Itertools;

use super::{Collector, CollectorSelector, Cursor, Phase, PointerSet, TracingView};
use crate::heap::{BlockId, Pointer};

/// What only one of the collectors has to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotDetail {
    MarkSweep {
        /// Bottom to top.
        stack: Vec<Pointer>,
    },
    GreenTea {
        /// Head first.
        queue: Vec<BlockId>,
        scanned: PointerSet,
    },
}

/// An owned copy of everything a collector shows at one point in its run: one frame.
///
/// The heap and roots are not copied, since they do not change while a collector runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Position in the run. The initial snapshot is 0.
    pub index: usize,
    pub selector: CollectorSelector,
    pub phase: Phase,
    pub roots_processed: usize,
    pub cursor: Cursor,
    pub marked: PointerSet,
    /// Objects with at least one visited field, in handle order.
    pub fields_visited: Vec<(Pointer, usize)>,
    pub detail: SnapshotDetail,
}

impl Snapshot {
    pub fn capture(index: usize, collector: &dyn Collector) -> Snapshot {
        let detail = match collector.tracing_view() {
            TracingView::MarkSweep { stack } => SnapshotDetail::MarkSweep {
                stack: stack.iter().copied().collect(),
            },
            TracingView::GreenTea { queue, scanned } => SnapshotDetail::GreenTea {
                queue: queue.iter().copied().collect(),
                scanned: scanned.clone(),
            },
        };
        Snapshot {
            index,
            selector: collector.selector(),
            phase: collector.phase(),
            roots_processed: collector.roots_processed(),
            cursor: collector.cursor(),
            marked: collector.marked().clone(),
            fields_visited: collector.mark_state().visited_counts().collect(),
            detail,
        }
    }

    pub fn fields_visited(&self, p: Pointer) -> usize {
        self.fields_visited
            .iter()
            .find(|(q, _)| *q == p)
            .map_or(0, |&(_, n)| n)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {} marked={}",
            self.index, self.selector, self.phase, self.cursor, self.marked
        )?;
        match &self.detail {
            SnapshotDetail::MarkSweep { stack } => {
                write!(f, " stack=[{}>", stack.iter().join(" "))
            }
            SnapshotDetail::GreenTea { queue, scanned } => {
                write!(f, " queue=[{}] scanned={}", queue.iter().join(" "), scanned)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::fixture;
    use crate::plan::{GreenTea, MarkSweep};

    #[test]
    fn capture_mark_sweep() {
        let (roots, heap) = fixture::make_heap();
        let mut ms = MarkSweep::new(&roots, &heap).unwrap();
        for _ in 0..3 {
            ms.step();
        }
        let snap = Snapshot::capture(3, &ms);
        assert_eq!(snap.phase, Phase::Heap);
        assert_eq!(snap.roots_processed, 2);
        assert_eq!(snap.fields_visited, vec![(Pointer::new(6), 1)]);
        assert_eq!(snap.fields_visited(Pointer::new(6)), 1);
        assert_eq!(snap.fields_visited(Pointer::new(2)), 0);
        assert_eq!(
            snap.detail,
            SnapshotDetail::MarkSweep {
                stack: vec![Pointer::new(2), Pointer::new(6), Pointer::new(5)],
            }
        );
        assert_eq!(
            snap.to_string(),
            "#3 MarkSweep Heap root=- block=- object=6 field=0 marked={2 5 6} stack=[2 6 5>"
        );
    }

    #[test]
    fn capture_green_tea() {
        let (roots, heap) = fixture::make_heap();
        let mut gt = GreenTea::new(&roots, &heap).unwrap();
        let initial = Snapshot::capture(0, &gt);
        assert_eq!(initial.phase, Phase::Roots);
        assert!(initial.cursor.is_empty());

        for _ in 0..4 {
            gt.step();
        }
        let snap = Snapshot::capture(4, &gt);
        match &snap.detail {
            SnapshotDetail::GreenTea { queue, scanned } => {
                assert_eq!(queue, &[BlockId::new(0), BlockId::new(2), BlockId::new(1)]);
                assert!(scanned.contains(Pointer::new(2)));
            }
            other => panic!("Unexpected detail {:?}", other),
        }
        assert_eq!(
            snap.to_string(),
            "#4 GreenTea Heap root=- block=#0 object=2 field=- marked={2 4 6} queue=[#0 #2 #1] scanned={2}"
        );
    }

    #[test]
    fn snapshot_is_independent_of_collector() {
        let (roots, heap) = fixture::make_heap();
        let mut ms = MarkSweep::new(&roots, &heap).unwrap();
        let before = Snapshot::capture(0, &ms);
        ms.run_to_end();
        assert!(before.marked.is_empty());
        assert_ne!(Snapshot::capture(1, &ms).marked, before.marked);
    }
}
