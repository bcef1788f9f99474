use super::{Collector, CollectorSelector, Cursor, MarkState, Phase, PointerSet, TracingView};
use crate::heap::{BlockId, Heap, HeapError, Pointer, Root};
use crate::util::log::{debug, trace};
use crate::util::worklist::Stack;

/// A classic mark-sweep trace, depth first with an explicit mark stack.
///
/// Each root is a step: a non-nil, unmarked root is marked and pushed. Then, while the stack is
/// not empty, each step looks at the top object without popping it. If all of its fields have
/// been followed it is popped. Otherwise its next field is followed, and a target that is not
/// nil and not yet marked is marked and pushed, so it is the next object looked at.
pub struct MarkSweep<'a> {
    // Immutable.
    roots: &'a [Root],
    heap: &'a Heap,

    // Mutable.
    roots_processed: usize,
    stack: Stack<Pointer>,
    state: MarkState,
    cursor: Cursor,
}

impl<'a> MarkSweep<'a> {
    pub fn new(roots: &'a [Root], heap: &'a Heap) -> Result<Self, HeapError> {
        heap.check_roots(roots)?;
        Ok(MarkSweep {
            roots,
            heap,
            roots_processed: 0,
            stack: Stack::new(),
            state: MarkState::new(heap),
            cursor: Cursor::EMPTY,
        })
    }

    pub fn stack(&self) -> &Stack<Pointer> {
        &self.stack
    }

    /// Consume a finished collector, returning what it marked.
    ///
    /// # Panics
    /// Panics if the trace has not finished.
    pub fn finish(self) -> PointerSet {
        assert!(
            self.is_done(),
            "MarkSweep finished while in phase {}",
            self.phase()
        );
        self.state.into_marked()
    }

    fn process_root(&mut self) {
        let r = self.roots_processed;
        let p = self.roots[r].pointer;
        self.cursor = Cursor::at_root(r);
        if !p.is_nil() && self.state.mark(p) {
            trace!("Root {} ({}): mark and push {}", r, self.roots[r].name, p);
            self.stack.push(p);
        } else {
            trace!("Root {} ({}): {} needs no work", r, self.roots[r].name, p);
        }
        self.roots_processed += 1;
        if self.roots_processed == self.roots.len() {
            debug!(
                "MarkSweep: all {} roots processed, {} on the stack",
                self.roots.len(),
                self.stack.len()
            );
        }
    }

    fn process_top(&mut self, p: Pointer) {
        self.cursor.root = None;
        self.cursor.object = Some(p);
        if self.state.is_exhausted(self.heap, p) {
            trace!("Pop {}: all fields visited", p);
            self.stack.pop();
            self.cursor.field = None;
            return;
        }
        let visit = self.state.visit_next_field(self.heap, p);
        self.cursor.field = Some(visit.field);
        match visit.newly_marked {
            Some(target) => {
                trace!("{}.{}: mark and push {}", p, visit.field, target);
                self.stack.push(target);
            }
            None => trace!("{}.{}: nothing new", p, visit.field),
        }
    }
}

impl Collector for MarkSweep<'_> {
    fn selector(&self) -> CollectorSelector {
        CollectorSelector::MarkSweep
    }

    fn step(&mut self) -> bool {
        if self.roots_processed < self.roots.len() {
            self.process_root();
            return true;
        }
        match self.stack.peek().copied() {
            Some(p) => {
                self.process_top(p);
                true
            }
            None => {
                if !self.cursor.is_empty() {
                    debug!("MarkSweep: done, {} marked", self.state.marked().len());
                }
                self.cursor.clear();
                false
            }
        }
    }

    fn phase(&self) -> Phase {
        if self.roots_processed < self.roots.len() {
            Phase::Roots
        } else if !self.stack.is_empty() {
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
        TracingView::MarkSweep { stack: &self.stack }
    }

    fn is_pending(&self, p: Pointer) -> bool {
        self.stack.contains(&p)
    }

    fn is_block_queued(&self, _block: BlockId) -> bool {
        false
    }

    fn reset(&mut self) {
        self.roots_processed = 0;
        self.stack.clear();
        self.state = MarkState::new(self.heap);
        self.cursor.clear();
    }
}
