//! Collectors, as step machines over a borrowed heap.
//!
//! A collector is driven by calling [`Collector::step`] until it returns `false`. Every call makes
//! exactly one unit of progress (a root processed, a field followed, an object finished), and
//! leaves the collector in a state worth drawing. Once the trace is done, [`sweep`] frees what
//! was not marked.
//!
//! Both collectors mark the same objects for the same heap. They differ in the order they get
//! there: [`MarkSweep`] follows pointers depth first, one object at a time, while [`GreenTea`]
//! works through whole blocks, scanning every marked object in a block before moving on.

mod cursor;
mod greentea;
mod mark_state;
mod marksweep;
mod snapshot;
mod sweep;

pub use self::cursor::Cursor;
pub use self::greentea::GreenTea;
pub use self::mark_state::{FieldVisit, MarkState, PointerSet};
pub use self::marksweep::MarkSweep;
pub use self::snapshot::{Snapshot, SnapshotDetail};
pub use self::sweep::{sweep, SweepStats};

use enum_map::Enum;
use strum_macros::{Display, EnumIter, EnumString};

use crate::heap::{BlockId, Heap, HeapError, Pointer, Root};
use crate::util::worklist::{Queue, Stack};

/// Selects a collector, e.g. from the `GREENTEA_COLLECTOR` environment variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Enum, EnumString, EnumIter, Display)]
#[strum(ascii_case_insensitive)]
pub enum CollectorSelector {
    MarkSweep,
    GreenTea,
}

/// Where a collector is in its run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Enum, EnumIter, Display)]
pub enum Phase {
    /// Roots remain to be processed.
    Roots,
    /// All roots are processed, and some marked object still has fields to follow.
    Heap,
    /// Nothing left to do.
    Done,
}

/// The collector-specific part of what a frame shows.
///
/// A renderer matches on this rather than asking a collector what it can do.
#[derive(Copy, Clone, Debug)]
pub enum TracingView<'a> {
    MarkSweep {
        /// Objects waiting to be finished, bottom to top.
        stack: &'a Stack<Pointer>,
    },
    GreenTea {
        /// Blocks waiting to be scanned, head first.
        queue: &'a Queue<BlockId>,
        /// Objects whose fields have all been followed.
        scanned: &'a PointerSet,
    },
}

/// A tracing collector, driven one step at a time.
///
/// A collector borrows its roots and heap for as long as it lives, so nothing can change the heap
/// mid-trace, and the sweeper cannot run until the collector is gone.
pub trait Collector {
    fn selector(&self) -> CollectorSelector;

    /// Make one unit of progress. Returns `false`, and clears the cursor, once there is nothing
    /// left to do.
    fn step(&mut self) -> bool;

    fn phase(&self) -> Phase;

    fn heap(&self) -> &Heap;

    fn roots(&self) -> &[Root];

    /// How many roots have been processed so far.
    fn roots_processed(&self) -> usize;

    fn cursor(&self) -> Cursor;

    fn mark_state(&self) -> &MarkState;

    fn tracing_view(&self) -> TracingView<'_>;

    /// Is `p` marked but still has fields to follow: on the mark stack, or marked but not yet
    /// scanned?
    fn is_pending(&self, p: Pointer) -> bool;

    fn is_block_queued(&self, block: BlockId) -> bool;

    /// Throw away all progress, as if newly constructed over the same roots and heap.
    fn reset(&mut self);

    fn marked(&self) -> &PointerSet {
        self.mark_state().marked()
    }

    fn is_marked(&self, p: Pointer) -> bool {
        self.mark_state().is_marked(p)
    }

    fn fields_visited(&self, p: Pointer) -> usize {
        self.mark_state().fields_visited(p)
    }

    fn is_done(&self) -> bool {
        self.phase() == Phase::Done
    }

    /// Step until done. Returns the number of steps that made progress.
    fn run_to_end(&mut self) -> usize {
        let mut steps = 0;
        while self.step() {
            steps += 1;
        }
        steps
    }
}

/// Create the selected collector over `roots` and `heap`.
pub fn create_collector<'a>(
    selector: CollectorSelector,
    roots: &'a [Root],
    heap: &'a Heap,
) -> Result<Box<dyn Collector + 'a>, HeapError> {
    Ok(match selector {
        CollectorSelector::MarkSweep => Box::new(MarkSweep::new(roots, heap)?),
        CollectorSelector::GreenTea => Box::new(GreenTea::new(roots, heap)?),
    })
}
