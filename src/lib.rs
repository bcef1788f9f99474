//! A step-by-step model of two tracing garbage collectors over a small simulated heap.
//!
//! A [`Heap`](heap::Heap) is a table of objects with pointer fields, placed into fixed-size
//! slots of blocks. Starting from a set of [`Root`](heap::Root)s, a collector marks every object
//! reachable from the roots, one step at a time, and a sweep then frees the slots of everything
//! left unmarked. Every step leaves the collector in a state that can be captured as a
//! [`Snapshot`](plan::Snapshot) and drawn as one frame.
//!
//! Two collectors are provided:
//! * [`MarkSweep`](plan::MarkSweep): depth first over single objects with a mark stack.
//! * [`GreenTea`](plan::GreenTea): breadth first over blocks with a block queue. Marking an object
//!   queues its block, and a block is scanned as a whole when it reaches the head of the queue.
//!
//! Both mark the same objects for the same heap and roots, in different orders.
//!
//! ```ignore
//! let (roots, mut heap) = greentea::heap::fixture::make_heap();
//! let trace = Simulation::new(Options::default()).run(&roots, &mut heap)?;
//! for frame in &trace.snapshots {
//!     println!("{}", frame);
//! }
//! ```
//!
//! Logging goes through the `log` crate. With the default `builtin_env_logger` feature, call
//! [`util::logger::try_init`] and set `RUST_LOG` to see it.

pub mod heap;
pub mod plan;
pub mod simulation;
pub mod util;

pub use crate::heap::{Heap, HeapBuilder, HeapError, Pointer, Root};
pub use crate::plan::{create_collector, Collector, CollectorSelector, Snapshot};
pub use crate::simulation::{Simulation, Trace};
pub use crate::util::options::Options;
