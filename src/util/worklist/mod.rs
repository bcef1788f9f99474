//! Work lists used by the collectors: a FIFO [`Queue`] for green tea's pending blocks and a
//! LIFO [`Stack`] for mark-sweep's pending objects.

pub use self::queue::Queue;
pub use self::stack::Stack;

mod queue;
mod stack;
