//! The heap model: objects with pointer fields, resident in fixed-stride blocks, reached from
//! named roots.

mod block;
mod error;
pub mod fixture;
#[allow(clippy::module_inception)]
mod heap;
mod object;
mod pointer;
mod root;

pub use self::block::{blk, Block, BlockId};
pub use self::error::HeapError;
pub use self::heap::{Heap, HeapBuilder, Location};
pub use self::object::{field, obj, Field, Object};
pub use self::pointer::Pointer;
pub use self::root::Root;
