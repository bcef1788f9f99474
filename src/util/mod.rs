//! Utilities shared by the heap model and the collectors.

pub mod address;
pub mod constants;
pub(crate) mod log;
pub mod logger;
pub mod options;
#[cfg(test)]
pub(crate) mod test_util;
pub mod worklist;

pub use self::address::Address;
pub use self::address::ByteSize;
