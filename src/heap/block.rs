use std::fmt;

use super::Pointer;
use crate::util::address::{Address, ByteSize};
use crate::util::constants::LOG_BYTES_IN_BLOCK_LABEL;

/// Identifies a block by its position in the heap's block sequence.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, Hash, PartialOrd, Ord, PartialEq, Debug)]
pub struct BlockId(usize);

impl BlockId {
    pub const fn new(index: usize) -> BlockId {
        BlockId(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A region of memory carved into equally sized slots. Each slot holds an object, or
/// [`Pointer::FREE`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub address: Address,
    /// Size of every slot in bytes.
    pub elem_size: ByteSize,
    pub slots: Vec<Pointer>,
}

impl Block {
    pub fn new(address: Address, elem_size: ByteSize, slots: Vec<Pointer>) -> Block {
        Block {
            address,
            elem_size,
            slots,
        }
    }

    /// The address of a slot.
    pub fn slot_address(&self, slot: usize) -> Address {
        debug_assert!(slot < self.slots.len());
        self.address.nth(self.elem_size, slot)
    }

    /// The slot holding `p`, if it lives here.
    pub fn slot_of(&self, p: Pointer) -> Option<usize> {
        self.slots.iter().position(|&s| s == p)
    }

    /// Resident objects with their slot index.
    pub fn objects(&self) -> impl Iterator<Item = (usize, Pointer)> + '_ {
        self.slots
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, p)| !p.is_sentinel())
    }

    /// Short name used in frames and logs: the address without its low bits.
    pub fn label(&self) -> String {
        format!("{:X}", self.address >> LOG_BYTES_IN_BLOCK_LABEL)
    }
}

/// Shorthand for [`Block::new`], for writing fixtures.
pub fn blk<const N: usize>(address: u64, elem_size: ByteSize, slots: [usize; N]) -> Block {
    Block::new(
        Address::from_raw(address),
        elem_size,
        slots.iter().map(|&s| Pointer::new(s)).collect(),
    )
}
