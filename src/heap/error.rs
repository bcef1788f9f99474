use std::fmt;

use super::{BlockId, Pointer};
use crate::util::address::ByteSize;

/// A malformed heap or root set, reported when the fixture is built.
///
/// None of these can be recovered from: they mean the fixture itself is wrong.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeapError {
    /// An object was defined at the nil or free handle.
    SentinelObject { pointer: Pointer },
    /// An object was defined at a handle too large for the object table.
    HandleOutOfRange { pointer: Pointer, limit: usize },
    /// Two objects were defined at the same handle.
    DuplicateObject { pointer: Pointer },
    /// A block's element size is zero or not a whole number of pointer words.
    InvalidStride { block: BlockId, elem_size: ByteSize },
    /// A block slot holds nil. Empty slots hold free.
    NilSlot { block: BlockId, slot: usize },
    /// A block slot refers to a handle with no object.
    UnknownSlot {
        block: BlockId,
        slot: usize,
        pointer: Pointer,
    },
    /// An object is resident in more than one slot.
    DuplicateSlot {
        pointer: Pointer,
        first: (BlockId, usize),
        second: (BlockId, usize),
    },
    /// An object is not resident in any block.
    Unplaced { pointer: Pointer },
    /// A field offset is not pointer aligned, or runs past the end of its slot.
    MisalignedField {
        owner: Pointer,
        field: usize,
        offset: ByteSize,
        elem_size: ByteSize,
    },
    /// A field points to free, or to a handle with no resident object.
    DanglingField {
        owner: Pointer,
        field: usize,
        target: Pointer,
    },
    /// A root points to free, or to a handle with no resident object.
    UnknownRoot { root: usize, pointer: Pointer },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HeapError::SentinelObject { pointer } => {
                write!(f, "object defined at reserved handle {}", pointer)
            }
            HeapError::HandleOutOfRange { pointer, limit } => write!(
                f,
                "object defined at handle {}, past the largest handle {}",
                pointer, limit
            ),
            HeapError::DuplicateObject { pointer } => {
                write!(f, "object {} is defined more than once", pointer)
            }
            HeapError::InvalidStride { block, elem_size } => write!(
                f,
                "block {} has element size {}, which is not a positive multiple of the pointer size",
                block, elem_size
            ),
            HeapError::NilSlot { block, slot } => {
                write!(f, "block {} slot {} holds nil", block, slot)
            }
            HeapError::UnknownSlot {
                block,
                slot,
                pointer,
            } => write!(
                f,
                "block {} slot {} holds {}, which has no object",
                block, slot, pointer
            ),
            HeapError::DuplicateSlot {
                pointer,
                first,
                second,
            } => write!(
                f,
                "object {} is resident in block {} slot {} and in block {} slot {}",
                pointer, first.0, first.1, second.0, second.1
            ),
            HeapError::Unplaced { pointer } => {
                write!(f, "object {} is not resident in any block", pointer)
            }
            HeapError::MisalignedField {
                owner,
                field,
                offset,
                elem_size,
            } => write!(
                f,
                "field {} of object {} has offset {}, which does not fit a pointer slot of a {} byte element",
                field, owner, offset, elem_size
            ),
            HeapError::DanglingField {
                owner,
                field,
                target,
            } => write!(
                f,
                "field {} of object {} points to {}, which is not a resident object",
                field, owner, target
            ),
            HeapError::UnknownRoot { root, pointer } => write!(
                f,
                "root {} points to {}, which is not a resident object",
                root, pointer
            ),
        }
    }
}

impl std::error::Error for HeapError {}
