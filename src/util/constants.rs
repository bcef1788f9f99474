/// log2 of the number of bytes in a pointer field
pub const LOG_BYTES_IN_POINTER: u8 = 3;
/// The number of bytes in a pointer field. Field offsets are multiples of this.
pub const BYTES_IN_POINTER: usize = 1 << LOG_BYTES_IN_POINTER;

/// The largest handle an object may be defined at. The object table is sized by the largest
/// handle in use, so this bounds its length.
pub const MAX_OBJECT_HANDLE: usize = (1 << 20) - 1;

/// log2 of the number of bytes a block label drops from its address
pub const LOG_BYTES_IN_BLOCK_LABEL: usize = 12;

/// The default cap on the number of steps one simulation run may take.
/// A well formed heap finishes within roots + objects + fields steps, so this is only
/// reached by a logic defect.
pub const DEFAULT_STEP_LIMIT: usize = 10_000;
