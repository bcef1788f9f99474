//! The heap the frames are drawn from.
//!
//! Objects are of type `T` (one pointer field) and `[4]*T` (four pointer fields), spread over
//! four blocks. Two globals are the roots:
//!
//! ```text
//! var x *T -> 2 -> 4 -> 7
//!                     -> 12 -> 13 -> 5
//! var y *T -> 6 -> 5 -> 9
//!                    -> 8
//! ```
//!
//! Object 10 is garbage pointing at more garbage (3). Object 11 is garbage pointing into the
//! live graph (13 and 12).

use super::{blk, field, obj, Heap, Pointer, Root};

/// Raw handle of [`Pointer::NIL`], for fixture tables.
pub const NIL: usize = Pointer::NIL.index();
/// Raw handle of [`Pointer::FREE`], for fixture tables.
pub const FREE: usize = Pointer::FREE.index();

/// Handles a full trace of [`make_heap`] marks.
pub const LIVE: [usize; 9] = [2, 4, 5, 6, 7, 8, 9, 12, 13];
/// Handles a full trace of [`make_heap`] leaves unmarked, and a sweep frees.
pub const DEAD: [usize; 3] = [3, 10, 11];

/// The roots and heap shown in the frames.
pub fn make_heap() -> (Vec<Root>, Heap) {
    let roots = vec![
        Root::new("var x *T", Pointer::new(2)),
        Root::new("var y *T", Pointer::new(6)),
    ];
    let heap = Heap::builder()
        .object(2, obj("T", [field(0, 4)]))
        .object(3, obj("T", [field(0, NIL)]))
        .object(
            4,
            obj(
                "[4]*T",
                [field(0, NIL), field(8, NIL), field(16, 7), field(24, 12)],
            ),
        )
        .object(
            5,
            obj(
                "[4]*T",
                [field(0, NIL), field(8, 9), field(16, 8), field(24, NIL)],
            ),
        )
        .object(6, obj("T", [field(0, 5)]))
        .object(7, obj("T", [field(0, NIL)]))
        .object(8, obj("T", [field(0, NIL)]))
        .object(9, obj("T", [field(0, NIL)]))
        .object(
            10,
            obj(
                "[4]*T",
                [field(0, NIL), field(8, NIL), field(16, NIL), field(24, 3)],
            ),
        )
        .object(
            11,
            obj(
                "[4]*T",
                [field(0, NIL), field(8, NIL), field(16, 13), field(24, 12)],
            ),
        )
        .object(12, obj("T", [field(0, 13)]))
        .object(13, obj("T", [field(0, 5)]))
        .block(blk(0xa000, 16, [2, 7, FREE, FREE, 9, 8, 12]))
        .block(blk(0xb000, 32, [FREE, 4, 5, FREE]))
        .block(blk(0xc000, 16, [FREE, FREE, 6, 3, 13, FREE, FREE]))
        .block(blk(0xd000, 32, [FREE, 10, FREE, 11]))
        .build()
        .unwrap_or_else(|e| panic!("The built-in fixture is malformed: {}", e));
    (roots, heap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_is_well_formed() {
        let (roots, heap) = make_heap();
        assert!(heap.check_roots(&roots).is_ok());
        assert_eq!(heap.blocks().len(), 4);
        assert_eq!(heap.object_count(), LIVE.len() + DEAD.len());
        assert_eq!(heap.total_fields(), 24);
    }
}
