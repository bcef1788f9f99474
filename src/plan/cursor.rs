use std::fmt;

use crate::heap::{BlockId, Pointer};

/// What a collector is looking at right now. Each part is unset when it does not apply.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Index of the root being processed.
    pub root: Option<usize>,
    /// The block at the head of green tea's queue.
    pub block: Option<BlockId>,
    pub object: Option<Pointer>,
    /// Index of the field of `object` being followed.
    pub field: Option<usize>,
}

impl Cursor {
    pub const EMPTY: Cursor = Cursor {
        root: None,
        block: None,
        object: None,
        field: None,
    };

    pub const fn at_root(root: usize) -> Cursor {
        Cursor {
            root: Some(root),
            block: None,
            object: None,
            field: None,
        }
    }

    pub fn clear(&mut self) {
        *self = Cursor::EMPTY;
    }

    pub fn is_empty(&self) -> bool {
        *self == Cursor::EMPTY
    }

    /// Is the cursor on field `field` of `object`?
    pub fn is_on_field(&self, object: Pointer, field: usize) -> bool {
        self.object == Some(object) && self.field == Some(field)
    }
}

fn write_part<T: fmt::Display>(f: &mut fmt::Formatter, name: &str, v: Option<T>) -> fmt::Result {
    match v {
        Some(v) => write!(f, "{}={}", name, v),
        None => write!(f, "{}=-", name),
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_part(f, "root", self.root)?;
        f.write_str(" ")?;
        write_part(f, "block", self.block)?;
        f.write_str(" ")?;
        write_part(f, "object", self.object)?;
        f.write_str(" ")?;
        write_part(f, "field", self.field)
    }
}
