use std::fmt;

/// A handle into the heap's object table.
///
/// Two values are reserved: [`Pointer::NIL`] points to nothing, and [`Pointer::FREE`] occupies
/// a block slot that holds no object. Every other value names exactly one object.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, Hash, PartialOrd, Ord, PartialEq)]
pub struct Pointer(usize);

impl Pointer {
    /// Points to nothing.
    pub const NIL: Pointer = Pointer(0);
    /// A reclaimed or never used block slot.
    pub const FREE: Pointer = Pointer(1);
    /// The first handle that can name an object.
    pub const FIRST_OBJECT: Pointer = Pointer(2);

    pub const fn new(index: usize) -> Pointer {
        Pointer(index)
    }

    /// The index into the object table.
    pub const fn index(self) -> usize {
        self.0
    }

    pub const fn is_nil(self) -> bool {
        self.0 == Self::NIL.0
    }

    pub const fn is_free(self) -> bool {
        self.0 == Self::FREE.0
    }

    /// Is this either of the two sentinels?
    pub const fn is_sentinel(self) -> bool {
        self.0 < Self::FIRST_OBJECT.0
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Pointer::NIL => write!(f, "nil"),
            Pointer::FREE => write!(f, "free"),
            Pointer(i) => write!(f, "{}", i),
        }
    }
}

impl fmt::Debug for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Pointer::NIL => write!(f, "Pointer(nil)"),
            Pointer::FREE => write!(f, "Pointer(free)"),
            Pointer(i) => write!(f, "Pointer({})", i),
        }
    }
}
