use super::Pointer;

/// A named pointer held outside the heap, such as a global variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Root {
    pub name: String,
    pub pointer: Pointer,
}

impl Root {
    pub fn new(name: impl Into<String>, pointer: Pointer) -> Root {
        Root {
            name: name.into(),
            pointer,
        }
    }
}
