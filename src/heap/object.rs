use super::Pointer;
use crate::util::address::ByteSize;

/// A pointer field: where it sits in its object, and what it points to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    /// Byte offset from the start of the object.
    pub offset: ByteSize,
    pub pointer: Pointer,
}

impl Field {
    pub const fn new(offset: ByteSize, pointer: Pointer) -> Field {
        Field { offset, pointer }
    }
}

/// A typed node in the object graph. Only pointer fields are modelled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    /// The source-level type, e.g. `T` or `[4]*T`. Shown above the object in a frame.
    pub type_name: String,
    /// Pointer fields in declaration order.
    pub fields: Vec<Field>,
}

impl Object {
    pub fn new(type_name: impl Into<String>, fields: Vec<Field>) -> Object {
        Object {
            type_name: type_name.into(),
            fields,
        }
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Iterate over the targets of the fields that point somewhere.
    pub fn children(&self) -> impl Iterator<Item = Pointer> + '_ {
        self.fields
            .iter()
            .map(|f| f.pointer)
            .filter(|p| !p.is_nil())
    }

    /// Point every field at nil.
    pub(crate) fn clear_fields(&mut self) {
        for f in self.fields.iter_mut() {
            f.pointer = Pointer::NIL;
        }
    }
}

/// Shorthand for [`Object::new`], for writing fixtures.
pub fn obj<const N: usize>(type_name: &str, fields: [Field; N]) -> Object {
    Object::new(type_name, fields.to_vec())
}

/// Shorthand for [`Field::new`] taking a raw object table index, for writing fixtures.
pub fn field(offset: ByteSize, target: usize) -> Field {
    Field::new(offset, Pointer::new(target))
}
