#![doc = include_str!("../README.md")]

/// Primitive and reference values.
pub mod value;

/// Objects, properties and conversion hooks.
pub mod object;

/// Insertion-ordered own-property storage.
pub mod map;

/// Arena holding a value graph.
pub mod heap;

pub use heap::{Heap, ObjectId, ObjectMut, WrapperId};
pub use map::PropertyMap;
pub use object::{
    Collection, CollectionError, JsonHookSlot, Object, ObjectKind, Property, Slot,
    StringConversion, Thrown,
};
pub use value::{Value, ValueKind};

pub(crate) mod prelude_internal {
    #![allow(unused_imports)]
    pub use crate::heap::{Heap, ObjectId, ObjectMut, WrapperId};
    pub use crate::map::PropertyMap;
    pub use crate::object::{
        Collection, CollectionError, JsonHookSlot, Object, ObjectKind, Property, Slot,
        StringConversion, Thrown,
    };
    pub use crate::value::Value;
    pub use thisisplural::Plural;
}
