use std::sync::Arc;

use crate::prelude_internal::*;

/// An exception raised by a getter or a conversion hook.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("thrown: {message}")]
pub struct Thrown {
    pub message: String,
}

impl Thrown {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Accessor invoked on every read of a property.
pub type Getter = Arc<dyn Fn(&Heap) -> Result<Value, Thrown> + Send + Sync>;

/// Custom string conversion of an object.
pub type StringHook = Arc<dyn Fn(&Heap, ObjectId) -> Result<String, Thrown> + Send + Sync>;

/// Custom JSON conversion of an object.
pub type JsonHook =
    Arc<dyn Fn(&Heap, ObjectId) -> Result<serde_json::Value, Thrown> + Send + Sync>;

#[derive(Clone)]
pub enum Slot {
    Data(Value),
    Accessor(Getter),
}

impl core::fmt::Debug for Slot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Slot::Data(value) => f.debug_tuple("Data").field(value).finish(),
            Slot::Accessor(_) => f.write_str("Accessor(<getter>)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Property {
    pub slot: Slot,
    pub enumerable: bool,
}

impl Property {
    pub fn data(value: impl Into<Value>) -> Self {
        Self {
            slot: Slot::Data(value.into()),
            enumerable: true,
        }
    }

    pub fn hidden(value: impl Into<Value>) -> Self {
        Self {
            slot: Slot::Data(value.into()),
            enumerable: false,
        }
    }

    pub fn getter(getter: Getter) -> Self {
        Self {
            slot: Slot::Accessor(getter),
            enumerable: true,
        }
    }
}

/// How an object converts itself to a string.
#[derive(Clone, Default)]
pub enum StringConversion {
    /// The conversion that comes with the object's kind.
    #[default]
    Inherited,
    Custom(StringHook),
    /// The object has no callable conversion at all.
    Missing,
}

impl core::fmt::Debug for StringConversion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StringConversion::Inherited => f.write_str("Inherited"),
            StringConversion::Custom(_) => f.write_str("Custom(<hook>)"),
            StringConversion::Missing => f.write_str("Missing"),
        }
    }
}

/// An ordered sequence of error-like wrappers exposed under one field prefix.
///
/// Elements are [`WrapperId`]s, so the sequence is homogeneous by
/// construction. Coercion of arbitrary values happens one layer up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    prefix: String,
    items: Vec<WrapperId>,
}

impl Collection {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            items: Vec::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn items(&self) -> &[WrapperId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<WrapperId> {
        self.items.get(index).copied()
    }

    pub fn push(&mut self, item: WrapperId) {
        self.items.push(item);
    }

    pub fn insert(&mut self, index: usize, item: WrapperId) -> Result<(), CollectionError> {
        if index > self.items.len() {
            return Err(CollectionError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, item);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<WrapperId, CollectionError> {
        if index >= self.items.len() {
            return Err(CollectionError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn pop(&mut self) -> Option<WrapperId> {
        self.items.pop()
    }

    /// Removes `delete_count` items starting at `start` and inserts `items` in
    /// their place. Both bounds are clamped to the current length.
    pub fn splice(
        &mut self,
        start: usize,
        delete_count: usize,
        items: impl IntoIterator<Item = WrapperId>,
    ) -> Vec<WrapperId> {
        let start = start.min(self.items.len());
        let end = start.saturating_add(delete_count).min(self.items.len());
        self.items.splice(start..end, items).collect()
    }
}

impl Extend<WrapperId> for Collection {
    fn extend<T: IntoIterator<Item = WrapperId>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    #[error("index {index} out of bounds for collection of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("object {0:?} is not an error collection")]
    NotACollection(ObjectId),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ObjectKind {
    #[default]
    Plain,
    Array,
    NativeError,
    /// Carries the error-like marker. Only [`Heap::alloc_error_like`] creates it.
    ErrorLike,
    /// An error instance that owns its error-like detail.
    ErrorBase { detail: WrapperId },
    Collection(Collection),
}

#[derive(Debug, Clone, Default)]
pub struct Object {
    kind: ObjectKind,
    pub properties: PropertyMap,
    pub to_string: StringConversion,
    pub to_json: Option<JsonHookSlot>,
}

/// Wrapper so that [`Object`] can derive `Debug`.
#[derive(Clone)]
pub struct JsonHookSlot(pub JsonHook);

impl core::fmt::Debug for JsonHookSlot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("JsonHook(<hook>)")
    }
}

impl Object {
    pub(crate) fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ObjectKind {
        &mut self.kind
    }

    pub fn is_error_like(&self) -> bool {
        matches!(self.kind, ObjectKind::ErrorLike)
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match &self.kind {
            ObjectKind::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Own property, any enumerability. Does not invoke getters.
    pub fn has_own(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Enumerable own keys in insertion order.
    pub fn enumerable_keys(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|(_, prop)| prop.enumerable)
            .map(|(key, _)| key.as_str())
    }
}
