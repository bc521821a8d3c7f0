use errorlike_value::{Collection, CollectionError, Heap, ObjectId, Value, WrapperId};

use crate::config::Config;
use crate::wrapper::ensure_error_like_with_config;

/// Handle to an error collection living in a [`Heap`].
///
/// Every mutator coerces its input through [`ensure_error_like`] with the
/// handle's [`Config`], so the collection only ever holds wrappers. There is
/// no way to store a raw value at an index.
///
/// [`ensure_error_like`]: crate::ensure_error_like
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLikeCollection {
    id: ObjectId,
    config: Config,
}

impl ErrorLikeCollection {
    pub fn new(
        heap: &mut Heap,
        prefix: impl Into<String>,
        items: impl IntoIterator<Item = Value>,
    ) -> Self {
        Self::with_config(heap, prefix, items, &Config::default())
    }

    pub fn with_config(
        heap: &mut Heap,
        prefix: impl Into<String>,
        items: impl IntoIterator<Item = Value>,
        config: &Config,
    ) -> Self {
        let items = coerce(heap, items, config);
        Self {
            id: heap.create_collection(prefix, items),
            config: config.clone(),
        }
    }

    /// A collection named by [`Config::default_prefix`].
    pub fn with_default_prefix(
        heap: &mut Heap,
        items: impl IntoIterator<Item = Value>,
        config: &Config,
    ) -> Self {
        Self::with_config(heap, config.default_prefix.as_str(), items, config)
    }

    /// Views an existing collection object. Later mutations coerce with
    /// `config`.
    pub fn from_object(heap: &Heap, id: ObjectId, config: &Config) -> Option<Self> {
        heap.collection(id).map(|_| Self {
            id,
            config: config.clone(),
        })
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn prefix<'h>(&self, heap: &'h Heap) -> &'h str {
        heap.collection(self.id).map_or("", Collection::prefix)
    }

    pub fn items<'h>(&self, heap: &'h Heap) -> &'h [WrapperId] {
        heap.collection(self.id)
            .map(Collection::items)
            .unwrap_or_default()
    }

    pub fn len(&self, heap: &Heap) -> usize {
        self.items(heap).len()
    }

    pub fn is_empty(&self, heap: &Heap) -> bool {
        self.items(heap).is_empty()
    }

    pub fn get(&self, heap: &Heap, index: usize) -> Option<WrapperId> {
        self.items(heap).get(index).copied()
    }

    fn storage<'h>(&self, heap: &'h mut Heap) -> Result<&'h mut Collection, CollectionError> {
        heap.collection_mut(self.id)
            .ok_or(CollectionError::NotACollection(self.id))
    }

    fn coerce_one(&self, heap: &mut Heap, value: Value) -> WrapperId {
        ensure_error_like_with_config(heap, value, &self.config)
    }

    /// Appends `value`, returning the new length.
    pub fn push(
        &self,
        heap: &mut Heap,
        value: impl Into<Value>,
    ) -> Result<usize, CollectionError> {
        self.storage(heap)?;
        let item = self.coerce_one(heap, value.into());
        let storage = self.storage(heap)?;
        storage.push(item);
        Ok(storage.len())
    }

    pub fn insert(
        &self,
        heap: &mut Heap,
        index: usize,
        value: impl Into<Value>,
    ) -> Result<(), CollectionError> {
        let len = self.storage(heap)?.len();
        if index > len {
            return Err(CollectionError::IndexOutOfBounds { index, len });
        }
        let item = self.coerce_one(heap, value.into());
        self.storage(heap)?.insert(index, item)
    }

    /// Appends every value, returning how many were added.
    pub fn extend(
        &self,
        heap: &mut Heap,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<usize, CollectionError> {
        self.storage(heap)?;
        let items = coerce(heap, values, &self.config);
        let added = items.len();
        self.storage(heap)?.extend(items);
        Ok(added)
    }

    /// Replaces `delete_count` items starting at `start` with `values`,
    /// returning the removed wrappers. Bounds are clamped.
    pub fn splice(
        &self,
        heap: &mut Heap,
        start: usize,
        delete_count: usize,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Vec<WrapperId>, CollectionError> {
        self.storage(heap)?;
        let items = coerce(heap, values, &self.config);
        Ok(self.storage(heap)?.splice(start, delete_count, items))
    }

    pub fn remove(&self, heap: &mut Heap, index: usize) -> Result<WrapperId, CollectionError> {
        self.storage(heap)?.remove(index)
    }

    pub fn pop(&self, heap: &mut Heap) -> Option<WrapperId> {
        self.storage(heap).ok()?.pop()
    }
}

fn coerce(
    heap: &mut Heap,
    values: impl IntoIterator<Item = Value>,
    config: &Config,
) -> Vec<WrapperId> {
    values
        .into_iter()
        .map(|value| ensure_error_like_with_config(heap, value, config))
        .collect()
}

impl From<&ErrorLikeCollection> for Value {
    fn from(collection: &ErrorLikeCollection) -> Self {
        Value::Object(collection.id)
    }
}

impl From<ErrorLikeCollection> for Value {
    fn from(collection: ErrorLikeCollection) -> Self {
        Value::Object(collection.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::read_string_field;

    #[test]
    fn raw_values_are_coerced_on_every_mutation() {
        let mut heap = Heap::new();
        let collection = ErrorLikeCollection::new(&mut heap, "warnings", [Value::from("a")]);
        let plain = heap.create_object().set("message", "b").id();

        assert_eq!(collection.push(&mut heap, plain), Ok(2));
        collection.insert(&mut heap, 0, 7).unwrap();
        let removed = collection
            .splice(&mut heap, 1, 1, [Value::from(false), Value::Null])
            .unwrap();
        assert_eq!(collection.extend(&mut heap, [Value::from(1.5)]), Ok(1));

        assert_eq!(removed.len(), 1);
        assert_eq!(collection.len(&heap), 5);
        for item in collection.items(&heap) {
            assert!(heap.as_wrapper(item.object_id()).is_some());
        }
    }

    #[test]
    fn wrappers_are_stored_as_is() {
        let mut heap = Heap::new();
        let wrapper = crate::create_error_like(&mut heap, "x", false);
        let collection = ErrorLikeCollection::new(&mut heap, "errors", [Value::from(wrapper)]);

        assert_eq!(collection.get(&heap, 0), Some(wrapper));
        assert_eq!(collection.prefix(&heap), "errors");
    }

    #[test]
    fn out_of_bounds_insert_allocates_nothing() {
        let mut heap = Heap::new();
        let collection = ErrorLikeCollection::new(&mut heap, "errors", []);
        let before = heap.len();

        assert_eq!(
            collection.insert(&mut heap, 3, "late"),
            Err(CollectionError::IndexOutOfBounds { index: 3, len: 0 })
        );
        assert_eq!(heap.len(), before);
        assert_eq!(
            collection.remove(&mut heap, 0),
            Err(CollectionError::IndexOutOfBounds { index: 0, len: 0 })
        );
        assert_eq!(collection.pop(&mut heap), None);
    }

    #[test]
    fn mutators_on_a_stale_handle_fail_without_allocating() {
        let mut heap = Heap::new();
        let stale = ErrorLikeCollection {
            id: ObjectId(40),
            config: Config::default(),
        };
        let before = heap.len();

        assert_eq!(
            stale.extend(&mut heap, [Value::from("a"), Value::from("b")]),
            Err(CollectionError::NotACollection(ObjectId(40)))
        );
        assert_eq!(
            stale.push(&mut heap, "c"),
            Err(CollectionError::NotACollection(ObjectId(40)))
        );
        assert_eq!(
            stale.splice(&mut heap, 0, 0, [Value::from("d")]),
            Err(CollectionError::NotACollection(ObjectId(40)))
        );
        assert_eq!(heap.len(), before);
    }

    #[test]
    fn mutators_use_the_handle_config() {
        let mut heap = Heap::new();
        let config = Config {
            fallback_message: "not an error".to_string(),
            ..Config::default()
        };
        let collection =
            ErrorLikeCollection::with_default_prefix(&mut heap, [Value::Null], &config);
        collection.push(&mut heap, 3).unwrap();
        collection.insert(&mut heap, 0, false).unwrap();
        collection.extend(&mut heap, [Value::from("x")]).unwrap();
        collection.splice(&mut heap, 0, 0, [Value::symbol("s")]).unwrap();

        assert_eq!(collection.len(&heap), 5);
        for item in collection.items(&heap) {
            assert_eq!(
                read_string_field(&heap, item.object_id(), "message").as_deref(),
                Some("not an error")
            );
        }
    }

    #[test]
    fn views_only_collections() {
        let mut heap = Heap::new();
        let plain = heap.create_object().id();
        let collection = ErrorLikeCollection::new(&mut heap, "errors", []);
        let config = Config::default();

        assert_eq!(ErrorLikeCollection::from_object(&heap, plain, &config), None);
        assert_eq!(
            ErrorLikeCollection::from_object(&heap, collection.id(), &config),
            Some(collection)
        );
    }
}
