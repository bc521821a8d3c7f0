use std::sync::Arc;

use crate::prelude_internal::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

/// Id of an object carrying the error-like marker.
///
/// Only obtainable from [`Heap::alloc_error_like`] or [`Heap::as_wrapper`], so
/// holding one proves the marker is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WrapperId(ObjectId);

impl WrapperId {
    pub fn object_id(self) -> ObjectId {
        self.0
    }
}

/// Arena owning every object of a value graph.
///
/// Objects refer to each other through [`Value::Object`], so arbitrary
/// graphs, including cycles, can be expressed.
#[derive(Debug, Clone, Default)]
pub struct Heap {
    objects: Vec<Object>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(id.0)
    }

    fn alloc(&mut self, kind: ObjectKind) -> ObjectId {
        self.objects.push(Object::new(kind));
        ObjectId(self.objects.len() - 1)
    }

    pub fn create_object(&mut self) -> ObjectMut<'_> {
        let id = self.alloc(ObjectKind::Plain);
        ObjectMut::new(self, id)
    }

    /// Creates an array whose elements are enumerable index properties plus a
    /// hidden `length`.
    pub fn create_array(&mut self, items: impl IntoIterator<Item = Value>) -> ObjectId {
        let id = self.alloc(ObjectKind::Array);
        let mut object = ObjectMut::new(self, id);
        let mut len = 0usize;
        for (index, item) in items.into_iter().enumerate() {
            object = object.set(index.to_string(), item);
            len = index + 1;
        }
        object.set_hidden("length", len as f64).id()
    }

    /// Creates a native error with hidden `name`, `message` and `stack`.
    pub fn create_native_error(&mut self, name: &str, message: &str) -> ObjectMut<'_> {
        let id = self.alloc(ObjectKind::NativeError);
        let stack = if message.is_empty() {
            format!("{name}\n    at <anonymous>")
        } else {
            format!("{name}: {message}\n    at <anonymous>")
        };
        ObjectMut::new(self, id)
            .set_hidden("name", name)
            .set_hidden("message", message)
            .set_hidden("stack", stack)
    }

    pub fn create_collection(
        &mut self,
        prefix: impl Into<String>,
        items: impl IntoIterator<Item = WrapperId>,
    ) -> ObjectId {
        let mut collection = Collection::new(prefix);
        collection.extend(items);
        self.alloc(ObjectKind::Collection(collection))
    }

    /// Allocates an object carrying the error-like marker with the given own
    /// properties. Intended for the error-like factory; everything else should
    /// go through it.
    pub fn alloc_error_like(&mut self, properties: PropertyMap) -> WrapperId {
        let id = self.alloc(ObjectKind::ErrorLike);
        self.objects[id.0].properties = properties;
        WrapperId(id)
    }

    /// Allocates an error instance that owns `detail`.
    pub fn alloc_error_base(&mut self, detail: WrapperId) -> ObjectMut<'_> {
        let id = self.alloc(ObjectKind::ErrorBase { detail });
        ObjectMut::new(self, id)
    }

    pub fn as_wrapper(&self, id: ObjectId) -> Option<WrapperId> {
        self.get_object(id)
            .filter(|object| object.is_error_like())
            .map(|_| WrapperId(id))
    }

    pub fn collection(&self, id: ObjectId) -> Option<&Collection> {
        self.get_object(id).and_then(Object::as_collection)
    }

    pub fn collection_mut(&mut self, id: ObjectId) -> Option<&mut Collection> {
        match self.get_object_mut(id)?.kind_mut() {
            ObjectKind::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn object_mut(&mut self, id: ObjectId) -> ObjectMut<'_> {
        ObjectMut::new(self, id)
    }

    /// Own property, any enumerability. Never runs a getter.
    pub fn has_own(&self, id: ObjectId, key: &str) -> bool {
        self.get_object(id).is_some_and(|object| object.has_own(key))
    }

    /// Reads an own property, running its getter if it has one.
    ///
    /// `Ok(None)` means the property does not exist.
    pub fn get(&self, id: ObjectId, key: &str) -> Result<Option<Value>, Thrown> {
        let Some(property) = self.get_object(id).and_then(|o| o.properties.get(key)) else {
            return Ok(None);
        };
        match &property.slot {
            Slot::Data(value) => Ok(Some(value.clone())),
            Slot::Accessor(getter) => getter(self).map(Some),
        }
    }

    /// Builds plain objects and arrays mirroring a JSON tree.
    pub fn import_json(&mut self, json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                let items: Vec<Value> = items.iter().map(|item| self.import_json(item)).collect();
                Value::Object(self.create_array(items))
            }
            serde_json::Value::Object(map) => {
                let id = self.alloc(ObjectKind::Plain);
                for (key, item) in map {
                    let value = self.import_json(item);
                    self.objects[id.0]
                        .properties
                        .insert(key.clone(), Property::data(value));
                }
                Value::Object(id)
            }
        }
    }
}

/// Borrowing builder over one object of a [`Heap`].
pub struct ObjectMut<'h> {
    heap: &'h mut Heap,
    id: ObjectId,
}

impl core::fmt::Debug for ObjectMut<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.heap.get_object(self.id) {
            Some(object) => f.debug_tuple("ObjectMut").field(&self.id).field(object).finish(),
            None => f
                .debug_tuple("ObjectMut")
                .field(&self.id)
                .field(&"<invalid>")
                .finish(),
        }
    }
}

impl<'h> ObjectMut<'h> {
    pub fn new(heap: &'h mut Heap, id: ObjectId) -> Self {
        Self { heap, id }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn value(&self) -> Value {
        Value::Object(self.id)
    }

    fn define(self, key: impl Into<String>, property: Property) -> Self {
        if let Some(object) = self.heap.get_object_mut(self.id) {
            object.properties.insert(key, property);
        }
        self
    }

    /// Defines an enumerable data property.
    pub fn set(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.define(key, Property::data(value))
    }

    /// Defines a non-enumerable data property.
    pub fn set_hidden(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.define(key, Property::hidden(value))
    }

    /// Defines an enumerable accessor property.
    pub fn set_getter<F>(self, key: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&Heap) -> Result<Value, Thrown> + Send + Sync + 'static,
    {
        self.define(key, Property::getter(Arc::new(getter)))
    }

    /// Defines an enumerable accessor that always throws `message`.
    pub fn set_throwing(self, key: impl Into<String>, message: &str) -> Self {
        let message = message.to_string();
        self.set_getter(key, move |_| Err(Thrown::new(message.clone())))
    }

    pub fn remove(self, key: &str) -> Self {
        if let Some(object) = self.heap.get_object_mut(self.id) {
            object.properties.remove(key);
        }
        self
    }

    pub fn with_to_string<F>(self, hook: F) -> Self
    where
        F: Fn(&Heap, ObjectId) -> Result<String, Thrown> + Send + Sync + 'static,
    {
        if let Some(object) = self.heap.get_object_mut(self.id) {
            object.to_string = StringConversion::Custom(Arc::new(hook));
        }
        self
    }

    /// Removes any string conversion, as for an object without a prototype.
    pub fn without_to_string(self) -> Self {
        if let Some(object) = self.heap.get_object_mut(self.id) {
            object.to_string = StringConversion::Missing;
        }
        self
    }

    pub fn with_to_json<F>(self, hook: F) -> Self
    where
        F: Fn(&Heap, ObjectId) -> Result<serde_json::Value, Thrown> + Send + Sync + 'static,
    {
        if let Some(object) = self.heap.get_object_mut(self.id) {
            object.to_json = Some(JsonHookSlot(Arc::new(hook)));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn getters_run_on_read_and_may_throw() {
        let mut heap = Heap::new();
        let id = heap
            .create_object()
            .set("code", 7)
            .set_getter("computed", |_| Ok(Value::from("yes")))
            .set_throwing("message", "nope")
            .id();

        assert_eq!(heap.get(id, "code"), Ok(Some(Value::from(7))));
        assert_eq!(heap.get(id, "computed"), Ok(Some(Value::from("yes"))));
        assert_eq!(heap.get(id, "message"), Err(Thrown::new("nope")));
        assert_eq!(heap.get(id, "missing"), Ok(None));
        assert!(heap.has_own(id, "message"));
    }

    #[test]
    fn native_error_fields_are_hidden() {
        let mut heap = Heap::new();
        let id = heap.create_native_error("TypeError", "bad").id();
        let object = heap.get_object(id).unwrap();

        assert_eq!(object.enumerable_keys().count(), 0);
        assert!(object.has_own("stack"));
        assert_eq!(heap.get(id, "name"), Ok(Some(Value::from("TypeError"))));
    }

    #[test]
    fn cycles_are_expressible() {
        let mut heap = Heap::new();
        let a = heap.create_object().id();
        let b = heap.create_object().set("cause", a).id();
        heap.object_mut(a).set("cause", b);

        assert_eq!(heap.get(a, "cause"), Ok(Some(Value::Object(b))));
        assert_eq!(heap.get(b, "cause"), Ok(Some(Value::Object(a))));
    }

    #[test]
    fn plain_objects_never_carry_the_marker() {
        let mut heap = Heap::new();
        let plain = heap.create_object().set("message", "m").id();
        let wrapper = heap.alloc_error_like(heap.get_object(plain).unwrap().properties.clone());

        assert_eq!(heap.as_wrapper(plain), None);
        assert_eq!(heap.as_wrapper(wrapper.object_id()), Some(wrapper));
    }

    #[test]
    fn import_json_preserves_key_order() {
        let mut heap = Heap::new();
        let value = heap.import_json(&json!({ "b": 1, "a": [true, null] }));
        let id = value.as_object().unwrap();

        let keys: Vec<_> = heap.get_object(id).unwrap().enumerable_keys().collect();
        assert_eq!(keys, vec!["b", "a"]);

        let array = heap.get(id, "a").unwrap().unwrap().as_object().unwrap();
        assert_eq!(heap.get_object(array).unwrap().kind(), &ObjectKind::Array);
        assert_eq!(heap.get(array, "0"), Ok(Some(Value::Bool(true))));
        assert_eq!(heap.get(array, "length"), Ok(Some(Value::Number(2.0))));
    }
}
