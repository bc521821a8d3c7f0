use errorlike_value::{CollectionError, Heap, ObjectKind, Property, PropertyMap, WrapperId};
use pretty_assertions::assert_eq;

fn wrapper(heap: &mut Heap, message: &str) -> WrapperId {
    let mut properties = PropertyMap::new();
    properties.insert("message", Property::data(message));
    heap.alloc_error_like(properties)
}

#[test]
fn splice_clamps_bounds() {
    let mut heap = Heap::new();
    let id = heap.create_collection("errors", []);
    let a = wrapper(&mut heap, "a");
    let b = wrapper(&mut heap, "b");
    let c = wrapper(&mut heap, "c");

    let storage = heap.collection_mut(id).unwrap();
    storage.push(a);
    storage.push(b);
    let removed = storage.splice(1, 10, [c]);

    assert_eq!(removed, vec![b]);
    assert_eq!(storage.items(), &[a, c]);
    assert_eq!(storage.splice(99, 1, Vec::new()), Vec::<WrapperId>::new());
    assert_eq!(
        storage.insert(5, a),
        Err(CollectionError::IndexOutOfBounds { index: 5, len: 2 })
    );
}

#[test]
fn collections_are_objects() {
    let mut heap = Heap::new();
    let id = heap.create_collection("warnings", []);

    assert!(matches!(
        heap.get_object(id).map(|object| object.kind()),
        Some(ObjectKind::Collection(c)) if c.prefix() == "warnings"
    ));
    assert_eq!(heap.get(id, "0"), Ok(None));
    assert!(heap.collection(id).unwrap().is_empty());
    assert_eq!(heap.as_wrapper(id), None);
    let plain = heap.create_object().id();
    assert!(heap.collection_mut(plain).is_none());
}

#[test]
fn collections_start_with_their_items() {
    let mut heap = Heap::new();
    let a = wrapper(&mut heap, "a");
    let id = heap.create_collection("errors", [a, a]);

    assert_eq!(heap.collection(id).unwrap().items(), &[a, a]);
}
