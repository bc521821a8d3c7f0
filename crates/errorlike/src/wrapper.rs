use errorlike_value::{
    Heap, Object, ObjectId, ObjectKind, Property, PropertyMap, Value, WrapperId,
};
use tracing::debug;

use crate::access::{error_header, read_string_field};
use crate::classify::{CAUSE, MESSAGE, NAME, STACK};
use crate::config::Config;
use crate::stack::{BacktraceCapture, NoStackCapture, StackCapture};

/// Wraps `fields` in a new object carrying the error-like marker.
///
/// Own properties of a plain object, a native error, or another wrapper are
/// copied. Anything else is replaced by a fallback detail whose `cause` is the
/// original input. With `capture_stack` the current backtrace becomes `stack`.
pub fn create_error_like(
    heap: &mut Heap,
    fields: impl Into<Value>,
    capture_stack: bool,
) -> WrapperId {
    let config = Config::default();
    if capture_stack {
        create_error_like_with(heap, fields.into(), &BacktraceCapture, &config)
    } else {
        create_error_like_with(heap, fields.into(), &NoStackCapture, &config)
    }
}

pub fn create_error_like_with(
    heap: &mut Heap,
    fields: Value,
    capture: &dyn StackCapture,
    config: &Config,
) -> WrapperId {
    let properties = match usable_properties(heap, &fields) {
        Some(properties) => properties,
        None => {
            debug!(kind = %fields.kind(), "wrapping unusable error value in fallback detail");
            fallback_properties(fields, config)
        }
    };
    let wrapper = heap.alloc_error_like(properties);
    capture.capture(heap, wrapper.object_id());
    wrapper
}

fn usable_properties(heap: &Heap, fields: &Value) -> Option<PropertyMap> {
    let object = heap.get_object(fields.as_object()?)?;
    match object.kind() {
        ObjectKind::Plain | ObjectKind::NativeError | ObjectKind::ErrorLike => {
            Some(object.properties.clone())
        }
        ObjectKind::Array | ObjectKind::ErrorBase { .. } | ObjectKind::Collection(_) => None,
    }
}

fn fallback_properties(original: Value, config: &Config) -> PropertyMap {
    let mut properties = PropertyMap::new();
    properties.insert(MESSAGE, Property::data(config.fallback_message.as_str()));
    properties.insert(CAUSE, Property::data(original));
    properties
}

/// Returns `value` itself if it is already a wrapper, the detail of an error
/// instance, and a fresh wrapper otherwise.
pub fn ensure_error_like(heap: &mut Heap, value: impl Into<Value>) -> WrapperId {
    ensure_error_like_with_config(heap, value.into(), &Config::default())
}

pub fn ensure_error_like_with_config(heap: &mut Heap, value: Value, config: &Config) -> WrapperId {
    if let Value::Object(id) = value {
        if let Some(wrapper) = heap.as_wrapper(id) {
            return wrapper;
        }
        if let Some(ObjectKind::ErrorBase { detail }) = heap.get_object(id).map(Object::kind) {
            return *detail;
        }
    }
    create_error_like_with(heap, value, &NoStackCapture, config)
}

/// Creates an error instance around `fields` (a wrapper or a raw field set).
///
/// The detail always ends up with a `name` (default `Error`) and a `stack`
/// (captured by `capture`, else the error's own header line). The instance
/// exposes its wrapper as the hidden `detail` property and renders through it.
pub fn create_error_base(
    heap: &mut Heap,
    fields: impl Into<Value>,
    capture: &dyn StackCapture,
) -> ObjectId {
    let detail = ensure_error_like(heap, fields);
    let detail_id = detail.object_id();
    if read_string_field(heap, detail_id, NAME).is_none() {
        heap.object_mut(detail_id).set(NAME, "Error");
    }
    if !heap.has_own(detail_id, STACK) {
        capture.capture(heap, detail_id);
    }
    if !heap.has_own(detail_id, STACK) {
        let header = error_header(heap, detail_id);
        heap.object_mut(detail_id).set(STACK, header);
    }
    heap.alloc_error_base(detail).set_hidden("detail", detail).id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FALLBACK_MESSAGE;

    #[test]
    fn copies_plain_fields_into_a_new_wrapper() {
        let mut heap = Heap::new();
        let plain = heap.create_object().set("code", "E1").set("message", "m").id();
        let wrapper = create_error_like(&mut heap, plain, false);

        assert_ne!(wrapper.object_id(), plain);
        assert_eq!(heap.as_wrapper(plain), None);
        assert_eq!(heap.get(wrapper.object_id(), "code"), Ok(Some(Value::from("E1"))));
        assert!(!heap.has_own(wrapper.object_id(), "stack"));
    }

    #[test]
    fn fallback_for_unusable_input() {
        let mut heap = Heap::new();
        let wrapper = create_error_like(&mut heap, "not an object", false);
        let id = wrapper.object_id();

        assert_eq!(heap.get(id, "message"), Ok(Some(Value::from(FALLBACK_MESSAGE))));
        assert_eq!(heap.get(id, "cause"), Ok(Some(Value::from("not an object"))));
    }

    #[test]
    fn fallback_message_is_configurable() {
        let mut heap = Heap::new();
        let config = Config {
            fallback_message: "weird".to_string(),
            ..Config::default()
        };
        let wrapper = create_error_like_with(&mut heap, Value::Null, &NoStackCapture, &config);

        assert_eq!(heap.get(wrapper.object_id(), "message"), Ok(Some(Value::from("weird"))));
        assert_eq!(heap.get(wrapper.object_id(), "cause"), Ok(Some(Value::Null)));
    }

    #[test]
    fn capture_writes_stack() {
        let mut heap = Heap::new();
        let plain = heap.create_object().set("message", "m").id();
        let capture = |heap: &mut Heap, target: ObjectId| {
            heap.object_mut(target).set("stack", "captured");
        };
        let wrapper = create_error_like_with(&mut heap, plain.into(), &capture, &Config::default());

        assert_eq!(heap.get(wrapper.object_id(), "stack"), Ok(Some(Value::from("captured"))));
    }

    #[test]
    fn ensure_is_identity_on_wrappers_and_unwraps_bases() {
        let mut heap = Heap::new();
        let wrapper = create_error_like(&mut heap, "x", false);
        let base = create_error_base(&mut heap, wrapper, &NoStackCapture);
        let before = heap.len();

        assert_eq!(ensure_error_like(&mut heap, wrapper), wrapper);
        assert_eq!(ensure_error_like(&mut heap, base), wrapper);
        assert_eq!(heap.len(), before);
    }

    #[test]
    fn error_base_populates_name_and_stack() {
        let mut heap = Heap::new();
        let fields = heap.create_object().set("message", "disk full").id();
        let base = create_error_base(&mut heap, fields, &NoStackCapture);
        let detail = ensure_error_like(&mut heap, base).object_id();

        assert_eq!(heap.get(detail, "name"), Ok(Some(Value::from("Error"))));
        assert_eq!(heap.get(detail, "stack"), Ok(Some(Value::from("Error: disk full"))));
        assert_eq!(heap.get(base, "detail"), Ok(Some(Value::Object(detail))));
    }
}
