//! Fail-soft reads and string conversion. Nothing in here panics or
//! propagates a [`Thrown`](errorlike_value::Thrown).

use errorlike_value::{Heap, Object, ObjectId, ObjectKind, StringConversion, Value};
use tracing::trace;

/// Reads an own field. Throwing reads, missing fields and `undefined` all
/// come back as `None`.
pub fn read_field(heap: &Heap, id: ObjectId, name: &str) -> Option<Value> {
    match heap.get(id, name) {
        Ok(Some(Value::Undefined)) | Ok(None) => None,
        Ok(Some(value)) => Some(value),
        Err(thrown) => {
            trace!(field = name, object = id.0, %thrown, "field read threw");
            None
        }
    }
}

/// Reads an own field and converts it with [`safe_stringify`].
pub fn read_string_field(heap: &Heap, id: ObjectId, name: &str) -> Option<String> {
    read_field(heap, id, name).and_then(|value| safe_stringify(heap, &value))
}

/// Converts a value with its own string conversion.
///
/// `None` when the conversion throws, is missing, or yields an empty string,
/// and for `null`/`undefined`.
pub fn safe_stringify(heap: &Heap, value: &Value) -> Option<String> {
    let text = match value {
        Value::Object(id) => object_to_string(heap, *id)?,
        other => other.primitive_to_string()?,
    };
    (!text.is_empty()).then_some(text)
}

fn object_to_string(heap: &Heap, id: ObjectId) -> Option<String> {
    let object = heap.get_object(id)?;
    match &object.to_string {
        StringConversion::Missing => None,
        StringConversion::Custom(hook) => match hook(heap, id) {
            Ok(text) => Some(text),
            Err(thrown) => {
                trace!(object = id.0, %thrown, "string conversion threw");
                None
            }
        },
        StringConversion::Inherited => Some(inherited_to_string(heap, id, object)),
    }
}

fn inherited_to_string(heap: &Heap, id: ObjectId, object: &Object) -> String {
    match object.kind() {
        ObjectKind::NativeError => error_header(heap, id),
        ObjectKind::ErrorBase { detail } => error_header(heap, detail.object_id()),
        ObjectKind::Array => object
            .enumerable_keys()
            .map(|key| match read_field(heap, id, key) {
                Some(Value::Object(_)) => "[object Object]".to_string(),
                Some(value) => value.primitive_to_string().unwrap_or_default(),
                None => String::new(),
            })
            .collect::<Vec<_>>()
            .join(","),
        _ => "[object Object]".to_string(),
    }
}

/// The `stack` field, if it is a non-empty string.
pub(crate) fn read_stack(heap: &Heap, id: ObjectId) -> Option<String> {
    match read_field(heap, id, "stack")? {
        Value::String(stack) if !stack.is_empty() => Some(stack),
        _ => None,
    }
}

/// `Name: message`, `Name`, or `message`, as an error prints itself.
pub(crate) fn error_header(heap: &Heap, id: ObjectId) -> String {
    let primitive = |key: &str| read_field(heap, id, key).and_then(|v| v.primitive_to_string());
    let name = primitive("name").unwrap_or_else(|| "Error".to_string());
    let message = primitive("message").unwrap_or_default();
    match (name.is_empty(), message.is_empty()) {
        (true, _) => message,
        (false, true) => name,
        (false, false) => format!("{name}: {message}"),
    }
}
