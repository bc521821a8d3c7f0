use errorlike_value::value::format_number;
use errorlike_value::{Heap, ObjectId, Value, WrapperId};
use serde_json::Value as JsonValue;
use tracing::trace;

use crate::access::{read_field, read_stack, read_string_field, safe_stringify};
use crate::classify::{CAUSE, CODE, FieldPlan, PlannedField, json_code};
use crate::config::Config;
use crate::dispatch::Renderer;
use crate::guard::CycleGuard;

pub type JsonMap = serde_json::Map<String, JsonValue>;

/// Result of rendering one value in JSON mode.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Rendered {
    Object(JsonMap),
    /// A value that is not a field-bearing object.
    Scalar(JsonValue),
    Nothing,
}

impl Rendered {
    /// How a nested value is stored under its parent's key. Nested scalars
    /// are copied as-is, never escape-wrapped.
    fn into_field(self) -> Option<JsonValue> {
        match self {
            Rendered::Object(map) => Some(JsonValue::Object(map)),
            Rendered::Scalar(scalar) => Some(scalar),
            Rendered::Nothing => None,
        }
    }
}

pub(crate) struct JsonRenderer<'h> {
    heap: &'h Heap,
    guard: CycleGuard,
}

impl<'h> JsonRenderer<'h> {
    pub(crate) fn new(heap: &'h Heap) -> Self {
        Self {
            heap,
            guard: CycleGuard::new(),
        }
    }

    fn nested(&mut self, value: &Value) -> Option<JsonValue> {
        self.descend(value).and_then(Rendered::into_field)
    }
}

impl<'h> Renderer<'h> for JsonRenderer<'h> {
    type Output = Rendered;

    fn heap(&self) -> &'h Heap {
        self.heap
    }

    fn guard(&mut self) -> &mut CycleGuard {
        &mut self.guard
    }

    fn render_detail(&mut self, id: ObjectId, plan: FieldPlan<'h>) -> Rendered {
        let heap = self.heap;
        let mut map = JsonMap::new();
        for field in plan.fields() {
            match field {
                PlannedField::Known(CODE) => {
                    let Some(code) = read_field(heap, id, CODE) else {
                        continue;
                    };
                    match json_code(&code) {
                        Some(code) => {
                            map.insert(CODE.to_string(), code);
                        }
                        None => trace!(object = id.0, kind = %code.kind(), "dropped invalid code"),
                    }
                }
                PlannedField::Known(key) => {
                    if let Some(text) = read_string_field(heap, id, key) {
                        map.insert(key.to_string(), JsonValue::String(text));
                    }
                }
                PlannedField::Remaining(key) => {
                    let encoded = match read_field(heap, id, key) {
                        Some(value @ Value::Object(_)) => self.nested(&value),
                        Some(value) => json_primitive(heap, &value),
                        None => None,
                    };
                    if let Some(encoded) = encoded {
                        map.insert(key.to_string(), encoded);
                    }
                }
                PlannedField::Stack => {
                    if let Some(stack) = read_stack(heap, id) {
                        map.insert("stack".to_string(), JsonValue::String(stack));
                    }
                }
                PlannedField::Cause => {
                    if let Some(cause) = read_field(heap, id, CAUSE)
                        && let Some(encoded) = self.nested(&cause)
                    {
                        map.insert(CAUSE.to_string(), encoded);
                    }
                }
            }
        }
        Rendered::Object(map)
    }

    fn render_collection(&mut self, prefix: &'h str, items: &'h [WrapperId]) -> Rendered {
        let mut elements = Vec::with_capacity(items.len());
        for item in items {
            if let Some(Rendered::Object(map)) = self.descend_element(&Value::from(*item)) {
                elements.push(JsonValue::Object(map));
            }
        }
        let mut map = JsonMap::new();
        map.insert(prefix.to_string(), JsonValue::Array(elements));
        Rendered::Object(map)
    }

    fn render_native_error(&mut self, id: ObjectId) -> Rendered {
        let heap = self.heap;
        let Some(object) = heap.get_object(id) else {
            return Rendered::Nothing;
        };
        if let Some(hook) = &object.to_json {
            match (hook.0)(heap, id) {
                Ok(JsonValue::Object(map)) => return Rendered::Object(map),
                Ok(_) => trace!(object = id.0, "JSON conversion did not return an object"),
                Err(thrown) => trace!(object = id.0, %thrown, "JSON conversion threw"),
            }
        }
        self.render_detail(id, FieldPlan::for_native_error(object))
    }

    fn render_primitive(&mut self, value: &Value) -> Rendered {
        json_primitive(self.heap, value).map_or(Rendered::Nothing, Rendered::Scalar)
    }

    fn nothing(&mut self) -> Rendered {
        Rendered::Nothing
    }
}

/// JSON form of a non-object field value. Strings, booleans, `null` and
/// finite numbers stay native; everything else is stringified.
fn json_primitive(heap: &Heap, value: &Value) -> Option<JsonValue> {
    match value {
        Value::Undefined => None,
        Value::Null => Some(JsonValue::Null),
        Value::Bool(b) => Some(JsonValue::Bool(*b)),
        Value::Number(n) => Some(match value.as_safe_integer() {
            Some(integer) => JsonValue::from(integer),
            None => serde_json::Number::from_f64(*n)
                .map_or_else(|| JsonValue::String(format_number(*n)), JsonValue::Number),
        }),
        Value::String(s) => Some(JsonValue::String(s.clone())),
        _ => safe_stringify(heap, value).map(JsonValue::String),
    }
}

/// Renders any value to a JSON mapping using the default [`Config`].
pub fn to_error_json(heap: &Heap, value: &Value) -> JsonMap {
    to_error_json_with_config(heap, value, &Config::default())
}

/// Renders any value to a JSON mapping. Always a mapping: a top-level value
/// that is not a field-bearing object is stored under the escape key, and
/// `null`/`undefined` give an empty mapping.
pub fn to_error_json_with_config(heap: &Heap, value: &Value, config: &Config) -> JsonMap {
    match JsonRenderer::new(heap).descend(value) {
        Some(Rendered::Object(map)) => map,
        Some(Rendered::Scalar(scalar)) => {
            let mut map = JsonMap::new();
            map.insert(config.escape_key.clone(), scalar);
            map
        }
        Some(Rendered::Nothing) | None => JsonMap::new(),
    }
}

/// Renders the own fields of a structured detail, whatever its kind.
pub fn error_detail_to_json(heap: &Heap, id: ObjectId) -> JsonMap {
    let Some(object) = heap.get_object(id) else {
        return JsonMap::new();
    };
    let mut renderer = JsonRenderer::new(heap);
    renderer.guard.enter(id);
    match renderer.render_detail(id, FieldPlan::for_detail(object)) {
        Rendered::Object(map) => map,
        Rendered::Scalar(_) | Rendered::Nothing => JsonMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errorlike_value::Thrown;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn json(map: JsonMap) -> JsonValue {
        JsonValue::Object(map)
    }

    #[test]
    fn simple_detail() {
        let mut heap = Heap::new();
        let id = heap.create_object().set("code", 1).set("message", "m").id();

        assert_eq!(json(error_detail_to_json(&heap, id)), json!({ "code": 1, "message": "m" }));
    }

    #[test]
    fn top_level_scalars_are_escaped() {
        let heap = Heap::new();

        assert_eq!(json(to_error_json(&heap, &Value::from(5))), json!({ "__value": 5 }));
        assert_eq!(json(to_error_json(&heap, &Value::from("x"))), json!({ "__value": "x" }));
        assert_eq!(
            json(to_error_json(&heap, &Value::symbol("s"))),
            json!({ "__value": "Symbol(s)" })
        );
        assert_eq!(json(to_error_json(&heap, &Value::Null)), json!({}));
        assert_eq!(json(to_error_json(&heap, &Value::Undefined)), json!({}));
    }

    #[test]
    fn escape_key_is_configurable() {
        let heap = Heap::new();
        let config = Config {
            escape_key: "raw".to_string(),
            ..Config::default()
        };

        assert_eq!(
            json(to_error_json_with_config(&heap, &Value::Bool(true), &config)),
            json!({ "raw": true })
        );
    }

    #[test]
    fn nested_scalars_are_not_escaped() {
        let mut heap = Heap::new();
        let id = heap
            .create_object()
            .set("message", "m")
            .set("cause", "root cause")
            .set("ratio", 0.5)
            .set("nan", f64::NAN)
            .set("nothing", Value::Null)
            .set("callback", Value::function("cb"))
            .id();

        assert_eq!(
            json(to_error_json(&heap, &id.into())),
            json!({
                "message": "m",
                "ratio": 0.5,
                "nan": "NaN",
                "nothing": null,
                "callback": "function cb() { [native code] }",
                "cause": "root cause",
            })
        );
    }

    #[test]
    fn hidden_fields_are_not_visited() {
        let mut heap = Heap::new();
        let id = heap
            .create_object()
            .set("message", "m")
            .set_hidden("secret", "s")
            .set_hidden("stack", "trace")
            .id();

        assert_eq!(
            json(to_error_json(&heap, &id.into())),
            json!({ "message": "m", "stack": "trace" })
        );
    }

    #[test]
    fn native_error_json_hook_is_copied_verbatim() {
        let mut heap = Heap::new();
        let id = heap
            .create_native_error("HttpError", "bad gateway")
            .with_to_json(|_, _| Ok(json!({ "status": 502, "nested": { "a": [1, 2] } })))
            .id();

        assert_eq!(
            json(to_error_json(&heap, &id.into())),
            json!({ "status": 502, "nested": { "a": [1, 2] } })
        );
    }

    #[test]
    fn native_error_json_hook_failure_falls_back_to_fields() {
        let mut heap = Heap::new();
        let throwing = heap
            .create_native_error("Error", "a")
            .with_to_json(|_, _| Err(Thrown::new("nope")))
            .remove("stack")
            .id();
        let scalar = heap
            .create_native_error("Error", "b")
            .with_to_json(|_, _| Ok(json!("just a string")))
            .remove("stack")
            .id();

        assert_eq!(
            json(to_error_json(&heap, &throwing.into())),
            json!({ "name": "Error", "message": "a" })
        );
        assert_eq!(
            json(to_error_json(&heap, &scalar.into())),
            json!({ "name": "Error", "message": "b" })
        );
    }

    #[test]
    fn empty_nested_objects_are_kept() {
        let mut heap = Heap::new();
        let empty = heap.create_object().id();
        let id = heap.create_object().set("meta", empty).id();

        assert_eq!(json(to_error_json(&heap, &id.into())), json!({ "meta": {} }));
    }
}
