use errorlike_value::{Object, Value};

pub const NAME: &str = "name";
pub const CODE: &str = "code";
pub const MESSAGE: &str = "message";
pub const LEVEL: &str = "level";
pub const STACK: &str = "stack";
pub const CAUSE: &str = "cause";

/// Reserved fields emitted first, in this order.
pub const KNOWN_FIELDS: [&str; 4] = [NAME, CODE, MESSAGE, LEVEL];

/// The subset a native error is rendered from.
const NATIVE_FIELDS: [&str; 2] = [NAME, MESSAGE];

/// One step of a [`FieldPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedField<'a> {
    Known(&'static str),
    Remaining(&'a str),
    Stack,
    Cause,
}

/// Field order for rendering a structured value: known fields, remaining
/// fields, `stack`, then `cause`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPlan<'a> {
    pub known: Vec<&'static str>,
    pub remaining: Vec<&'a str>,
    pub stack: bool,
    pub cause: bool,
}

impl<'a> FieldPlan<'a> {
    /// Plan over the own fields of a structured detail. Presence is checked
    /// without running getters; only enumerable fields reach `remaining`.
    pub fn for_detail(object: &'a Object) -> Self {
        Self {
            known: KNOWN_FIELDS
                .into_iter()
                .filter(|key| object.has_own(key))
                .collect(),
            remaining: object
                .enumerable_keys()
                .filter(|key| !is_reserved(key))
                .collect(),
            stack: object.has_own(STACK),
            cause: object.has_own(CAUSE),
        }
    }

    /// Plan over the fixed `name`/`message`/`stack`/`cause` subset.
    pub fn for_native_error(object: &Object) -> Self {
        Self {
            known: NATIVE_FIELDS
                .into_iter()
                .filter(|key| object.has_own(key))
                .collect(),
            remaining: Vec::new(),
            stack: object.has_own(STACK),
            cause: object.has_own(CAUSE),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = PlannedField<'a>> + '_ {
        let known = self.known.iter().map(|key| PlannedField::Known(*key));
        let remaining = self.remaining.iter().map(|key| PlannedField::Remaining(*key));
        let stack = self.stack.then_some(PlannedField::Stack);
        let cause = self.cause.then_some(PlannedField::Cause);
        known.chain(remaining).chain(stack).chain(cause)
    }
}

pub fn is_reserved(key: &str) -> bool {
    KNOWN_FIELDS.contains(&key) || key == STACK || key == CAUSE
}

/// A `code` is emitted to JSON only as a non-empty string or a safe integer.
pub fn json_code(value: &Value) -> Option<serde_json::Value> {
    match value {
        Value::String(s) if !s.is_empty() => Some(serde_json::Value::String(s.clone())),
        other => other.as_safe_integer().map(serde_json::Value::from),
    }
}
