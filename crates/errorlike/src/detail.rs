use core::fmt;
use core::str::FromStr;

use errorlike_value::{Heap, ObjectId, Property, PropertyMap, Value, WrapperId};
use indexmap::IndexMap;
use tracing::trace;

use crate::access::{read_field, read_stack, read_string_field};
use crate::classify::{CAUSE, CODE, LEVEL, MESSAGE, NAME, STACK, is_reserved};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Text(String),
    Integer(i64),
}

impl ErrorCode {
    /// Accepts a non-empty string or a safe integer.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(ErrorCode::Text(s.clone())),
            other => other.as_safe_integer().map(ErrorCode::Integer),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ErrorCode::Text(text) => Value::String(text.clone()),
            ErrorCode::Integer(n) => Value::from(*n),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Text(text) => write!(f, "{text}"),
            ErrorCode::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(s: &str) -> Self {
        ErrorCode::Text(s.to_string())
    }
}

impl From<i32> for ErrorCode {
    fn from(n: i32) -> Self {
        ErrorCode::Integer(n.into())
    }
}

impl From<i64> for ErrorCode {
    fn from(n: i64) -> Self {
        ErrorCode::Integer(n)
    }
}

/// Severity of an error. Only a display default; an absent level is never
/// rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorLevel {
    Info,
    Warning,
    #[default]
    Error,
    Debug,
}

impl ErrorLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorLevel::Info => "info",
            ErrorLevel::Warning => "warning",
            ErrorLevel::Error => "error",
            ErrorLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for ErrorLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(ErrorLevel::Info),
            "warning" => Ok(ErrorLevel::Warning),
            "error" => Ok(ErrorLevel::Error),
            "debug" => Ok(ErrorLevel::Debug),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}

/// Typed view of an error detail: the reserved fields plus every other field
/// in definition order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorDetail {
    pub code: Option<ErrorCode>,
    pub name: Option<String>,
    pub message: Option<String>,
    pub level: Option<ErrorLevel>,
    pub stack: Option<String>,
    pub cause: Option<Value>,
    pub extra: IndexMap<String, Value>,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_code(mut self, code: impl Into<ErrorCode>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_level(mut self, level: ErrorLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Into<Value>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The level to show, `error` when none is set.
    pub fn display_level(&self) -> ErrorLevel {
        self.level.unwrap_or_default()
    }

    /// Own properties of this detail. Extras named like a reserved field are
    /// skipped.
    pub fn to_properties(&self) -> PropertyMap {
        let mut properties = PropertyMap::new();
        let reserved = [
            (NAME, self.name.clone().map(Value::from)),
            (CODE, self.code.as_ref().map(ErrorCode::to_value)),
            (MESSAGE, self.message.clone().map(Value::from)),
            (LEVEL, self.level.map(|level| Value::from(level.as_str()))),
        ];
        for (key, value) in reserved {
            if let Some(value) = value {
                properties.insert(key, Property::data(value));
            }
        }
        for (key, value) in &self.extra {
            if is_reserved(key) {
                trace!(field = key.as_str(), "extra field shadows a reserved field");
                continue;
            }
            properties.insert(key.clone(), Property::data(value.clone()));
        }
        if let Some(stack) = &self.stack {
            properties.insert(STACK, Property::data(stack.as_str()));
        }
        if let Some(cause) = &self.cause {
            properties.insert(CAUSE, Property::data(cause.clone()));
        }
        properties
    }

    /// Allocates a plain object holding this detail.
    pub fn write_to(&self, heap: &mut Heap) -> ObjectId {
        let id = heap.create_object().id();
        if let Some(object) = heap.get_object_mut(id) {
            object.properties = self.to_properties();
        }
        id
    }

    /// Allocates a wrapper holding this detail.
    pub fn into_error_like(self, heap: &mut Heap) -> WrapperId {
        heap.alloc_error_like(self.to_properties())
    }

    /// Reads a detail back, fail-soft: unreadable or mistyped reserved fields
    /// are left empty, and only readable enumerable extras are kept.
    pub fn read_from(heap: &Heap, id: ObjectId) -> Self {
        let Some(object) = heap.get_object(id) else {
            return Self::default();
        };
        let extra = object
            .enumerable_keys()
            .filter(|key| !is_reserved(key))
            .filter_map(|key| read_field(heap, id, key).map(|value| (key.to_string(), value)))
            .collect();
        Self {
            code: read_field(heap, id, CODE).and_then(|code| ErrorCode::from_value(&code)),
            name: read_string_field(heap, id, NAME),
            message: read_string_field(heap, id, MESSAGE),
            level: read_string_field(heap, id, LEVEL).and_then(|level| level.parse().ok()),
            stack: read_stack(heap, id),
            cause: read_field(heap, id, CAUSE),
            extra,
        }
    }
}
