use crate::prelude_internal::*;

/// Largest integer a double can hold without losing precision (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Undefined,
    Null,
    Bool,
    Number,
    String,
    Symbol,
    Function,
    Object,
}

impl core::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Bool => write!(f, "boolean"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::Symbol => write!(f, "symbol"),
            Self::Function => write!(f, "function"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// A description-carrying token. Converts to `Symbol(<description>)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub description: Option<String>,
}

/// A callable stand-in. Only its name is observable to the serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Symbol(Symbol),
    Function(Function),
    /// Reference into a [`Heap`](crate::heap::Heap). Identity is the id.
    Object(ObjectId),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::Function(_) => ValueKind::Function,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn symbol(description: impl Into<String>) -> Self {
        Value::Symbol(Symbol {
            description: Some(description.into()),
        })
    }

    pub fn function(name: impl Into<String>) -> Self {
        Value::Function(Function { name: name.into() })
    }

    /// `undefined` or `null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Value::Object(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number as `i64` if it is integral and within the safe
    /// integer range.
    pub fn as_safe_integer(&self) -> Option<i64> {
        match self {
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                Some(*n as i64)
            }
            _ => None,
        }
    }

    /// The string form a value has on its own, without consulting any heap
    /// object. Returns `None` for `undefined`, `null` and objects.
    pub fn primitive_to_string(&self) -> Option<String> {
        match self {
            Value::Undefined | Value::Null | Value::Object(_) => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(format_number(*n)),
            Value::String(s) => Some(s.clone()),
            Value::Symbol(Symbol { description }) => Some(format!(
                "Symbol({})",
                description.as_deref().unwrap_or_default()
            )),
            Value::Function(Function { name }) => {
                Some(format!("function {name}() {{ [native code] }}"))
            }
        }
    }
}

/// Formats a double the way a script runtime prints it: shortest
/// round-tripping digits, integral values without a fraction, `NaN`,
/// `Infinity`, no negative zero, and exponent form (`1e+21`, `1e-7`) outside
/// `[1e-6, 1e21)`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let scientific = format!("{n:e}");
    let Some((mantissa, exponent)) = scientific
        .split_once('e')
        .and_then(|(mantissa, exponent)| Some((mantissa, exponent.parse::<i32>().ok()?)))
    else {
        return n.to_string();
    };
    if (-6..21).contains(&exponent) {
        n.to_string()
    } else if exponent > 0 {
        format!("{mantissa}e+{exponent}")
    } else {
        format!("{mantissa}e{exponent}")
    }
}

// ============================================================================
// From implementations for Value
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::Object(id)
    }
}

impl From<WrapperId> for Value {
    fn from(id: WrapperId) -> Self {
        Value::Object(id.object_id())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Undefined, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_print_like_a_script_runtime() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn large_and_tiny_numbers_use_exponent_form() {
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-1.5e300), "-1.5e+300");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.25e-10), "1.25e-10");
        assert_eq!(format_number(123.456), "123.456");
    }

    #[test]
    fn safe_integer_bounds() {
        assert_eq!(Value::from(42).as_safe_integer(), Some(42));
        assert_eq!(Value::Number(1.5).as_safe_integer(), None);
        assert_eq!(Value::Number(MAX_SAFE_INTEGER).as_safe_integer(), Some(9_007_199_254_740_991));
        assert_eq!(Value::Number(MAX_SAFE_INTEGER + 2.0).as_safe_integer(), None);
        assert_eq!(Value::Number(f64::NAN).as_safe_integer(), None);
        assert_eq!(Value::from("42").as_safe_integer(), None);
    }

    #[test]
    fn primitive_strings() {
        assert_eq!(Value::symbol("tag").primitive_to_string().as_deref(), Some("Symbol(tag)"));
        assert_eq!(
            Value::function("boom").primitive_to_string().as_deref(),
            Some("function boom() { [native code] }")
        );
        assert_eq!(Value::Null.primitive_to_string(), None);
        assert_eq!(Value::Bool(false).primitive_to_string().as_deref(), Some("false"));
    }
}
