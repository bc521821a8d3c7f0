#![doc = include_str!("../README.md")]

mod access;
mod classify;
mod collection;
mod config;
mod detail;
mod dispatch;
mod guard;
mod json;
mod stack;
mod string;
mod wrapper;


pub use access::{read_field, read_string_field, safe_stringify};
pub use classify::{FieldPlan, KNOWN_FIELDS, PlannedField};
pub use collection::ErrorLikeCollection;
pub use config::{Config, DEFAULT_PREFIX, ESCAPE_KEY, FALLBACK_MESSAGE};
pub use detail::{ErrorCode, ErrorDetail, ErrorLevel, ParseLevelError};
pub use dispatch::Branch;
pub use guard::CycleGuard;
pub use json::{JsonMap, error_detail_to_json, to_error_json, to_error_json_with_config};
pub use stack::{BacktraceCapture, NoStackCapture, StackCapture};
pub use string::{error_detail_to_string, to_error_string};
pub use wrapper::{
    create_error_base, create_error_like, create_error_like_with, ensure_error_like,
    ensure_error_like_with_config,
};

pub use errorlike_value as value;
pub use errorlike_value::{CollectionError, Heap, ObjectId, Value, WrapperId};

/// String and JSON rendering carried by error-like values.
pub trait ErrorLikeRender {
    fn to_error_string(&self, heap: &Heap) -> String;

    fn to_error_json(&self, heap: &Heap) -> JsonMap;
}

impl ErrorLikeRender for WrapperId {
    fn to_error_string(&self, heap: &Heap) -> String {
        to_error_string(heap, &Value::from(*self))
    }

    fn to_error_json(&self, heap: &Heap) -> JsonMap {
        to_error_json(heap, &Value::from(*self))
    }
}

impl ErrorLikeRender for ErrorLikeCollection {
    fn to_error_string(&self, heap: &Heap) -> String {
        to_error_string(heap, &Value::from(self))
    }

    fn to_error_json(&self, heap: &Heap) -> JsonMap {
        to_error_json(heap, &Value::from(self))
    }
}
