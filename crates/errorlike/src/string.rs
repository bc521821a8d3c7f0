use errorlike_value::{Heap, ObjectId, Value, WrapperId};

use crate::access::{read_field, read_stack, read_string_field, safe_stringify};
use crate::classify::{CAUSE, FieldPlan, PlannedField};
use crate::dispatch::Renderer;
use crate::guard::CycleGuard;

pub(crate) struct StringRenderer<'h> {
    heap: &'h Heap,
    guard: CycleGuard,
}

impl<'h> StringRenderer<'h> {
    pub(crate) fn new(heap: &'h Heap) -> Self {
        Self {
            heap,
            guard: CycleGuard::new(),
        }
    }

    /// Renders a nested value, `None` when it was already visited or renders
    /// to nothing.
    fn nested(&mut self, value: &Value) -> Option<String> {
        self.descend(value).filter(|text| !text.is_empty())
    }
}

impl<'h> Renderer<'h> for StringRenderer<'h> {
    type Output = String;

    fn heap(&self) -> &'h Heap {
        self.heap
    }

    fn guard(&mut self) -> &mut CycleGuard {
        &mut self.guard
    }

    fn render_detail(&mut self, id: ObjectId, plan: FieldPlan<'h>) -> String {
        let heap = self.heap;
        let mut lines = Vec::new();
        for field in plan.fields() {
            match field {
                PlannedField::Known(key) => {
                    if let Some(text) = read_string_field(heap, id, key) {
                        lines.push(format!("{key}: {text}"));
                    }
                }
                PlannedField::Remaining(key) => match read_field(heap, id, key) {
                    Some(value @ Value::Object(_)) => {
                        if let Some(text) = self.nested(&value) {
                            lines.push(format!("{key}: {text}"));
                        }
                    }
                    Some(value) => {
                        if let Some(text) = safe_stringify(heap, &value) {
                            lines.push(format!("{key}: {text}"));
                        }
                    }
                    None => {}
                },
                PlannedField::Stack => {
                    if let Some(stack) = read_stack(heap, id) {
                        lines.push(format!("stack:\n{stack}"));
                    }
                }
                PlannedField::Cause => {
                    if let Some(cause) = read_field(heap, id, CAUSE)
                        && let Some(text) = self.nested(&cause)
                    {
                        lines.push(format!("cause:\n{text}"));
                    }
                }
            }
        }
        lines.join("\n")
    }

    fn render_collection(&mut self, prefix: &'h str, items: &'h [WrapperId]) -> String {
        let mut blocks = Vec::new();
        for (index, item) in items.iter().enumerate() {
            if let Some(text) = self
                .descend_element(&Value::from(*item))
                .filter(|text| !text.is_empty())
            {
                blocks.push(format!("{prefix}.{index}:\n{text}"));
            }
        }
        blocks.join("\n")
    }

    fn render_native_error(&mut self, id: ObjectId) -> String {
        match self.heap.get_object(id) {
            Some(object) => self.render_detail(id, FieldPlan::for_native_error(object)),
            None => String::new(),
        }
    }

    fn render_primitive(&mut self, value: &Value) -> String {
        safe_stringify(self.heap, value).unwrap_or_default()
    }

    fn nothing(&mut self) -> String {
        String::new()
    }
}

/// Renders any value to `field: value` lines. Never panics; unrenderable
/// input gives an empty string.
pub fn to_error_string(heap: &Heap, value: &Value) -> String {
    StringRenderer::new(heap).descend(value).unwrap_or_default()
}

/// Renders the own fields of a structured detail, whatever its kind.
pub fn error_detail_to_string(heap: &Heap, id: ObjectId) -> String {
    let Some(object) = heap.get_object(id) else {
        return String::new();
    };
    let mut renderer = StringRenderer::new(heap);
    renderer.guard.enter(id);
    renderer.render_detail(id, FieldPlan::for_detail(object))
}
