use errorlike_value::{Heap, Object, ObjectId, ObjectKind, Value, WrapperId};

use crate::classify::FieldPlan;
use crate::guard::CycleGuard;

/// How a value is rendered. Tested in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// Carries the marker, or is an error instance delegating to its detail.
    ErrorLike(WrapperId),
    Collection(ObjectId),
    NativeError(ObjectId),
    Plain(ObjectId),
    Primitive,
    /// `undefined`, `null`, or an id the heap does not know.
    Absent,
}

impl Branch {
    pub fn of(heap: &Heap, value: &Value) -> Self {
        if value.is_nullish() {
            return Branch::Absent;
        }
        let Value::Object(id) = *value else {
            return Branch::Primitive;
        };
        if let Some(wrapper) = heap.as_wrapper(id) {
            return Branch::ErrorLike(wrapper);
        }
        match heap.get_object(id).map(Object::kind) {
            None => Branch::Absent,
            Some(ObjectKind::ErrorBase { detail }) => Branch::ErrorLike(*detail),
            Some(ObjectKind::Collection(_)) => Branch::Collection(id),
            Some(ObjectKind::NativeError) => Branch::NativeError(id),
            Some(ObjectKind::Plain | ObjectKind::Array | ObjectKind::ErrorLike) => {
                Branch::Plain(id)
            }
        }
    }
}

/// One output format. The dispatch table and guarded recursion are shared;
/// implementors only say how each branch is encoded.
pub(crate) trait Renderer<'h> {
    type Output;

    fn heap(&self) -> &'h Heap;

    fn guard(&mut self) -> &mut CycleGuard;

    fn render_detail(&mut self, id: ObjectId, plan: FieldPlan<'h>) -> Self::Output;

    fn render_collection(&mut self, prefix: &'h str, items: &'h [WrapperId]) -> Self::Output;

    fn render_native_error(&mut self, id: ObjectId) -> Self::Output;

    fn render_primitive(&mut self, value: &Value) -> Self::Output;

    fn nothing(&mut self) -> Self::Output;

    fn render_object(&mut self, id: ObjectId) -> Self::Output {
        match self.heap().get_object(id) {
            Some(object) => self.render_detail(id, FieldPlan::for_detail(object)),
            None => self.nothing(),
        }
    }

    fn dispatch(&mut self, value: &Value) -> Self::Output {
        let heap = self.heap();
        match Branch::of(heap, value) {
            Branch::ErrorLike(wrapper) => self.render_object(wrapper.object_id()),
            Branch::Collection(id) => match heap.collection(id) {
                Some(collection) => self.render_collection(collection.prefix(), collection.items()),
                None => self.nothing(),
            },
            Branch::NativeError(id) => self.render_native_error(id),
            Branch::Plain(id) => self.render_object(id),
            Branch::Primitive => self.render_primitive(value),
            Branch::Absent => self.nothing(),
        }
    }

    /// Dispatches `value` unless it is an object already visited in this
    /// render. Primitives are never guarded.
    fn descend(&mut self, value: &Value) -> Option<Self::Output> {
        if let Value::Object(id) = value {
            if !self.guard().enter(*id) {
                return None;
            }
            // An error instance and its detail are one node of the graph.
            if let Branch::ErrorLike(wrapper) = Branch::of(self.heap(), value)
                && wrapper.object_id() != *id
                && !self.guard().enter(wrapper.object_id())
            {
                return None;
            }
        }
        Some(self.dispatch(value))
    }

    /// Like [`descend`](Self::descend), but whatever the element visits is
    /// forgotten afterwards. Siblings of one collection see only their
    /// ancestors, so a repeated element is rendered at every index.
    fn descend_element(&mut self, value: &Value) -> Option<Self::Output> {
        let ancestors = self.guard().clone();
        let rendered = self.descend(value);
        *self.guard() = ancestors;
        rendered
    }
}
