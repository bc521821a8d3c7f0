use std::backtrace::{Backtrace, BacktraceStatus};

use errorlike_value::{Heap, ObjectId};
use tracing::trace;

use crate::access::error_header;

/// Writes a `stack` string onto an object, best effort. Implementations must
/// not panic and should do nothing when no trace is available.
pub trait StackCapture {
    fn capture(&self, heap: &mut Heap, target: ObjectId);
}

impl<F> StackCapture for F
where
    F: Fn(&mut Heap, ObjectId),
{
    fn capture(&self, heap: &mut Heap, target: ObjectId) {
        self(heap, target)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoStackCapture;

impl StackCapture for NoStackCapture {
    fn capture(&self, _heap: &mut Heap, _target: ObjectId) {}
}

/// Captures the current thread's backtrace. Honors `RUST_BACKTRACE` /
/// `RUST_LIB_BACKTRACE`; when capturing is disabled nothing is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceCapture;

impl StackCapture for BacktraceCapture {
    fn capture(&self, heap: &mut Heap, target: ObjectId) {
        if heap.get_object(target).is_none() {
            return;
        }
        let backtrace = Backtrace::capture();
        if backtrace.status() != BacktraceStatus::Captured {
            trace!(object = target.0, "backtrace capture unavailable");
            return;
        }
        let header = error_header(heap, target);
        heap.object_mut(target)
            .set("stack", format!("{header}\n{backtrace}"));
    }
}
