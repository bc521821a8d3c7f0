use ahash::AHashSet;
use errorlike_value::ObjectId;
use tracing::debug;

/// Objects already descended into during one top-level render.
#[derive(Debug, Clone, Default)]
pub struct CycleGuard {
    visited: AHashSet<ObjectId>,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` and returns `true` the first time it is seen.
    pub fn enter(&mut self, id: ObjectId) -> bool {
        let fresh = self.visited.insert(id);
        if !fresh {
            debug!(object = id.0, "circular reference skipped");
        }
        fresh
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_entry_is_rejected() {
        let mut guard = CycleGuard::new();
        assert!(guard.enter(ObjectId(3)));
        assert!(!guard.enter(ObjectId(3)));
        assert!(guard.enter(ObjectId(4)));
        assert_eq!(guard.len(), 2);
    }
}
