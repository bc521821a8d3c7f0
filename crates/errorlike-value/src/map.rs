use indexmap::IndexMap;

use crate::prelude_internal::*;

/// Own properties of an object in definition order.
#[derive(Debug, Clone, Default, Plural)]
#[plural(len, is_empty, iter, into_iter, into_iter_ref, new)]
pub struct PropertyMap(IndexMap<String, Property>);

impl FromIterator<(String, Property)> for PropertyMap {
    fn from_iter<T: IntoIterator<Item = (String, Property)>>(iter: T) -> Self {
        Self(IndexMap::from_iter(iter))
    }
}

impl PropertyMap {
    pub fn get(&self, key: &str) -> Option<&Property> {
        self.0.get(key)
    }

    /// Redefining an existing key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, property: Property) -> Option<Property> {
        self.0.insert(key.into(), property)
    }

    /// O(n) removal, preserves definition order.
    pub fn remove(&mut self, key: &str) -> Option<Property> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
