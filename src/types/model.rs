use std::collections::HashMap;

use super::field::FieldId;
use super::value::Value;

/// Keyed store a rule reads its field values from.
///
/// A missing binding is reported as `None`; rules treat it as absence, never
/// as an error.
pub trait DataModel {
    fn get(&self, id: &FieldId) -> Option<Value>;
    fn set(&mut self, id: FieldId, value: Value);
}

/// In-memory [`DataModel`] backed by a hash map.
#[derive(Debug, Clone, Default)]
pub struct FieldModel {
    data: HashMap<FieldId, Value>,
}

impl FieldModel {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value to a field, builder style.
    #[must_use]
    pub fn with(mut self, id: impl Into<FieldId>, value: impl Into<Value>) -> Self {
        self.insert(id, value.into());
        self
    }

    /// Bind a value to a field (mutable reference version).
    pub fn insert(&mut self, id: impl Into<FieldId>, value: Value) {
        self.data.insert(id.into(), value);
    }

    /// Drop the binding of a field, returning its previous value.
    pub fn remove(&mut self, id: &FieldId) -> Option<Value> {
        self.data.remove(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl DataModel for FieldModel {
    fn get(&self, id: &FieldId) -> Option<Value> {
        self.data.get(id).cloned()
    }

    fn set(&mut self, id: FieldId, value: Value) {
        self.data.insert(id, value);
    }
}
