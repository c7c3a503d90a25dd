use std::fmt;

/// Opaque, stable identifier of a data-model field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(String);

impl FieldId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for FieldId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared type of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Integer,
    Float,
    Boolean,
    String,
    Date,
    /// A collection; the element type is given by [`FieldInfo::generic_types`].
    List,
}

impl ValueType {
    /// Whether script literals of this type are written between quotes.
    #[must_use]
    pub fn is_quoted(self) -> bool {
        matches!(self, ValueType::String | ValueType::Date)
    }
}

/// Static description of a field: identity, label, declared type.
///
/// ```
/// use rulecraft::{FieldInfo, ValueType};
///
/// let tags = FieldInfo::new("user.tags", ValueType::List)
///     .readable("tags")
///     .generic(ValueType::String);
/// assert!(tags.is_iterable());
/// assert_eq!(tags.label(), "tags");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    id: FieldId,
    readable: String,
    value_type: ValueType,
    generic_types: Vec<ValueType>,
    siblings: Vec<FieldId>,
}

impl FieldInfo {
    /// Create a field whose readable label defaults to its id.
    #[must_use]
    pub fn new(id: impl Into<FieldId>, value_type: ValueType) -> Self {
        let id = id.into();
        Self {
            readable: id.as_str().to_owned(),
            id,
            value_type,
            generic_types: Vec::new(),
            siblings: Vec::new(),
        }
    }

    #[must_use]
    pub fn readable(mut self, label: impl Into<String>) -> Self {
        self.readable = label.into();
        self
    }

    #[must_use]
    pub fn generic(mut self, element_type: ValueType) -> Self {
        self.generic_types.push(element_type);
        self
    }

    /// Declare a field whose value must be kept consistent with this one.
    #[must_use]
    pub fn sibling(mut self, id: impl Into<FieldId>) -> Self {
        self.siblings.push(id.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &FieldId {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.readable
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    #[must_use]
    pub fn generic_types(&self) -> &[ValueType] {
        &self.generic_types
    }

    #[must_use]
    pub fn siblings(&self) -> &[FieldId] {
        &self.siblings
    }

    #[must_use]
    pub fn is_iterable(&self) -> bool {
        self.value_type == ValueType::List
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_defaults_to_id() {
        let info = FieldInfo::new("user.age", ValueType::Integer);
        assert_eq!(info.label(), "user.age");
        assert_eq!(info.id(), &FieldId::from("user.age"));
        assert!(!info.is_iterable());
    }

    #[test]
    fn builder_methods() {
        let info = FieldInfo::new("price", ValueType::Float)
            .readable("price")
            .sibling("currency")
            .sibling("unit");
        assert_eq!(info.siblings(), &[FieldId::from("currency"), FieldId::from("unit")]);
        assert!(info.generic_types().is_empty());
    }

    #[test]
    fn quoted_types() {
        assert!(ValueType::String.is_quoted());
        assert!(ValueType::Date.is_quoted());
        assert!(!ValueType::Integer.is_quoted());
        assert!(!ValueType::Boolean.is_quoted());
        assert!(!ValueType::List.is_quoted());
    }
}
