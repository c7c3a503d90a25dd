use std::fmt;

use super::operator::{Operator, TemporalUnit};
use super::value::Value;

/// Literal payload of a [`Element::Value`] token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    /// A number or boolean, written bare.
    Single(String),
    /// Text or a date, always written quoted even when it reads as a number.
    Text(String),
    /// A set of values, e.g. the allowed values of a membership test.
    Many(Vec<Literal>),
}

impl Literal {
    #[must_use]
    pub fn is_many(&self) -> bool {
        matches!(self, Literal::Many(_))
    }
}

impl From<&Value> for Literal {
    fn from(value: &Value) -> Self {
        match value {
            Value::List(items) => Literal::Many(items.iter().map(Literal::from).collect()),
            Value::String(_) | Value::Date(_) => Literal::Text(value.plain_text()),
            Value::Float(v) if v.is_nan() => Literal::Single("NaN".to_owned()),
            Value::Float(v) if v.is_infinite() => {
                let sign = if v.is_sign_negative() { "-" } else { "" };
                Literal::Single(format!("{sign}Infinity"))
            }
            other => Literal::Single(other.plain_text()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Single(text) | Literal::Text(text) => f.write_str(text),
            Literal::Many(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// One token of a leaf condition.
///
/// A leaf carries its operator and operands flattened in the order the rule
/// was written: `userbd plus 2 years age_at today eq 0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    Operator(Operator),
    /// A data-model field, referenced by its readable label.
    Field { label: String, iterable: bool },
    Value(Literal),
    /// A string literal consumed as-is by text operators.
    StringValue(String),
    TemporalUnit(TemporalUnit),
    ParenthesisLeft,
    ParenthesisRight,
    /// A token no backend knows how to interpret.
    Unknown(String),
}

/// Tag of an [`Element`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Operator,
    Field,
    Value,
    StringValue,
    TemporalUnit,
    ParenthesisLeft,
    ParenthesisRight,
    Unknown,
}

impl Element {
    #[must_use]
    pub fn field(label: impl Into<String>, iterable: bool) -> Self {
        Element::Field {
            label: label.into(),
            iterable,
        }
    }

    #[must_use]
    pub fn value(value: &Value) -> Self {
        Element::Value(Literal::from(value))
    }

    #[must_use]
    pub fn string(text: impl Into<String>) -> Self {
        Element::StringValue(text.into())
    }

    #[must_use]
    pub fn kind(&self) -> ElementType {
        match self {
            Element::Operator(_) => ElementType::Operator,
            Element::Field { .. } => ElementType::Field,
            Element::Value(_) => ElementType::Value,
            Element::StringValue(_) => ElementType::StringValue,
            Element::TemporalUnit(_) => ElementType::TemporalUnit,
            Element::ParenthesisLeft => ElementType::ParenthesisLeft,
            Element::ParenthesisRight => ElementType::ParenthesisRight,
            Element::Unknown(_) => ElementType::Unknown,
        }
    }

    #[must_use]
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Element::Operator(op) => Some(*op),
            _ => None,
        }
    }

    /// Whether the token denotes a collection rather than a single value.
    #[must_use]
    pub fn is_iterable(&self) -> bool {
        match self {
            Element::Field { iterable, .. } => *iterable,
            Element::Value(literal) => literal.is_many(),
            _ => false,
        }
    }

    /// Human-readable text of the token.
    #[must_use]
    pub fn readable(&self) -> String {
        match self {
            Element::Operator(op) => op.readable().to_owned(),
            Element::Field { label, .. } => label.clone(),
            Element::Value(literal) => literal.to_string(),
            Element::StringValue(text) => format!("'{text}'"),
            Element::TemporalUnit(unit) => unit.name().to_owned(),
            Element::ParenthesisLeft => "(".to_owned(),
            Element::ParenthesisRight => ")".to_owned(),
            Element::Unknown(text) => text.clone(),
        }
    }
}

impl From<Operator> for Element {
    fn from(op: Operator) -> Self {
        Element::Operator(op)
    }
}

impl From<TemporalUnit> for Element {
    fn from(unit: TemporalUnit) -> Self {
        Element::TemporalUnit(unit)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.readable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(Element::from(Operator::Plus).kind(), ElementType::Operator);
        assert_eq!(Element::field("age", false).kind(), ElementType::Field);
        assert_eq!(Element::value(&Value::Int(3)).kind(), ElementType::Value);
        assert_eq!(Element::string("x").kind(), ElementType::StringValue);
        assert_eq!(
            Element::from(TemporalUnit::Years).kind(),
            ElementType::TemporalUnit
        );
        assert_eq!(Element::Unknown("?".into()).kind(), ElementType::Unknown);
    }

    #[test]
    fn list_values_are_iterable() {
        let many = Element::value(&Value::from(vec!["a", "b"]));
        assert_eq!(
            many,
            Element::Value(Literal::Many(vec![
                Literal::Text("a".into()),
                Literal::Text("b".into())
            ]))
        );
        assert!(many.is_iterable());
        assert!(!Element::value(&Value::from("a")).is_iterable());
        assert!(Element::field("tags", true).is_iterable());
    }

    #[test]
    fn equality_is_by_payload() {
        assert_eq!(Element::field("age", false), Element::field("age", false));
        assert_ne!(Element::field("age", false), Element::field("age", true));
        assert_ne!(
            Element::from(Operator::Plus),
            Element::from(Operator::Minus)
        );
    }

    #[test]
    fn literals_keep_their_value_type() {
        assert_eq!(Literal::from(&Value::from("3.0")), Literal::Text("3.0".into()));
        assert_eq!(Literal::from(&Value::from("true")), Literal::Text("true".into()));
        assert_eq!(Literal::from(&Value::Int(3)), Literal::Single("3".into()));
        assert_eq!(Literal::from(&Value::Bool(true)), Literal::Single("true".into()));
        assert_eq!(
            Literal::from(&Value::Float(f64::NEG_INFINITY)),
            Literal::Single("-Infinity".into())
        );
        let mixed = Literal::from(&Value::List(vec![Value::Int(1), Value::from("1")]));
        assert_eq!(
            mixed,
            Literal::Many(vec![Literal::Single("1".into()), Literal::Text("1".into())])
        );
        assert_eq!(mixed.to_string(), "[1, 1]");
    }

    #[test]
    fn readable_text() {
        let tokens = [
            Element::field("userbd", false),
            Element::from(Operator::Plus),
            Element::value(&Value::Int(2)),
            Element::from(TemporalUnit::Years),
            Element::from(Operator::AgeAt),
            Element::string("abc"),
        ];
        let text: Vec<String> = tokens.iter().map(Element::readable).collect();
        assert_eq!(text.join(" "), "userbd plus 2 years age at 'abc'");
    }
}
