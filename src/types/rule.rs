use std::io::Write;
use std::sync::Arc;

use super::condition::StepCondition;
use super::error::GenerateError;
use super::metadata::Metadata;
use super::model::DataModel;
use super::options::EvalOptions;
use super::outcome::EvalResult;

/// A condition guarded by `when`: the unit that is evaluated or lowered to
/// script as a whole.
///
/// ```
/// use rulecraft::{field, when, FieldInfo, FieldModel, ValueType};
///
/// let age = FieldInfo::new("user.age", ValueType::Integer).readable("age");
/// let rule = when(field(&age).gte(18_i64));
///
/// let model = FieldModel::new().with("user.age", 21_i64);
/// assert!(rule.evaluate(&model).value());
/// ```
#[derive(Debug, Clone)]
pub struct Rule {
    metadata: Arc<Metadata>,
    condition: StepCondition,
}

/// Wrap a condition into a [`Rule`].
#[must_use]
pub fn when(condition: StepCondition) -> Rule {
    Rule {
        metadata: Metadata::when(Arc::clone(condition.metadata())),
        condition,
    }
}

impl Rule {
    /// The rule tree, rooted at its `when` node.
    #[must_use]
    pub fn metadata(&self) -> &Arc<Metadata> {
        &self.metadata
    }

    #[must_use]
    pub fn condition(&self) -> &StepCondition {
        &self.condition
    }

    /// Evaluate with default options: short-circuit on, today from the local clock.
    pub fn evaluate(&self, model: &dyn DataModel) -> EvalResult {
        crate::evaluate::evaluate(self, model, &EvalOptions::default())
    }

    pub fn evaluate_with(&self, model: &dyn DataModel, options: &EvalOptions) -> EvalResult {
        crate::evaluate::evaluate(self, model, options)
    }

    /// Write the rule as `if( <expr> ){ true; } else { false; }`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] when the tree is malformed or the sink fails.
    pub fn write_script<W: Write>(&self, sink: W) -> Result<(), GenerateError> {
        crate::codegen::write_rule(&self.metadata, sink)
    }

    /// The script statement as a string.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] when the tree is malformed.
    pub fn to_script(&self) -> Result<String, GenerateError> {
        let mut out = Vec::new();
        self.write_script(&mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{always_true, FieldModel};

    #[test]
    fn when_wraps_condition_metadata() {
        let cond = always_true("a");
        let rule = when(cond.clone());
        assert_eq!(*rule.metadata().as_ref(), Metadata::When(Arc::clone(cond.metadata())));
    }

    #[test]
    fn to_script_wraps_expression() {
        let rule = when(always_true("a"));
        assert_eq!(rule.to_script().unwrap(), "if( true ){ true; } else { false; }");
        assert!(rule.evaluate(&FieldModel::new()).value());
    }
}
