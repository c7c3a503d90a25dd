use std::fmt;
use std::ops::Not;
use std::sync::Arc;

use super::element::{Element, Literal};
use super::function::{Arg, Function};
use super::metadata::Metadata;
use super::model::DataModel;
use super::operator::Operator;
use super::options::EvalContext;
use super::value::CompareOp;

pub(crate) type Probe = Arc<dyn Fn(&dyn DataModel, &EvalContext) -> bool + Send + Sync>;

pub(crate) fn probe<F>(f: F) -> Probe
where
    F: Fn(&dyn DataModel, &EvalContext) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Boolean combinator of a binary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Junction {
    And,
    Or,
    Xor,
}

impl Junction {
    fn operator(self) -> Operator {
        match self {
            Junction::And => Operator::And,
            Junction::Or => Operator::Or,
            Junction::Xor => Operator::Xor,
        }
    }
}

/// Quantifier of a boolean n-ary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quantifier {
    Any,
    All,
    NoneOf,
}

impl Quantifier {
    fn operator(self) -> Operator {
        match self {
            Quantifier::Any => Operator::MatchAny,
            Quantifier::All => Operator::MatchAll,
            Quantifier::NoneOf => Operator::MatchNone,
        }
    }
}

#[derive(Clone)]
pub(crate) enum ConditionKind {
    Predicate(Probe),
    Not(Box<StepCondition>),
    Binary {
        junction: Junction,
        left: Box<StepCondition>,
        right: Box<StepCondition>,
    },
    Nary {
        quantifier: Quantifier,
        children: Vec<StepCondition>,
    },
    Compare {
        op: CompareOp,
        left: Reduction,
        right: Arg,
    },
}

/// An evaluable condition paired with the rule-tree node it was built from.
///
/// Conditions are immutable and `Send + Sync`; combinators return new
/// conditions and never touch their operands.
#[derive(Clone)]
pub struct StepCondition {
    metadata: Arc<Metadata>,
    pub(crate) kind: ConditionKind,
}

impl fmt::Debug for StepCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepCondition")
            .field("metadata", &self.metadata.to_string())
            .finish_non_exhaustive()
    }
}

impl StepCondition {
    pub(crate) fn predicate(metadata: Arc<Metadata>, probe: Probe) -> Self {
        Self {
            metadata,
            kind: ConditionKind::Predicate(probe),
        }
    }

    #[must_use]
    pub fn metadata(&self) -> &Arc<Metadata> {
        &self.metadata
    }

    fn junction(self, junction: Junction, other: StepCondition) -> StepCondition {
        StepCondition {
            metadata: Metadata::binary(
                junction.operator(),
                Arc::clone(&self.metadata),
                Arc::clone(&other.metadata),
            ),
            kind: ConditionKind::Binary {
                junction,
                left: Box::new(self),
                right: Box::new(other),
            },
        }
    }

    #[must_use]
    pub fn and(self, other: StepCondition) -> StepCondition {
        self.junction(Junction::And, other)
    }

    #[must_use]
    pub fn or(self, other: StepCondition) -> StepCondition {
        self.junction(Junction::Or, other)
    }

    #[must_use]
    pub fn xor(self, other: StepCondition) -> StepCondition {
        self.junction(Junction::Xor, other)
    }
}

impl Not for StepCondition {
    type Output = StepCondition;

    fn not(self) -> StepCondition {
        StepCondition {
            metadata: Metadata::not(Arc::clone(&self.metadata)),
            kind: ConditionKind::Not(Box::new(self)),
        }
    }
}

fn labelled(op: Operator, label: &str, result: bool) -> StepCondition {
    StepCondition::predicate(
        Metadata::leaf(vec![
            Element::from(op),
            Element::Value(Literal::Text(label.to_owned())),
        ]),
        probe(move |_: &dyn DataModel, _: &EvalContext| result),
    )
}

/// A condition that always holds, shown in reports under `label`.
#[must_use]
pub fn always_true(label: &str) -> StepCondition {
    labelled(Operator::AlwaysTrue, label, true)
}

/// A condition that never holds, shown in reports under `label`.
#[must_use]
pub fn always_false(label: &str) -> StepCondition {
    labelled(Operator::AlwaysFalse, label, false)
}

fn quantified(quantifier: Quantifier, conditions: Vec<StepCondition>) -> StepCondition {
    let children = conditions.iter().map(|c| Arc::clone(&c.metadata)).collect();
    StepCondition {
        metadata: Metadata::nary(quantifier.operator(), children),
        kind: ConditionKind::Nary {
            quantifier,
            children: conditions,
        },
    }
}

/// True when at least one condition holds.
#[must_use]
pub fn match_any(conditions: Vec<StepCondition>) -> StepCondition {
    quantified(Quantifier::Any, conditions)
}

/// True when every condition holds.
#[must_use]
pub fn match_all(conditions: Vec<StepCondition>) -> StepCondition {
    quantified(Quantifier::All, conditions)
}

/// True when no condition holds.
#[must_use]
pub fn match_none(conditions: Vec<StepCondition>) -> StepCondition {
    quantified(Quantifier::NoneOf, conditions)
}

#[derive(Debug, Clone)]
pub(crate) enum ReductionKind {
    Count(Vec<StepCondition>),
    Sum(Vec<Function>),
    Min(Vec<Function>),
}

/// A number folded from several children, only usable through a comparison.
#[derive(Debug, Clone)]
pub struct Reduction {
    metadata: Arc<Metadata>,
    pub(crate) kind: ReductionKind,
}

/// Number of conditions that hold.
#[must_use]
pub fn count(conditions: Vec<StepCondition>) -> Reduction {
    let children = conditions.iter().map(|c| Arc::clone(&c.metadata)).collect();
    Reduction {
        metadata: Metadata::nary(Operator::Count, children),
        kind: ReductionKind::Count(conditions),
    }
}

/// Sum of the present values.
#[must_use]
pub fn sum(functions: Vec<Function>) -> Reduction {
    Reduction {
        metadata: Metadata::nary(Operator::Sum, functions.iter().map(Function::metadata).collect()),
        kind: ReductionKind::Sum(functions),
    }
}

/// Smallest of the present values.
#[must_use]
pub fn min(functions: Vec<Function>) -> Reduction {
    Reduction {
        metadata: Metadata::nary(Operator::Min, functions.iter().map(Function::metadata).collect()),
        kind: ReductionKind::Min(functions),
    }
}

impl Reduction {
    #[must_use]
    pub fn metadata(&self) -> &Arc<Metadata> {
        &self.metadata
    }

    fn compare(self, op: CompareOp, arg: impl Into<Arg>) -> StepCondition {
        let right = arg.into();
        StepCondition {
            metadata: Metadata::binary(
                op.operator(),
                Arc::clone(&self.metadata),
                Metadata::leaf(right.elements()),
            ),
            kind: ConditionKind::Compare {
                op,
                left: self,
                right,
            },
        }
    }

    #[must_use]
    pub fn eq(self, arg: impl Into<Arg>) -> StepCondition {
        self.compare(CompareOp::Eq, arg)
    }

    #[must_use]
    pub fn not_eq(self, arg: impl Into<Arg>) -> StepCondition {
        self.compare(CompareOp::Neq, arg)
    }

    #[must_use]
    pub fn gt(self, arg: impl Into<Arg>) -> StepCondition {
        self.compare(CompareOp::Gt, arg)
    }

    #[must_use]
    pub fn gte(self, arg: impl Into<Arg>) -> StepCondition {
        self.compare(CompareOp::Gte, arg)
    }

    #[must_use]
    pub fn lt(self, arg: impl Into<Arg>) -> StepCondition {
        self.compare(CompareOp::Lt, arg)
    }

    #[must_use]
    pub fn lte(self, arg: impl Into<Arg>) -> StepCondition {
        self.compare(CompareOp::Lte, arg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant;

    #[test]
    fn combinators_build_matching_metadata() {
        let cond = always_true("a").and(always_false("b")).or(!always_true("c"));
        let Metadata::Binary { op, left, right } = cond.metadata().as_ref() else {
            panic!("expected binary node");
        };
        assert_eq!(*op, Operator::Or);
        assert_eq!(left.operator(), Some(Operator::And));
        assert_eq!(right.operator(), Some(Operator::Not));
    }

    #[test]
    fn nary_children_follow_argument_order() {
        let cond = match_none(vec![always_true("a"), always_false("b")]);
        let Metadata::Nary { op, children } = cond.metadata().as_ref() else {
            panic!("expected n-ary node");
        };
        assert_eq!(*op, Operator::MatchNone);
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].operator(), Some(Operator::AlwaysFalse));
    }

    #[test]
    fn reduction_comparison_is_a_binary_node() {
        let cond = sum(vec![constant(1_i64), constant(2_i64)]).gte(3_i64);
        let Metadata::Binary { op, left, right } = cond.metadata().as_ref() else {
            panic!("expected binary node");
        };
        assert_eq!(*op, Operator::GreaterOrEquals);
        assert_eq!(left.operator(), Some(Operator::Sum));
        assert_eq!(**right, Metadata::Leaf(vec![Element::value(&3_i64.into())]));
    }

    #[test]
    fn conditions_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StepCondition>();
        assert_send_sync::<Reduction>();
    }
}
