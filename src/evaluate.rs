use std::sync::Arc;

use tracing::{debug, trace};

use crate::types::condition::{ConditionKind, Junction, Quantifier, Reduction, ReductionKind};
use crate::types::options::EvalContext;
use crate::{CompareOp, DataModel, EvalOptions, EvalResult, NodeOutcome, Rule, StepCondition, Value};
use crate::types::function::Arg;

pub(crate) fn evaluate(rule: &Rule, model: &dyn DataModel, options: &EvalOptions) -> EvalResult {
    let ctx = options.resolve();
    let condition = eval_condition(rule.condition(), model, &ctx);
    let value = condition.is_true();
    debug!(
        rule = %rule.metadata(),
        value,
        short_circuit = ctx.short_circuit(),
        "rule evaluated"
    );
    let root = NodeOutcome::boolean(value, full(value), vec![condition]);
    EvalResult::new(value, Arc::clone(rule.metadata()), root)
}

fn full(value: bool) -> u8 {
    if value {
        100
    } else {
        0
    }
}

fn share(hits: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    u8::try_from(hits * 100 / total).unwrap_or(100)
}

pub(crate) fn eval_condition(
    cond: &StepCondition,
    model: &dyn DataModel,
    ctx: &EvalContext,
) -> NodeOutcome {
    match &cond.kind {
        ConditionKind::Predicate(probe) => {
            let value = probe(model, ctx);
            trace!(leaf = %cond.metadata(), value, "leaf evaluated");
            NodeOutcome::boolean(value, full(value), Vec::new())
        }
        ConditionKind::Not(inner) => {
            let child = eval_condition(inner, model, ctx);
            let value = !child.is_true();
            NodeOutcome::boolean(value, full(value), vec![child])
        }
        ConditionKind::Binary {
            junction,
            left,
            right,
        } => eval_junction(*junction, left, right, model, ctx),
        ConditionKind::Nary {
            quantifier,
            children,
        } => eval_quantifier(*quantifier, children, model, ctx),
        ConditionKind::Compare { op, left, right } => eval_compare(*op, left, right, model, ctx),
    }
}

fn eval_junction(
    junction: Junction,
    left: &StepCondition,
    right: &StepCondition,
    model: &dyn DataModel,
    ctx: &EvalContext,
) -> NodeOutcome {
    let l = eval_condition(left, model, ctx);
    // xor has no short-circuit form
    let decided = match junction {
        Junction::And => l.is_false(),
        Junction::Or => l.is_true(),
        Junction::Xor => false,
    };
    let r = if ctx.short_circuit() && decided {
        NodeOutcome::not_evaluated(right.metadata())
    } else {
        eval_condition(right, model, ctx)
    };
    let value = match junction {
        Junction::And => l.is_true() && r.is_true(),
        Junction::Or => l.is_true() || r.is_true(),
        Junction::Xor => l.is_true() != r.is_true(),
    };
    let percentage = match junction {
        Junction::And => share(usize::from(l.is_true()) + usize::from(r.is_true()), 2),
        Junction::Or | Junction::Xor => full(value),
    };
    NodeOutcome::boolean(value, percentage, vec![l, r])
}

fn eval_quantifier(
    quantifier: Quantifier,
    children: &[StepCondition],
    model: &dyn DataModel,
    ctx: &EvalContext,
) -> NodeOutcome {
    let mut outcomes = Vec::with_capacity(children.len());
    let mut decided = false;
    for child in children {
        if decided {
            outcomes.push(NodeOutcome::not_evaluated(child.metadata()));
            continue;
        }
        let outcome = eval_condition(child, model, ctx);
        decided = ctx.short_circuit()
            && match quantifier {
                Quantifier::Any | Quantifier::NoneOf => outcome.is_true(),
                Quantifier::All => !outcome.is_true(),
            };
        outcomes.push(outcome);
    }

    let hits = outcomes.iter().filter(|o| o.is_true()).count();
    let misses = outcomes.iter().filter(|o| o.is_false()).count();
    let total = outcomes.len();
    let (value, percentage) = match quantifier {
        Quantifier::Any => (hits > 0, full(hits > 0)),
        Quantifier::All => (hits == total, share(hits, total)),
        Quantifier::NoneOf => (hits == 0, share(misses, total)),
    };
    NodeOutcome::boolean(value, percentage, outcomes)
}

fn eval_compare(
    op: CompareOp,
    left: &Reduction,
    right: &Arg,
    model: &dyn DataModel,
    ctx: &EvalContext,
) -> NodeOutcome {
    let (reduced, reduced_outcome) = reduce(left, model, ctx);
    let operand = right.fetch(model, ctx);
    let value = match (&reduced, &operand) {
        (Some(a), Some(b)) => a.satisfies(op, b),
        _ => false,
    };
    NodeOutcome::boolean(
        value,
        full(value),
        vec![reduced_outcome, NodeOutcome::value(operand, Vec::new())],
    )
}

/// Fold a reduction into its value. Every child is evaluated: the value
/// depends on all of them.
fn reduce(
    reduction: &Reduction,
    model: &dyn DataModel,
    ctx: &EvalContext,
) -> (Option<Value>, NodeOutcome) {
    match &reduction.kind {
        ReductionKind::Count(conditions) => {
            let outcomes: Vec<NodeOutcome> = conditions
                .iter()
                .map(|c| eval_condition(c, model, ctx))
                .collect();
            let hits = outcomes.iter().filter(|o| o.is_true()).count();
            let value = Some(Value::Int(i64::try_from(hits).unwrap_or(i64::MAX)));
            (value.clone(), NodeOutcome::value(value, outcomes))
        }
        ReductionKind::Sum(functions) => {
            let values: Vec<Option<Value>> =
                functions.iter().map(|f| f.fetch(model, ctx)).collect();
            let value = sum_values(values.iter().flatten());
            (value.clone(), NodeOutcome::value(value, leaf_values(values)))
        }
        ReductionKind::Min(functions) => {
            let values: Vec<Option<Value>> =
                functions.iter().map(|f| f.fetch(model, ctx)).collect();
            let value = min_value(values.iter().flatten());
            (value.clone(), NodeOutcome::value(value, leaf_values(values)))
        }
    }
}

fn leaf_values(values: Vec<Option<Value>>) -> Vec<NodeOutcome> {
    values
        .into_iter()
        .map(|v| NodeOutcome::value(v, Vec::new()))
        .collect()
}

/// Integer sum while every operand is an integer, float sum otherwise.
/// Non-numeric values make the sum absent.
fn sum_values<'a>(values: impl Iterator<Item = &'a Value>) -> Option<Value> {
    let mut total = Value::Int(0);
    for value in values {
        total = match (&total, value) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a.checked_add(*b)?),
            _ => Value::Float(total.as_f64()? + value.as_f64()?),
        };
    }
    Some(total)
}

fn min_value<'a>(values: impl Iterator<Item = &'a Value>) -> Option<Value> {
    let mut smallest: Option<&Value> = None;
    for value in values {
        value.as_f64()?;
        smallest = match smallest {
            Some(current) if !value.satisfies(CompareOp::Lt, current) => Some(current),
            _ => Some(value),
        };
    }
    smallest.cloned()
}
