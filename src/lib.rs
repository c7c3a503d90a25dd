//! Business rules built from typed combinators.
//!
//! A [`Rule`] can be evaluated against a [`DataModel`], yielding an
//! [`EvalResult`] with per-node evidence, or lowered to a JavaScript
//! condition statement with [`Rule::write_script`]. Both backends read the
//! same immutable [`Metadata`] tree; other consumers walk it through
//! [`Visitor`] and [`browse`].

mod codegen;
mod error;
mod evaluate;
mod report;
#[cfg(feature = "binary-cache")]
pub mod serial;
pub mod temporal;
mod types;
mod visit;

pub use codegen::{lower, script_bindings, write_rule, ScriptGenerator};
pub use error::RulecraftError;
pub use report::{render_report, EnglishLabels, Labels};
pub use types::{
    always_false, always_true, constant, count, field, first_day_of_this_month,
    first_day_of_this_year, last_day_of_this_month, last_day_of_this_year, match_all, match_any,
    match_none, min, sum, today, today_minus, today_plus, when, Arg, CompareOp, DataModel,
    Element, ElementType, EvalContext, EvalOptions, EvalResult, FieldId, FieldInfo, FieldModel,
    Function, GenerateError, Literal, Metadata, NodeOutcome, Operator, OutcomeState, Reduction,
    Rule, StepCondition, TemporalUnit, Value, ValueType,
};
pub use visit::{browse, Visitor};
