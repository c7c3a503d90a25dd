pub(crate) mod condition;
mod element;
mod error;
mod field;
pub(crate) mod function;
mod metadata;
mod model;
mod operator;
pub(crate) mod options;
mod outcome;
mod rule;
mod value;

pub use condition::{
    always_false, always_true, count, match_all, match_any, match_none, min, sum, Reduction,
    StepCondition,
};
pub use element::{Element, ElementType, Literal};
pub use error::GenerateError;
pub use field::{FieldId, FieldInfo, ValueType};
pub use function::{
    constant, field, first_day_of_this_month, first_day_of_this_year, last_day_of_this_month,
    last_day_of_this_year, today, today_minus, today_plus, Arg, Function,
};
pub use metadata::Metadata;
pub use model::{DataModel, FieldModel};
pub use operator::{Operator, TemporalUnit};
pub use options::{EvalContext, EvalOptions};
pub use outcome::{EvalResult, NodeOutcome, OutcomeState};
pub use rule::{when, Rule};
pub use value::{CompareOp, Value};
