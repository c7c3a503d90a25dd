use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use regex::Regex;
use tracing::warn;

use super::condition::{probe, StepCondition};
use super::element::{Element, Literal};
use super::field::FieldInfo;
use super::metadata::Metadata;
use super::model::DataModel;
use super::operator::{Operator, TemporalUnit};
use super::options::EvalContext;
use super::value::{CompareOp, Value};
use crate::temporal;

pub(crate) type Getter =
    Arc<dyn Fn(&dyn DataModel, &EvalContext) -> Option<Value> + Send + Sync>;

fn getter<F>(f: F) -> Getter
where
    F: Fn(&dyn DataModel, &EvalContext) -> Option<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A value computed from the data model, such as a field, a constant or a
/// date derived from `today`.
///
/// Every method appends its tokens to the function's leaf, so
/// `field(&birth).plus(2, TemporalUnit::Years)` reads as
/// `birth plus 2 years`. Condition methods close the leaf and return a
/// [`StepCondition`].
#[derive(Clone)]
pub struct Function {
    elements: Vec<Element>,
    getter: Getter,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("elements", &self.elements)
            .finish_non_exhaustive()
    }
}

/// Right-hand side of a comparison: a constant or another [`Function`].
#[derive(Debug, Clone)]
pub enum Arg {
    Value(Value),
    Function(Function),
}

impl Arg {
    pub(crate) fn elements(&self) -> Vec<Element> {
        match self {
            Arg::Value(value) => vec![Element::value(value)],
            Arg::Function(function) => function.elements.clone(),
        }
    }

    /// Tokens of the argument, parenthesised when it is itself a computation
    /// so the operator before it applies to the whole result.
    pub(crate) fn grouped_elements(&self) -> Vec<Element> {
        match self {
            Arg::Function(function) if function.elements.len() > 1 => {
                let mut elements = Vec::with_capacity(function.elements.len() + 2);
                elements.push(Element::ParenthesisLeft);
                elements.extend(function.elements.iter().cloned());
                elements.push(Element::ParenthesisRight);
                elements
            }
            _ => self.elements(),
        }
    }

    pub(crate) fn fetch(&self, model: &dyn DataModel, ctx: &EvalContext) -> Option<Value> {
        match self {
            Arg::Value(value) => Some(value.clone()),
            Arg::Function(function) => function.fetch(model, ctx),
        }
    }
}

impl From<Function> for Arg {
    fn from(function: Function) -> Self {
        Arg::Function(function)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::Value(Value::Int(v))
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Arg::Value(Value::from(v))
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Value(Value::Float(v))
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Value(Value::Bool(v))
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Value(Value::from(v))
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Value(Value::String(v))
    }
}

impl From<NaiveDate> for Arg {
    fn from(v: NaiveDate) -> Self {
        Arg::Value(Value::Date(v))
    }
}

/// Reference a data-model field.
#[must_use]
pub fn field(info: &FieldInfo) -> Function {
    let id = info.id().clone();
    Function::new(
        vec![Element::field(info.label(), info.is_iterable())],
        getter(move |model: &dyn DataModel, _: &EvalContext| model.get(&id)),
    )
}

/// A fixed value.
#[must_use]
pub fn constant(value: impl Into<Value>) -> Function {
    let value = value.into();
    Function::new(
        vec![Element::value(&value)],
        getter(move |_: &dyn DataModel, _: &EvalContext| Some(value.clone())),
    )
}

fn date_producer(op: Operator, f: fn(NaiveDate) -> Option<NaiveDate>) -> Function {
    Function::new(
        vec![Element::from(op)],
        getter(move |_: &dyn DataModel, ctx: &EvalContext| f(ctx.today()).map(Value::Date)),
    )
}

/// The evaluation date, see [`EvalOptions::today`](crate::EvalOptions::today).
#[must_use]
pub fn today() -> Function {
    date_producer(Operator::Today, Some)
}

#[must_use]
pub fn first_day_of_this_month() -> Function {
    date_producer(Operator::FirstDayOfThisMonth, |d| {
        Some(temporal::first_day_of_month(d))
    })
}

#[must_use]
pub fn first_day_of_this_year() -> Function {
    date_producer(Operator::FirstDayOfThisYear, temporal::first_day_of_year)
}

#[must_use]
pub fn last_day_of_this_month() -> Function {
    date_producer(Operator::LastDayOfThisMonth, temporal::last_day_of_month)
}

#[must_use]
pub fn last_day_of_this_year() -> Function {
    date_producer(Operator::LastDayOfThisYear, temporal::last_day_of_year)
}

#[must_use]
pub fn today_plus(amount: i64, unit: TemporalUnit) -> Function {
    Function::new(
        vec![
            Element::from(Operator::TodayPlus),
            Element::value(&Value::Int(amount)),
            Element::from(unit),
        ],
        getter(move |_: &dyn DataModel, ctx: &EvalContext| {
            temporal::shift(ctx.today(), amount, unit).map(Value::Date)
        }),
    )
}

#[must_use]
pub fn today_minus(amount: i64, unit: TemporalUnit) -> Function {
    Function::new(
        vec![
            Element::from(Operator::TodayMinus),
            Element::value(&Value::Int(amount)),
            Element::from(unit),
        ],
        getter(move |_: &dyn DataModel, ctx: &EvalContext| {
            temporal::shift(ctx.today(), amount.checked_neg()?, unit).map(Value::Date)
        }),
    )
}

fn multiply(a: &Value, b: &Value) -> Option<Value> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.checked_mul(*y).map(Value::Int),
        _ => Some(Value::Float(a.as_f64()? * b.as_f64()?)),
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::List(items) => Some(items.len()),
        _ => None,
    }
}

fn any_text(value: &Value, test: impl Fn(&str) -> bool) -> bool {
    match value {
        Value::String(s) => test(s),
        Value::List(items) => items.iter().filter_map(Value::as_str).any(test),
        _ => false,
    }
}

fn contains_value(values: &[Value], candidate: &Value) -> bool {
    values.iter().any(|v| v.loosely_equals(candidate))
}

fn size_usize(size: usize) -> Value {
    Value::Int(i64::try_from(size).unwrap_or(i64::MAX))
}

impl Function {
    pub(crate) fn new(elements: Vec<Element>, getter: Getter) -> Self {
        Self { elements, getter }
    }

    /// Leaf tokens of this function.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    #[must_use]
    pub fn metadata(&self) -> Arc<Metadata> {
        Metadata::leaf(self.elements.clone())
    }

    /// Compute the value against a model. `None` when an input is absent.
    pub fn fetch(&self, model: &dyn DataModel, ctx: &EvalContext) -> Option<Value> {
        (self.getter)(model, ctx)
    }

    fn map<F>(self, suffix: Vec<Element>, f: F) -> Function
    where
        F: Fn(Value, &EvalContext) -> Option<Value> + Send + Sync + 'static,
    {
        let mut elements = self.elements;
        elements.extend(suffix);
        let inner = self.getter;
        Function::new(
            elements,
            getter(move |model: &dyn DataModel, ctx: &EvalContext| {
                inner(model, ctx).and_then(|v| f(v, ctx))
            }),
        )
    }

    fn combine<F>(self, op: Operator, arg: Arg, f: F) -> Function
    where
        F: Fn(&Value, &Value) -> Option<Value> + Send + Sync + 'static,
    {
        let mut elements = self.elements;
        elements.push(Element::from(op));
        elements.extend(arg.grouped_elements());
        let inner = self.getter;
        Function::new(
            elements,
            getter(move |model: &dyn DataModel, ctx: &EvalContext| {
                let left = inner(model, ctx)?;
                let right = arg.fetch(model, ctx)?;
                f(&left, &right)
            }),
        )
    }

    fn on_date<F>(self, op: Operator, f: F) -> Function
    where
        F: Fn(NaiveDate) -> Option<NaiveDate> + Send + Sync + 'static,
    {
        self.map(vec![Element::from(op)], move |v, _| {
            v.as_date().and_then(&f).map(Value::Date)
        })
    }

    fn between<F>(self, op: Operator, other: impl Into<Arg>, f: F) -> Function
    where
        F: Fn(NaiveDate, NaiveDate) -> i64 + Send + Sync + 'static,
    {
        self.combine(op, other.into(), move |a, b| {
            Some(Value::Int(f(a.as_date()?, b.as_date()?)))
        })
    }

    #[must_use]
    pub fn times(self, factor: impl Into<Arg>) -> Function {
        self.combine(Operator::Times, factor.into(), multiply)
    }

    #[must_use]
    pub fn plus(self, amount: i64, unit: TemporalUnit) -> Function {
        self.map(
            vec![
                Element::from(Operator::Plus),
                Element::value(&Value::Int(amount)),
                Element::from(unit),
            ],
            move |v, _| temporal::shift(v.as_date()?, amount, unit).map(Value::Date),
        )
    }

    #[must_use]
    pub fn minus(self, amount: i64, unit: TemporalUnit) -> Function {
        self.map(
            vec![
                Element::from(Operator::Minus),
                Element::value(&Value::Int(amount)),
                Element::from(unit),
            ],
            move |v, _| {
                temporal::shift(v.as_date()?, amount.checked_neg()?, unit).map(Value::Date)
            },
        )
    }

    #[must_use]
    pub fn first_day_of_month(self) -> Function {
        self.on_date(Operator::FirstDayOfMonth, |d| {
            Some(temporal::first_day_of_month(d))
        })
    }

    #[must_use]
    pub fn first_day_of_next_month(self) -> Function {
        self.on_date(Operator::FirstDayOfNextMonth, temporal::first_day_of_next_month)
    }

    #[must_use]
    pub fn first_day_of_year(self) -> Function {
        self.on_date(Operator::FirstDayOfYear, temporal::first_day_of_year)
    }

    #[must_use]
    pub fn first_day_of_next_year(self) -> Function {
        self.on_date(Operator::FirstDayOfNextYear, temporal::first_day_of_next_year)
    }

    #[must_use]
    pub fn last_day_of_month(self) -> Function {
        self.on_date(Operator::LastDayOfMonth, temporal::last_day_of_month)
    }

    #[must_use]
    pub fn last_day_of_year(self) -> Function {
        self.on_date(Operator::LastDayOfYear, temporal::last_day_of_year)
    }

    /// Whole years between this date and `other`.
    #[must_use]
    pub fn age_at(self, other: impl Into<Arg>) -> Function {
        self.between(Operator::AgeAt, other, temporal::years_between)
    }

    #[must_use]
    pub fn months_between(self, other: impl Into<Arg>) -> Function {
        self.between(Operator::MonthsBetween, other, temporal::months_between)
    }

    #[must_use]
    pub fn days_between(self, other: impl Into<Arg>) -> Function {
        self.between(Operator::DaysBetween, other, temporal::days_between)
    }

    /// Integer parsed from text; numbers are truncated.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_a_number(self) -> Function {
        self.map(vec![Element::from(Operator::AsANumber)], |v, _| match v {
            Value::Int(_) => Some(v),
            Value::Float(f) => Some(Value::Int(f.trunc() as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok().map(Value::Int),
            _ => None,
        })
    }

    #[must_use]
    pub fn as_string(self) -> Function {
        self.map(vec![Element::from(Operator::AsString)], |v, _| {
            Some(Value::String(v.plain_text()))
        })
    }

    /// Length of a text or size of a collection.
    #[must_use]
    pub fn length(self) -> Function {
        self.map(vec![Element::from(Operator::LengthIs)], |v, _| {
            length_of(&v).map(size_usize)
        })
    }

    fn test<F>(self, suffix: Vec<Element>, test: F) -> StepCondition
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let mut elements = self.elements;
        elements.extend(suffix);
        let inner = self.getter;
        StepCondition::predicate(
            Metadata::leaf(elements),
            probe(move |model: &dyn DataModel, ctx: &EvalContext| {
                inner(model, ctx).is_some_and(|v| test(&v))
            }),
        )
    }

    fn relate<F>(self, op: Operator, arg: Arg, test: F) -> StepCondition
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        let mut elements = self.elements;
        elements.push(Element::from(op));
        elements.extend(arg.elements());
        let inner = self.getter;
        StepCondition::predicate(
            Metadata::leaf(elements),
            probe(move |model: &dyn DataModel, ctx: &EvalContext| {
                match (inner(model, ctx), arg.fetch(model, ctx)) {
                    (Some(left), Some(right)) => test(&left, &right),
                    _ => false,
                }
            }),
        )
    }

    fn compare(self, op: CompareOp, arg: impl Into<Arg>) -> StepCondition {
        self.relate(op.operator(), arg.into(), move |left, right| {
            left.satisfies(op, right)
        })
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

    fn compare_dates<F>(self, op: Operator, arg: impl Into<Arg>, test: F) -> StepCondition
    where
        F: Fn(NaiveDate, NaiveDate) -> bool + Send + Sync + 'static,
    {
        self.relate(op, arg.into(), move |left, right| {
            match (left.as_date(), right.as_date()) {
                (Some(a), Some(b)) => test(a, b),
                _ => false,
            }
        })
    }

    #[must_use]
    pub fn after(self, arg: impl Into<Arg>) -> StepCondition {
        self.compare_dates(Operator::After, arg, |a, b| a > b)
    }

    #[must_use]
    pub fn before(self, arg: impl Into<Arg>) -> StepCondition {
        self.compare_dates(Operator::Before, arg, |a, b| a < b)
    }

    #[must_use]
    pub fn after_or_equals(self, arg: impl Into<Arg>) -> StepCondition {
        self.compare_dates(Operator::AfterOrEquals, arg, |a, b| a >= b)
    }

    #[must_use]
    pub fn before_or_equals(self, arg: impl Into<Arg>) -> StepCondition {
        self.compare_dates(Operator::BeforeOrEquals, arg, |a, b| a <= b)
    }

    /// True exactly when the value is absent.
    #[must_use]
    pub fn is_null(self) -> StepCondition {
        let mut elements = self.elements;
        elements.push(Element::from(Operator::IsNull));
        let inner = self.getter;
        StepCondition::predicate(
            Metadata::leaf(elements),
            probe(move |model: &dyn DataModel, ctx: &EvalContext| inner(model, ctx).is_none()),
        )
    }

    #[must_use]
    pub fn is_not_null(self) -> StepCondition {
        self.test(vec![Element::from(Operator::IsNotNull)], |_| true)
    }

    #[must_use]
    pub fn is_true(self) -> StepCondition {
        self.test(
            vec![Element::from(Operator::Is), Element::value(&Value::Bool(true))],
            |v| v.as_bool() == Some(true),
        )
    }

    #[must_use]
    pub fn is_false(self) -> StepCondition {
        self.test(
            vec![Element::from(Operator::Is), Element::value(&Value::Bool(false))],
            |v| v.as_bool() == Some(false),
        )
    }

    #[must_use]
    pub fn contains(self, text: &str) -> StepCondition {
        let needle = text.to_owned();
        self.test(
            vec![Element::from(Operator::Contains), Element::string(text)],
            move |v| any_text(v, |s| s.contains(needle.as_str())),
        )
    }

    #[must_use]
    pub fn starts_with(self, text: &str) -> StepCondition {
        let prefix = text.to_owned();
        self.test(
            vec![Element::from(Operator::StartsWith), Element::string(text)],
            move |v| any_text(v, |s| s.starts_with(prefix.as_str())),
        )
    }

    #[must_use]
    pub fn ends_with(self, text: &str) -> StepCondition {
        let suffix = text.to_owned();
        self.test(
            vec![Element::from(Operator::EndsWith), Element::string(text)],
            move |v| any_text(v, |s| s.ends_with(suffix.as_str())),
        )
    }

    /// Unanchored regular-expression search. An invalid pattern never matches.
    #[must_use]
    pub fn matches(self, pattern: &str) -> StepCondition {
        let suffix = vec![Element::from(Operator::Matches), Element::string(pattern)];
        match Regex::new(pattern) {
            Ok(re) => self.test(suffix, move |v| any_text(v, |s| re.is_match(s))),
            Err(err) => {
                warn!(pattern, error = %err, "invalid pattern, condition never matches");
                self.test(suffix, |_| false)
            }
        }
    }

    #[must_use]
    pub fn is_empty(self) -> StepCondition {
        self.test(vec![Element::from(Operator::IsEmpty)], |v| {
            length_of(v) == Some(0)
        })
    }

    #[must_use]
    pub fn is_not_empty(self) -> StepCondition {
        self.test(vec![Element::from(Operator::IsNotEmpty)], |v| {
            length_of(v).is_some_and(|n| n > 0)
        })
    }

    #[must_use]
    pub fn has_size(self, size: usize) -> StepCondition {
        self.test(
            vec![Element::from(Operator::HasSize), Element::value(&size_usize(size))],
            move |v| length_of(v) == Some(size),
        )
    }

    #[must_use]
    pub fn has_not_size(self, size: usize) -> StepCondition {
        self.test(
            vec![Element::from(Operator::HasNotSize), Element::value(&size_usize(size))],
            move |v| length_of(v).is_some_and(|n| n != size),
        )
    }

    fn membership<I, V, F>(self, op: Operator, values: I, test: F) -> StepCondition
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
        F: Fn(&[Value], &Value) -> bool + Send + Sync + 'static,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let literal = Literal::Many(values.iter().map(Literal::from).collect());
        self.test(
            vec![Element::from(op), Element::Value(literal)],
            move |v| test(&values, v),
        )
    }

    /// The value, or any item of a collection value, is one of `values`.
    #[must_use]
    pub fn any_match<I, V>(self, values: I) -> StepCondition
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.membership(Operator::MatchAny, values, |allowed, v| match v {
            Value::List(items) => items.iter().any(|item| contains_value(allowed, item)),
            other => contains_value(allowed, other),
        })
    }

    /// The value, or every item of a collection value, is one of `values`.
    #[must_use]
    pub fn all_match<I, V>(self, values: I) -> StepCondition
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.membership(Operator::MatchAll, values, |allowed, v| match v {
            Value::List(items) => items.iter().all(|item| contains_value(allowed, item)),
            other => contains_value(allowed, other),
        })
    }

    /// Neither the value nor any item of a collection value is in `values`.
    #[must_use]
    pub fn none_match<I, V>(self, values: I) -> StepCondition
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.membership(Operator::MatchNone, values, |denied, v| match v {
            Value::List(items) => !items.iter().any(|item| contains_value(denied, item)),
            other => !contains_value(denied, other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EvalOptions, FieldModel, ValueType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctx() -> EvalContext {
        EvalOptions::new().today(date(2019, 6, 15)).resolve()
    }

    #[test]
    fn times_chain() {
        let f = constant(3_i64).times(2_i64).times(2_i64).times(2_i64);
        assert_eq!(f.fetch(&FieldModel::new(), &ctx()), Some(Value::Int(24)));
        assert_eq!(f.elements().len(), 7);
    }

    #[test]
    fn computed_argument_is_grouped() {
        let a = FieldInfo::new("a", ValueType::Date);
        let b = FieldInfo::new("b", ValueType::Date);
        let x = FieldInfo::new("x", ValueType::Integer);
        let f = field(&x).times(field(&a).days_between(field(&b)));
        assert_eq!(
            f.elements(),
            &[
                Element::field("x", false),
                Element::from(Operator::Times),
                Element::ParenthesisLeft,
                Element::field("a", false),
                Element::from(Operator::DaysBetween),
                Element::field("b", false),
                Element::ParenthesisRight,
            ]
        );
        let model = FieldModel::new()
            .with("x", 2_i64)
            .with("a", date(2020, 1, 1))
            .with("b", date(2020, 1, 11));
        assert_eq!(f.fetch(&model, &ctx()), Some(Value::Int(20)));
        let single = field(&x).times(field(&a));
        assert_eq!(single.elements().len(), 3);
    }

    #[test]
    fn times_mixes_int_and_float() {
        let f = constant(3_i64).times(0.5_f64);
        assert_eq!(f.fetch(&FieldModel::new(), &ctx()), Some(Value::Float(1.5)));
    }

    #[test]
    fn field_reads_model() {
        let age = FieldInfo::new("user.age", ValueType::Integer).readable("age");
        let f = field(&age);
        assert_eq!(f.elements(), &[Element::field("age", false)]);
        let model = FieldModel::new().with("user.age", 30_i64);
        assert_eq!(f.fetch(&model, &ctx()), Some(Value::Int(30)));
        assert_eq!(f.fetch(&FieldModel::new(), &ctx()), None);
    }

    #[test]
    fn date_producers_use_context_today() {
        let model = FieldModel::new();
        assert_eq!(today().fetch(&model, &ctx()), Some(Value::Date(date(2019, 6, 15))));
        assert_eq!(
            first_day_of_this_year().fetch(&model, &ctx()),
            Some(Value::Date(date(2019, 1, 1)))
        );
        assert_eq!(
            last_day_of_this_month().fetch(&model, &ctx()),
            Some(Value::Date(date(2019, 6, 30)))
        );
        assert_eq!(
            today_minus(1, TemporalUnit::Years).fetch(&model, &ctx()),
            Some(Value::Date(date(2018, 6, 15)))
        );
    }

    #[test]
    fn date_chain_and_difference() {
        let model = FieldModel::new().with("bd", date(1980, 1, 1));
        let bd = FieldInfo::new("bd", ValueType::Date);
        let years = field(&bd)
            .plus(2, TemporalUnit::Years)
            .age_at(field(&bd).plus(12, TemporalUnit::Months).plus(1, TemporalUnit::Years));
        assert_eq!(years.fetch(&model, &ctx()), Some(Value::Int(0)));
        assert_eq!(field(&bd).age_at(today()).fetch(&model, &ctx()), Some(Value::Int(39)));
    }

    #[test]
    fn conversions() {
        let model = FieldModel::new();
        assert_eq!(
            constant(" 42 ").as_a_number().fetch(&model, &ctx()),
            Some(Value::Int(42))
        );
        assert_eq!(constant("x").as_a_number().fetch(&model, &ctx()), None);
        assert_eq!(
            constant(7_i64).as_string().fetch(&model, &ctx()),
            Some(Value::from("7"))
        );
        assert_eq!(
            constant(vec!["a", "b"]).length().fetch(&model, &ctx()),
            Some(Value::Int(2))
        );
    }

    #[test]
    fn date_arithmetic_on_non_date_is_absent() {
        let f = constant(3_i64).plus(1, TemporalUnit::Days);
        assert_eq!(f.fetch(&FieldModel::new(), &ctx()), None);
    }
}
