#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rulecraft::{
    always_false, always_true, constant, count, field, match_all, match_any, match_none, min, sum,
    today, today_minus, today_plus, FieldInfo, FieldModel, Function, Reduction, StepCondition,
    TemporalUnit, ValueType,
};

// --- Fixed field schema ---
// x, y, z     : integer (0..=120), script labels are the ids
// status      : string, one of STATUSES; some read as numbers or booleans
// flag        : boolean
// start, due  : dates within 40 days of FIXED_TODAY (dated models only)

pub const INT_FIELDS: &[&str] = &["x", "y", "z"];
pub const STATUSES: &[&str] = &["active", "inactive", "true", "3.0", "7"];
pub const DATE_FIELDS: &[&str] = &["start", "due"];
const UNITS: &[TemporalUnit] = &[
    TemporalUnit::Days,
    TemporalUnit::Weeks,
    TemporalUnit::Months,
    TemporalUnit::Years,
];

/// The evaluation date shared by date properties and the script host.
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
}

pub fn schema() -> Vec<FieldInfo> {
    let mut fields: Vec<FieldInfo> = INT_FIELDS
        .iter()
        .map(|id| FieldInfo::new(*id, ValueType::Integer))
        .collect();
    fields.push(FieldInfo::new("status", ValueType::String));
    fields.push(FieldInfo::new("flag", ValueType::Boolean));
    fields
}

/// `schema()` plus the date fields.
pub fn date_schema() -> Vec<FieldInfo> {
    let mut fields = schema();
    fields.extend(DATE_FIELDS.iter().map(|id| FieldInfo::new(*id, ValueType::Date)));
    fields
}

fn int_field(id: &str) -> FieldInfo {
    FieldInfo::new(id, ValueType::Integer)
}

/// A model with every schema field present.
pub fn arb_model() -> impl Strategy<Value = FieldModel> {
    (
        prop::collection::vec(0_i64..=120, INT_FIELDS.len()),
        prop::sample::select(STATUSES),
        any::<bool>(),
    )
        .prop_map(|(ints, status, flag)| {
            let mut model = FieldModel::new().with("status", status).with("flag", flag);
            for (id, v) in INT_FIELDS.iter().zip(ints) {
                model = model.with(*id, v);
            }
            model
        })
}

/// A full model with dates close to `fixed_today()`.
pub fn arb_dated_model() -> impl Strategy<Value = FieldModel> {
    (arb_model(), -40_i64..=40, -40_i64..=40).prop_map(|(model, start, due)| {
        model
            .with("start", fixed_today() + Duration::days(start))
            .with("due", fixed_today() + Duration::days(due))
    })
}

/// A model where each field may be missing.
pub fn arb_sparse_model() -> impl Strategy<Value = FieldModel> {
    (
        prop::collection::vec(prop::option::of(0_i64..=120), INT_FIELDS.len()),
        prop::option::of(prop::sample::select(STATUSES)),
    )
        .prop_map(|(ints, status)| {
            let mut model = FieldModel::new();
            for (id, v) in INT_FIELDS.iter().zip(ints) {
                if let Some(v) = v {
                    model = model.with(*id, v);
                }
            }
            if let Some(status) = status {
                model = model.with("status", status);
            }
            model
        })
}

/// Integer comparison leaf on a random field.
pub fn arb_compare() -> impl Strategy<Value = StepCondition> {
    (
        prop::sample::select(INT_FIELDS),
        0_u8..6,
        0_i64..=120,
    )
        .prop_map(|(id, op, v)| {
            let f = field(&int_field(id));
            match op {
                0 => f.eq(v),
                1 => f.not_eq(v),
                2 => f.gt(v),
                3 => f.gte(v),
                4 => f.lt(v),
                _ => f.lte(v),
            }
        })
}

/// Leaves without reductions: comparisons, constants, and string/boolean tests.
pub fn arb_simple_leaf() -> impl Strategy<Value = StepCondition> {
    prop_oneof![
        4 => arb_compare(),
        1 => any::<bool>().prop_map(|v| if v { always_true("t") } else { always_false("f") }),
        1 => prop::sample::select(STATUSES).prop_map(|s| {
            field(&FieldInfo::new("status", ValueType::String)).eq(s)
        }),
        1 => any::<bool>().prop_map(|v| {
            let flag = field(&FieldInfo::new("flag", ValueType::Boolean));
            if v { flag.is_true() } else { flag.is_false() }
        }),
    ]
}

fn compare_reduction(reduction: Reduction, op: u8, v: i64) -> StepCondition {
    match op {
        0 => reduction.eq(v),
        1 => reduction.not_eq(v),
        2 => reduction.gt(v),
        3 => reduction.gte(v),
        4 => reduction.lt(v),
        _ => reduction.lte(v),
    }
}

/// An integer field or constant, as reduced by `sum` and `min`.
fn arb_int_function() -> impl Strategy<Value = Function> {
    prop_oneof![
        3 => prop::sample::select(INT_FIELDS).prop_map(|id| field(&int_field(id))),
        1 => (0_i64..=120).prop_map(|v| constant(v)),
    ]
}

/// `sum` or `min` over integer fields and constants, compared with a constant.
pub fn arb_value_reduction() -> impl Strategy<Value = StepCondition> {
    (
        any::<bool>(),
        prop::collection::vec(arb_int_function(), 1..4),
        0_u8..6,
        0_i64..=240,
    )
        .prop_map(|(least, functions, op, v)| {
            let reduction = if least { min(functions) } else { sum(functions) };
            compare_reduction(reduction, op, v)
        })
}

/// A `count`, `sum` or `min` comparison.
pub fn arb_reduction() -> impl Strategy<Value = StepCondition> {
    prop_oneof![
        (prop::collection::vec(arb_simple_leaf(), 1..4), 0_u8..6, 0_i64..4)
            .prop_map(|(conditions, op, v)| compare_reduction(count(conditions), op, v)),
        arb_value_reduction(),
    ]
}

/// Any leaf, reductions included.
pub fn arb_leaf() -> impl Strategy<Value = StepCondition> {
    prop_oneof![
        6 => arb_simple_leaf(),
        1 => arb_reduction(),
    ]
}

fn date_field(id: &str) -> Function {
    field(&FieldInfo::new(id, ValueType::Date))
}

/// A date field, possibly shifted by a few units.
fn arb_date_operand() -> impl Strategy<Value = Function> {
    (
        prop::sample::select(DATE_FIELDS),
        0_u8..3,
        0_i64..3,
        prop::sample::select(UNITS),
    )
        .prop_map(|(id, shift, n, unit)| match shift {
            0 => date_field(id),
            1 => date_field(id).plus(n, unit),
            _ => date_field(id).minus(n, unit),
        })
}

/// What a date is compared with: today, a shifted today, or another date.
fn arb_date_target() -> impl Strategy<Value = Function> {
    prop_oneof![
        Just(()).prop_map(|()| today()),
        (0_i64..3, prop::sample::select(UNITS)).prop_map(|(n, unit)| today_plus(n, unit)),
        (0_i64..3, prop::sample::select(UNITS)).prop_map(|(n, unit)| today_minus(n, unit)),
        arb_date_operand(),
    ]
}

/// Date comparisons and day counts.
pub fn arb_date_leaf() -> impl Strategy<Value = StepCondition> {
    prop_oneof![
        4 => (arb_date_operand(), 0_u8..10, arb_date_target()).prop_map(|(a, op, b)| match op {
            0 => a.eq(b),
            1 => a.not_eq(b),
            2 => a.gt(b),
            3 => a.gte(b),
            4 => a.lt(b),
            5 => a.lte(b),
            6 => a.after(b),
            7 => a.before(b),
            8 => a.after_or_equals(b),
            _ => a.before_or_equals(b),
        }),
        1 => (prop::sample::select(DATE_FIELDS), arb_date_target(), 0_i64..40)
            .prop_map(|(id, b, v)| date_field(id).days_between(b).lte(v)),
        1 => (prop::sample::select(INT_FIELDS), arb_date_target(), 0_i64..=2400)
            .prop_map(|(id, b, v)| {
                field(&int_field(id)).times(date_field("start").days_between(b)).gte(v)
            }),
    ]
}

/// Trees whose leaves are date tests.
pub fn arb_date_tree() -> impl Strategy<Value = StepCondition> {
    arb_tree(arb_date_leaf().boxed(), 2)
}

/// Condition trees over `leaf` combined with every junction and quantifier.
pub fn arb_tree(
    leaf: BoxedStrategy<StepCondition>,
    depth: u32,
) -> impl Strategy<Value = StepCondition> {
    leaf.prop_recursive(depth, 24, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.and(b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.or(b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.xor(b)),
            inner.clone().prop_map(|c| !c),
            prop::collection::vec(inner.clone(), 1..4).prop_map(match_any),
            prop::collection::vec(inner.clone(), 1..4).prop_map(match_all),
            prop::collection::vec(inner, 1..4).prop_map(match_none),
        ]
    })
}

/// Trees whose leaves are integer comparisons only.
pub fn arb_compare_tree() -> impl Strategy<Value = StepCondition> {
    arb_tree(arb_compare().boxed(), 3)
}

/// Trees over every leaf kind.
pub fn arb_condition() -> impl Strategy<Value = StepCondition> {
    arb_tree(arb_leaf().boxed(), 3)
}
