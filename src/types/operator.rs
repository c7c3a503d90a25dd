use std::fmt;

/// Every operator identity that can appear in a rule tree, either as a leaf
/// token or as the operator of a unary, binary or n-ary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Root of a rule.
    When,
    // boolean combinators
    And,
    Or,
    Xor,
    Not,
    AlwaysTrue,
    AlwaysFalse,
    // n-ary combinators
    MatchAny,
    MatchAll,
    MatchNone,
    Count,
    Sum,
    Min,
    // conversions
    AsANumber,
    AsString,
    // arithmetic and comparison
    Times,
    Equals,
    NotEquals,
    GreaterThan,
    GreaterOrEquals,
    LesserThan,
    LesserOrEquals,
    Is,
    IsNull,
    IsNotNull,
    // strings and collections
    Matches,
    Contains,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
    HasSize,
    HasNotSize,
    LengthIs,
    // dates
    Plus,
    Minus,
    After,
    Before,
    AfterOrEquals,
    BeforeOrEquals,
    AgeAt,
    MonthsBetween,
    DaysBetween,
    Today,
    TodayPlus,
    TodayMinus,
    FirstDayOfMonth,
    FirstDayOfNextMonth,
    FirstDayOfYear,
    FirstDayOfNextYear,
    LastDayOfMonth,
    LastDayOfYear,
    FirstDayOfThisMonth,
    FirstDayOfThisYear,
    LastDayOfThisMonth,
    LastDayOfThisYear,
}

impl Operator {
    /// All operators, in declaration order.
    pub const ALL: [Operator; 56] = [
        Operator::When,
        Operator::And,
        Operator::Or,
        Operator::Xor,
        Operator::Not,
        Operator::AlwaysTrue,
        Operator::AlwaysFalse,
        Operator::MatchAny,
        Operator::MatchAll,
        Operator::MatchNone,
        Operator::Count,
        Operator::Sum,
        Operator::Min,
        Operator::AsANumber,
        Operator::AsString,
        Operator::Times,
        Operator::Equals,
        Operator::NotEquals,
        Operator::GreaterThan,
        Operator::GreaterOrEquals,
        Operator::LesserThan,
        Operator::LesserOrEquals,
        Operator::Is,
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::Matches,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::IsEmpty,
        Operator::IsNotEmpty,
        Operator::HasSize,
        Operator::HasNotSize,
        Operator::LengthIs,
        Operator::Plus,
        Operator::Minus,
        Operator::After,
        Operator::Before,
        Operator::AfterOrEquals,
        Operator::BeforeOrEquals,
        Operator::AgeAt,
        Operator::MonthsBetween,
        Operator::DaysBetween,
        Operator::Today,
        Operator::TodayPlus,
        Operator::TodayMinus,
        Operator::FirstDayOfMonth,
        Operator::FirstDayOfNextMonth,
        Operator::FirstDayOfYear,
        Operator::FirstDayOfNextYear,
        Operator::LastDayOfMonth,
        Operator::LastDayOfYear,
        Operator::FirstDayOfThisMonth,
        Operator::FirstDayOfThisYear,
        Operator::LastDayOfThisMonth,
        Operator::LastDayOfThisYear,
    ];

    /// Stable snake_case identifier, used by the binary cache.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Operator::When => "when",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Xor => "xor",
            Operator::Not => "not",
            Operator::AlwaysTrue => "always_true",
            Operator::AlwaysFalse => "always_false",
            Operator::MatchAny => "match_any",
            Operator::MatchAll => "match_all",
            Operator::MatchNone => "match_none",
            Operator::Count => "count",
            Operator::Sum => "sum",
            Operator::Min => "min",
            Operator::AsANumber => "as_a_number",
            Operator::AsString => "as_string",
            Operator::Times => "times",
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::GreaterThan => "greater_than",
            Operator::GreaterOrEquals => "greater_or_equals",
            Operator::LesserThan => "lesser_than",
            Operator::LesserOrEquals => "lesser_or_equals",
            Operator::Is => "is",
            Operator::IsNull => "is_null",
            Operator::IsNotNull => "is_not_null",
            Operator::Matches => "matches",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::HasSize => "has_size",
            Operator::HasNotSize => "has_not_size",
            Operator::LengthIs => "length_is",
            Operator::Plus => "plus",
            Operator::Minus => "minus",
            Operator::After => "after",
            Operator::Before => "before",
            Operator::AfterOrEquals => "after_or_equals",
            Operator::BeforeOrEquals => "before_or_equals",
            Operator::AgeAt => "age_at",
            Operator::MonthsBetween => "months_between",
            Operator::DaysBetween => "days_between",
            Operator::Today => "today",
            Operator::TodayPlus => "today_plus",
            Operator::TodayMinus => "today_minus",
            Operator::FirstDayOfMonth => "first_day_of_month",
            Operator::FirstDayOfNextMonth => "first_day_of_next_month",
            Operator::FirstDayOfYear => "first_day_of_year",
            Operator::FirstDayOfNextYear => "first_day_of_next_year",
            Operator::LastDayOfMonth => "last_day_of_month",
            Operator::LastDayOfYear => "last_day_of_year",
            Operator::FirstDayOfThisMonth => "first_day_of_this_month",
            Operator::FirstDayOfThisYear => "first_day_of_this_year",
            Operator::LastDayOfThisMonth => "last_day_of_this_month",
            Operator::LastDayOfThisYear => "last_day_of_this_year",
        }
    }

    /// Reverse of [`name()`](Self::name).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.name() == name)
    }

    /// English label used when a rule is rendered for humans.
    #[must_use]
    pub fn readable(self) -> &'static str {
        match self {
            Operator::When => "when",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Xor => "xor",
            Operator::Not => "not",
            Operator::AlwaysTrue => "always true",
            Operator::AlwaysFalse => "always false",
            Operator::MatchAny => "match any",
            Operator::MatchAll => "match all",
            Operator::MatchNone => "match none",
            Operator::Count => "count",
            Operator::Sum => "sum",
            Operator::Min => "min",
            Operator::AsANumber => "as a number",
            Operator::AsString => "as a string",
            Operator::Times => "times",
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::GreaterThan => ">",
            Operator::GreaterOrEquals => ">=",
            Operator::LesserThan => "<",
            Operator::LesserOrEquals => "<=",
            Operator::Is => "is",
            Operator::IsNull => "is null",
            Operator::IsNotNull => "is not null",
            Operator::Matches => "matches",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts with",
            Operator::EndsWith => "ends with",
            Operator::IsEmpty => "is empty",
            Operator::IsNotEmpty => "is not empty",
            Operator::HasSize => "has size",
            Operator::HasNotSize => "has not size",
            Operator::LengthIs => "length is",
            Operator::Plus => "plus",
            Operator::Minus => "minus",
            Operator::After => "after",
            Operator::Before => "before",
            Operator::AfterOrEquals => "after or equals",
            Operator::BeforeOrEquals => "before or equals",
            Operator::AgeAt => "age at",
            Operator::MonthsBetween => "months between",
            Operator::DaysBetween => "days between",
            Operator::Today => "today",
            Operator::TodayPlus => "today plus",
            Operator::TodayMinus => "today minus",
            Operator::FirstDayOfMonth => "first day of month",
            Operator::FirstDayOfNextMonth => "first day of next month",
            Operator::FirstDayOfYear => "first day of year",
            Operator::FirstDayOfNextYear => "first day of next year",
            Operator::LastDayOfMonth => "last day of month",
            Operator::LastDayOfYear => "last day of year",
            Operator::FirstDayOfThisMonth => "first day of this month",
            Operator::FirstDayOfThisYear => "first day of this year",
            Operator::LastDayOfThisMonth => "last day of this month",
            Operator::LastDayOfThisYear => "last day of this year",
        }
    }

    /// Operators that produce or transform a date and therefore extend a
    /// date-arithmetic method chain.
    #[must_use]
    pub fn is_date_arithmetic(self) -> bool {
        matches!(
            self,
            Operator::Plus
                | Operator::Minus
                | Operator::Today
                | Operator::TodayPlus
                | Operator::TodayMinus
                | Operator::FirstDayOfMonth
                | Operator::FirstDayOfNextMonth
                | Operator::FirstDayOfYear
                | Operator::FirstDayOfNextYear
                | Operator::LastDayOfMonth
                | Operator::LastDayOfYear
                | Operator::FirstDayOfThisMonth
                | Operator::FirstDayOfThisYear
                | Operator::LastDayOfThisMonth
                | Operator::LastDayOfThisYear
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.readable())
    }
}

/// Calendar unit used by date arithmetic and date differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl TemporalUnit {
    /// Unit name as understood by moment.js.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TemporalUnit::Days => "days",
            TemporalUnit::Weeks => "weeks",
            TemporalUnit::Months => "months",
            TemporalUnit::Years => "years",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<TemporalUnit> {
        match name {
            "days" => Some(TemporalUnit::Days),
            "weeks" => Some(TemporalUnit::Weeks),
            "months" => Some(TemporalUnit::Months),
            "years" => Some(TemporalUnit::Years),
            _ => None,
        }
    }
}

impl fmt::Display for TemporalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
