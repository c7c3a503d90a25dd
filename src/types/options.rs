use chrono::{Local, NaiveDate};

/// Per-call evaluation settings.
///
/// ```
/// use chrono::NaiveDate;
/// use rulecraft::EvalOptions;
///
/// let options = EvalOptions::new()
///     .short_circuit(false)
///     .today(NaiveDate::from_ymd_opt(2020, 6, 1).unwrap());
/// assert!(!options.is_short_circuit());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    short_circuit: bool,
    today: Option<NaiveDate>,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            short_circuit: true,
            today: None,
        }
    }
}

impl EvalOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop `and`/`or` folds at the first deciding child. On by default;
    /// turn it off to get a truth value for every node.
    #[must_use]
    pub fn short_circuit(mut self, enabled: bool) -> Self {
        self.short_circuit = enabled;
        self
    }

    /// Fix the date used by `today` and its relatives. Defaults to the local date.
    #[must_use]
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    #[must_use]
    pub fn is_short_circuit(&self) -> bool {
        self.short_circuit
    }

    pub(crate) fn resolve(&self) -> EvalContext {
        EvalContext {
            short_circuit: self.short_circuit,
            today: self.today.unwrap_or_else(|| Local::now().date_naive()),
        }
    }
}

/// Resolved settings handed to every step of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalContext {
    short_circuit: bool,
    today: NaiveDate,
}

impl EvalContext {
    #[must_use]
    pub fn short_circuit(&self) -> bool {
        self.short_circuit
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
    }
}
