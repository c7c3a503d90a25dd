//! Plain-text evaluation report.
//!
//! Each node of the evaluated rule becomes one indented line:
//!
//! ```text
//! when [true] 100 %
//!   or [true] 100 %
//!     age >= 18 [true] 100 %
//!     always true A [not evaluated] 0 %
//! ```

use std::fmt::{self, Write};

use tracing::warn;

use crate::visit::{browse, Visitor};
use crate::{Element, EvalResult, Metadata, NodeOutcome, Operator, OutcomeState};

/// Message bundle for reports. Override individual entries to localise.
pub trait Labels {
    /// Label of an operator, in a node header or inside a leaf.
    fn operator(&self, op: Operator) -> String {
        op.readable().to_owned()
    }

    fn truth(&self, value: bool) -> String {
        value.to_string()
    }

    fn not_evaluated(&self) -> String {
        "not evaluated".to_owned()
    }

    /// Label for a value-producing node with nothing to show.
    fn absent(&self) -> String {
        "null".to_owned()
    }
}

/// The built-in English labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLabels;

impl Labels for EnglishLabels {}

struct ReportWriter<'a> {
    labels: &'a dyn Labels,
    outcomes: std::vec::IntoIter<&'a NodeOutcome>,
    out: String,
}

impl ReportWriter<'_> {
    fn line(&mut self, label: &str, depth: usize) -> fmt::Result {
        let state = match self.outcomes.next() {
            Some(outcome) => outcome,
            None => return Err(fmt::Error),
        };
        let (shown, percentage) = match state.state() {
            OutcomeState::NotEvaluated => (self.labels.not_evaluated(), state.percentage()),
            OutcomeState::Bool(value) => (self.labels.truth(*value), state.percentage()),
            OutcomeState::Value(Some(value)) => (format!("= {value}"), state.percentage()),
            OutcomeState::Value(None) => (format!("= {}", self.labels.absent()), 0),
        };
        writeln!(
            self.out,
            "{:indent$}{label} [{shown}] {percentage} %",
            "",
            indent = depth * 2
        )
    }

    fn header(&mut self, op: Operator, depth: usize) -> fmt::Result {
        let label = self.labels.operator(op);
        self.line(&label, depth)
    }
}

impl Visitor for ReportWriter<'_> {
    type Error = fmt::Error;

    fn start_when(&mut self, depth: usize) -> fmt::Result {
        self.header(Operator::When, depth)
    }

    fn start_leaf(&mut self, elements: &[Element], depth: usize) -> fmt::Result {
        let words: Vec<String> = elements
            .iter()
            .map(|element| match element {
                Element::Operator(op) => self.labels.operator(*op),
                other => other.readable(),
            })
            .filter(|word| !word.is_empty())
            .collect();
        self.line(&words.join(" "), depth)
    }

    fn start_unary(&mut self, op: Operator, depth: usize) -> fmt::Result {
        self.header(op, depth)
    }

    fn start_binary(&mut self, op: Operator, depth: usize) -> fmt::Result {
        self.header(op, depth)
    }

    fn start_nary(&mut self, op: Operator, depth: usize) -> fmt::Result {
        self.header(op, depth)
    }
}

/// Render `result` as an indented list, one line per node in pre-order.
#[must_use]
pub fn render_report(result: &EvalResult, labels: &dyn Labels) -> String {
    match write_report(result.metadata(), result.outcome(), labels) {
        Ok(report) => report,
        Err(partial) => {
            warn!(
                lines = partial.lines().count(),
                "outcome tree does not mirror the rule tree, report truncated"
            );
            debug_assert!(false, "outcome tree does not mirror the rule tree");
            partial
        }
    }
}

/// Pair each node of `metadata` with the outcome at the same pre-order
/// position. A tree shape mismatch returns the lines written so far.
fn write_report(
    metadata: &Metadata,
    outcome: &NodeOutcome,
    labels: &dyn Labels,
) -> Result<String, String> {
    let mut writer = ReportWriter {
        labels,
        outcomes: outcome.preorder().into_iter(),
        out: String::new(),
    };
    let walked = browse(metadata, &mut writer, 0);
    if walked.is_err() || writer.outcomes.next().is_some() {
        return Err(writer.out);
    }
    Ok(writer.out)
}
