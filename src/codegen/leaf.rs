//! Single-pass reduction of a leaf's flat token sequence into one script
//! expression.
//!
//! Operands are buffered in a deque. Each operator token is looked up in the
//! dispatch table ([`role`]) and becomes a pending application that takes its
//! receiver from the buffer and waits for its following operands. A satisfied
//! application is reduced as soon as the next token cannot bind tighter, so
//! `birth plus 2 years age_at today` applies `plus` before `age_at`, while in
//! `a eq b times 2` the `times` claims `b` before `eq` reduces. Parentheses
//! open a group that reduces to a single operand before anything outside
//! it can claim it.

use std::collections::VecDeque;

use tracing::{trace, warn};

use super::literal::{escape_delimiter, escape_regex, quote, render_literal};
use crate::{Element, GenerateError, Literal, Operator};

/// How tightly a pending operator holds on to the operand after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Binding {
    Relational,
    Arithmetic,
    Chain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Scalar,
    Iterable,
    /// A moment.js value; `chained` counts the date operators applied to it.
    Date {
        chained: usize,
    },
    RegexBody,
    Unit,
}

/// A rendered piece of script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Operand {
    pub(crate) text: String,
    shape: Shape,
    /// Holds a top-level infix operator and needs parentheses when nested.
    pub(crate) composite: bool,
}

impl Operand {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shape: Shape::Scalar,
            composite: false,
        }
    }

    fn expression(text: String) -> Self {
        Self {
            text,
            shape: Shape::Scalar,
            composite: true,
        }
    }

    fn date(text: String, chained: usize) -> Self {
        Self {
            text,
            shape: Shape::Date { chained },
            composite: false,
        }
    }

    fn chained(&self) -> usize {
        match self.shape {
            Shape::Date { chained } => chained,
            _ => 0,
        }
    }

    fn is_iterable(&self) -> bool {
        self.shape == Shape::Iterable
    }

    /// Text usable before a `.method` call.
    fn receiver_text(&self) -> String {
        if self.composite {
            format!("({})", self.text)
        } else {
            self.text.clone()
        }
    }

    /// Text of this operand as a moment; wrapped once, on first use.
    fn moment_text(&self) -> String {
        if self.chained() > 0 {
            self.text.clone()
        } else {
            format!("moment({})", self.text)
        }
    }

    fn extend(&self, suffix: &str) -> Operand {
        Operand::date(format!("{}{suffix}", self.moment_text()), self.chained() + 1)
    }
}

/// Rendering of an operator that applies to buffered operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    /// A date built from today: `moment().startOf('day')`.
    Producer(&'static str),
    /// `today_plus`/`today_minus`, taking an amount and a unit.
    ShiftedToday(&'static str),
    /// Function call around the receiver: `parseInt(r)`.
    Wrap(&'static str),
    NullCheck(&'static str),
    Emptiness(&'static str),
    Length,
    /// Method appended to a moment receiver.
    Chain(&'static str),
    /// `.add(n,'unit')` or `.subtract(n,'unit')`.
    Shift(&'static str),
    Arithmetic(&'static str),
    Compare {
        symbol: &'static str,
        moment: &'static str,
        negate: bool,
    },
    Sized(&'static str),
    DateCompare(&'static str),
    DateDiff(&'static str),
    Text(Operator),
    Membership(Operator),
}

struct Signature {
    receiver: bool,
    args: usize,
    binding: Binding,
}

impl Form {
    fn signature(self) -> Signature {
        let (receiver, args, binding) = match self {
            Form::Producer(_) => (false, 0, Binding::Chain),
            Form::ShiftedToday(_) => (false, 2, Binding::Chain),
            Form::Wrap(_) | Form::Length | Form::Chain(_) => (true, 0, Binding::Chain),
            Form::NullCheck(_) | Form::Emptiness(_) => (true, 0, Binding::Relational),
            Form::Shift(_) => (true, 2, Binding::Chain),
            Form::Arithmetic(_) | Form::DateDiff(_) => (true, 1, Binding::Arithmetic),
            Form::Compare { .. }
            | Form::Sized(_)
            | Form::DateCompare(_)
            | Form::Text(_)
            | Form::Membership(_) => (true, 1, Binding::Relational),
        };
        Signature {
            receiver,
            args,
            binding,
        }
    }
}

/// What a leaf-level operator token does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Structural marker with no script counterpart.
    Skip,
    /// Rendered as a comment only.
    Inert,
    /// Negates the whole leaf.
    Prefix,
    /// A fixed value; the label token after it is dropped.
    Constant(&'static str),
    Apply(Form),
}

fn compare(symbol: &'static str, moment: &'static str, negate: bool) -> Role {
    Role::Apply(Form::Compare {
        symbol,
        moment,
        negate,
    })
}

/// Operator dispatch table.
fn role(op: Operator) -> Role {
    match op {
        Operator::When => Role::Skip,
        Operator::And
        | Operator::Or
        | Operator::Xor
        | Operator::Count
        | Operator::Sum
        | Operator::Min => Role::Inert,
        Operator::Not => Role::Prefix,
        Operator::AlwaysTrue => Role::Constant("true"),
        Operator::AlwaysFalse => Role::Constant("false"),
        Operator::MatchAny | Operator::MatchAll | Operator::MatchNone => {
            Role::Apply(Form::Membership(op))
        }
        Operator::AsANumber => Role::Apply(Form::Wrap("parseInt")),
        Operator::AsString => Role::Apply(Form::Wrap("String")),
        Operator::Times => Role::Apply(Form::Arithmetic(" * ")),
        Operator::Equals => compare(" == ", "isSame", false),
        Operator::NotEquals => compare(" != ", "isSame", true),
        Operator::GreaterThan => compare(" > ", "isAfter", false),
        Operator::GreaterOrEquals => compare(" >= ", "isSameOrAfter", false),
        Operator::LesserThan => compare(" < ", "isBefore", false),
        Operator::LesserOrEquals => compare(" <= ", "isSameOrBefore", false),
        Operator::Is => compare(" === ", "isSame", false),
        Operator::IsNull => Role::Apply(Form::NullCheck(" == ")),
        Operator::IsNotNull => Role::Apply(Form::NullCheck(" != ")),
        Operator::Matches | Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
            Role::Apply(Form::Text(op))
        }
        Operator::IsEmpty => Role::Apply(Form::Emptiness(" == ")),
        Operator::IsNotEmpty => Role::Apply(Form::Emptiness(" != ")),
        Operator::HasSize => Role::Apply(Form::Sized(" == ")),
        Operator::HasNotSize => Role::Apply(Form::Sized(" != ")),
        Operator::LengthIs => Role::Apply(Form::Length),
        Operator::Plus => Role::Apply(Form::Shift("add")),
        Operator::Minus => Role::Apply(Form::Shift("subtract")),
        Operator::After => Role::Apply(Form::DateCompare("isAfter")),
        Operator::Before => Role::Apply(Form::DateCompare("isBefore")),
        Operator::AfterOrEquals => Role::Apply(Form::DateCompare("isSameOrAfter")),
        Operator::BeforeOrEquals => Role::Apply(Form::DateCompare("isSameOrBefore")),
        Operator::AgeAt => Role::Apply(Form::DateDiff("years")),
        Operator::MonthsBetween => Role::Apply(Form::DateDiff("months")),
        Operator::DaysBetween => Role::Apply(Form::DateDiff("days")),
        Operator::Today => Role::Apply(Form::Producer("moment().startOf('day')")),
        Operator::TodayPlus => Role::Apply(Form::ShiftedToday("add")),
        Operator::TodayMinus => Role::Apply(Form::ShiftedToday("subtract")),
        Operator::FirstDayOfMonth => Role::Apply(Form::Chain(".startOf('month')")),
        Operator::FirstDayOfNextMonth => {
            Role::Apply(Form::Chain(".add(1,'months').startOf('month')"))
        }
        Operator::FirstDayOfYear => Role::Apply(Form::Chain(".startOf('year')")),
        Operator::FirstDayOfNextYear => Role::Apply(Form::Chain(".add(1,'years').startOf('year')")),
        Operator::LastDayOfMonth => Role::Apply(Form::Chain(".endOf('month')")),
        Operator::LastDayOfYear => Role::Apply(Form::Chain(".endOf('year')")),
        Operator::FirstDayOfThisMonth => Role::Apply(Form::Producer("moment().startOf('month')")),
        Operator::FirstDayOfThisYear => Role::Apply(Form::Producer("moment().startOf('year')")),
        Operator::LastDayOfThisMonth => Role::Apply(Form::Producer("moment().endOf('month')")),
        Operator::LastDayOfThisYear => Role::Apply(Form::Producer("moment().endOf('year')")),
    }
}

struct Pending {
    op: Operator,
    form: Form,
    receiver: Option<Operand>,
    /// Buffer length when the operator was read; its arguments sit above.
    base: usize,
    args: usize,
    binding: Binding,
}

impl Pending {
    fn expected(&self) -> usize {
        self.args + usize::from(self.receiver.is_some())
    }
}

/// Reducer state saved when a parenthesis opens.
#[derive(Debug, Clone, Copy)]
struct Group {
    pending: usize,
    operands: usize,
}

fn comment(text: &str) -> String {
    format!("/* {} */", text.replace("*/", "* /"))
}

fn regex_body(op: Operator, text: &str) -> String {
    let body = match op {
        Operator::StartsWith => format!("^{}.*", escape_regex(text)),
        Operator::EndsWith => format!(".*{}$", escape_regex(text)),
        Operator::Contains => escape_regex(text),
        _ => escape_delimiter(text),
    };
    // `//` would open a line comment
    if body.is_empty() {
        "(?:)".to_owned()
    } else {
        body
    }
}

/// Reducer state for one leaf.
#[derive(Default)]
pub(crate) struct LeafReducer {
    operands: VecDeque<Operand>,
    pending: Vec<Pending>,
    groups: Vec<Group>,
    notes: Vec<String>,
    pending_close: usize,
    /// Set by a text operator: the next string literal is a regex body.
    regex: Option<Operator>,
    /// Set by `always_true`/`always_false`: the next literal is a label.
    swallow_label: bool,
}

impl LeafReducer {
    /// Reduce a leaf's tokens to a single expression.
    pub(crate) fn reduce(elements: &[Element]) -> Result<Operand, GenerateError> {
        let mut reducer = LeafReducer::default();
        for element in elements {
            reducer.feed(element)?;
        }
        reducer.finish()
    }

    fn feed(&mut self, element: &Element) -> Result<(), GenerateError> {
        match element {
            Element::ParenthesisLeft => {
                self.settle(None)?;
                self.groups.push(Group {
                    pending: self.pending.len(),
                    operands: self.operands.len(),
                });
                return Ok(());
            }
            Element::ParenthesisRight => return self.close_group(),
            Element::Unknown(text) => {
                warn!(token = %text, "unknown token rendered as a comment");
                self.notes.push(comment(&format!("unknown: {text}")));
                return Ok(());
            }
            _ => {}
        }

        let regex = self.regex.take();
        let swallow = std::mem::take(&mut self.swallow_label);
        match element {
            Element::Operator(op) => self.operator(*op),
            Element::Field { label, iterable } => self.operand(Operand {
                text: label.clone(),
                shape: if *iterable {
                    Shape::Iterable
                } else {
                    Shape::Scalar
                },
                composite: false,
            }),
            Element::Value(_) | Element::StringValue(_) if swallow => Ok(()),
            Element::Value(literal) => self.operand(Operand {
                text: render_literal(literal),
                shape: if let Literal::Many(_) = literal {
                    Shape::Iterable
                } else {
                    Shape::Scalar
                },
                composite: false,
            }),
            Element::StringValue(text) => match regex {
                Some(op) => self.operand(Operand {
                    text: regex_body(op, text),
                    shape: Shape::RegexBody,
                    composite: false,
                }),
                None => self.operand(Operand::plain(quote(text))),
            },
            Element::TemporalUnit(unit) => self.operand(Operand {
                text: format!("'{}'", unit.name()),
                shape: Shape::Unit,
                composite: false,
            }),
            Element::ParenthesisLeft | Element::ParenthesisRight | Element::Unknown(_) => Ok(()),
        }
    }

    fn operand(&mut self, operand: Operand) -> Result<(), GenerateError> {
        self.settle(None)?;
        self.operands.push_back(operand);
        Ok(())
    }

    fn operator(&mut self, op: Operator) -> Result<(), GenerateError> {
        match role(op) {
            Role::Skip => Ok(()),
            Role::Inert => {
                self.notes.push(comment(op.name()));
                Ok(())
            }
            Role::Prefix => {
                self.pending_close += 1;
                Ok(())
            }
            Role::Constant(text) => {
                self.operand(Operand::plain(text))?;
                self.swallow_label = true;
                Ok(())
            }
            Role::Apply(form) => {
                let signature = form.signature();
                self.settle(Some(signature.binding))?;
                let receiver = if signature.receiver {
                    let floor = self
                        .pending
                        .last()
                        .map_or(0, |p| p.base)
                        .max(self.groups.last().map_or(0, |g| g.operands));
                    if self.operands.len() <= floor {
                        return Err(GenerateError::OperandUnderflow {
                            operator: op,
                            expected: signature.args + 1,
                            found: 0,
                        });
                    }
                    self.operands.pop_back()
                } else {
                    None
                };
                self.pending.push(Pending {
                    op,
                    form,
                    receiver,
                    base: self.operands.len(),
                    args: signature.args,
                    binding: signature.binding,
                });
                if let Form::Text(kind) = form {
                    self.regex = Some(kind);
                }
                Ok(())
            }
        }
    }

    /// Reduce satisfied applications from the top of the stack, stopping
    /// when `next` binds tighter than the top one.
    fn settle(&mut self, next: Option<Binding>) -> Result<(), GenerateError> {
        let barrier = self.groups.last().map_or(0, |g| g.pending);
        while let Some(top) = self.pending.last().filter(|_| self.pending.len() > barrier) {
            if self.operands.len() < top.base + top.args {
                break;
            }
            if next.is_some_and(|binding| binding > top.binding) {
                break;
            }
            if let Some(pending) = self.pending.pop() {
                self.apply(pending)?;
            }
        }
        Ok(())
    }

    /// Reduce the innermost group to one operand, parenthesised when it
    /// holds an infix operator.
    fn close_group(&mut self) -> Result<(), GenerateError> {
        let group = self
            .groups
            .last()
            .copied()
            .ok_or(GenerateError::UnbalancedParenthesis)?;
        self.settle(None)?;
        if self.pending.len() > group.pending {
            if let Some(top) = self.pending.last() {
                return Err(GenerateError::OperandUnderflow {
                    operator: top.op,
                    expected: top.expected(),
                    found: self.operands.len().saturating_sub(top.base)
                        + usize::from(top.receiver.is_some()),
                });
            }
        }
        self.groups.pop();
        let count = self.operands.len() - group.operands;
        if count > 1 {
            return Err(GenerateError::LeftoverOperands { count });
        }
        let mut inner = match self.operands.pop_back() {
            Some(operand) if count == 1 => operand,
            _ => return Err(GenerateError::EmptyLeaf),
        };
        if inner.composite {
            inner.text = format!("({})", inner.text);
            inner.composite = false;
        }
        self.operands.push_back(inner);
        Ok(())
    }

    fn apply(&mut self, pending: Pending) -> Result<(), GenerateError> {
        let args: Vec<Operand> = self.operands.drain(pending.base..).collect();
        let out = render(&pending, args)?;
        trace!(operator = pending.op.name(), output = %out.text, "leaf operator reduced");
        self.operands.push_back(out);
        Ok(())
    }

    fn finish(mut self) -> Result<Operand, GenerateError> {
        if !self.groups.is_empty() {
            return Err(GenerateError::UnbalancedParenthesis);
        }
        self.settle(None)?;
        if let Some(top) = self.pending.last() {
            return Err(GenerateError::OperandUnderflow {
                operator: top.op,
                expected: top.expected(),
                found: self.operands.len().saturating_sub(top.base)
                    + usize::from(top.receiver.is_some()),
            });
        }

        let count = self.operands.len();
        let mut expr = match self.operands.pop_front() {
            Some(_) if count > 1 => return Err(GenerateError::LeftoverOperands { count }),
            Some(operand) => operand,
            None if self.notes.is_empty() => return Err(GenerateError::EmptyLeaf),
            None => Operand::plain("undefined"),
        };

        if self.pending_close > 0 {
            expr = Operand::plain(format!(
                "{}{}{}",
                "!(".repeat(self.pending_close),
                expr.text,
                ")".repeat(self.pending_close)
            ));
        }
        if !self.notes.is_empty() {
            expr.text = format!("{} {}", self.notes.join(" "), expr.text);
        }
        Ok(expr)
    }
}

fn render(pending: &Pending, args: Vec<Operand>) -> Result<Operand, GenerateError> {
    let found = args.len() + usize::from(pending.receiver.is_some());
    let underflow = || GenerateError::OperandUnderflow {
        operator: pending.op,
        expected: pending.expected(),
        found,
    };
    let mut args = args.into_iter();
    let mut arg = || args.next().ok_or_else(underflow);
    let receiver = || pending.receiver.as_ref().ok_or_else(underflow);

    let out = match pending.form {
        Form::Producer(text) => Operand::date(text.to_owned(), 1),
        Form::ShiftedToday(method) => {
            let amount = arg()?;
            let unit = arg()?;
            Operand::date(
                format!("moment().startOf('day').{method}({},{})", amount.text, unit.text),
                2,
            )
        }
        Form::Wrap(name) => Operand::plain(format!("{name}({})", receiver()?.text)),
        Form::NullCheck(symbol) => Operand::plain(format!("({}{symbol}null)", receiver()?.text)),
        Form::Emptiness(symbol) => {
            Operand::expression(format!("{}.length{symbol}0", receiver()?.receiver_text()))
        }
        Form::Length => Operand::plain(format!("{}.length", receiver()?.receiver_text())),
        Form::Chain(suffix) => receiver()?.extend(suffix),
        Form::Shift(method) => {
            let r = receiver()?;
            let amount = arg()?;
            let unit = arg()?;
            r.extend(&format!(".{method}({},{})", amount.text, unit.text))
        }
        Form::Arithmetic(symbol) => {
            let r = receiver()?;
            Operand::expression(format!("{}{symbol}{}", r.text, arg()?.text))
        }
        Form::Compare {
            symbol,
            moment,
            negate,
        } => {
            let r = receiver()?;
            let a = arg()?;
            if r.chained() > 0 || a.chained() > 0 {
                let bang = if negate { "!" } else { "" };
                Operand::plain(format!(
                    "{bang}{}.{moment}({},'day')",
                    r.moment_text(),
                    a.moment_text()
                ))
            } else {
                Operand::expression(format!("{}{symbol}{}", r.text, a.text))
            }
        }
        Form::Sized(symbol) => {
            let r = receiver()?;
            Operand::expression(format!("{}.length{symbol}{}", r.receiver_text(), arg()?.text))
        }
        Form::DateCompare(method) => {
            let r = receiver()?;
            Operand::plain(format!("{}.{method}({},'day')", r.moment_text(), arg()?.moment_text()))
        }
        Form::DateDiff(unit) => {
            let r = receiver()?;
            Operand::plain(format!(
                "Math.abs({}.diff({}, '{unit}'))",
                r.moment_text(),
                arg()?.moment_text()
            ))
        }
        Form::Text(kind) => text_match(kind, receiver()?, &arg()?),
        Form::Membership(kind) => membership(kind, receiver()?, &arg()?),
    };
    Ok(out)
}

fn text_match(kind: Operator, r: &Operand, a: &Operand) -> Operand {
    if a.shape == Shape::RegexBody {
        let test = |subject: &str| format!("/{}/.test({subject})", a.text);
        return if r.is_iterable() {
            Operand::plain(format!(
                "{}.some(function(element){{ return {}; }})",
                r.receiver_text(),
                test("element")
            ))
        } else {
            Operand::plain(test(&r.text))
        };
    }
    let subject = r.receiver_text();
    match kind {
        Operator::Contains => Operand::expression(format!("{subject}.indexOf({}) >= 0", a.text)),
        Operator::StartsWith => {
            Operand::expression(format!("{subject}.indexOf({}) === 0", a.text))
        }
        Operator::EndsWith => Operand::expression(format!(
            "{subject}.slice({subject}.length - {}.length) === {}",
            a.receiver_text(),
            a.text
        )),
        _ => Operand::plain(format!("new RegExp({}).test({})", a.text, r.text)),
    }
}

fn membership(kind: Operator, r: &Operand, a: &Operand) -> Operand {
    let set = a.receiver_text();
    let (quantifier, test) = match kind {
        Operator::MatchAll => ("every", ">= 0"),
        Operator::MatchNone => ("every", "< 0"),
        _ => ("some", ">= 0"),
    };
    if r.is_iterable() {
        Operand::plain(format!(
            "{}.{quantifier}(function(element){{ return {set}.indexOf(element) {test}; }})",
            r.receiver_text()
        ))
    } else {
        Operand::expression(format!("{set}.indexOf({}) {test}", r.text))
    }
}
