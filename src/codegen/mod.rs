//! Lowering of rule trees to a JavaScript condition statement.
//!
//! The output targets a script host that provides moment.js for dates:
//!
//! ```text
//! if( <expression> ){ true; } else { false; }
//! ```
//!
//! [`ScriptGenerator`] is a [`Visitor`]: each composite node opens a frame,
//! its children push their rendered parts into it, and the closing callback
//! combines them into one part for the parent frame. Leaves are reduced by
//! the token reducer in `leaf`.

mod leaf;
mod literal;

use std::collections::HashSet;
use std::io::{self, Write};

use tracing::{debug, warn};

use self::leaf::{LeafReducer, Operand};
use self::literal::binding_literal;
use crate::visit::{browse, Visitor};
use crate::{CompareOp, DataModel, Element, FieldInfo, GenerateError, Metadata, Operator};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Part {
    text: String,
    composite: bool,
    /// Evaluates to `NaN` when none of its inputs is present.
    nan_when_absent: bool,
}

impl Part {
    fn plain(text: String) -> Self {
        Self {
            text,
            composite: false,
            nan_when_absent: false,
        }
    }

    fn expression(text: String) -> Self {
        Self {
            text,
            composite: true,
            nan_when_absent: false,
        }
    }

    fn wrapped(&self) -> String {
        if self.composite {
            format!("({})", self.text)
        } else {
            self.text.clone()
        }
    }
}

impl From<Operand> for Part {
    fn from(operand: Operand) -> Self {
        Part {
            text: operand.text,
            composite: operand.composite,
            nan_when_absent: false,
        }
    }
}

fn join(parts: &[Part], separator: &str) -> Part {
    match parts {
        [single] => single.clone(),
        _ => Part::expression(
            parts
                .iter()
                .map(Part::wrapped)
                .collect::<Vec<_>>()
                .join(separator),
        ),
    }
}

fn listed(parts: &[Part]) -> String {
    parts
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Array of the present values among `parts`.
fn present(parts: &[Part]) -> String {
    format!(
        "[{}].filter(function(value){{ return value != null; }})",
        listed(parts)
    )
}

/// Reserved words that cannot name a script variable.
const RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "let", "new", "null", "return", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

fn is_identifier(label: &str) -> bool {
    let mut chars = label.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$');
    head_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !RESERVED.contains(&label)
}

/// Visitor that renders one rule to a script sink.
///
/// A generator holds the state of a single rendering; use a fresh one per
/// rule.
pub struct ScriptGenerator<W: Write> {
    sink: W,
    frames: Vec<Vec<Part>>,
}

impl<W: Write> ScriptGenerator<W> {
    #[must_use]
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            frames: vec![Vec::new()],
        }
    }

    /// Consume the generator, returning the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// The expression rendered so far, without the `if` wrapper.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Unbalanced`] if a node is still open,
    /// [`GenerateError::EmptyLeaf`] if nothing was rendered.
    pub fn into_expression(mut self) -> Result<String, GenerateError> {
        if self.frames.len() != 1 {
            return Err(GenerateError::Unbalanced {
                open: self.frames.len() - 1,
            });
        }
        let mut root = self.frames.pop().unwrap_or_default();
        match root.len() {
            0 => Err(GenerateError::EmptyLeaf),
            1 => Ok(root.remove(0).text),
            count => Err(GenerateError::LeftoverOperands { count }),
        }
    }

    fn open(&mut self) {
        self.frames.push(Vec::new());
    }

    fn close(&mut self) -> Result<Vec<Part>, GenerateError> {
        if self.frames.len() < 2 {
            return Err(GenerateError::Unbalanced { open: 0 });
        }
        Ok(self.frames.pop().unwrap_or_default())
    }

    fn emit(&mut self, part: Part) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(part);
        }
    }
}

fn compose_unary(op: Operator, child: &Part) -> Part {
    match op {
        Operator::Not => Part::plain(format!("!({})", child.text)),
        other => {
            warn!(operator = other.name(), "unsupported unary operator rendered as a comment");
            Part::plain(format!("/* {} */ {}", other.name(), child.wrapped()))
        }
    }
}

fn compose_binary(op: Operator, left: &Part, right: &Part) -> Part {
    let (l, r) = (left.wrapped(), right.wrapped());
    if let Some(cmp) = CompareOp::from_operator(op) {
        // NaN already fails every other comparison
        if cmp == CompareOp::Neq && left.nan_when_absent {
            return Part::expression(format!("!isNaN({l}) && {l} != {r}"));
        }
        return Part::expression(format!("{l} {cmp} {r}"));
    }
    match op {
        Operator::And => Part::expression(format!("{l} && {r}")),
        Operator::Or => Part::expression(format!("{l} || {r}")),
        Operator::Xor => Part::expression(format!("(!{l} && {r}) || ({l} && !{r})")),
        other => {
            warn!(operator = other.name(), "unsupported binary operator rendered as a comment");
            Part::expression(format!("{l} /* {} */ {r}", other.name()))
        }
    }
}

fn compose_nary(op: Operator, parts: &[Part]) -> Part {
    match op {
        Operator::MatchAny | Operator::Or => join(parts, " || "),
        Operator::MatchAll | Operator::And => join(parts, " && "),
        Operator::MatchNone => Part::expression(
            parts
                .iter()
                .map(|p| format!("!({})", p.text))
                .collect::<Vec<_>>()
                .join(" && "),
        ),
        Operator::Count => Part::plain(format!(
            "[{}].reduce(function(acc, value){{ return acc + (value ? 1 : 0); }}, 0)",
            listed(parts)
        )),
        Operator::Sum => Part::plain(format!(
            "{}.reduce(function(acc, value){{ return acc + value; }}, 0)",
            present(parts)
        )),
        Operator::Min => Part {
            text: format!(
                "(function(values){{ return values.length ? Math.min.apply(null, values) : NaN; }})({})",
                present(parts)
            ),
            composite: false,
            nan_when_absent: true,
        },
        other => {
            warn!(operator = other.name(), "unsupported n-ary operator rendered as a comment");
            Part::plain(format!("/* {} */ [{}]", other.name(), listed(parts)))
        }
    }
}

impl<W: Write> Visitor for ScriptGenerator<W> {
    type Error = GenerateError;

    fn start_when(&mut self, _depth: usize) -> Result<(), GenerateError> {
        self.open();
        Ok(())
    }

    fn end_when(&mut self, depth: usize) -> Result<(), GenerateError> {
        if self.frames.len() != 2 {
            return Err(GenerateError::Unbalanced {
                open: self.frames.len().saturating_sub(1),
            });
        }
        let mut parts = self.close()?;
        let expr = match parts.len() {
            0 => return Err(GenerateError::EmptyLeaf),
            1 => parts.remove(0),
            count => return Err(GenerateError::LeftoverOperands { count }),
        };
        debug!(depth, length = expr.text.len(), "rule lowered to script");
        write!(self.sink, "if( {} ){{ true; }} else {{ false; }}", expr.text)?;
        self.sink.flush()?;
        Ok(())
    }

    fn start_leaf(&mut self, elements: &[Element], _depth: usize) -> Result<(), GenerateError> {
        let operand = LeafReducer::reduce(elements)?;
        self.emit(operand.into());
        Ok(())
    }

    fn start_unary(&mut self, _op: Operator, _depth: usize) -> Result<(), GenerateError> {
        self.open();
        Ok(())
    }

    fn end_unary(&mut self, op: Operator, _depth: usize) -> Result<(), GenerateError> {
        let parts = self.close()?;
        let child = match parts.as_slice() {
            [child] => child,
            _ => return Err(GenerateError::LeftoverOperands { count: parts.len() }),
        };
        let part = compose_unary(op, child);
        self.emit(part);
        Ok(())
    }

    fn start_binary(&mut self, _op: Operator, _depth: usize) -> Result<(), GenerateError> {
        self.open();
        Ok(())
    }

    fn end_binary(&mut self, op: Operator, _depth: usize) -> Result<(), GenerateError> {
        let parts = self.close()?;
        let (left, right) = match parts.as_slice() {
            [left, right] => (left, right),
            _ => return Err(GenerateError::LeftoverOperands { count: parts.len() }),
        };
        let part = compose_binary(op, left, right);
        self.emit(part);
        Ok(())
    }

    fn start_nary(&mut self, _op: Operator, _depth: usize) -> Result<(), GenerateError> {
        self.open();
        Ok(())
    }

    fn end_nary(&mut self, op: Operator, _depth: usize) -> Result<(), GenerateError> {
        let parts = self.close()?;
        if parts.is_empty() {
            return Err(GenerateError::EmptyLeaf);
        }
        let part = compose_nary(op, &parts);
        self.emit(part);
        Ok(())
    }
}

/// Render the expression of `metadata` without the `if` wrapper. A `when`
/// root is unwrapped first.
///
/// # Errors
///
/// Returns [`GenerateError`] when a leaf cannot be reduced.
pub fn lower(metadata: &Metadata) -> Result<String, GenerateError> {
    let body = match metadata {
        Metadata::When(child) => child.as_ref(),
        other => other,
    };
    let mut generator = ScriptGenerator::new(io::sink());
    browse(body, &mut generator, 0)?;
    generator.into_expression()
}

/// Write `metadata` as a full `if` statement. A tree that is not rooted at
/// `when` is wrapped as if it were.
///
/// # Errors
///
/// Returns [`GenerateError`] when a leaf cannot be reduced or the sink fails.
pub fn write_rule<W: Write>(metadata: &Metadata, sink: W) -> Result<(), GenerateError> {
    let mut generator = ScriptGenerator::new(sink);
    match metadata {
        Metadata::When(_) => browse(metadata, &mut generator, 0),
        other => {
            generator.start_when(0)?;
            browse(other, &mut generator, 1)?;
            generator.end_when(0)
        }
    }
}

/// `var <label> = <literal>;` lines for every field `metadata` reads,
/// valued from `model`. Fields the tree does not reference are left out.
///
/// # Errors
///
/// [`GenerateError::InvalidIdentifier`] when a referenced field's label
/// cannot name a script variable, e.g. the dotted default `user.age`.
pub fn script_bindings(
    metadata: &Metadata,
    fields: &[FieldInfo],
    model: &dyn DataModel,
) -> Result<String, GenerateError> {
    let referenced: HashSet<&str> = metadata
        .leaves()
        .into_iter()
        .flatten()
        .filter_map(|element| match element {
            Element::Field { label, .. } => Some(label.as_str()),
            _ => None,
        })
        .collect();

    let mut seen = HashSet::new();
    let mut out = String::new();
    for info in fields {
        if !referenced.contains(info.label()) || !seen.insert(info.label()) {
            continue;
        }
        if !is_identifier(info.label()) {
            return Err(GenerateError::InvalidIdentifier(info.label().to_owned()));
        }
        let value = model.get(info.id());
        out.push_str(&format!(
            "var {} = {};\n",
            info.label(),
            binding_literal(value.as_ref(), info.value_type())
        ));
    }
    Ok(out)
}
