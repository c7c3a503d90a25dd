use std::fmt;
use std::sync::Arc;

use super::metadata::Metadata;
use super::value::Value;

/// What evaluation recorded for one node.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeState {
    /// Skipped by short-circuit evaluation.
    NotEvaluated,
    Bool(bool),
    /// A value-producing node (`count`, `sum`, `min`, or a value leaf).
    Value(Option<Value>),
}

/// Per-node evidence, shaped exactly like the rule tree it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeOutcome {
    state: OutcomeState,
    percentage: u8,
    children: Vec<NodeOutcome>,
}

impl NodeOutcome {
    pub(crate) fn boolean(value: bool, percentage: u8, children: Vec<NodeOutcome>) -> Self {
        Self {
            state: OutcomeState::Bool(value),
            percentage,
            children,
        }
    }

    pub(crate) fn value(value: Option<Value>, children: Vec<NodeOutcome>) -> Self {
        Self {
            state: OutcomeState::Value(value),
            percentage: 0,
            children,
        }
    }

    /// Skeleton for a skipped subtree: every node not evaluated, at 0 %.
    pub(crate) fn not_evaluated(metadata: &Metadata) -> Self {
        Self {
            state: OutcomeState::NotEvaluated,
            percentage: 0,
            children: metadata
                .children()
                .into_iter()
                .map(|child| NodeOutcome::not_evaluated(child))
                .collect(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &OutcomeState {
        &self.state
    }

    /// `true` only for nodes evaluated to true.
    #[must_use]
    pub fn is_true(&self) -> bool {
        self.state == OutcomeState::Bool(true)
    }

    /// `true` only for nodes evaluated to false.
    #[must_use]
    pub fn is_false(&self) -> bool {
        self.state == OutcomeState::Bool(false)
    }

    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.state != OutcomeState::NotEvaluated
    }

    /// Coverage in percent, 0 to 100.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn children(&self) -> &[NodeOutcome] {
        &self.children
    }

    /// This node and its descendants in pre-order, the order in which a
    /// visitor enters them.
    #[must_use]
    pub fn preorder(&self) -> Vec<&NodeOutcome> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.preorder());
        }
        out
    }
}

/// Outcome of evaluating a rule against one data model.
///
/// Returned by [`Rule::evaluate()`](super::rule::Rule::evaluate). Carries the
/// rule's value, its full rule tree, and one [`NodeOutcome`] per node so a
/// report can explain why the rule held or failed.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct EvalResult {
    value: bool,
    metadata: Arc<Metadata>,
    outcome: NodeOutcome,
}

impl EvalResult {
    pub(crate) fn new(value: bool, metadata: Arc<Metadata>, outcome: NodeOutcome) -> Self {
        Self {
            value,
            metadata,
            outcome,
        }
    }

    #[must_use]
    pub fn value(&self) -> bool {
        self.value
    }

    /// The rule tree, rooted at its `when` node.
    #[must_use]
    pub fn metadata(&self) -> &Arc<Metadata> {
        &self.metadata
    }

    /// Outcome of the `when` node; its single child is the condition.
    #[must_use]
    pub fn outcome(&self) -> &NodeOutcome {
        &self.outcome
    }

    /// Outcome of the condition under `when`.
    #[must_use]
    pub fn condition(&self) -> &NodeOutcome {
        self.outcome.children.first().unwrap_or(&self.outcome)
    }
}

impl fmt::Display for EvalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value: {}", self.value)?;
        let nodes = self.outcome.preorder();
        let skipped = nodes.iter().filter(|n| !n.is_evaluated()).count();
        write!(f, ", nodes: {}, skipped: {skipped}", nodes.len())?;
        write!(f, ", coverage: {} %", self.condition().percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::element::Element;
    use crate::types::operator::Operator;

    fn leaf() -> Arc<Metadata> {
        Metadata::leaf(vec![Element::from(Operator::AlwaysTrue)])
    }

    #[test]
    fn skeleton_mirrors_tree() {
        let tree = Metadata::and(leaf(), Metadata::not(leaf()));
        let skeleton = NodeOutcome::not_evaluated(&tree);
        assert_eq!(skeleton.preorder().len(), tree.node_count());
        assert!(skeleton.preorder().iter().all(|n| n.percentage() == 0));
        assert!(skeleton.preorder().iter().all(|n| !n.is_evaluated()));
    }

    #[test]
    fn preorder_visits_parent_first() {
        let outcome = NodeOutcome::boolean(
            true,
            50,
            vec![
                NodeOutcome::boolean(true, 100, vec![]),
                NodeOutcome::boolean(false, 0, vec![]),
            ],
        );
        let order: Vec<u8> = outcome.preorder().iter().map(|n| n.percentage()).collect();
        assert_eq!(order, vec![50, 100, 0]);
    }

    #[test]
    fn result_display() {
        let metadata = Metadata::when(leaf());
        let result = EvalResult::new(
            true,
            metadata,
            NodeOutcome::boolean(true, 100, vec![NodeOutcome::boolean(true, 100, vec![])]),
        );
        assert_eq!(
            result.to_string(),
            "value: true, nodes: 2, skipped: 0, coverage: 100 %"
        );
        assert!(result.condition().is_true());
    }

    #[test]
    fn value_nodes_have_zero_coverage() {
        let node = NodeOutcome::value(Some(Value::Int(3)), vec![]);
        assert_eq!(node.percentage(), 0);
        assert!(node.is_evaluated());
        assert!(!node.is_true());
        assert!(!node.is_false());
    }
}
