use std::fmt;
use std::sync::Arc;

use super::element::Element;
use super::operator::Operator;

/// Immutable rule tree.
///
/// Nodes are built once through the constructors below and shared through
/// [`Arc`], so a tree can be read by any number of threads at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Metadata {
    /// A single predicate as a flat token sequence.
    Leaf(Vec<Element>),
    Unary {
        op: Operator,
        child: Arc<Metadata>,
    },
    Binary {
        op: Operator,
        left: Arc<Metadata>,
        right: Arc<Metadata>,
    },
    /// `children` is never empty.
    Nary {
        op: Operator,
        children: Vec<Arc<Metadata>>,
    },
    /// The guarded condition of a rule.
    When(Arc<Metadata>),
}

impl Metadata {
    #[must_use]
    pub fn leaf(elements: impl Into<Vec<Element>>) -> Arc<Metadata> {
        Arc::new(Metadata::Leaf(elements.into()))
    }

    #[must_use]
    pub fn unary(op: Operator, child: Arc<Metadata>) -> Arc<Metadata> {
        Arc::new(Metadata::Unary { op, child })
    }

    #[must_use]
    pub fn binary(op: Operator, left: Arc<Metadata>, right: Arc<Metadata>) -> Arc<Metadata> {
        Arc::new(Metadata::Binary { op, left, right })
    }

    /// Builds an n-ary node. Passing no children is a contract violation.
    #[must_use]
    pub fn nary(op: Operator, children: Vec<Arc<Metadata>>) -> Arc<Metadata> {
        debug_assert!(!children.is_empty(), "n-ary `{op}` node without children");
        Arc::new(Metadata::Nary { op, children })
    }

    #[must_use]
    pub fn when(child: Arc<Metadata>) -> Arc<Metadata> {
        Arc::new(Metadata::When(child))
    }

    #[must_use]
    pub fn and(left: Arc<Metadata>, right: Arc<Metadata>) -> Arc<Metadata> {
        Self::binary(Operator::And, left, right)
    }

    #[must_use]
    pub fn or(left: Arc<Metadata>, right: Arc<Metadata>) -> Arc<Metadata> {
        Self::binary(Operator::Or, left, right)
    }

    #[must_use]
    pub fn xor(left: Arc<Metadata>, right: Arc<Metadata>) -> Arc<Metadata> {
        Self::binary(Operator::Xor, left, right)
    }

    #[must_use]
    pub fn not(child: Arc<Metadata>) -> Arc<Metadata> {
        Self::unary(Operator::Not, child)
    }

    /// Operator of the node. Leaves report the first operator token they hold.
    #[must_use]
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Metadata::Leaf(elements) => elements.iter().find_map(Element::operator),
            Metadata::Unary { op, .. } | Metadata::Binary { op, .. } | Metadata::Nary { op, .. } => {
                Some(*op)
            }
            Metadata::When(_) => Some(Operator::When),
        }
    }

    /// Direct children, left to right.
    #[must_use]
    pub fn children(&self) -> Vec<&Arc<Metadata>> {
        match self {
            Metadata::Leaf(_) => Vec::new(),
            Metadata::Unary { child, .. } | Metadata::When(child) => vec![child],
            Metadata::Binary { left, right, .. } => vec![left, right],
            Metadata::Nary { children, .. } => children.iter().collect(),
        }
    }

    /// Number of nodes in the tree, this one included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(|child| child.node_count())
            .sum::<usize>()
    }

    /// Leaf token sequences in left-to-right order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&[Element]> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a [Element]>) {
        match self {
            Metadata::Leaf(elements) => out.push(elements),
            _ => {
                for child in self.children() {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metadata::Leaf(elements) => {
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{element}")?;
                }
                Ok(())
            }
            Metadata::Unary { op, child } => write!(f, "{op} ({child})"),
            Metadata::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
            Metadata::Nary { op, children } => {
                write!(f, "{op} [")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str("]")
            }
            Metadata::When(child) => write!(f, "when {child}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    fn leaf(label: &str) -> Arc<Metadata> {
        Metadata::leaf(vec![
            Element::field(label, false),
            Element::from(Operator::Equals),
            Element::value(&Value::Int(1)),
        ])
    }

    #[test]
    fn combinators_do_not_mutate_children() {
        let a = leaf("a");
        let b = leaf("b");
        let and = Metadata::and(Arc::clone(&a), Arc::clone(&b));
        let or = Metadata::or(Arc::clone(&a), b);
        assert_eq!(*a, *leaf("a"));
        assert_ne!(and, or);
        assert_eq!(and.operator(), Some(Operator::And));
        assert_eq!(Arc::strong_count(&a), 3);
    }

    #[test]
    fn node_count_and_leaves() {
        let tree = Metadata::when(Metadata::nary(
            Operator::MatchAny,
            vec![leaf("a"), Metadata::not(leaf("b")), leaf("c")],
        ));
        assert_eq!(tree.node_count(), 6);
        let leaves = tree.leaves();
        assert_eq!(leaves.len(), 3);
        assert_eq!(leaves[1][0], Element::field("b", false));
    }

    #[test]
    fn leaf_operator_is_first_operator_token() {
        assert_eq!(leaf("a").operator(), Some(Operator::Equals));
        assert_eq!(Metadata::leaf(vec![Element::field("a", false)]).operator(), None);
    }

    #[test]
    fn display() {
        let tree = Metadata::when(Metadata::xor(leaf("a"), Metadata::not(leaf("b"))));
        assert_eq!(tree.to_string(), "when (a = 1 xor not (b = 1))");
    }

    #[test]
    fn metadata_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Metadata>();
        assert_send_sync::<Arc<Metadata>>();
    }
}
