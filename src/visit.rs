//! Traversal protocol shared by every backend that reads a rule tree.
//!
//! [`browse`] walks a [`Metadata`] tree and fires callbacks in a fixed order:
//!
//! - when: `start_when`, child, `end_when`
//! - leaf: `start_leaf` only
//! - unary: `start_unary`, `before_child_unary`, child, `end_unary`
//! - binary: `start_binary`, left, `after_child_binary(true)`, right,
//!   `after_child_binary(false)`, `end_binary`
//! - n-ary: `start_nary`, then for each child: child, `after_child_nary(not last)`;
//!   then `end_nary`
//!
//! Children are visited left to right at `depth + 1`. The first callback
//! error stops the walk.

use crate::{Element, Metadata, Operator};

/// Callbacks for [`browse`]. Every callback defaults to a no-op.
#[allow(unused_variables)]
pub trait Visitor {
    type Error;

    fn start_when(&mut self, depth: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end_when(&mut self, depth: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn start_leaf(&mut self, elements: &[Element], depth: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn start_unary(&mut self, op: Operator, depth: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn before_child_unary(&mut self, op: Operator, depth: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end_unary(&mut self, op: Operator, depth: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn start_binary(&mut self, op: Operator, depth: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn after_child_binary(
        &mut self,
        op: Operator,
        has_next: bool,
        depth: usize,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end_binary(&mut self, op: Operator, depth: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn start_nary(&mut self, op: Operator, depth: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn after_child_nary(
        &mut self,
        op: Operator,
        has_next: bool,
        depth: usize,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end_nary(&mut self, op: Operator, depth: usize) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Walk `metadata` depth-first, driving `visitor`.
///
/// # Errors
///
/// Returns the first error a callback returns.
pub fn browse<V: Visitor + ?Sized>(
    metadata: &Metadata,
    visitor: &mut V,
    depth: usize,
) -> Result<(), V::Error> {
    match metadata {
        Metadata::When(child) => {
            visitor.start_when(depth)?;
            browse(child, visitor, depth + 1)?;
            visitor.end_when(depth)
        }
        Metadata::Leaf(elements) => visitor.start_leaf(elements, depth),
        Metadata::Unary { op, child } => {
            visitor.start_unary(*op, depth)?;
            visitor.before_child_unary(*op, depth)?;
            browse(child, visitor, depth + 1)?;
            visitor.end_unary(*op, depth)
        }
        Metadata::Binary { op, left, right } => {
            visitor.start_binary(*op, depth)?;
            browse(left, visitor, depth + 1)?;
            visitor.after_child_binary(*op, true, depth)?;
            browse(right, visitor, depth + 1)?;
            visitor.after_child_binary(*op, false, depth)?;
            visitor.end_binary(*op, depth)
        }
        Metadata::Nary { op, children } => {
            visitor.start_nary(*op, depth)?;
            for (i, child) in children.iter().enumerate() {
                browse(child, visitor, depth + 1)?;
                visitor.after_child_nary(*op, i + 1 < children.len(), depth)?;
            }
            visitor.end_nary(*op, depth)
        }
    }
}
