use thiserror::Error;

use super::operator::Operator;

/// Failure while lowering a rule tree to script.
///
/// Every variant except [`Io`](GenerateError::Io) means the tree itself is
/// malformed; valid combinator calls never produce one.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("operator '{operator}' expects {expected} operand(s), found {found}")]
    OperandUnderflow {
        operator: Operator,
        expected: usize,
        found: usize,
    },

    #[error("leaf left {count} operands without an operator to combine them")]
    LeftoverOperands { count: usize },

    #[error("leaf has no operand to render")]
    EmptyLeaf,

    #[error("unbalanced script frames: {open} left open")]
    Unbalanced { open: usize },

    #[error("leaf has an unmatched parenthesis")]
    UnbalancedParenthesis,

    #[error("label '{0}' is not a valid script identifier")]
    InvalidIdentifier(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operand_underflow_message() {
        let err = GenerateError::OperandUnderflow {
            operator: Operator::GreaterThan,
            expected: 1,
            found: 0,
        };
        assert_eq!(
            err.to_string(),
            "operator '>' expects 1 operand(s), found 0"
        );
    }

    #[test]
    fn leftover_operands_message() {
        let err = GenerateError::LeftoverOperands { count: 2 };
        assert_eq!(
            err.to_string(),
            "leaf left 2 operands without an operator to combine them"
        );
    }

    #[test]
    fn empty_leaf_message() {
        assert_eq!(GenerateError::EmptyLeaf.to_string(), "leaf has no operand to render");
    }

    #[test]
    fn unbalanced_message() {
        let err = GenerateError::Unbalanced { open: 1 };
        assert_eq!(err.to_string(), "unbalanced script frames: 1 left open");
    }

    #[test]
    fn parenthesis_and_identifier_messages() {
        assert_eq!(
            GenerateError::UnbalancedParenthesis.to_string(),
            "leaf has an unmatched parenthesis"
        );
        let err = GenerateError::InvalidIdentifier("user age".into());
        assert_eq!(err.to_string(), "label 'user age' is not a valid script identifier");
    }

    #[test]
    fn io_is_transparent() {
        let err = GenerateError::from(std::io::Error::other("sink closed"));
        assert_eq!(err.to_string(), "sink closed");
    }
}
