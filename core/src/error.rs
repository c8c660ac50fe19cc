use crate::boolean::Operator;

/// Failure to compile a Boolean query line. Fatal to that query only.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A `)` was found with no `(` left on the operator stack.
    #[error("mismatched parenthesis: `)` has no opening `(`")]
    MismatchedParenthesis,
    /// A `(` was still open when the query ended.
    #[error("unexpected parenthesis: `(` is never closed")]
    UnexpectedParenthesis,
    #[error("operator {operator} is missing an operand")]
    MissingOperand { operator: Operator },
}

/// A skip-annotated posting entry that could not be decoded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid skip entry `{0}`, expected `id` or `id:target`")]
pub struct InvalidSkipEntry(pub String);
