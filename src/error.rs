use crate::term::Value;

/// Crate-wide result type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Every error the crate can report to a caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Program or query text was malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Two terms could not be made equal.
    #[error(transparent)]
    Unification(#[from] UnificationError),
}

/// Two resolved terms that cannot be made syntactically equal.
///
/// The resolution engine treats this as "reject the current alternative"; it
/// only reaches callers who invoke [`unify`](crate::unify()) directly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to unify {left} and {right}")]
pub struct UnificationError {
    /// Left-hand term, after resolution
    pub left: Value,
    /// Right-hand term, after resolution
    pub right: Value,
}

impl UnificationError {
    pub(crate) fn new(left: &Value, right: &Value) -> Self {
        Self {
            left: left.clone(),
            right: right.clone(),
        }
    }
}

/// Malformed program or query text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at line {line}, column {column}: {message}")]
pub struct ParseError {
    /// 1-based line of the first unparsed character
    pub line: usize,
    /// 1-based column of the first unparsed character
    pub column: usize,
    /// What went wrong
    pub message: String,
}

impl ParseError {
    /// Builds an error pointing at `remaining`, which must be a suffix of `source`.
    pub(crate) fn at(source: &str, remaining: &str, message: impl Into<String>) -> Self {
        let offset = source.len().saturating_sub(remaining.len());
        let consumed = &source[..offset];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rfind('\n')
            .map_or(consumed.chars().count(), |nl| consumed[nl + 1..].chars().count())
            + 1;
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}
