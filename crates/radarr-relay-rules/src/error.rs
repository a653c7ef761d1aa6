//! Errors raised while compiling or evaluating a query.

/// Error type for the query language.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    /// The query text is malformed.
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// The query references a name that is not bound.
    #[error("undefined name '{0}'")]
    UndefinedName(String),

    /// The query is well formed but an operation failed on the given values.
    #[error("evaluation error: {0}")]
    Evaluation(String),
}

impl RuleError {
    pub fn syntax<S: Into<String>>(offset: usize, message: S) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }

    pub fn evaluation<S: Into<String>>(message: S) -> Self {
        Self::Evaluation(message.into())
    }

    /// True for errors found while compiling, false for runtime failures.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

/// Result type alias for the query language.
pub type Result<T> = std::result::Result<T, RuleError>;
