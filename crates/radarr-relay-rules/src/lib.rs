//! # radarr-relay-rules
//!
//! A small, restricted query language for routing webhook records.
//!
//! Queries are boolean expressions over named values:
//!
//! ```text
//! quality_profile == 'HD' AND ('4k' in tags or path.endswith('.mkv'))
//! ```
//!
//! ## Overview
//!
//! - [`lexer`] -- Logos tokenizer, keywords are case-insensitive.
//! - [`parser`] -- recursive-descent parser producing an [`Expr`].
//! - [`eval`] -- pure interpreter over [`Value`]s supplied by [`Bindings`].
//! - [`Query`] -- a compiled query ready to be evaluated many times.
//!
//! There are no function calls other than `startswith`, `endswith` and
//! `contains` on strings, no attribute access, no assignment and no loops.

pub mod error;
pub mod eval;
pub mod expr;
pub mod lexer;
pub mod parser;
pub mod value;

pub use error::{Result, RuleError};
pub use eval::{evaluate, evaluate_bool};
pub use expr::{CompareOp, Expr, Method};
pub use value::{Bindings, Value};

/// A parsed query together with its source text.
#[derive(Debug, Clone)]
pub struct Query {
    source: String,
    expr: Expr,
}

impl Query {
    /// Parse `source` into a query.
    pub fn compile(source: &str) -> Result<Self> {
        let expr = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    /// Evaluate against `bindings`, coercing the result by truthiness.
    pub fn matches<B: Bindings + ?Sized>(&self, bindings: &B) -> Result<bool> {
        evaluate_bool(&self.expr, bindings)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl std::str::FromStr for Query {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::compile(s)
    }
}
