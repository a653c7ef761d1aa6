//! Expression tree produced by the parser.

use crate::value::Value;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
}

/// The only callable methods; all take one string argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    StartsWith,
    EndsWith,
    Contains,
}

impl Method {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "startswith" => Some(Self::StartsWith),
            "endswith" => Some(Self::EndsWith),
            "contains" => Some(Self::Contains),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
            Self::Contains => "contains",
        }
    }
}

/// A boolean/comparison expression over named values.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal constant.
    Literal(Value),
    /// A reference to a bound name.
    Name(String),
    /// A list literal.
    List(Vec<Expr>),
    /// Yields the first falsy operand, or the last one.
    And(Vec<Expr>),
    /// Yields the first truthy operand, or the last one.
    Or(Vec<Expr>),
    /// Negates the truthiness of the inner expression.
    Not(Box<Expr>),
    Compare {
        op: CompareOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    MethodCall {
        method: Method,
        receiver: Box<Expr>,
        arg: Box<Expr>,
    },
}
