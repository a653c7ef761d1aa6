//! Interpreter for [`Expr`] trees.
//!
//! Evaluation is pure: the only inputs are the tree and the bindings, and
//! nothing the query says can reach the filesystem, network or processes.

use std::cmp::Ordering;

use crate::error::{Result, RuleError};
use crate::expr::{CompareOp, Expr, Method};
use crate::value::{Bindings, Value};

/// Evaluate an expression to a value.
pub fn evaluate<B: Bindings + ?Sized>(expr: &Expr, bindings: &B) -> Result<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Name(name) => bindings
            .lookup(name)
            .ok_or_else(|| RuleError::UndefinedName(name.clone())),
        Expr::List(items) => items
            .iter()
            .map(|item| evaluate(item, bindings))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        Expr::And(operands) => {
            let mut last = Value::Bool(true);
            for operand in operands {
                last = evaluate(operand, bindings)?;
                if !last.is_truthy() {
                    break;
                }
            }
            Ok(last)
        }
        Expr::Or(operands) => {
            let mut last = Value::Bool(false);
            for operand in operands {
                last = evaluate(operand, bindings)?;
                if last.is_truthy() {
                    break;
                }
            }
            Ok(last)
        }
        Expr::Not(inner) => Ok(Value::Bool(!evaluate(inner, bindings)?.is_truthy())),
        Expr::Compare { op, lhs, rhs } => {
            let lhs = evaluate(lhs, bindings)?;
            let rhs = evaluate(rhs, bindings)?;
            compare(*op, &lhs, &rhs).map(Value::Bool)
        }
        Expr::MethodCall {
            method,
            receiver,
            arg,
        } => {
            let receiver = evaluate(receiver, bindings)?;
            let arg = evaluate(arg, bindings)?;
            call_method(*method, &receiver, &arg).map(Value::Bool)
        }
    }
}

/// Evaluate an expression and coerce the result by truthiness.
pub fn evaluate_bool<B: Bindings + ?Sized>(expr: &Expr, bindings: &B) -> Result<bool> {
    evaluate(expr, bindings).map(|v| v.is_truthy())
}

fn compare(op: CompareOp, lhs: &Value, rhs: &Value) -> Result<bool> {
    match op {
        CompareOp::Eq => Ok(lhs.loose_eq(rhs)),
        CompareOp::Ne => Ok(!lhs.loose_eq(rhs)),
        CompareOp::Lt => order(lhs, rhs, "<").map(|o| o == Ordering::Less),
        CompareOp::Le => order(lhs, rhs, "<=").map(|o| o != Ordering::Greater),
        CompareOp::Gt => order(lhs, rhs, ">").map(|o| o == Ordering::Greater),
        CompareOp::Ge => order(lhs, rhs, ">=").map(|o| o != Ordering::Less),
        CompareOp::In => contains(rhs, lhs),
        CompareOp::NotIn => contains(rhs, lhs).map(|found| !found),
    }
}

fn order(lhs: &Value, rhs: &Value, symbol: &str) -> Result<Ordering> {
    lhs.partial_order(rhs).ok_or_else(|| {
        RuleError::evaluation(format!(
            "'{}' not supported between {} and {}",
            symbol,
            lhs.type_name(),
            rhs.type_name()
        ))
    })
}

fn contains(container: &Value, needle: &Value) -> Result<bool> {
    match (container, needle) {
        (Value::List(items), _) => Ok(items.iter().any(|item| item.loose_eq(needle))),
        (Value::Str(haystack), Value::Str(n)) => Ok(haystack.contains(n.as_str())),
        (Value::Str(_), other) => Err(RuleError::evaluation(format!(
            "'in <string>' requires a string on the left, got {}",
            other.type_name()
        ))),
        (other, _) => Err(RuleError::evaluation(format!(
            "'in' not supported on {}",
            other.type_name()
        ))),
    }
}

fn call_method(method: Method, receiver: &Value, arg: &Value) -> Result<bool> {
    let (Value::Str(s), Value::Str(a)) = (receiver, arg) else {
        return Err(RuleError::evaluation(format!(
            "{}() needs string receiver and argument, got {} and {}",
            method.name(),
            receiver.type_name(),
            arg.type_name()
        )));
    };

    Ok(match method {
        Method::StartsWith => s.starts_with(a.as_str()),
        Method::EndsWith => s.ends_with(a.as_str()),
        Method::Contains => s.contains(a.as_str()),
    })
}
