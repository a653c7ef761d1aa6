//! Recursive-descent parser from tokens to an [`Expr`] tree.
//!
//! Precedence, lowest first: `or`, `and`, `not`, comparisons, method calls,
//! primaries. Comparisons do not chain.

use crate::error::{Result, RuleError};
use crate::expr::{CompareOp, Expr, Method};
use crate::lexer::{tokenize, SpannedToken, Token};
use crate::value::Value;

/// Maximum nesting of parentheses, lists and `not` operators.
pub const MAX_DEPTH: usize = 64;

/// Parse a query into an expression tree.
pub fn parse(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(RuleError::syntax(0, "empty query"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
        depth: 0,
    };
    let expr = parser.parse_or()?;

    if let Some(tok) = parser.peek() {
        return Err(RuleError::syntax(
            tok.span.start,
            format!("unexpected token {:?}", tok.token),
        ));
    }
    Ok(expr)
}

struct Parser<'src> {
    tokens: Vec<SpannedToken<'src>>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl<'src> Parser<'src> {
    fn peek(&self) -> Option<&SpannedToken<'src>> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&Token<'src>> {
        self.peek().map(|t| &t.token)
    }

    fn offset(&self) -> usize {
        self.peek().map(|t| t.span.start).unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<SpannedToken<'src>> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, expected: &Token<'src>) -> bool {
        if self.peek_token() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token<'src>, what: &str) -> Result<()> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(RuleError::syntax(self.offset(), format!("expected {}", what)))
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(RuleError::syntax(
                self.offset(),
                format!("query nested deeper than {} levels", MAX_DEPTH),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut operands = vec![self.parse_and()?];
        while self.eat(&Token::Or) {
            operands.push(self.parse_and()?);
        }
        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::Or(operands)
        })
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut operands = vec![self.parse_not()?];
        while self.eat(&Token::And) {
            operands.push(self.parse_not()?);
        }
        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::And(operands)
        })
    }

    fn parse_not(&mut self) -> Result<Expr> {
        if self.eat(&Token::Not) {
            self.enter()?;
            let inner = self.parse_not()?;
            self.leave();
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let lhs = self.parse_postfix()?;

        let op = match self.peek_token().cloned() {
            Some(Token::Eq) => CompareOp::Eq,
            Some(Token::Ne) => CompareOp::Ne,
            Some(Token::Lt) => CompareOp::Lt,
            Some(Token::Le) => CompareOp::Le,
            Some(Token::Gt) => CompareOp::Gt,
            Some(Token::Ge) => CompareOp::Ge,
            Some(Token::In) => CompareOp::In,
            Some(Token::Not) => {
                // `not` after an operand is only valid as `not in`.
                if self.tokens.get(self.pos + 1).map(|t| &t.token) != Some(&Token::In) {
                    return Err(RuleError::syntax(self.offset(), "expected 'in' after 'not'"));
                }
                self.pos += 1;
                CompareOp::NotIn
            }
            _ => return Ok(lhs),
        };
        self.pos += 1;

        let rhs = self.parse_postfix()?;
        Ok(Expr::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;

        while self.eat(&Token::Dot) {
            let offset = self.offset();
            let method = match self.advance().map(|t| t.token) {
                Some(Token::Name(name)) => Method::from_name(name).ok_or_else(|| {
                    RuleError::syntax(offset, format!("unknown method '{}'", name))
                })?,
                _ => return Err(RuleError::syntax(offset, "expected method name after '.'")),
            };

            self.expect(Token::LParen, "'(' after method name")?;
            self.enter()?;
            let arg = self.parse_or()?;
            self.leave();
            self.expect(Token::RParen, "')' to close method call")?;

            expr = Expr::MethodCall {
                method,
                receiver: Box::new(expr),
                arg: Box::new(arg),
            };
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let offset = self.offset();
        let tok = self
            .advance()
            .ok_or_else(|| RuleError::syntax(offset, "unexpected end of query"))?;

        match tok.token {
            Token::Str(s) => Ok(Expr::Literal(Value::Str(s))),
            Token::Int(i) => Ok(Expr::Literal(Value::Int(i))),
            Token::Float(f) => Ok(Expr::Literal(Value::Float(f))),
            Token::True => Ok(Expr::Literal(Value::Bool(true))),
            Token::False => Ok(Expr::Literal(Value::Bool(false))),
            Token::Null => Ok(Expr::Literal(Value::None)),
            Token::Name(name) => Ok(Expr::Name(name.to_string())),
            Token::Minus => match self.advance().map(|t| t.token) {
                Some(Token::Int(i)) => Ok(Expr::Literal(Value::Int(-i))),
                Some(Token::Float(f)) => Ok(Expr::Literal(Value::Float(-f))),
                _ => Err(RuleError::syntax(offset, "'-' must precede a number")),
            },
            Token::LParen => {
                self.enter()?;
                let inner = self.parse_or()?;
                self.leave();
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::LBracket => {
                self.enter()?;
                let mut items = Vec::new();
                while !self.eat(&Token::RBracket) {
                    items.push(self.parse_or()?);
                    if !self.eat(&Token::Comma) {
                        self.expect(Token::RBracket, "',' or ']' in list")?;
                        break;
                    }
                }
                self.leave();
                Ok(Expr::List(items))
            }
            other => Err(RuleError::syntax(
                tok.span.start,
                format!("unexpected token {:?}", other),
            )),
        }
    }
}
