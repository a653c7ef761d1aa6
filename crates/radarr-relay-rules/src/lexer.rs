//! Logos-based tokenizer for rule queries.
//!
//! Keywords (`and`, `or`, `not`, `in`, `true`, `false`, `none`) are matched
//! case-insensitively so that queries written as `a == 1 AND b == 2` keep
//! working. Identifiers that merely start with a keyword (`android`,
//! `notes`) still lex as names because Logos prefers the longest match.

use logos::Logos;

use crate::error::RuleError;

/// Token types emitted by the Logos lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token<'src> {
    // -----------------------------------------------------------------
    // Keywords
    // -----------------------------------------------------------------
    #[regex(r"(?i)and", priority = 10)]
    And,

    #[regex(r"(?i)or", priority = 10)]
    Or,

    #[regex(r"(?i)not", priority = 10)]
    Not,

    #[regex(r"(?i)in", priority = 10)]
    In,

    #[regex(r"(?i)true", priority = 10)]
    True,

    #[regex(r"(?i)false", priority = 10)]
    False,

    /// `None`, `none` or `null`.
    #[regex(r"(?i)(none|null)", priority = 10)]
    Null,

    // -----------------------------------------------------------------
    // Literals
    // -----------------------------------------------------------------
    /// Single or double quoted string, escapes already resolved.
    #[regex(r#"'([^'\\]|\\.)*'"#, unescape)]
    #[regex(r#""([^"\\]|\\.)*""#, unescape)]
    Str(String),

    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok(), priority = 4)]
    Float(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok(), priority = 3)]
    Int(i64),

    /// Field or method name (lowest priority).
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", priority = 1)]
    Name(&'src str),

    // -----------------------------------------------------------------
    // Operators and punctuation
    // -----------------------------------------------------------------
    #[token("==")]
    Eq,

    #[token("!=")]
    Ne,

    #[token("<=")]
    Le,

    #[token(">=")]
    Ge,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("-")]
    Minus,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,
}

/// A token together with the byte span it occupies in the query.
#[derive(Debug, Clone)]
pub struct SpannedToken<'src> {
    pub token: Token<'src>,
    pub span: std::ops::Range<usize>,
}

/// Tokenize a query, failing on the first character sequence that is not a
/// valid token.
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken<'_>>, RuleError> {
    Token::lexer(input)
        .spanned()
        .map(|(result, span)| match result {
            Ok(token) => Ok(SpannedToken { token, span }),
            Err(()) => Err(RuleError::syntax(
                span.start,
                format!("unexpected input '{}'", &input[span.clone()]),
            )),
        })
        .collect()
}

fn unescape<'src>(lex: &mut logos::Lexer<'src, Token<'src>>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
