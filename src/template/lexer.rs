//! Lexer for template text using logos
//!
//! A template is literal text with `{name|type}` or `{name|type?}`
//! placeholders. Anything that does not form a well-formed placeholder,
//! including a stray `{`, is literal text.

use logos::{Lexer, Logos};

use crate::error::Span;

/// A placeholder as written in the template, borrowed from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPlaceholder<'src> {
    pub name: &'src str,
    /// Type token without the trailing `?`
    pub type_name: &'src str,
    pub optional: bool,
}

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    #[regex(r"\{[A-Za-z0-9_]+\|[A-Za-z0-9_]+\??\}", placeholder)]
    Placeholder(RawPlaceholder<'src>),

    // Line breaks are matched loosely so CRLF input lines up with LF templates
    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"[^{\r\n]+", |lex| lex.slice())]
    Text(&'src str),

    // An opening brace that does not start a placeholder
    #[token("{")]
    Brace,
}

fn placeholder<'src>(lex: &mut Lexer<'src, Token<'src>>) -> Option<RawPlaceholder<'src>> {
    let slice = lex.slice();
    let inner = slice.strip_prefix('{')?.strip_suffix('}')?;
    let (name, type_token) = inner.split_once('|')?;
    let (type_name, optional) = match type_token.strip_suffix('?') {
        Some(stripped) => (stripped, true),
        None => (type_token, false),
    };
    Some(RawPlaceholder {
        name,
        type_name,
        optional,
    })
}

/// Lex template text into tokens with spans
///
/// Unrecognized input (a lone `\r`) comes back as literal text so no byte of
/// the template is lost.
pub fn lex(input: &str) -> impl Iterator<Item = (Token<'_>, Span)> + '_ {
    Token::lexer(input).spanned().map(move |(tok, span)| match tok {
        Ok(tok) => (tok, span),
        Err(()) => (Token::Text(&input[span.clone()]), span),
    })
}
