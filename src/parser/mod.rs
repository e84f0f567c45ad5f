use thiserror::Error;

use crate::ast::*;
use crate::lexer::{Lexer, LexerError, Token, TokenKind};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{msg}\nline:{line}, pos {col}")]
    Error {
        msg: String,
        line: usize,
        col: usize,
    },
    #[error(transparent)]
    Lex(#[from] LexerError),
}

/// Recursive-descent statement parser with a Pratt expression core. Tokens
/// are pulled lazily from the lexer through a two-token cursor
/// (`curr`, `next`); a saved token can be handed back via [`Lexer::back_to`]
/// to unwind the speculative read that disambiguates indexing from the
/// legacy `name[]{…}` array-literal form.
pub struct Parser {
    lexer: Lexer,
    curr: Token,
    next: Token,
}

mod core;
mod expr;
mod stmts;
