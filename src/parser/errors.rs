use crate::lexer::LexError;
use thiserror::Error;

/// A parse failure poisons the whole load: the caller gets no partial
/// statement list, only the error.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("listfile is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("expected '(' after command '{name}' at line {line}")]
    ExpectedParen { name: String, line: u32 },

    #[error("unexpected token in command '{name}' at line {line}")]
    UnexpectedToken { name: String, line: u32 },

    #[error("unterminated command '{name}' starting at line {line}")]
    UnterminatedStatement { name: String, line: u32 },
}
