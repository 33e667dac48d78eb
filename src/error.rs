use crate::Token;

/// A committed failure: the parser recognized the start of a construct, then
/// found something it could not accept at `token`.
#[derive(thiserror::Error, Clone, PartialEq, Eq, Debug)]
#[error("{message} near {token}")]
pub struct ParseError {
    pub message: String,
    pub token: Token,
}

impl ParseError {
    /// `message` should state the violated expectation, e.g. "expected
    /// semicolon to end statement".
    pub fn new(message: impl Into<String>, token: Token) -> Self {
        ParseError { message: message.into(), token }
    }
}

/// A target type whose grammar declaration cannot be used. These are
/// programming errors in the declaration, not in the parsed input.
#[derive(thiserror::Error, Clone, PartialEq, Eq, Debug)]
#[error("type `{shape}` is not parseable: {reason}")]
pub struct DeclarationError {
    pub shape: String,
    pub reason: String,
}

impl DeclarationError {
    pub fn new(shape: impl Into<String>, reason: impl Into<String>) -> Self {
        DeclarationError { shape: shape.into(), reason: reason.into() }
    }
}

#[derive(thiserror::Error, Clone, PartialEq, Eq, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Declaration(#[from] DeclarationError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
