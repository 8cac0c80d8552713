//! Code generation error type.

use std::fmt;

#[derive(Debug)]
pub enum CodeGenError {
    Logic(String),
    Format(fmt::Error),
}

impl fmt::Display for CodeGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeGenError::Logic(msg) => write!(f, "{msg}"),
            CodeGenError::Format(e) => write!(f, "formatting error: {e}"),
        }
    }
}

impl std::error::Error for CodeGenError {}

impl From<String> for CodeGenError {
    fn from(msg: String) -> Self {
        CodeGenError::Logic(msg)
    }
}

impl From<fmt::Error> for CodeGenError {
    fn from(e: fmt::Error) -> Self {
        CodeGenError::Format(e)
    }
}
