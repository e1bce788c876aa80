use std::fmt;

use crate::codec::error::CodecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainErrorKind {
    Upstream,
    Protocol,
    Decode,
    NotFound,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainError {
    pub kind: ChainErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl ChainError {
    pub fn new(kind: ChainErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: matches!(kind, ChainErrorKind::Upstream),
        }
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ChainError {}

impl From<CodecError> for ChainError {
    fn from(err: CodecError) -> Self {
        decode_error(err.message)
    }
}

pub fn upstream(message: impl Into<String>) -> ChainError {
    ChainError::new(ChainErrorKind::Upstream, message)
}

pub fn protocol(message: impl Into<String>) -> ChainError {
    ChainError::new(ChainErrorKind::Protocol, message)
}

pub fn decode_error(message: impl Into<String>) -> ChainError {
    ChainError::new(ChainErrorKind::Decode, message)
}

pub fn not_found(message: impl Into<String>) -> ChainError {
    ChainError::new(ChainErrorKind::NotFound, message)
}

pub fn internal_error(message: impl Into<String>) -> ChainError {
    ChainError::new(ChainErrorKind::Internal, message)
}
