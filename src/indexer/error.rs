use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chain::error::{ChainError, ChainErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexErrorKind {
    Upstream,
    Decode,
    Cache,
    NotFound,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexError {
    pub kind: IndexErrorKind,
    pub message: String,
}

impl IndexError {
    pub fn new(kind: IndexErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for IndexError {}

impl From<ChainError> for IndexError {
    fn from(err: ChainError) -> Self {
        let kind = match err.kind {
            ChainErrorKind::Upstream | ChainErrorKind::Protocol => IndexErrorKind::Upstream,
            ChainErrorKind::Decode => IndexErrorKind::Decode,
            ChainErrorKind::NotFound => IndexErrorKind::NotFound,
            ChainErrorKind::Internal => IndexErrorKind::Internal,
        };
        IndexError::new(kind, err.message)
    }
}

pub fn upstream(message: impl Into<String>) -> IndexError {
    IndexError::new(IndexErrorKind::Upstream, message)
}

pub fn decode_error(message: impl Into<String>) -> IndexError {
    IndexError::new(IndexErrorKind::Decode, message)
}

pub fn cache_error(message: impl Into<String>) -> IndexError {
    IndexError::new(IndexErrorKind::Cache, message)
}

pub fn not_found(message: impl Into<String>) -> IndexError {
    IndexError::new(IndexErrorKind::NotFound, message)
}

pub fn internal_error(message: impl Into<String>) -> IndexError {
    IndexError::new(IndexErrorKind::Internal, message)
}
