use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryErrorKind {
    Unauthorized,
    InvalidParams,
    NotFound,
    NotListed,
    InsufficientPayment,
    NotTransferable,
    TimelockNotExpired,
    NoPendingRequest,
    Arithmetic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryError {
    pub kind: RegistryErrorKind,
    pub message: String,
}

impl RegistryError {
    pub fn new(kind: RegistryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RegistryError {}

pub fn unauthorized(message: impl Into<String>) -> RegistryError {
    RegistryError::new(RegistryErrorKind::Unauthorized, message)
}

pub fn invalid_params(message: impl Into<String>) -> RegistryError {
    RegistryError::new(RegistryErrorKind::InvalidParams, message)
}

pub fn not_found(message: impl Into<String>) -> RegistryError {
    RegistryError::new(RegistryErrorKind::NotFound, message)
}

pub fn not_listed(message: impl Into<String>) -> RegistryError {
    RegistryError::new(RegistryErrorKind::NotListed, message)
}

pub fn insufficient_payment(message: impl Into<String>) -> RegistryError {
    RegistryError::new(RegistryErrorKind::InsufficientPayment, message)
}

pub fn not_transferable(message: impl Into<String>) -> RegistryError {
    RegistryError::new(RegistryErrorKind::NotTransferable, message)
}

pub fn arithmetic_error(message: impl Into<String>) -> RegistryError {
    RegistryError::new(RegistryErrorKind::Arithmetic, message)
}
