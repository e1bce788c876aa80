use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementErrorKind {
    Unauthorized,
    InvalidBps,
    Paused,
    BelowMinimumWithdrawal,
    TimelockNotExpired,
    NoPendingRequest,
    UnknownAsset,
    Arithmetic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementError {
    pub kind: SettlementErrorKind,
    pub message: String,
}

impl SettlementError {
    pub fn new(kind: SettlementErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for SettlementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SettlementError {}

pub fn unauthorized(message: impl Into<String>) -> SettlementError {
    SettlementError::new(SettlementErrorKind::Unauthorized, message)
}

pub fn invalid_bps(message: impl Into<String>) -> SettlementError {
    SettlementError::new(SettlementErrorKind::InvalidBps, message)
}

pub fn paused(message: impl Into<String>) -> SettlementError {
    SettlementError::new(SettlementErrorKind::Paused, message)
}

pub fn below_minimum_withdrawal(message: impl Into<String>) -> SettlementError {
    SettlementError::new(SettlementErrorKind::BelowMinimumWithdrawal, message)
}

pub fn timelock_not_expired(message: impl Into<String>) -> SettlementError {
    SettlementError::new(SettlementErrorKind::TimelockNotExpired, message)
}

pub fn no_pending_request(message: impl Into<String>) -> SettlementError {
    SettlementError::new(SettlementErrorKind::NoPendingRequest, message)
}

pub fn unknown_asset(message: impl Into<String>) -> SettlementError {
    SettlementError::new(SettlementErrorKind::UnknownAsset, message)
}

pub fn arithmetic_error(message: impl Into<String>) -> SettlementError {
    SettlementError::new(SettlementErrorKind::Arithmetic, message)
}
