use serde::{Deserialize, Serialize};

use crate::types::{LicenseId, Rights, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerSelector {
    Account,
    Object,
}

/// Resolved answer to "may this principal use this asset right now".
/// `found: false` is the normal no-entitlement outcome, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub found: bool,
    pub rights: Rights,
    pub license_id: Option<LicenseId>,
    pub expires_at: Option<Timestamp>,
}

impl Entitlement {
    pub fn none() -> Self {
        Self {
            found: false,
            rights: Rights::NONE,
            license_id: None,
            expires_at: None,
        }
    }
}
