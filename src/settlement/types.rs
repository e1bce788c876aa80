use serde::{Deserialize, Serialize};

use crate::types::{Address, Amount};

pub const BPS_DENOMINATOR: u64 = 10_000;
pub const MAX_ROYALTY_BPS: u16 = 2_000;
pub const MAX_MARKETPLACE_BPS: u16 = 1_000;
pub const TIMELOCK_DELAY_SECS: u64 = 86_400;

/// 1.00 unit of a 6-decimal base token. Withdrawals below this accrue
/// until they clear the bar.
pub const DEFAULT_MIN_WITHDRAWAL: Amount = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub seller: Address,
    pub creator: Address,
    pub royalty_bps: u16,
    pub marketplace_bps: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitAmounts {
    pub seller: Amount,
    pub creator: Amount,
    pub marketplace: Amount,
}

impl SplitAmounts {
    pub fn total(&self) -> Amount {
        self.seller + self.creator + self.marketplace
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub recipient: Address,
    pub amount: Amount,
}
