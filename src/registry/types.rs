use serde::{Deserialize, Serialize};

use crate::{
    settlement::timelock::TimelockedField,
    types::{Address, AssetId, DeliveryMode, LicenseId, Rights, Timestamp},
};

/// Optional inference agent linked to an asset. The payout wallet sits
/// behind its own 24 h timelock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentLink {
    pub endpoint: String,
    pub wallet: TimelockedField<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: AssetId,
    pub slug: String,
    pub name: String,
    pub uri: String,
    pub owner: Address,
    pub creator: Address,
    pub listed: bool,
    pub royalty_bps: u16,
    pub price_perpetual: u64,
    pub price_subscription: u64,
    pub default_duration_days: u64,
    pub rights: Rights,
    pub delivery_mode: DeliveryMode,
    #[serde(with = "hash_hex")]
    pub terms_hash: [u8; 32],
    pub version: u16,
    /// Set when a later version of the same (owner, slug) exists. The
    /// record itself is never deleted.
    pub superseded: bool,
    pub agent: Option<AgentLink>,
}

mod hash_hex {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(hash: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let text = String::deserialize(deserializer)?;
        let decoded = hex::decode(&text).map_err(de::Error::custom)?;
        decoded
            .try_into()
            .map_err(|_| de::Error::custom("hash must be 32 bytes"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseKind {
    Perpetual,
    Subscription,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub id: LicenseId,
    pub asset_id: AssetId,
    pub holder: Address,
    pub kind: LicenseKind,
    /// Subscription only; perpetual licenses never expire.
    pub expires_at: Option<Timestamp>,
    pub transferable: bool,
    pub issued_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseStatus {
    pub revoked: bool,
    pub valid_api: bool,
    pub valid_download: bool,
    pub kind: LicenseKind,
    pub expires_at: Option<Timestamp>,
    pub holder: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingParams {
    pub slug: String,
    pub name: String,
    pub uri: String,
    pub royalty_bps: u16,
    pub price_perpetual: u64,
    pub price_subscription: u64,
    pub default_duration_days: u64,
    pub rights: Rights,
    pub delivery_mode: DeliveryMode,
    #[serde(with = "hash_hex")]
    pub terms_hash: [u8; 32],
}
