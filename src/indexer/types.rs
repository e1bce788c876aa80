use serde::{Deserialize, Serialize};

use crate::{
    indexer::error::IndexError,
    registry::types::AssetRecord,
    types::{AssetId, ChainId},
};

/// Ledger-sourced cache columns. Written only by resync; recache never
/// touches these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFields {
    pub asset_id: AssetId,
    pub chain_id: ChainId,
    pub owner: String,
    pub creator: String,
    pub name: String,
    pub slug: String,
    pub uri: String,
    pub royalty_bps: u16,
    pub listed: bool,
    pub price_perpetual: u64,
    pub price_subscription: u64,
    pub default_duration_days: u64,
    pub rights: u8,
    pub delivery_mode: String,
    pub version: u16,
    pub terms_hash: String,
    pub agent_endpoint: Option<String>,
    pub agent_wallet: Option<String>,
}

impl LedgerFields {
    pub fn from_record(chain_id: ChainId, record: &AssetRecord) -> Self {
        Self {
            asset_id: record.id,
            chain_id,
            owner: record.owner.to_string(),
            creator: record.creator.to_string(),
            name: record.name.clone(),
            slug: record.slug.clone(),
            uri: record.uri.clone(),
            royalty_bps: record.royalty_bps,
            listed: record.listed,
            price_perpetual: record.price_perpetual,
            price_subscription: record.price_subscription,
            default_duration_days: record.default_duration_days,
            rights: record.rights.bits(),
            delivery_mode: match record.delivery_mode {
                crate::types::DeliveryMode::ApiOnly => "api_only".to_string(),
                crate::types::DeliveryMode::DownloadOnly => "download_only".to_string(),
                crate::types::DeliveryMode::Hybrid => "hybrid".to_string(),
            },
            version: record.version,
            terms_hash: hex::encode(record.terms_hash),
            agent_endpoint: record.agent.as_ref().map(|agent| agent.endpoint.clone()),
            agent_wallet: record
                .agent
                .as_ref()
                .map(|agent| agent.wallet.current().to_string()),
        }
    }
}

/// Off-chain metadata document shape. Unknown fields are ignored; every
/// derived field defaults to empty so a sparse document still merges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub architectures: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRow {
    #[serde(flatten)]
    pub ledger: LedgerFields,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub frameworks: Option<Vec<String>>,
    pub architectures: Option<Vec<String>>,
    pub image_ref: Option<String>,
    pub last_updated: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRequest {
    pub asset_id: AssetId,
    pub chain_id: ChainId,
    #[serde(default)]
    pub with_metadata: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub asset_id: AssetId,
    pub chain_id: ChainId,
    pub resynced: bool,
    pub recached: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub asset_id: AssetId,
    pub chain_id: ChainId,
    pub error: IndexError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub completed: Vec<(AssetId, ChainId)>,
    pub failures: Vec<BatchFailure>,
    pub cancelled: bool,
}
