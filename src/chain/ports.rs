use async_trait::async_trait;

use crate::{
    chain::error::ChainError,
    registry::types::{AssetRecord, LicenseRecord, LicenseStatus},
    types::{Address, AssetId, LicenseId, Timestamp},
};

/// Read surface of the account-model ledger. All calls are side-effect
/// free and safe to issue in parallel.
#[async_trait]
pub trait AccountLedgerPort: Send + Sync {
    async fn asset_record(&self, asset_id: AssetId) -> Result<Option<AssetRecord>, ChainError>;

    async fn licenses_of(
        &self,
        holder: Address,
        asset_id: AssetId,
    ) -> Result<Vec<LicenseRecord>, ChainError>;

    /// Side lookup against the revocation flag object, kept separate from
    /// the license record itself.
    async fn is_revoked(&self, license_id: LicenseId) -> Result<bool, ChainError>;

    async fn license_status(
        &self,
        license_id: LicenseId,
        now: Timestamp,
    ) -> Result<Option<LicenseStatus>, ChainError>;
}

/// Read surface of the object/capability ledger. Page and detail queries
/// return the ledger's fixed-width binary encoding; the caller feeds them
/// to the codec.
#[async_trait]
pub trait ObjectLedgerPort: Send + Sync {
    async fn asset_page(&self, cursor: u64, limit: u32) -> Result<Vec<u8>, ChainError>;

    async fn asset_detail(&self, asset_id: AssetId) -> Result<Option<Vec<u8>>, ChainError>;

    /// Composite owner+slug key lookup returning the `latest_id` pointer.
    /// A miss is a normal state, reported as `None`.
    async fn resolve_slug(
        &self,
        owner: Address,
        slug: &str,
    ) -> Result<Option<AssetId>, ChainError>;

    async fn licenses_of(&self, holder: Address) -> Result<Vec<LicenseRecord>, ChainError>;

    async fn is_revoked(&self, license_id: LicenseId) -> Result<bool, ChainError>;
}
