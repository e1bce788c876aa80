use std::{future::Future, sync::Arc};

use crate::{
    chain::{
        error::ChainError,
        ports::{AccountLedgerPort, ObjectLedgerPort},
    },
    codec::asset_state::decode_asset_detail,
    entitlement::types::{Entitlement, LedgerSelector},
    registry::types::{LicenseKind, LicenseRecord},
    types::{Address, AssetId, Rights, Timestamp},
};

/// Answers entitlement queries from ledger-derived state only. The
/// catalog cache is display material and is never consulted here.
pub struct EntitlementResolver {
    account: Arc<dyn AccountLedgerPort>,
    object: Arc<dyn ObjectLedgerPort>,
}

impl EntitlementResolver {
    pub fn new(account: Arc<dyn AccountLedgerPort>, object: Arc<dyn ObjectLedgerPort>) -> Self {
        Self { account, object }
    }

    pub async fn resolve(
        &self,
        ledger: LedgerSelector,
        principal: Address,
        asset_id: AssetId,
        now: Timestamp,
    ) -> Result<Entitlement, ChainError> {
        match ledger {
            LedgerSelector::Account => self.resolve_account(principal, asset_id, now).await,
            LedgerSelector::Object => self.resolve_object(principal, asset_id, now).await,
        }
    }

    async fn resolve_account(
        &self,
        principal: Address,
        asset_id: AssetId,
        now: Timestamp,
    ) -> Result<Entitlement, ChainError> {
        let Some(asset) = self.account.asset_record(asset_id).await? else {
            return Ok(Entitlement::none());
        };
        let candidates = self.account.licenses_of(principal, asset_id).await?;
        self.first_valid(candidates, asset.rights, now, |license_id| {
            let account = Arc::clone(&self.account);
            async move { account.is_revoked(license_id).await }
        })
        .await
    }

    async fn resolve_object(
        &self,
        principal: Address,
        asset_id: AssetId,
        now: Timestamp,
    ) -> Result<Entitlement, ChainError> {
        let Some(detail_bytes) = self.object.asset_detail(asset_id).await? else {
            return Ok(Entitlement::none());
        };
        let detail = decode_asset_detail(&detail_bytes)?;
        let candidates: Vec<LicenseRecord> = self
            .object
            .licenses_of(principal)
            .await?
            .into_iter()
            .filter(|license| license.asset_id == asset_id)
            .collect();
        self.first_valid(
            candidates,
            detail.delivery_rights_default,
            now,
            |license_id| {
                let object = Arc::clone(&self.object);
                async move { object.is_revoked(license_id).await }
            },
        )
        .await
    }

    /// First valid match wins, in ascending license-id order. A principal
    /// may hold several licenses for one asset (e.g. repurchase after
    /// expiry); rights are never unioned across them.
    async fn first_valid<F, Fut>(
        &self,
        mut candidates: Vec<LicenseRecord>,
        rights: Rights,
        now: Timestamp,
        revocation_lookup: F,
    ) -> Result<Entitlement, ChainError>
    where
        F: Fn(u64) -> Fut,
        Fut: Future<Output = Result<bool, ChainError>>,
    {
        candidates.sort_by_key(|license| license.id);
        for license in candidates {
            if revocation_lookup(license.id).await? {
                continue;
            }
            if !license_is_current(&license, now) {
                continue;
            }
            return Ok(Entitlement {
                found: true,
                rights,
                license_id: Some(license.id),
                expires_at: license.expires_at,
            });
        }
        Ok(Entitlement::none())
    }

    /// Current asset id for an owner+slug composite key. A miss means the
    /// slug is unpublished, a normal state.
    pub async fn resolve_slug(
        &self,
        owner: Address,
        slug: &str,
    ) -> Result<Option<AssetId>, ChainError> {
        self.object.resolve_slug(owner, slug).await
    }
}

fn license_is_current(license: &LicenseRecord, now: Timestamp) -> bool {
    match (license.kind, license.expires_at) {
        (LicenseKind::Perpetual, _) => true,
        (LicenseKind::Subscription, Some(expires_at)) => now < expires_at,
        (LicenseKind::Subscription, None) => false,
    }
}
