use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    chain::{
        error::{ChainError, internal_error},
        ports::{AccountLedgerPort, ObjectLedgerPort},
    },
    codec::asset_state::{AssetDetail, AssetSummary, encode_asset_detail, encode_asset_page},
    registry::{
        registry::AssetRegistry,
        types::{AssetRecord, LicenseKind, LicenseRecord, LicenseStatus, ListingParams},
    },
    settlement::split::RevenueSplitAccount,
    types::{Address, Amount, AssetId, LicenseId, Timestamp},
};

pub struct AccountState {
    pub registry: AssetRegistry,
    pub settlement: RevenueSplitAccount,
}

/// Account-model ledger fake: the native registry and settlement engines
/// behind one lock, composed the way the on-chain contracts compose them.
/// Each helper models one ledger transaction (fully applied or fully
/// rejected).
#[derive(Clone)]
pub struct InMemoryAccountLedger {
    authority: Address,
    marketplace_bps: u16,
    state: Arc<Mutex<AccountState>>,
}

impl InMemoryAccountLedger {
    pub fn new(authority: Address, marketplace_wallet: Address, marketplace_bps: u16) -> Self {
        Self {
            authority,
            marketplace_bps,
            state: Arc::new(Mutex::new(AccountState {
                registry: AssetRegistry::new(authority),
                settlement: RevenueSplitAccount::new(authority, marketplace_wallet),
            })),
        }
    }

    pub async fn with_state<R>(&self, f: impl FnOnce(&mut AccountState) -> R) -> R {
        let mut state = self.state.lock().await;
        f(&mut state)
    }

    /// Listing also (re)configures the asset's revenue split, as the
    /// marketplace contract does in the same transaction.
    pub async fn list_or_upgrade(
        &self,
        caller: Address,
        params: ListingParams,
    ) -> Result<AssetId, ChainError> {
        let mut state = self.state.lock().await;
        let royalty_bps = params.royalty_bps;
        let asset_id = state
            .registry
            .list_or_upgrade(caller, params)
            .map_err(|err| internal_error(format!("list_or_upgrade reverted: {err}")))?;
        let creator = state
            .registry
            .asset(asset_id)
            .map(|record| record.creator)
            .unwrap_or(caller);
        state
            .settlement
            .configure_split(
                self.authority,
                asset_id,
                caller,
                creator,
                royalty_bps,
                self.marketplace_bps,
            )
            .map_err(|err| internal_error(format!("configure_split reverted: {err}")))?;
        Ok(asset_id)
    }

    pub async fn set_listed(
        &self,
        caller: Address,
        asset_id: AssetId,
        listed: bool,
    ) -> Result<(), ChainError> {
        let mut state = self.state.lock().await;
        state
            .registry
            .set_listed(caller, asset_id, listed)
            .map_err(|err| internal_error(format!("set_listed reverted: {err}")))
    }

    /// Purchase mints the license and distributes the payment in one
    /// transaction.
    pub async fn buy_license(
        &self,
        caller: Address,
        asset_id: AssetId,
        kind: LicenseKind,
        months: u32,
        transferable: bool,
        payment: Amount,
        now: Timestamp,
    ) -> Result<LicenseId, ChainError> {
        let mut state = self.state.lock().await;
        let (license_id, paid) = state
            .registry
            .buy_license(caller, asset_id, kind, months, transferable, payment, now)
            .map_err(|err| internal_error(format!("buy_license reverted: {err}")))?;
        state
            .settlement
            .distribute_payment(self.authority, asset_id, paid)
            .map_err(|err| internal_error(format!("distribute_payment reverted: {err}")))?;
        Ok(license_id)
    }

    pub async fn revoke_license(
        &self,
        caller: Address,
        license_id: LicenseId,
    ) -> Result<(), ChainError> {
        let mut state = self.state.lock().await;
        state
            .registry
            .revoke_license(caller, license_id)
            .map_err(|err| internal_error(format!("revoke_license reverted: {err}")))
    }

    pub async fn transfer_license(
        &self,
        caller: Address,
        license_id: LicenseId,
        to: Address,
    ) -> Result<(), ChainError> {
        let mut state = self.state.lock().await;
        state
            .registry
            .transfer_license(caller, license_id, to)
            .map_err(|err| internal_error(format!("transfer_license reverted: {err}")))
    }
}

#[async_trait]
impl AccountLedgerPort for InMemoryAccountLedger {
    async fn asset_record(&self, asset_id: AssetId) -> Result<Option<AssetRecord>, ChainError> {
        let state = self.state.lock().await;
        Ok(state.registry.asset(asset_id).cloned())
    }

    async fn licenses_of(
        &self,
        holder: Address,
        asset_id: AssetId,
    ) -> Result<Vec<LicenseRecord>, ChainError> {
        let state = self.state.lock().await;
        Ok(state
            .registry
            .licenses_of(holder)
            .into_iter()
            .filter(|license| license.asset_id == asset_id)
            .collect())
    }

    async fn is_revoked(&self, license_id: LicenseId) -> Result<bool, ChainError> {
        let state = self.state.lock().await;
        Ok(state.registry.is_revoked(license_id))
    }

    async fn license_status(
        &self,
        license_id: LicenseId,
        now: Timestamp,
    ) -> Result<Option<LicenseStatus>, ChainError> {
        let state = self.state.lock().await;
        Ok(state.registry.license_status(license_id, now))
    }
}

#[derive(Default)]
struct ObjectState {
    summaries: BTreeMap<AssetId, AssetSummary>,
    details: BTreeMap<AssetId, AssetDetail>,
    slug_latest: BTreeMap<(Address, String), AssetId>,
    licenses: BTreeMap<LicenseId, LicenseRecord>,
    by_holder: BTreeMap<Address, BTreeSet<LicenseId>>,
    revocations: BTreeSet<LicenseId>,
}

/// Object/capability ledger fake. State is held as typed records and
/// encoded to the wire format on every read, so consumers exercise the
/// real codec path.
#[derive(Clone, Default)]
pub struct InMemoryObjectLedger {
    state: Arc<Mutex<ObjectState>>,
}

impl InMemoryObjectLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn publish_asset(
        &self,
        summary: AssetSummary,
        detail: AssetDetail,
        slug: &str,
    ) {
        let mut state = self.state.lock().await;
        let owner = summary.owner;
        state
            .slug_latest
            .insert((owner, slug.to_string()), summary.id);
        state.details.insert(summary.id, detail);
        state.summaries.insert(summary.id, summary);
    }

    pub async fn mint_license(&self, record: LicenseRecord) {
        let mut state = self.state.lock().await;
        state
            .by_holder
            .entry(record.holder)
            .or_default()
            .insert(record.id);
        state.licenses.insert(record.id, record);
    }

    pub async fn revoke_license(&self, license_id: LicenseId) {
        let mut state = self.state.lock().await;
        state.revocations.insert(license_id);
    }
}

#[async_trait]
impl ObjectLedgerPort for InMemoryObjectLedger {
    async fn asset_page(&self, cursor: u64, limit: u32) -> Result<Vec<u8>, ChainError> {
        let state = self.state.lock().await;
        let entries: Vec<AssetSummary> = state
            .summaries
            .values()
            .filter(|summary| summary.id > cursor)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(encode_asset_page(&entries))
    }

    async fn asset_detail(&self, asset_id: AssetId) -> Result<Option<Vec<u8>>, ChainError> {
        let state = self.state.lock().await;
        Ok(state
            .details
            .get(&asset_id)
            .map(|detail| encode_asset_detail(detail)))
    }

    async fn resolve_slug(
        &self,
        owner: Address,
        slug: &str,
    ) -> Result<Option<AssetId>, ChainError> {
        let state = self.state.lock().await;
        Ok(state.slug_latest.get(&(owner, slug.to_string())).copied())
    }

    async fn licenses_of(&self, holder: Address) -> Result<Vec<LicenseRecord>, ChainError> {
        let state = self.state.lock().await;
        Ok(state
            .by_holder
            .get(&holder)
            .into_iter()
            .flatten()
            .filter_map(|license_id| state.licenses.get(license_id).cloned())
            .collect())
    }

    async fn is_revoked(&self, license_id: LicenseId) -> Result<bool, ChainError> {
        let state = self.state.lock().await;
        Ok(state.revocations.contains(&license_id))
    }
}
