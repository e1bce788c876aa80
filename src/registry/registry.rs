use std::collections::{BTreeMap, BTreeSet};

use sha2::{Digest, Sha256};

use crate::{
    registry::{
        error::{
            RegistryError, RegistryErrorKind, arithmetic_error, insufficient_payment,
            invalid_params, not_found, not_listed, not_transferable, unauthorized,
        },
        types::{AgentLink, AssetRecord, LicenseKind, LicenseRecord, LicenseStatus, ListingParams},
    },
    settlement::{
        error::{SettlementError, SettlementErrorKind},
        timelock::TimelockedField,
        types::MAX_ROYALTY_BPS,
    },
    types::{Address, Amount, AssetId, LicenseId, Timestamp},
};

const SUBSCRIPTION_MONTH_SECS: u64 = 30 * 86_400;
const MAX_SUBSCRIPTION_MONTHS: u32 = 120;

pub fn terms_hash(terms: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(terms.as_bytes());
    hasher.finalize().into()
}

/// Asset listings and licenses for the account-model ledger. Records are
/// superseded on version bump and revoked via side-records; nothing is
/// ever physically deleted.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    authority: Address,
    next_asset_id: AssetId,
    next_license_id: LicenseId,
    assets: BTreeMap<AssetId, AssetRecord>,
    slug_latest: BTreeMap<(Address, String), AssetId>,
    licenses: BTreeMap<LicenseId, LicenseRecord>,
    licenses_by_holder: BTreeMap<Address, BTreeSet<LicenseId>>,
    revocations: BTreeSet<LicenseId>,
}

impl AssetRegistry {
    pub fn new(authority: Address) -> Self {
        Self {
            authority,
            next_asset_id: 0,
            next_license_id: 0,
            assets: BTreeMap::new(),
            slug_latest: BTreeMap::new(),
            licenses: BTreeMap::new(),
            licenses_by_holder: BTreeMap::new(),
            revocations: BTreeSet::new(),
        }
    }

    pub fn asset(&self, asset_id: AssetId) -> Option<&AssetRecord> {
        self.assets.get(&asset_id)
    }

    pub fn license(&self, license_id: LicenseId) -> Option<&LicenseRecord> {
        self.licenses.get(&license_id)
    }

    pub fn is_revoked(&self, license_id: LicenseId) -> bool {
        self.revocations.contains(&license_id)
    }

    /// A miss is a normal state (unpublished slug), not a fault.
    pub fn resolve_slug(&self, owner: Address, slug: &str) -> Option<AssetId> {
        self.slug_latest.get(&(owner, slug.to_string())).copied()
    }

    pub fn licenses_of(&self, holder: Address) -> Vec<LicenseRecord> {
        self.licenses_by_holder
            .get(&holder)
            .into_iter()
            .flatten()
            .filter_map(|license_id| self.licenses.get(license_id).cloned())
            .collect()
    }

    pub fn list_or_upgrade(
        &mut self,
        caller: Address,
        params: ListingParams,
    ) -> Result<AssetId, RegistryError> {
        if params.slug.trim().is_empty() {
            return Err(invalid_params("slug must not be empty"));
        }
        if params.royalty_bps > MAX_ROYALTY_BPS {
            return Err(invalid_params(format!(
                "royalty_bps {} exceeds maximum {MAX_ROYALTY_BPS}",
                params.royalty_bps
            )));
        }
        if params.rights.is_empty() || params.rights.has_unknown_bits() {
            return Err(invalid_params(format!(
                "rights mask {:#04x} is empty or carries unknown bits",
                params.rights.bits()
            )));
        }

        let slug_key = (caller, params.slug.clone());
        let previous = self.slug_latest.get(&slug_key).copied();
        let (version, creator, agent) = match previous {
            Some(previous_id) => {
                let previous_record = self
                    .assets
                    .get_mut(&previous_id)
                    .ok_or_else(|| not_found(format!("stale slug pointer to {previous_id}")))?;
                previous_record.superseded = true;
                let version = previous_record
                    .version
                    .checked_add(1)
                    .ok_or_else(|| arithmetic_error("asset version overflow"))?;
                (
                    version,
                    previous_record.creator,
                    previous_record.agent.clone(),
                )
            }
            None => (1, caller, None),
        };

        self.next_asset_id = self
            .next_asset_id
            .checked_add(1)
            .ok_or_else(|| arithmetic_error("asset id overflow"))?;
        let asset_id = self.next_asset_id;

        self.assets.insert(
            asset_id,
            AssetRecord {
                id: asset_id,
                slug: params.slug,
                name: params.name,
                uri: params.uri,
                owner: caller,
                creator,
                listed: true,
                royalty_bps: params.royalty_bps,
                price_perpetual: params.price_perpetual,
                price_subscription: params.price_subscription,
                default_duration_days: params.default_duration_days,
                rights: params.rights,
                delivery_mode: params.delivery_mode,
                terms_hash: params.terms_hash,
                version,
                superseded: false,
                agent,
            },
        );
        self.slug_latest.insert(slug_key, asset_id);
        Ok(asset_id)
    }

    fn owned_asset_mut(
        &mut self,
        caller: Address,
        asset_id: AssetId,
    ) -> Result<&mut AssetRecord, RegistryError> {
        let record = self
            .assets
            .get_mut(&asset_id)
            .ok_or_else(|| not_found(format!("unknown asset {asset_id}")))?;
        if record.owner != caller {
            return Err(unauthorized(format!(
                "caller {caller} does not own asset {asset_id}"
            )));
        }
        Ok(record)
    }

    pub fn set_listed(
        &mut self,
        caller: Address,
        asset_id: AssetId,
        listed: bool,
    ) -> Result<(), RegistryError> {
        self.owned_asset_mut(caller, asset_id)?.listed = listed;
        Ok(())
    }

    pub fn set_licensing_params(
        &mut self,
        caller: Address,
        asset_id: AssetId,
        price_perpetual: u64,
        price_subscription: u64,
        default_duration_days: u64,
        terms_hash: [u8; 32],
    ) -> Result<(), RegistryError> {
        let record = self.owned_asset_mut(caller, asset_id)?;
        record.price_perpetual = price_perpetual;
        record.price_subscription = price_subscription;
        record.default_duration_days = default_duration_days;
        record.terms_hash = terms_hash;
        Ok(())
    }

    pub fn link_agent(
        &mut self,
        caller: Address,
        asset_id: AssetId,
        endpoint: String,
        wallet: Address,
    ) -> Result<(), RegistryError> {
        if endpoint.trim().is_empty() {
            return Err(invalid_params("agent endpoint must not be empty"));
        }
        let record = self.owned_asset_mut(caller, asset_id)?;
        record.agent = Some(AgentLink {
            endpoint,
            wallet: TimelockedField::new(wallet),
        });
        Ok(())
    }

    pub fn request_agent_wallet_change(
        &mut self,
        caller: Address,
        asset_id: AssetId,
        new_wallet: Address,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        let record = self.owned_asset_mut(caller, asset_id)?;
        let agent = record
            .agent
            .as_mut()
            .ok_or_else(|| not_found(format!("asset {asset_id} has no linked agent")))?;
        agent.wallet.request(new_wallet, now);
        Ok(())
    }

    pub fn execute_agent_wallet_change(
        &mut self,
        caller: Address,
        asset_id: AssetId,
        now: Timestamp,
    ) -> Result<Address, RegistryError> {
        let record = self.owned_asset_mut(caller, asset_id)?;
        let agent = record
            .agent
            .as_mut()
            .ok_or_else(|| not_found(format!("asset {asset_id} has no linked agent")))?;
        let applied = agent
            .wallet
            .execute(now)
            .map_err(|err| RegistryError::new(map_timelock_kind(&err), err.message))?;
        Ok(*applied)
    }

    /// Mints a license. Returns the id and the amount to hand to the
    /// settlement engine for distribution; purchase and distribution are
    /// composed into one transaction by the ledger, not by this engine.
    pub fn buy_license(
        &mut self,
        caller: Address,
        asset_id: AssetId,
        kind: LicenseKind,
        months: u32,
        transferable: bool,
        payment: Amount,
        now: Timestamp,
    ) -> Result<(LicenseId, Amount), RegistryError> {
        let record = self
            .assets
            .get(&asset_id)
            .ok_or_else(|| not_found(format!("unknown asset {asset_id}")))?;
        if !record.listed || record.superseded {
            return Err(not_listed(format!(
                "asset {asset_id} is not purchasable (listed={}, superseded={})",
                record.listed, record.superseded
            )));
        }

        let (price, expires_at) = match kind {
            LicenseKind::Perpetual => {
                if record.price_perpetual == 0 {
                    return Err(invalid_params(format!(
                        "asset {asset_id} does not offer a perpetual license"
                    )));
                }
                (Amount::from(record.price_perpetual), None)
            }
            LicenseKind::Subscription => {
                if record.price_subscription == 0 {
                    return Err(invalid_params(format!(
                        "asset {asset_id} does not offer a subscription license"
                    )));
                }
                if months == 0 || months > MAX_SUBSCRIPTION_MONTHS {
                    return Err(invalid_params(format!(
                        "subscription months {months} outside 1..={MAX_SUBSCRIPTION_MONTHS}"
                    )));
                }
                let price = Amount::from(record.price_subscription)
                    .checked_mul(Amount::from(months))
                    .ok_or_else(|| arithmetic_error("subscription price overflow"))?;
                let duration = u64::from(months)
                    .checked_mul(SUBSCRIPTION_MONTH_SECS)
                    .ok_or_else(|| arithmetic_error("subscription duration overflow"))?;
                (price, Some(now.saturating_add(duration)))
            }
        };

        if payment < price {
            return Err(insufficient_payment(format!(
                "payment {payment} below price {price} for asset {asset_id}"
            )));
        }

        self.next_license_id = self
            .next_license_id
            .checked_add(1)
            .ok_or_else(|| arithmetic_error("license id overflow"))?;
        let license_id = self.next_license_id;

        self.licenses.insert(
            license_id,
            LicenseRecord {
                id: license_id,
                asset_id,
                holder: caller,
                kind,
                expires_at,
                transferable,
                issued_at: now,
            },
        );
        self.licenses_by_holder
            .entry(caller)
            .or_default()
            .insert(license_id);

        Ok((license_id, payment))
    }

    /// Revocation is an additive side-record keyed by license id; the
    /// license record itself stays untouched for audit history.
    pub fn revoke_license(
        &mut self,
        caller: Address,
        license_id: LicenseId,
    ) -> Result<(), RegistryError> {
        let license = self
            .licenses
            .get(&license_id)
            .ok_or_else(|| not_found(format!("unknown license {license_id}")))?;
        let asset = self
            .assets
            .get(&license.asset_id)
            .ok_or_else(|| not_found(format!("unknown asset {}", license.asset_id)))?;
        if caller != self.authority && caller != asset.owner {
            return Err(unauthorized(format!(
                "caller {caller} may not revoke license {license_id}"
            )));
        }
        self.revocations.insert(license_id);
        Ok(())
    }

    pub fn transfer_license(
        &mut self,
        caller: Address,
        license_id: LicenseId,
        to: Address,
    ) -> Result<(), RegistryError> {
        let license = self
            .licenses
            .get_mut(&license_id)
            .ok_or_else(|| not_found(format!("unknown license {license_id}")))?;
        if license.holder != caller {
            return Err(unauthorized(format!(
                "caller {caller} does not hold license {license_id}"
            )));
        }
        if license.kind != LicenseKind::Subscription || !license.transferable {
            return Err(not_transferable(format!(
                "license {license_id} is not a transferable subscription"
            )));
        }
        if self.revocations.contains(&license_id) {
            return Err(not_transferable(format!(
                "license {license_id} has been revoked"
            )));
        }

        let from = license.holder;
        license.holder = to;
        if let Some(held) = self.licenses_by_holder.get_mut(&from) {
            held.remove(&license_id);
        }
        self.licenses_by_holder
            .entry(to)
            .or_default()
            .insert(license_id);
        Ok(())
    }

    pub fn license_status(&self, license_id: LicenseId, now: Timestamp) -> Option<LicenseStatus> {
        let license = self.licenses.get(&license_id)?;
        let asset = self.assets.get(&license.asset_id)?;
        let revoked = self.revocations.contains(&license_id);
        let unexpired = match (license.kind, license.expires_at) {
            (LicenseKind::Perpetual, _) => true,
            (LicenseKind::Subscription, Some(expires_at)) => now < expires_at,
            (LicenseKind::Subscription, None) => false,
        };
        let valid = !revoked && unexpired;
        Some(LicenseStatus {
            revoked,
            valid_api: valid && asset.rights.allows_api(),
            valid_download: valid && asset.rights.allows_download(),
            kind: license.kind,
            expires_at: license.expires_at,
            holder: license.holder,
        })
    }
}

fn map_timelock_kind(err: &SettlementError) -> RegistryErrorKind {
    match err.kind {
        SettlementErrorKind::NoPendingRequest => RegistryErrorKind::NoPendingRequest,
        _ => RegistryErrorKind::TimelockNotExpired,
    }
}
