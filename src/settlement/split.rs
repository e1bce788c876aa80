use std::collections::{BTreeMap, BTreeSet};

use crate::{
    settlement::{
        error::{
            SettlementError, arithmetic_error, below_minimum_withdrawal, invalid_bps, paused,
            unauthorized, unknown_asset,
        },
        timelock::TimelockedField,
        types::{
            BPS_DENOMINATOR, DEFAULT_MIN_WITHDRAWAL, MAX_MARKETPLACE_BPS, MAX_ROYALTY_BPS, Payout,
            SplitAmounts, SplitConfig,
        },
    },
    types::{Address, Amount, AssetId, Timestamp},
};

/// Per-asset revenue split with pull-payment escrow. Distribution credits
/// pending balances; withdrawal zeroes the balance before the payout is
/// surfaced, so a reentrant caller observes zero.
#[derive(Debug, Clone)]
pub struct RevenueSplitAccount {
    owner: Address,
    authorized_callers: BTreeSet<Address>,
    splits: BTreeMap<AssetId, SplitConfig>,
    pending: BTreeMap<Address, Amount>,
    marketplace_wallet: TimelockedField<Address>,
    min_withdrawal: Amount,
    is_paused: bool,
}

impl RevenueSplitAccount {
    pub fn new(owner: Address, marketplace_wallet: Address) -> Self {
        Self {
            owner,
            authorized_callers: BTreeSet::new(),
            splits: BTreeMap::new(),
            pending: BTreeMap::new(),
            marketplace_wallet: TimelockedField::new(marketplace_wallet),
            min_withdrawal: DEFAULT_MIN_WITHDRAWAL,
            is_paused: false,
        }
    }

    pub fn with_min_withdrawal(mut self, min_withdrawal: Amount) -> Self {
        self.min_withdrawal = min_withdrawal;
        self
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn marketplace_wallet(&self) -> Address {
        *self.marketplace_wallet.current()
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn min_withdrawal(&self) -> Amount {
        self.min_withdrawal
    }

    pub fn split_config(&self, asset_id: AssetId) -> Option<&SplitConfig> {
        self.splits.get(&asset_id)
    }

    pub fn pending_balance(&self, recipient: Address) -> Amount {
        self.pending.get(&recipient).copied().unwrap_or(0)
    }

    fn require_owner(&self, caller: Address) -> Result<(), SettlementError> {
        if caller != self.owner {
            return Err(unauthorized(format!(
                "caller {caller} is not the settlement owner"
            )));
        }
        Ok(())
    }

    fn require_authorized(&self, caller: Address) -> Result<(), SettlementError> {
        if caller != self.owner && !self.authorized_callers.contains(&caller) {
            return Err(unauthorized(format!(
                "caller {caller} is not on the authorized caller list"
            )));
        }
        Ok(())
    }

    fn require_active(&self, operation: &str) -> Result<(), SettlementError> {
        if self.is_paused {
            return Err(paused(format!("{operation} is disabled while paused")));
        }
        Ok(())
    }

    pub fn set_authorized_caller(
        &mut self,
        caller: Address,
        candidate: Address,
        allowed: bool,
    ) -> Result<(), SettlementError> {
        self.require_owner(caller)?;
        if allowed {
            self.authorized_callers.insert(candidate);
        } else {
            self.authorized_callers.remove(&candidate);
        }
        Ok(())
    }

    /// Idempotent re-configuration is allowed; the previous config for the
    /// asset is overwritten.
    pub fn configure_split(
        &mut self,
        caller: Address,
        asset_id: AssetId,
        seller: Address,
        creator: Address,
        royalty_bps: u16,
        marketplace_bps: u16,
    ) -> Result<(), SettlementError> {
        self.require_authorized(caller)?;
        self.require_active("configure_split")?;
        if royalty_bps > MAX_ROYALTY_BPS {
            return Err(invalid_bps(format!(
                "royalty_bps {royalty_bps} exceeds maximum {MAX_ROYALTY_BPS}"
            )));
        }
        if marketplace_bps > MAX_MARKETPLACE_BPS {
            return Err(invalid_bps(format!(
                "marketplace_bps {marketplace_bps} exceeds maximum {MAX_MARKETPLACE_BPS}"
            )));
        }

        self.splits.insert(
            asset_id,
            SplitConfig {
                seller,
                creator,
                royalty_bps,
                marketplace_bps,
            },
        );
        Ok(())
    }

    /// Pure quote: no balances change. Seller absorbs the rounding
    /// remainder, so the three parts always sum to `amount`.
    pub fn calculate_split(
        &self,
        asset_id: AssetId,
        amount: Amount,
    ) -> Result<SplitAmounts, SettlementError> {
        let config = self
            .splits
            .get(&asset_id)
            .ok_or_else(|| unknown_asset(format!("no split configured for asset {asset_id}")))?;
        compute_split(config, amount)
    }

    pub fn distribute_payment(
        &mut self,
        caller: Address,
        asset_id: AssetId,
        amount: Amount,
    ) -> Result<SplitAmounts, SettlementError> {
        self.require_authorized(caller)?;
        self.require_active("distribute_payment")?;
        let config = self
            .splits
            .get(&asset_id)
            .ok_or_else(|| unknown_asset(format!("no split configured for asset {asset_id}")))?;
        let amounts = compute_split(config, amount)?;

        let seller = config.seller;
        let creator = config.creator;
        let marketplace = self.marketplace_wallet();
        self.credit(seller, amounts.seller)?;
        self.credit(creator, amounts.creator)?;
        self.credit(marketplace, amounts.marketplace)?;
        Ok(amounts)
    }

    fn credit(&mut self, recipient: Address, amount: Amount) -> Result<(), SettlementError> {
        if amount == 0 {
            return Ok(());
        }
        let balance = self.pending.entry(recipient).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| arithmetic_error(format!("pending balance overflow for {recipient}")))?;
        Ok(())
    }

    /// Remains available while paused: escrowed funds must always be
    /// retrievable. The balance is zeroed before the payout leaves this
    /// method; a reentrant withdraw during the transfer sees zero and
    /// fails the minimum check.
    pub fn withdraw(&mut self, caller: Address) -> Result<Payout, SettlementError> {
        let balance = self.pending.get(&caller).copied().unwrap_or(0);
        if balance < self.min_withdrawal {
            return Err(below_minimum_withdrawal(format!(
                "pending balance {balance} is below the minimum withdrawal {}",
                self.min_withdrawal
            )));
        }

        // step 1: zero the accumulator
        self.pending.remove(&caller);
        // step 2: hand the value out
        Ok(Payout {
            recipient: caller,
            amount: balance,
        })
    }

    pub fn request_marketplace_wallet_change(
        &mut self,
        caller: Address,
        new_wallet: Address,
        now: Timestamp,
    ) -> Result<(), SettlementError> {
        self.require_owner(caller)?;
        self.marketplace_wallet.request(new_wallet, now);
        Ok(())
    }

    pub fn execute_marketplace_wallet_change(
        &mut self,
        caller: Address,
        now: Timestamp,
    ) -> Result<Address, SettlementError> {
        self.require_owner(caller)?;
        let applied = self.marketplace_wallet.execute(now)?;
        Ok(*applied)
    }

    pub fn cancel_marketplace_wallet_change(
        &mut self,
        caller: Address,
    ) -> Result<Option<Address>, SettlementError> {
        self.require_owner(caller)?;
        Ok(self.marketplace_wallet.cancel())
    }

    pub fn pause(&mut self, caller: Address) -> Result<(), SettlementError> {
        self.require_owner(caller)?;
        self.is_paused = true;
        Ok(())
    }

    pub fn unpause(&mut self, caller: Address) -> Result<(), SettlementError> {
        self.require_owner(caller)?;
        self.is_paused = false;
        Ok(())
    }
}

fn compute_split(config: &SplitConfig, amount: Amount) -> Result<SplitAmounts, SettlementError> {
    let denominator = Amount::from(BPS_DENOMINATOR);
    let marketplace = amount
        .checked_mul(Amount::from(config.marketplace_bps))
        .ok_or_else(|| arithmetic_error("marketplace share overflow"))?
        / denominator;
    let creator = amount
        .checked_mul(Amount::from(config.royalty_bps))
        .ok_or_else(|| arithmetic_error("royalty share overflow"))?
        / denominator;
    let seller = amount
        .checked_sub(marketplace)
        .and_then(|rest| rest.checked_sub(creator))
        .ok_or_else(|| arithmetic_error("seller share underflow"))?;
    Ok(SplitAmounts {
        seller,
        creator,
        marketplace,
    })
}
