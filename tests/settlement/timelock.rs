use tollgate::{
    settlement::{RevenueSplitAccount, SettlementErrorKind, TIMELOCK_DELAY_SECS},
    types::Address,
};

const OWNER: u64 = 1;
const OLD_WALLET: u64 = 9;
const NEW_WALLET: u64 = 10;

fn addr(value: u64) -> Address {
    Address::from_low_u64(value)
}

#[test]
fn given_wallet_change_request_when_executed_too_early_then_fails_with_timelock_error() {
    let mut account = RevenueSplitAccount::new(addr(OWNER), addr(OLD_WALLET));
    account
        .request_marketplace_wallet_change(addr(OWNER), addr(NEW_WALLET), 1_000)
        .expect("request should succeed");

    let err = account
        .execute_marketplace_wallet_change(addr(OWNER), 1_000)
        .expect_err("t+0 must fail");
    assert_eq!(err.kind, SettlementErrorKind::TimelockNotExpired);
    assert_eq!(account.marketplace_wallet(), addr(OLD_WALLET));

    let applied = account
        .execute_marketplace_wallet_change(addr(OWNER), 1_000 + TIMELOCK_DELAY_SECS + 1)
        .expect("t+24h+1s must succeed");
    assert_eq!(applied, addr(NEW_WALLET));
    assert_eq!(account.marketplace_wallet(), addr(NEW_WALLET));
}

#[test]
fn given_executed_change_when_executing_again_then_fails_with_no_pending_request() {
    let mut account = RevenueSplitAccount::new(addr(OWNER), addr(OLD_WALLET));
    account
        .request_marketplace_wallet_change(addr(OWNER), addr(NEW_WALLET), 0)
        .expect("request should succeed");
    account
        .execute_marketplace_wallet_change(addr(OWNER), TIMELOCK_DELAY_SECS)
        .expect("execute at the deadline");

    let err = account
        .execute_marketplace_wallet_change(addr(OWNER), 2 * TIMELOCK_DELAY_SECS)
        .expect_err("request was consumed on execute");
    assert_eq!(err.kind, SettlementErrorKind::NoPendingRequest);
}

#[test]
fn given_non_owner_when_touching_the_timelock_then_fails_with_authorization_error() {
    let mut account = RevenueSplitAccount::new(addr(OWNER), addr(OLD_WALLET));
    let stranger = addr(42);

    let err = account
        .request_marketplace_wallet_change(stranger, addr(NEW_WALLET), 0)
        .expect_err("stranger request must fail");
    assert_eq!(err.kind, SettlementErrorKind::Unauthorized);

    account
        .request_marketplace_wallet_change(addr(OWNER), addr(NEW_WALLET), 0)
        .expect("owner request should succeed");
    let err = account
        .execute_marketplace_wallet_change(stranger, TIMELOCK_DELAY_SECS)
        .expect_err("stranger execute must fail");
    assert_eq!(err.kind, SettlementErrorKind::Unauthorized);
}

#[test]
fn given_cancelled_request_when_executing_then_fails_and_wallet_is_unchanged() {
    let mut account = RevenueSplitAccount::new(addr(OWNER), addr(OLD_WALLET));
    account
        .request_marketplace_wallet_change(addr(OWNER), addr(NEW_WALLET), 0)
        .expect("request should succeed");
    let discarded = account
        .cancel_marketplace_wallet_change(addr(OWNER))
        .expect("owner cancel should succeed");
    assert_eq!(discarded, Some(addr(NEW_WALLET)));

    let err = account
        .execute_marketplace_wallet_change(addr(OWNER), TIMELOCK_DELAY_SECS)
        .expect_err("cancelled request must not execute");
    assert_eq!(err.kind, SettlementErrorKind::NoPendingRequest);
    assert_eq!(account.marketplace_wallet(), addr(OLD_WALLET));
}

#[test]
fn given_applied_wallet_change_when_distributing_then_new_wallet_accrues_the_share() {
    let mut account = RevenueSplitAccount::new(addr(OWNER), addr(OLD_WALLET));
    account
        .configure_split(addr(OWNER), 7, addr(2), addr(3), 500, 250)
        .expect("configure should succeed");

    account
        .distribute_payment(addr(OWNER), 7, 100_000000)
        .expect("distribute before the change");
    account
        .request_marketplace_wallet_change(addr(OWNER), addr(NEW_WALLET), 0)
        .expect("request should succeed");
    account
        .execute_marketplace_wallet_change(addr(OWNER), TIMELOCK_DELAY_SECS)
        .expect("execute after the delay");
    account
        .distribute_payment(addr(OWNER), 7, 100_000000)
        .expect("distribute after the change");

    // accrued balances do not move with the wallet change
    assert_eq!(account.pending_balance(addr(OLD_WALLET)), 2_500000);
    assert_eq!(account.pending_balance(addr(NEW_WALLET)), 2_500000);
}
