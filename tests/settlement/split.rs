use tollgate::{
    settlement::{RevenueSplitAccount, SettlementErrorKind},
    types::Address,
};

const OWNER: u64 = 1;
const SELLER: u64 = 2;
const CREATOR: u64 = 3;
const MARKETPLACE_WALLET: u64 = 9;
const PROXY: u64 = 20;

fn addr(value: u64) -> Address {
    Address::from_low_u64(value)
}

fn configured_account() -> RevenueSplitAccount {
    let mut account = RevenueSplitAccount::new(addr(OWNER), addr(MARKETPLACE_WALLET));
    account
        .configure_split(addr(OWNER), 7, addr(SELLER), addr(CREATOR), 500, 250)
        .expect("configure should succeed");
    account
}

#[test]
fn given_configured_split_when_quoting_then_shares_match_the_documented_example() {
    let account = configured_account();
    // 100.00 units in a 6-decimal base
    let amounts = account.calculate_split(7, 100_000000).expect("quote");
    assert_eq!(amounts.marketplace, 2_500000);
    assert_eq!(amounts.creator, 5_000000);
    assert_eq!(amounts.seller, 92_500000);
    assert_eq!(amounts.total(), 100_000000);
}

#[test]
fn given_any_valid_bps_pair_when_quoting_then_shares_are_conserved() {
    let mut account = RevenueSplitAccount::new(addr(OWNER), addr(MARKETPLACE_WALLET));
    for (royalty_bps, marketplace_bps) in
        [(0u16, 0u16), (1, 1), (333, 77), (2000, 1000), (1999, 999)]
    {
        account
            .configure_split(
                addr(OWNER),
                1,
                addr(SELLER),
                addr(CREATOR),
                royalty_bps,
                marketplace_bps,
            )
            .expect("bps pair within bounds must configure");
        for amount in [1u128, 9_999, 10_000, 10_001, 100_000000, u64::MAX as u128] {
            let amounts = account.calculate_split(1, amount).expect("quote");
            assert_eq!(
                amounts.total(),
                amount,
                "royalty={royalty_bps} marketplace={marketplace_bps} amount={amount}"
            );
        }
    }
}

#[test]
fn given_existing_config_when_reconfiguring_then_the_new_tuple_overwrites() {
    let mut account = configured_account();
    assert_eq!(account.owner(), addr(OWNER));

    account
        .configure_split(addr(OWNER), 7, addr(SELLER), addr(CREATOR), 800, 100)
        .expect("re-configuration is allowed");
    let config = account.split_config(7).expect("config present");
    assert_eq!(config.royalty_bps, 800);
    assert_eq!(config.marketplace_bps, 100);
}

#[test]
fn given_bps_above_the_caps_when_configuring_then_fails_with_bounds_error() {
    let mut account = RevenueSplitAccount::new(addr(OWNER), addr(MARKETPLACE_WALLET));

    let err = account
        .configure_split(addr(OWNER), 7, addr(SELLER), addr(CREATOR), 2500, 250)
        .expect_err("royalty above 2000 must fail");
    assert_eq!(err.kind, SettlementErrorKind::InvalidBps);

    let err = account
        .configure_split(addr(OWNER), 7, addr(SELLER), addr(CREATOR), 500, 1500)
        .expect_err("marketplace above 1000 must fail");
    assert_eq!(err.kind, SettlementErrorKind::InvalidBps);
}

#[test]
fn given_unrelated_caller_when_mutating_then_fails_with_authorization_error() {
    let mut account = configured_account();
    let stranger = addr(99);

    let err = account
        .configure_split(stranger, 8, addr(SELLER), addr(CREATOR), 100, 100)
        .expect_err("stranger configure must fail");
    assert_eq!(err.kind, SettlementErrorKind::Unauthorized);

    let err = account
        .distribute_payment(stranger, 7, 1_000_000)
        .expect_err("stranger distribute must fail");
    assert_eq!(err.kind, SettlementErrorKind::Unauthorized);

    let err = account.pause(stranger).expect_err("stranger pause must fail");
    assert_eq!(err.kind, SettlementErrorKind::Unauthorized);
}

#[test]
fn given_allow_listed_proxy_when_distributing_then_succeeds_until_removed() {
    let mut account = configured_account();
    account
        .set_authorized_caller(addr(OWNER), addr(PROXY), true)
        .expect("owner can extend the allow-list");

    account
        .distribute_payment(addr(PROXY), 7, 10_000)
        .expect("allow-listed proxy can distribute");

    account
        .set_authorized_caller(addr(OWNER), addr(PROXY), false)
        .expect("owner can shrink the allow-list");
    let err = account
        .distribute_payment(addr(PROXY), 7, 10_000)
        .expect_err("removed proxy must fail");
    assert_eq!(err.kind, SettlementErrorKind::Unauthorized);
}

#[test]
fn given_distribution_when_crediting_then_every_unit_lands_in_exactly_one_balance() {
    let mut account = configured_account();
    let amount = 1_000_003;
    let amounts = account
        .distribute_payment(addr(OWNER), 7, amount)
        .expect("distribute should succeed");

    assert_eq!(account.pending_balance(addr(SELLER)), amounts.seller);
    assert_eq!(account.pending_balance(addr(CREATOR)), amounts.creator);
    assert_eq!(
        account.pending_balance(addr(MARKETPLACE_WALLET)),
        amounts.marketplace
    );
    assert_eq!(
        account.pending_balance(addr(SELLER))
            + account.pending_balance(addr(CREATOR))
            + account.pending_balance(addr(MARKETPLACE_WALLET)),
        amount
    );
}

#[test]
fn given_balance_below_minimum_when_withdrawing_then_fails_until_topped_up() {
    let mut account = configured_account();
    // seller share of 100_000 is 92_500, below the 1_000_000 minimum
    account
        .distribute_payment(addr(OWNER), 7, 100_000)
        .expect("distribute should succeed");

    let err = account
        .withdraw(addr(SELLER))
        .expect_err("dust balance must not withdraw");
    assert_eq!(err.kind, SettlementErrorKind::BelowMinimumWithdrawal);
    // failed withdrawal leaves the balance in place
    assert_eq!(account.pending_balance(addr(SELLER)), 92_500);

    account
        .distribute_payment(addr(OWNER), 7, 10_000_000)
        .expect("second distribution should succeed");
    let payout = account
        .withdraw(addr(SELLER))
        .expect("topped-up balance must withdraw");
    assert_eq!(payout.recipient, addr(SELLER));
    assert_eq!(payout.amount, 92_500 + 9_250_000);
    assert_eq!(account.pending_balance(addr(SELLER)), 0);
}

#[test]
fn given_completed_withdrawal_when_reentering_then_sees_zero_and_fails() {
    let mut account = configured_account();
    account
        .distribute_payment(addr(OWNER), 7, 100_000000)
        .expect("distribute should succeed");

    let payout = account.withdraw(addr(SELLER)).expect("first withdrawal");
    assert_eq!(payout.amount, 92_500000);

    // the balance was zeroed before the payout surfaced, so a reentrant
    // call finds nothing to take
    let err = account
        .withdraw(addr(SELLER))
        .expect_err("second withdrawal must fail");
    assert_eq!(err.kind, SettlementErrorKind::BelowMinimumWithdrawal);
}

#[test]
fn given_paused_account_when_mutating_then_only_withdraw_stays_available() {
    let mut account = configured_account();
    account
        .distribute_payment(addr(OWNER), 7, 100_000000)
        .expect("distribute before pausing");
    account.pause(addr(OWNER)).expect("owner pauses");

    let err = account
        .configure_split(addr(OWNER), 8, addr(SELLER), addr(CREATOR), 100, 100)
        .expect_err("configure while paused must fail");
    assert_eq!(err.kind, SettlementErrorKind::Paused);

    let err = account
        .distribute_payment(addr(OWNER), 7, 1_000)
        .expect_err("distribute while paused must fail");
    assert_eq!(err.kind, SettlementErrorKind::Paused);

    // escrowed funds stay retrievable
    let payout = account
        .withdraw(addr(SELLER))
        .expect("withdraw while paused must succeed");
    assert_eq!(payout.amount, 92_500000);

    account.unpause(addr(OWNER)).expect("owner unpauses");
    account
        .distribute_payment(addr(OWNER), 7, 1_000_000)
        .expect("distribute after unpausing");
}

#[test]
fn given_custom_minimum_when_withdrawing_then_threshold_applies() {
    let mut account = RevenueSplitAccount::new(addr(OWNER), addr(MARKETPLACE_WALLET))
        .with_min_withdrawal(10);
    assert_eq!(account.min_withdrawal(), 10);
    account
        .configure_split(addr(OWNER), 7, addr(SELLER), addr(CREATOR), 0, 0)
        .expect("configure should succeed");
    account
        .distribute_payment(addr(OWNER), 7, 9)
        .expect("distribute should succeed");

    let err = account.withdraw(addr(SELLER)).expect_err("below threshold");
    assert_eq!(err.kind, SettlementErrorKind::BelowMinimumWithdrawal);

    account
        .distribute_payment(addr(OWNER), 7, 1)
        .expect("distribute should succeed");
    let payout = account.withdraw(addr(SELLER)).expect("at threshold");
    assert_eq!(payout.amount, 10);
}
