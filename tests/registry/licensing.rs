use tollgate::{
    registry::{AssetRegistry, LicenseKind, ListingParams, RegistryErrorKind, terms_hash},
    settlement::TIMELOCK_DELAY_SECS,
    types::{Address, DeliveryMode, Rights},
};

const AUTHORITY: u64 = 1;
const SELLER: u64 = 2;
const BUYER: u64 = 3;

const MONTH_SECS: u64 = 30 * 86_400;

fn addr(value: u64) -> Address {
    Address::from_low_u64(value)
}

fn params(slug: &str) -> ListingParams {
    ListingParams {
        slug: slug.to_string(),
        name: format!("model {slug}"),
        uri: format!("ipfs://meta/{slug}"),
        royalty_bps: 500,
        price_perpetual: 50_000_000,
        price_subscription: 5_000_000,
        default_duration_days: 30,
        rights: Rights::ALL,
        delivery_mode: DeliveryMode::Hybrid,
        terms_hash: terms_hash("standard terms v1"),
    }
}

fn registry_with_listing() -> (AssetRegistry, u64) {
    let mut registry = AssetRegistry::new(addr(AUTHORITY));
    let asset_id = registry
        .list_or_upgrade(addr(SELLER), params("base-model"))
        .expect("listing should succeed");
    (registry, asset_id)
}

#[test]
fn given_perpetual_purchase_when_checking_status_then_valid_and_never_expiring() {
    let (mut registry, asset_id) = registry_with_listing();
    let (license_id, paid) = registry
        .buy_license(
            addr(BUYER),
            asset_id,
            LicenseKind::Perpetual,
            0,
            false,
            50_000_000,
            1_000,
        )
        .expect("purchase should succeed");
    assert_eq!(paid, 50_000_000);

    let status = registry
        .license_status(license_id, u64::MAX - 1)
        .expect("license must exist");
    assert!(!status.revoked);
    assert!(status.valid_api);
    assert!(status.valid_download);
    assert_eq!(status.expires_at, None);
    assert_eq!(status.holder, addr(BUYER));
}

#[test]
fn given_subscription_when_time_passes_then_validity_flips_at_expiry() {
    let (mut registry, asset_id) = registry_with_listing();
    let bought_at = 1_000;
    let (license_id, _) = registry
        .buy_license(
            addr(BUYER),
            asset_id,
            LicenseKind::Subscription,
            2,
            false,
            10_000_000,
            bought_at,
        )
        .expect("purchase should succeed");

    let expires_at = bought_at + 2 * MONTH_SECS;
    let status = registry
        .license_status(license_id, expires_at - 1)
        .expect("license must exist");
    assert!(status.valid_api);
    assert_eq!(status.expires_at, Some(expires_at));

    let status = registry
        .license_status(license_id, expires_at)
        .expect("license must exist");
    assert!(!status.valid_api);
    assert!(!status.valid_download);
    assert!(!status.revoked, "expiry is not revocation");
}

#[test]
fn given_revoked_license_when_checking_status_then_never_valid_but_record_survives() {
    let (mut registry, asset_id) = registry_with_listing();
    let (license_id, _) = registry
        .buy_license(
            addr(BUYER),
            asset_id,
            LicenseKind::Perpetual,
            0,
            false,
            50_000_000,
            1_000,
        )
        .expect("purchase should succeed");

    registry
        .revoke_license(addr(SELLER), license_id)
        .expect("asset owner may revoke");

    let status = registry
        .license_status(license_id, 2_000)
        .expect("revocation must not delete the license");
    assert!(status.revoked);
    assert!(!status.valid_api);
    assert!(!status.valid_download);
    // the original record is untouched by the side-record flag
    let record = registry.license(license_id).expect("record kept");
    assert_eq!(record.holder, addr(BUYER));
}

#[test]
fn given_stranger_when_revoking_then_fails_with_authorization_error() {
    let (mut registry, asset_id) = registry_with_listing();
    let (license_id, _) = registry
        .buy_license(
            addr(BUYER),
            asset_id,
            LicenseKind::Perpetual,
            0,
            false,
            50_000_000,
            1_000,
        )
        .expect("purchase should succeed");

    let err = registry
        .revoke_license(addr(99), license_id)
        .expect_err("stranger revoke must fail");
    assert_eq!(err.kind, RegistryErrorKind::Unauthorized);
}

#[test]
fn given_underpayment_when_buying_then_fails_with_insufficient_payment() {
    let (mut registry, asset_id) = registry_with_listing();
    let err = registry
        .buy_license(
            addr(BUYER),
            asset_id,
            LicenseKind::Perpetual,
            0,
            false,
            49_999_999,
            1_000,
        )
        .expect_err("underpayment must fail");
    assert_eq!(err.kind, RegistryErrorKind::InsufficientPayment);
}

#[test]
fn given_delisted_or_superseded_asset_when_buying_then_fails() {
    let (mut registry, asset_id) = registry_with_listing();
    registry
        .set_listed(addr(SELLER), asset_id, false)
        .expect("owner may delist");
    let err = registry
        .buy_license(
            addr(BUYER),
            asset_id,
            LicenseKind::Perpetual,
            0,
            false,
            50_000_000,
            1_000,
        )
        .expect_err("delisted asset must not sell");
    assert_eq!(err.kind, RegistryErrorKind::NotListed);

    registry
        .set_listed(addr(SELLER), asset_id, true)
        .expect("owner may relist");
    let upgraded = registry
        .list_or_upgrade(addr(SELLER), params("base-model"))
        .expect("upgrade should succeed");
    let err = registry
        .buy_license(
            addr(BUYER),
            asset_id,
            LicenseKind::Perpetual,
            0,
            false,
            50_000_000,
            1_000,
        )
        .expect_err("superseded version must not sell");
    assert_eq!(err.kind, RegistryErrorKind::NotListed);

    registry
        .buy_license(
            addr(BUYER),
            upgraded,
            LicenseKind::Perpetual,
            0,
            false,
            50_000_000,
            1_000,
        )
        .expect("current version sells");
}

#[test]
fn given_transferable_subscription_when_transferred_then_holder_and_indexes_move() {
    let (mut registry, asset_id) = registry_with_listing();
    let (license_id, _) = registry
        .buy_license(
            addr(BUYER),
            asset_id,
            LicenseKind::Subscription,
            1,
            true,
            5_000_000,
            1_000,
        )
        .expect("purchase should succeed");

    let receiver = addr(40);
    registry
        .transfer_license(addr(BUYER), license_id, receiver)
        .expect("transfer should succeed");

    let record = registry.license(license_id).expect("record kept");
    assert_eq!(record.holder, receiver);
    assert!(registry.licenses_of(addr(BUYER)).is_empty());
    assert_eq!(registry.licenses_of(receiver).len(), 1);

    // only the current holder may transfer onward
    let err = registry
        .transfer_license(addr(BUYER), license_id, addr(41))
        .expect_err("old holder must not transfer");
    assert_eq!(err.kind, RegistryErrorKind::Unauthorized);
}

#[test]
fn given_non_transferable_or_perpetual_license_when_transferred_then_fails() {
    let (mut registry, asset_id) = registry_with_listing();
    let (fixed_sub, _) = registry
        .buy_license(
            addr(BUYER),
            asset_id,
            LicenseKind::Subscription,
            1,
            false,
            5_000_000,
            1_000,
        )
        .expect("purchase should succeed");
    let err = registry
        .transfer_license(addr(BUYER), fixed_sub, addr(40))
        .expect_err("non-transferable subscription must not move");
    assert_eq!(err.kind, RegistryErrorKind::NotTransferable);

    let (perpetual, _) = registry
        .buy_license(
            addr(BUYER),
            asset_id,
            LicenseKind::Perpetual,
            0,
            true,
            50_000_000,
            1_000,
        )
        .expect("purchase should succeed");
    let err = registry
        .transfer_license(addr(BUYER), perpetual, addr(40))
        .expect_err("perpetual licenses are bound to the holder");
    assert_eq!(err.kind, RegistryErrorKind::NotTransferable);
}

#[test]
fn given_updated_licensing_params_when_buying_then_the_new_price_applies() {
    let (mut registry, asset_id) = registry_with_listing();
    registry
        .set_licensing_params(
            addr(SELLER),
            asset_id,
            80_000_000,
            8_000_000,
            60,
            terms_hash("standard terms v2"),
        )
        .expect("owner may update licensing params");

    let err = registry
        .buy_license(
            addr(BUYER),
            asset_id,
            LicenseKind::Perpetual,
            0,
            false,
            50_000_000,
            1_000,
        )
        .expect_err("old price no longer clears");
    assert_eq!(err.kind, RegistryErrorKind::InsufficientPayment);

    registry
        .buy_license(
            addr(BUYER),
            asset_id,
            LicenseKind::Perpetual,
            0,
            false,
            80_000_000,
            1_000,
        )
        .expect("new price clears");

    let record = registry.asset(asset_id).expect("asset exists");
    assert_eq!(record.terms_hash, terms_hash("standard terms v2"));
    assert_eq!(record.default_duration_days, 60);
}

#[test]
fn given_linked_agent_when_changing_its_wallet_then_the_timelock_governs() {
    let (mut registry, asset_id) = registry_with_listing();
    registry
        .link_agent(
            addr(SELLER),
            asset_id,
            "https://agent.example/infer".to_string(),
            addr(50),
        )
        .expect("link should succeed");

    registry
        .request_agent_wallet_change(addr(SELLER), asset_id, addr(51), 1_000)
        .expect("request should succeed");

    let err = registry
        .execute_agent_wallet_change(addr(SELLER), asset_id, 1_000)
        .expect_err("t+0 must fail");
    assert_eq!(err.kind, RegistryErrorKind::TimelockNotExpired);

    let applied = registry
        .execute_agent_wallet_change(addr(SELLER), asset_id, 1_000 + TIMELOCK_DELAY_SECS + 1)
        .expect("t+24h+1s must succeed");
    assert_eq!(applied, addr(51));

    let record = registry.asset(asset_id).expect("asset exists");
    let agent = record.agent.as_ref().expect("agent linked");
    assert_eq!(*agent.wallet.current(), addr(51));
}
