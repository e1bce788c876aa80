use tollgate::{
    codec::{
        AssetDetail, AssetSummary, CodecErrorKind, decode_asset_detail, decode_asset_page,
        encode_asset_detail, encode_asset_page,
    },
    types::{Address, Rights},
};

fn summary(id: u64) -> AssetSummary {
    AssetSummary {
        id,
        owner: Address::from_low_u64(1_000 + id),
        listed: id % 3 != 0,
        price_direct: id * 7,
        price_perpetual: id * 1_000_000,
        price_subscription: id * 90_000,
        default_duration_days: 30,
        version: (id % 5) as u16 + 1,
    }
}

fn detail() -> AssetDetail {
    AssetDetail {
        owner: Address::from_low_u64(11),
        creator: Address::from_low_u64(12),
        listed: true,
        price_direct: 42,
        price_perpetual: 50_000_000,
        price_subscription: 5_000_000,
        default_duration_days: 30,
        version: 3,
        royalty_bps: 500,
        terms_hash: [0xab; 32],
        delivery_rights_default: Rights::ALL,
    }
}

#[test]
fn given_empty_page_when_decoded_then_yields_no_entries() {
    let decoded = decode_asset_page(&encode_asset_page(&[])).expect("empty page should decode");
    assert!(decoded.is_empty());
}

#[test]
fn given_page_wider_than_one_prefix_byte_when_decoded_then_round_trips() {
    // 130 entries forces a two-byte variable-length count
    let entries: Vec<AssetSummary> = (1..=130).map(summary).collect();
    let encoded = encode_asset_page(&entries);
    assert_eq!(encoded[0] & 0x80, 0x80, "count must span two prefix bytes");
    let decoded = decode_asset_page(&encoded).expect("page should decode");
    assert_eq!(decoded, entries);
}

#[test]
fn given_prefix_claiming_an_extra_entry_when_decoded_then_fails_without_reading_out_of_bounds() {
    let entries: Vec<AssetSummary> = (1..=3).map(summary).collect();
    let mut encoded = encode_asset_page(&entries);
    encoded[0] = 4;
    let err = decode_asset_page(&encoded).expect_err("must reject");
    assert_eq!(err.kind, CodecErrorKind::MalformedPayload);
}

#[test]
fn given_buffer_truncated_mid_entry_when_decoded_then_fails_with_decode_error() {
    let encoded = encode_asset_page(&[summary(1), summary(2)]);
    let truncated = &encoded[..encoded.len() - 10];
    let err = decode_asset_page(truncated).expect_err("must reject");
    assert!(matches!(
        err.kind,
        CodecErrorKind::MalformedPayload | CodecErrorKind::UnexpectedEof
    ));
}

#[test]
fn given_detail_when_round_tripped_then_every_field_survives() {
    let original = detail();
    let decoded = decode_asset_detail(&encode_asset_detail(&original)).expect("should decode");
    assert_eq!(decoded, original);
    assert!(decoded.delivery_rights_default.allows_api());
    assert!(decoded.delivery_rights_default.allows_download());
}

#[test]
fn given_detail_with_stray_boolean_byte_when_decoded_then_reads_as_false() {
    let mut encoded = encode_asset_detail(&detail());
    // listed flag sits right after the two 32-byte addresses
    encoded[64] = 0x5a;
    let decoded = decode_asset_detail(&encoded).expect("stray bool byte is not an error");
    assert!(!decoded.listed);
}

#[test]
fn given_truncated_detail_when_decoded_then_fails_with_decode_error() {
    let encoded = encode_asset_detail(&detail());
    let err = decode_asset_detail(&encoded[..encoded.len() - 1]).expect_err("must reject");
    assert_eq!(err.kind, CodecErrorKind::UnexpectedEof);
}

#[test]
fn given_detail_with_trailing_bytes_when_decoded_then_fails_with_decode_error() {
    let mut encoded = encode_asset_detail(&detail());
    encoded.push(0);
    let err = decode_asset_detail(&encoded).expect_err("must reject");
    assert_eq!(err.kind, CodecErrorKind::MalformedPayload);
}
