use serde::{Deserialize, Serialize};

use crate::{
    codec::{
        cursor::{ByteCursor, put_uleb_len},
        error::{CodecError, malformed_payload},
    },
    types::{Address, AssetId, Rights},
};

/// Bytes per page entry: u64 id, 32-byte owner, bool listed, four u64
/// price/duration fields, u16 version.
const PAGE_ENTRY_LEN: usize = 8 + 32 + 1 + 8 * 4 + 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSummary {
    pub id: AssetId,
    pub owner: Address,
    pub listed: bool,
    pub price_direct: u64,
    pub price_perpetual: u64,
    pub price_subscription: u64,
    pub default_duration_days: u64,
    pub version: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDetail {
    pub owner: Address,
    pub creator: Address,
    pub listed: bool,
    pub price_direct: u64,
    pub price_perpetual: u64,
    pub price_subscription: u64,
    pub default_duration_days: u64,
    pub version: u16,
    pub royalty_bps: u16,
    #[serde(with = "terms_hash_hex")]
    pub terms_hash: [u8; 32],
    pub delivery_rights_default: Rights,
}

mod terms_hash_hex {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(hash: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let text = String::deserialize(deserializer)?;
        let decoded = hex::decode(&text).map_err(de::Error::custom)?;
        decoded
            .try_into()
            .map_err(|_| de::Error::custom("terms hash must be 32 bytes"))
    }
}

pub fn decode_asset_page(bytes: &[u8]) -> Result<Vec<AssetSummary>, CodecError> {
    let mut cursor = ByteCursor::new(bytes);
    let count = cursor.read_uleb_len("asset page count")?;

    // Re-validate the declared count against the actual buffer before
    // walking entries; the prefix is attacker-influenceable wire data.
    let declared = count
        .checked_mul(PAGE_ENTRY_LEN)
        .ok_or_else(|| malformed_payload("asset page count overflows byte length"))?;
    if declared != cursor.remaining() {
        return Err(malformed_payload(format!(
            "asset page count {count} implies {declared} bytes, buffer holds {}",
            cursor.remaining()
        )));
    }

    let mut entries = Vec::with_capacity(count);
    for index in 0..count {
        entries.push(read_summary(&mut cursor, index)?);
    }
    cursor.expect_end()?;
    Ok(entries)
}

fn read_summary(cursor: &mut ByteCursor<'_>, index: usize) -> Result<AssetSummary, CodecError> {
    let field = |name: &str| format!("entry {index} {name}");
    Ok(AssetSummary {
        id: cursor.read_u64_le(&field("id"))?,
        owner: cursor.read_address(&field("owner"))?,
        listed: cursor.read_bool(&field("listed"))?,
        price_direct: cursor.read_u64_le(&field("price_direct"))?,
        price_perpetual: cursor.read_u64_le(&field("price_perpetual"))?,
        price_subscription: cursor.read_u64_le(&field("price_subscription"))?,
        default_duration_days: cursor.read_u64_le(&field("default_duration_days"))?,
        version: cursor.read_u16_le(&field("version"))?,
    })
}

pub fn decode_asset_detail(bytes: &[u8]) -> Result<AssetDetail, CodecError> {
    let mut cursor = ByteCursor::new(bytes);
    let detail = AssetDetail {
        owner: cursor.read_address("owner")?,
        creator: cursor.read_address("creator")?,
        listed: cursor.read_bool("listed")?,
        price_direct: cursor.read_u64_le("price_direct")?,
        price_perpetual: cursor.read_u64_le("price_perpetual")?,
        price_subscription: cursor.read_u64_le("price_subscription")?,
        default_duration_days: cursor.read_u64_le("default_duration_days")?,
        version: cursor.read_u16_le("version")?,
        royalty_bps: cursor.read_u16_le("royalty_bps")?,
        terms_hash: {
            let bytes = cursor.read_bytes(32, "terms_hash")?;
            let mut fixed = [0u8; 32];
            fixed.copy_from_slice(bytes);
            fixed
        },
        delivery_rights_default: Rights::from_bits(cursor.read_u8("delivery_rights_default")?),
    };
    cursor.expect_end()?;
    Ok(detail)
}

pub fn encode_asset_page(entries: &[AssetSummary]) -> Vec<u8> {
    let mut out = Vec::with_capacity(5 + entries.len() * PAGE_ENTRY_LEN);
    put_uleb_len(&mut out, entries.len() as u32);
    for entry in entries {
        out.extend_from_slice(&entry.id.to_le_bytes());
        out.extend_from_slice(entry.owner.as_bytes());
        out.push(u8::from(entry.listed));
        out.extend_from_slice(&entry.price_direct.to_le_bytes());
        out.extend_from_slice(&entry.price_perpetual.to_le_bytes());
        out.extend_from_slice(&entry.price_subscription.to_le_bytes());
        out.extend_from_slice(&entry.default_duration_days.to_le_bytes());
        out.extend_from_slice(&entry.version.to_le_bytes());
    }
    out
}

pub fn encode_asset_detail(detail: &AssetDetail) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(detail.owner.as_bytes());
    out.extend_from_slice(detail.creator.as_bytes());
    out.push(u8::from(detail.listed));
    out.extend_from_slice(&detail.price_direct.to_le_bytes());
    out.extend_from_slice(&detail.price_perpetual.to_le_bytes());
    out.extend_from_slice(&detail.price_subscription.to_le_bytes());
    out.extend_from_slice(&detail.default_duration_days.to_le_bytes());
    out.extend_from_slice(&detail.version.to_le_bytes());
    out.extend_from_slice(&detail.royalty_bps.to_le_bytes());
    out.extend_from_slice(&detail.terms_hash);
    out.push(detail.delivery_rights_default.bits());
    out
}
