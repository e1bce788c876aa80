use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, de};

pub type AssetId = u64;
pub type ChainId = u64;
pub type LicenseId = u64;

/// Ledger-observed unix time in seconds. The engine never consults a local
/// wall clock for validity or timelock decisions.
pub type Timestamp = u64;

/// Escrow amounts in base token units (6-decimal fixed point upstream).
pub type Amount = u128;

pub const ADDRESS_LEN: usize = 32;

/// 32-byte principal address, rendered as lowercase hex with a `0x` prefix.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Big-endian embedding of a small integer, for fixtures and fakes.
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 8..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let stripped = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        let decoded =
            hex::decode(stripped).map_err(|err| format!("invalid address hex: {err}"))?;
        let bytes: [u8; ADDRESS_LEN] = decoded
            .try_into()
            .map_err(|_| format!("address must be {ADDRESS_LEN} bytes"))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

/// Usage rights bitmask carried by an asset: API access and artifact
/// download, independently grantable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rights(u8);

impl Rights {
    pub const NONE: Rights = Rights(0);
    pub const API: Rights = Rights(1);
    pub const DOWNLOAD: Rights = Rights(2);
    pub const ALL: Rights = Rights(3);

    const KNOWN_MASK: u8 = 0x03;

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn has_unknown_bits(&self) -> bool {
        self.0 & !Self::KNOWN_MASK != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 & Self::KNOWN_MASK == 0
    }

    pub fn allows_api(&self) -> bool {
        self.0 & Self::API.0 != 0
    }

    pub fn allows_download(&self) -> bool {
        self.0 & Self::DOWNLOAD.0 != 0
    }
}

/// Delivery-mode hint attached to a listing. Advisory only: access checks
/// go through the rights mask, never through this hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    ApiOnly,
    DownloadOnly,
    Hybrid,
}

impl DeliveryMode {
    pub fn from_wire(value: u8) -> Self {
        match value {
            0 => DeliveryMode::ApiOnly,
            1 => DeliveryMode::DownloadOnly,
            _ => DeliveryMode::Hybrid,
        }
    }

    pub fn to_wire(self) -> u8 {
        match self {
            DeliveryMode::ApiOnly => 0,
            DeliveryMode::DownloadOnly => 1,
            DeliveryMode::Hybrid => 2,
        }
    }
}
