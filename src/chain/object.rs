use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use serde_json::{Value, json};

use crate::{
    chain::{
        error::{ChainError, ChainErrorKind, decode_error, protocol},
        ports::ObjectLedgerPort,
        rpc::JsonRpcClient,
    },
    registry::types::LicenseRecord,
    types::{Address, AssetId, LicenseId},
};

/// Object/capability ledger over a JSON-RPC gateway. Page and detail
/// queries return base64-wrapped binary state for the codec; the composite
/// slug key and license objects arrive as JSON.
#[derive(Clone)]
pub struct ObjectLedgerRpc {
    rpc: JsonRpcClient,
}

impl ObjectLedgerRpc {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ChainError> {
        Ok(Self {
            rpc: JsonRpcClient::new(endpoint, timeout)?,
        })
    }

    fn unwrap_binary(method: &str, result: &Value) -> Result<Vec<u8>, ChainError> {
        let encoded = result
            .get("data")
            .and_then(Value::as_str)
            .ok_or_else(|| protocol(format!("rpc {method} result carries no data field")))?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|err| decode_error(format!("rpc {method} returned invalid base64: {err}")))
    }
}

#[async_trait]
impl ObjectLedgerPort for ObjectLedgerRpc {
    async fn asset_page(&self, cursor: u64, limit: u32) -> Result<Vec<u8>, ChainError> {
        let result = self
            .rpc
            .call("objects_assetPage", json!([cursor, limit]))
            .await?;
        Self::unwrap_binary("objects_assetPage", &result)
    }

    async fn asset_detail(&self, asset_id: AssetId) -> Result<Option<Vec<u8>>, ChainError> {
        let result = match self
            .rpc
            .call("objects_assetDetail", json!([asset_id]))
            .await
        {
            Ok(result) => result,
            Err(err) if err.kind == ChainErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };
        if result.is_null() {
            return Ok(None);
        }
        Self::unwrap_binary("objects_assetDetail", &result).map(Some)
    }

    async fn resolve_slug(
        &self,
        owner: Address,
        slug: &str,
    ) -> Result<Option<AssetId>, ChainError> {
        let result = match self
            .rpc
            .call("objects_resolveSlug", json!([owner.to_string(), slug]))
            .await
        {
            Ok(result) => result,
            Err(err) if err.kind == ChainErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };
        if result.is_null() {
            return Ok(None);
        }
        result
            .get("latest_id")
            .and_then(Value::as_u64)
            .map(Some)
            .ok_or_else(|| protocol("rpc objects_resolveSlug result carries no latest_id"))
    }

    async fn licenses_of(&self, holder: Address) -> Result<Vec<LicenseRecord>, ChainError> {
        let result = self
            .rpc
            .call("objects_licensesOf", json!([holder.to_string()]))
            .await?;
        if result.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(result)
            .map_err(|err| protocol(format!("rpc objects_licensesOf unexpected shape: {err}")))
    }

    async fn is_revoked(&self, license_id: LicenseId) -> Result<bool, ChainError> {
        let result = self
            .rpc
            .call("objects_isRevoked", json!([license_id]))
            .await?;
        Ok(result.as_bool().unwrap_or(false))
    }
}
