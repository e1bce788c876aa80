use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    chain::{
        error::{ChainError, ChainErrorKind, protocol},
        ports::AccountLedgerPort,
        rpc::JsonRpcClient,
    },
    registry::types::{AssetRecord, LicenseRecord, LicenseStatus},
    types::{Address, AssetId, LicenseId, Timestamp},
};

/// Account-model ledger over a JSON-RPC gateway. Record shapes mirror the
/// native registry types and arrive as plain JSON.
#[derive(Clone)]
pub struct AccountLedgerRpc {
    rpc: JsonRpcClient,
}

impl AccountLedgerRpc {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ChainError> {
        Ok(Self {
            rpc: JsonRpcClient::new(endpoint, timeout)?,
        })
    }

    fn parse<T: serde::de::DeserializeOwned>(
        method: &str,
        result: Value,
    ) -> Result<Option<T>, ChainError> {
        if result.is_null() {
            return Ok(None);
        }
        serde_json::from_value(result)
            .map(Some)
            .map_err(|err| protocol(format!("rpc {method} returned unexpected shape: {err}")))
    }
}

#[async_trait]
impl AccountLedgerPort for AccountLedgerRpc {
    async fn asset_record(&self, asset_id: AssetId) -> Result<Option<AssetRecord>, ChainError> {
        let result = match self
            .rpc
            .call("marketplace_assetRecord", json!([asset_id]))
            .await
        {
            Ok(result) => result,
            Err(err) if err.kind == ChainErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };
        Self::parse("marketplace_assetRecord", result)
    }

    async fn licenses_of(
        &self,
        holder: Address,
        asset_id: AssetId,
    ) -> Result<Vec<LicenseRecord>, ChainError> {
        let result = self
            .rpc
            .call(
                "marketplace_licensesOf",
                json!([holder.to_string(), asset_id]),
            )
            .await?;
        Ok(Self::parse("marketplace_licensesOf", result)?.unwrap_or_default())
    }

    async fn is_revoked(&self, license_id: LicenseId) -> Result<bool, ChainError> {
        let result = self
            .rpc
            .call("marketplace_isRevoked", json!([license_id]))
            .await?;
        Ok(Self::parse("marketplace_isRevoked", result)?.unwrap_or(false))
    }

    async fn license_status(
        &self,
        license_id: LicenseId,
        now: Timestamp,
    ) -> Result<Option<LicenseStatus>, ChainError> {
        let result = match self
            .rpc
            .call("marketplace_licenseStatus", json!([license_id, now]))
            .await
        {
            Ok(result) => result,
            Err(err) if err.kind == ChainErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };
        Self::parse("marketplace_licenseStatus", result)
    }
}
