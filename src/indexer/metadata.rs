use std::{collections::BTreeMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::indexer::{
    error::{IndexError, decode_error, upstream},
    types::ModelMetadata,
};

#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<ModelMetadata, IndexError>;
}

/// Fetches the off-chain metadata document over HTTP. `ipfs://` URIs are
/// rewritten to the configured gateway.
pub struct HttpMetadataSource {
    client: Client,
    ipfs_gateway: String,
}

impl HttpMetadataSource {
    pub fn new(ipfs_gateway: impl Into<String>, timeout: Duration) -> Result<Self, IndexError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| upstream(format!("failed to build metadata client: {err}")))?;
        Ok(Self {
            client,
            ipfs_gateway: ipfs_gateway.into(),
        })
    }

    fn resolve_uri(&self, uri: &str) -> String {
        match uri.strip_prefix("ipfs://") {
            Some(cid) => format!("{}/{}", self.ipfs_gateway.trim_end_matches('/'), cid),
            None => uri.to_string(),
        }
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataSource {
    async fn fetch(&self, uri: &str) -> Result<ModelMetadata, IndexError> {
        let url = self.resolve_uri(uri);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| upstream(format!("metadata fetch {url} failed: {err}")))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(upstream(format!(
                "metadata fetch {url} returned status {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| upstream(format!("metadata body read {url} failed: {err}")))?;
        serde_json::from_str(&body)
            .map_err(|err| decode_error(format!("metadata document {url} is malformed: {err}")))
    }
}

/// Fixed document set for tests and offline runs. URIs not present fail
/// like an unreachable gateway.
#[derive(Default)]
pub struct StaticMetadataSource {
    docs: Arc<Mutex<BTreeMap<String, ModelMetadata>>>,
}

impl StaticMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, uri: impl Into<String>, doc: ModelMetadata) {
        self.docs.lock().await.insert(uri.into(), doc);
    }
}

#[async_trait]
impl MetadataSource for StaticMetadataSource {
    async fn fetch(&self, uri: &str) -> Result<ModelMetadata, IndexError> {
        self.docs
            .lock()
            .await
            .get(uri)
            .cloned()
            .ok_or_else(|| upstream(format!("metadata fetch {uri} failed: unreachable")))
    }
}
