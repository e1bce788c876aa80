use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tokio::sync::Mutex;

use crate::{
    chain::ports::AccountLedgerPort,
    indexer::{
        cache::CatalogCache,
        error::{IndexError, internal_error, not_found},
        metadata::MetadataSource,
        types::{BatchFailure, BatchReport, CacheRow, LedgerFields, SyncOutcome, SyncRequest},
    },
    types::{AssetId, ChainId},
};

/// On-demand cache maintenance over the account ledger. The cache is a
/// projection: the ledger stays the source of truth, concurrent writers
/// converge last-write-wins, and a failed refresh leaves the previous row
/// untouched.
pub struct Indexer {
    account: Arc<dyn AccountLedgerPort>,
    metadata: Arc<dyn MetadataSource>,
    cache: Mutex<CatalogCache>,
}

impl Indexer {
    pub fn new(
        account: Arc<dyn AccountLedgerPort>,
        metadata: Arc<dyn MetadataSource>,
        cache: CatalogCache,
    ) -> Self {
        Self {
            account,
            metadata,
            cache: Mutex::new(cache),
        }
    }

    pub async fn cached_row(
        &self,
        asset_id: AssetId,
        chain_id: ChainId,
    ) -> Result<Option<CacheRow>, IndexError> {
        self.cache.lock().await.get(asset_id, chain_id)
    }

    /// Refreshes the ledger-sourced columns from the account ledger.
    pub async fn resync(
        &self,
        asset_id: AssetId,
        chain_id: ChainId,
    ) -> Result<CacheRow, IndexError> {
        let record = self
            .account
            .asset_record(asset_id)
            .await?
            .ok_or_else(|| not_found(format!("asset {asset_id} is not on the ledger")))?;
        let fields = LedgerFields::from_record(chain_id, &record);

        let cache = self.cache.lock().await;
        cache.upsert_ledger_fields(&fields, &timestamp_now())?;
        let row = cache
            .get(asset_id, chain_id)?
            .ok_or_else(|| internal_error("catalog row vanished after upsert"))?;
        tracing::debug!(target: "indexer", asset_id, chain_id, version = row.ledger.version, "resync_complete");
        Ok(row)
    }

    /// Refreshes the metadata-derived columns from the document the
    /// asset's URI points at. Ledger-sourced columns are left untouched.
    pub async fn recache(
        &self,
        asset_id: AssetId,
        chain_id: ChainId,
    ) -> Result<CacheRow, IndexError> {
        let uri = {
            let cache = self.cache.lock().await;
            cache
                .get(asset_id, chain_id)?
                .ok_or_else(|| {
                    not_found(format!(
                        "asset {asset_id} has no cache row yet; resync first"
                    ))
                })?
                .ledger
                .uri
        };

        // Fetch before touching the row: an unreachable document must not
        // blank out previously derived fields.
        let metadata = self.metadata.fetch(&uri).await?;

        let cache = self.cache.lock().await;
        let merged = cache.merge_metadata(asset_id, chain_id, &metadata, &timestamp_now())?;
        if !merged {
            return Err(not_found(format!(
                "cache row for asset {asset_id} disappeared during recache"
            )));
        }
        let row = cache
            .get(asset_id, chain_id)?
            .ok_or_else(|| internal_error("catalog row vanished after metadata merge"))?;
        tracing::debug!(target: "indexer", asset_id, chain_id, uri = %row.ledger.uri, "recache_complete");
        Ok(row)
    }

    /// Composed refresh. Recache runs strictly after resync so it reads
    /// the URI resync just wrote, never a stale one.
    pub async fn sync(&self, request: SyncRequest) -> Result<SyncOutcome, IndexError> {
        self.resync(request.asset_id, request.chain_id).await?;
        let mut outcome = SyncOutcome {
            asset_id: request.asset_id,
            chain_id: request.chain_id,
            resynced: true,
            recached: false,
        };
        if request.with_metadata {
            self.recache(request.asset_id, request.chain_id).await?;
            outcome.recached = true;
        }
        Ok(outcome)
    }

    /// Multi-asset refresh with per-asset failure isolation. Cancellation
    /// is cooperative and checked between assets, never mid-refresh.
    pub async fn resync_batch(
        &self,
        targets: &[(AssetId, ChainId)],
        cancel: &AtomicBool,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for (asset_id, chain_id) in targets.iter().copied() {
            if cancel.load(Ordering::Relaxed) {
                report.cancelled = true;
                break;
            }
            match self.resync(asset_id, chain_id).await {
                Ok(_) => report.completed.push((asset_id, chain_id)),
                Err(error) => {
                    tracing::warn!(
                        target: "indexer",
                        asset_id,
                        chain_id,
                        kind = ?error.kind,
                        "resync_failed: {}",
                        error.message
                    );
                    report.failures.push(BatchFailure {
                        asset_id,
                        chain_id,
                        error,
                    });
                }
            }
        }
        report
    }
}

fn timestamp_now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
