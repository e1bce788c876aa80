use std::path::Path;

use rusqlite::{Connection, OptionalExtension as _, params};
use sha2::{Digest, Sha256};

use crate::{
    indexer::{
        error::{IndexError, cache_error},
        types::{CacheRow, LedgerFields, ModelMetadata},
    },
    types::{AssetId, ChainId},
};

/// Relational projection of asset state, keyed by (asset_id, chain_id).
/// Never authoritative: every row is re-derivable from the ledger and
/// overwritten last-write-wins on resync.
pub struct CatalogCache {
    conn: Connection,
}

impl CatalogCache {
    pub fn open(db_path: &Path) -> Result<Self, IndexError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| {
                cache_error(format!("create cache dir {}: {err}", parent.display()))
            })?;
        }
        let conn = Connection::open(db_path)
            .map_err(|err| cache_error(format!("open cache db {}: {err}", db_path.display())))?;
        Self::bootstrap(conn)
    }

    pub fn open_in_memory() -> Result<Self, IndexError> {
        let conn = Connection::open_in_memory()
            .map_err(|err| cache_error(format!("open in-memory cache: {err}")))?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Self, IndexError> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA foreign_keys=ON;

            CREATE TABLE IF NOT EXISTS catalog(
              asset_id INTEGER NOT NULL,
              chain_id INTEGER NOT NULL,
              owner TEXT NOT NULL,
              creator TEXT NOT NULL,
              name TEXT NOT NULL,
              slug TEXT NOT NULL,
              uri TEXT NOT NULL,
              royalty_bps INTEGER NOT NULL,
              listed INTEGER NOT NULL,
              price_perpetual INTEGER NOT NULL,
              price_subscription INTEGER NOT NULL,
              default_duration_days INTEGER NOT NULL,
              rights INTEGER NOT NULL,
              delivery_mode TEXT NOT NULL,
              version INTEGER NOT NULL,
              terms_hash TEXT NOT NULL,
              agent_endpoint TEXT,
              agent_wallet TEXT,
              categories TEXT,
              tags TEXT,
              frameworks TEXT,
              architectures TEXT,
              image_ref TEXT,
              last_updated TEXT NOT NULL,
              PRIMARY KEY(asset_id, chain_id)
            );
            "#,
        )
        .map_err(|err| cache_error(format!("bootstrap catalog schema: {err}")))?;
        Ok(Self { conn })
    }

    /// Upsert of the ledger-sourced columns. Metadata columns of an
    /// existing row are preserved.
    pub fn upsert_ledger_fields(
        &self,
        fields: &LedgerFields,
        updated_at: &str,
    ) -> Result<(), IndexError> {
        self.conn
            .execute(
                r#"
                INSERT INTO catalog(
                  asset_id, chain_id, owner, creator, name, slug, uri,
                  royalty_bps, listed, price_perpetual, price_subscription,
                  default_duration_days, rights, delivery_mode, version,
                  terms_hash, agent_endpoint, agent_wallet, last_updated
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
                ON CONFLICT(asset_id, chain_id) DO UPDATE SET
                  owner=excluded.owner,
                  creator=excluded.creator,
                  name=excluded.name,
                  slug=excluded.slug,
                  uri=excluded.uri,
                  royalty_bps=excluded.royalty_bps,
                  listed=excluded.listed,
                  price_perpetual=excluded.price_perpetual,
                  price_subscription=excluded.price_subscription,
                  default_duration_days=excluded.default_duration_days,
                  rights=excluded.rights,
                  delivery_mode=excluded.delivery_mode,
                  version=excluded.version,
                  terms_hash=excluded.terms_hash,
                  agent_endpoint=excluded.agent_endpoint,
                  agent_wallet=excluded.agent_wallet,
                  last_updated=excluded.last_updated
                "#,
                params![
                    to_db_i64(fields.asset_id, "asset_id")?,
                    to_db_i64(fields.chain_id, "chain_id")?,
                    fields.owner,
                    fields.creator,
                    fields.name,
                    fields.slug,
                    fields.uri,
                    i64::from(fields.royalty_bps),
                    fields.listed as i64,
                    to_db_i64(fields.price_perpetual, "price_perpetual")?,
                    to_db_i64(fields.price_subscription, "price_subscription")?,
                    to_db_i64(fields.default_duration_days, "default_duration_days")?,
                    i64::from(fields.rights),
                    fields.delivery_mode,
                    i64::from(fields.version),
                    fields.terms_hash,
                    fields.agent_endpoint,
                    fields.agent_wallet,
                    updated_at,
                ],
            )
            .map_err(|err| cache_error(format!("upsert catalog row: {err}")))?;
        Ok(())
    }

    /// Merge of metadata-derived columns only. Returns false when no row
    /// exists for the key (resync has not run yet).
    pub fn merge_metadata(
        &self,
        asset_id: AssetId,
        chain_id: ChainId,
        metadata: &ModelMetadata,
        updated_at: &str,
    ) -> Result<bool, IndexError> {
        let rows = self
            .conn
            .execute(
                r#"
                UPDATE catalog SET
                  categories=?3, tags=?4, frameworks=?5, architectures=?6,
                  image_ref=?7, last_updated=?8
                WHERE asset_id=?1 AND chain_id=?2
                "#,
                params![
                    to_db_i64(asset_id, "asset_id")?,
                    to_db_i64(chain_id, "chain_id")?,
                    encode_list(&metadata.categories)?,
                    encode_list(&metadata.tags)?,
                    encode_list(&metadata.frameworks)?,
                    encode_list(&metadata.architectures)?,
                    metadata.image,
                    updated_at,
                ],
            )
            .map_err(|err| cache_error(format!("merge catalog metadata: {err}")))?;
        Ok(rows > 0)
    }

    pub fn get(
        &self,
        asset_id: AssetId,
        chain_id: ChainId,
    ) -> Result<Option<CacheRow>, IndexError> {
        self.conn
            .query_row(
                r#"
                SELECT asset_id, chain_id, owner, creator, name, slug, uri,
                       royalty_bps, listed, price_perpetual, price_subscription,
                       default_duration_days, rights, delivery_mode, version,
                       terms_hash, agent_endpoint, agent_wallet,
                       categories, tags, frameworks, architectures, image_ref,
                       last_updated
                FROM catalog WHERE asset_id=?1 AND chain_id=?2
                "#,
                params![
                    to_db_i64(asset_id, "asset_id")?,
                    to_db_i64(chain_id, "chain_id")?
                ],
                |row| {
                    Ok(CacheRow {
                        ledger: LedgerFields {
                            asset_id: row.get::<_, i64>(0)? as u64,
                            chain_id: row.get::<_, i64>(1)? as u64,
                            owner: row.get(2)?,
                            creator: row.get(3)?,
                            name: row.get(4)?,
                            slug: row.get(5)?,
                            uri: row.get(6)?,
                            royalty_bps: row.get::<_, i64>(7)? as u16,
                            listed: row.get::<_, i64>(8)? != 0,
                            price_perpetual: row.get::<_, i64>(9)? as u64,
                            price_subscription: row.get::<_, i64>(10)? as u64,
                            default_duration_days: row.get::<_, i64>(11)? as u64,
                            rights: row.get::<_, i64>(12)? as u8,
                            delivery_mode: row.get(13)?,
                            version: row.get::<_, i64>(14)? as u16,
                            terms_hash: row.get(15)?,
                            agent_endpoint: row.get(16)?,
                            agent_wallet: row.get(17)?,
                        },
                        categories: decode_list_column(row.get(18)?),
                        tags: decode_list_column(row.get(19)?),
                        frameworks: decode_list_column(row.get(20)?),
                        architectures: decode_list_column(row.get(21)?),
                        image_ref: row.get(22)?,
                        last_updated: row.get(23)?,
                    })
                },
            )
            .optional()
            .map_err(|err| cache_error(format!("read catalog row: {err}")))
    }
}

fn to_db_i64(value: u64, field: &str) -> Result<i64, IndexError> {
    i64::try_from(value).map_err(|_| cache_error(format!("{field} {value} exceeds i64 range")))
}

fn encode_list(values: &[String]) -> Result<String, IndexError> {
    serde_json::to_string(values).map_err(|err| cache_error(format!("encode list column: {err}")))
}

fn decode_list_column(raw: Option<String>) -> Option<Vec<String>> {
    raw.and_then(|text| serde_json::from_str(&text).ok())
}

/// Stable digest of a row's content, excluding the wall-clock column, for
/// idempotence checks.
pub fn row_fingerprint(row: &CacheRow) -> String {
    let mut stamped = row.clone();
    stamped.last_updated = String::new();
    let canonical = serde_json::to_string(&stamped).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
