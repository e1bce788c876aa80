use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};

use tollgate::{
    chain::{
        account::AccountLedgerRpc,
        object::ObjectLedgerRpc,
        ports::AccountLedgerPort as _,
    },
    cli::{Command, parse_args},
    config::Config,
    entitlement::resolver::EntitlementResolver,
    indexer::{
        cache::CatalogCache,
        engine::Indexer,
        metadata::HttpMetadataSource,
        types::SyncRequest,
    },
    logging::init_tracing,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;
    let config = load_config(args.config_path.clone())?;
    let _logging_guard = init_tracing(&config.logging)?;

    let timeout = Duration::from_millis(config.http.timeout_ms);
    let account = Arc::new(
        AccountLedgerRpc::new(config.chains.account.endpoint.clone(), timeout)
            .context("failed to construct account ledger client")?,
    );
    let object = Arc::new(
        ObjectLedgerRpc::new(config.chains.object.endpoint.clone(), timeout)
            .context("failed to construct object ledger client")?,
    );

    match args.command {
        Command::Resync {
            asset_id,
            with_metadata,
        } => {
            let indexer = build_indexer(&config, account, timeout)?;
            indexer
                .sync(SyncRequest {
                    asset_id,
                    chain_id: config.chains.account.chain_id,
                    with_metadata,
                })
                .await
                .context("resync failed")?;
            let row = indexer
                .cached_row(asset_id, config.chains.account.chain_id)
                .await
                .context("failed to read refreshed row")?;
            print_json(&row)?;
        }
        Command::Recache { asset_id } => {
            let indexer = build_indexer(&config, account, timeout)?;
            let row = indexer
                .recache(asset_id, config.chains.account.chain_id)
                .await
                .context("recache failed")?;
            print_json(&row)?;
        }
        Command::Entitlement {
            ledger,
            principal,
            asset_id,
        } => {
            let resolver = EntitlementResolver::new(account, object);
            let entitlement = resolver
                .resolve(ledger, principal, asset_id, unix_now()?)
                .await
                .context("entitlement resolution failed")?;
            print_json(&entitlement)?;
        }
        Command::LicenseStatus { license_id } => {
            let status = account
                .license_status(license_id, unix_now()?)
                .await
                .context("license status read failed")?;
            print_json(&status)?;
        }
        Command::Slug { owner, slug } => {
            let resolver = EntitlementResolver::new(account, object);
            let resolved = resolver
                .resolve_slug(owner, &slug)
                .await
                .context("slug resolution failed")?;
            print_json(&serde_json::json!({
                "found": resolved.is_some(),
                "asset_id": resolved,
            }))?;
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(&path),
        None => {
            let default_path = PathBuf::from("./tollgate.jsonc");
            if default_path.exists() {
                Config::load(&default_path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn build_indexer(
    config: &Config,
    account: Arc<AccountLedgerRpc>,
    timeout: Duration,
) -> Result<Indexer> {
    let cache =
        CatalogCache::open(&config.cache.path).context("failed to open catalog cache")?;
    let metadata = Arc::new(
        HttpMetadataSource::new(config.http.ipfs_gateway.clone(), timeout)
            .context("failed to construct metadata client")?,
    );
    Ok(Indexer::new(account, metadata, cache))
}

fn unix_now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the unix epoch")?
        .as_secs())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(value).context("failed to render result as json")?;
    println!("{rendered}");
    Ok(())
}
