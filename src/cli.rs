use std::{env, path::PathBuf};

use anyhow::{Result, anyhow};

use crate::{
    entitlement::types::LedgerSelector,
    types::{Address, AssetId, LicenseId},
};

const USAGE: &str = "usage: tollgate [--config <path>] <command>\n\
commands:\n\
  resync <asset_id> [--with-metadata]   refresh ledger-sourced cache columns\n\
  recache <asset_id>                    refresh metadata-derived cache columns\n\
  entitlement <account|object> <principal> <asset_id>\n\
  license-status <license_id>           read a license's validity flags\n\
  slug <owner> <slug>                   resolve a slug to its current asset id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Resync {
        asset_id: AssetId,
        with_metadata: bool,
    },
    Recache {
        asset_id: AssetId,
    },
    Entitlement {
        ledger: LedgerSelector,
        principal: Address,
        asset_id: AssetId,
    },
    LicenseStatus {
        license_id: LicenseId,
    },
    Slug {
        owner: Address,
        slug: String,
    },
}

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub command: Command,
}

pub fn parse_args() -> Result<CliArgs> {
    parse_from(env::args().skip(1).collect())
}

fn parse_from(args: Vec<String>) -> Result<CliArgs> {
    let mut config_path = None;
    let mut rest = Vec::new();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --config\n{USAGE}"))?;
                config_path = Some(PathBuf::from(value));
            }
            _ => rest.push(arg),
        }
    }

    let mut rest = rest.into_iter();
    let command = match rest.next().as_deref() {
        Some("resync") => {
            let asset_id = parse_asset_id(rest.next())?;
            let with_metadata = match rest.next().as_deref() {
                None => false,
                Some("--with-metadata") => true,
                Some(other) => return Err(anyhow!("unknown resync flag: {other}\n{USAGE}")),
            };
            Command::Resync {
                asset_id,
                with_metadata,
            }
        }
        Some("recache") => Command::Recache {
            asset_id: parse_asset_id(rest.next())?,
        },
        Some("entitlement") => {
            let ledger = match rest.next().as_deref() {
                Some("account") => LedgerSelector::Account,
                Some("object") => LedgerSelector::Object,
                other => {
                    return Err(anyhow!(
                        "entitlement ledger must be 'account' or 'object', got {other:?}\n{USAGE}"
                    ));
                }
            };
            let principal = parse_address(rest.next(), "principal")?;
            let asset_id = parse_asset_id(rest.next())?;
            Command::Entitlement {
                ledger,
                principal,
                asset_id,
            }
        }
        Some("license-status") => {
            let text = rest
                .next()
                .ok_or_else(|| anyhow!("missing license id argument\n{USAGE}"))?;
            let license_id = text
                .parse()
                .map_err(|err| anyhow!("invalid license id '{text}': {err}"))?;
            Command::LicenseStatus { license_id }
        }
        Some("slug") => {
            let owner = parse_address(rest.next(), "owner")?;
            let slug = rest
                .next()
                .ok_or_else(|| anyhow!("missing slug argument\n{USAGE}"))?;
            Command::Slug { owner, slug }
        }
        Some(other) => return Err(anyhow!("unknown command: {other}\n{USAGE}")),
        None => return Err(anyhow!("no command given\n{USAGE}")),
    };

    if let Some(extra) = rest.next() {
        return Err(anyhow!("unexpected argument: {extra}\n{USAGE}"));
    }

    Ok(CliArgs {
        config_path,
        command,
    })
}

fn parse_asset_id(value: Option<String>) -> Result<AssetId> {
    let text = value.ok_or_else(|| anyhow!("missing asset id argument\n{USAGE}"))?;
    text.parse()
        .map_err(|err| anyhow!("invalid asset id '{text}': {err}"))
}

fn parse_address(value: Option<String>, field: &str) -> Result<Address> {
    let text = value.ok_or_else(|| anyhow!("missing {field} argument\n{USAGE}"))?;
    text.parse()
        .map_err(|err| anyhow!("invalid {field} '{text}': {err}"))
}
