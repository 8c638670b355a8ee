use std::path::Path;

use anyhow::{Context, Result};
use zeroize::Zeroizing;

use super::export::ConfigFile;
use crate::store::Store;

pub fn run(store: &Store, path: &Path) -> Result<()> {
    let raw = Zeroizing::new(
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
    );
    let config: ConfigFile =
        serde_json::from_str(&raw).context("Failed to parse config file")?;
    apply(store, config)
}

/// Replay an exported configuration into the store. Records marked
/// current are written last, so the upsert-then-promote write path lands
/// the current flag on the same records the export had it on.
pub(crate) fn apply(store: &Store, config: ConfigFile) -> Result<()> {
    let user = config.user;

    if let Some(github) = user.github {
        store.set_github_user(&github)?;
    }

    if let Some(wallets) = user.wallets {
        let (current, rest): (Vec<_>, Vec<_>) = wallets.into_iter().partition(|w| w.current);
        for wallet in rest.into_iter().chain(current) {
            store.set_wallet(
                &wallet.private_key,
                wallet.label.as_deref(),
                wallet.mnemonic.as_deref(),
            )?;
        }
    }

    if let Some(accounts) = user.custom {
        let (current, rest): (Vec<_>, Vec<_>) = accounts.into_iter().partition(|a| a.current);
        for account in rest.into_iter().chain(current) {
            store.set_custom_account(account)?;
        }
    }

    if let Some(env) = user.env {
        for (key, value) in env {
            store.set_env_var(&key, &value)?;
        }
    }

    Ok(())
}
