use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::store::records::{CustomAccount, GithubUser, Wallet};
use crate::store::Store;

pub const DEFAULT_CONFIG_FILE: &str = "keyrack_config.json";

/// On-disk shape of an exported configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub user: UserSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserSection {
    pub wallets: Option<Vec<ExportedWallet>>,
    pub custom: Option<Vec<CustomAccount>>,
    pub github: Option<GithubUser>,
    pub env: Option<BTreeMap<String, String>>,
}

/// A wallet without its derived public key; the key is re-derived on
/// import.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportedWallet {
    pub private_key: String,
    #[serde(default)]
    pub mnemonic: Option<String>,
    pub current: bool,
    #[serde(default)]
    pub label: Option<String>,
}

impl From<Wallet> for ExportedWallet {
    fn from(wallet: Wallet) -> Self {
        Self {
            private_key: wallet.private_key,
            mnemonic: wallet.mnemonic,
            current: wallet.current,
            label: wallet.label,
        }
    }
}

pub fn run(store: &Store, path: Option<PathBuf>, indent: bool) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = gather(store)?;

    let raw = Zeroizing::new(if indent {
        serde_json::to_string_pretty(&config)?
    } else {
        serde_json::to_string(&config)?
    });

    std::fs::write(&path, raw.as_bytes()).with_context(|| {
        format!(
            "Failed to write {}; all folders in the path must exist",
            path.display()
        )
    })?;
    Ok(())
}

pub(crate) fn gather(store: &Store) -> Result<ConfigFile> {
    let wallets = store.wallets()?;
    let custom = store.custom_accounts(None)?;
    let github = store.github_user()?;
    let env = store.env_vars()?;

    Ok(ConfigFile {
        user: UserSection {
            wallets: (!wallets.is_empty())
                .then(|| wallets.into_iter().map(ExportedWallet::from).collect()),
            custom: (!custom.is_empty()).then_some(custom),
            github,
            env: (!env.is_empty())
                .then(|| env.into_iter().map(|var| (var.key, var.value)).collect()),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_store_exports_empty_sections() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("data"));

        let config = gather(&store).unwrap();
        assert!(config.user.wallets.is_none());
        assert!(config.user.custom.is_none());
        assert!(config.user.github.is_none());
        assert!(config.user.env.is_none());
    }

    #[test]
    fn test_exported_wallets_carry_no_public_key() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("data"));
        store.set_wallet("0x1", Some("Main"), None).unwrap();

        let config = gather(&store).unwrap();
        let raw = serde_json::to_string(&config).unwrap();
        assert!(!raw.contains("public_key"));

        let wallets = config.user.wallets.unwrap();
        assert_eq!(wallets.len(), 1);
        assert_eq!(wallets[0].private_key, "0x1");
        assert!(wallets[0].current);
    }

    #[test]
    fn test_export_writes_the_config_file() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("data"));
        store.set_env_var("rpc_url", "http://localhost:8545").unwrap();

        let path = dir.path().join("config.json");
        run(&store, Some(path.clone()), true).unwrap();

        let raw = std::fs::read_to_string(path).unwrap();
        let config: ConfigFile = serde_json::from_str(&raw).unwrap();
        let env = config.user.env.unwrap();
        assert_eq!(env.get("RPC_URL").map(String::as_str), Some("http://localhost:8545"));
    }

    #[test]
    fn test_export_to_missing_folder_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("data"));
        store.set_env_var("key", "value").unwrap();

        let path = dir.path().join("no-such-dir").join("config.json");
        assert!(run(&store, Some(path), false).is_err());
    }
}
