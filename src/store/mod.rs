pub mod current;
pub mod records;
pub mod sort;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::KeyrackError;
use crate::keys;
use records::{constant_case, CustomAccount, EnvVar, GithubUser, Wallet};

pub type Result<T> = std::result::Result<T, KeyrackError>;

const WALLETS_FILE: &str = "wallets.json";
const CUSTOM_ACCOUNTS_FILE: &str = "custom_accounts.json";
const GITHUB_USER_FILE: &str = "github_user.json";
const ENV_VARS_FILE: &str = "env_vars.json";

/// Handle to the on-disk record store: one JSON file per collection under
/// the data directory. Constructed once in `main` and passed to every
/// command handler.
///
/// Collection files materialize on first write; a missing file reads as an
/// empty collection. Every write path is upsert-or-promote, and the
/// current-record invariant is re-established before the collection is
/// persisted.
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn open(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // --- wallets

    pub fn wallets(&self) -> Result<Vec<Wallet>> {
        self.read_collection(WALLETS_FILE)
    }

    pub fn current_wallet(&self) -> Result<Option<Wallet>> {
        Ok(self.wallets()?.into_iter().find(|w| w.current))
    }

    /// Insert a wallet as current, or promote the existing wallet with the
    /// same private key. Label and mnemonic are updated only when given.
    pub fn set_wallet(
        &self,
        private_key: &str,
        label: Option<&str>,
        mnemonic: Option<&str>,
    ) -> Result<Wallet> {
        let mut wallets = self.wallets()?;

        let idx = match wallets.iter().position(|w| w.private_key == private_key) {
            Some(idx) => {
                if let Some(label) = label {
                    wallets[idx].label = Some(label.to_string());
                }
                if let Some(mnemonic) = mnemonic {
                    wallets[idx].mnemonic = Some(mnemonic.to_string());
                }
                idx
            }
            None => {
                wallets.push(Wallet {
                    public_key: keys::public_key_for(private_key),
                    private_key: private_key.to_string(),
                    mnemonic: mnemonic.map(str::to_string),
                    current: false,
                    label: label.map(str::to_string),
                });
                wallets.len() - 1
            }
        };

        current::promote(&mut wallets, idx, |_| true);
        self.write_collection(WALLETS_FILE, &wallets)?;
        Ok(wallets.swap_remove(idx))
    }

    /// Remove a wallet. If it was current, the last remaining wallet in
    /// storage order is promoted in its place.
    pub fn delete_wallet(&self, private_key: &str) -> Result<()> {
        let mut wallets = self.wallets()?;
        wallets.retain(|w| w.private_key != private_key);
        current::heal_after_delete(&mut wallets, |_| true);
        self.write_collection(WALLETS_FILE, &wallets)
    }

    pub fn drop_wallets(&self) -> Result<()> {
        self.drop_collection(WALLETS_FILE)
    }

    // --- custom accounts

    /// List custom accounts, optionally restricted to one account group.
    pub fn custom_accounts(&self, account: Option<&str>) -> Result<Vec<CustomAccount>> {
        let accounts: Vec<CustomAccount> = self.read_collection(CUSTOM_ACCOUNTS_FILE)?;
        Ok(match account {
            Some(group) => accounts.into_iter().filter(|a| a.account == group).collect(),
            None => accounts,
        })
    }

    pub fn current_custom_account(&self, account: &str) -> Result<Option<CustomAccount>> {
        Ok(self
            .custom_accounts(Some(account))?
            .into_iter()
            .find(|a| a.current))
    }

    /// All current accounts, one per group at most.
    pub fn current_custom_accounts(&self) -> Result<Vec<CustomAccount>> {
        Ok(self
            .custom_accounts(None)?
            .into_iter()
            .filter(|a| a.current)
            .collect())
    }

    /// Insert a custom account as current within its group, or update and
    /// promote the existing record with the same `(account, email)` key.
    /// The `current` flag on the argument is ignored; the invariant
    /// manager decides it.
    pub fn set_custom_account(&self, record: CustomAccount) -> Result<CustomAccount> {
        let mut accounts: Vec<CustomAccount> = self.read_collection(CUSTOM_ACCOUNTS_FILE)?;
        let group = record.account.clone();

        let idx = match accounts
            .iter()
            .position(|a| a.account == record.account && a.email == record.email)
        {
            Some(idx) => {
                accounts[idx].password = record.password;
                accounts[idx].email_password = record.email_password;
                accounts[idx].data = record.data;
                idx
            }
            None => {
                accounts.push(CustomAccount {
                    current: false,
                    ..record
                });
                accounts.len() - 1
            }
        };

        current::promote(&mut accounts, idx, |a| a.account == group);
        self.write_collection(CUSTOM_ACCOUNTS_FILE, &accounts)?;
        Ok(accounts.swap_remove(idx))
    }

    /// Remove one account from a group, promoting a replacement within the
    /// group when the current one is removed.
    pub fn delete_custom_account(&self, account: &str, email: &str) -> Result<()> {
        let mut accounts: Vec<CustomAccount> = self.read_collection(CUSTOM_ACCOUNTS_FILE)?;
        accounts.retain(|a| !(a.account == account && a.email == email));
        current::heal_after_delete(&mut accounts, |a| a.account == account);
        self.write_collection(CUSTOM_ACCOUNTS_FILE, &accounts)
    }

    /// Remove an entire account group. No promotion is needed; the group
    /// ceases to exist.
    pub fn delete_custom_group(&self, account: &str) -> Result<()> {
        let mut accounts: Vec<CustomAccount> = self.read_collection(CUSTOM_ACCOUNTS_FILE)?;
        accounts.retain(|a| a.account != account);
        self.write_collection(CUSTOM_ACCOUNTS_FILE, &accounts)
    }

    pub fn drop_custom_accounts(&self) -> Result<()> {
        self.drop_collection(CUSTOM_ACCOUNTS_FILE)
    }

    // --- github user (singleton)

    pub fn github_user(&self) -> Result<Option<GithubUser>> {
        let path = self.dir.join(GITHUB_USER_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| KeyrackError::CorruptCollection(GITHUB_USER_FILE.into(), e.to_string()))
    }

    /// Replace the GitHub user. The previous record, if any, is discarded.
    pub fn set_github_user(&self, user: &GithubUser) -> Result<()> {
        let raw = serde_json::to_string_pretty(user)
            .map_err(|e| KeyrackError::Serialization(e.to_string()))?;
        self.persist(GITHUB_USER_FILE, raw.as_bytes())
    }

    pub fn drop_github_user(&self) -> Result<()> {
        self.drop_collection(GITHUB_USER_FILE)
    }

    // --- environment variables

    pub fn env_vars(&self) -> Result<Vec<EnvVar>> {
        self.read_collection(ENV_VARS_FILE)
    }

    /// Set an environment variable. The key is normalized to
    /// CONSTANT_CASE; an existing variable with the same normalized key is
    /// updated in place.
    pub fn set_env_var(&self, key: &str, value: &str) -> Result<EnvVar> {
        let key = constant_case(key);
        let mut vars = self.env_vars()?;

        let idx = match vars.iter().position(|v| v.key == key) {
            Some(idx) => {
                vars[idx].value = value.to_string();
                idx
            }
            None => {
                vars.push(EnvVar {
                    key,
                    value: value.to_string(),
                });
                vars.len() - 1
            }
        };

        self.write_collection(ENV_VARS_FILE, &vars)?;
        Ok(vars.swap_remove(idx))
    }

    pub fn drop_env_vars(&self) -> Result<()> {
        self.drop_collection(ENV_VARS_FILE)
    }

    /// Drop every collection (full reset).
    pub fn drop_all(&self) -> Result<()> {
        self.drop_wallets()?;
        self.drop_custom_accounts()?;
        self.drop_github_user()?;
        self.drop_env_vars()
    }

    // --- collection plumbing

    fn read_collection<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)?;
        serde_json::from_str(&raw)
            .map_err(|e| KeyrackError::CorruptCollection(file.into(), e.to_string()))
    }

    fn write_collection<T: Serialize>(&self, file: &str, records: &[T]) -> Result<()> {
        let raw = serde_json::to_string_pretty(records)
            .map_err(|e| KeyrackError::Serialization(e.to_string()))?;
        self.persist(file, raw.as_bytes())
    }

    fn persist(&self, file: &str, bytes: &[u8]) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
            restrict_dir(&self.dir)?;
        }
        let path = self.dir.join(file);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)
            .map_err(|e| KeyrackError::Storage(e.error))?;
        restrict_file(&path)
    }

    fn drop_collection(&self, file: &str) -> Result<()> {
        let path = self.dir.join(file);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn restrict_file(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

fn restrict_dir(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn test_store(dir: &TempDir) -> Store {
        Store::open(dir.path().join("data"))
    }

    fn custom(account: &str, email: &str) -> CustomAccount {
        CustomAccount {
            account: account.to_string(),
            email: email.to_string(),
            password: "pw".to_string(),
            email_password: "epw".to_string(),
            current: false,
            data: BTreeMap::new(),
        }
    }

    #[test]
    fn test_missing_collection_lists_empty() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        assert!(store.wallets().unwrap().is_empty());
        assert!(store.custom_accounts(None).unwrap().is_empty());
        assert!(store.env_vars().unwrap().is_empty());
        assert!(store.github_user().unwrap().is_none());
    }

    #[test]
    fn test_first_wallet_becomes_current() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let wallet = store.set_wallet("0x1", None, None).unwrap();
        assert!(wallet.current);
        assert_eq!(wallet.public_key, keys::public_key_for("0x1"));
    }

    #[test]
    fn test_second_wallet_takes_over_current() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.set_wallet("0x1", None, None).unwrap();
        store.set_wallet("0x2", None, None).unwrap();

        let wallets = store.wallets().unwrap();
        assert_eq!(wallets.len(), 2);
        assert!(!wallets[0].current);
        assert!(wallets[1].current);
        assert_eq!(wallets[1].private_key, "0x2");
    }

    #[test]
    fn test_reinserting_existing_key_promotes_in_place() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.set_wallet("0x1", Some("Main"), None).unwrap();
        store.set_wallet("0x2", None, None).unwrap();
        let promoted = store.set_wallet("0x1", None, None).unwrap();

        assert!(promoted.current);
        assert_eq!(promoted.label.as_deref(), Some("Main"));

        let wallets = store.wallets().unwrap();
        assert_eq!(wallets.len(), 2);
        assert_eq!(wallets.iter().filter(|w| w.current).count(), 1);
        assert!(wallets[0].current);
    }

    #[test]
    fn test_deleting_current_wallet_promotes_last_remaining() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.set_wallet("0xb", None, None).unwrap();
        store.set_wallet("0xc", None, None).unwrap();
        store.set_wallet("0xa", None, None).unwrap();
        // storage order: b, c, a — a is current

        store.delete_wallet("0xa").unwrap();

        let wallets = store.wallets().unwrap();
        assert_eq!(wallets.len(), 2);
        assert!(!wallets[0].current);
        assert!(wallets[1].current, "last remaining wallet should take over");
        assert_eq!(wallets[1].private_key, "0xc");
    }

    #[test]
    fn test_deleting_non_current_wallet_keeps_current() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.set_wallet("0x1", None, None).unwrap();
        store.set_wallet("0x2", None, None).unwrap();
        store.delete_wallet("0x1").unwrap();

        let wallets = store.wallets().unwrap();
        assert_eq!(wallets.len(), 1);
        assert!(wallets[0].current);
        assert_eq!(wallets[0].private_key, "0x2");
    }

    #[test]
    fn test_deleting_last_wallet_leaves_empty_collection() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.set_wallet("0x1", None, None).unwrap();
        store.delete_wallet("0x1").unwrap();
        assert!(store.wallets().unwrap().is_empty());
    }

    #[test]
    fn test_custom_current_is_scoped_per_group() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.set_custom_account(custom("twitter", "a@x.io")).unwrap();
        store.set_custom_account(custom("discord", "d@x.io")).unwrap();
        store.set_custom_account(custom("twitter", "b@x.io")).unwrap();

        let twitter = store.current_custom_account("twitter").unwrap().unwrap();
        assert_eq!(twitter.email, "b@x.io");

        // Promoting within twitter must not touch discord.
        let discord = store.current_custom_account("discord").unwrap().unwrap();
        assert_eq!(discord.email, "d@x.io");
    }

    #[test]
    fn test_custom_upsert_by_account_and_email() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.set_custom_account(custom("twitter", "a@x.io")).unwrap();
        let mut updated = custom("twitter", "a@x.io");
        updated.password = "rotated".to_string();
        store.set_custom_account(updated).unwrap();

        let accounts = store.custom_accounts(Some("twitter")).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].password, "rotated");
        assert!(accounts[0].current);
    }

    #[test]
    fn test_deleting_current_custom_promotes_within_group_only() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.set_custom_account(custom("twitter", "a@x.io")).unwrap();
        store.set_custom_account(custom("twitter", "b@x.io")).unwrap();
        store.set_custom_account(custom("discord", "d@x.io")).unwrap();

        store.delete_custom_account("twitter", "b@x.io").unwrap();

        let twitter = store.current_custom_account("twitter").unwrap().unwrap();
        assert_eq!(twitter.email, "a@x.io");
        assert!(store.current_custom_account("discord").unwrap().is_some());
    }

    #[test]
    fn test_delete_custom_group_removes_all_members() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.set_custom_account(custom("twitter", "a@x.io")).unwrap();
        store.set_custom_account(custom("twitter", "b@x.io")).unwrap();
        store.set_custom_account(custom("discord", "d@x.io")).unwrap();

        store.delete_custom_group("twitter").unwrap();

        assert!(store.custom_accounts(Some("twitter")).unwrap().is_empty());
        assert_eq!(store.custom_accounts(None).unwrap().len(), 1);
    }

    #[test]
    fn test_github_user_is_a_singleton() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let first = GithubUser {
            login: "octocat".to_string(),
            name: "Octo Cat".to_string(),
            email: "octo@github.com".to_string(),
            access_token: "ghp_one".to_string(),
            data: serde_json::Value::Null,
        };
        store.set_github_user(&first).unwrap();

        let second = GithubUser {
            login: "hubber".to_string(),
            access_token: "ghp_two".to_string(),
            ..first
        };
        store.set_github_user(&second).unwrap();

        let user = store.github_user().unwrap().unwrap();
        assert_eq!(user.login, "hubber");
        assert_eq!(user.access_token, "ghp_two");
    }

    #[test]
    fn test_env_keys_are_constant_cased_and_upserted() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.set_env_var("rpc-url", "http://localhost:8545").unwrap();
        store.set_env_var("RPC_URL", "http://localhost:9000").unwrap();

        let vars = store.env_vars().unwrap();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].key, "RPC_URL");
        assert_eq!(vars[0].value, "http://localhost:9000");
    }

    #[test]
    fn test_drop_removes_backing_file() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.set_wallet("0x1", None, None).unwrap();
        store.drop_wallets().unwrap();

        assert!(!store.dir().join(WALLETS_FILE).exists());
        assert!(store.wallets().unwrap().is_empty());
    }

    #[test]
    fn test_drop_all_clears_every_collection() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.set_wallet("0x1", None, None).unwrap();
        store.set_custom_account(custom("twitter", "a@x.io")).unwrap();
        store.set_env_var("key", "value").unwrap();

        store.drop_all().unwrap();

        assert!(store.wallets().unwrap().is_empty());
        assert!(store.custom_accounts(None).unwrap().is_empty());
        assert!(store.env_vars().unwrap().is_empty());
        assert!(store.github_user().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_collection_surfaces_as_error() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.dir().join(WALLETS_FILE), "{not json").unwrap();

        let err = store.wallets().unwrap_err();
        assert!(matches!(err, KeyrackError::CorruptCollection(_, _)));
    }

    #[test]
    fn test_invariant_holds_over_mixed_wallet_operations() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let keys = ["0x1", "0x2", "0x3", "0x4"];
        for key in keys {
            store.set_wallet(key, None, None).unwrap();
            assert_eq!(
                store.wallets().unwrap().iter().filter(|w| w.current).count(),
                1
            );
        }
        store.set_wallet("0x2", None, None).unwrap();
        for key in ["0x2", "0x1", "0x4", "0x3"] {
            store.delete_wallet(key).unwrap();
            let wallets = store.wallets().unwrap();
            let currents = wallets.iter().filter(|w| w.current).count();
            assert_eq!(currents, usize::from(!wallets.is_empty()));
        }
    }
}
