use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::store::records::constant_case;
use crate::store::Store;

/// Write a `.env` convenience file from the current wallet, the current
/// custom accounts and the stored environment variables.
pub fn run(store: &Store, path: &Path) -> Result<()> {
    let wallet = store.current_wallet()?;
    let env_vars = store.env_vars()?;
    let accounts = store.current_custom_accounts()?;

    let mut out = String::new();

    if let Some(wallet) = wallet {
        out.push_str("# Wallet credentials\n");
        let _ = writeln!(out, "TEST_PRIVATE_KEY='{}'", wallet.private_key);
        if let Some(mnemonic) = &wallet.mnemonic {
            let _ = writeln!(out, "TEST_MNEMONIC='{mnemonic}'");
        }
        out.push('\n');
    }

    if !env_vars.is_empty() {
        out.push_str("# Environment variables\n");
        for var in &env_vars {
            let _ = writeln!(out, "{}='{}'", var.key, var.value);
        }
        out.push('\n');
    }

    if !accounts.is_empty() {
        out.push_str("# Custom account credentials\n");
        for account in &accounts {
            let prefix = &account.account;
            let _ = writeln!(
                out,
                "{}='{}'",
                constant_case(&format!("{prefix}_email")),
                account.email
            );
            let _ = writeln!(
                out,
                "{}='{}'",
                constant_case(&format!("{prefix}_password")),
                account.password
            );
            let _ = writeln!(
                out,
                "{}='{}'",
                constant_case(&format!("{prefix}_email_password")),
                account.email_password
            );
            for (key, value) in &account.data {
                let _ = writeln!(out, "{}='{}'", constant_case(&format!("{prefix}_{key}")), value);
            }
            out.push('\n');
        }
    }

    std::fs::write(path, out)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
