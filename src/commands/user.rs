use anyhow::Result;

use crate::cli::UserArgs;
use crate::echo;
use crate::store::sort::sort_wallets;
use crate::store::Store;

pub fn run(store: &Store, args: UserArgs) -> Result<()> {
    if args.wallets {
        wallets(store)
    } else if args.custom {
        custom_accounts(store)
    } else if args.env {
        env_vars(store)
    } else {
        github(store)
    }
}

fn wallets(store: &Store) -> Result<()> {
    let mut wallets = store.wallets()?;
    if wallets.is_empty() {
        echo::error("There are no wallets to show.");
        return Ok(());
    }
    sort_wallets(&mut wallets);
    for wallet in &wallets {
        echo::wallet(wallet);
    }
    Ok(())
}

fn github(store: &Store) -> Result<()> {
    match store.github_user()? {
        Some(user) => echo::github_user(&user),
        None => echo::error("There is no GitHub account to show."),
    }
    Ok(())
}

fn custom_accounts(store: &Store) -> Result<()> {
    let accounts = store.custom_accounts(None)?;
    if accounts.is_empty() {
        echo::error("There are no custom accounts to show.");
        return Ok(());
    }
    for account in &accounts {
        echo::custom_account(account);
    }
    Ok(())
}

fn env_vars(store: &Store) -> Result<()> {
    let vars = store.env_vars()?;
    if vars.is_empty() {
        echo::error("There are no environment variables to show.");
        return Ok(());
    }
    for var in &vars {
        echo::env_var(var);
    }
    Ok(())
}
