use anyhow::{Context, Result};

use crate::cli::ResetArgs;
use crate::store::Store;

pub fn run(store: &Store, args: ResetArgs) -> Result<()> {
    if args.git {
        store.drop_github_user()
    } else if args.wallets {
        store.drop_wallets()
    } else if args.custom {
        store.drop_custom_accounts()
    } else if args.env {
        store.drop_env_vars()
    } else {
        store.drop_all()
    }
    .context("Failed to reset the store")
}
