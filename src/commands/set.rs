use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};

use crate::cli::SetTarget;
use crate::echo;
use crate::keys;
use crate::store::records::{CustomAccount, GithubUser};
use crate::store::Store;

pub fn run(store: &Store, target: SetTarget) -> Result<()> {
    match target {
        SetTarget::Wallet {
            private_key,
            label,
            mnemonic,
        } => wallet(store, &private_key, label.as_deref(), mnemonic.as_deref()),
        SetTarget::Git {
            access_token,
            login,
            name,
            email,
        } => git(store, access_token, login, name, email),
        SetTarget::Custom {
            account,
            password,
            email,
            email_password,
            fields,
        } => custom(store, account, password, email, email_password, fields),
        SetTarget::Env { key, value } => env(store, &key, &value),
    }
}

fn wallet(
    store: &Store,
    private_key: &str,
    label: Option<&str>,
    mnemonic: Option<&str>,
) -> Result<()> {
    keys::validate_private_key(private_key)?;
    let wallet = store
        .set_wallet(private_key, label, mnemonic)
        .context("Failed to save wallet")?;
    echo::wallet(&wallet);
    Ok(())
}

fn git(
    store: &Store,
    access_token: Option<String>,
    login: String,
    name: Option<String>,
    email: String,
) -> Result<()> {
    let token = match access_token {
        Some(token) => SecretString::new(token),
        None => SecretString::new(
            rpassword::prompt_password("GitHub access token: ")
                .context("Failed to read access token")?,
        ),
    };
    if token.expose_secret().is_empty() {
        bail!("Access token must not be empty.");
    }

    let user = GithubUser {
        name: name.unwrap_or_else(|| login.clone()),
        login,
        email,
        access_token: token.expose_secret().to_string(),
        data: serde_json::Value::Null,
    };
    store
        .set_github_user(&user)
        .context("Failed to save GitHub account")?;
    echo::github_user(&user);
    Ok(())
}

fn custom(
    store: &Store,
    account: String,
    password: String,
    email: String,
    email_password: Option<String>,
    fields: Vec<String>,
) -> Result<()> {
    let email_password = email_password.unwrap_or_else(|| password.clone());

    // clap delivers repeated `-k KEY VALUE` pairs as a flat list.
    let mut data = BTreeMap::new();
    for pair in fields.chunks_exact(2) {
        data.insert(pair[0].clone(), pair[1].clone());
    }

    let record = CustomAccount {
        account,
        email,
        password,
        email_password,
        current: true,
        data,
    };
    let saved = store
        .set_custom_account(record)
        .context("Failed to save custom account")?;
    echo::custom_account(&saved);
    Ok(())
}

fn env(store: &Store, key: &str, value: &str) -> Result<()> {
    let var = store
        .set_env_var(key, value)
        .context("Failed to save environment variable")?;
    echo::env_var(&var);
    Ok(())
}
