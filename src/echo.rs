use crossterm::style::Stylize;

use crate::store::records::{CustomAccount, EnvVar, GithubUser, Wallet};

const PAD: &str = "     ";

/// Print a section label, e.g. `[Wallet 1 (Current)]`.
pub fn label(label: &str) {
    println!("{}", format!("[{label}]").blue().bold());
}

/// Print an indented `key: value` detail line.
pub fn detail(key: &str, value: &str, padding: usize) {
    let pad = PAD.repeat(padding);
    print!("{}", format!("{pad}{key}: ").magenta());
    println!("{}", value.green());
}

pub fn error(text: &str) {
    eprintln!("{}  {}", " x ".on_red(), text.red());
}

/// Print a wallet with its secrets masked.
pub fn wallet(wallet: &Wallet) {
    let mut title = wallet.label.clone().unwrap_or_else(|| "Wallet".to_string());
    if wallet.current {
        title.push_str(" (Current)");
    }
    label(&title);
    detail("Public Key", &wallet.public_key, 1);
    detail("Private Key", &mask_value(&wallet.private_key, 5, 5), 1);
    if let Some(mnemonic) = &wallet.mnemonic {
        // keep the first and last words readable
        let first = mnemonic.split_whitespace().next().map_or(0, str::len);
        let last = mnemonic.split_whitespace().last().map_or(0, str::len);
        detail("Mnemonic", &mask_value(mnemonic, first, last), 1);
    }
}

/// Print the GitHub account with its token masked.
pub fn github_user(user: &GithubUser) {
    label("GitHub");
    detail("Login", &user.login, 1);
    detail("Email", &user.email, 1);
    detail("Access token", &mask_value(&user.access_token, 10, 0), 1);
}

/// Print a custom account. Password fields are skipped outright, and
/// token-like values are masked.
pub fn custom_account(account: &CustomAccount) {
    let mut title = capitalize(&account.account);
    if account.current {
        title.push_str(" (Current)");
    }
    label(&title);
    field("email", &account.email);
    field("password", &account.password);
    field("email_password", &account.email_password);
    for (key, value) in &account.data {
        field(key, value);
    }
}

pub fn env_var(var: &EnvVar) {
    detail(&var.key, &var.value, 0);
}

/// Print one account field, applying the skip/mask policy by key name.
fn field(key: &str, value: &str) {
    let lowered = key.to_lowercase();
    if lowered.contains("password") || lowered.contains("cookie") {
        return;
    }
    let value = if lowered.contains("token") || lowered.contains("secret") || lowered.contains("private") {
        mask_value(value, value.len() / 5, value.len() / 5)
    } else {
        value.to_string()
    };
    detail(&title_case(key), &value, 1);
}

/// Capitalize a name: first character upper, the rest lower.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn title_case(key: &str) -> String {
    key.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Mask a secret for display, keeping the first `lead` and last `trail`
/// characters visible. Values too short to mask meaningfully are replaced
/// entirely.
pub fn mask_value(value: &str, lead: usize, trail: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= lead + trail {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..lead].iter().collect();
    let tail: String = chars[chars.len() - trail..].iter().collect();
    format!("{head}...{tail}")
}
