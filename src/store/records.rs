use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A record that can be marked as the active choice within its group.
pub trait Current {
    fn is_current(&self) -> bool;
    fn set_current(&mut self, current: bool);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub public_key: String,
    pub private_key: String,
    #[serde(default)]
    pub mnemonic: Option<String>,
    pub current: bool,
    #[serde(default)]
    pub label: Option<String>,
}

impl Current for Wallet {
    fn is_current(&self) -> bool {
        self.current
    }

    fn set_current(&mut self, current: bool) {
        self.current = current;
    }
}

/// A per-service account. Accounts sharing the same `account` name form a
/// group, and the current-record invariant is scoped to that group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAccount {
    pub account: String,
    pub email: String,
    pub password: String,
    pub email_password: String,
    pub current: bool,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl Current for CustomAccount {
    fn is_current(&self) -> bool {
        self.current
    }

    fn set_current(&mut self, current: bool) {
        self.current = current;
    }
}

/// The GitHub account. At most one exists per store; setting a new one
/// replaces the old.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubUser {
    pub login: String,
    pub name: String,
    pub email: String,
    pub access_token: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

/// Normalize a name to CONSTANT_CASE: word boundaries (case changes and
/// non-alphanumeric runs) become single underscores.
pub fn constant_case(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let after_lower = chars[i - 1].is_lowercase() || chars[i - 1].is_numeric();
            let before_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if (after_lower || (chars[i - 1].is_uppercase() && before_lower)) && !out.ends_with('_')
            {
                out.push('_');
            }
        }
        out.push(c.to_ascii_uppercase());
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}
