use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "keyrack",
    about = "Manage local developer credentials: wallets, service accounts and tokens, with an interactive picker to switch the active one.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store or update a credential.
    Set {
        #[command(subcommand)]
        target: SetTarget,
    },

    /// Show stored accounts.
    User(UserArgs),

    /// Pick the current record from an interactive menu.
    Change {
        #[command(subcommand)]
        target: ChangeTarget,
    },

    /// Drop stored collections.
    Reset(ResetArgs),

    /// Export all collections to a JSON config file.
    Export {
        /// Destination path (defaults to keyrack_config.json).
        path: Option<PathBuf>,

        /// Write indented JSON.
        #[arg(short, long)]
        indent: bool,
    },

    /// Import collections from an exported JSON config file.
    Import {
        /// Path to the config file.
        path: PathBuf,
    },

    /// Generate project convenience files.
    Make {
        #[command(subcommand)]
        target: MakeTarget,
    },
}

#[derive(Subcommand, Debug)]
pub enum SetTarget {
    /// Set the current wallet using its private key.
    Wallet {
        /// The wallet's private key (hex, 0x-prefixed or bare).
        private_key: String,

        /// Display label for the wallet.
        label: Option<String>,

        /// Mnemonic phrase backing the key.
        mnemonic: Option<String>,
    },

    /// Set the GitHub account (replaces any existing one).
    Git {
        /// Personal access token; prompted for when omitted.
        access_token: Option<String>,

        /// GitHub login.
        #[arg(long)]
        login: String,

        /// Display name (defaults to the login).
        #[arg(long)]
        name: Option<String>,

        /// Primary email address.
        #[arg(long)]
        email: String,
    },

    /// Set a custom service account.
    Custom {
        /// Account group name, e.g. "twitter".
        account: String,

        /// Account password.
        password: String,

        /// Account email address.
        email: String,

        /// Email password (defaults to the account password).
        email_password: Option<String>,

        /// Additional KEY VALUE field, repeatable.
        #[arg(short = 'k', long = "keyvalue", num_args = 2, value_names = ["KEY", "VALUE"], action = clap::ArgAction::Append)]
        fields: Vec<String>,
    },

    /// Set an environment variable (key is normalized to CONSTANT_CASE).
    Env {
        key: String,
        value: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ChangeTarget {
    /// Change the current wallet.
    Wallet,

    /// Change the current account within a custom account group.
    Custom,
}

#[derive(Args, Debug)]
#[group(multiple = false)]
pub struct UserArgs {
    /// Show the GitHub account (default).
    #[arg(short, long)]
    pub git: bool,

    /// Show wallets.
    #[arg(short, long)]
    pub wallets: bool,

    /// Show custom accounts.
    #[arg(short, long)]
    pub custom: bool,

    /// Show environment variables.
    #[arg(short, long)]
    pub env: bool,
}

#[derive(Args, Debug)]
#[group(multiple = false)]
pub struct ResetArgs {
    /// Reset all user data (default).
    #[arg(short, long)]
    pub user: bool,

    /// Reset the GitHub account.
    #[arg(short, long)]
    pub git: bool,

    /// Reset wallets.
    #[arg(short, long)]
    pub wallets: bool,

    /// Reset custom accounts.
    #[arg(short, long)]
    pub custom: bool,

    /// Reset environment variables.
    #[arg(short, long)]
    pub env: bool,
}

#[derive(Subcommand, Debug)]
pub enum MakeTarget {
    /// Write a .env file from the current credentials.
    Dotenv {
        /// Destination path.
        #[arg(default_value = ".env")]
        path: PathBuf,
    },
}
