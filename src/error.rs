use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyrackError {
    #[error("Storage unavailable: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Collection '{0}' is corrupted: {1}")]
    CorruptCollection(String, String),

    #[error("No interactive terminal available.")]
    NoTty,

    #[error("Terminal error: {0}")]
    Terminal(std::io::Error),

    #[error("Nothing to show: a menu needs at least one option.")]
    EmptyMenu,

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
