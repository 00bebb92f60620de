//! Wallet Errors
//!
//! User-facing failure classes. Anything that is not a `WalletError` is
//! treated as unexpected by the binary's safety net.

use std::path::PathBuf;

/// Errors the CLI reports to the user before exiting.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("Must provide a valid number with maximum of 6 digits ie 10.356784")]
    InvalidAmount,

    #[error("Must provide a valid recipient address")]
    MissingRecipient,

    #[error("You don't have enough {mosaic} to send")]
    InsufficientBalance { mosaic: String },

    #[error("Transaction canceled")]
    Cancelled,

    #[error("Cannot find default wallet. Please place a file named {file} at this location: {}", path.display())]
    WalletNotFound { file: String, path: PathBuf },

    #[error("{0}")]
    Decryption(String),

    #[error("Too many password attempts ({0})")]
    TooManyAttempts(u32),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}
