//! Mosaic Wallet
//!
//! A command-line wallet for a single custom token ("mosaic") on the NEM
//! blockchain.
//!
//! ## Structure
//!
//! - The wallet file is an opaque encrypted blob owned by [`WalletStore`]
//! - Keys, encryption and network access sit behind the [`Ledger`] trait
//! - Commands only sequence prompts and ledger calls; the unlocked account
//!   is passed explicitly for the lifetime of one command

pub mod amount;
pub mod config;
pub mod error;
pub mod keys;
pub mod keystore;
pub mod ledger;
pub mod prompt;
pub mod session;
pub mod storage;

pub mod commands;

pub use config::MosaicSettings;
pub use error::WalletError;
pub use ledger::{nis::NisLedger, Ledger, UnlockedAccount};
pub use prompt::{Prompter, TerminalPrompter};
pub use storage::WalletStore;
