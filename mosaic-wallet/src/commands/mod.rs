//! CLI Commands
//!
//! Implementation of the wallet commands and their shared console helpers.

pub mod balance;
pub mod create;
pub mod send;

use anyhow::Result;

use crate::error::WalletError;
use crate::ledger::{Ledger, UnlockedAccount};
use crate::prompt::Prompter;
use crate::session;
use crate::storage::WalletStore;

/// Usage text for the `program` binary managing the `name` mosaic
pub fn usage(program: &str, name: &str) -> String {
    format!(
        "Usage:

\t{program} balance
\t\tGets your current {name} wallet balance and public address

\t{program} send <amount> <address>
\t\tSends {name} from your wallet to the specified address

\t{program} wallet create
\t\tGuides you through creating a new {name} wallet
"
    )
}

/// Print the banner and usage text
pub fn print_usage(program: &str, name: &str) {
    println!("\x1b[1;36m{}\x1b[0m", name.to_uppercase());
    println!();
    println!("{}", usage(program, name));
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("\x1b[31m{}\x1b[0m", message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("\x1b[32m{}\x1b[0m", message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("\x1b[33m{}\x1b[0m", message);
}

/// Print a value the user should copy or check
pub fn print_highlight(label: &str, value: &str) {
    println!("{}\x1b[33m{}\x1b[0m", label, value);
}

/// Print the password mismatch notice
pub fn print_mismatch() {
    println!("\x1b[35m\nPasswords do not match.\n\x1b[0m");
}

/// Load the default wallet and unlock it.
///
/// `None` means the password was wrong; the failure has been reported and
/// the command should stop without an error exit.
pub fn open_session<P: Prompter + ?Sized>(
    store: &WalletStore,
    ledger: &dyn Ledger,
    prompter: &mut P,
) -> Result<Option<UnlockedAccount>> {
    let blob = store.load()?;

    match session::unlock(ledger, &blob, prompter) {
        Ok(account) => Ok(Some(account)),
        Err(e) if matches!(e.downcast_ref::<WalletError>(), Some(WalletError::Decryption(_))) => {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
