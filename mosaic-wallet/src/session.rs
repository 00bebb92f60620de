//! Session Gate
//!
//! Turns a locked wallet blob into an [`UnlockedAccount`], and runs the
//! password/confirmation loop used when a wallet is created.

use anyhow::Result;
use zeroize::Zeroizing;

use crate::commands::{print_error, print_mismatch};
use crate::error::WalletError;
use crate::keystore::WalletBlob;
use crate::ledger::{Ledger, UnlockedAccount};
use crate::prompt::Prompter;

/// Minimum length of a new wallet password
pub const MIN_PASSWORD_LEN: usize = 8;

/// Prompt once for the password and try to open `blob`.
///
/// A wrong password is reported here and returned as
/// [`WalletError::Decryption`]; re-prompting is the caller's decision.
pub fn unlock<P: Prompter + ?Sized>(
    ledger: &dyn Ledger,
    blob: &WalletBlob,
    prompter: &mut P,
) -> Result<UnlockedAccount> {
    let password = prompter.password("wallet login: Password: ")?;

    match ledger.open_wallet(blob, &password) {
        Ok(account) => Ok(account),
        Err(e) => {
            print_error(&e.to_string());
            println!("Please try again");
            Err(e.into())
        }
    }
}

/// Ask for a new password until it is long enough and confirmed.
///
/// Unbounded unless `max_attempts` is set; running out of attempts is
/// [`WalletError::TooManyAttempts`].
pub fn prompt_new_password<P: Prompter + ?Sized>(
    prompter: &mut P,
    wallet_name: &str,
    max_attempts: Option<u32>,
) -> Result<Zeroizing<String>> {
    let mut attempts = 0u32;
    loop {
        if let Some(max) = max_attempts {
            if attempts >= max {
                return Err(WalletError::TooManyAttempts(max).into());
            }
        }
        attempts += 1;

        let password = prompter.password(&format!("{} wallet: Password: ", wallet_name))?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            print_error(&format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
            continue;
        }

        let confirm = prompter.password(&format!("{} wallet: Re-enter password: ", wallet_name))?;

        if *password != *confirm {
            print_mismatch();
            continue;
        }

        return Ok(password);
    }
}
