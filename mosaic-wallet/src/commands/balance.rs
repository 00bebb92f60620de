//! Balance check command

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::warn;

use crate::amount::format_amount;
use crate::config::MosaicSettings;
use crate::ledger::{Ledger, UnlockedAccount};
use crate::prompt::Prompter;
use crate::storage::WalletStore;

use super::{open_session, print_error};

/// Run the balance command
pub async fn run<P: Prompter + ?Sized>(
    settings: &MosaicSettings,
    store: &WalletStore,
    ledger: &dyn Ledger,
    prompter: &mut P,
) -> Result<()> {
    let Some(account) = open_session(store, ledger, prompter)? else {
        return Ok(());
    };

    report(settings, ledger, &account).await;
    Ok(())
}

/// Print the account's address and balances.
///
/// Returns the mosaic balance in micro-units, or `None` if the ledger
/// could not be queried (already reported).
pub async fn report(
    settings: &MosaicSettings,
    ledger: &dyn Ledger,
    account: &UnlockedAccount,
) -> Option<u64> {
    let address = account.address();

    println!();
    println!("Public Address: {}", address.pretty());
    println!();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message("\x1b[33mFetching balance...\x1b[0m");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = ledger.balances(&address).await;
    spinner.finish_and_clear();

    match result {
        Ok(balances) => {
            println!();
            println!("XEM Balance: {}", format_amount(balances.xem));
            println!();
            println!(
                "{} Balance: {}",
                settings.mosaic_name,
                format_amount(balances.mosaic)
            );
            println!();
            Some(balances.mosaic)
        }
        Err(e) => {
            warn!("Balance query for {} failed: {}", address, e);
            print_error(&format!("Failed to fetch balance: {}", e));
            None
        }
    }
}
