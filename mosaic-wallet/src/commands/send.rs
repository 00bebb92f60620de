//! Send transaction command

use anyhow::Result;
use tracing::warn;

use crate::amount::{format_amount, parse_amount};
use crate::config::MosaicSettings;
use crate::error::WalletError;
use crate::ledger::{Ledger, TransferRequest, UnlockedAccount};
use crate::prompt::{is_affirmative, Prompter};
use crate::storage::WalletStore;

use super::{balance, open_session, print_error, print_highlight};

/// Run the send command.
///
/// The balance is fetched first; nothing is validated until it is known.
pub async fn run<P: Prompter + ?Sized>(
    settings: &MosaicSettings,
    store: &WalletStore,
    ledger: &dyn Ledger,
    prompter: &mut P,
    amount: Option<&str>,
    recipient: Option<&str>,
) -> Result<()> {
    let Some(account) = open_session(store, ledger, prompter)? else {
        return Ok(());
    };

    let Some(balance) = balance::report(settings, ledger, &account).await else {
        return Ok(());
    };

    let request = validate_transfer(settings, amount, recipient, balance)?;
    transfer(settings, ledger, prompter, &account, &request).await
}

/// Check a transfer against the available mosaic balance (micro-units).
pub fn validate_transfer(
    settings: &MosaicSettings,
    amount: Option<&str>,
    recipient: Option<&str>,
    balance: u64,
) -> Result<TransferRequest, WalletError> {
    let amount = parse_amount(amount.unwrap_or_default())?;

    let recipient = recipient
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or(WalletError::MissingRecipient)?;

    if amount > balance {
        return Err(WalletError::InsufficientBalance {
            mosaic: settings.mosaic_name.clone(),
        });
    }

    Ok(TransferRequest {
        amount,
        recipient: recipient.to_string(),
    })
}

/// Preview, confirm and submit a validated transfer
pub async fn transfer<P: Prompter + ?Sized>(
    settings: &MosaicSettings,
    ledger: &dyn Ledger,
    prompter: &mut P,
    account: &UnlockedAccount,
    request: &TransferRequest,
) -> Result<()> {
    let preview = match ledger.prepare_transfer(request, account).await {
        Ok(preview) => preview,
        Err(e) => {
            warn!("Transfer preview failed: {}", e);
            println!();
            print_error(&e.to_string());
            println!();
            return Ok(());
        }
    };

    println!("Transaction Details:");
    println!();
    print_highlight("Recipient:          ", &request.recipient);
    println!();
    print_highlight(
        &format!("{} to send:{}", settings.mosaic_name, padding(&settings.mosaic_name)),
        &format_amount(request.amount),
    );
    println!();
    print_highlight("XEM Fee:            ", &format_amount(preview.fee));
    println!();
    println!();
    println!("Would you like to proceed?");
    println!();

    let answer = prompter.line(&format!(
        "{} Transfer: \x1b[33mProceed? ( y/n )\x1b[0m: ",
        settings.mosaic_name
    ))?;
    if !is_affirmative(&answer) {
        return Err(WalletError::Cancelled.into());
    }

    match ledger.send_mosaic(request, &preview, account).await {
        Ok(result) if result.is_success() => {
            println!("{}", result);
            println!();
            println!();
            println!("Transaction successfully announced to the NEM blockchain. Transaction could take some time. Come back here in 5 minutes to check your balance to ensure that the transaction was successfully sent");
            println!();
        }
        Ok(result) => {
            warn!("Transfer rejected: {}", result);
            print_error(&format!("Transaction rejected: {}", result));
        }
        Err(e) => {
            warn!("Transfer submission failed: {}", e);
            print_error(&e.to_string());
        }
    }

    Ok(())
}

/// Align values after "`<name>` to send:" with the other detail labels
fn padding(name: &str) -> String {
    const LABEL_WIDTH: usize = 20;
    let used = name.chars().count() + " to send:".len();
    " ".repeat(LABEL_WIDTH.saturating_sub(used).max(1))
}
