//! Wallet creation command

use anyhow::Result;
use std::path::PathBuf;

use crate::config::MosaicSettings;
use crate::keys::Address;
use crate::ledger::Ledger;
use crate::prompt::Prompter;
use crate::session::{self, MIN_PASSWORD_LEN};
use crate::storage::WalletStore;

use super::{print_highlight, print_success, print_warning};

/// A freshly created and saved wallet
#[derive(Debug, Clone)]
pub struct CreatedWallet {
    pub address: Address,
    pub path: PathBuf,
}

/// Run the `wallet create` command
pub fn run<P: Prompter + ?Sized>(
    settings: &MosaicSettings,
    store: &WalletStore,
    ledger: &dyn Ledger,
    prompter: &mut P,
) -> Result<CreatedWallet> {
    let name = &settings.mosaic_name;

    println!();
    println!(
        "Please enter a unique password \x1b[33m({} character minimum)\x1b[0m.",
        MIN_PASSWORD_LEN
    );
    println!();
    println!("This password will be used to encrypt your private key and make working with your wallet easier.");
    println!();
    print_warning(
        "Store this password somewhere safe. If you lose or forget it you will never be able to transfer funds",
    );
    println!();

    let password =
        session::prompt_new_password(prompter, name, settings.max_password_attempts)?;

    let blob = ledger.create_wallet(name, &password)?;
    let account = ledger.open_wallet(&blob, &password)?;
    let address = account.address();

    println!();
    print_success(&format!("{} wallet successfully created.", name));
    println!("You can now start sending and receiving {}!", name);
    println!();
    println!("{} Public Address:", name);
    print_highlight("", &address.pretty());
    println!();
    println!("Private Key:");
    print_highlight("", &account.private_key_hex());

    println!();
    println!();
    println!("Downloading wallet for your convenience.");
    println!();
    print_warning("Please store someplace safe. The private key is encrypted by your password.");
    println!();
    println!(
        "To load this wallet on a new computer you would simply import the .wlt file into this app and enter your password and you'll be able to sign transactions."
    );

    let path = store.save(&blob)?;
    print_success(&format!("Downloaded wallet to {}", path.display()));

    Ok(CreatedWallet { address, path })
}
