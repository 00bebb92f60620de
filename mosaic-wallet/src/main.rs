//! Mosaic Wallet CLI
//!
//! A wallet for a single custom token on the NEM blockchain.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mosaic_wallet::commands::{self, balance, create, send};
use mosaic_wallet::{MosaicSettings, NisLedger, TerminalPrompter, WalletError, WalletStore};

/// Environment variable naming the settings file
const CONFIG_ENV: &str = "MOSAIC_WALLET_CONFIG";

#[derive(Parser)]
#[command(name = "mosaic-wallet")]
#[command(about = "Wallet for a single NEM mosaic")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Mosaic settings file
    #[arg(short, long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage wallet files
    Wallet {
        #[command(subcommand)]
        action: Option<WalletAction>,
    },

    /// Get your current wallet balance and public address
    Balance,

    /// Send the mosaic from your wallet to an address
    Send {
        /// Amount to send, up to 6 decimal places
        #[arg(allow_hyphen_values = true)]
        amount: Option<String>,

        /// Recipient address
        address: Option<String>,
    },
}

#[derive(Subcommand)]
enum WalletAction {
    /// Create a new wallet
    Create,
}

#[tokio::main]
async fn main() -> ExitCode {
    install_panic_notice();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return usage_error(e),
    };

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => report_failure(e),
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = MosaicSettings::load(cli.config.as_deref())?;
    let program = program_name();

    let Some(command) = cli.command else {
        commands::print_usage(&program, &settings.mosaic_name);
        return Ok(ExitCode::FAILURE);
    };

    let store = WalletStore::from_settings(&settings)?;
    let ledger = NisLedger::new(&settings)?;
    let mut prompter = TerminalPrompter;

    match command {
        Commands::Wallet {
            action: Some(WalletAction::Create),
        } => {
            create::run(&settings, &store, &ledger, &mut prompter)?;
        }
        Commands::Wallet { action: None } => {
            commands::print_usage(&program, &settings.mosaic_name);
            return Ok(ExitCode::FAILURE);
        }
        Commands::Balance => {
            store.require_existing()?;
            balance::run(&settings, &store, &ledger, &mut prompter).await?;
        }
        Commands::Send { amount, address } => {
            store.require_existing()?;
            send::run(
                &settings,
                &store,
                &ledger,
                &mut prompter,
                amount.as_deref(),
                address.as_deref(),
            )
            .await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Unrecognized invocations print the parse error and the usage text
fn usage_error(e: clap::Error) -> ExitCode {
    let _ = e.print();
    if !e.use_stderr() {
        // --help and --version
        return ExitCode::SUCCESS;
    }

    let config = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let settings = MosaicSettings::load(config.as_deref()).unwrap_or_default();
    println!();
    commands::print_usage(&program_name(), &settings.mosaic_name);
    ExitCode::FAILURE
}

/// User errors are printed as-is; anything else is unexpected.
fn report_failure(e: anyhow::Error) -> ExitCode {
    match e.downcast_ref::<WalletError>() {
        Some(wallet_error) => commands::print_error(&wallet_error.to_string()),
        None => {
            error!("{:#}", e);
            commands::print_error(&format!("{:#}", e));
            println!("Wallet closed");
        }
    }
    ExitCode::FAILURE
}

fn install_panic_notice() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_hook(info);
        closing_notice(&mut std::io::stderr());
        std::process::exit(1);
    }));
}

/// Write the closing notice; a closed stream is ignored
fn closing_notice(out: &mut impl Write) {
    let _ = writeln!(out, "Wallet closed");
}

fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .and_then(|arg| Path::new(arg).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mosaic-wallet".to_string())
}
