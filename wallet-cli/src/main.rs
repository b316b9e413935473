//! NovaWallet command-line interface
//!
//! Terminal front end for storing a wallet private key behind a password.

mod commands;
mod prompt;

use anyhow::Context;
use clap::{Parser, Subcommand};
use novawallet::{AppConfig, Network, StateStore};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "novawallet")]
#[command(about = "Password-protected private key storage for NovaCoin wallets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the wallet state file (overrides config)
    #[arg(short, long, global = true)]
    state: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new random private key
    Keygen,

    /// Check that a private key is 0x followed by 64 hex digits
    Validate {
        /// Candidate private key
        key: String,
    },

    /// SHA-256 of the given text
    Hash {
        input: String,
    },

    /// Encrypt a private key and print the hex blob (nothing is stored)
    Encrypt,

    /// Decrypt a hex blob and print the private key
    Decrypt {
        /// Blob as produced by `encrypt`
        #[arg(long)]
        blob: String,
    },

    /// Encrypt a private key and store it as the wallet
    Store {
        /// Wallet address belonging to the key
        #[arg(long)]
        address: String,
    },

    /// Show the stored wallet record
    Status,

    /// Decrypt and print the stored private key
    ExportKey,

    /// Switch network (resets the RPC URL to the network default)
    Network {
        network: Network,
    },

    /// Set a custom RPC endpoint
    RpcUrl {
        url: String,
    },

    /// Delete the stored wallet
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(Some(path)),
        None => AppConfig::load(),
    }
    .context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let state_path = match cli.state.clone().or_else(|| config.storage.state_path.clone()) {
        Some(path) => path,
        None => default_state_path()?,
    };
    let store = StateStore::new(state_path);

    match cli.command {
        Commands::Keygen => commands::keygen(),
        Commands::Validate { key } => commands::validate(&key),
        Commands::Hash { input } => commands::hash(&input),
        Commands::Encrypt => commands::encrypt(),
        Commands::Decrypt { blob } => commands::decrypt(&blob),
        Commands::Store { address } => commands::store(&store, &config, &address),
        Commands::Status => commands::status(&store),
        Commands::ExportKey => commands::export_key(&store),
        Commands::Network { network } => commands::set_network(&store, &config, network),
        Commands::RpcUrl { url } => commands::set_rpc_url(&store, &config, &url),
        Commands::Reset { yes } => commands::reset(&store, &config, yes),
    }
}

/// `<config dir>/novawallet/wallet.json`
fn default_state_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::config_dir().context("could not find config directory")?;
    Ok(config_dir.join("novawallet").join("wallet.json"))
}
