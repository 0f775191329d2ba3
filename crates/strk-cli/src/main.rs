//! # strk-cli
//!
//! Command-line interface for encoding calldata, predicting contract
//! addresses and waiting on transactions.
//!
//! ## Usage
//!
//! ```bash
//! # Calldata
//! strk encode --args '[1, 2, 3]'
//! strk encode --abi contract.json --args '{"owner": "0x1"}'
//!
//! # Addresses
//! strk address --class-hash 0x... --salt 0x1 --calldata 0x1,0x2
//! strk address --class-hash 0x... --abi contract.json --args '{"owner": "0x1"}'
//!
//! # Transactions
//! strk wait 0x... --timeout 300 --l1
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// Starknet client CLI
#[derive(Parser, Debug)]
#[command(name = "strk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// RPC endpoint URL
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Encode arguments into calldata
    Encode(commands::encode::EncodeArgs),
    /// Predict a contract address and build its deployment call
    Address(commands::address::AddressArgs),
    /// Wait for a transaction to become final
    Wait(commands::wait::WaitArgs),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set RPC URL
        #[arg(long)]
        set_rpc: Option<String>,
        /// Set the account unique deployments are bound to
        #[arg(long)]
        set_account: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    // Load config
    let mut config = Config::load();

    // Override RPC URL if provided
    if let Some(rpc_url) = cli.rpc_url {
        config.client.rpc_url = rpc_url;
    }

    let result = match cli.command {
        Commands::Encode(cmd) => cmd.execute(cli.json),
        Commands::Address(cmd) => cmd.execute(&config, cli.json),
        Commands::Wait(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Config {
            show,
            set_rpc,
            set_account,
        } => handle_config(&mut config, show, set_rpc, set_account, cli.json),
    };

    if let Err(e) = result {
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn handle_config(
    config: &mut Config,
    show: bool,
    set_rpc: Option<String>,
    set_account: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(rpc) = set_rpc {
        config.client.rpc_url = rpc;
        modified = true;
    }

    if let Some(account) = set_account {
        commands::parse_felt_arg(&account)?;
        config.account_address = Some(account);
        modified = true;
    }

    if modified {
        config.save().map_err(|e| CliError::Config(e.to_string()))?;
        Output::new(json)
            .field("status", "saved")
            .message("Configuration saved")
            .print();
    } else if show {
        let account = config.account_address.as_deref().unwrap_or("none");
        Output::new(json)
            .field("rpc_url", &config.client.rpc_url)
            .field_u64("poll_interval_secs", config.client.poll_interval_secs)
            .field("udc_address", &config.client.udc_address)
            .field_value("strict_finality", config.client.strict_finality.into())
            .field("account_address", account)
            .message(&format!(
                "RPC URL: {}\nPoll interval: {}s\nUDC: {}\nStrict finality: {}\nAccount: {}",
                config.client.rpc_url,
                config.client.poll_interval_secs,
                config.client.udc_address,
                config.client.strict_finality,
                account
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-rpc/--set-account to modify")
            .print();
    }

    Ok(())
}
