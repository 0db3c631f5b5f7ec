//! v2quote - Constant product pool quote calculator
//!
//! Reads a pair's reserves and token metadata over JSON-RPC and computes the
//! output amount the pair contract would give for a given input, using the
//! same integer arithmetic as the contract.

use clap::Parser;
use colored::Colorize;
use quote_model::{Address, DecimalAmount, FeeRate};
use std::io;
use std::path::PathBuf;

mod abi;
mod client;
mod config;
mod error;
mod pool;
mod prompt;
mod quote;
#[cfg(test)]
mod testing;

use client::RpcClient;
use config::{ConfigFile, ConfigOverrides, NetworkConfig, API_KEY_ENV};
use pool::PoolReader;
use prompt::Prompter;
use quote::{QuoteOptions, QuoteRequest};

#[derive(Parser)]
#[command(name = "v2quote")]
#[command(about = "Quote a swap against a constant product pool", long_about = None)]
#[command(version)]
struct Cli {
    /// Network to connect to (mainnet, sepolia, localnet)
    #[arg(short, long)]
    network: Option<String>,

    /// RPC URL (overrides network default)
    #[arg(short, long)]
    url: Option<String>,

    /// RPC provider API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Retained fraction after the pool fee, e.g. 997/1000
    #[arg(long)]
    fee: Option<FeeRate>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Pool address (prompted if omitted)
    #[arg(long, value_parser = prompt::parse_address)]
    pool: Option<Address>,

    /// Input token address (prompted if omitted)
    #[arg(long, value_parser = prompt::parse_address)]
    token_in: Option<Address>,

    /// Output token address (prompted if omitted)
    #[arg(long, value_parser = prompt::parse_address)]
    token_out: Option<Address>,

    /// Human-readable input amount, e.g. 1.3 (prompted if omitted)
    #[arg(long)]
    amount: Option<DecimalAmount>,

    /// Do not check that both tokens belong to the pool
    #[arg(long)]
    skip_membership_check: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn gather_request(cli: &Cli) -> anyhow::Result<QuoteRequest> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    let pool = match cli.pool {
        Some(pool) => pool,
        None => prompter.address("Enter pool address (0x...): ", prompt::DEFAULT_POOL)?,
    };
    let token_in = match cli.token_in {
        Some(token) => token,
        None => prompter.address("Enter Input Token address (0x...): ", prompt::DEFAULT_TOKEN_IN)?,
    };
    let token_out = match cli.token_out {
        Some(token) => token,
        None => prompter.address("Enter Output Token address (0x...): ", prompt::DEFAULT_TOKEN_OUT)?,
    };
    let amount = match &cli.amount {
        Some(amount) => amount.clone(),
        None => prompter.amount(
            "Enter input amount (human readable please, e.g. 1, 1.3 0.7777): ",
            prompt::DEFAULT_AMOUNT,
        )?,
    };

    Ok(QuoteRequest {
        pool,
        token_in,
        token_out,
        amount,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // Initialize network configuration
    let file = ConfigFile::load_or_default(cli.config.as_deref())?;
    let config = NetworkConfig::new(
        ConfigOverrides {
            network: cli.network.clone(),
            rpc_url: cli.url.clone(),
            api_key: cli.api_key.clone(),
            fee: cli.fee,
            timeout_secs: cli.timeout,
        },
        file,
    )?;

    quote::print_banner();

    if cli.verbose {
        println!("{} {}", "Network:".bright_cyan(), config.network);
        println!("{} {}", "RPC URL:".bright_cyan(), config.redacted_url());
        println!("{} {}", "Fee Rate:".bright_cyan(), config.fee);
    }

    let request = gather_request(&cli)?;
    quote::print_request(&request);

    println!("\n{}", "------ Calling RPC for amount data ------".dimmed());

    let client = RpcClient::new(&config)?;
    let reader = PoolReader::new(client);
    let options = QuoteOptions {
        fee: config.fee,
        check_membership: !cli.skip_membership_check,
    };

    let report = quote::run_quote(&reader, &request, &options)?;
    quote::print_report(&report);

    Ok(())
}
