//! Quote pipeline: fetch pool state, convert units, price the swap, report

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use quote_model::{
    order_reserves, order_reserves_checked, price_impact_bps, quote_checked, spot_output, to_raw,
    to_readable, Address, DecimalAmount, FeeRate, PoolReserves, RawAmount, SwapQuote,
};

use crate::client::ContractQuery;
use crate::pool::{PoolReader, TokenInfo};

/// Digits shown after the decimal point for human-readable amounts
const DISPLAY_PLACES: u32 = 6;

#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub pool: Address,
    pub token_in: Address,
    pub token_out: Address,
    pub amount: DecimalAmount,
}

#[derive(Debug, Clone, Copy)]
pub struct QuoteOptions {
    pub fee: FeeRate,
    /// Reject tokens that are not one of the pool's two assets
    pub check_membership: bool,
}

impl Default for QuoteOptions {
    fn default() -> Self {
        Self {
            fee: FeeRate::UNISWAP_V2,
            check_membership: true,
        }
    }
}

/// Everything fetched and computed for one quote
#[derive(Debug, Clone)]
pub struct QuoteReport {
    pub reserves: PoolReserves,
    pub input: TokenInfo,
    pub output: TokenInfo,
    pub first_asset: Address,
    pub input_is_first: bool,
    pub amount_in_raw: RawAmount,
    pub reserve_in: RawAmount,
    pub reserve_out: RawAmount,
    pub fee: FeeRate,
    pub quote: SwapQuote,
    pub spot_output: RawAmount,
    pub price_impact_bps: u32,
}

/// Run the full pipeline; the first failed query aborts it
pub fn run_quote<Q: ContractQuery>(
    reader: &PoolReader<Q>,
    request: &QuoteRequest,
    options: &QuoteOptions,
) -> Result<QuoteReport> {
    log::info!("Fetching reserves of pool {}", request.pool);
    let reserves = reader
        .reserves(&request.pool)
        .context("Error getting pool reserves")?;

    let input = reader
        .token_info(&request.token_in, &request.pool)
        .context("Error getting input token info")?;

    let output = reader
        .token_info(&request.token_out, &request.pool)
        .context("Error getting output token info")?;

    let first_asset = reader
        .first_asset(&request.pool)
        .context("Error getting token0 address")?;

    let (reserve_in, reserve_out) = if options.check_membership {
        let second_asset = reader
            .second_asset(&request.pool)
            .context("Error getting token1 address")?;
        order_reserves_checked(
            &first_asset,
            &second_asset,
            &request.token_in,
            &request.token_out,
            &reserves,
        )?
    } else {
        order_reserves(&first_asset, &request.token_in, &reserves)
    };
    let (reserve_in, reserve_out) = (reserve_in.clone(), reserve_out.clone());

    let amount_in_raw = to_raw(&request.amount, input.descriptor.decimals);
    log::info!("Input amount {} -> {} base units", request.amount, amount_in_raw);

    let raw_output = quote_checked(&reserve_in, &reserve_out, &amount_in_raw, options.fee)
        .context("Cannot compute output amount")?;
    let spot = spot_output(&reserve_in, &reserve_out, &amount_in_raw, options.fee);
    let impact = price_impact_bps(&spot, &raw_output);

    let quote = SwapQuote {
        readable_output: to_readable(&raw_output, output.descriptor.decimals),
        output_symbol: output.descriptor.symbol.clone(),
        raw_output,
    };

    Ok(QuoteReport {
        input_is_first: request.token_in == first_asset,
        reserves,
        input,
        output,
        first_asset,
        amount_in_raw,
        reserve_in,
        reserve_out,
        fee: options.fee,
        quote,
        spot_output: spot,
        price_impact_bps: impact,
    })
}

pub fn print_banner() {
    let line = "==================================================";
    println!("{}", line.bright_blue());
    println!("{}", "|        Constant Product Pool Quote CLI         |".bright_green().bold());
    println!("{}", line.bright_blue());
    println!("| Calculates the amount of an output token       |");
    println!("| for a given input token and amount             |");
    println!("|                                                |");
    println!("| You can hit enter on all input fields to       |");
    println!("| default to selling 1 WETH for USDT             |");
    println!("{}", line.bright_blue());
}

pub fn print_request(request: &QuoteRequest) {
    println!("\n{}", "Input Request Summary:".bright_yellow());
    println!("  {} {}", "Pool Address:".bright_cyan(), request.pool);
    println!("  {} {}", "Input Token Address:".bright_cyan(), request.token_in);
    println!("  {} {}", "Output Token Address:".bright_cyan(), request.token_out);
    println!(
        "  {} {}",
        "Input Amount:".bright_cyan(),
        request.amount.format_fixed(DISPLAY_PLACES)
    );
}

fn format_timestamp(ts: u32) -> String {
    DateTime::<Utc>::from_timestamp(i64::from(ts), 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn print_token(label: &str, info: &TokenInfo) {
    let readable = to_readable(&info.balance, info.descriptor.decimals);
    println!("\n{}", format!("{} Token:", label).bright_yellow());
    println!("  {} {}", "Symbol:".bright_cyan(), info.descriptor.symbol);
    println!("  {} {}", "Decimals:".bright_cyan(), info.descriptor.decimals);
    println!("  {} {}", "Balance in Pool (raw):".bright_cyan(), info.balance);
    println!(
        "  {} {}",
        "Balance in Pool:".bright_cyan(),
        readable.format_fixed(DISPLAY_PLACES)
    );
}

pub fn print_report(report: &QuoteReport) {
    println!("\n{}", "Pool Reserves:".bright_yellow());
    println!("  {} {}", "Reserve0:".bright_cyan(), report.reserves.reserve_first);
    println!("  {} {}", "Reserve1:".bright_cyan(), report.reserves.reserve_second);
    println!(
        "  {} {}",
        "Last Update:".bright_cyan(),
        format_timestamp(report.reserves.last_update_timestamp)
    );

    print_token("Input", &report.input);
    print_token("Output", &report.output);

    println!("\n{}", "Swap:".bright_yellow());
    let position = if report.input_is_first { "token0" } else { "token1" };
    println!("  {} {}", "Input token is".bright_cyan(), position);
    println!("  {} {} ({} bps)", "Fee Rate:".bright_cyan(), report.fee, report.fee.fee_bps());
    println!("  {} {}", "Input Amount (raw):".bright_cyan(), report.amount_in_raw);
    println!("  {} {}", "Output Amount (raw):".bright_cyan(), report.quote.raw_output);

    let spot = to_readable(&report.spot_output, report.output.descriptor.decimals);
    println!(
        "  {} {} {}",
        "Spot Output:".bright_cyan(),
        spot.format_fixed(DISPLAY_PLACES),
        report.quote.output_symbol
    );
    println!(
        "  {} {}.{:02}%",
        "Price Impact:".bright_cyan(),
        report.price_impact_bps / 100,
        report.price_impact_bps % 100
    );

    println!(
        "\n{} {} {}",
        "Output Amount:".bright_green().bold(),
        report.quote.readable_output.format_fixed(DISPLAY_PLACES).bold(),
        report.quote.output_symbol.bold()
    );
}
