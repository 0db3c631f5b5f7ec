//! Interactive input: four values, each with a fallback default
//!
//! Parsing is kept in plain functions; `Prompter` only moves text between the
//! terminal and those functions, so it runs just as well over in-memory buffers.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use colored::Colorize;
use quote_model::{Address, DecimalAmount};
use thiserror::Error;

pub const DEFAULT_POOL: &str = "0x0d4a11d5eeaac28ec3f61d100daf4d40471f1852";
pub const DEFAULT_TOKEN_IN: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
pub const DEFAULT_TOKEN_OUT: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";
pub const DEFAULT_AMOUNT: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Address must start with 0x")]
    MissingPrefix,
    #[error("Address must be 0x followed by 40 hex digits")]
    MalformedAddress,
    #[error("Invalid number. Please enter a valid decimal number")]
    InvalidAmount,
}

pub fn parse_address(text: &str) -> Result<Address, InputError> {
    let text = text.trim();
    if !text.starts_with("0x") {
        return Err(InputError::MissingPrefix);
    }
    text.parse().map_err(|_| InputError::MalformedAddress)
}

pub fn parse_amount(text: &str) -> Result<DecimalAmount, InputError> {
    text.trim().parse().map_err(|_| InputError::InvalidAmount)
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `prompt` and read one line; `None` on an empty line, EOF or a read error
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                // Keep the next output off the prompt line
                writeln!(self.output)?;
                Ok(None)
            }
            Ok(_) => {
                let trimmed = line.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
        }
    }

    pub fn address(&mut self, prompt: &str, default: &str) -> Result<Address> {
        loop {
            let Some(text) = self.ask(prompt)? else {
                writeln!(self.output, "Using default address for variable: {}", default)?;
                return parse_address(default)
                    .with_context(|| format!("Invalid default address: {}", default));
            };

            match parse_address(&text) {
                Ok(address) => return Ok(address),
                Err(e) => writeln!(self.output, "{}", format!("Error: {}", e).red())?,
            }
        }
    }

    pub fn amount(&mut self, prompt: &str, default: &str) -> Result<DecimalAmount> {
        loop {
            let text = match self.ask(prompt)? {
                Some(text) => text,
                None => {
                    writeln!(self.output, "Using default value for amount: {}", default)?;
                    return parse_amount(default)
                        .with_context(|| format!("Invalid default amount: {}", default));
                }
            };

            match parse_amount(&text) {
                Ok(amount) => return Ok(amount),
                Err(e) => writeln!(self.output, "{}", format!("Error: {}", e).red())?,
            }
        }
    }
}
