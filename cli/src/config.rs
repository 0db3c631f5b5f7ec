//! Network configuration and endpoint credential handling
//!
//! Built once in `main` and passed down explicitly. Precedence, highest
//! first: command-line flag, environment, config file, network preset.

use anyhow::{Context, Result};
use quote_model::FeeRate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the RPC provider key
pub const API_KEY_ENV: &str = "V2QUOTE_API_KEY";

/// Config file read when `--config` is not given (missing is fine)
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/v2quote/config.toml";

pub const DEFAULT_NETWORK: &str = "mainnet";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Contents of the optional TOML config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub network: Option<String>,
    pub rpc_url: Option<String>,
    pub api_key: Option<String>,
    pub fee: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load `path` if given (must exist), else the default path if it exists
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(&expand_path(path)?);
        }

        let default_path = expand_path(Path::new(DEFAULT_CONFIG_PATH))?;
        if default_path.exists() {
            log::info!("Using config file {}", default_path.display());
            Self::load(&default_path)
        } else {
            Ok(Self::default())
        }
    }
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("Failed to expand path: {}", raw))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Values given on the command line (or via the environment through clap)
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub network: Option<String>,
    pub rpc_url: Option<String>,
    pub api_key: Option<String>,
    pub fee: Option<FeeRate>,
    pub timeout_secs: Option<u64>,
}

pub struct NetworkConfig {
    pub network: String,
    pub rpc_url: String,
    pub fee: FeeRate,
    pub timeout: Duration,
    api_key: Option<String>,
}

impl NetworkConfig {
    pub fn new(overrides: ConfigOverrides, file: ConfigFile) -> Result<Self> {
        let network = overrides
            .network
            .or(file.network)
            .unwrap_or_else(|| DEFAULT_NETWORK.to_string());
        let api_key = overrides.api_key.or(file.api_key).filter(|k| !k.is_empty());

        let rpc_url = match overrides.rpc_url.or(file.rpc_url) {
            Some(url) => url,
            None => preset_url(&network, api_key.as_deref())?,
        };

        let fee = match (overrides.fee, file.fee) {
            (Some(fee), _) => fee,
            (None, Some(text)) => text
                .parse()
                .with_context(|| format!("Invalid fee in config file: {}", text))?,
            (None, None) => FeeRate::UNISWAP_V2,
        };

        let timeout_secs = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            anyhow::bail!("Timeout must be at least 1 second");
        }

        Ok(Self {
            network,
            rpc_url,
            fee,
            timeout: Duration::from_secs(timeout_secs),
            api_key,
        })
    }

    /// Configuration pointing straight at `url` with default settings
    #[cfg(test)]
    pub fn for_url(url: &str, timeout: Duration) -> Self {
        Self {
            network: "custom".to_string(),
            rpc_url: url.to_string(),
            fee: FeeRate::UNISWAP_V2,
            timeout,
            api_key: None,
        }
    }

    /// Endpoint with the credential masked, for display
    pub fn redacted_url(&self) -> String {
        match &self.api_key {
            Some(key) => self.rpc_url.replace(key.as_str(), "***"),
            None => self.rpc_url.clone(),
        }
    }
}

fn preset_url(network: &str, api_key: Option<&str>) -> Result<String> {
    let keyed = |base: &str| -> Result<String> {
        let key = api_key.with_context(|| {
            format!(
                "Network {} needs an API key: pass --api-key, set {}, or use --url",
                network, API_KEY_ENV
            )
        })?;
        Ok(format!("{}{}", base, key))
    };

    match network {
        "mainnet" => keyed("https://eth-mainnet.g.alchemy.com/v2/"),
        "sepolia" => keyed("https://eth-sepolia.g.alchemy.com/v2/"),
        "localnet" => Ok("http://127.0.0.1:8545".to_string()),
        _ => anyhow::bail!("Unknown network: {}. Use mainnet, sepolia, or localnet", network),
    }
}
