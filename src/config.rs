use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_ENV_KEY: &str = "APP_ENV";
const DEFAULT_APP_ENV: &str = "dev";

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub wallet: WalletConfig,
    pub transaction: TransactionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WalletConfig {
    pub initial_balance: BigDecimal,
    pub max_balance: BigDecimal,
    pub min_balance: BigDecimal,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionConfig {
    pub max_amount: BigDecimal,
    pub min_amount: BigDecimal,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

/// System-wide limits the wallet service enforces.
#[derive(Debug, Clone, PartialEq)]
pub struct Limits {
    pub initial_balance: BigDecimal,
    pub min_balance: BigDecimal,
    pub max_balance: BigDecimal,
    pub min_transaction_amount: BigDecimal,
    pub max_transaction_amount: BigDecimal,
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Loads `.env`, reads the JSON file for the current environment and
    /// applies environment overrides.
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let path = config_path();
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            self.server.port = port.parse().context("SERVER_PORT must be a port number")?;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            self.logging.format = match format.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "text" => LogFormat::Text,
                other => anyhow::bail!("LOG_FORMAT must be 'text' or 'json', got '{}'", other),
            };
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let wallet = &self.wallet;
        if wallet.min_balance > wallet.initial_balance {
            anyhow::bail!("wallet.minBalance must not exceed wallet.initialBalance");
        }
        if wallet.initial_balance > wallet.max_balance {
            anyhow::bail!("wallet.initialBalance must not exceed wallet.maxBalance");
        }
        if self.transaction.min_amount > self.transaction.max_amount {
            anyhow::bail!("transaction.minAmount must not exceed transaction.maxAmount");
        }
        if self.server.port == 0 {
            anyhow::bail!("server.port must be greater than 0");
        }
        if self.server.request_timeout_secs == 0 {
            anyhow::bail!("server.requestTimeoutSecs must be greater than 0");
        }

        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            initial_balance: self.wallet.initial_balance.clone(),
            min_balance: self.wallet.min_balance.clone(),
            max_balance: self.wallet.max_balance.clone(),
            min_transaction_amount: self.transaction.min_amount.clone(),
            max_transaction_amount: self.transaction.max_amount.clone(),
        }
    }
}

fn config_path() -> PathBuf {
    if let Ok(path) = env::var("CONFIG_PATH") {
        return PathBuf::from(path);
    }

    let app_env = env::var(APP_ENV_KEY).unwrap_or_else(|_| DEFAULT_APP_ENV.to_string());
    PathBuf::from(format!(".config/{}.json", app_env))
}
