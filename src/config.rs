use crate::state::{Network, RpcEndpoints, DEFAULT_MAINNET_RPC_URL, DEFAULT_TESTNET_RPC_URL};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Where the wallet record lives
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Path of the wallet state file. When unset the CLI uses the user's
    /// config directory.
    #[serde(default)]
    pub state_path: Option<PathBuf>,
}

/// Network defaults
#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    /// Network selected for a fresh wallet
    #[serde(default)]
    pub default_network: Network,
    #[serde(default = "default_mainnet_rpc_url")]
    pub mainnet_rpc_url: String,
    #[serde(default = "default_testnet_rpc_url")]
    pub testnet_rpc_url: String,
}

fn default_mainnet_rpc_url() -> String {
    DEFAULT_MAINNET_RPC_URL.to_string()
}

fn default_testnet_rpc_url() -> String {
    DEFAULT_TESTNET_RPC_URL.to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            default_network: Network::default(),
            mainnet_rpc_url: default_mainnet_rpc_url(),
            testnet_rpc_url: default_testnet_rpc_url(),
        }
    }
}

impl NetworkConfig {
    pub fn endpoints(&self) -> RpcEndpoints {
        RpcEndpoints {
            mainnet: self.mainnet_rpc_url.clone(),
            testnet: self.testnet_rpc_url.clone(),
        }
    }
}

/// Logging settings
#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "novawallet=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

/// Root application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, optionally from an explicit file instead of
    /// `config/default` + `config/local`.
    pub fn load_from(path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name("config/local").required(false)),
        };

        let config = builder
            // Environment overrides use `__` after the prefix and between keys,
            // e.g. NOVAWALLET__NETWORK__DEFAULT_NETWORK, NOVAWALLET__STORAGE__STATE_PATH
            .add_source(
                Environment::with_prefix("NOVAWALLET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Initialize the global config singleton
    pub fn init() -> Result<&'static Self, ConfigError> {
        let config = Self::load()?;
        Ok(CONFIG.get_or_init(|| config))
    }

    /// Get reference to the global config, if initialized
    pub fn get() -> Option<&'static Self> {
        CONFIG.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.storage.state_path.is_none());
        assert_eq!(config.network.default_network, Network::Testnet);
        assert_eq!(config.network.endpoints(), RpcEndpoints::default());
        assert_eq!(config.log.filter, "novawallet=info");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.toml");
        fs::write(
            &path,
            r#"
[storage]
state_path = "/tmp/nova/wallet.json"

[network]
default_network = "mainnet"
mainnet_rpc_url = "http://localhost:8545"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(Some(&path)).unwrap();
        assert_eq!(
            config.storage.state_path,
            Some(PathBuf::from("/tmp/nova/wallet.json"))
        );
        assert_eq!(config.network.default_network, Network::Mainnet);
        assert_eq!(config.network.mainnet_rpc_url, "http://localhost:8545");
        assert_eq!(config.network.testnet_rpc_url, DEFAULT_TESTNET_RPC_URL);
        assert_eq!(config.log.filter, "novawallet=info");
    }

    #[test]
    fn test_env_override_uses_double_underscore_after_prefix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        fs::write(&path, "").unwrap();

        std::env::set_var("NOVAWALLET__NETWORK__DEFAULT_NETWORK", "mainnet");
        std::env::set_var("NOVAWALLET_LOG__FILTER", "debug");
        let config = AppConfig::load_from(Some(&path));
        std::env::remove_var("NOVAWALLET__NETWORK__DEFAULT_NETWORK");
        std::env::remove_var("NOVAWALLET_LOG__FILTER");

        let config = config.unwrap();
        assert_eq!(config.network.default_network, Network::Mainnet);
        // Single underscore after the prefix is not an override
        assert_eq!(config.log.filter, "novawallet=info");
    }
}
