use crate::vault::EncryptedBlob;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default RPC endpoint for mainnet.
pub const DEFAULT_MAINNET_RPC_URL: &str = "https://rpc.novacoin.io";
/// Default RPC endpoint for testnet.
pub const DEFAULT_TESTNET_RPC_URL: &str = "https://testnet-rpc.novacoin.io";

/// Base units per whole coin (18 decimals).
const DECIMALS: u32 = 18;
/// Fractional digits shown in formatted balances.
const DISPLAY_DECIMALS: usize = 4;

/// Network selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
}

impl Network {
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(format!("unknown network: {}", other)),
        }
    }
}

/// Default RPC endpoint per network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcEndpoints {
    pub mainnet: String,
    pub testnet: String,
}

impl RpcEndpoints {
    pub fn for_network(&self, network: Network) -> &str {
        match network {
            Network::Mainnet => &self.mainnet,
            Network::Testnet => &self.testnet,
        }
    }
}

impl Default for RpcEndpoints {
    fn default() -> Self {
        Self {
            mainnet: DEFAULT_MAINNET_RPC_URL.to_string(),
            testnet: DEFAULT_TESTNET_RPC_URL.to_string(),
        }
    }
}

/// Persisted wallet record.
///
/// `encrypted_key` is the only confidential field and is stored as the hex
/// blob produced by the vault. `balance` is a runtime cache and is never
/// written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletState {
    #[serde(default)]
    pub is_initialized: bool,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub encrypted_key: Option<EncryptedBlob>,
    #[serde(default)]
    pub network: Network,
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(skip)]
    pub balance: u128,
}

fn default_rpc_url() -> String {
    DEFAULT_TESTNET_RPC_URL.to_string()
}

impl Default for WalletState {
    fn default() -> Self {
        Self {
            is_initialized: false,
            address: None,
            encrypted_key: None,
            network: Network::default(),
            rpc_url: default_rpc_url(),
            balance: 0,
        }
    }
}

impl WalletState {
    /// Fresh state on `network` using that network's endpoint.
    pub fn for_network(network: Network, endpoints: &RpcEndpoints) -> Self {
        Self {
            network,
            rpc_url: endpoints.for_network(network).to_string(),
            ..Self::default()
        }
    }

    /// Record a newly created or imported wallet.
    pub fn initialize(&mut self, address: impl Into<String>, encrypted_key: EncryptedBlob) {
        self.is_initialized = true;
        self.address = Some(address.into());
        self.encrypted_key = Some(encrypted_key);
    }

    pub fn set_balance(&mut self, balance: u128) {
        self.balance = balance;
    }

    /// Switch network and reset the RPC URL to that network's default.
    pub fn set_network(&mut self, network: Network, endpoints: &RpcEndpoints) {
        self.network = network;
        self.rpc_url = endpoints.for_network(network).to_string();
    }

    pub fn set_rpc_url(&mut self, rpc_url: impl Into<String>) {
        self.rpc_url = rpc_url.into();
    }

    /// Drop runtime data; the persisted record is left untouched.
    pub fn lock(&mut self) {
        self.balance = 0;
    }

    /// Forget the wallet. Network selection survives.
    pub fn reset(&mut self) {
        self.is_initialized = false;
        self.address = None;
        self.encrypted_key = None;
        self.balance = 0;
    }

    pub fn formatted_balance(&self) -> String {
        format_balance(self.balance)
    }
}

/// Render an amount in base units as whole coins with up to four decimals.
///
/// The fraction is truncated, not rounded; a zero fraction is omitted.
pub fn format_balance(wei: u128) -> String {
    let divisor = 10u128.pow(DECIMALS);
    let integer_part = wei / divisor;
    let fractional_part = wei % divisor;

    if fractional_part == 0 {
        return integer_part.to_string();
    }

    let frac = format!("{:0>width$}", fractional_part, width = DECIMALS as usize);
    format!("{}.{}", integer_part, &frac[..DISPLAY_DECIMALS])
}
