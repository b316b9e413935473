//! Persisted wallet state.
//!
//! Holds the encrypted key blob alongside non-secret metadata (address,
//! network, RPC endpoint). Only the blob carries confidentiality
//! requirements; it is opaque to this module.

pub mod schema;
pub mod store;

pub use schema::{
    format_balance, Network, RpcEndpoints, WalletState, DEFAULT_MAINNET_RPC_URL,
    DEFAULT_TESTNET_RPC_URL,
};
pub use store::StateStore;
