use anyhow::{bail, Context, Result};
use novawallet::vault::{generate_private_key, is_valid_private_key, sha256, SecretCodec};
use novawallet::{AppConfig, AppError, Network, StateStore, WalletState};
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::prompt;

pub fn keygen() -> Result<()> {
    let key = Zeroizing::new(generate_private_key()?);
    println!("{}", key.as_str());
    Ok(())
}

pub fn validate(key: &str) -> Result<()> {
    if is_valid_private_key(key) {
        println!("valid");
        Ok(())
    } else {
        bail!("invalid private key: expected 0x followed by 64 hex digits")
    }
}

pub fn hash(input: &str) -> Result<()> {
    println!("{}", sha256(input));
    Ok(())
}

pub fn encrypt() -> Result<()> {
    let key = prompt::secret("Private key: ")?;
    let password = prompt::new_password()?;

    let blob = SecretCodec::new().encrypt(&key, &password)?;

    println!("{}", blob);
    Ok(())
}

pub fn decrypt(blob: &str) -> Result<()> {
    let password = prompt::unlock_password()?;
    let key = SecretCodec::new()
        .decrypt_hex(blob, &password)
        .map_err(AppError::from)
        .map_err(invalid_password_hint)?;

    println!("{}", key.expose_secret());
    Ok(())
}

pub fn store(store: &StateStore, config: &AppConfig, address: &str) -> Result<()> {
    let mut state = load_or_default(store, config)?;
    if state.is_initialized {
        return Err(AppError::AlreadyInitialized.into());
    }

    let key = prompt::secret("Private key: ")?;
    if !is_valid_private_key(&key) {
        return Err(AppError::InvalidPrivateKey.into());
    }
    let password = prompt::new_password()?;

    let blob = SecretCodec::new().encrypt(&key, &password)?;

    state.initialize(address, blob);
    store.save(&state)?;

    info!(%address, path = %store.path().display(), "Wallet stored");
    println!("Wallet {} stored", address);
    Ok(())
}

pub fn status(store: &StateStore) -> Result<()> {
    let state = store.load()?;
    println!("initialized: {}", state.is_initialized);
    println!("address:     {}", state.address.as_deref().unwrap_or("-"));
    println!("network:     {}", state.network);
    println!("rpc url:     {}", state.rpc_url);
    println!(
        "key stored:  {}",
        if state.encrypted_key.is_some() { "yes" } else { "no" }
    );
    println!("state file:  {}", store.path().display());
    Ok(())
}

pub fn export_key(store: &StateStore) -> Result<()> {
    let state = store.load()?;
    let blob = state.encrypted_key.ok_or(AppError::NotInitialized)?;

    let password = prompt::unlock_password()?;
    let key = SecretCodec::new()
        .decrypt(&blob, &password)
        .map_err(AppError::from)
        .map_err(invalid_password_hint)?;

    warn!("Private key exported to terminal");
    println!("{}", key.expose_secret());
    Ok(())
}

pub fn set_network(store: &StateStore, config: &AppConfig, network: Network) -> Result<()> {
    let mut state = load_or_default(store, config)?;
    state.set_network(network, &config.network.endpoints());
    store.save(&state)?;

    println!("network: {} ({})", state.network, state.rpc_url);
    Ok(())
}

pub fn set_rpc_url(store: &StateStore, config: &AppConfig, url: &str) -> Result<()> {
    let mut state = load_or_default(store, config)?;
    state.set_rpc_url(url);
    store.save(&state)?;

    println!("rpc url: {}", state.rpc_url);
    Ok(())
}

pub fn reset(store: &StateStore, config: &AppConfig, yes: bool) -> Result<()> {
    if !yes
        && !prompt::confirm("Reset the wallet? This deletes the encrypted key.")
            .context("confirmation failed")?
    {
        println!("Aborted");
        return Ok(());
    }

    let mut state = load_or_default(store, config)?;
    state.reset();
    store.save(&state)?;

    warn!(path = %store.path().display(), "Wallet reset");
    println!("Wallet reset");
    Ok(())
}

fn load_or_default(store: &StateStore, config: &AppConfig) -> Result<WalletState> {
    if store.exists() {
        Ok(store.load()?)
    } else {
        Ok(WalletState::for_network(
            config.network.default_network,
            &config.network.endpoints(),
        ))
    }
}

fn invalid_password_hint(err: AppError) -> anyhow::Error {
    if err.is_invalid_password() {
        anyhow::anyhow!("Invalid password")
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn mainnet_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.network.default_network = Network::Mainnet;
        config
    }

    #[test]
    fn test_set_rpc_url_on_fresh_state_uses_configured_network() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path().join("wallet.json"));
        let config = mainnet_config();

        set_rpc_url(&store, &config, "http://localhost:8545").unwrap();

        let state = store.load().unwrap();
        assert_eq!(state.network, Network::Mainnet);
        assert_eq!(state.rpc_url, "http://localhost:8545");
    }

    #[test]
    fn test_reset_on_fresh_state_uses_configured_network() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path().join("wallet.json"));
        let config = mainnet_config();

        reset(&store, &config, true).unwrap();

        let state = store.load().unwrap();
        assert!(!state.is_initialized);
        assert_eq!(state.network, Network::Mainnet);
        assert_eq!(state.rpc_url, config.network.mainnet_rpc_url);
    }
}
