use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::{GeneratedWallet, PasswordPolicy, WalletSdk};
use crate::error::{AppError, AppResult};
use crate::state::{Network, RpcEndpoints, StateStore, WalletState};
use crate::vault::{
    is_valid_private_key, EncryptedBlob, EntropySource, OsEntropy, PrivateKey, SecretCodec,
};

/// Creates, imports and unlocks the single wallet secret.
///
/// Key stretching runs on the blocking thread pool so async callers are
/// never stalled by the KDF. State changes are written to the store before
/// the in-memory copy is updated.
pub struct WalletService<S, E = OsEntropy> {
    sdk: S,
    codec: Arc<SecretCodec<E>>,
    store: StateStore,
    endpoints: RpcEndpoints,
    policy: PasswordPolicy,
    state: RwLock<WalletState>,
}

impl<S: WalletSdk> WalletService<S> {
    /// Load the stored wallet record, or start fresh on the default network.
    pub fn open(
        sdk: S,
        store: StateStore,
        endpoints: RpcEndpoints,
        default_network: Network,
    ) -> AppResult<Self> {
        Self::open_with_codec(sdk, SecretCodec::new(), store, endpoints, default_network)
    }
}

impl<S: WalletSdk, E: EntropySource + 'static> WalletService<S, E> {
    /// Like [`WalletService::open`], encrypting with the given codec.
    pub fn open_with_codec(
        sdk: S,
        codec: SecretCodec<E>,
        store: StateStore,
        endpoints: RpcEndpoints,
        default_network: Network,
    ) -> AppResult<Self> {
        let state = if store.exists() {
            store.load()?
        } else {
            WalletState::for_network(default_network, &endpoints)
        };

        Ok(Self {
            sdk,
            codec: Arc::new(codec),
            store,
            endpoints,
            policy: PasswordPolicy::default(),
            state: RwLock::new(state),
        })
    }

    pub fn with_policy(mut self, policy: PasswordPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> WalletState {
        self.state.read().await.clone()
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.is_initialized
    }

    /// Generate a new wallet and store its key under `password`.
    ///
    /// Returns the new address.
    pub async fn create_wallet(&self, password: &str, confirmation: &str) -> AppResult<String> {
        self.policy.check_new_confirmed(password, confirmation)?;

        let mut state = self.state.write().await;
        if state.is_initialized {
            return Err(AppError::AlreadyInitialized);
        }

        let GeneratedWallet {
            private_key,
            address,
        } = self.sdk.generate()?;
        let blob = self.encrypt(private_key, password).await?;

        let mut next = state.clone();
        next.initialize(address.clone(), blob);
        self.store.save(&next)?;
        *state = next;

        info!(%address, "Created new wallet");
        Ok(address)
    }

    /// Store an existing `0x`-prefixed private key under `password`.
    ///
    /// Returns the address the SDK derives for it.
    pub async fn import_wallet(&self, private_key: &str, password: &str) -> AppResult<String> {
        self.policy.check_new(password)?;
        if !is_valid_private_key(private_key) {
            return Err(AppError::InvalidPrivateKey);
        }

        let mut state = self.state.write().await;
        if state.is_initialized {
            return Err(AppError::AlreadyInitialized);
        }

        let private_key = PrivateKey::new(private_key);
        let address = self.sdk.address_of(&private_key)?;
        let blob = self.encrypt(private_key, password).await?;

        let mut next = state.clone();
        next.initialize(address.clone(), blob);
        self.store.save(&next)?;
        *state = next;

        info!(%address, "Imported wallet");
        Ok(address)
    }

    /// Decrypt the stored key.
    ///
    /// The caller owns the result and must drop it as soon as it is used.
    pub async fn reveal_private_key(&self, password: &str) -> AppResult<PrivateKey> {
        self.policy.check_unlock(password)?;

        let blob = self
            .state
            .read()
            .await
            .encrypted_key
            .clone()
            .ok_or(AppError::NotInitialized)?;

        self.decrypt(blob, password).await.inspect_err(|e| {
            if e.is_invalid_password() {
                warn!("Unlock rejected: invalid password");
            }
        })
    }

    /// Decrypt the key, sign `payload` with it and discard it.
    pub async fn sign(&self, password: &str, payload: &[u8]) -> AppResult<Vec<u8>> {
        let private_key = self.reveal_private_key(password).await?;
        let signed = self.sdk.sign_transaction(&private_key, payload)?;
        drop(private_key);

        info!(payload_len = payload.len(), "Signed transaction");
        Ok(signed)
    }

    /// Switch network; the RPC URL follows the network default.
    pub async fn set_network(&self, network: Network) -> AppResult<()> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        next.set_network(network, &self.endpoints);
        self.store.save(&next)?;
        *state = next;

        info!(%network, "Network changed");
        Ok(())
    }

    pub async fn set_rpc_url(&self, rpc_url: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        next.set_rpc_url(rpc_url);
        self.store.save(&next)?;
        *state = next;

        info!(rpc_url, "RPC URL changed");
        Ok(())
    }

    pub async fn set_balance(&self, balance: u128) {
        self.state.write().await.set_balance(balance);
    }

    pub async fn lock(&self) {
        self.state.write().await.lock();
    }

    /// Forget the wallet and its encrypted key. Network settings are kept.
    pub async fn reset(&self) -> AppResult<()> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        next.reset();
        self.store.save(&next)?;
        *state = next;

        warn!("Wallet reset; encrypted key deleted");
        Ok(())
    }

    async fn encrypt(&self, private_key: PrivateKey, password: &str) -> AppResult<EncryptedBlob> {
        let codec = Arc::clone(&self.codec);
        let password = Zeroizing::new(password.to_owned());

        let blob = tokio::task::spawn_blocking(move || {
            codec.encrypt(private_key.expose_secret(), &password)
        })
        .await
        .map_err(|e| AppError::internal(format!("encryption task failed: {}", e)))??;

        Ok(blob)
    }

    async fn decrypt(&self, blob: EncryptedBlob, password: &str) -> AppResult<PrivateKey> {
        let codec = Arc::clone(&self.codec);
        let password = Zeroizing::new(password.to_owned());

        let private_key = tokio::task::spawn_blocking(move || codec.decrypt(&blob, &password))
            .await
            .map_err(|e| AppError::internal(format!("decryption task failed: {}", e)))??;

        Ok(private_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::{generate_private_key, sha256, VaultError, VaultResult};
    use tempfile::{tempdir, TempDir};

    const PASSWORD: &str = "password123";
    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    /// Deterministic stand-in for the chain SDK.
    struct FakeSdk;

    impl WalletSdk for FakeSdk {
        fn generate(&self) -> AppResult<GeneratedWallet> {
            let private_key = PrivateKey::new(generate_private_key()?);
            let address = self.address_of(&private_key)?;
            Ok(GeneratedWallet {
                private_key,
                address,
            })
        }

        fn address_of(&self, private_key: &PrivateKey) -> AppResult<String> {
            Ok(format!("0x{}", &sha256(private_key.hex_digits())[..40]))
        }

        fn sign_transaction(&self, private_key: &PrivateKey, payload: &[u8]) -> AppResult<Vec<u8>> {
            let mut message = private_key.expose_secret().as_bytes().to_vec();
            message.extend_from_slice(payload);
            Ok(message)
        }
    }

    fn open_service() -> (TempDir, WalletService<FakeSdk>) {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path().join("wallet.json"));
        let service =
            WalletService::open(FakeSdk, store, RpcEndpoints::default(), Network::Testnet).unwrap();
        (dir, service)
    }

    #[tokio::test]
    async fn test_create_and_reveal() {
        let (_dir, service) = open_service();
        let address = service.create_wallet(PASSWORD, PASSWORD).await.unwrap();

        let state = service.state().await;
        assert!(state.is_initialized);
        assert_eq!(state.address.as_deref(), Some(address.as_str()));

        let key = service.reveal_private_key(PASSWORD).await.unwrap();
        assert!(is_valid_private_key(key.expose_secret()));
        assert_eq!(FakeSdk.address_of(&key).unwrap(), address);
    }

    #[tokio::test]
    async fn test_create_enforces_policy() {
        let (_dir, service) = open_service();
        assert!(matches!(
            service.create_wallet("short", "short").await,
            Err(AppError::WeakPassword(_))
        ));
        assert!(matches!(
            service.create_wallet(PASSWORD, "password124").await,
            Err(AppError::PasswordMismatch)
        ));
        assert!(!service.is_initialized().await);
    }

    #[tokio::test]
    async fn test_cannot_overwrite_existing_wallet() {
        let (_dir, service) = open_service();
        service.import_wallet(KEY, PASSWORD).await.unwrap();

        assert!(matches!(
            service.create_wallet(PASSWORD, PASSWORD).await,
            Err(AppError::AlreadyInitialized)
        ));
        assert!(matches!(
            service.import_wallet(KEY, PASSWORD).await,
            Err(AppError::AlreadyInitialized)
        ));
    }

    #[tokio::test]
    async fn test_import_rejects_invalid_key() {
        let (_dir, service) = open_service();
        assert!(matches!(
            service.import_wallet(&KEY[2..], PASSWORD).await,
            Err(AppError::InvalidPrivateKey)
        ));
        assert!(matches!(
            service.import_wallet("0x1234", PASSWORD).await,
            Err(AppError::InvalidPrivateKey)
        ));
    }

    #[tokio::test]
    async fn test_import_then_sign() {
        let (_dir, service) = open_service();
        service.import_wallet(KEY, PASSWORD).await.unwrap();

        let signed = service.sign(PASSWORD, b"transfer").await.unwrap();
        assert_eq!(signed, format!("{}transfer", KEY).into_bytes());
    }

    #[tokio::test]
    async fn test_wrong_password_is_reported_as_invalid_password() {
        let (_dir, service) = open_service();
        service.import_wallet(KEY, PASSWORD).await.unwrap();

        let err = service.sign("not-the-password", b"transfer").await.unwrap_err();
        assert!(err.is_invalid_password());

        assert!(matches!(
            service.reveal_private_key("").await,
            Err(AppError::PasswordRequired)
        ));
    }

    #[tokio::test]
    async fn test_reveal_requires_wallet() {
        let (_dir, service) = open_service();
        assert!(matches!(
            service.reveal_private_key(PASSWORD).await,
            Err(AppError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.json");

        let service = WalletService::open(
            FakeSdk,
            StateStore::new(&path),
            RpcEndpoints::default(),
            Network::Testnet,
        )
        .unwrap();
        service.import_wallet(KEY, PASSWORD).await.unwrap();
        service.set_network(Network::Mainnet).await.unwrap();
        service.set_rpc_url("http://localhost:8545").await.unwrap();
        drop(service);

        let reopened = WalletService::open(
            FakeSdk,
            StateStore::new(&path),
            RpcEndpoints::default(),
            Network::Testnet,
        )
        .unwrap();
        let state = reopened.state().await;
        assert_eq!(state.network, Network::Mainnet);
        assert_eq!(state.rpc_url, "http://localhost:8545");

        let key = reopened.reveal_private_key(PASSWORD).await.unwrap();
        assert_eq!(key.expose_secret(), KEY);
    }

    #[tokio::test]
    async fn test_reset_allows_new_wallet() {
        let (_dir, service) = open_service();
        service.import_wallet(KEY, PASSWORD).await.unwrap();
        service.set_balance(10).await;

        service.reset().await.unwrap();
        let state = service.state().await;
        assert!(!state.is_initialized);
        assert!(state.encrypted_key.is_none());
        assert_eq!(state.balance, 0);

        service.create_wallet(PASSWORD, PASSWORD).await.unwrap();
        assert!(service.is_initialized().await);
    }

    #[tokio::test]
    async fn test_default_network_applies_to_fresh_state() {
        let dir = tempdir().unwrap();
        let endpoints = RpcEndpoints {
            mainnet: "http://main.local".to_string(),
            testnet: "http://test.local".to_string(),
        };
        let service = WalletService::open(
            FakeSdk,
            StateStore::new(dir.path().join("wallet.json")),
            endpoints,
            Network::Mainnet,
        )
        .unwrap();

        let state = service.state().await;
        assert_eq!(state.network, Network::Mainnet);
        assert_eq!(state.rpc_url, "http://main.local");
    }

    struct NoEntropy;

    impl EntropySource for NoEntropy {
        fn try_fill(&self, _dest: &mut [u8]) -> VaultResult<()> {
            Err(VaultError::EntropyUnavailable("no entropy".to_string()))
        }
    }

    #[tokio::test]
    async fn test_injected_entropy_failure_leaves_wallet_untouched() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(dir.path().join("wallet.json"));
        let service = WalletService::open_with_codec(
            FakeSdk,
            SecretCodec::with_entropy(NoEntropy),
            store.clone(),
            RpcEndpoints::default(),
            Network::Testnet,
        )
        .unwrap();

        let err = service.import_wallet(KEY, PASSWORD).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Vault(VaultError::EntropyUnavailable(_))
        ));
        assert!(!service.is_initialized().await);
        assert!(!store.exists());
    }
}
