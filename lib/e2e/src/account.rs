use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{uint, Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use eyre::Context;
use kindlink_deploy::{
    network::{DEVNET_PRIVATE_KEY, LOCAL_RPC_URL, LOCAL_RPC_URL_VAR},
    Deployer, Endpoint, Network, Secret,
};
use once_cell::sync::Lazy;
use tokio::sync::{Mutex, MutexGuard};

const DEFAULT_FUNDING_ETH: U256 = uint!(100_000_000_000_000_000_U256);

/// A funded test account on the dev node.
#[derive(Clone)]
pub struct Account {
    /// The account's local private key wrapper.
    pub signer: PrivateKeySigner,
    /// The account's wallet, an `alloy` provider signing with
    /// [`Account::signer`].
    pub wallet: DynProvider,
    url: Url,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

impl Account {
    /// Creates a new account funded with 0.1 ETH from the dev node's chain
    /// owner.
    ///
    /// # Errors
    ///
    /// May fail if the RPC URL is invalid or funding the account fails.
    pub async fn new() -> eyre::Result<Self> {
        AccountFactory::create().await
    }

    /// Hex-encoded private key of this account.
    #[must_use]
    pub fn pk(&self) -> String {
        alloy::hex::encode(self.signer.to_bytes())
    }

    /// Address of this account.
    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The dev node as seen by this account: deployments are signed with
    /// its key and constructors run through the dev node's
    /// `StylusDeployer`, unless `STYLUS_DEPLOYER_ADDRESS` names another.
    ///
    /// # Errors
    ///
    /// May fail if `STYLUS_DEPLOYER_ADDRESS` is set to an invalid address.
    pub fn as_endpoint(&self) -> eyre::Result<Endpoint> {
        let mut endpoint = Endpoint::for_network(Network::Local, |var| {
            std::env::var(var).ok()
        })?;
        endpoint.rpc_url = self.url.clone();
        endpoint.private_key = Secret::new(self.pk());
        Ok(endpoint)
    }

    /// A deployer signing with this account, see [`Account::as_endpoint`].
    ///
    /// # Errors
    ///
    /// May fail if `STYLUS_DEPLOYER_ADDRESS` is set to an invalid address.
    pub fn as_deployer(&self) -> eyre::Result<Deployer> {
        let endpoint = self.as_endpoint()?;
        Ok(Deployer::new(endpoint.rpc_url, endpoint.private_key)
            .with_deployer_address(endpoint.stylus_deployer))
    }
}

/// A unit struct used as a synchronization mechanism in
/// [`AccountFactory::lock`].
struct AccountFactory;

impl AccountFactory {
    /// Get access to the factory in a synchronized manner.
    async fn lock() -> MutexGuard<'static, Self> {
        // Accounts are funded from a single master key, so creation must be
        // serialized or the master's nonce goes stale.
        static SYNC_ACCOUNT_FACTORY: Lazy<Mutex<AccountFactory>> =
            Lazy::new(|| Mutex::new(AccountFactory));

        SYNC_ACCOUNT_FACTORY.lock().await
    }

    async fn create() -> eyre::Result<Account> {
        let _lock = AccountFactory::lock().await;

        let url = rpc_url()?;
        let signer = PrivateKeySigner::random();
        let master: PrivateKeySigner = DEVNET_PRIVATE_KEY
            .parse()
            .wrap_err("failed to create master signer")?;

        let master_wallet = ProviderBuilder::new()
            .wallet(EthereumWallet::from(master.clone()))
            .connect_http(url.clone());

        let tx = TransactionRequest::default()
            .with_from(master.address())
            .with_to(signer.address())
            .with_value(DEFAULT_FUNDING_ETH);

        master_wallet
            .send_transaction(tx)
            .await?
            .watch()
            .await
            .wrap_err("account's wallet wasn't funded")?;

        let wallet = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(url.clone())
            .erased();

        Ok(Account { signer, wallet, url })
    }
}

fn rpc_url() -> eyre::Result<Url> {
    let url = std::env::var(LOCAL_RPC_URL_VAR)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| LOCAL_RPC_URL.to_owned());
    url.parse().wrap_err_with(|| format!("failed to parse RPC URL {url}"))
}
