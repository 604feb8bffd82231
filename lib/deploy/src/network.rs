//! Networks the programs can be deployed to and how to reach them.
use std::{fmt, str::FromStr};

use alloy::{
    primitives::{address, Address},
    transports::http::reqwest::Url,
};

use crate::{
    config::{Config, Secret},
    error::{Error, Result},
};

/// RPC endpoint of the local network, read by [`Endpoint::local`].
pub const LOCAL_RPC_URL_VAR: &str = "RPC_URL";
/// Optional override of the factory that runs program constructors.
pub const STYLUS_DEPLOYER_VAR: &str = "STYLUS_DEPLOYER_ADDRESS";

/// Default RPC endpoint of a Nitro dev node.
pub const LOCAL_RPC_URL: &str = "http://localhost:8547";

/// Pre-funded chain owner of a Nitro dev node.
pub const DEVNET_PRIVATE_KEY: &str =
    "0xb6b15c8cb491557369f3c7d2c287b053eb229daa9c22138887752191c9520659";

/// Address of the `StylusDeployer` factory on a Nitro dev node.
pub const DEVNET_STYLUS_DEPLOYER: Address =
    address!("0x6ac4839Bfe169CadBBFbDE3f29bd8459037Bf64e");

/// Address of the public `StylusDeployer` factory on Arbitrum chains.
pub const ARBITRUM_STYLUS_DEPLOYER: Address =
    address!("0xcEcba2F1DC234f70Dd89F2041029807F8D03A990");

/// A deployment target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Network {
    /// Arbitrum Sepolia, reached through [`crate::config::RPC_URL_VAR`].
    Sepolia,
    /// A Nitro dev node, reached through [`LOCAL_RPC_URL_VAR`].
    Local,
}

impl Network {
    /// Every supported network.
    pub const ALL: [Network; 2] = [Network::Sepolia, Network::Local];

    /// Name used on the command line and for journal directories.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Network::Sepolia => "sepolia",
            Network::Local => "local",
        }
    }

    /// Chain id of the network.
    #[must_use]
    pub const fn chain_id(self) -> u64 {
        match self {
            Network::Sepolia => 421_614,
            Network::Local => 412_346,
        }
    }

    /// `StylusDeployer` factory that runs program constructors.
    #[must_use]
    pub const fn stylus_deployer(self) -> Address {
        match self {
            Network::Sepolia => ARBITRUM_STYLUS_DEPLOYER,
            Network::Local => DEVNET_STYLUS_DEPLOYER,
        }
    }

    /// Block-explorer API serving this network, if any.
    #[must_use]
    pub const fn explorer_api(self) -> Option<&'static str> {
        match self {
            Network::Sepolia => Some("https://api.etherscan.io/v2/api"),
            Network::Local => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Network::ALL
            .into_iter()
            .find(|network| network.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownNetwork(s.to_owned()))
    }
}

/// Everything needed to send transactions to one [`Network`].
#[derive(Clone, Debug)]
pub struct Endpoint {
    /// Target network.
    pub network: Network,
    /// RPC endpoint.
    pub rpc_url: Url,
    /// Key of the deploying account.
    pub private_key: Secret,
    /// Explorer API key, only known for live networks.
    pub explorer_api_key: Option<Secret>,
    /// Factory that runs program constructors.
    pub stylus_deployer: Address,
}

impl Endpoint {
    /// Endpoint of the live network described by `config`.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        Self {
            network: Network::Sepolia,
            rpc_url: config.rpc_url().clone(),
            private_key: config.private_key().clone(),
            explorer_api_key: Some(config.explorer_api_key().clone()),
            stylus_deployer: Network::Sepolia.stylus_deployer(),
        }
    }

    /// Endpoint of a Nitro dev node at `rpc_url`, deploying with the dev
    /// node's chain owner.
    #[must_use]
    pub fn local(rpc_url: Url) -> Self {
        Self {
            network: Network::Local,
            rpc_url,
            private_key: Secret::new(DEVNET_PRIVATE_KEY),
            explorer_api_key: None,
            stylus_deployer: Network::Local.stylus_deployer(),
        }
    }

    /// Resolves the endpoint of `network` from `lookup`.
    ///
    /// For a live network this builds the full [`Config`], so a missing
    /// credential is reported before any request can be made.
    ///
    /// # Errors
    ///
    /// * [`Error::MissingConfiguration`] - If a live network lacks a
    ///   credential.
    /// * [`Error::InvalidConfiguration`] - If a URL or address does not
    ///   parse.
    pub fn for_network<F>(network: Network, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut endpoint = match network {
            Network::Sepolia => Self::live(&Config::from_lookup(&lookup)?),
            Network::Local => {
                let rpc_url = lookup(LOCAL_RPC_URL_VAR)
                    .filter(|url| !url.trim().is_empty())
                    .unwrap_or_else(|| LOCAL_RPC_URL.to_owned());
                let rpc_url = rpc_url.parse::<Url>().map_err(|e| {
                    Error::InvalidConfiguration {
                        var: LOCAL_RPC_URL_VAR,
                        reason: format!("is not a valid URL: {e}"),
                    }
                })?;
                Self::local(rpc_url)
            }
        };

        if let Some(deployer) =
            lookup(STYLUS_DEPLOYER_VAR).filter(|v| !v.trim().is_empty())
        {
            let deployer = deployer.trim().parse::<Address>().map_err(|e| {
                Error::InvalidConfiguration {
                    var: STYLUS_DEPLOYER_VAR,
                    reason: format!("is not a valid address: {e}"),
                }
            })?;
            endpoint.stylus_deployer = deployer;
        }

        Ok(endpoint)
    }
}
