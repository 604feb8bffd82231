//! Deployment configuration sourced from the process environment.
//!
//! A [`Config`] is built once at process start and handed by reference to
//! everything that talks to a live network. Nothing below this module reads
//! the environment on its own.
use std::fmt;

use alloy::{
    signers::local::PrivateKeySigner, transports::http::reqwest::Url,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// Signing key of the deploying account.
pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";
/// RPC endpoint of the live network.
pub const RPC_URL_VAR: &str = "ALCHEMY_SEPOLIA_URL";
/// Block-explorer API key used for source verification.
pub const EXPLORER_API_KEY_VAR: &str = "ETHERSCAN_API_KEY";

/// A string that never shows up in `Debug` output and is wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Secret(String);

impl Secret {
    /// Wraps `value`.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the wrapped value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Credentials and endpoints for deploying to the live network.
#[derive(Clone, Debug)]
pub struct Config {
    private_key: Secret,
    rpc_url: Url,
    explorer_api_key: Secret,
}

impl Config {
    /// Loads `.env` if there is one, then reads [`PRIVATE_KEY_VAR`],
    /// [`RPC_URL_VAR`] and [`EXPLORER_API_KEY_VAR`] from the environment.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// * [`Error::MissingConfiguration`] - If a variable is unset or empty.
    ///   Variables are checked in the order private key, RPC URL, explorer
    ///   key and the first missing one is reported.
    /// * [`Error::InvalidConfiguration`] - If the private key is not a
    ///   32-byte hex string or the RPC URL does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
                .ok_or(Error::MissingConfiguration { var })
        };

        let private_key = required(PRIVATE_KEY_VAR)?;
        let rpc_url = required(RPC_URL_VAR)?;
        let explorer_api_key = required(EXPLORER_API_KEY_VAR)?;

        private_key.parse::<PrivateKeySigner>().map_err(|e| {
            Error::InvalidConfiguration {
                var: PRIVATE_KEY_VAR,
                reason: format!("is not a valid private key: {e}"),
            }
        })?;
        let rpc_url =
            rpc_url.parse::<Url>().map_err(|e| Error::InvalidConfiguration {
                var: RPC_URL_VAR,
                reason: format!("is not a valid URL: {e}"),
            })?;

        Ok(Self {
            private_key: Secret(private_key),
            rpc_url,
            explorer_api_key: Secret(explorer_api_key),
        })
    }

    /// The deploying account's private key.
    #[must_use]
    pub fn private_key(&self) -> &Secret {
        &self.private_key
    }

    /// The live network's RPC endpoint.
    #[must_use]
    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    /// The block explorer's API key.
    #[must_use]
    pub fn explorer_api_key(&self) -> &Secret {
        &self.explorer_api_key
    }
}
