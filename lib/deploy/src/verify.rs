//! Source verification of deployed programs.
use std::path::Path;

use alloy::primitives::{Address, TxHash};
use eyre::{bail, Context, ContextCompat};
use regex::Regex;
use serde::Deserialize;
use tokio::process::Command;

use crate::network::Endpoint;

/// Verifies deployments through `cargo stylus verify` and checks that the
/// block explorer knows about them.
#[derive(Clone, Debug)]
pub struct Verifier {
    endpoint: Endpoint,
    client: reqwest::Client,
}

/// Response envelope of the Etherscan API.
#[derive(Debug, Deserialize)]
struct ExplorerResponse<T> {
    status: String,
    message: String,
    result: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContractCreation {
    contract_address: Address,
    tx_hash: TxHash,
}

impl Verifier {
    /// Verifier for deployments made through `endpoint`.
    #[must_use]
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint, client: reqwest::Client::new() }
    }

    /// Runs `cargo stylus verify` for the deployment `tx_hash` of the program
    /// whose manifest lives in `manifest_dir`.
    ///
    /// # Errors
    ///
    /// May fail if `cargo stylus` cannot be run or does not report a
    /// successful verification.
    pub async fn verify_source(
        &self,
        manifest_dir: &Path,
        tx_hash: TxHash,
    ) -> eyre::Result<()> {
        let output = Command::new("cargo")
            .args(["stylus", "verify", "--no-verify", "-e"])
            .arg(self.endpoint.rpc_url.as_str())
            .arg("--deployment-tx")
            .arg(tx_hash.to_string())
            .current_dir(manifest_dir)
            .output()
            .await
            .context("failed to execute `cargo stylus verify` command")?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if output.status.success() && is_verified(&stdout)? {
            log::info!("source of deployment {tx_hash} verified");
            Ok(())
        } else {
            bail!(
                "verification of {tx_hash} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )
        }
    }

    /// Asks the block explorer which transaction created `address`.
    ///
    /// Returns `None` when the network has no explorer.
    ///
    /// # Errors
    ///
    /// May fail if the request fails or the explorer does not know the
    /// contract yet.
    pub async fn explorer_creation_tx(
        &self,
        address: Address,
    ) -> eyre::Result<Option<TxHash>> {
        let network = self.endpoint.network;
        let (Some(api), Some(key)) =
            (network.explorer_api(), &self.endpoint.explorer_api_key)
        else {
            log::debug!("{network} has no block explorer, skipping lookup");
            return Ok(None);
        };

        let response: ExplorerResponse<serde_json::Value> = self
            .client
            .get(api)
            .query(&[
                ("chainid", network.chain_id().to_string()),
                ("module", "contract".to_owned()),
                ("action", "getcontractcreation".to_owned()),
                ("contractaddresses", address.to_string()),
                ("apikey", key.expose().to_owned()),
            ])
            .send()
            .await
            .context("failed to reach block explorer")?
            .error_for_status()?
            .json()
            .await
            .context("unexpected block explorer response")?;

        parse_creation(address, response).map(Some)
    }

    /// Verifies the source of `tx_hash` and checks the explorer indexed
    /// `address`.
    ///
    /// # Errors
    ///
    /// See [`Verifier::verify_source`] and
    /// [`Verifier::explorer_creation_tx`].
    pub async fn verify(
        &self,
        manifest_dir: &Path,
        address: Address,
        tx_hash: TxHash,
    ) -> eyre::Result<()> {
        self.verify_source(manifest_dir, tx_hash).await?;
        if let Some(indexed) = self.explorer_creation_tx(address).await? {
            if indexed != tx_hash {
                bail!(
                    "explorer attributes {address} to {indexed}, expected {tx_hash}"
                );
            }
            log::info!("{address} is indexed by the block explorer");
        }
        Ok(())
    }
}

fn is_verified(stdout: &str) -> eyre::Result<bool> {
    let re = Regex::new(r"(?i)verification successful")
        .context("failed to create verification regex")?;
    Ok(re.is_match(stdout))
}

fn parse_creation(
    address: Address,
    response: ExplorerResponse<serde_json::Value>,
) -> eyre::Result<TxHash> {
    if response.status != "1" {
        bail!(
            "block explorer does not know {address}: {} ({})",
            response.message,
            response.result
        );
    }

    let creations: Vec<ContractCreation> =
        serde_json::from_value(response.result)
            .context("unexpected contract creation payload")?;
    creations
        .into_iter()
        .find(|creation| creation.contract_address == address)
        .map(|creation| creation.tx_hash)
        .context(format!("block explorer returned no creation of {address}"))
}
