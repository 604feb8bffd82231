//! Runs deployment descriptors against a network.
use alloy::{
    primitives::{Address, TxHash},
    providers::ProviderBuilder,
    sol,
};
use eyre::Context;

use crate::{
    artifact::{Artifact, Artifacts},
    constructor::Constructor,
    deployer::Deployer,
    descriptor::DeploymentDescriptor,
    error::{Error, Result},
    journal::{Journal, JournalEntry},
    network::Endpoint,
};

sol! {
    #[sol(rpc)]
    interface IOwnable {
        function owner() external view returns (address owner);
    }
}

/// A program live on a network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeployedContract {
    /// Address of the program.
    pub address: Address,
    /// Owner reported by the program.
    pub owner: Address,
    /// Hash of the deployment transaction.
    pub tx_hash: TxHash,
}

/// Result of running one descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deployment {
    /// The descriptor was deployed by this run.
    Deployed(DeployedContract),
    /// The journal already held a deployment of the descriptor.
    Reused(DeployedContract),
}

impl Deployment {
    /// The deployed program, however it was obtained.
    #[must_use]
    pub fn contract(&self) -> &DeployedContract {
        match self {
            Deployment::Deployed(contract) | Deployment::Reused(contract) => {
                contract
            }
        }
    }
}

/// What [`Orchestrator::run`] is going to do with a descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Return the recorded deployment.
    Reuse(JournalEntry),
    /// Deploy `artifact` with `constructor`.
    Deploy {
        /// Program binary.
        artifact: Artifact,
        /// Checked constructor data.
        constructor: Constructor,
    },
}

/// Deploys descriptors to one [`Endpoint`], at most once each when a
/// journal is attached.
#[derive(Debug)]
pub struct Orchestrator {
    endpoint: Endpoint,
    artifacts: Artifacts,
    journal: Option<Journal>,
}

impl Orchestrator {
    /// Orchestrator deploying this workspace's programs to `endpoint`.
    #[must_use]
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint, artifacts: Artifacts::discover(), journal: None }
    }

    /// Look artifacts up in `artifacts`.
    #[must_use]
    pub fn with_artifacts(mut self, artifacts: Artifacts) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Skip descriptors recorded in `journal` and record new deployments
    /// in it.
    #[must_use]
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Endpoint deployments go to.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Decides what to do with `descriptor` without touching the network.
    ///
    /// The artifact and the constructor argument are checked even when the
    /// journal already holds a deployment.
    ///
    /// # Errors
    ///
    /// * [`crate::Error::ArtifactNotFound`] - If the program is not built.
    /// * [`crate::Error::ConstructorArgumentMismatch`] - If the argument
    ///   does not fit the program's constructor.
    /// * [`crate::Error::ArgumentsChanged`] - If the journal records the
    ///   descriptor deployed with other arguments.
    pub fn plan(&self, descriptor: &DeploymentDescriptor) -> Result<Step> {
        let contract = descriptor.contract();
        let artifact = self.artifacts.resolve(contract)?;
        let constructor = Constructor::for_contract(
            contract,
            descriptor.constructor_argument(),
        )?;

        let id = descriptor.id();
        let recorded =
            self.journal.as_ref().and_then(|journal| journal.get(&id));
        match recorded {
            Some(entry) if entry.constructor_args != constructor.args => {
                Err(Error::ArgumentsChanged {
                    id,
                    recorded: entry.constructor_args.clone(),
                    requested: constructor.args,
                })
            }
            Some(entry) => Ok(Step::Reuse(entry.clone())),
            None => Ok(Step::Deploy { artifact, constructor }),
        }
    }

    /// Deploys `descriptor` unless the journal already records it, then
    /// reads the owner back from the chain.
    ///
    /// A new deployment is journaled as soon as it lands, so a failed owner
    /// read does not lead to a second instance on the next run.
    ///
    /// # Errors
    ///
    /// May error if:
    ///
    /// - [`Orchestrator::plan`] rejects the descriptor.
    /// - The deployment fails, see [`Deployer::deploy_wasm`].
    /// - The owner cannot be read.
    /// - The journal cannot be written.
    pub async fn run(
        &mut self,
        descriptor: &DeploymentDescriptor,
    ) -> eyre::Result<Deployment> {
        let id = descriptor.id();
        let network = self.endpoint.network;

        let (artifact, constructor) = match self.plan(descriptor)? {
            Step::Reuse(entry) => {
                log::info!("{id} already deployed at {} on {network}", entry.address);
                let owner = self.read_owner(entry.address).await?;
                return Ok(Deployment::Reused(DeployedContract {
                    address: entry.address,
                    owner,
                    tx_hash: entry.tx_hash,
                }));
            }
            Step::Deploy { artifact, constructor } => (artifact, constructor),
        };

        log::info!("deploying {id} to {network}");
        let constructor_args = constructor.args.clone();
        let receipt = Deployer::new(
            self.endpoint.rpc_url.clone(),
            self.endpoint.private_key.clone(),
        )
        .with_constructor(constructor)
        .with_deployer_address(self.endpoint.stylus_deployer)
        .with_manifest_dir(&artifact.manifest_dir)
        .deploy_wasm(&artifact.wasm)
        .await
        .wrap_err_with(|| format!("failed to deploy {id}"))?;

        if let Some(journal) = &mut self.journal {
            journal.record(
                &id,
                JournalEntry {
                    address: receipt.contract_address,
                    tx_hash: receipt.tx_hash,
                    constructor_args,
                },
            )?;
        }

        let owner = self.read_owner(receipt.contract_address).await?;
        log::info!(
            "{id} deployed at {} (tx {}), owned by {owner}",
            receipt.contract_address,
            receipt.tx_hash
        );

        Ok(Deployment::Deployed(DeployedContract {
            address: receipt.contract_address,
            owner,
            tx_hash: receipt.tx_hash,
        }))
    }

    async fn read_owner(&self, address: Address) -> eyre::Result<Address> {
        let provider =
            ProviderBuilder::new().connect_http(self.endpoint.rpc_url.clone());
        IOwnable::new(address, &provider)
            .owner()
            .call()
            .await
            .wrap_err_with(|| format!("failed to read owner of {address}"))
    }
}
