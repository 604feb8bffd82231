/*!
Deployment tooling for the Kindlink Stylus programs.

A deployment starts from a [`DeploymentDescriptor`], built with
[`build_deployment_plan`] or one of the module builders, and an [`Endpoint`]
resolved once from the environment. The [`Orchestrator`] checks both before
any transaction is sent:

```rust,no_run
use kindlink_deploy::{
    arguments::foundation_argument, foundation_module, Endpoint, Journal,
    Network, Orchestrator,
};

# async fn deploy() -> eyre::Result<()> {
let endpoint =
    Endpoint::for_network(Network::Local, |var| std::env::var(var).ok())?;
let journal = Journal::open(std::path::Path::new("."), Network::Local)?;

let deployment = Orchestrator::new(endpoint)
    .with_journal(journal)
    .run(&foundation_module(foundation_argument()))
    .await?;
println!("Foundation lives at {}", deployment.contract().address);
# Ok(())
# }
```
*/

pub mod arguments;
pub mod artifact;
pub mod config;
pub mod constructor;
pub mod deployer;
pub mod descriptor;
pub mod error;
pub mod journal;
pub mod network;
pub mod orchestrator;
pub mod registry;
pub mod verify;

pub use artifact::{Artifact, Artifacts};
pub use config::{Config, Secret};
pub use constructor::{AbiType, AbiValue, Constructor, ConstructorArgument};
pub use deployer::{ConstructorReverted, Deployer, DeploymentReceipt};
pub use descriptor::{
    build_deployment_plan, foundation_module, kindlink_module,
    DeploymentDescriptor,
};
pub use error::{Error, Result};
pub use journal::{Journal, JournalEntry};
pub use network::{Endpoint, Network};
pub use orchestrator::{DeployedContract, Deployment, Orchestrator};
pub use registry::ContractId;
pub use verify::Verifier;
