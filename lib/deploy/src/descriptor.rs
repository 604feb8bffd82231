//! Deployment descriptors: which program to deploy and with what argument.
//!
//! Descriptors are plain values. Building one registers nothing; handing it
//! to [`crate::orchestrator::Orchestrator::run`] is what deploys it.
use crate::{
    arguments::Arguments,
    constructor::ConstructorArgument,
    error::{Error, Result},
    registry::ContractId,
};

/// A recipe for one deployable unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentDescriptor {
    module_name: String,
    contract: ContractId,
    constructor_argument: Option<ConstructorArgument>,
}

impl DeploymentDescriptor {
    /// Name of the deployment module, e.g. `KindlinkModule`.
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Program to deploy.
    #[must_use]
    pub fn contract(&self) -> ContractId {
        self.contract
    }

    /// Value handed to the constructor, if any.
    #[must_use]
    pub fn constructor_argument(&self) -> Option<&ConstructorArgument> {
        self.constructor_argument.as_ref()
    }

    /// Identity under which the deployment is journaled,
    /// `<module>#<contract>`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}#{}", self.module_name, self.contract)
    }
}

/// Builds the descriptor of `contract`, named `<Contract>Module`.
#[must_use]
pub fn build_deployment_plan(
    contract: ContractId,
    argument: Option<ConstructorArgument>,
) -> DeploymentDescriptor {
    DeploymentDescriptor {
        module_name: format!("{contract}Module"),
        contract,
        constructor_argument: argument,
    }
}

/// `KindlinkModule`: Kindlink, deployed without arguments.
#[must_use]
pub fn kindlink_module() -> DeploymentDescriptor {
    build_deployment_plan(ContractId::Kindlink, None)
}

/// `FoundationModule`: Foundation, deployed with `argument`.
#[must_use]
pub fn foundation_module(argument: ConstructorArgument) -> DeploymentDescriptor {
    build_deployment_plan(ContractId::Foundation, Some(argument))
}

/// Every module, with arguments taken from `arguments`.
#[must_use]
pub fn all_modules(arguments: &Arguments) -> Vec<DeploymentDescriptor> {
    ContractId::ALL
        .into_iter()
        .map(|contract| module_for(contract, arguments))
        .collect()
}

/// Finds a module by its name (`FoundationModule`) or by the name of the
/// program it deploys (`foundation`).
///
/// # Errors
///
/// * [`Error::UnknownModule`] - If no module answers to `name`.
pub fn module_by_name(
    name: &str,
    arguments: &Arguments,
) -> Result<DeploymentDescriptor> {
    let name = name.trim();
    let stripped = name.strip_suffix("Module").unwrap_or(name);
    stripped
        .parse::<ContractId>()
        .map(|contract| module_for(contract, arguments))
        .map_err(|_| Error::UnknownModule(name.to_owned()))
}

fn module_for(
    contract: ContractId,
    arguments: &Arguments,
) -> DeploymentDescriptor {
    match contract {
        ContractId::Kindlink => {
            build_deployment_plan(contract, arguments.kindlink())
        }
        ContractId::Foundation => foundation_module(arguments.foundation()),
    }
}
