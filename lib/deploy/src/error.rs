//! Domain errors of the deployment tooling.
use std::path::PathBuf;

use crate::registry::ContractId;

/// Failures that abort a deployment run before or while it is submitted.
///
/// Process and RPC plumbing reports through [`eyre::Report`]; these variants
/// can be recovered from a report with [`eyre::Report::downcast_ref`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required environment variable is unset or empty.
    #[error("missing configuration: `{var}` is not set")]
    MissingConfiguration {
        /// Name of the environment variable.
        var: &'static str,
    },
    /// An environment variable is set but cannot be used.
    #[error("invalid configuration: `{var}` {reason}")]
    InvalidConfiguration {
        /// Name of the environment variable.
        var: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// The compiled wasm of a contract is not where the build puts it.
    #[error("artifact for `{contract}` not found at {}", path.display())]
    ArtifactNotFound {
        /// Contract whose artifact is missing.
        contract: ContractId,
        /// Expected location of the artifact.
        path: PathBuf,
    },
    /// The constructor argument does not fit the constructor signature.
    #[error(
        "constructor argument mismatch for `{contract}`: expected {expected}, found {found}"
    )]
    ConstructorArgumentMismatch {
        /// Contract being deployed.
        contract: ContractId,
        /// Parameter list the constructor declares, e.g. `(string)`.
        expected: String,
        /// Parameter list of the supplied argument, e.g. `(uint256)`.
        found: String,
    },
    /// A contract name that no program in the workspace answers to.
    #[error("unknown contract `{0}`")]
    UnknownContract(String),
    /// A deployment module name that no descriptor answers to.
    #[error("unknown deployment module `{0}`")]
    UnknownModule(String),
    /// A network name other than the supported ones.
    #[error("unknown network `{0}`")]
    UnknownNetwork(String),
    /// `cargo stylus` ran but the deployment did not go through.
    #[error("deployment failed: {0}")]
    Deployment(String),
    /// The journal records `id` deployed with other constructor arguments
    /// than the ones requested now.
    #[error(
        "`{id}` was deployed with arguments {recorded:?}, refusing to reuse it for {requested:?}"
    )]
    ArgumentsChanged {
        /// Descriptor id, e.g. `FoundationModule#Foundation`.
        id: String,
        /// Rendered arguments of the recorded deployment.
        recorded: Vec<String>,
        /// Rendered arguments of the current descriptor.
        requested: Vec<String>,
    },
    /// The deployment journal cannot be read or written.
    #[error("journal at {} is unusable: {reason}", path.display())]
    Journal {
        /// Location of the journal file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
