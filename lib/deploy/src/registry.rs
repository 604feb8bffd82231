//! The programs this workspace can deploy.
//!
//! Each [`ContractId`] maps, at compile time, to the crate that builds it and
//! to its constructor's parameter list. Names coming from the command line
//! are resolved to an id once; nothing downstream looks contracts up by
//! string.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    constructor::AbiType,
    error::{Error, Result},
};

/// A deployable program.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ContractId {
    /// `programs/kindlink`.
    Kindlink,
    /// `programs/foundation`.
    Foundation,
}

impl ContractId {
    /// Every deployable program.
    pub const ALL: [ContractId; 2] =
        [ContractId::Kindlink, ContractId::Foundation];

    /// Contract name as it appears in descriptors and journals.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ContractId::Kindlink => "Kindlink",
            ContractId::Foundation => "Foundation",
        }
    }

    /// Name of the crate that builds the program.
    #[must_use]
    pub const fn crate_name(self) -> &'static str {
        match self {
            ContractId::Kindlink => "kindlink",
            ContractId::Foundation => "foundation",
        }
    }

    /// Manifest directory of the program, relative to the workspace root.
    #[must_use]
    pub const fn manifest_dir(self) -> &'static str {
        match self {
            ContractId::Kindlink => "programs/kindlink",
            ContractId::Foundation => "programs/foundation",
        }
    }

    /// Parameter types of the program's constructor, in order.
    #[must_use]
    pub const fn constructor_params(self) -> &'static [AbiType] {
        match self {
            ContractId::Kindlink => &[],
            ContractId::Foundation => &[AbiType::String],
        }
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContractId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ContractId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownContract(s.to_owned()))
    }
}
