//! Constructor arguments and their ABI shape.
use std::fmt;

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    registry::ContractId,
};

/// Solidity ABI types a program constructor may declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AbiType {
    /// `address`.
    Address,
    /// `uint256`.
    Uint256,
    /// `bool`.
    Bool,
    /// `string`.
    String,
    /// `bytes`.
    Bytes,
}

impl AbiType {
    /// Canonical Solidity spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AbiType::Address => "address",
            AbiType::Uint256 => "uint256",
            AbiType::Bool => "bool",
            AbiType::String => "string",
            AbiType::Bytes => "bytes",
        }
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One typed constructor parameter value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AbiValue {
    /// An `address`.
    Address(Address),
    /// A `uint256`.
    Uint256(U256),
    /// A `bool`.
    Bool(bool),
    /// A `string`.
    String(String),
    /// A `bytes`.
    Bytes(Bytes),
}

impl AbiValue {
    /// The ABI type of this value.
    #[must_use]
    pub const fn abi_type(&self) -> AbiType {
        match self {
            AbiValue::Address(_) => AbiType::Address,
            AbiValue::Uint256(_) => AbiType::Uint256,
            AbiValue::Bool(_) => AbiType::Bool,
            AbiValue::String(_) => AbiType::String,
            AbiValue::Bytes(_) => AbiType::Bytes,
        }
    }

    /// Renders the value the way `cargo stylus deploy --constructor-args`
    /// expects it.
    #[must_use]
    pub fn to_arg_string(&self) -> String {
        match self {
            AbiValue::Address(address) => address.to_checksum(None),
            AbiValue::Uint256(value) => value.to_string(),
            AbiValue::Bool(value) => value.to_string(),
            AbiValue::String(value) => value.clone(),
            AbiValue::Bytes(value) => value.to_string(),
        }
    }
}

/// The full list of values handed to a constructor.
///
/// Its contents are opaque to descriptors; only [`Constructor::for_contract`]
/// compares them with what the program declares.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstructorArgument(Vec<AbiValue>);

impl ConstructorArgument {
    /// An argument list with exactly one value.
    #[must_use]
    pub fn single(value: AbiValue) -> Self {
        Self(vec![value])
    }

    /// The values, in constructor parameter order.
    #[must_use]
    pub fn values(&self) -> &[AbiValue] {
        &self.0
    }

    /// Parenthesised type list, e.g. `(string,uint256)`.
    #[must_use]
    pub fn shape(&self) -> String {
        shape(self.0.iter().map(AbiValue::abi_type))
    }
}

fn shape(types: impl Iterator<Item = AbiType>) -> String {
    let types: Vec<_> = types.map(AbiType::as_str).collect();
    format!("({})", types.join(","))
}

/// Constructor data passed to the deployer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constructor {
    /// Constructor signature, e.g. `constructor(string)`.
    pub signature: String,
    /// Constructor arguments, rendered for the command line.
    pub args: Vec<String>,
}

impl Constructor {
    /// Constructor data for a program whose constructor takes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self { signature: "constructor()".to_owned(), args: vec![] }
    }

    /// Checks `argument` against the constructor `contract` declares and
    /// renders it.
    ///
    /// An absent argument is the same as an empty one.
    ///
    /// # Errors
    ///
    /// * [`Error::ConstructorArgumentMismatch`] - If the number or the types
    ///   of the values differ from the declared parameters.
    pub fn for_contract(
        contract: ContractId,
        argument: Option<&ConstructorArgument>,
    ) -> Result<Self> {
        let params = contract.constructor_params();
        let values = argument.map(ConstructorArgument::values).unwrap_or(&[]);

        let matches = params.len() == values.len()
            && params.iter().zip(values).all(|(ty, v)| *ty == v.abi_type());
        if !matches {
            return Err(Error::ConstructorArgumentMismatch {
                contract,
                expected: shape(params.iter().copied()),
                found: shape(values.iter().map(AbiValue::abi_type)),
            });
        }

        Ok(Self {
            signature: format!("constructor{}", shape(params.iter().copied())),
            args: values.iter().map(AbiValue::to_arg_string).collect(),
        })
    }
}
