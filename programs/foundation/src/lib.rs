//! Kindlink Foundation program.
//!
//! Owned by the account that deployed it and named at construction.
#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

use alloc::{string::String, vec, vec::Vec};

use alloy_primitives::Address;
use kindlink_stylus::access::ownable::{self, IOwnable, Ownable};
use stylus_sdk::{prelude::*, storage::StorageString};

mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// The Foundation was given an empty name.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error FoundationEmptyName();
    }
}

pub use sol::*;

/// An error that occurred while constructing the Foundation.
#[derive(SolidityError, Debug)]
pub enum Error {
    /// The Foundation was given an empty name.
    EmptyName(FoundationEmptyName),
    /// Error from the [`Ownable`] component.
    Ownable(ownable::Error),
}

#[entrypoint]
#[storage]
struct Foundation {
    ownable: Ownable,
    name: StorageString,
}

#[public]
#[implements(IOwnable<Error = ownable::Error>)]
impl Foundation {
    /// Names the Foundation and makes the deploying account its owner.
    #[constructor]
    fn constructor(&mut self, name: String) -> Result<(), Error> {
        if name.is_empty() {
            return Err(Error::EmptyName(FoundationEmptyName {}));
        }

        let owner = self.vm().tx_origin();
        self.ownable.constructor(owner)?;
        self.name.set_str(name);
        Ok(())
    }

    /// Name given at construction.
    fn name(&self) -> String {
        self.name.get_string()
    }
}

#[public]
impl IOwnable for Foundation {
    type Error = ownable::Error;

    fn owner(&self) -> Address {
        self.ownable.owner()
    }

    fn transfer_ownership(
        &mut self,
        new_owner: Address,
    ) -> Result<(), Self::Error> {
        self.ownable.transfer_ownership(new_owner)
    }

    fn renounce_ownership(&mut self) -> Result<(), Self::Error> {
        self.ownable.renounce_ownership()
    }
}

#[cfg(test)]
mod tests {
    use kindlink_stylus::access::ownable::OwnershipTransferred;
    use motsu::prelude::*;

    use super::*;

    const NAME: &str = "Kindlink Foundation";

    #[motsu::test]
    fn constructs_with_name_and_owner(
        contract: Contract<Foundation>,
        alice: Address,
    ) {
        contract.sender(alice).constructor(NAME.into()).motsu_unwrap();

        assert_eq!(contract.sender(alice).name(), NAME);
        assert_eq!(contract.sender(alice).owner(), alice);
        contract.assert_emitted(&OwnershipTransferred {
            previous_owner: Address::ZERO,
            new_owner: alice,
        });
    }

    #[motsu::test]
    fn rejects_empty_name(contract: Contract<Foundation>, alice: Address) {
        let err = contract
            .sender(alice)
            .constructor(String::new())
            .motsu_expect_err("should reject an empty name");

        assert!(matches!(err, Error::EmptyName(_)));
        assert_eq!(contract.sender(alice).owner(), Address::ZERO);
    }

    #[motsu::test]
    fn only_owner_transfers_foundation(
        contract: Contract<Foundation>,
        alice: Address,
        bob: Address,
    ) {
        contract.sender(alice).constructor(NAME.into()).motsu_unwrap();

        let err =
            contract.sender(bob).transfer_ownership(bob).motsu_unwrap_err();
        assert!(matches!(err, ownable::Error::UnauthorizedAccount(_)));

        contract
            .sender(alice)
            .transfer_ownership(bob)
            .motsu_expect("should transfer ownership");
        assert_eq!(contract.sender(bob).owner(), bob);
        assert_eq!(contract.sender(bob).name(), NAME);
    }
}
