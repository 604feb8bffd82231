//! Kindlink platform program.
//!
//! Holds nothing but its owner for now: the account that deployed it.
#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

use alloy_primitives::Address;
use kindlink_stylus::access::ownable::{self, IOwnable, Ownable};
use stylus_sdk::prelude::*;

#[entrypoint]
#[storage]
struct Kindlink {
    ownable: Ownable,
}

#[public]
#[implements(IOwnable<Error = ownable::Error>)]
impl Kindlink {
    /// Makes the deploying account the owner.
    #[constructor]
    fn constructor(&mut self) -> Result<(), ownable::Error> {
        // The constructor runs inside the StylusDeployer factory, which is
        // the message sender here.
        let owner = self.vm().tx_origin();
        self.ownable.constructor(owner)
    }
}

#[public]
impl IOwnable for Kindlink {
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
    use kindlink_stylus::access::ownable::{
        Error, OwnableInvalidOwner, OwnableUnauthorizedAccount,
        OwnershipTransferred,
    };
    use motsu::prelude::*;

    use super::*;

    #[motsu::test]
    fn constructor_makes_deployer_the_owner(
        contract: Contract<Kindlink>,
        alice: Address,
    ) {
        contract.sender(alice).constructor().motsu_unwrap();

        assert_eq!(contract.sender(alice).owner(), alice);
        contract.assert_emitted(&OwnershipTransferred {
            previous_owner: Address::ZERO,
            new_owner: alice,
        });
    }

    #[motsu::test]
    fn transfers_ownership(
        contract: Contract<Kindlink>,
        alice: Address,
        bob: Address,
    ) {
        contract.sender(alice).constructor().motsu_unwrap();

        contract
            .sender(alice)
            .transfer_ownership(bob)
            .motsu_expect("should transfer ownership");

        assert_eq!(contract.sender(alice).owner(), bob);
        contract.assert_emitted(&OwnershipTransferred {
            previous_owner: alice,
            new_owner: bob,
        });
    }

    #[motsu::test]
    fn prevents_non_owners_from_transferring(
        contract: Contract<Kindlink>,
        alice: Address,
        bob: Address,
    ) {
        contract.sender(alice).constructor().motsu_unwrap();

        let err =
            contract.sender(bob).transfer_ownership(bob).motsu_unwrap_err();

        assert!(matches!(
            err,
            Error::UnauthorizedAccount(OwnableUnauthorizedAccount { account })
                if account == bob
        ));
        assert_eq!(contract.sender(alice).owner(), alice);
    }

    #[motsu::test]
    fn prevents_transfer_to_zero_address(
        contract: Contract<Kindlink>,
        alice: Address,
    ) {
        contract.sender(alice).constructor().motsu_unwrap();

        let err = contract
            .sender(alice)
            .transfer_ownership(Address::ZERO)
            .motsu_unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidOwner(OwnableInvalidOwner { owner })
                if owner.is_zero()
        ));
        assert_eq!(contract.sender(alice).owner(), alice);
    }

    #[motsu::test]
    fn loses_ownership_after_renouncement(
        contract: Contract<Kindlink>,
        alice: Address,
    ) {
        contract.sender(alice).constructor().motsu_unwrap();

        contract
            .sender(alice)
            .renounce_ownership()
            .motsu_expect("should renounce ownership");

        assert_eq!(contract.sender(alice).owner(), Address::ZERO);
        contract.assert_emitted(&OwnershipTransferred {
            previous_owner: alice,
            new_owner: Address::ZERO,
        });

        let err = contract
            .sender(alice)
            .transfer_ownership(alice)
            .motsu_unwrap_err();
        assert!(matches!(err, Error::UnauthorizedAccount(_)));
    }
}
