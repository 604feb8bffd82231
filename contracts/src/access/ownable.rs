//! Single-owner access control.
//!
//! The owner is recorded once, while the embedding program runs its
//! constructor, and can later be handed over with
//! [`Ownable::transfer_ownership`] or dropped with
//! [`Ownable::renounce_ownership`]. Deployment tooling reads it back through
//! [`IOwnable::owner`] to confirm which account created an instance.
use alloc::{vec, vec::Vec};

use alloy_primitives::Address;
pub use sol::*;
use stylus_sdk::{
    call::MethodError, evm, prelude::*, storage::StorageAddress,
};

mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when ownership gets transferred between accounts.
        ///
        /// * `previous_owner` - Address of the previous owner.
        /// * `new_owner` - Address of the new owner.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event OwnershipTransferred(address indexed previous_owner, address indexed new_owner);
    }

    sol! {
        /// The caller account is not authorized to perform an operation.
        ///
        /// * `account` - Account that was found to not be authorized.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error OwnableUnauthorizedAccount(address account);
        /// The owner is not a valid owner account (e.g. [`Address::ZERO`]).
        ///
        /// * `owner` - Account that's not allowed to become the owner.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error OwnableInvalidOwner(address owner);
    }
}

/// An error that occurred in an [`Ownable`] operation.
#[derive(SolidityError, Debug)]
pub enum Error {
    /// The caller account is not authorized to perform an operation.
    UnauthorizedAccount(OwnableUnauthorizedAccount),
    /// The owner is not a valid owner account (e.g. [`Address::ZERO`]).
    InvalidOwner(OwnableInvalidOwner),
}

impl MethodError for Error {
    fn encode(self) -> Vec<u8> {
        self.into()
    }
}

/// State of an [`Ownable`] component.
#[storage]
pub struct Ownable {
    /// The current owner.
    pub(crate) owner: StorageAddress,
}

/// Public interface every Kindlink program exposes for its owner.
pub trait IOwnable {
    /// The error type associated to the trait implementation.
    type Error: Into<Vec<u8>>;

    /// Returns the address of the current owner.
    #[must_use]
    fn owner(&self) -> Address;

    /// Transfers ownership to `new_owner`. Can only be called by the current
    /// owner.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If not called by the owner.
    /// * [`Error::InvalidOwner`] - If `new_owner` is [`Address::ZERO`].
    fn transfer_ownership(
        &mut self,
        new_owner: Address,
    ) -> Result<(), Self::Error>;

    /// Leaves the program without an owner. Can only be called by the
    /// current owner.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If not called by the owner.
    fn renounce_ownership(&mut self) -> Result<(), Self::Error>;
}

impl Ownable {
    /// Records `initial_owner` as the first owner.
    ///
    /// Must only be called from the embedding program's constructor.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidOwner`] - If `initial_owner` is [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`OwnershipTransferred`].
    pub fn constructor(&mut self, initial_owner: Address) -> Result<(), Error> {
        if initial_owner.is_zero() {
            return Err(Error::InvalidOwner(OwnableInvalidOwner {
                owner: Address::ZERO,
            }));
        }
        self._transfer_ownership(initial_owner);
        Ok(())
    }

    /// Returns the address of the current owner.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner.get()
    }

    /// See [`IOwnable::transfer_ownership`].
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If not called by the owner.
    /// * [`Error::InvalidOwner`] - If `new_owner` is [`Address::ZERO`].
    pub fn transfer_ownership(
        &mut self,
        new_owner: Address,
    ) -> Result<(), Error> {
        self.only_owner()?;

        if new_owner.is_zero() {
            return Err(Error::InvalidOwner(OwnableInvalidOwner {
                owner: Address::ZERO,
            }));
        }

        self._transfer_ownership(new_owner);

        Ok(())
    }

    /// See [`IOwnable::renounce_ownership`].
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If not called by the owner.
    pub fn renounce_ownership(&mut self) -> Result<(), Error> {
        self.only_owner()?;
        self._transfer_ownership(Address::ZERO);
        Ok(())
    }

    /// Checks that the message sender is the owner.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If called by any account other than
    ///   the owner.
    pub fn only_owner(&self) -> Result<(), Error> {
        let account = self.vm().msg_sender();
        if self.owner() != account {
            return Err(Error::UnauthorizedAccount(
                OwnableUnauthorizedAccount { account },
            ));
        }

        Ok(())
    }

    /// Sets the owner without access restriction.
    ///
    /// # Events
    ///
    /// * [`OwnershipTransferred`].
    pub fn _transfer_ownership(&mut self, new_owner: Address) {
        let previous_owner = self.owner.get();
        self.owner.set(new_owner);
        evm::log(self.vm(), OwnershipTransferred { previous_owner, new_owner });
    }
}
