//! End-to-end testing against a Nitro dev node.
//!
//! Every argument of an `#[e2e::test]` function is created with
//! `<Type>::new().await?`, which for [`Account`] means a fresh, funded key:
//!
//! ```rust,ignore
//! #[e2e::test]
//! async fn sets_the_right_owner(alice: Account) -> eyre::Result<()> {
//!     let address = e2e::deploy(&alice, Constructor::empty()).await?;
//!     let contract = Kindlink::new(address, &alice.wallet);
//!
//!     assert_eq!(contract.owner().call().await?, alice.address());
//!     Ok(())
//! }
//! ```
mod account;
mod deploy;
mod error;
mod event;
mod project;
mod receipt;

pub use account::Account;
pub use deploy::deploy;
pub use e2e_proc::test;
pub use error::Revert;
pub use event::EventExt;
#[doc(hidden)]
pub use eyre;
