//! Access control for Kindlink programs.
pub mod ownable;

pub use ownable::{Error as OwnableError, IOwnable, Ownable};
