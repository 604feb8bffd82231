/*!
# Kindlink Contracts for Stylus

Building blocks shared by the Kindlink programs deployed on
[Arbitrum Stylus](https://docs.arbitrum.io/stylus/stylus-gentle-introduction).

Programs embed [`access::ownable::Ownable`] in their storage and forward the
[`access::ownable::IOwnable`] interface to it:

```ignore
use kindlink_stylus::access::ownable::{self, IOwnable, Ownable};

#[entrypoint]
#[storage]
struct MyProgram {
    ownable: Ownable,
}

#[public]
#[implements(IOwnable<Error = ownable::Error>)]
impl MyProgram {
    #[constructor]
    fn constructor(&mut self) -> Result<(), ownable::Error> {
        let deployer = self.vm().tx_origin();
        self.ownable.constructor(deployer)
    }
}
```
*/

#![allow(clippy::pub_underscore_fields, clippy::module_name_repetitions)]
#![cfg_attr(not(test), no_std)]
#![deny(rustdoc::broken_intra_doc_links)]
extern crate alloc;

pub mod access;
