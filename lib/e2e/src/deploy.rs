use alloy::primitives::Address;
use kindlink_deploy::Constructor;

use crate::{project::Crate, Account};

/// Deploys and activates the program built by the crate under test, on
/// behalf of `account`, running `constructor` through the `StylusDeployer`.
///
/// Every call deploys a fresh instance; nothing is journaled.
///
/// # Errors
///
/// May error if:
///
/// - The crate's wasm binary cannot be found.
/// - `cargo stylus deploy` fails. A reverting constructor is reported as
///   [`kindlink_deploy::ConstructorReverted`].
pub async fn deploy(
    account: &Account,
    constructor: Constructor,
) -> eyre::Result<Address> {
    let pkg = Crate::new()?;
    let receipt = account
        .as_deployer()?
        .with_constructor(constructor)
        .with_manifest_dir(pkg.manifest_dir)
        .deploy_wasm(&pkg.wasm)
        .await?;

    Ok(receipt.contract_address)
}
