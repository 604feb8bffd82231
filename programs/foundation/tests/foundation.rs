#![cfg(feature = "e2e")]

use abi::Foundation;
use alloy::primitives::Address;
use e2e::{receipt, Account, EventExt, Revert};
use eyre::Result;
use kindlink_deploy::{
    arguments::{foundation_argument, FOUNDATION_NAME},
    foundation_module, AbiValue, Constructor, ConstructorArgument,
};

mod abi;

async fn deploy(
    account: &Account,
    argument: ConstructorArgument,
) -> Result<Address> {
    let descriptor = foundation_module(argument);
    let constructor = Constructor::for_contract(
        descriptor.contract(),
        descriptor.constructor_argument(),
    )?;
    e2e::deploy(account, constructor).await
}

// ============================================================================
// Integration Tests: Foundation
// ============================================================================

#[e2e::test]
async fn sets_the_right_owner(alice: Account) -> Result<()> {
    let contract_addr = deploy(&alice, foundation_argument()).await?;
    let contract = Foundation::new(contract_addr, &alice.wallet);

    let owner = contract.owner().call().await?;
    assert_eq!(owner, alice.address());

    Ok(())
}

#[e2e::test]
async fn stores_constructor_argument(alice: Account) -> Result<()> {
    let contract_addr = deploy(&alice, foundation_argument()).await?;
    let contract = Foundation::new(contract_addr, &alice.wallet);

    let name = contract.name().call().await?;
    assert_eq!(name, FOUNDATION_NAME);

    Ok(())
}

#[e2e::test]
async fn independent_deployments_get_distinct_addresses(
    alice: Account,
) -> Result<()> {
    let first = deploy(&alice, foundation_argument()).await?;
    let second = deploy(&alice, foundation_argument()).await?;

    assert!(!first.is_zero());
    assert!(!second.is_zero());
    assert_ne!(first, second);

    Ok(())
}

#[e2e::test]
async fn rejects_empty_name(alice: Account) -> Result<()> {
    let argument = ConstructorArgument::single(AbiValue::String(String::new()));

    let err = deploy(&alice, argument)
        .await
        .expect_err("should not deploy due to `FoundationEmptyName`");

    assert!(err.reverted_with(Foundation::FoundationEmptyName {}));

    Ok(())
}

#[e2e::test]
async fn transfers_ownership(alice: Account, bob: Account) -> Result<()> {
    let alice_addr = alice.address();
    let bob_addr = bob.address();

    let contract_addr = deploy(&alice, foundation_argument()).await?;
    let contract = Foundation::new(contract_addr, &alice.wallet);

    let receipt = receipt!(contract.transferOwnership(bob_addr))?;
    assert!(receipt.emits(Foundation::OwnershipTransferred {
        previousOwner: alice_addr,
        newOwner: bob_addr,
    }));

    let owner = contract.owner().call().await?;
    assert_eq!(owner, bob_addr);

    Ok(())
}
