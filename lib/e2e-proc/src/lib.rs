//! Procedural macros for the `e2e` crate.
use proc_macro::TokenStream;

mod test;

/// Defines an end-to-end test whose arguments are created before the body
/// runs, each with `<Type>::new().await?`.
///
/// # Examples
///
/// ```rust,ignore
/// #[e2e::test]
/// async fn transfers_ownership(alice: Account, bob: Account) -> Result<()> {
///     let address = e2e::deploy(&alice, Constructor::empty()).await?;
///     let contract = Kindlink::new(address, &alice.wallet);
///
///     receipt!(contract.transferOwnership(bob.address()))?;
///
///     assert_eq!(contract.owner().call().await?, bob.address());
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn test(attr: TokenStream, input: TokenStream) -> TokenStream {
    test::test(&attr, input)
}
