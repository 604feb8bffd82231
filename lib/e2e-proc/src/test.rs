use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, FnArg, ItemFn};

pub(crate) fn test(_attr: &TokenStream, input: TokenStream) -> TokenStream {
    let item_fn = parse_macro_input!(input as ItemFn);
    let attrs = &item_fn.attrs;
    let sig = &item_fn.sig;
    let fn_name = &sig.ident;
    let fn_return_type = &sig.output;
    let fn_block = &item_fn.block;

    if sig.asyncness.is_none() {
        return syn::Error::new(sig.fn_token.span(), "e2e tests must be async")
            .to_compile_error()
            .into();
    }

    let mut declarations = Vec::with_capacity(sig.inputs.len());
    for arg in &sig.inputs {
        let FnArg::Typed(arg) = arg else {
            return syn::Error::new(
                arg.span(),
                "unexpected receiver argument in test signature",
            )
            .to_compile_error()
            .into();
        };
        let binding = &arg.pat;
        let ty = &arg.ty;
        declarations.push(quote! {
            let #binding = <#ty>::new().await?;
        });
    }

    let expanded = quote! {
        #( #attrs )*
        #[tokio::test]
        async fn #fn_name() #fn_return_type {
            #( #declarations )*
            #fn_block
        }
    };

    expanded.into()
}
