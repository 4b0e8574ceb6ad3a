//! Semantic actions attached to generated alternatives.
//!
//! Every rule assigns its result to `_retval`. Labelled sub-results are read
//! as `ctx.<label>._retval`, matched token text as `ctx.<label>.get_text()`.

use crate::error::Result;
use crate::naming;
use concept_grammar_model::grammar::RETURN_VALUE;
use concept_grammar_model::language::ComponentKind;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

fn retval() -> Ident {
    format_ident!("{}", RETURN_VALUE)
}

/// The value produced by the labelled rule.
pub(crate) fn value_of(label: &str) -> Result<TokenStream> {
    let label = naming::ident(label)?;
    let retval = retval();
    Ok(quote!(ctx.#label.#retval.clone()))
}

/// The text matched by the labelled token.
pub(crate) fn text_of(label: &str) -> Result<TokenStream> {
    let label = naming::ident(label)?;
    Ok(quote!(ctx.#label.get_text()))
}

/// Passes the labelled rule's value through unchanged.
pub(crate) fn forward(label: &str) -> Result<TokenStream> {
    let value = value_of(label)?;
    let retval = retval();
    Ok(quote!(#retval = #value;))
}

/// Constructs the concept and hands it to the reference registry.
pub(crate) fn construct(resolver: &syn::Path, ty: &syn::Path, args: &[TokenStream]) -> TokenStream {
    let retval = retval();
    quote!(#retval = #resolver(#ty::new(#(#args),*));)
}

/// Maps the element contexts of a list rule to their values.
pub(crate) fn collect(element_rule: &str, kind: ComponentKind) -> Result<TokenStream> {
    let accessor = naming::ident(&format!("{}_all", element_rule))?;
    let retval = retval();
    let collect = match kind {
        ComponentKind::Array => quote!(.collect::<Vec<_>>().into_boxed_slice()),
        ComponentKind::List => quote!(.collect::<Vec<_>>()),
        ComponentKind::Set => quote!(.collect::<::std::collections::HashSet<_>>()),
    };
    Ok(quote! {
        #retval = ctx.#accessor().iter().map(|elem| elem.#retval.clone())#collect;
    })
}

/// Runs the action belonging to whichever operator token matched.
pub(crate) fn dispatch(tokens: &[String], actions: &[TokenStream]) -> Result<TokenStream> {
    let op = naming::ident(naming::OPERATOR_LABEL)?;
    let arms = tokens
        .iter()
        .zip(actions)
        .map(|(token, action)| {
            let token = naming::ident(token)?;
            Ok(quote!(#token => { #action }))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(quote! {
        match ctx.#op.token_type() {
            #(#arms)*
            _ => unreachable!(),
        }
    })
}
