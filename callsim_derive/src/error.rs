//! Derive macro for error enums.
//!
//! Generates `std::fmt::Display` and `std::error::Error` implementations from
//! `#[error("...")]` attributes, so the main crate does not need `thiserror`.
//!
//! # Usage
//!
//! ```ignore
//! use callsim_derive::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum CallError {
//!     #[error("no contract deployed at {0}")]
//!     InvalidTarget(String),
//!
//!     #[error("arithmetic overflow: {a} + {b}")]
//!     ArithmeticOverflow { a: i64, b: i64 },
//!
//!     #[error("context construction failed")]
//!     ContextConstructionFailure,
//! }
//! ```
//!
//! Tuple fields interpolate positionally (`{0}`, `{1}`); named fields by name.
//! Only enums are supported.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Meta};

/// Derives `Display` and `Error` for an error enum.
pub fn derive_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let data_enum = match &input.data {
        Data::Enum(data_enum) => data_enum,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Error derive only supports enums",
            ))
        }
    };

    let display_arms = data_enum
        .variants
        .iter()
        .map(|variant| {
            let variant_name = &variant.ident;
            let message = error_message(variant)?;

            let arm = match &variant.fields {
                Fields::Unit => quote! {
                    Self::#variant_name => write!(f, #message),
                },
                Fields::Unnamed(fields) => {
                    let bindings: Vec<_> = (0..fields.unnamed.len())
                        .map(|i| quote::format_ident!("f{}", i))
                        .collect();
                    let format_str = positional_to_named(&message, fields.unnamed.len());
                    quote! {
                        Self::#variant_name(#(#bindings),*) =>
                            write!(f, #format_str, #(#bindings = #bindings),*),
                    }
                }
                Fields::Named(fields) => {
                    let bindings: Vec<_> = fields.named.iter().map(|f| &f.ident).collect();
                    quote! {
                        Self::#variant_name { #(#bindings),* } =>
                            write!(f, #message, #(#bindings = #bindings),*),
                    }
                }
            };

            Ok(arm)
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        impl ::std::fmt::Display for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    #(#display_arms)*
                }
            }
        }

        impl ::std::error::Error for #name {}
    })
}

/// Extracts the message from a variant's `#[error("...")]` attribute.
fn error_message(variant: &syn::Variant) -> syn::Result<String> {
    for attr in &variant.attrs {
        if !attr.path().is_ident("error") {
            continue;
        }

        if let Meta::List(meta_list) = &attr.meta {
            let lit = syn::parse2::<Lit>(meta_list.tokens.clone()).map_err(|_| {
                syn::Error::new_spanned(
                    &attr.meta,
                    "expected a string literal, e.g. #[error(\"invalid target: {0}\")]",
                )
            })?;

            if let Lit::Str(lit_str) = lit {
                return Ok(lit_str.value());
            }
        }

        return Err(syn::Error::new_spanned(
            &attr.meta,
            "invalid #[error] attribute; use #[error(\"message\")]",
        ));
    }

    Err(syn::Error::new_spanned(
        variant,
        format!(
            "missing #[error(\"...\")] attribute on variant `{}`",
            variant.ident
        ),
    ))
}

/// Rewrites positional format args `{0}`, `{1}` as named args `{f0}`, `{f1}`
/// so they can bind to the generated match identifiers.
fn positional_to_named(format_str: &str, field_count: usize) -> String {
    let mut result = format_str.to_string();
    for i in (0..field_count).rev() {
        result = result.replace(&format!("{{{}}}", i), &format!("{{f{}}}", i));
    }
    result
}
