//! Derive macro for deterministic binary serialization.
//!
//! Generates `Encode` and `Decode` implementations against the traits in
//! `crate::types::encoding` of the main crate. Fields serialize in declaration
//! order; enums are prefixed with a `u8` discriminant. The format is
//! deterministic, which makes it suitable for cryptographic hashing of events
//! and receipts.
//!
//! Supports named structs, tuple structs, unit structs, and enums with any
//! variant shape. Unions are rejected.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DataEnum, DeriveInput, Fields};

/// Derives `Encode` and `Decode` for a type.
pub fn derive_binary_codec(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let expanded = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => {
                let field_names: Vec<_> = fields.named.iter().map(|f| &f.ident).collect();
                let encode_fields = field_names.iter().map(|field| {
                    quote! { crate::types::encoding::Encode::encode(&self.#field, out); }
                });
                let decode_fields = field_names.iter().map(|field| {
                    quote! { #field: crate::types::encoding::Decode::decode(input)?, }
                });
                impl_block(
                    name,
                    quote! { #(#encode_fields)* },
                    quote! { Ok(Self { #(#decode_fields)* }) },
                )
            }
            Fields::Unnamed(fields) => {
                let indices: Vec<_> = (0..fields.unnamed.len()).map(syn::Index::from).collect();
                let encode_fields = indices.iter().map(|idx| {
                    quote! { crate::types::encoding::Encode::encode(&self.#idx, out); }
                });
                let decode_fields = indices.iter().map(|_| {
                    quote! { crate::types::encoding::Decode::decode(input)?, }
                });
                impl_block(
                    name,
                    quote! { #(#encode_fields)* },
                    quote! { Ok(Self(#(#decode_fields)*)) },
                )
            }
            Fields::Unit => impl_block(name, quote! {}, quote! { Ok(Self) }),
        },
        Data::Enum(data_enum) => enum_impl(name, data_enum),
        Data::Union(_) => {
            syn::Error::new_spanned(&input, "BinaryCodec derive does not support unions")
                .to_compile_error()
        }
    };

    TokenStream::from(expanded)
}

/// Wraps encode/decode bodies in the two trait impls.
fn impl_block(
    name: &syn::Ident,
    encode_body: proc_macro2::TokenStream,
    decode_body: proc_macro2::TokenStream,
) -> proc_macro2::TokenStream {
    quote! {
        impl crate::types::encoding::Encode for #name {
            fn encode<S: crate::types::encoding::EncodeSink>(&self, out: &mut S) {
                #encode_body
            }
        }

        impl crate::types::encoding::Decode for #name {
            fn decode(
                input: &mut &[u8],
            ) -> ::std::result::Result<Self, crate::types::encoding::DecodeError> {
                #decode_body
            }
        }
    }
}

/// Generates `Encode`/`Decode` for enums: a `u8` discriminant in declaration
/// order, followed by the variant's fields.
fn enum_impl(name: &syn::Ident, data_enum: &DataEnum) -> proc_macro2::TokenStream {
    let mut encode_arms = Vec::new();
    let mut decode_arms = Vec::new();

    for (idx, variant) in data_enum.variants.iter().enumerate() {
        let tag = idx as u8;
        let variant_name = &variant.ident;

        match &variant.fields {
            Fields::Unit => {
                encode_arms.push(quote! {
                    Self::#variant_name => {
                        crate::types::encoding::Encode::encode(&#tag, out);
                    }
                });
                decode_arms.push(quote! {
                    #tag => Ok(Self::#variant_name),
                });
            }
            Fields::Unnamed(fields) => {
                let bindings: Vec<_> = (0..fields.unnamed.len())
                    .map(|i| quote::format_ident!("f{}", i))
                    .collect();
                let encode_fields = bindings.iter().map(|binding| {
                    quote! { crate::types::encoding::Encode::encode(#binding, out); }
                });
                let decode_fields = bindings.iter().map(|_| {
                    quote! { crate::types::encoding::Decode::decode(input)?, }
                });
                encode_arms.push(quote! {
                    Self::#variant_name(#(#bindings),*) => {
                        crate::types::encoding::Encode::encode(&#tag, out);
                        #(#encode_fields)*
                    }
                });
                decode_arms.push(quote! {
                    #tag => Ok(Self::#variant_name(#(#decode_fields)*)),
                });
            }
            Fields::Named(fields) => {
                let bindings: Vec<_> = fields.named.iter().map(|f| &f.ident).collect();
                let encode_fields = bindings.iter().map(|binding| {
                    quote! { crate::types::encoding::Encode::encode(#binding, out); }
                });
                let decode_fields = bindings.iter().map(|field| {
                    quote! { #field: crate::types::encoding::Decode::decode(input)?, }
                });
                encode_arms.push(quote! {
                    Self::#variant_name { #(#bindings),* } => {
                        crate::types::encoding::Encode::encode(&#tag, out);
                        #(#encode_fields)*
                    }
                });
                decode_arms.push(quote! {
                    #tag => Ok(Self::#variant_name { #(#decode_fields)* }),
                });
            }
        }
    }

    quote! {
        impl crate::types::encoding::Encode for #name {
            fn encode<S: crate::types::encoding::EncodeSink>(&self, out: &mut S) {
                match self {
                    #(#encode_arms)*
                }
            }
        }

        impl crate::types::encoding::Decode for #name {
            fn decode(
                input: &mut &[u8],
            ) -> ::std::result::Result<Self, crate::types::encoding::DecodeError> {
                let tag: u8 = crate::types::encoding::Decode::decode(input)?;
                match tag {
                    #(#decode_arms)*
                    _ => Err(crate::types::encoding::DecodeError::InvalidValue),
                }
            }
        }
    }
}
