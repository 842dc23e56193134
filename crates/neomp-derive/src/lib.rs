//! `#[derive(Pack)]`: generates `Packable`, `Encode`, `DecodeAlloc`, and
//! (when every field/variant payload permits it) `Decode` for a struct or
//! enum.
//!
//! - A struct with named fields is a *product*; `#[neomp(layout = "map")]`
//!   (the default) or `#[neomp(layout = "array")]` picks its wire layout.
//! - An enum whose variants are all single-field tuple variants is a *sum*;
//!   `#[neomp(layout = "map")]` (the default) or
//!   `#[neomp(layout = "active_field")]` picks its wire layout.
//! - An enum whose variants are all unit variants is a *closed enum*;
//!   `#[neomp(format = "int")]` (the default) or `#[neomp(format = "str")]`
//!   picks how the active variant is written.
//! - `#[neomp(rename = "...")]` on a field or variant overrides the name
//!   used on the wire (map keys, enum-str names).

mod classify;
mod closed_enum;
mod config;
mod product;
mod sum;

use proc_macro::TokenStream;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

#[proc_macro_derive(Pack, attributes(neomp))]
pub fn derive_pack(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let output = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => product::expand(&input, fields),
            Fields::Unnamed(_) | Fields::Unit => syn::Error::new_spanned(
                &input.ident,
                "#[derive(Pack)] supports structs with named fields",
            )
            .to_compile_error(),
        },
        Data::Enum(data) => {
            let all_unit = data.variants.iter().all(|v| matches!(v.fields, Fields::Unit));
            let all_single_unnamed = data.variants.iter().all(|v| match &v.fields {
                Fields::Unnamed(f) => f.unnamed.len() == 1,
                _ => false,
            });
            if all_unit {
                closed_enum::expand(&input, data)
            } else if all_single_unnamed {
                sum::expand(&input, data)
            } else {
                syn::Error::new_spanned(
                    &input.ident,
                    "#[derive(Pack)] enums must be either all unit variants (a closed enum) \
                     or all single-field tuple variants (a sum type)",
                )
                .to_compile_error()
            }
        }
        Data::Union(_) => {
            syn::Error::new_spanned(&input.ident, "#[derive(Pack)] does not support unions")
                .to_compile_error()
        }
    };

    output.into()
}
