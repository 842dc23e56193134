//! Codegen for `#[derive(Pack)]` on a fieldless enum: `int` format writes the
//! backing discriminant as its own integer type, `str` format writes the
//! variant name.

use crate::config::{ContainerConfig, EnumFormat, MemberConfig};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, DeriveInput};

struct VariantPlan {
    ident: syn::Ident,
    wire_name: String,
    discriminant: u32,
}

pub fn expand(input: &DeriveInput, data: &DataEnum) -> TokenStream {
    let container = match ContainerConfig::from_attrs(&input.attrs) {
        Ok(c) => c,
        Err(e) => return e.to_compile_error(),
    };
    let default_format = match container.enum_format {
        Some(EnumFormat::Str) => quote!(::neomp::EnumFormat::Str),
        _ => quote!(::neomp::EnumFormat::Int),
    };

    let mut plan = Vec::with_capacity(data.variants.len());
    let mut next_discriminant = 0u32;
    for variant in &data.variants {
        let member = match MemberConfig::from_attrs(&variant.attrs) {
            Ok(c) => c,
            Err(e) => return e.to_compile_error(),
        };
        let discriminant = if let Some((_, expr)) = &variant.discriminant {
            match expr {
                syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Int(lit), .. }) => {
                    match lit.base10_parse::<u32>() {
                        Ok(v) => v,
                        Err(e) => return e.to_compile_error(),
                    }
                }
                _ => {
                    return syn::Error::new_spanned(
                        expr,
                        "#[derive(Pack)] closed-enum discriminants must be integer literals",
                    )
                    .to_compile_error()
                }
            }
        } else {
            next_discriminant
        };
        next_discriminant = discriminant + 1;

        let ident = variant.ident.clone();
        let wire_name = member.rename.unwrap_or_else(|| ident.to_string());
        plan.push(VariantPlan {
            ident,
            wire_name,
            discriminant,
        });
    }

    let name = &input.ident;
    let largest_field_name_len = plan.iter().map(|v| v.wire_name.len()).max().unwrap_or(0);
    let key_overhead = 5 + largest_field_name_len;

    let packable_impl = quote! {
        impl ::neomp::Packable for #name {
            type Options = ::neomp::EnumFormat;

            const CONTAINS_VARIABLE_LENGTH: bool = false;
            const REQUIRES_ALLOC: bool = false;
            const MAX_ENCODED_SIZE: Option<usize> = Some(#key_overhead);

            fn default_options() -> Self::Options {
                #default_format
            }

            fn largest_field_name_len() -> usize {
                #largest_field_name_len
            }
        }
    };

    let int_encode_arms = plan.iter().map(|v| {
        let ident = &v.ident;
        let discriminant = v.discriminant;
        quote! { #name::#ident => ::neomp::encode::Encode::encode(&(#discriminant as u32), w, &()), }
    });
    let str_encode_arms = plan.iter().map(|v| {
        let ident = &v.ident;
        let wire_name = &v.wire_name;
        quote! {
            #name::#ident => {
                let mut n = ::neomp::encode::write_str_header(w, #wire_name.len())?;
                w.write_bytes(#wire_name.as_bytes())?;
                n += #wire_name.len();
                Ok(n)
            }
        }
    });

    let encode_impl = quote! {
        impl ::neomp::Encode for #name {
            fn encode(
                &self,
                w: &mut ::neomp::io::Writer<'_>,
                opts: &Self::Options,
            ) -> ::neomp::Result<usize> {
                match opts {
                    ::neomp::EnumFormat::Int => match self {
                        #(#int_encode_arms)*
                    },
                    ::neomp::EnumFormat::Str => match self {
                        #(#str_encode_arms)*
                    },
                }
            }
        }
    };

    let int_decode_arms = plan.iter().map(|v| {
        let ident = &v.ident;
        let discriminant = v.discriminant;
        quote! { #discriminant => Ok(#name::#ident), }
    });
    let str_decode_arms = plan.iter().map(|v| {
        let ident = &v.ident;
        let wire_name = &v.wire_name;
        quote! {
            if name.as_bytes() == #wire_name.as_bytes() {
                return Ok(#name::#ident);
            }
        }
    });

    let decode_impl = quote! {
        impl ::neomp::Decode for #name {
            fn decode(
                r: &mut ::neomp::io::Reader<'_>,
                opts: &Self::Options,
            ) -> ::neomp::Result<Self> {
                match opts {
                    ::neomp::EnumFormat::Int => {
                        let value: u32 = ::neomp::Decode::decode(r, &())?;
                        match value {
                            #(#int_decode_arms)*
                            other => Err(::neomp::Error::Invalid(
                                ::neomp::InvalidReason::UnknownVariant(other.to_string()),
                            )),
                        }
                    }
                    ::neomp::EnumFormat::Str => {
                        let key = ::neomp::decode::read_key(r)?;
                        if key.len() > <#name as ::neomp::Packable>::largest_field_name_len() {
                            return Err(::neomp::Error::Invalid(
                                ::neomp::InvalidReason::NameTooLong {
                                    max: <#name as ::neomp::Packable>::largest_field_name_len(),
                                    found: key.len(),
                                },
                            ));
                        }
                        let name = String::from_utf8_lossy(key);
                        #(#str_decode_arms)*
                        Err(::neomp::Error::Invalid(::neomp::InvalidReason::UnknownVariant(
                            name.into_owned(),
                        )))
                    }
                }
            }
        }
    };

    let decode_alloc_impl = quote! {
        impl<'arena> ::neomp::decode::DecodeAlloc<'arena> for #name {
            type Output = #name;

            fn decode_alloc(
                r: &mut ::neomp::io::Reader<'_>,
                opts: &Self::Options,
                _arena: &'arena ::neomp::bumpalo::Bump,
            ) -> ::neomp::Result<Self::Output> {
                <#name as ::neomp::Decode>::decode(r, opts)
            }
        }
    };

    quote! {
        #packable_impl
        #encode_impl
        #decode_impl
        #decode_alloc_impl
    }
}
