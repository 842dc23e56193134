//! Codegen for `#[derive(Pack)]` on an enum whose variants each carry
//! exactly one unnamed field — a sum (tagged union).
//!
//! `map` layout writes a one-entry map keyed by the active variant's name;
//! `active_field` layout writes only the payload and lets the decoder try
//! each variant's type in declaration order, rewinding the reader between
//! attempts. Declaration order therefore matters for `active_field`: the
//! first variant whose type can parse the bytes wins, even if a later
//! variant would also have matched.

use crate::classify::type_requires_alloc;
use crate::config::{ContainerConfig, MemberConfig, SumLayout};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DataEnum, DeriveInput};

struct VariantPlan {
    ident: syn::Ident,
    ty: syn::Type,
    wire_name: String,
    requires_alloc: bool,
}

pub fn expand(input: &DeriveInput, data: &DataEnum) -> TokenStream {
    let container = match ContainerConfig::from_attrs(&input.attrs) {
        Ok(c) => c,
        Err(e) => return e.to_compile_error(),
    };
    let layout_default = match container.sum_layout {
        Some(SumLayout::ActiveField) => quote!(::neomp::SumLayout::ActiveField),
        _ => quote!(::neomp::SumLayout::Map),
    };

    let mut plan = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        let member = match MemberConfig::from_attrs(&variant.attrs) {
            Ok(c) => c,
            Err(e) => return e.to_compile_error(),
        };
        let ty = match &variant.fields {
            syn::Fields::Unnamed(f) => f.unnamed.first().expect("checked single field").ty.clone(),
            _ => unreachable!("dispatch guarantees single-field tuple variants"),
        };
        let ident = variant.ident.clone();
        let wire_name = member.rename.unwrap_or_else(|| ident.to_string());
        plan.push(VariantPlan {
            requires_alloc: type_requires_alloc(&ty),
            wire_name,
            ident,
            ty,
        });
    }

    let name = &input.ident;
    let options_name = format_ident!("{}Options", name);
    let any_requires_alloc = plan.iter().any(|v| v.requires_alloc);
    let largest_field_name_len = plan.iter().map(|v| v.wire_name.len()).max().unwrap_or(0);
    let option_field_idents: Vec<_> = plan
        .iter()
        .map(|v| format_ident!("{}", to_snake(&v.ident.to_string())))
        .collect();

    let option_fields = plan.iter().zip(&option_field_idents).map(|(v, opt_ident)| {
        let ty = &v.ty;
        quote! { pub #opt_ident: <#ty as ::neomp::Packable>::Options }
    });
    let default_option_fields = plan.iter().zip(&option_field_idents).map(|(v, opt_ident)| {
        let ty = &v.ty;
        quote! { #opt_ident: <#ty as ::neomp::Packable>::default_options() }
    });
    let contains_variable_length = plan.iter().map(|v| {
        let ty = &v.ty;
        quote! { <#ty as ::neomp::Packable>::CONTAINS_VARIABLE_LENGTH }
    });
    let requires_alloc_flags = plan.iter().map(|v| {
        let ty = &v.ty;
        quote! { <#ty as ::neomp::Packable>::REQUIRES_ALLOC }
    });
    // Conservative: the widest variant's payload, plus a str32-width key
    // header (the map-layout cost; active_field's is strictly smaller).
    let max_variant_size = plan.iter().fold(quote! { Some(0usize) }, |acc, v| {
        let ty = &v.ty;
        quote! {
            match <#ty as ::neomp::Packable>::MAX_ENCODED_SIZE {
                Some(candidate) => match #acc {
                    Some(running) if running >= candidate => Some(running),
                    Some(_) => Some(candidate),
                    None => None,
                },
                None => None,
            }
        }
    });
    let key_overhead = 5 + largest_field_name_len;

    let packable_impl = quote! {
        #[derive(Clone)]
        pub struct #options_name {
            pub layout: ::neomp::SumLayout,
            #(#option_fields,)*
        }

        impl ::neomp::Packable for #name {
            type Options = #options_name;

            const CONTAINS_VARIABLE_LENGTH: bool = false #(|| #contains_variable_length)*;
            const REQUIRES_ALLOC: bool = false #(|| #requires_alloc_flags)*;
            const MAX_ENCODED_SIZE: Option<usize> =
                ::neomp::opt_add(#max_variant_size, Some(#key_overhead));

            fn default_options() -> Self::Options {
                #options_name {
                    layout: #layout_default,
                    #(#default_option_fields,)*
                }
            }

            fn largest_field_name_len() -> usize {
                #largest_field_name_len
            }
        }
    };

    let map_encode_arms = plan.iter().zip(&option_field_idents).map(|(v, opt_ident)| {
        let ident = &v.ident;
        let wire_name = &v.wire_name;
        quote! {
            #name::#ident(value) => {
                let mut n = ::neomp::encode::write_map_header(w, 1)?;
                n += ::neomp::encode::write_key(w, #wire_name)?;
                n += ::neomp::encode::Encode::encode(value, w, &opts.#opt_ident)?;
                Ok(n)
            }
        }
    });
    let active_field_encode_arms = plan.iter().zip(&option_field_idents).map(|(v, opt_ident)| {
        let ident = &v.ident;
        quote! {
            #name::#ident(value) => ::neomp::encode::Encode::encode(value, w, &opts.#opt_ident),
        }
    });

    let encode_impl = quote! {
        impl ::neomp::Encode for #name {
            fn encode(
                &self,
                w: &mut ::neomp::io::Writer<'_>,
                opts: &Self::Options,
            ) -> ::neomp::Result<usize> {
                match opts.layout {
                    ::neomp::SumLayout::Map => match self {
                        #(#map_encode_arms)*
                    },
                    ::neomp::SumLayout::ActiveField => match self {
                        #(#active_field_encode_arms)*
                    },
                }
            }
        }
    };

    let decode_impl = if any_requires_alloc {
        quote! {}
    } else {
        let map_decode_arms = plan.iter().zip(&option_field_idents).map(|(v, opt_ident)| {
            let ident = &v.ident;
            let wire_name = &v.wire_name;
            quote! {
                if key == #wire_name.as_bytes() {
                    return Ok(#name::#ident(::neomp::Decode::decode(r, &opts.#opt_ident)?));
                }
            }
        });
        let active_field_attempts = plan.iter().zip(&option_field_idents).map(|(v, opt_ident)| {
            let ident = &v.ident;
            quote! {
                r.seek_to(start);
                if let Ok(value) = ::neomp::Decode::decode(r, &opts.#opt_ident) {
                    return Ok(#name::#ident(value));
                }
            }
        });

        quote! {
            impl ::neomp::Decode for #name {
                fn decode(
                    r: &mut ::neomp::io::Reader<'_>,
                    opts: &Self::Options,
                ) -> ::neomp::Result<Self> {
                    match opts.layout {
                        ::neomp::SumLayout::Map => {
                            let len = ::neomp::decode::read_map_header(r)?;
                            if len != 1 {
                                return Err(::neomp::Error::Invalid(
                                    ::neomp::InvalidReason::LengthMismatch { expected: 1, found: len },
                                ));
                            }
                            let key = ::neomp::decode::read_key(r)?;
                            if key.len() > <#name as ::neomp::Packable>::largest_field_name_len() {
                                return Err(::neomp::Error::Invalid(
                                    ::neomp::InvalidReason::NameTooLong {
                                        max: <#name as ::neomp::Packable>::largest_field_name_len(),
                                        found: key.len(),
                                    },
                                ));
                            }
                            #(#map_decode_arms)*
                            Err(::neomp::Error::Invalid(::neomp::InvalidReason::UnknownVariant(
                                String::from_utf8_lossy(key).into_owned(),
                            )))
                        }
                        ::neomp::SumLayout::ActiveField => {
                            let start = r.position();
                            #(#active_field_attempts)*
                            Err(::neomp::Error::Invalid(::neomp::InvalidReason::UnknownVariant(
                                "no declared variant matched the wire bytes".to_string(),
                            )))
                        }
                    }
                }
            }
        }
    };

    let decode_alloc_impl = if any_requires_alloc {
        let output_name = format_ident!("{}Decoded", name);
        let output_variants = plan.iter().map(|v| {
            let ident = &v.ident;
            let ty = &v.ty;
            quote! { #ident(<#ty as ::neomp::decode::DecodeAlloc<'arena>>::Output) }
        });
        let map_decode_arms = plan.iter().zip(&option_field_idents).map(|(v, opt_ident)| {
            let ident = &v.ident;
            let wire_name = &v.wire_name;
            quote! {
                if key == #wire_name.as_bytes() {
                    return Ok(#output_name::#ident(
                        ::neomp::decode::DecodeAlloc::decode_alloc(r, &opts.#opt_ident, arena)?,
                    ));
                }
            }
        });
        let active_field_attempts = plan.iter().zip(&option_field_idents).map(|(v, opt_ident)| {
            let ident = &v.ident;
            quote! {
                r.seek_to(start);
                if let Ok(value) = ::neomp::decode::DecodeAlloc::decode_alloc(r, &opts.#opt_ident, arena) {
                    return Ok(#output_name::#ident(value));
                }
            }
        });

        quote! {
            /// Arena-borrowed counterpart of `#name`, produced by its
            /// `DecodeAlloc` impl.
            pub enum #output_name<'arena> {
                #(#output_variants,)*
            }

            impl<'arena> ::neomp::decode::DecodeAlloc<'arena> for #name {
                type Output = #output_name<'arena>;

                fn decode_alloc(
                    r: &mut ::neomp::io::Reader<'_>,
                    opts: &Self::Options,
                    arena: &'arena ::neomp::bumpalo::Bump,
                ) -> ::neomp::Result<Self::Output> {
                    match opts.layout {
                        ::neomp::SumLayout::Map => {
                            let len = ::neomp::decode::read_map_header(r)?;
                            if len != 1 {
                                return Err(::neomp::Error::Invalid(
                                    ::neomp::InvalidReason::LengthMismatch { expected: 1, found: len },
                                ));
                            }
                            let key = ::neomp::decode::read_key(r)?;
                            if key.len() > <#name as ::neomp::Packable>::largest_field_name_len() {
                                return Err(::neomp::Error::Invalid(
                                    ::neomp::InvalidReason::NameTooLong {
                                        max: <#name as ::neomp::Packable>::largest_field_name_len(),
                                        found: key.len(),
                                    },
                                ));
                            }
                            #(#map_decode_arms)*
                            Err(::neomp::Error::Invalid(::neomp::InvalidReason::UnknownVariant(
                                String::from_utf8_lossy(key).into_owned(),
                            )))
                        }
                        ::neomp::SumLayout::ActiveField => {
                            let start = r.position();
                            #(#active_field_attempts)*
                            Err(::neomp::Error::Invalid(::neomp::InvalidReason::UnknownVariant(
                                "no declared variant matched the wire bytes".to_string(),
                            )))
                        }
                    }
                }
            }
        }
    } else {
        quote! {
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
        }
    };

    quote! {
        #packable_impl
        #encode_impl
        #decode_impl
        #decode_alloc_impl
    }
}

fn to_snake(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, c) in ident.char_indices() {
        if c.is_uppercase() {
            if i != 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
