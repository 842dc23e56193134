//! Codegen for `#[derive(Pack)]` on a struct with named fields (a product).
//!
//! Emits an `{Name}Options` struct (one `layout` leaf plus one sub-options
//! field per struct field), a `Packable` impl, an `Encode` impl for both
//! layouts, a non-allocating `Decode` impl (only when
//! [`crate::classify::type_requires_alloc`] is false for every field), and
//! an always-present `DecodeAlloc` impl — delegating to `Decode` when one
//! was emitted, producing a field-mirroring output struct otherwise.

use crate::classify::type_requires_alloc;
use crate::config::{ContainerConfig, MemberConfig, ProductLayout};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, FieldsNamed};

struct FieldPlan {
    ident: syn::Ident,
    ty: syn::Type,
    wire_name: String,
    requires_alloc: bool,
}

pub fn expand(input: &DeriveInput, fields: &FieldsNamed) -> TokenStream {
    let container = match ContainerConfig::from_attrs(&input.attrs) {
        Ok(c) => c,
        Err(e) => return e.to_compile_error(),
    };
    let layout_default = match container.product_layout {
        Some(ProductLayout::Array) => quote!(::neomp::ProductLayout::Array),
        _ => quote!(::neomp::ProductLayout::Map),
    };

    let mut plan = Vec::with_capacity(fields.named.len());
    for field in &fields.named {
        let member = match MemberConfig::from_attrs(&field.attrs) {
            Ok(c) => c,
            Err(e) => return e.to_compile_error(),
        };
        let ident = field.ident.clone().expect("named field");
        let wire_name = member.rename.unwrap_or_else(|| ident.to_string());
        plan.push(FieldPlan {
            requires_alloc: type_requires_alloc(&field.ty),
            wire_name,
            ident,
            ty: field.ty.clone(),
        });
    }

    let name = &input.ident;
    let options_name = format_ident!("{}Options", name);
    let field_count = plan.len();
    let any_requires_alloc = plan.iter().any(|f| f.requires_alloc);
    let largest_field_name_len = plan.iter().map(|f| f.wire_name.len()).max().unwrap_or(0);

    let option_fields = plan.iter().map(|f| {
        let ident = &f.ident;
        let ty = &f.ty;
        quote! { pub #ident: <#ty as ::neomp::Packable>::Options }
    });
    let default_option_fields = plan.iter().map(|f| {
        let ident = &f.ident;
        let ty = &f.ty;
        quote! { #ident: <#ty as ::neomp::Packable>::default_options() }
    });
    let contains_variable_length = plan.iter().map(|f| {
        let ty = &f.ty;
        quote! { <#ty as ::neomp::Packable>::CONTAINS_VARIABLE_LENGTH }
    });
    let requires_alloc_flags = plan.iter().map(|f| {
        let ty = &f.ty;
        quote! { <#ty as ::neomp::Packable>::REQUIRES_ALLOC }
    });
    // A conservative per-field contribution: the field's own bound plus a
    // str32-width key header, matching the "assume the wider family" rule
    // the hand-written size oracle uses for every other bounded kind.
    let per_field_size = plan.iter().fold(quote! { Some(0usize) }, |acc, f| {
        let ty = &f.ty;
        let key_overhead = 5 + f.wire_name.len();
        quote! {
            ::neomp::opt_add(
                ::neomp::opt_add(#acc, <#ty as ::neomp::Packable>::MAX_ENCODED_SIZE),
                Some(#key_overhead),
            )
        }
    });

    let packable_impl = quote! {
        #[derive(Clone)]
        pub struct #options_name {
            pub layout: ::neomp::ProductLayout,
            #(#option_fields,)*
        }

        impl ::neomp::Packable for #name {
            type Options = #options_name;

            const CONTAINS_VARIABLE_LENGTH: bool = false #(|| #contains_variable_length)*;
            const REQUIRES_ALLOC: bool = false #(|| #requires_alloc_flags)*;
            const MAX_ENCODED_SIZE: Option<usize> =
                ::neomp::opt_add(#per_field_size, Some(5));

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

    let map_write_fields = plan.iter().map(|f| {
        let ident = &f.ident;
        let wire_name = &f.wire_name;
        quote! {
            n += ::neomp::encode::write_key(w, #wire_name)?;
            n += ::neomp::encode::Encode::encode(&self.#ident, w, &opts.#ident)?;
        }
    });
    let array_write_fields = plan.iter().map(|f| {
        let ident = &f.ident;
        quote! {
            n += ::neomp::encode::Encode::encode(&self.#ident, w, &opts.#ident)?;
        }
    });

    let encode_impl = if field_count == 0 {
        quote! {
            impl ::neomp::Encode for #name {
                fn encode(
                    &self,
                    _w: &mut ::neomp::io::Writer<'_>,
                    _opts: &Self::Options,
                ) -> ::neomp::Result<usize> {
                    Ok(0)
                }
            }
        }
    } else {
        quote! {
            impl ::neomp::Encode for #name {
                fn encode(
                    &self,
                    w: &mut ::neomp::io::Writer<'_>,
                    opts: &Self::Options,
                ) -> ::neomp::Result<usize> {
                    match opts.layout {
                        ::neomp::ProductLayout::Map => {
                            let mut n = ::neomp::encode::write_map_header(w, #field_count)?;
                            #(#map_write_fields)*
                            Ok(n)
                        }
                        ::neomp::ProductLayout::Array => {
                            let mut n = ::neomp::encode::write_array_header(w, #field_count)?;
                            #(#array_write_fields)*
                            Ok(n)
                        }
                    }
                }
            }
        }
    };

    let decode_impl = if field_count == 0 {
        quote! {
            impl ::neomp::Decode for #name {
                fn decode(
                    _r: &mut ::neomp::io::Reader<'_>,
                    _opts: &Self::Options,
                ) -> ::neomp::Result<Self> {
                    Ok(#name {})
                }
            }
        }
    } else if any_requires_alloc {
        quote! {}
    } else {
        let map_match_arms = plan.iter().map(|f| {
            let ident = &f.ident;
            let wire_name = &f.wire_name;
            let slot = format_ident!("__{}", ident);
            quote! {
                if key == #wire_name.as_bytes() {
                    if #slot.is_some() {
                        return Err(::neomp::Error::Invalid(
                            ::neomp::InvalidReason::DuplicateField(#wire_name),
                        ));
                    }
                    #slot = Some(::neomp::Decode::decode(r, &opts.#ident)?);
                    continue;
                }
            }
        });
        let slot_decls = plan.iter().map(|f| {
            let ty = &f.ty;
            let slot = format_ident!("__{}", f.ident);
            quote! { let mut #slot: Option<#ty> = None; }
        });
        let slot_finish = plan.iter().map(|f| {
            let ident = &f.ident;
            let wire_name = &f.wire_name;
            let slot = format_ident!("__{}", ident);
            quote! {
                #ident: #slot.ok_or(::neomp::Error::Invalid(
                    ::neomp::InvalidReason::MissingField(#wire_name),
                ))?,
            }
        });
        let array_fields = plan.iter().map(|f| {
            let ident = &f.ident;
            quote! { #ident: ::neomp::Decode::decode(r, &opts.#ident)?, }
        });

        quote! {
            impl ::neomp::Decode for #name {
                fn decode(
                    r: &mut ::neomp::io::Reader<'_>,
                    opts: &Self::Options,
                ) -> ::neomp::Result<Self> {
                    match opts.layout {
                        ::neomp::ProductLayout::Map => {
                            let len = ::neomp::decode::read_map_header(r)?;
                            if len != #field_count {
                                return Err(::neomp::Error::Invalid(
                                    ::neomp::InvalidReason::LengthMismatch {
                                        expected: #field_count,
                                        found: len,
                                    },
                                ));
                            }
                            #(#slot_decls)*
                            for _ in 0..len {
                                let key = ::neomp::decode::read_key(r)?;
                                if key.len() > <#name as ::neomp::Packable>::largest_field_name_len() {
                                    return Err(::neomp::Error::Invalid(
                                        ::neomp::InvalidReason::NameTooLong {
                                            max: <#name as ::neomp::Packable>::largest_field_name_len(),
                                            found: key.len(),
                                        },
                                    ));
                                }
                                #(#map_match_arms)*
                                return Err(::neomp::Error::Invalid(
                                    ::neomp::InvalidReason::UnknownField(
                                        String::from_utf8_lossy(key).into_owned(),
                                    ),
                                ));
                            }
                            Ok(#name {
                                #(#slot_finish)*
                            })
                        }
                        ::neomp::ProductLayout::Array => {
                            let len = ::neomp::decode::read_array_header(r)?;
                            if len != #field_count {
                                return Err(::neomp::Error::Invalid(
                                    ::neomp::InvalidReason::LengthMismatch {
                                        expected: #field_count,
                                        found: len,
                                    },
                                ));
                            }
                            Ok(#name {
                                #(#array_fields)*
                            })
                        }
                    }
                }
            }
        }
    };

    let decode_alloc_impl = if any_requires_alloc {
        let output_fields = plan.iter().map(|f| {
            let ident = &f.ident;
            let ty = &f.ty;
            quote! { pub #ident: <#ty as ::neomp::decode::DecodeAlloc<'arena>>::Output }
        });
        let output_name = format_ident!("{}Decoded", name);

        let map_match_arms = plan.iter().map(|f| {
            let ident = &f.ident;
            let wire_name = &f.wire_name;
            let slot = format_ident!("__{}", ident);
            quote! {
                if key == #wire_name.as_bytes() {
                    if #slot.is_some() {
                        return Err(::neomp::Error::Invalid(
                            ::neomp::InvalidReason::DuplicateField(#wire_name),
                        ));
                    }
                    #slot = Some(::neomp::decode::DecodeAlloc::decode_alloc(r, &opts.#ident, arena)?);
                    continue;
                }
            }
        });
        let slot_decls = plan.iter().map(|f| {
            let ty = &f.ty;
            let slot = format_ident!("__{}", f.ident);
            quote! { let mut #slot: Option<<#ty as ::neomp::decode::DecodeAlloc<'arena>>::Output> = None; }
        });
        let slot_finish = plan.iter().map(|f| {
            let ident = &f.ident;
            let wire_name = &f.wire_name;
            let slot = format_ident!("__{}", ident);
            quote! {
                #ident: #slot.ok_or(::neomp::Error::Invalid(
                    ::neomp::InvalidReason::MissingField(#wire_name),
                ))?,
            }
        });
        let array_fields = plan.iter().map(|f| {
            let ident = &f.ident;
            quote! { #ident: ::neomp::decode::DecodeAlloc::decode_alloc(r, &opts.#ident, arena)?, }
        });

        quote! {
            /// Arena-borrowed counterpart of `#name`, produced by its
            /// `DecodeAlloc` impl.
            pub struct #output_name<'arena> {
                #(#output_fields,)*
            }

            impl<'arena> ::neomp::decode::DecodeAlloc<'arena> for #name {
                type Output = #output_name<'arena>;

                fn decode_alloc(
                    r: &mut ::neomp::io::Reader<'_>,
                    opts: &Self::Options,
                    arena: &'arena ::neomp::bumpalo::Bump,
                ) -> ::neomp::Result<Self::Output> {
                    match opts.layout {
                        ::neomp::ProductLayout::Map => {
                            let len = ::neomp::decode::read_map_header(r)?;
                            if len != #field_count {
                                return Err(::neomp::Error::Invalid(
                                    ::neomp::InvalidReason::LengthMismatch {
                                        expected: #field_count,
                                        found: len,
                                    },
                                ));
                            }
                            #(#slot_decls)*
                            for _ in 0..len {
                                let key = ::neomp::decode::read_key(r)?;
                                if key.len() > <#name as ::neomp::Packable>::largest_field_name_len() {
                                    return Err(::neomp::Error::Invalid(
                                        ::neomp::InvalidReason::NameTooLong {
                                            max: <#name as ::neomp::Packable>::largest_field_name_len(),
                                            found: key.len(),
                                        },
                                    ));
                                }
                                #(#map_match_arms)*
                                return Err(::neomp::Error::Invalid(
                                    ::neomp::InvalidReason::UnknownField(
                                        String::from_utf8_lossy(key).into_owned(),
                                    ),
                                ));
                            }
                            Ok(#output_name {
                                #(#slot_finish)*
                            })
                        }
                        ::neomp::ProductLayout::Array => {
                            let len = ::neomp::decode::read_array_header(r)?;
                            if len != #field_count {
                                return Err(::neomp::Error::Invalid(
                                    ::neomp::InvalidReason::LengthMismatch {
                                        expected: #field_count,
                                        found: len,
                                    },
                                ));
                            }
                            Ok(#output_name {
                                #(#array_fields)*
                            })
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
