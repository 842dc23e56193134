//! A syntactic heuristic for whether a field's declared type might require
//! an allocator to decode.
//!
//! The derive macro never type-checks — it only ever sees token trees — so
//! it cannot ask "does `T: Decode` exist" the way the hand-written impls in
//! `neomp::decode` can. It can only recognize a short list of type-path
//! shapes known to require `DecodeAlloc` and conservatively assume
//! allocation for anything it doesn't recognize (a type alias over `Vec<T>`,
//! a user newtype wrapping one, a reference type, ...). A struct or enum
//! whose fields are all misclassified as allocating simply doesn't get the
//! non-allocating `Decode` impl — it still round-trips fine through
//! `DecodeAlloc`, which is always emitted.
use syn::{GenericArgument, PathArguments, Type};

const KNOWN_ALLOCATING: &[&str] = &["Vec", "String", "Box", "SentinelVec", "Bytes"];

pub fn type_requires_alloc(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => {
            let Some(segment) = type_path.path.segments.last() else {
                return true;
            };
            let name = segment.ident.to_string();
            if KNOWN_ALLOCATING.contains(&name.as_str()) {
                return true;
            }
            if name == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    return args.args.iter().any(|arg| match arg {
                        GenericArgument::Type(inner) => type_requires_alloc(inner),
                        _ => false,
                    });
                }
            }
            // Any other bare path (u8, bool, f64, FixedBytes<N>, a
            // user-defined product/sum/enum type, ...) is assumed
            // non-allocating.
            false
        }
        Type::Array(array) => type_requires_alloc(&array.elem),
        // References, tuples, and anything else this heuristic doesn't
        // recognize are conservatively treated as allocating.
        _ => true,
    }
}
