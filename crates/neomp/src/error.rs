//! Error types.
//!
//! One flat `Error` enum: a plain data-carrying enum, a hand-written
//! `Display`, and `impl std::error::Error`. No `thiserror` — this crate's
//! error layer carries zero non-dev dependencies and hand-rolls its errors.

use crate::format::Tag;

/// Top-level `neomp` error.
#[derive(Debug, Clone)]
pub enum Error {
    /// The encoder's output buffer was exhausted.
    NoSpaceLeft,
    /// A sequence's runtime length exceeds `u32::MAX` and cannot be
    /// represented as a MessagePack length prefix.
    SliceLenTooLarge(usize),
    /// The decoder's structural or semantic contract was violated.
    Invalid(InvalidReason),
    /// The arena passed to `decode_alloc` could not grow to fit the output.
    OutOfMemory,
}

/// Why a decode failed. Callers are not meant to match on this to drive
/// recovery — it exists so `Error`'s `Debug`/`Display` carries a useful
/// message, not so the crate makes a stability promise about its shape.
#[derive(Debug, Clone)]
pub enum InvalidReason {
    /// A byte did not correspond to any MessagePack tag (the reserved `0xC1`).
    BadTag(u8),
    /// The tag on the wire does not belong to the family the host type expects.
    WrongFormat { expected: &'static str, found: Tag },
    /// A fixed-size container's declared length didn't match the wire length.
    LengthMismatch { expected: usize, found: usize },
    /// An integer's wire value doesn't fit in the requested host width.
    Narrowing,
    /// A product's map-layout entry used a key that isn't a declared field.
    UnknownField(String),
    /// A sum's tag or an enum's name/int didn't match any declared variant.
    UnknownVariant(String),
    /// A product's map-layout entry named the same field twice.
    DuplicateField(&'static str),
    /// A product's map-layout omitted a required field.
    MissingField(&'static str),
    /// Bytes remained after decoding was expected to consume the whole input.
    TrailingBytes(usize),
    /// The input ended before a read could complete.
    UnexpectedEnd,
    /// A `str` payload was not valid UTF-8.
    Utf8,
    /// A sentinel array/slice's trailing element didn't equal the declared sentinel.
    SentinelMismatch,
    /// A field/variant name on the wire is longer than any declared name,
    /// so it cannot possibly match and decoding short-circuits without
    /// allocating a comparison buffer.
    NameTooLong { max: usize, found: usize },
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::NoSpaceLeft => write!(f, "encoder ran out of buffer space"),
            Error::SliceLenTooLarge(n) => {
                write!(f, "sequence of {n} items exceeds the u32 length prefix")
            }
            Error::Invalid(reason) => write!(f, "invalid MessagePack input: {reason}"),
            Error::OutOfMemory => write!(f, "arena allocation failed"),
        }
    }
}

impl core::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InvalidReason::BadTag(b) => write!(f, "byte {b:#04x} is not a valid tag"),
            InvalidReason::WrongFormat { expected, found } => {
                write!(f, "expected a {expected} format, found {}", found.name())
            }
            InvalidReason::LengthMismatch { expected, found } => {
                write!(f, "expected length {expected}, found {found}")
            }
            InvalidReason::UnknownField(name) => write!(f, "unknown field {name:?}"),
            InvalidReason::UnknownVariant(name) => write!(f, "unknown variant {name:?}"),
            InvalidReason::DuplicateField(name) => write!(f, "duplicate field {name:?}"),
            InvalidReason::MissingField(name) => write!(f, "missing field {name:?}"),
            InvalidReason::TrailingBytes(n) => write!(f, "{n} unconsumed trailing byte(s)"),
            InvalidReason::NameTooLong { max, found } => {
                write!(f, "name of {found} bytes exceeds the longest declared name ({max})")
            }
            other => write!(f, "{other:?}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
