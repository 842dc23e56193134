//! # neomp
//!
//! A small, statically-typed library for MessagePack serialization.
//!
//! ## Philosophy
//!
//! - **Type-directed**: the wire layout is a compile-time function of the
//!   host type, not a runtime schema. There is no `Value` enum to match on.
//! - **Bounded**: encoding into a caller-owned buffer never allocates;
//!   `encode_bounded` never allocates at all. Decoding is zero-copy and
//!   bounds-checked by construction.
//! - **Narrowest legal wire form**: the encoder always picks the smallest
//!   MessagePack family that can hold a value, favoring compactness over a
//!   predictable fixed width.
//!
//! ## Format
//!
//! `neomp` reads and writes the [MessagePack](https://msgpack.org/) wire
//! format directly — `fixint`/`nil`/`bool`/`bin`/`float`/`int`/`str`/
//! `array`/`map` and their wider siblings. `ext`/`timestamp` tags are
//! recognized (so a decode error can name them) but never produced or
//! consumed.
//!
//! ## Layout
//!
//! - [`format`] — the `Tag` ↔ byte table.
//! - [`io`] — bounds-checked `Writer`/`Reader` byte cursors.
//! - [`error`] — `Error`/`InvalidReason`.
//! - [`packable`] — the `Packable` trait and the `Options` model.
//! - [`encode`] — the `Encode` trait and `encode`/`encode_bounded`.
//! - [`decode`] — the `Decode`/`DecodeAlloc` traits and `decode`/`decode_alloc`.
//! - [`arena`] — `Decoded<T>`, the owned arena+value handle.
//!
//! Enable the `derive` feature (on by default) for `#[derive(Pack)]` on your
//! own structs and enums.

pub mod arena;
pub mod decode;
pub mod encode;
pub mod error;
pub mod format;
pub mod io;
pub mod packable;

#[cfg(test)]
mod tests;

pub use arena::Decoded;
pub use decode::{decode, decode_alloc, Decode, DecodeAlloc};
pub use encode::{encode, encode_bounded, Bounded, Bytes, Encode, FixedBytes};
pub use error::{Error, InvalidReason, Result};
pub use format::Tag;
pub use packable::{
    opt_add, BytesFormat, EnumFormat, Packable, ProductLayout, Sentinel, SentinelArray,
    SentinelSlice, SentinelVec, SumLayout,
};

#[cfg(feature = "derive")]
pub use neomp_derive::Pack;

/// Re-exported so `#[derive(Pack)]`-generated `DecodeAlloc` impls can name
/// `bumpalo::Bump` without requiring downstream crates to depend on
/// `bumpalo` directly.
#[doc(hidden)]
pub use bumpalo;
