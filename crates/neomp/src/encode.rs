//! Encoding: the `Encode` trait, its primitive and wrapper-kind impls, and
//! the two public entry points (`encode`, `encode_bounded`).
//!
//! Every impl here picks the narrowest family the wire format allows for its
//! kind, writing the length/tag header before the payload — no backpatching,
//! since unlike a length-delimited TLV frame, MessagePack's headers carry
//! their length up front.

use crate::error::{Error, Result};
use crate::format::Tag;
use crate::io::Writer;
use crate::packable::{BytesFormat, Packable, Sentinel, SentinelArray, SentinelSlice, SentinelVec};

/// A host type that knows how to write itself as MessagePack.
pub trait Encode: Packable {
    /// Writes `self` to `w` using `opts`, returning the number of bytes
    /// written. `opts` must be the same value used to decode, or the
    /// result is unspecified.
    fn encode(&self, w: &mut Writer<'_>, opts: &Self::Options) -> Result<usize>;
}

pub fn write_array_header(w: &mut Writer<'_>, len: usize) -> Result<usize> {
    if len <= 15 {
        w.write_tag(Tag::FixArray(len as u8))?;
        Ok(1)
    } else if len <= u16::MAX as usize {
        w.write_tag(Tag::Array16)?;
        w.write_bytes(&(len as u16).to_be_bytes())?;
        Ok(3)
    } else if len <= u32::MAX as usize {
        w.write_tag(Tag::Array32)?;
        w.write_bytes(&(len as u32).to_be_bytes())?;
        Ok(5)
    } else {
        Err(Error::SliceLenTooLarge(len))
    }
}

pub fn write_map_header(w: &mut Writer<'_>, len: usize) -> Result<usize> {
    if len <= 15 {
        w.write_tag(Tag::FixMap(len as u8))?;
        Ok(1)
    } else if len <= u16::MAX as usize {
        w.write_tag(Tag::Map16)?;
        w.write_bytes(&(len as u16).to_be_bytes())?;
        Ok(3)
    } else if len <= u32::MAX as usize {
        w.write_tag(Tag::Map32)?;
        w.write_bytes(&(len as u32).to_be_bytes())?;
        Ok(5)
    } else {
        Err(Error::SliceLenTooLarge(len))
    }
}

pub fn write_str_header(w: &mut Writer<'_>, len: usize) -> Result<usize> {
    if len <= 31 {
        w.write_tag(Tag::FixStr(len as u8))?;
        Ok(1)
    } else if len <= u8::MAX as usize {
        w.write_tag(Tag::Str8)?;
        w.write_u8(len as u8)?;
        Ok(2)
    } else if len <= u16::MAX as usize {
        w.write_tag(Tag::Str16)?;
        w.write_bytes(&(len as u16).to_be_bytes())?;
        Ok(3)
    } else if len <= u32::MAX as usize {
        w.write_tag(Tag::Str32)?;
        w.write_bytes(&(len as u32).to_be_bytes())?;
        Ok(5)
    } else {
        Err(Error::SliceLenTooLarge(len))
    }
}

pub fn write_bin_header(w: &mut Writer<'_>, len: usize) -> Result<usize> {
    if len <= u8::MAX as usize {
        w.write_tag(Tag::Bin8)?;
        w.write_u8(len as u8)?;
        Ok(2)
    } else if len <= u16::MAX as usize {
        w.write_tag(Tag::Bin16)?;
        w.write_bytes(&(len as u16).to_be_bytes())?;
        Ok(3)
    } else if len <= u32::MAX as usize {
        w.write_tag(Tag::Bin32)?;
        w.write_bytes(&(len as u32).to_be_bytes())?;
        Ok(5)
    } else {
        Err(Error::SliceLenTooLarge(len))
    }
}

/// Writes a product/sum map-layout entry's key: a field or variant name,
/// always as `str` regardless of any `BytesFormat` choice (keys are never
/// user data). Used by `#[derive(Pack)]`-generated code.
pub fn write_key(w: &mut Writer<'_>, name: &str) -> Result<usize> {
    let mut n = write_str_header(w, name.len())?;
    w.write_bytes(name.as_bytes())?;
    n += name.len();
    Ok(n)
}

/// Writes `bytes` under the family selected by `fmt` — the bin/str/array
/// choice available for `element = u8`. `Array` falls back to the
/// generic per-element path — one `Uint8` per byte — for consistency with
/// "any other element type forces array".
pub(crate) fn encode_byte_blob(bytes: &[u8], fmt: BytesFormat, w: &mut Writer<'_>) -> Result<usize> {
    match fmt {
        BytesFormat::Str => {
            let mut n = write_str_header(w, bytes.len())?;
            w.write_bytes(bytes)?;
            n += bytes.len();
            Ok(n)
        }
        BytesFormat::Bin => {
            let mut n = write_bin_header(w, bytes.len())?;
            w.write_bytes(bytes)?;
            n += bytes.len();
            Ok(n)
        }
        BytesFormat::Array => {
            let mut n = write_array_header(w, bytes.len())?;
            for b in bytes {
                n += b.encode(w, &())?;
            }
            Ok(n)
        }
    }
}

macro_rules! impl_uint {
    ($ty:ty, $tag:ident) => {
        impl Packable for $ty {
            type Options = ();
            const CONTAINS_VARIABLE_LENGTH: bool = false;
            const REQUIRES_ALLOC: bool = false;
            const MAX_ENCODED_SIZE: Option<usize> = Some(1 + core::mem::size_of::<$ty>());
            fn default_options() -> Self::Options {}
        }
        impl Encode for $ty {
            fn encode(&self, w: &mut Writer<'_>, _opts: &()) -> Result<usize> {
                w.write_tag(Tag::$tag)?;
                w.write_bytes(&self.to_be_bytes())?;
                Ok(1 + core::mem::size_of::<$ty>())
            }
        }
    };
}

macro_rules! impl_int {
    ($ty:ty, $tag:ident) => {
        impl Packable for $ty {
            type Options = ();
            const CONTAINS_VARIABLE_LENGTH: bool = false;
            const REQUIRES_ALLOC: bool = false;
            const MAX_ENCODED_SIZE: Option<usize> = Some(1 + core::mem::size_of::<$ty>());
            fn default_options() -> Self::Options {}
        }
        impl Encode for $ty {
            fn encode(&self, w: &mut Writer<'_>, _opts: &()) -> Result<usize> {
                w.write_tag(Tag::$tag)?;
                w.write_bytes(&self.to_be_bytes())?;
                Ok(1 + core::mem::size_of::<$ty>())
            }
        }
    };
}

// Rust has no integer type narrower than 8 bits, so every native width we
// have lands one bucket past the fixint thresholds: this crate's encoder
// never emits a fixint for any of these types (see DESIGN.md OQ-1). They
// remain fully decodable from a hand-written fixint byte all the same.
impl_uint!(u8, Uint8);
impl_uint!(u16, Uint16);
impl_uint!(u32, Uint32);
impl_uint!(u64, Uint64);
impl_int!(i8, Int8);
impl_int!(i16, Int16);
impl_int!(i32, Int32);
impl_int!(i64, Int64);

impl Packable for bool {
    type Options = ();
    const CONTAINS_VARIABLE_LENGTH: bool = false;
    const REQUIRES_ALLOC: bool = false;
    const MAX_ENCODED_SIZE: Option<usize> = Some(1);
    fn default_options() -> Self::Options {}
}

impl Encode for bool {
    fn encode(&self, w: &mut Writer<'_>, _opts: &()) -> Result<usize> {
        w.write_tag(if *self { Tag::True } else { Tag::False })?;
        Ok(1)
    }
}

impl Packable for f32 {
    type Options = ();
    const CONTAINS_VARIABLE_LENGTH: bool = false;
    const REQUIRES_ALLOC: bool = false;
    const MAX_ENCODED_SIZE: Option<usize> = Some(5);
    fn default_options() -> Self::Options {}
}

impl Encode for f32 {
    fn encode(&self, w: &mut Writer<'_>, _opts: &()) -> Result<usize> {
        w.write_tag(Tag::Float32)?;
        w.write_bytes(&self.to_be_bytes())?;
        Ok(5)
    }
}

impl Packable for f64 {
    type Options = ();
    const CONTAINS_VARIABLE_LENGTH: bool = false;
    const REQUIRES_ALLOC: bool = false;
    const MAX_ENCODED_SIZE: Option<usize> = Some(9);
    fn default_options() -> Self::Options {}
}

impl Encode for f64 {
    fn encode(&self, w: &mut Writer<'_>, _opts: &()) -> Result<usize> {
        w.write_tag(Tag::Float64)?;
        w.write_bytes(&self.to_be_bytes())?;
        Ok(9)
    }
}

impl<T: Packable> Packable for Option<T> {
    type Options = T::Options;
    const CONTAINS_VARIABLE_LENGTH: bool = T::CONTAINS_VARIABLE_LENGTH;
    const REQUIRES_ALLOC: bool = T::REQUIRES_ALLOC;
    const MAX_ENCODED_SIZE: Option<usize> = match T::MAX_ENCODED_SIZE {
        // `nil` costs one byte; an empty product costs zero, so the bound
        // must cover whichever of the two is larger.
        Some(inner) => Some(if inner > 1 { inner } else { 1 }),
        None => None,
    };
    fn default_options() -> Self::Options {
        T::default_options()
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, w: &mut Writer<'_>, opts: &T::Options) -> Result<usize> {
        match self {
            Some(v) => v.encode(w, opts),
            None => {
                w.write_tag(Tag::Nil)?;
                Ok(1)
            }
        }
    }
}

impl<T: Packable, const N: usize> Packable for [T; N] {
    type Options = T::Options;
    const CONTAINS_VARIABLE_LENGTH: bool = T::CONTAINS_VARIABLE_LENGTH;
    const REQUIRES_ALLOC: bool = T::REQUIRES_ALLOC;
    const MAX_ENCODED_SIZE: Option<usize> = match T::MAX_ENCODED_SIZE {
        Some(elem) => Some(5 + elem.saturating_mul(N)),
        None => None,
    };
    fn default_options() -> Self::Options {
        T::default_options()
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, w: &mut Writer<'_>, opts: &T::Options) -> Result<usize> {
        let mut n = write_array_header(w, N)?;
        for item in self {
            n += item.encode(w, opts)?;
        }
        Ok(n)
    }
}

impl<T: Packable, const N: usize> Packable for SentinelArray<T, N> {
    type Options = T::Options;
    const CONTAINS_VARIABLE_LENGTH: bool = T::CONTAINS_VARIABLE_LENGTH;
    const REQUIRES_ALLOC: bool = T::REQUIRES_ALLOC;
    const MAX_ENCODED_SIZE: Option<usize> = match T::MAX_ENCODED_SIZE {
        Some(elem) => Some(5 + elem.saturating_mul(N + 1)),
        None => None,
    };
    fn default_options() -> Self::Options {
        T::default_options()
    }
}

impl<T: Encode + Sentinel, const N: usize> Encode for SentinelArray<T, N> {
    fn encode(&self, w: &mut Writer<'_>, opts: &T::Options) -> Result<usize> {
        let mut n = write_array_header(w, N + 1)?;
        for item in &self.items {
            n += item.encode(w, opts)?;
        }
        n += T::SENTINEL.encode(w, opts)?;
        Ok(n)
    }
}

impl<T: Packable> Packable for Vec<T> {
    type Options = T::Options;
    const CONTAINS_VARIABLE_LENGTH: bool = true;
    const REQUIRES_ALLOC: bool = true;
    const MAX_ENCODED_SIZE: Option<usize> = None;
    fn default_options() -> Self::Options {
        T::default_options()
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, w: &mut Writer<'_>, opts: &T::Options) -> Result<usize> {
        if self.len() > u32::MAX as usize {
            return Err(Error::SliceLenTooLarge(self.len()));
        }
        let mut n = write_array_header(w, self.len())?;
        for item in self {
            n += item.encode(w, opts)?;
        }
        Ok(n)
    }
}

impl<T: Packable> Packable for SentinelVec<T> {
    type Options = T::Options;
    const CONTAINS_VARIABLE_LENGTH: bool = true;
    const REQUIRES_ALLOC: bool = true;
    const MAX_ENCODED_SIZE: Option<usize> = None;
    fn default_options() -> Self::Options {
        T::default_options()
    }
}

impl<T: Encode + Sentinel> Encode for SentinelVec<T> {
    fn encode(&self, w: &mut Writer<'_>, opts: &T::Options) -> Result<usize> {
        let len = self
            .items
            .len()
            .checked_add(1)
            .filter(|n| *n <= u32::MAX as usize)
            .ok_or(Error::SliceLenTooLarge(self.items.len()))?;
        let mut n = write_array_header(w, len)?;
        for item in &self.items {
            n += item.encode(w, opts)?;
        }
        n += T::SENTINEL.encode(w, opts)?;
        Ok(n)
    }
}

impl<'a, T: Packable> Packable for &'a [T] {
    type Options = T::Options;
    const CONTAINS_VARIABLE_LENGTH: bool = true;
    const REQUIRES_ALLOC: bool = false;
    const MAX_ENCODED_SIZE: Option<usize> = None;
    fn default_options() -> Self::Options {
        T::default_options()
    }
}

impl<'a, T: Encode> Encode for &'a [T] {
    fn encode(&self, w: &mut Writer<'_>, opts: &T::Options) -> Result<usize> {
        if self.len() > u32::MAX as usize {
            return Err(Error::SliceLenTooLarge(self.len()));
        }
        let mut n = write_array_header(w, self.len())?;
        for item in self.iter() {
            n += item.encode(w, opts)?;
        }
        Ok(n)
    }
}

impl<'a, T: Packable> Packable for SentinelSlice<'a, T> {
    type Options = T::Options;
    const CONTAINS_VARIABLE_LENGTH: bool = true;
    const REQUIRES_ALLOC: bool = false;
    const MAX_ENCODED_SIZE: Option<usize> = None;
    fn default_options() -> Self::Options {
        T::default_options()
    }
}

impl<'a, T: Encode + Sentinel> Encode for SentinelSlice<'a, T> {
    fn encode(&self, w: &mut Writer<'_>, opts: &T::Options) -> Result<usize> {
        let len = self
            .items
            .len()
            .checked_add(1)
            .filter(|n| *n <= u32::MAX as usize)
            .ok_or(Error::SliceLenTooLarge(self.items.len()))?;
        let mut n = write_array_header(w, len)?;
        for item in self.items.iter() {
            n += item.encode(w, opts)?;
        }
        n += T::SENTINEL.encode(w, opts)?;
        Ok(n)
    }
}

impl Packable for String {
    type Options = BytesFormat;
    const CONTAINS_VARIABLE_LENGTH: bool = true;
    const REQUIRES_ALLOC: bool = true;
    const MAX_ENCODED_SIZE: Option<usize> = None;
    fn default_options() -> Self::Options {
        BytesFormat::Str
    }
}

impl Encode for String {
    fn encode(&self, w: &mut Writer<'_>, opts: &BytesFormat) -> Result<usize> {
        encode_byte_blob(self.as_bytes(), *opts, w)
    }
}

impl<'a> Packable for &'a str {
    type Options = BytesFormat;
    const CONTAINS_VARIABLE_LENGTH: bool = true;
    const REQUIRES_ALLOC: bool = false;
    const MAX_ENCODED_SIZE: Option<usize> = None;
    fn default_options() -> Self::Options {
        BytesFormat::Str
    }
}

impl<'a> Encode for &'a str {
    fn encode(&self, w: &mut Writer<'_>, opts: &BytesFormat) -> Result<usize> {
        encode_byte_blob(self.as_bytes(), *opts, w)
    }
}

/// A variable-length byte blob, encoded/decoded as `bin`, `str`, or `array`
/// per `Options` — the non-overlapping stand-in for a blanket `Vec<u8>` impl
/// (see DESIGN.md OQ-6), the same role `serde_bytes::ByteBuf` plays for `serde`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bytes(pub Vec<u8>);

impl Packable for Bytes {
    type Options = BytesFormat;
    const CONTAINS_VARIABLE_LENGTH: bool = true;
    const REQUIRES_ALLOC: bool = true;
    const MAX_ENCODED_SIZE: Option<usize> = None;
    fn default_options() -> Self::Options {
        BytesFormat::Str
    }
}

impl Encode for Bytes {
    fn encode(&self, w: &mut Writer<'_>, opts: &BytesFormat) -> Result<usize> {
        encode_byte_blob(&self.0, *opts, w)
    }
}

/// A fixed-length byte blob, encoded/decoded as `bin`, `str`, or `array` per
/// `Options` — the non-overlapping stand-in for a blanket `[u8; N]` impl
/// (see DESIGN.md OQ-6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBytes<const N: usize>(pub [u8; N]);

impl<const N: usize> Packable for FixedBytes<N> {
    type Options = BytesFormat;
    const CONTAINS_VARIABLE_LENGTH: bool = false;
    const REQUIRES_ALLOC: bool = false;
    // `Array` is the worst case: every byte costs a 2-byte Uint8 item.
    const MAX_ENCODED_SIZE: Option<usize> = Some(5 + 2 * N);
    fn default_options() -> Self::Options {
        BytesFormat::Str
    }
}

impl<const N: usize> Encode for FixedBytes<N> {
    fn encode(&self, w: &mut Writer<'_>, opts: &BytesFormat) -> Result<usize> {
        encode_byte_blob(&self.0, *opts, w)
    }
}

/// The fixed-capacity output of `encode_bounded`: the written prefix of an
/// `N`-byte stack buffer.
pub struct Bounded<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> Bounded<N> {
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Encodes `value` into the caller-provided `out` buffer, returning the
/// number of bytes written.
pub fn encode<T: Encode>(value: &T, opts: &T::Options, out: &mut [u8]) -> Result<usize> {
    let mut w = Writer::new(out);
    value.encode(&mut w, opts)
}

/// Encodes `value` into a fresh, stack-allocated `N`-byte buffer.
///
/// `N` must be at least `T::MAX_ENCODED_SIZE`, and `T` must have no
/// variable-length subterm — both checked at monomorphization time via a
/// `const` block, not at runtime (see DESIGN.md OQ-3).
pub fn encode_bounded<T: Encode, const N: usize>(
    value: &T,
    opts: &T::Options,
) -> Result<Bounded<N>> {
    const {
        assert!(
            !T::CONTAINS_VARIABLE_LENGTH,
            "encode_bounded requires a type with no variable-length subterm"
        );
        let max = match T::MAX_ENCODED_SIZE {
            Some(n) => n,
            None => usize::MAX,
        };
        assert!(N >= max, "N is smaller than T::MAX_ENCODED_SIZE");
    };
    let mut buf = [0u8; N];
    let len = {
        let mut w = Writer::new(&mut buf);
        value.encode(&mut w, opts)?
    };
    Ok(Bounded { buf, len })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packable::ProductLayout;

    #[test]
    fn uint8_never_emits_fixint() {
        let mut buf = [0u8; 4];
        let n = encode(&7u8, &(), &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0xCC, 7]);
    }

    #[test]
    fn bool_true_is_c3() {
        let mut buf = [0u8; 1];
        let n = encode(&true, &(), &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0xC3]);
    }

    #[test]
    fn str_encodes_as_fixstr() {
        let mut buf = [0u8; 8];
        let n = encode(&"foo".to_string(), &BytesFormat::Str, &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0xA3, b'f', b'o', b'o']);
    }

    #[test]
    fn bytes_as_bin_uses_bin8() {
        let mut buf = [0u8; 8];
        let n = encode(&Bytes(vec![1, 2, 3]), &BytesFormat::Bin, &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0xC4, 3, 1, 2, 3]);
    }

    #[test]
    fn encode_bounded_rejects_undersized_n_at_compile_time() {
        // A `u32` needs 5 bytes; `encode_bounded::<u32, 5>` is the minimum
        // that compiles. This test only exercises the happy path — the
        // failing case is a compile error, not something a unit test runs.
        let b = encode_bounded::<u32, 5>(&42u32, &()).unwrap();
        assert_eq!(b.as_bytes(), &[0xCE, 0, 0, 0, 42]);
    }

    #[test]
    fn vec_of_u16_is_array_of_uint16() {
        let mut buf = [0u8; 16];
        let n = encode(&vec![1u16, 2u16], &(), &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0x92, 0xCD, 0, 1, 0xCD, 0, 2]);
    }

    #[test]
    fn option_none_is_nil() {
        let mut buf = [0u8; 1];
        let n = encode::<Option<u8>>(&None, &(), &mut buf).unwrap();
        assert_eq!(&buf[..n], &[0xC0]);
    }

    #[test]
    fn product_layout_default_is_map() {
        assert_eq!(ProductLayout::default(), ProductLayout::Map);
    }
}
