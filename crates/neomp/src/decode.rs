//! Decoding: the non-allocating `Decode` trait, the arena-aware
//! `DecodeAlloc` trait, and the two public entry points (`decode`,
//! `decode_alloc`).
//!
//! A type decodes without an allocator (`Decode`) exactly when
//! `Packable::REQUIRES_ALLOC` is `false`. Every non-allocating type also
//! implements `DecodeAlloc` as a pass-through (no single blanket impl can
//! do this — see the note above `impl_decode_alloc_passthrough!` below —
//! so each one is spelled out individually), so callers never need to know
//! which one a generic `T` has. Types that *do* need allocation (`Vec<T>`,
//! `String`, `Box<T>`, their sentinel variants) implement `DecodeAlloc`
//! directly, producing an arena-borrowed output type distinct from their
//! encode-side counterpart (see DESIGN.md OQ-4).

use crate::error::{Error, InvalidReason, Result};
use crate::format::Tag;
use crate::io::Reader;
use crate::packable::{BytesFormat, Packable, Sentinel, SentinelArray, SentinelSlice, SentinelVec};

/// A host type that can be read back out of a byte slice without an
/// allocator.
pub trait Decode: Packable {
    fn decode(r: &mut Reader<'_>, opts: &Self::Options) -> Result<Self>;
}

/// A host type that can be read back out of a byte slice given an arena to
/// allocate its dynamic parts from. `Output` is the decoded representation —
/// the same as `Self` for non-allocating types, an arena-borrowed sibling
/// type (`&'arena T`, `&'arena [T]`, ...) for the rest.
pub trait DecodeAlloc<'arena>: Packable {
    type Output;

    fn decode_alloc(
        r: &mut Reader<'_>,
        opts: &Self::Options,
        arena: &'arena bumpalo::Bump,
    ) -> Result<Self::Output>;
}

fn expect_tag(r: &mut Reader<'_>, want: Tag, expected_name: &'static str) -> Result<()> {
    let tag = r.read_tag()?;
    if tag == want {
        Ok(())
    } else {
        Err(Error::Invalid(InvalidReason::WrongFormat {
            expected: expected_name,
            found: tag,
        }))
    }
}

pub fn read_array_header(r: &mut Reader<'_>) -> Result<usize> {
    match r.read_tag()? {
        Tag::FixArray(n) => Ok(n as usize),
        Tag::Array16 => Ok(u16::from_be_bytes(r.read_array()?) as usize),
        Tag::Array32 => Ok(u32::from_be_bytes(r.read_array()?) as usize),
        found => Err(Error::Invalid(InvalidReason::WrongFormat {
            expected: "array",
            found,
        })),
    }
}

pub fn read_map_header(r: &mut Reader<'_>) -> Result<usize> {
    match r.read_tag()? {
        Tag::FixMap(n) => Ok(n as usize),
        Tag::Map16 => Ok(u16::from_be_bytes(r.read_array()?) as usize),
        Tag::Map32 => Ok(u32::from_be_bytes(r.read_array()?) as usize),
        found => Err(Error::Invalid(InvalidReason::WrongFormat {
            expected: "map",
            found,
        })),
    }
}

fn read_str_bytes<'a>(r: &mut Reader<'a>) -> Result<&'a [u8]> {
    let len = match r.read_tag()? {
        Tag::FixStr(n) => n as usize,
        Tag::Str8 => r.read_u8()? as usize,
        Tag::Str16 => u16::from_be_bytes(r.read_array()?) as usize,
        Tag::Str32 => u32::from_be_bytes(r.read_array()?) as usize,
        found => {
            return Err(Error::Invalid(InvalidReason::WrongFormat {
                expected: "str",
                found,
            }));
        }
    };
    r.read_bytes(len)
}

fn read_bin_bytes<'a>(r: &mut Reader<'a>) -> Result<&'a [u8]> {
    let len = match r.read_tag()? {
        Tag::Bin8 => r.read_u8()? as usize,
        Tag::Bin16 => u16::from_be_bytes(r.read_array()?) as usize,
        Tag::Bin32 => u32::from_be_bytes(r.read_array()?) as usize,
        found => {
            return Err(Error::Invalid(InvalidReason::WrongFormat {
                expected: "bin",
                found,
            }));
        }
    };
    r.read_bytes(len)
}

/// Reads a field/variant/enum name: any `str` or `bin` family is accepted
/// (§4.4 — a name is written as `str` by `encode::write_key`, but a name on
/// the wire from another encoder may legally arrive as `bin`).
fn read_name_bytes<'a>(r: &mut Reader<'a>) -> Result<&'a [u8]> {
    match r.peek_tag()? {
        Tag::Bin8 | Tag::Bin16 | Tag::Bin32 => read_bin_bytes(r),
        _ => read_str_bytes(r),
    }
}

/// Reads a product/sum map-layout entry's key, or an enum-str variant name.
/// Used by `#[derive(Pack)]`-generated code.
pub fn read_key<'a>(r: &mut Reader<'a>) -> Result<&'a [u8]> {
    read_name_bytes(r)
}

/// Reads a byte blob written under any of the three families `BytesFormat`
/// allows, without requiring the reader to know ahead of time which one was
/// used — the wire tag alone disambiguates. `Array` is only accepted when
/// every element decodes as a plain `Uint8`.
fn read_byte_blob_any<'a>(r: &mut Reader<'a>) -> Result<Vec<u8>> {
    match r.peek_tag()? {
        Tag::FixStr(_) | Tag::Str8 | Tag::Str16 | Tag::Str32 => {
            Ok(read_str_bytes(r)?.to_vec())
        }
        Tag::Bin8 | Tag::Bin16 | Tag::Bin32 => Ok(read_bin_bytes(r)?.to_vec()),
        Tag::FixArray(_) | Tag::Array16 | Tag::Array32 => {
            let len = read_array_header(r)?;
            let mut out = Vec::with_capacity(len);
            for _ in 0..len {
                out.push(u8::decode(r, &())?);
            }
            Ok(out)
        }
        found => Err(Error::Invalid(InvalidReason::WrongFormat {
            expected: "bin, str, or array",
            found,
        })),
    }
}

/// Reads any integer-family tag (fixint, `uint_*`, `int_*`) and returns its
/// mathematical value. The wire tag's width need not match the host type's:
/// a `u8` field happily decodes a `uint_64`-tagged `3` or a positive fixint,
/// as long as the value narrows — `i128` is wide enough to hold every value
/// any of these tags can carry.
fn read_wire_integer(r: &mut Reader<'_>) -> Result<i128> {
    match r.read_tag()? {
        Tag::PosFixInt(v) => Ok(v as i128),
        Tag::NegFixInt(v) => Ok(v as i128),
        Tag::Uint8 => Ok(r.read_u8()? as i128),
        Tag::Uint16 => Ok(u16::from_be_bytes(r.read_array()?) as i128),
        Tag::Uint32 => Ok(u32::from_be_bytes(r.read_array()?) as i128),
        Tag::Uint64 => Ok(u64::from_be_bytes(r.read_array()?) as i128),
        Tag::Int8 => Ok(i8::from_be_bytes(r.read_array()?) as i128),
        Tag::Int16 => Ok(i16::from_be_bytes(r.read_array()?) as i128),
        Tag::Int32 => Ok(i32::from_be_bytes(r.read_array()?) as i128),
        Tag::Int64 => Ok(i64::from_be_bytes(r.read_array()?) as i128),
        found => Err(Error::Invalid(InvalidReason::WrongFormat {
            expected: "integer",
            found,
        })),
    }
}

macro_rules! impl_decode_int {
    ($ty:ty) => {
        impl Decode for $ty {
            fn decode(r: &mut Reader<'_>, _opts: &()) -> Result<Self> {
                let v = read_wire_integer(r)?;
                <$ty>::try_from(v).map_err(|_| Error::Invalid(InvalidReason::Narrowing))
            }
        }
    };
}

impl_decode_int!(u8);
impl_decode_int!(u16);
impl_decode_int!(u32);
impl_decode_int!(u64);
impl_decode_int!(i8);
impl_decode_int!(i16);
impl_decode_int!(i32);
impl_decode_int!(i64);

impl Decode for bool {
    fn decode(r: &mut Reader<'_>, _opts: &()) -> Result<Self> {
        match r.read_tag()? {
            Tag::True => Ok(true),
            Tag::False => Ok(false),
            found => Err(Error::Invalid(InvalidReason::WrongFormat {
                expected: "bool",
                found,
            })),
        }
    }
}

impl Decode for f32 {
    fn decode(r: &mut Reader<'_>, _opts: &()) -> Result<Self> {
        expect_tag(r, Tag::Float32, "f32")?;
        Ok(f32::from_be_bytes(r.read_array()?))
    }
}

impl Decode for f64 {
    fn decode(r: &mut Reader<'_>, _opts: &()) -> Result<Self> {
        expect_tag(r, Tag::Float64, "f64")?;
        Ok(f64::from_be_bytes(r.read_array()?))
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(r: &mut Reader<'_>, opts: &T::Options) -> Result<Self> {
        if r.peek_tag()? == Tag::Nil {
            r.read_tag()?;
            Ok(None)
        } else {
            Ok(Some(T::decode(r, opts)?))
        }
    }
}

fn decode_fixed<T>(
    r: &mut Reader<'_>,
    n_extra: usize,
    mut next: impl FnMut(&mut Reader<'_>) -> Result<T>,
) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(n_extra);
    for _ in 0..n_extra {
        out.push(next(r)?);
    }
    Ok(out)
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode(r: &mut Reader<'_>, opts: &T::Options) -> Result<Self> {
        let len = read_array_header(r)?;
        if len != N {
            return Err(Error::Invalid(InvalidReason::LengthMismatch {
                expected: N,
                found: len,
            }));
        }
        let items = decode_fixed(r, N, |r| T::decode(r, opts))?;
        items
            .try_into()
            .map_err(|_| unreachable!("decode_fixed returns exactly N items"))
    }
}

impl<T: Decode + Sentinel, const N: usize> Decode for SentinelArray<T, N> {
    fn decode(r: &mut Reader<'_>, opts: &T::Options) -> Result<Self> {
        let len = read_array_header(r)?;
        if len != N + 1 {
            return Err(Error::Invalid(InvalidReason::LengthMismatch {
                expected: N + 1,
                found: len,
            }));
        }
        let items: [T; N] = decode_fixed(r, N, |r| T::decode(r, opts))?
            .try_into()
            .map_err(|_| unreachable!("decode_fixed returns exactly N items"))?;
        let trailing = T::decode(r, opts)?;
        if trailing != T::SENTINEL {
            return Err(Error::Invalid(InvalidReason::SentinelMismatch));
        }
        Ok(SentinelArray { items })
    }
}

impl Decode for String {
    fn decode(r: &mut Reader<'_>, opts: &BytesFormat) -> Result<Self> {
        let bytes = match opts {
            BytesFormat::Str => read_str_bytes(r)?.to_vec(),
            BytesFormat::Bin => read_bin_bytes(r)?.to_vec(),
            BytesFormat::Array => read_byte_blob_any(r)?,
        };
        String::from_utf8(bytes).map_err(|_| Error::Invalid(InvalidReason::Utf8))
    }
}

/// A variable-length byte blob, the non-allocating decode-side counterpart
/// of [`crate::encode::Bytes`].
impl Decode for crate::encode::Bytes {
    fn decode(r: &mut Reader<'_>, opts: &BytesFormat) -> Result<Self> {
        let bytes = match opts {
            BytesFormat::Bin => read_bin_bytes(r)?.to_vec(),
            BytesFormat::Str => read_str_bytes(r)?.to_vec(),
            BytesFormat::Array => read_byte_blob_any(r)?,
        };
        Ok(crate::encode::Bytes(bytes))
    }
}

impl<const N: usize> Decode for crate::encode::FixedBytes<N> {
    fn decode(r: &mut Reader<'_>, opts: &BytesFormat) -> Result<Self> {
        let bytes = match opts {
            BytesFormat::Bin => read_bin_bytes(r)?.to_vec(),
            BytesFormat::Str => read_str_bytes(r)?.to_vec(),
            BytesFormat::Array => read_byte_blob_any(r)?,
        };
        let arr: [u8; N] = bytes.try_into().map_err(|v: Vec<u8>| {
            Error::Invalid(InvalidReason::LengthMismatch {
                expected: N,
                found: v.len(),
            })
        })?;
        Ok(crate::encode::FixedBytes(arr))
    }
}

// A blanket `impl<T: Decode> DecodeAlloc for T` would structurally overlap
// with the dedicated `Box<T>`/`Vec<T>`/`String` impls below (a bare `T`
// pattern unifies with anything), so each non-allocating type gets its own
// pass-through `DecodeAlloc` instead — the same non-overlap discipline as
// `Bytes`/`FixedBytes<N>` in encode.rs (DESIGN.md OQ-6).
macro_rules! impl_decode_alloc_passthrough {
    ($ty:ty) => {
        impl<'arena> DecodeAlloc<'arena> for $ty {
            type Output = $ty;

            fn decode_alloc(
                r: &mut Reader<'_>,
                opts: &Self::Options,
                _arena: &'arena bumpalo::Bump,
            ) -> Result<Self::Output> {
                <$ty as Decode>::decode(r, opts)
            }
        }
    };
}

impl_decode_alloc_passthrough!(u8);
impl_decode_alloc_passthrough!(u16);
impl_decode_alloc_passthrough!(u32);
impl_decode_alloc_passthrough!(u64);
impl_decode_alloc_passthrough!(i8);
impl_decode_alloc_passthrough!(i16);
impl_decode_alloc_passthrough!(i32);
impl_decode_alloc_passthrough!(i64);
impl_decode_alloc_passthrough!(bool);
impl_decode_alloc_passthrough!(f32);
impl_decode_alloc_passthrough!(f64);

impl<'arena, const N: usize> DecodeAlloc<'arena> for crate::encode::FixedBytes<N> {
    type Output = crate::encode::FixedBytes<N>;

    fn decode_alloc(
        r: &mut Reader<'_>,
        opts: &BytesFormat,
        _arena: &'arena bumpalo::Bump,
    ) -> Result<Self::Output> {
        <crate::encode::FixedBytes<N> as Decode>::decode(r, opts)
    }
}

impl<'arena, T: DecodeAlloc<'arena>> DecodeAlloc<'arena> for Option<T> {
    type Output = Option<T::Output>;

    fn decode_alloc(
        r: &mut Reader<'_>,
        opts: &T::Options,
        arena: &'arena bumpalo::Bump,
    ) -> Result<Self::Output> {
        if r.peek_tag()? == Tag::Nil {
            r.read_tag()?;
            Ok(None)
        } else {
            Ok(Some(T::decode_alloc(r, opts, arena)?))
        }
    }
}

impl<'arena, T: DecodeAlloc<'arena>, const N: usize> DecodeAlloc<'arena> for [T; N] {
    type Output = [T::Output; N];

    fn decode_alloc(
        r: &mut Reader<'_>,
        opts: &T::Options,
        arena: &'arena bumpalo::Bump,
    ) -> Result<Self::Output> {
        let len = read_array_header(r)?;
        if len != N {
            return Err(Error::Invalid(InvalidReason::LengthMismatch {
                expected: N,
                found: len,
            }));
        }
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::decode_alloc(r, opts, arena)?);
        }
        items
            .try_into()
            .map_err(|_| unreachable!("decode_alloc loop pushes exactly N items"))
    }
}

impl<'arena, T, const N: usize> DecodeAlloc<'arena> for SentinelArray<T, N>
where
    T: DecodeAlloc<'arena> + Sentinel,
    T::Output: PartialEq<T>,
{
    type Output = SentinelArray<T::Output, N>;

    fn decode_alloc(
        r: &mut Reader<'_>,
        opts: &T::Options,
        arena: &'arena bumpalo::Bump,
    ) -> Result<Self::Output> {
        let len = read_array_header(r)?;
        if len != N + 1 {
            return Err(Error::Invalid(InvalidReason::LengthMismatch {
                expected: N + 1,
                found: len,
            }));
        }
        let mut raw = Vec::with_capacity(N);
        for _ in 0..N {
            raw.push(T::decode_alloc(r, opts, arena)?);
        }
        let items: [T::Output; N] = raw
            .try_into()
            .map_err(|_| unreachable!("decode_alloc loop pushes exactly N items"))?;
        let trailing = T::decode_alloc(r, opts, arena)?;
        if trailing != T::SENTINEL {
            return Err(Error::Invalid(InvalidReason::SentinelMismatch));
        }
        Ok(SentinelArray { items })
    }
}

/// An owning pointer: decodes to an arena-allocated, arena-borrowed
/// reference (see DESIGN.md OQ-4).
impl<T: Packable> Packable for Box<T> {
    type Options = T::Options;
    const CONTAINS_VARIABLE_LENGTH: bool = T::CONTAINS_VARIABLE_LENGTH;
    const REQUIRES_ALLOC: bool = true;
    const MAX_ENCODED_SIZE: Option<usize> = T::MAX_ENCODED_SIZE;
    fn default_options() -> Self::Options {
        T::default_options()
    }
}

impl<T: crate::encode::Encode> crate::encode::Encode for Box<T> {
    fn encode(
        &self,
        w: &mut crate::io::Writer<'_>,
        opts: &T::Options,
    ) -> Result<usize> {
        (**self).encode(w, opts)
    }
}

impl<'arena, T: DecodeAlloc<'arena>> DecodeAlloc<'arena> for Box<T> {
    type Output = &'arena T::Output;

    fn decode_alloc(
        r: &mut Reader<'_>,
        opts: &Self::Options,
        arena: &'arena bumpalo::Bump,
    ) -> Result<Self::Output> {
        let value = T::decode_alloc(r, opts, arena)?;
        Ok(arena.alloc(value))
    }
}

/// A variable-length sequence: decodes to an arena-allocated, arena-borrowed
/// slice.
impl<'arena, T: DecodeAlloc<'arena>> DecodeAlloc<'arena> for Vec<T> {
    type Output = &'arena [T::Output];

    fn decode_alloc(
        r: &mut Reader<'_>,
        opts: &Self::Options,
        arena: &'arena bumpalo::Bump,
    ) -> Result<Self::Output> {
        let len = read_array_header(r)?;
        let mut items = bumpalo::collections::Vec::with_capacity_in(len, arena);
        for _ in 0..len {
            items.push(T::decode_alloc(r, opts, arena)?);
        }
        Ok(items.into_bump_slice())
    }
}

impl<'arena, T> DecodeAlloc<'arena> for SentinelVec<T>
where
    T: DecodeAlloc<'arena> + Sentinel,
    T::Output: PartialEq<T>,
{
    type Output = SentinelSlice<'arena, T::Output>;

    fn decode_alloc(
        r: &mut Reader<'_>,
        opts: &Self::Options,
        arena: &'arena bumpalo::Bump,
    ) -> Result<Self::Output> {
        let len = read_array_header(r)?;
        if len == 0 {
            return Err(Error::Invalid(InvalidReason::LengthMismatch {
                expected: 1,
                found: 0,
            }));
        }
        let mut items = bumpalo::collections::Vec::with_capacity_in(len - 1, arena);
        for _ in 0..len - 1 {
            items.push(T::decode_alloc(r, opts, arena)?);
        }
        let trailing = T::decode_alloc(r, opts, arena)?;
        if trailing != T::SENTINEL {
            return Err(Error::Invalid(InvalidReason::SentinelMismatch));
        }
        Ok(SentinelSlice {
            items: items.into_bump_slice(),
        })
    }
}

impl<'arena> DecodeAlloc<'arena> for String {
    type Output = &'arena str;

    fn decode_alloc(
        r: &mut Reader<'_>,
        opts: &BytesFormat,
        arena: &'arena bumpalo::Bump,
    ) -> Result<Self::Output> {
        let bytes = match opts {
            BytesFormat::Str => read_str_bytes(r)?.to_vec(),
            BytesFormat::Bin => read_bin_bytes(r)?.to_vec(),
            BytesFormat::Array => read_byte_blob_any(r)?,
        };
        let s = core::str::from_utf8(&bytes).map_err(|_| Error::Invalid(InvalidReason::Utf8))?;
        Ok(arena.alloc_str(s))
    }
}

impl<'arena> DecodeAlloc<'arena> for crate::encode::Bytes {
    type Output = &'arena [u8];

    fn decode_alloc(
        r: &mut Reader<'_>,
        opts: &BytesFormat,
        arena: &'arena bumpalo::Bump,
    ) -> Result<Self::Output> {
        let bytes = match opts {
            BytesFormat::Bin => read_bin_bytes(r)?.to_vec(),
            BytesFormat::Str => read_str_bytes(r)?.to_vec(),
            BytesFormat::Array => read_byte_blob_any(r)?,
        };
        Ok(arena.alloc_slice_copy(&bytes))
    }
}

/// Decodes a complete, self-contained value: the whole of `buf` must be
/// consumed, or `Error::Invalid(InvalidReason::TrailingBytes(_))` is
/// returned.
pub fn decode<T: Decode>(buf: &[u8], opts: &T::Options) -> Result<T> {
    let mut r = Reader::new(buf);
    let value = T::decode(&mut r, opts)?;
    if r.remaining() != 0 {
        return Err(Error::Invalid(InvalidReason::TrailingBytes(r.remaining())));
    }
    Ok(value)
}

/// Decodes a complete, self-contained value whose dynamic parts are
/// allocated from `arena`. Every pointer-typed part of the result borrows
/// from `arena`; dropping `arena` before the result invalidates it (a
/// borrow-checker error, not a runtime one — see DESIGN.md OQ-4).
pub fn decode_alloc<'arena, T: DecodeAlloc<'arena>>(
    buf: &[u8],
    opts: &T::Options,
    arena: &'arena bumpalo::Bump,
) -> Result<T::Output> {
    let mut r = Reader::new(buf);
    let value = T::decode_alloc(&mut r, opts, arena)?;
    if r.remaining() != 0 {
        return Err(Error::Invalid(InvalidReason::TrailingBytes(r.remaining())));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;

    #[test]
    fn uint8_round_trips() {
        let mut buf = [0u8; 8];
        let n = encode(&200u8, &(), &mut buf).unwrap();
        let v: u8 = decode(&buf[..n], &()).unwrap();
        assert_eq!(v, 200);
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut buf = [0u8; 8];
        let n = encode(&1u8, &(), &mut buf).unwrap();
        match decode::<u8>(&buf[..n + 1], &()) {
            Err(Error::Invalid(InvalidReason::TrailingBytes(1))) => {}
            other => panic!("expected TrailingBytes(1), got {other:?}"),
        }
    }

    #[test]
    fn truncated_input_is_unexpected_end() {
        let mut buf = [0u8; 8];
        let n = encode(&1000u32, &(), &mut buf).unwrap();
        match decode::<u32>(&buf[..n - 1], &()) {
            Err(Error::Invalid(InvalidReason::UnexpectedEnd)) => {}
            other => panic!("expected UnexpectedEnd, got {other:?}"),
        }
    }

    #[test]
    fn wrong_format_is_rejected() {
        let mut buf = [0u8; 8];
        let n = encode(&true, &(), &mut buf).unwrap();
        match decode::<u32>(&buf[..n], &()) {
            Err(Error::Invalid(InvalidReason::WrongFormat { expected: "integer", .. })) => {}
            other => panic!("expected WrongFormat, got {other:?}"),
        }
    }

    /// The decoder accepts any integer-family tag, not just the host
    /// width's own — a `u64` field happily narrows a wire `fixint`/`uint8`.
    #[test]
    fn integer_decode_accepts_any_width_that_narrows() {
        let mut buf = [0u8; 8];
        let n = encode(&9u8, &(), &mut buf).unwrap();
        let v: u64 = decode(&buf[..n], &()).unwrap();
        assert_eq!(v, 9);
    }

    #[test]
    fn integer_decode_rejects_values_that_dont_narrow() {
        let mut buf = [0u8; 8];
        let n = encode(&300u16, &(), &mut buf).unwrap();
        match decode::<u8>(&buf[..n], &()) {
            Err(Error::Invalid(InvalidReason::Narrowing)) => {}
            other => panic!("expected Narrowing, got {other:?}"),
        }
    }

    #[test]
    fn fixed_array_length_mismatch_rejected() {
        let mut buf = [0u8; 16];
        let n = encode(&vec![1u8, 2, 3], &(), &mut buf).unwrap();
        match decode::<[u8; 2]>(&buf[..n], &()) {
            Err(Error::Invalid(InvalidReason::LengthMismatch { expected: 2, found: 3 })) => {}
            other => panic!("expected LengthMismatch, got {other:?}"),
        }
    }

    #[test]
    fn sentinel_array_round_trips() {
        use crate::packable::SentinelArray;
        let value = SentinelArray { items: [1u8, 2, 3] };
        let mut buf = [0u8; 16];
        let n = encode(&value, &(), &mut buf).unwrap();
        let back: SentinelArray<u8, 3> = decode(&buf[..n], &()).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn sentinel_array_rejects_wrong_trailing_value() {
        use crate::packable::SentinelArray;
        let mut buf = [0u8; 16];
        let n = encode(&vec![1u8, 2, 3, 9], &(), &mut buf).unwrap();
        match decode::<SentinelArray<u8, 3>>(&buf[..n], &()) {
            Err(Error::Invalid(InvalidReason::SentinelMismatch)) => {}
            other => panic!("expected SentinelMismatch, got {other:?}"),
        }
    }

    #[test]
    fn decode_alloc_box_borrows_from_arena() {
        use crate::encode::Encode;
        let mut buf = [0u8; 8];
        let n = Box::new(42u8).encode(&mut crate::io::Writer::new(&mut buf), &()).unwrap();
        let arena = bumpalo::Bump::new();
        let v: &u8 = decode_alloc::<Box<u8>>(&buf[..n], &(), &arena).unwrap();
        assert_eq!(*v, 42);
    }

    #[test]
    fn decode_alloc_vec_of_str_borrows_from_arena() {
        let mut buf = [0u8; 64];
        let n = encode(
            &vec!["a".to_string(), "bb".to_string()],
            &BytesFormat::Str,
            &mut buf,
        )
        .unwrap();
        let arena = bumpalo::Bump::new();
        let v: &[&str] = decode_alloc::<Vec<String>>(&buf[..n], &BytesFormat::Str, &arena).unwrap();
        assert_eq!(v, &["a", "bb"]);
    }
}
