//! The type classifier and options model.
//!
//! `Packable` is the trait every encodable/decodable host type implements —
//! by hand for primitives and the built-in wrapper kinds below, by
//! `#[derive(Pack)]` for products, sums, and closed enums. It carries
//! exactly the compile-time facts the codec needs about `T`: the shape of
//! its `Options`, whether it contains a variable-length subterm, whether
//! producing it requires an allocator, and (for products/sums/enums) the
//! longest field or variant name.

/// Per-type, compile-time-shaped, runtime-valued format customization.
///
/// `Options` is a pure function of the host type (§3): every `T` has one
/// `Options` shape, derived structurally from `T`'s definition, never from
/// a runtime schema.
pub trait Packable: Sized {
    /// The shape of this type's format customization.
    type Options: Clone;

    /// True iff `T` recursively contains a variable-length sequence
    /// (`Vec<_>`/`String`/`SentinelVec<_>`/their arena-borrowed decode-side
    /// counterparts). Gates `Error::SliceLenTooLarge` and whether `T` is
    /// eligible for `encode_bounded`/`decode` (the non-allocating entries).
    const CONTAINS_VARIABLE_LENGTH: bool;

    /// True iff producing a `T` by decoding requires *some* allocator
    /// (a superset of `CONTAINS_VARIABLE_LENGTH`: it is also true for any
    /// type containing an owning pointer, which needs allocation to
    /// materialize even though its wire size is fixed). See DESIGN.md OQ-4.
    const REQUIRES_ALLOC: bool;

    /// A conservative upper bound on `T`'s encoded size, in bytes, for any
    /// valid choice of `Options` — `None` iff `CONTAINS_VARIABLE_LENGTH`.
    /// Used to size `encode_bounded`'s caller-supplied buffer.
    const MAX_ENCODED_SIZE: Option<usize>;

    /// The default `Options` value for this type.
    fn default_options() -> Self::Options;

    /// The byte length of the longest declared field/variant name, for
    /// product/sum/enum types (§4.2). `0` for every other kind.
    fn largest_field_name_len() -> usize {
        0
    }
}

/// Adds two conservative size bounds, propagating `None` (unbounded).
/// Used by `#[derive(Pack)]`-generated `MAX_ENCODED_SIZE` expressions to
/// fold per-field bounds without the macro needing to reason about
/// `Option<usize>` arithmetic itself.
pub const fn opt_add(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x + y),
        _ => None,
    }
}

/// Which MessagePack family a byte sequence (`element = u8`) is written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BytesFormat {
    Bin,
    Str,
    Array,
}

impl Default for BytesFormat {
    fn default() -> Self {
        BytesFormat::Str
    }
}

/// How a product (struct) is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductLayout {
    Map,
    Array,
}

impl Default for ProductLayout {
    fn default() -> Self {
        ProductLayout::Map
    }
}

/// How a sum (tagged union) is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SumLayout {
    Map,
    ActiveField,
}

impl Default for SumLayout {
    fn default() -> Self {
        SumLayout::Map
    }
}

/// How a closed (fieldless) enum is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumFormat {
    Int,
    Str,
}

impl Default for EnumFormat {
    fn default() -> Self {
        EnumFormat::Int
    }
}

/// A type whose sentinel-terminated array/slice trailing element is a
/// compile-time-declared constant of `T` (§4.4), not a per-instance value.
///
/// Mirrors a sentinel-terminated array type where the sentinel is
/// comptime-known: `SentinelArray`/`SentinelVec`/`SentinelSlice` only close
/// over `T: Sentinel`, so the one legal trailing value is fixed by `T`
/// itself and decode can reject any other. Only implementable for types
/// that are const-constructible, which in practice means primitives —
/// `String`/`Vec<_>` need the heap and can't appear as `Self` here.
pub trait Sentinel: Packable + PartialEq {
    /// The only value decode accepts as the trailing element.
    const SENTINEL: Self;
}

/// A fixed-length array of `N` logical items followed by a sentinel value,
/// owned — the encode-side (and stack-decode-side, when `T: Decode`)
/// realization of "fixed array with sentinel".
///
/// The wire form is `N + 1` elements: the `N` items, then `T::SENTINEL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelArray<T, const N: usize> {
    pub items: [T; N],
}

/// A variable-length sequence of logical items followed by a sentinel
/// value, owned — the encode-side realization of "slice with sentinel".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelVec<T> {
    pub items: Vec<T>,
}

/// The arena-borrowed decode-side realization of "slice with sentinel":
/// `items` borrows from the same arena as everything else in the
/// enclosing `Decoded<T>`. The trailing sentinel is not stored — it was
/// already checked against `T::SENTINEL` during decode and carries no
/// further information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentinelSlice<'a, T> {
    pub items: &'a [T],
}

#[cfg(test)]
impl Sentinel for u8 {
    const SENTINEL: u8 = 0;
}
