//! `Decoded<T>`: an owned handle pairing a [`bumpalo::Bump`] with the
//! arena-borrowed value `decode_alloc` produced from it.
//!
//! Releasing a `Decoded<T>` drops the arena and, with it, every
//! pointer-typed part of the value it held — that invalidation is enforced
//! by the borrow checker, not by a runtime check, because the value field
//! genuinely borrows from the arena field (see DESIGN.md OQ-4).

use ouroboros::self_referencing;

use crate::decode::DecodeAlloc;
use crate::error::Result;

/// An owned, self-contained decode result: the backing arena and the
/// arena-borrowed value decoded into it, kept together so the caller never
/// has to juggle the arena's lifetime by hand.
#[self_referencing]
pub struct Decoded<T>
where
    T: for<'arena> DecodeAlloc<'arena>,
{
    arena: bumpalo::Bump,
    #[borrows(arena)]
    #[covariant]
    value: <T as DecodeAlloc<'this>>::Output,
}

impl<T> Decoded<T>
where
    T: for<'arena> DecodeAlloc<'arena>,
{
    /// Decodes `buf` into a fresh arena, keeping both together.
    pub fn decode(buf: &[u8], opts: <T as crate::packable::Packable>::Options) -> Result<Self> {
        DecodedTryBuilder {
            arena: bumpalo::Bump::new(),
            value_builder: |arena: &bumpalo::Bump| {
                crate::decode::decode_alloc::<T>(buf, &opts, arena)
            },
        }
        .try_build()
    }

    /// The decoded value, borrowed for as long as `self` is alive.
    pub fn value(&self) -> &<T as DecodeAlloc<'_>>::Output {
        self.borrow_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;

    #[test]
    fn decoded_outlives_the_call_that_built_it() {
        let mut buf = [0u8; 8];
        let n = encode(&7u32, &(), &mut buf).unwrap();
        let decoded: Decoded<u32> = Decoded::decode(&buf[..n], ()).unwrap();
        assert_eq!(*decoded.value(), 7u32);
    }
}
