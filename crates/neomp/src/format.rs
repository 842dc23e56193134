//! The MessagePack wire format table.
//!
//! A `Tag` is a structured view of the one-byte MessagePack prefix plus any
//! value it carries inline (a positive fixint's magnitude, a fixstr's
//! length, ...). Encoding a `Tag` is total; decoding a byte is partial only
//! for the single reserved code (`0xC1`) that MessagePack never assigns.
//!
//! `ext`/`timestamp` tags are recognized (so the decoder can name them in an
//! error) but never produced or consumed — out of scope per the crate's
//! purpose.

/// A structured MessagePack tag, with any bits embedded in the first byte
/// already extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// `0x00..=0x7F`: a non-negative integer embedded directly in the byte.
    PosFixInt(u8),
    /// `0xE0..=0xFF`: a small negative integer (-32..=-1) embedded in the byte.
    NegFixInt(i8),
    /// `0x80..=0x8F`: a map with `0..=15` entries, count embedded.
    FixMap(u8),
    /// `0x90..=0x9F`: an array with `0..=15` elements, count embedded.
    FixArray(u8),
    /// `0xA0..=0xBF`: a UTF-8 string with `0..=31` bytes, length embedded.
    FixStr(u8),
    Nil,
    False,
    True,
    Bin8,
    Bin16,
    Bin32,
    Ext8,
    Ext16,
    Ext32,
    Float32,
    Float64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    FixExt1,
    FixExt2,
    FixExt4,
    FixExt8,
    FixExt16,
    Str8,
    Str16,
    Str32,
    Array16,
    Array32,
    Map16,
    Map32,
}

impl Tag {
    /// Returns the one-byte wire encoding for this tag.
    ///
    /// Total: every `Tag` has exactly one corresponding byte.
    pub const fn to_byte(self) -> u8 {
        match self {
            Tag::PosFixInt(v) => v & 0x7F,
            Tag::NegFixInt(v) => (v as i16 + 256) as u8,
            Tag::FixMap(n) => 0x80 | (n & 0x0F),
            Tag::FixArray(n) => 0x90 | (n & 0x0F),
            Tag::FixStr(n) => 0xA0 | (n & 0x1F),
            Tag::Nil => 0xC0,
            Tag::False => 0xC2,
            Tag::True => 0xC3,
            Tag::Bin8 => 0xC4,
            Tag::Bin16 => 0xC5,
            Tag::Bin32 => 0xC6,
            Tag::Ext8 => 0xC7,
            Tag::Ext16 => 0xC8,
            Tag::Ext32 => 0xC9,
            Tag::Float32 => 0xCA,
            Tag::Float64 => 0xCB,
            Tag::Uint8 => 0xCC,
            Tag::Uint16 => 0xCD,
            Tag::Uint32 => 0xCE,
            Tag::Uint64 => 0xCF,
            Tag::Int8 => 0xD0,
            Tag::Int16 => 0xD1,
            Tag::Int32 => 0xD2,
            Tag::Int64 => 0xD3,
            Tag::FixExt1 => 0xD4,
            Tag::FixExt2 => 0xD5,
            Tag::FixExt4 => 0xD6,
            Tag::FixExt8 => 0xD7,
            Tag::FixExt16 => 0xD8,
            Tag::Str8 => 0xD9,
            Tag::Str16 => 0xDA,
            Tag::Str32 => 0xDB,
            Tag::Array16 => 0xDC,
            Tag::Array32 => 0xDD,
            Tag::Map16 => 0xDE,
            Tag::Map32 => 0xDF,
        }
    }

    /// Returns the `Tag` for a given byte, or `None` for the one reserved
    /// code (`0xC1`) MessagePack never assigns.
    pub const fn from_byte(b: u8) -> Option<Tag> {
        Some(match b {
            0x00..=0x7F => Tag::PosFixInt(b),
            0x80..=0x8F => Tag::FixMap(b & 0x0F),
            0x90..=0x9F => Tag::FixArray(b & 0x0F),
            0xA0..=0xBF => Tag::FixStr(b & 0x1F),
            0xC0 => Tag::Nil,
            0xC1 => return None,
            0xC2 => Tag::False,
            0xC3 => Tag::True,
            0xC4 => Tag::Bin8,
            0xC5 => Tag::Bin16,
            0xC6 => Tag::Bin32,
            0xC7 => Tag::Ext8,
            0xC8 => Tag::Ext16,
            0xC9 => Tag::Ext32,
            0xCA => Tag::Float32,
            0xCB => Tag::Float64,
            0xCC => Tag::Uint8,
            0xCD => Tag::Uint16,
            0xCE => Tag::Uint32,
            0xCF => Tag::Uint64,
            0xD0 => Tag::Int8,
            0xD1 => Tag::Int16,
            0xD2 => Tag::Int32,
            0xD3 => Tag::Int64,
            0xD4 => Tag::FixExt1,
            0xD5 => Tag::FixExt2,
            0xD6 => Tag::FixExt4,
            0xD7 => Tag::FixExt8,
            0xD8 => Tag::FixExt16,
            0xD9 => Tag::Str8,
            0xDA => Tag::Str16,
            0xDB => Tag::Str32,
            0xDC => Tag::Array16,
            0xDD => Tag::Array32,
            0xDE => Tag::Map16,
            0xDF => Tag::Map32,
            0xE0..=0xFF => Tag::NegFixInt((b as i16 - 256) as i8),
        })
    }

    /// A short name for error messages; does not need to be unique.
    pub const fn name(self) -> &'static str {
        match self {
            Tag::PosFixInt(_) | Tag::Uint8 | Tag::Uint16 | Tag::Uint32 | Tag::Uint64 => "uint",
            Tag::NegFixInt(_) | Tag::Int8 | Tag::Int16 | Tag::Int32 | Tag::Int64 => "int",
            Tag::FixMap(_) | Tag::Map16 | Tag::Map32 => "map",
            Tag::FixArray(_) | Tag::Array16 | Tag::Array32 => "array",
            Tag::FixStr(_) | Tag::Str8 | Tag::Str16 | Tag::Str32 => "str",
            Tag::Nil => "nil",
            Tag::False | Tag::True => "bool",
            Tag::Bin8 | Tag::Bin16 | Tag::Bin32 => "bin",
            Tag::Ext8 | Tag::Ext16 | Tag::Ext32 | Tag::FixExt1 | Tag::FixExt2 | Tag::FixExt4
            | Tag::FixExt8 | Tag::FixExt16 => "ext",
            Tag::Float32 => "float32",
            Tag::Float64 => "float64",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_byte_except_reserved() {
        for b in 0u16..=255 {
            let b = b as u8;
            if b == 0xC1 {
                assert_eq!(Tag::from_byte(b), None);
                continue;
            }
            let tag = Tag::from_byte(b).expect("every non-reserved byte decodes");
            assert_eq!(tag.to_byte(), b, "byte {b:#04x} did not round-trip");
        }
    }

    #[test]
    fn fixint_embeds_value() {
        assert_eq!(Tag::PosFixInt(0).to_byte(), 0x00);
        assert_eq!(Tag::PosFixInt(127).to_byte(), 0x7F);
        assert_eq!(Tag::NegFixInt(-32).to_byte(), 0xE0);
        assert_eq!(Tag::NegFixInt(-1).to_byte(), 0xFF);
    }

    #[test]
    fn fixstr_fixarray_fixmap_embed_length() {
        assert_eq!(Tag::FixStr(3).to_byte(), 0xA3);
        assert_eq!(Tag::FixArray(15).to_byte(), 0x9F);
        assert_eq!(Tag::FixMap(0).to_byte(), 0x80);
    }
}
