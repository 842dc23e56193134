//! Integration tests for `#[derive(Pack)]`-generated code: the
//! product/sum/closed-enum testable properties that can't be exercised from
//! `neomp`'s own test suite, since those kinds only exist once a concrete
//! type is derived.

use neomp::{decode, encode, Decoded, Encode, EnumFormat, Pack, Packable, ProductLayout, SumLayout};

#[derive(Debug, Clone, PartialEq, Pack)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, PartialEq, Pack)]
struct Empty {}

#[derive(Debug, Clone, PartialEq, Pack)]
struct WithBytes {
    name: String,
    tags: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Pack)]
enum Shape {
    Circle(u32),
    Square(u32),
}

#[derive(Debug, Clone, PartialEq, Pack)]
enum Signal {
    Red,
    Yellow,
    Green,
}

#[test]
fn product_round_trips_under_map_layout() {
    let opts = Point::default_options();
    let p = Point { x: -3, y: 42 };
    let mut buf = [0u8; 64];
    let n = encode(&p, &opts, &mut buf).unwrap();
    let back: Point = decode(&buf[..n], &opts).unwrap();
    assert_eq!(p, back);
}

#[test]
fn product_round_trips_under_array_layout() {
    let mut opts = Point::default_options();
    opts.layout = ProductLayout::Array;
    let p = Point { x: 7, y: -7 };
    let mut buf = [0u8; 64];
    let n = encode(&p, &opts, &mut buf).unwrap();
    let back: Point = decode(&buf[..n], &opts).unwrap();
    assert_eq!(p, back);
}

/// Map-mode order insensitivity: permuting a map's entries on the wire still
/// decodes to the same value.
#[test]
fn map_layout_is_order_insensitive() {
    use neomp::encode::write_key;
    use neomp::io::Writer;

    let opts = Point::default_options();

    let mut declared = [0u8; 64];
    let n1 = encode(&Point { x: 1, y: 2 }, &opts, &mut declared).unwrap();

    let mut permuted = [0u8; 64];
    let mut w = Writer::new(&mut permuted);
    neomp::encode::write_map_header(&mut w, 2).unwrap();
    write_key(&mut w, "y").unwrap();
    Encode::encode(&2i32, &mut w, &()).unwrap();
    write_key(&mut w, "x").unwrap();
    Encode::encode(&1i32, &mut w, &()).unwrap();
    let n2 = w.position();

    let a: Point = decode(&declared[..n1], &opts).unwrap();
    let b: Point = decode(&permuted[..n2], &opts).unwrap();
    assert_eq!(a, b);
}

#[test]
fn empty_product_occupies_zero_bytes() {
    let opts = Empty::default_options();
    let mut buf = [0u8; 8];
    let n = encode(&Empty {}, &opts, &mut buf).unwrap();
    assert_eq!(n, 0);
    let back: Empty = decode(&buf[..n], &opts).unwrap();
    assert_eq!(back, Empty {});
}

#[test]
fn product_rejects_duplicate_and_missing_fields() {
    use neomp::encode::write_key;
    use neomp::io::Writer;
    use neomp::{Error, InvalidReason};

    let opts = Point::default_options();

    let mut dup = [0u8; 64];
    let mut w = Writer::new(&mut dup);
    neomp::encode::write_map_header(&mut w, 2).unwrap();
    write_key(&mut w, "x").unwrap();
    Encode::encode(&1i32, &mut w, &()).unwrap();
    write_key(&mut w, "x").unwrap();
    Encode::encode(&2i32, &mut w, &()).unwrap();
    let n = w.position();
    match decode::<Point>(&dup[..n], &opts) {
        Err(Error::Invalid(InvalidReason::DuplicateField("x"))) => {}
        other => panic!("expected DuplicateField, got {other:?}"),
    }

    let mut missing = [0u8; 64];
    let mut w = Writer::new(&mut missing);
    neomp::encode::write_map_header(&mut w, 1).unwrap();
    write_key(&mut w, "x").unwrap();
    Encode::encode(&1i32, &mut w, &()).unwrap();
    let n = w.position();
    match decode::<Point>(&missing[..n], &opts) {
        Err(Error::Invalid(InvalidReason::LengthMismatch { expected: 2, found: 1 })) => {}
        other => panic!("expected LengthMismatch, got {other:?}"),
    }
}

/// `WithBytes` needs an allocator to decode (`String`/`Vec<u8>` fields), so
/// only `decode_alloc` is available for it — there is no non-allocating
/// `Decode` impl.
#[test]
fn product_with_allocating_fields_round_trips_via_decode_alloc() {
    let opts = WithBytes::default_options();
    let value = WithBytes {
        name: "widget".to_string(),
        tags: vec![1, 2, 3],
    };
    let mut buf = [0u8; 64];
    let n = encode(&value, &opts, &mut buf).unwrap();
    let decoded = Decoded::<WithBytes>::decode(&buf[..n], opts).unwrap();
    assert_eq!(decoded.value().name, "widget");
    assert_eq!(decoded.value().tags, &[1, 2, 3]);
}

#[test]
fn sum_round_trips_under_map_layout() {
    let opts = Shape::default_options();
    let s = Shape::Circle(10);
    let mut buf = [0u8; 32];
    let n = encode(&s, &opts, &mut buf).unwrap();
    let back: Shape = decode(&buf[..n], &opts).unwrap();
    assert_eq!(s, back);
}

/// The literal `active_field` decode scenario: a bare `u32` payload is tried
/// against each variant's type in declaration order, first match wins.
#[test]
fn sum_active_field_first_declared_variant_wins() {
    let mut opts = Shape::default_options();
    opts.layout = SumLayout::ActiveField;
    let mut buf = [0u8; 16];
    let n = encode::<u32>(&5, &(), &mut buf).unwrap();
    let back: Shape = decode(&buf[..n], &opts).unwrap();
    assert_eq!(back, Shape::Circle(5));
}

#[test]
fn closed_enum_round_trips_as_int_and_str() {
    let int_opts = EnumFormat::Int;
    let mut buf = [0u8; 16];
    let n = encode(&Signal::Yellow, &int_opts, &mut buf).unwrap();
    let back: Signal = decode(&buf[..n], &int_opts).unwrap();
    assert_eq!(back, Signal::Yellow);

    let str_opts = EnumFormat::Str;
    let n = encode(&Signal::Green, &str_opts, &mut buf).unwrap();
    assert_eq!(&buf[..n], b"\xA5Green");
    let back: Signal = decode(&buf[..n], &str_opts).unwrap();
    assert_eq!(back, Signal::Green);
}

#[test]
fn closed_enum_str_rejects_unknown_name() {
    use neomp::{Error, InvalidReason};
    let mut buf = [0u8; 16];
    let n = encode(&"purple".to_string(), &neomp::BytesFormat::Str, &mut buf).unwrap();
    match decode::<Signal>(&buf[..n], &EnumFormat::Str) {
        Err(Error::Invalid(InvalidReason::UnknownVariant(name))) => assert_eq!(name, "purple"),
        other => panic!("expected UnknownVariant, got {other:?}"),
    }
}
