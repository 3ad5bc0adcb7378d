//! # Argument Tests
//!
//! Type tags, diagnostic formatting, and argument snapshots.

use nifpga_core::{Arg, ArgumentSnapshot, NamedArgtype, NativeType};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(Arg::I32(0xbeef), "0xbeef")]
#[case(Arg::U32(33), "0x21")]
#[case(Arg::I8(-5), "-0x5")]
#[case(Arg::Bool(true), "0x1")]
#[case(Arg::Bool(false), "0x0")]
#[case(Arg::U64(u64::MAX), "0xffffffffffffffff")]
#[case(Arg::I64(i64::MIN), "-0x8000000000000000")]
#[case(Arg::SizeT(0x300), "0x300")]
#[case(Arg::Pointer(0), "0x0")]
fn integers_print_in_hex(#[case] arg: Arg, #[case] expected: &str) {
    assert_eq!(arg.to_string(), expected);
}

#[rstest]
#[case(b"I am a string".as_slice(), "b'I am a string'")]
#[case(b"".as_slice(), "b''")]
#[case(b"it's".as_slice(), "b\"it's\"")]
#[case(b"a'\"".as_slice(), "b'a\\'\"'")]
#[case(b"tab\there".as_slice(), "b'tab\\there'")]
#[case(b"line\r\n".as_slice(), "b'line\\r\\n'")]
#[case(b"back\\slash".as_slice(), "b'back\\\\slash'")]
#[case(b"\x00\x7f\xff".as_slice(), "b'\\x00\\x7f\\xff'")]
fn byte_strings_print_quoted(#[case] bytes: &[u8], #[case] expected: &str) {
    assert_eq!(Arg::from(bytes).to_string(), expected);
}

#[test]
fn conversions_pick_the_matching_type() {
    assert_eq!(Arg::from(true).native_type(), NativeType::Bool);
    assert_eq!(Arg::from(-1i8).native_type(), NativeType::I8);
    assert_eq!(Arg::from(1u16).native_type(), NativeType::U16);
    assert_eq!(Arg::from(1u64).native_type(), NativeType::U64);
    assert_eq!(Arg::from(1usize).native_type(), NativeType::SizeT);
    assert_eq!(Arg::from("resource"), Arg::CharPtr(b"resource".to_vec()));
    assert_eq!(Arg::from(vec![1u8, 2]), Arg::CharPtr(vec![1, 2]));
}

#[test]
fn integer_and_byte_views_are_exclusive() {
    assert_eq!(Arg::U8(7).as_integer(), Some(7));
    assert_eq!(Arg::U8(7).as_bytes(), None);
    assert_eq!(Arg::from("x").as_integer(), None);
    assert_eq!(Arg::from("x").as_bytes(), Some(&b"x"[..]));
}

#[test]
fn native_types_print_their_c_names() {
    assert_eq!(NativeType::U32.to_string(), "uint32_t");
    assert_eq!(NativeType::Bool.to_string(), "NiFpga_Bool");
    assert_eq!(NativeType::CharPtr.to_string(), "const char*");
}

#[test]
fn snapshot_preserves_call_order() {
    let snapshot = ArgumentSnapshot::new()
        .with("session", 1u32)
        .with("control", 2u32)
        .with("value", -3i16);

    assert_eq!(
        snapshot.names().collect::<Vec<_>>(),
        vec!["session", "control", "value"]
    );
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot["value"], Arg::I16(-3));
    assert_eq!(snapshot.get("missing"), None);
}

#[test]
fn capture_zips_declared_names_with_values() {
    let params = [
        NamedArgtype::new("session", NativeType::U32),
        NamedArgtype::new("name", NativeType::CharPtr),
    ];
    let values = [Arg::U32(0x1234), Arg::from("RIO0")];

    let snapshot =
        ArgumentSnapshot::capture(params.iter().map(|param| param.name.as_str()), &values);

    assert_eq!(snapshot["session"], Arg::U32(0x1234));
    assert_eq!(snapshot["name"].as_bytes(), Some(&b"RIO0"[..]));
}

#[test]
#[should_panic(expected = "no argument named 'absent'")]
fn indexing_a_missing_name_panics() {
    let _ = &ArgumentSnapshot::new()["absent"];
}
