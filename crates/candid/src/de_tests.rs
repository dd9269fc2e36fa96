use candid_core::{IdlType, Label, Principal, Value};
use candid_wire::Error;

use crate::args::{Decoder, decode_args};
use crate::config::DecodeLimits;

fn message(hex: &str) -> Vec<u8> {
    hex::decode(hex.replace(' ', "")).unwrap()
}

fn decode(hex: &str) -> Result<Vec<(Value, IdlType)>, Error> {
    decode_with(hex, None)
}

fn decode_with(hex: &str, expected: Option<&[IdlType]>) -> Result<Vec<(Value, IdlType)>, Error> {
    let args = decode_args(&message(hex), expected)?;
    Ok(args.into_iter().map(|a| a.into_parts()).collect())
}

fn single(hex: &str) -> Value {
    let mut args = decode(hex).unwrap();
    assert_eq!(args.len(), 1);
    args.remove(0).0
}

#[test]
fn null_and_bool() {
    assert_eq!(decode("4449444c 00 01 7f").unwrap(), vec![(Value::Null, IdlType::Null)]);
    assert_eq!(single("4449444c 00 01 7e 01"), Value::Bool(true));
    assert_eq!(single("4449444c 00 01 7e 00"), Value::Bool(false));
    assert_eq!(decode("4449444c 00 01 7e 02").unwrap_err(), Error::InvalidBool(2));
}

#[test]
fn no_arguments() {
    assert_eq!(decode("4449444c 00 00").unwrap(), vec![]);
}

#[test]
fn bad_magic() {
    assert_eq!(decode("4449444d 00 00").unwrap_err(), Error::InvalidMagic);
    assert_eq!(decode("4449").unwrap_err(), Error::InvalidMagic);
}

#[test]
fn text() {
    assert_eq!(single("4449444c 00 01 71 03 e29883"), Value::text("☃"));
    assert_eq!(single("4449444c 00 01 71 00"), Value::text(""));
}

#[test]
fn text_rejects_invalid_utf8() {
    assert_eq!(
        decode("4449444c 00 01 71 01 ff").unwrap_err(),
        Error::InvalidUtf8 { offset: 8 }
    );
}

#[test]
fn text_length_past_end() {
    assert!(matches!(
        decode("4449444c 00 01 71 05 6869").unwrap_err(),
        Error::UnexpectedEof { .. }
    ));
}

#[test]
fn fixed_width_numbers() {
    assert_eq!(single("4449444c 00 01 7b ff"), Value::Nat8(255));
    assert_eq!(single("4449444c 00 01 7a ffff"), Value::Nat16(65535));
    assert_eq!(single("4449444c 00 01 79 01000000"), Value::Nat32(1));
    assert_eq!(single("4449444c 00 01 77 ff"), Value::Int8(-1));
    assert_eq!(single("4449444c 00 01 74 feffffffffffffff"), Value::Int64(-2));
}

#[test]
fn floats() {
    assert_eq!(single("4449444c 00 01 73 00004040"), Value::Float32(3.0));
    assert_eq!(single("4449444c 00 01 72 0000000000000840"), Value::Float64(3.0));
    assert_eq!(single("4449444c 00 01 72 000000000000e03f"), Value::Float64(0.5));
}

#[test]
fn big_numbers() {
    assert_eq!(single("4449444c 00 01 7d ac02"), Value::nat(300u32));
    assert_eq!(single("4449444c 00 01 7c ff7e"), Value::int(-129));
    let big: num_bigint::BigUint = "18446744073709551616".parse().unwrap();
    assert_eq!(
        single("4449444c 00 01 7d 80808080808080808002"),
        Value::Nat(big)
    );
}

#[test]
fn principals() {
    assert_eq!(
        single("4449444c 00 01 68 0100"),
        Value::Principal(Principal::management_canister())
    );
    assert_eq!(
        single("4449444c 00 01 68 0103caffee"),
        Value::Principal(Principal::from_slice(&[0xca, 0xff, 0xee]).unwrap())
    );
    assert_eq!(
        decode("4449444c 00 01 68 0003caffee").unwrap_err(),
        Error::InvalidReferenceTag(0)
    );
}

#[test]
fn empty_has_no_values() {
    assert_eq!(decode("4449444c 00 01 6f").unwrap_err(), Error::EmptyValue);
}

#[test]
fn reserved_consumes_nothing() {
    assert_eq!(single("4449444c 00 01 70"), Value::Reserved);
}

#[test]
fn options() {
    assert_eq!(
        decode("4449444c 01 6e7e 01 00 01 00").unwrap(),
        vec![(Value::some(Value::Bool(false)), IdlType::opt(IdlType::Bool))]
    );
    assert_eq!(
        decode("4449444c 01 6e7e 01 00 00").unwrap(),
        vec![(Value::none(), IdlType::opt(IdlType::Bool))]
    );
    assert_eq!(
        decode("4449444c 01 6e7e 01 00 01 02").unwrap_err(),
        Error::InvalidBool(2)
    );
    assert_eq!(
        decode("4449444c 01 6e7e 01 00 02").unwrap_err(),
        Error::InvalidOptTag(2)
    );
}

#[test]
fn vectors() {
    assert_eq!(
        decode("4449444c 01 6d7b 01 00 03 010203").unwrap(),
        vec![(
            Value::Vec(vec![Value::Nat8(1), Value::Nat8(2), Value::Nat8(3)]),
            IdlType::vec(IdlType::Nat8)
        )]
    );
    assert_eq!(
        decode("4449444c 01 6d71 01 00 00").unwrap(),
        vec![(Value::Vec(vec![]), IdlType::vec(IdlType::Text))]
    );
}

#[test]
fn empty_record() {
    assert_eq!(
        decode("4449444c 01 6c00 01 00").unwrap(),
        vec![(Value::Record(Default::default()), IdlType::Record(Default::default()))]
    );
}

#[test]
fn record_without_expected_type_uses_hashes() {
    let (value, ty) = decode("4449444c 01 6c02 d3e3aa02 7e 868eb702 7c 01 00 01 2a")
        .unwrap()
        .remove(0);
    let Value::Record(fields) = &value else {
        panic!("expected a record, got {value}");
    };
    let labels: Vec<_> = fields.keys().cloned().collect();
    assert_eq!(labels, vec![Label::Id(4895187), Label::Id(5097222)]);
    assert_eq!(fields[&Label::Id(4895187)], Value::Bool(true));
    assert_eq!(fields[&Label::Id(5097222)], Value::int(42));
    assert_eq!(ty.to_string(), "record { 4895187 : bool; 5097222 : int }");
}

#[test]
fn record_with_expected_type_gets_names() {
    let expected = [IdlType::record([("foo", IdlType::Int), ("bar", IdlType::Bool)])];
    let (value, ty) = decode_with(
        "4449444c 01 6c02 d3e3aa02 7e 868eb702 7c 01 00 01 2a",
        Some(&expected),
    )
    .unwrap()
    .remove(0);
    assert_eq!(value.to_string(), "record { bar = true; foo = 42 }");
    assert_eq!(ty.to_string(), "record { bar : bool; foo : int }");
}

#[test]
fn record_fields_missing_from_expected_keep_hashes() {
    let expected = [IdlType::record([("foo", IdlType::Int)])];
    let (value, _) = decode_with(
        "4449444c 01 6c02 d3e3aa02 7e 868eb702 7c 01 00 01 2a",
        Some(&expected),
    )
    .unwrap()
    .remove(0);
    assert_eq!(value.to_string(), "record { 4895187 = true; foo = 42 }");
}

#[test]
fn numeric_field_id() {
    let value = single("4449444c 01 6c01 01 7c 01 00 2a");
    assert_eq!(value, Value::record([(Label::Id(1), Value::int(42))]));
}

#[test]
fn self_referential_record_is_rejected() {
    assert_eq!(
        decode("4449444c 01 6c01 00 00 01 00").unwrap_err(),
        Error::RecursiveRecord {
            depth: 2,
            table_len: 1
        }
    );
}

#[test]
fn recursive_list_through_variant_decodes() {
    // T0 = variant { 0 : null; 1 : T1 }, T1 = record { 0 : nat8; 1 : T0 }
    let value = single("4449444c 02 6b02 007f 0101 6c02 007b 0100 01 00 01 07 01 08 00");
    let nil = Value::variant(Label::Id(0), Value::Null);
    let inner = Value::variant(
        Label::Id(1),
        Value::record([(Label::Id(0), Value::Nat8(8)), (Label::Id(1), nil)]),
    );
    let outer = Value::variant(
        Label::Id(1),
        Value::record([(Label::Id(0), Value::Nat8(7)), (Label::Id(1), inner)]),
    );
    assert_eq!(value, outer);
}

#[test]
fn variants() {
    let (value, ty) = decode("4449444c 01 6b02 9cc201 7d e58eb402 71 01 00 01 0178")
        .unwrap()
        .remove(0);
    assert_eq!(value, Value::variant(Label::Id(5048165), Value::text("x")));
    assert_eq!(ty.to_string(), "variant { 24860 : nat; 5048165 : text }");
}

#[test]
fn variant_with_expected_type_gets_names() {
    let expected = [IdlType::variant([("ok", IdlType::Nat), ("err", IdlType::Text)])];
    let (value, ty) = decode_with(
        "4449444c 01 6b02 9cc201 7d e58eb402 71 01 00 00 05",
        Some(&expected),
    )
    .unwrap()
    .remove(0);
    assert_eq!(value.to_string(), "variant { ok = 5 }");
    assert_eq!(ty, expected[0]);
}

#[test]
fn variant_branch_unknown_to_expected_type() {
    let expected = [IdlType::variant([("ok", IdlType::Nat)])];
    assert_eq!(
        decode_with(
            "4449444c 01 6b02 9cc201 7d e58eb402 71 01 00 01 0178",
            Some(&expected)
        )
        .unwrap_err(),
        Error::UnknownFieldHash { hash: 5048165 }
    );
}

#[test]
fn variant_index_out_of_range() {
    assert_eq!(
        decode("4449444c 01 6b01 007f 01 00 05").unwrap_err(),
        Error::VariantIndexOutOfRange { index: 5, len: 1 }
    );
}

#[test]
fn func_and_service_values() {
    // T0 = func () -> (), T1 = service {}
    let args = decode("4449444c 02 6a0000 00 6900 02 00 01 01 0100 016d 0101 04").unwrap();
    assert_eq!(
        args[0],
        (
            Value::Func(Principal::management_canister(), "m".into()),
            IdlType::func(vec![], vec![], vec![])
        )
    );
    assert_eq!(
        args[1],
        (
            Value::Service(Principal::anonymous()),
            IdlType::service::<&str, _>([])
        )
    );
}

#[test]
fn type_mismatch_against_expected() {
    assert_eq!(
        decode_with("4449444c 00 01 7e 01", Some(&[IdlType::Nat])).unwrap_err(),
        Error::TypeMismatch {
            expected: "nat",
            actual: "bool"
        }
    );
}

#[test]
fn expected_reserved_skips_value() {
    let args = decode_with("4449444c 00 02 7e 71 01 01 61", Some(&[IdlType::Reserved])).unwrap();
    assert_eq!(args[0], (Value::Reserved, IdlType::Reserved));
    assert_eq!(args[1], (Value::text("a"), IdlType::Text));
}

#[test]
fn trailing_bytes_are_rejected() {
    assert_eq!(
        decode("4449444c 00 01 7f 00").unwrap_err(),
        Error::TrailingBytes { remaining: 1 }
    );
}

#[test]
fn recursion_limit() {
    // opt opt opt bool, three levels of nesting plus the bool
    let bytes = message("4449444c 03 6e01 6e02 6e7e 01 00 01 01 01 01");
    let tight = Decoder::builder()
        .limits(DecodeLimits::new().recursion_limit(3))
        .build();
    assert_eq!(
        tight.decode(&bytes, None).unwrap_err(),
        Error::RecursionLimitExceeded(3)
    );
    let loose = Decoder::builder()
        .limits(DecodeLimits::new().recursion_limit(4))
        .build();
    assert!(loose.decode(&bytes, None).is_ok());
}

#[test]
fn fuel_counts_every_value() {
    let bytes = message("4449444c 01 6d7b 01 00 03 010203");
    let exact = Decoder::builder()
        .limits(DecodeLimits::new().fuel(4))
        .build();
    assert!(exact.decode(&bytes, None).is_ok());
    let short = Decoder::builder()
        .limits(DecodeLimits::new().fuel(3))
        .build();
    assert_eq!(short.decode(&bytes, None).unwrap_err(), Error::FuelExhausted);
}

#[test]
fn huge_vector_length_fails_without_allocating() {
    assert!(matches!(
        decode("4449444c 01 6d7b 01 00 ffffffff0f").unwrap_err(),
        Error::UnexpectedEof { .. }
    ));
}

/// T0 = opt T1, Ti = record { 0 : T(i+1); 1 : T(i+1) }, last = record {}.
fn shared_subtrees(depth: u32) -> String {
    let mut hex = format!("4449444c {:02x} 6e01", depth + 2);
    for i in 1..=depth {
        let next = i + 1;
        hex.push_str(&format!(" 6c02 00{next:02x} 01{next:02x}"));
    }
    hex.push_str(" 6c00 01 00");
    hex
}

#[test]
fn absent_option_over_shared_subtrees_is_described() {
    let (value, ty) = decode(&format!("{} 00", shared_subtrees(3))).unwrap().remove(0);
    let pair = |t: IdlType| IdlType::record([(Label::Id(0), t.clone()), (Label::Id(1), t)]);
    let leaf = IdlType::Record(Default::default());
    assert_eq!(value, Value::none());
    assert_eq!(ty, IdlType::opt(pair(pair(pair(leaf)))));
}

#[test]
fn absent_option_over_deep_shared_subtrees_exhausts_fuel() {
    assert_eq!(
        decode(&format!("{} 00", shared_subtrees(40))).unwrap_err(),
        Error::FuelExhausted
    );
}

#[test]
fn descriptors_of_empty_vectors_cost_fuel() {
    let bytes = message("4449444c 01 6d71 01 00 00");
    let enough = Decoder::builder()
        .limits(DecodeLimits::new().fuel(2))
        .build();
    assert!(enough.decode(&bytes, None).is_ok());
    let short = Decoder::builder()
        .limits(DecodeLimits::new().fuel(1))
        .build();
    assert_eq!(short.decode(&bytes, None).unwrap_err(), Error::FuelExhausted);
}

#[test]
fn descriptors_of_absent_options_respect_recursion_limit() {
    // opt opt opt bool, outermost absent
    let bytes = message("4449444c 03 6e01 6e02 6e7e 01 00 00");
    let tight = Decoder::builder()
        .limits(DecodeLimits::new().recursion_limit(2))
        .build();
    assert!(matches!(
        tight.decode(&bytes, None).unwrap_err(),
        Error::RecursionLimitExceeded(_)
    ));
    let loose = Decoder::builder()
        .limits(DecodeLimits::new().recursion_limit(3))
        .build();
    assert!(loose.decode(&bytes, None).is_ok());
}
