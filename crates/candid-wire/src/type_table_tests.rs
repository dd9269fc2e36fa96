use candid_core::{FuncMode, IdlType, Label, Opcode};

use crate::error::Error;
use crate::reader::Reader;
use crate::type_table::{TypeEntry, TypeRef, TypeTable};

/// `DIDL` followed by space-separated hex bytes.
fn didl(hex: &str) -> Vec<u8> {
    let mut out = b"DIDL".to_vec();
    out.extend(
        hex.split_whitespace()
            .map(|b| u8::from_str_radix(b, 16).unwrap()),
    );
    out
}

fn parse(bytes: &[u8]) -> Result<TypeTable, Error> {
    TypeTable::parse(&mut Reader::new(bytes))
}

fn materialize(table: &TypeTable, r: TypeRef) -> IdlType {
    let mut fuel = u64::MAX;
    table.materialize(r, &mut fuel, u32::MAX).unwrap()
}

/// T0 = opt T1, Ti = record { 0 : T(i+1); 1 : T(i+1) }, last = record {}.
fn shared_subtrees(depth: u32) -> Vec<u8> {
    let mut hex = format!("{:02x} 6e 01", depth + 2);
    for i in 1..=depth {
        let next = i + 1;
        hex.push_str(&format!(" 6c 02 00 {next:02x} 01 {next:02x}"));
    }
    hex.push_str(" 6c 00 01 00");
    didl(&hex)
}

#[test]
fn empty_table() {
    let table = parse(&didl("00 01 7f")).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.args(), &[TypeRef::Primitive(Opcode::Null)]);
}

#[test]
fn rejects_bad_magic() {
    assert_eq!(parse(b"").unwrap_err(), Error::InvalidMagic);
    assert_eq!(parse(&[0, 0]).unwrap_err(), Error::InvalidMagic);
    assert_eq!(parse(b"DADL\x00\x00").unwrap_err(), Error::InvalidMagic);
}

#[test]
fn record_entry() {
    let table = parse(&didl("01 6c 02 d3 e3 aa 02 7e 86 8e b7 02 7c 01 00")).unwrap();
    assert_eq!(
        table.entries(),
        &[TypeEntry::Record(vec![
            (4895187, TypeRef::Primitive(Opcode::Bool)),
            (5097222, TypeRef::Primitive(Opcode::Int)),
        ])]
    );
    assert_eq!(table.args(), &[TypeRef::Index(0)]);
    assert_eq!(table.opcode_of(TypeRef::Index(0)).unwrap(), Opcode::Record);
}

#[test]
fn rejects_descending_hashes() {
    let err = parse(&didl("01 6c 02 86 8e b7 02 7c d3 e3 aa 02 7e 01 00")).unwrap_err();
    assert_eq!(
        err,
        Error::FieldHashOrder {
            previous: 5097222,
            hash: 4895187
        }
    );
    assert_eq!(
        err.to_string(),
        "field id collision or not sorted: 4895187 after 5097222"
    );
}

#[test]
fn rejects_duplicate_hashes() {
    let err = parse(&didl("01 6b 02 01 7c 01 7e 01 00")).unwrap_err();
    assert_eq!(err, Error::FieldHashOrder { previous: 1, hash: 1 });
}

#[test]
fn rejects_out_of_range_refs() {
    assert_eq!(
        parse(&didl("01 6e 05 01 00")).unwrap_err(),
        Error::InvalidTypeRef {
            reference: 5,
            table_len: 1
        }
    );
    assert_eq!(
        parse(&didl("00 01 00")).unwrap_err(),
        Error::InvalidTypeRef {
            reference: 0,
            table_len: 0
        }
    );
}

#[test]
fn rejects_constructor_opcode_as_ref() {
    // opt opt: -18 is not a primitive reference.
    assert_eq!(
        parse(&didl("01 6e 6e 01 00")).unwrap_err(),
        Error::InvalidTypeRef {
            reference: -18,
            table_len: 1
        }
    );
}

#[test]
fn rejects_primitive_entry() {
    assert_eq!(
        parse(&didl("01 68 01 00 01 03 ca ff ee")).unwrap_err(),
        Error::UnsupportedOpcode { code: -24 }
    );
    assert_eq!(
        parse(&didl("01 67 00 01 00")).unwrap_err(),
        Error::UnsupportedOpcode { code: -25 }
    );
}

#[test]
fn func_entry() {
    let table = parse(&didl("01 6a 01 71 01 7d 01 01 01 00")).unwrap();
    assert_eq!(
        table.entries(),
        &[TypeEntry::Func {
            args: vec![TypeRef::Primitive(Opcode::Text)],
            rets: vec![TypeRef::Primitive(Opcode::Nat)],
            modes: vec![FuncMode::Query],
        }]
    );
}

#[test]
fn func_annotation_errors() {
    assert_eq!(
        parse(&didl("01 6a 00 00 01 03 01 00")).unwrap_err(),
        Error::InvalidAnnotation { byte: 3 }
    );
    assert_eq!(
        parse(&didl("01 6a 00 00 02 01 02 01 00")).unwrap_err(),
        Error::AnnotationCount { count: 2 }
    );
}

#[test]
fn func_rejects_compound_args() {
    assert_eq!(
        parse(&didl("02 6a 01 01 00 00 6e 7e 01 00")).unwrap_err(),
        Error::FuncArgNotPrimitive { reference: 1 }
    );
}

#[test]
fn service_entry() {
    let table = parse(&didl("02 6a 00 00 00 69 01 05 67 72 65 65 74 00 01 01")).unwrap();
    assert_eq!(
        table.entries()[1],
        TypeEntry::Service(vec![("greet".to_string(), TypeRef::Index(0))])
    );
    assert_eq!(
        materialize(&table, TypeRef::Index(1)),
        IdlType::service([("greet", IdlType::func(vec![], vec![], vec![]))])
    );
}

#[test]
fn service_rejects_unsorted_methods() {
    let err = parse(&didl("02 6a 00 00 00 69 02 01 62 00 01 61 00 01 01")).unwrap_err();
    assert_eq!(
        err,
        Error::ServiceMethodOrder {
            name: "a".to_string()
        }
    );
}

#[test]
fn service_rejects_invalid_utf8_name() {
    let err = parse(&didl("02 6a 00 00 00 69 01 01 ff 00 01 01")).unwrap_err();
    assert!(matches!(err, Error::InvalidUtf8 { .. }));
}

#[test]
fn truncated_table() {
    assert!(matches!(
        parse(&didl("01 6c 02 d3 e3")),
        Err(Error::UnexpectedEof { .. })
    ));
}

#[test]
fn materialize_nested() {
    let table = parse(&didl("02 6d 01 6c 01 00 71 01 00")).unwrap();
    assert_eq!(
        materialize(&table, TypeRef::Index(0)),
        IdlType::vec(IdlType::record([(Label::Id(0), IdlType::Text)]))
    );
}

#[test]
fn materialize_folds_cycles() {
    let table = parse(&didl("01 6e 00 01 00")).unwrap();
    assert_eq!(
        materialize(&table, TypeRef::Index(0)),
        IdlType::opt(IdlType::Reserved)
    );
}

#[test]
fn materialize_charges_one_fuel_per_node() {
    let table = parse(&didl("02 6d 01 6c 01 00 71 01 00")).unwrap();
    assert_eq!(table.descriptor_size(TypeRef::Index(0)), 3);

    let mut fuel = 3;
    assert!(table.materialize(TypeRef::Index(0), &mut fuel, u32::MAX).is_ok());
    assert_eq!(fuel, 0);

    let mut fuel = 2;
    assert_eq!(
        table.materialize(TypeRef::Index(0), &mut fuel, u32::MAX).unwrap_err(),
        Error::FuelExhausted
    );
}

#[test]
fn materialize_respects_depth_limit() {
    // opt opt opt bool
    let table = parse(&didl("03 6e 01 6e 02 6e 7e 01 00")).unwrap();
    assert_eq!(
        table.materialize(TypeRef::Index(0), &mut 100, 2).unwrap_err(),
        Error::RecursionLimitExceeded(2)
    );
    assert!(table.materialize(TypeRef::Index(0), &mut 100, 3).is_ok());
}

#[test]
fn shared_subtrees_count_every_occurrence() {
    let table = parse(&shared_subtrees(3)).unwrap();
    // the option over 15 record nodes
    assert_eq!(table.descriptor_size(TypeRef::Index(0)), 16);
    assert_eq!(table.descriptor_size(TypeRef::Index(4)), 1);
}

#[test]
fn deep_shared_subtrees_fail_before_expanding() {
    let table = parse(&shared_subtrees(40)).unwrap();
    assert!(table.descriptor_size(TypeRef::Index(0)) > 1 << 40);

    let mut fuel = 100_000_000;
    assert_eq!(
        table.materialize(TypeRef::Index(0), &mut fuel, 512).unwrap_err(),
        Error::FuelExhausted
    );
    assert_eq!(fuel, 0);
}

#[test]
fn cycle_counts_back_edge_once() {
    let table = parse(&didl("01 6e 00 01 00")).unwrap();
    assert_eq!(table.descriptor_size(TypeRef::Index(0)), 2);
    let mut fuel = 2;
    assert_eq!(
        table.materialize(TypeRef::Index(0), &mut fuel, u32::MAX).unwrap(),
        IdlType::opt(IdlType::Reserved)
    );
}
