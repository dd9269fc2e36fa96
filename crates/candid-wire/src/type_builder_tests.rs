use candid_core::{FuncMode, IdlType, Opcode};

use crate::error::Error;
use crate::reader::Reader;
use crate::type_builder::TypeTableBuilder;
use crate::type_table::{TypeRef, TypeTable};

fn emit(types: &[IdlType]) -> Vec<u8> {
    let mut builder = TypeTableBuilder::new();
    for ty in types {
        builder.push_arg(ty).unwrap();
    }
    let mut out = Vec::new();
    builder.emit(&mut out);
    out
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn greet() -> IdlType {
    IdlType::func(vec![IdlType::Text], vec![IdlType::Nat], vec![FuncMode::Query])
}

#[test]
fn primitives_take_no_slot() {
    let mut builder = TypeTableBuilder::new();
    assert_eq!(
        builder.push_arg(&IdlType::Nat).unwrap(),
        TypeRef::Primitive(Opcode::Nat)
    );
    assert!(builder.is_empty());
    assert_eq!(hex(&emit(&[IdlType::Nat, IdlType::Text])), "00 02 7d 71");
}

#[test]
fn record_entry_in_hash_order() {
    let ty = IdlType::record([("foo", IdlType::Int), ("bar", IdlType::Bool)]);
    assert_eq!(
        hex(&emit(&[ty])),
        "01 6c 02 d3 e3 aa 02 7e 86 8e b7 02 7c 01 00"
    );
}

#[test]
fn identical_args_share_one_entry() {
    let ty = IdlType::record([("foo", IdlType::Int)]);
    let mut builder = TypeTableBuilder::new();
    builder.push_arg(&ty).unwrap();
    builder.push_arg(&ty.clone()).unwrap();
    assert_eq!(builder.len(), 1);
    assert_eq!(builder.args(), &[TypeRef::Index(0), TypeRef::Index(0)]);
}

#[test]
fn parent_slot_precedes_children() {
    let ty = IdlType::vec(IdlType::record([("a", IdlType::opt(IdlType::Text))]));
    assert_eq!(hex(&emit(&[ty])), "03 6d 01 6c 01 61 02 6e 71 01 00");
}

#[test]
fn shared_nested_record_is_deduplicated() {
    let inner = IdlType::record([("x", IdlType::Nat)]);
    let outer = IdlType::record([("a", inner.clone()), ("b", inner)]);
    assert_eq!(hex(&emit(&[outer])), "02 6c 02 61 01 62 01 6c 01 78 7d 01 00");
}

#[test]
fn service_methods_precede_service_and_dedup_by_bytes() {
    let service = IdlType::service([("greet", greet()), ("hello", greet())]);
    assert_eq!(
        hex(&emit(&[service])),
        "02 6a 01 71 01 7d 01 01 69 02 05 67 72 65 65 74 00 05 68 65 6c 6c 6f 00 01 01"
    );
}

#[test]
fn standalone_func_reuses_service_method_entry() {
    let service = IdlType::service([("greet", greet())]);
    let mut builder = TypeTableBuilder::new();
    builder.push_arg(&service).unwrap();
    assert_eq!(builder.push_arg(&greet()).unwrap(), TypeRef::Index(0));
    assert_eq!(builder.len(), 2);
}

#[test]
fn service_rejects_non_func_method() {
    let service = IdlType::service([("value", IdlType::Nat)]);
    let err = TypeTableBuilder::new().push_arg(&service).unwrap_err();
    assert_eq!(
        err,
        Error::InvalidServiceMethod {
            name: "value".to_string()
        }
    );
}

#[test]
fn func_rejects_compound_args() {
    let func = IdlType::func(vec![IdlType::vec(IdlType::Nat8)], vec![], vec![]);
    let err = TypeTableBuilder::new().push_arg(&func).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFuncType { .. }));
}

#[test]
fn constructed_entry_rejects_reference_and_primitive_types() {
    let mut builder = TypeTableBuilder::new();
    assert!(matches!(
        builder.register_constructed(&greet()).unwrap_err(),
        Error::UnsupportedFuncType { .. }
    ));
    assert!(matches!(
        builder
            .register_constructed(&IdlType::service::<&str, _>([]))
            .unwrap_err(),
        Error::UnsupportedFuncType { .. }
    ));
    assert_eq!(
        builder.register_constructed(&IdlType::Bool).unwrap_err(),
        Error::UnsupportedOpcode { code: -2 }
    );
    assert!(builder.is_empty());
}

#[test]
fn func_rejects_several_modes() {
    let func = IdlType::func(vec![], vec![], vec![FuncMode::Query, FuncMode::Oneway]);
    let err = TypeTableBuilder::new().push_arg(&func).unwrap_err();
    assert_eq!(err, Error::AnnotationCount { count: 2 });
}

#[test]
fn emitted_table_parses_back() {
    let types = vec![
        IdlType::record([
            ("name", IdlType::Text),
            ("tags", IdlType::vec(IdlType::Text)),
            ("next", IdlType::opt(IdlType::variant([("a", IdlType::Null), ("b", IdlType::Nat64)]))),
        ]),
        IdlType::service([("greet", greet())]),
        IdlType::Principal,
    ];
    let mut bytes = b"DIDL".to_vec();
    bytes.extend(emit(&types));

    let table = TypeTable::parse(&mut Reader::new(&bytes)).unwrap();
    let mut fuel = u64::MAX;
    let parsed: Vec<IdlType> = table
        .args()
        .iter()
        .map(|&a| table.materialize(a, &mut fuel, u32::MAX).unwrap())
        .collect();
    assert_eq!(parsed, types);
}
