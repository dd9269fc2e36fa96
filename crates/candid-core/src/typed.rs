//! Values paired with their type descriptors.

use std::collections::BTreeMap;
use std::fmt;

use crate::colors::Colors;
use crate::convert::CandidType;
use crate::types::IdlType;
use crate::value::Value;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{found} value does not conform to type {expected}")]
pub struct ConformanceError {
    pub expected: String,
    pub found: &'static str,
}

/// A value together with the type it is encoded as.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedValue {
    value: Value,
    ty: IdlType,
}

impl TypedValue {
    /// Pair a value with a type, checking that the value inhabits it.
    pub fn new(value: Value, ty: IdlType) -> Result<Self, ConformanceError> {
        check(&value, &ty)?;
        Ok(Self { value, ty })
    }

    /// Pair a value with a type the caller already knows it inhabits.
    pub fn new_unchecked(value: Value, ty: IdlType) -> Self {
        Self { value, ty }
    }

    /// Derive a type from the value's shape.
    ///
    /// Empty vectors and absent options get a `null` inner type, vectors take
    /// the type of their first element, variants get a single branch.
    pub fn infer(value: Value) -> Self {
        let ty = infer_type(&value);
        Self { value, ty }
    }

    pub fn from_native<T: CandidType>(native: &T) -> Self {
        Self {
            value: native.to_value(),
            ty: T::idl_type(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn ty(&self) -> &IdlType {
        &self.ty
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn into_parts(self) -> (Value, IdlType) {
        (self.value, self.ty)
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.value, self.ty)
    }
}

/// Format an argument list as `(v1, v2)`, optionally annotating each value
/// with its type.
pub fn format_args(args: &[TypedValue], annotate: bool, colors: Colors) -> String {
    let mut out = String::from("(");
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&arg.value.format(colors));
        if annotate {
            out.push_str(colors.dim);
            out.push_str(" : ");
            out.push_str(&arg.ty.to_string());
            out.push_str(colors.reset);
        }
    }
    out.push(')');
    out
}

fn check(value: &Value, ty: &IdlType) -> Result<(), ConformanceError> {
    let ok = match (ty, value) {
        (IdlType::Null, Value::Null)
        | (IdlType::Bool, Value::Bool(_))
        | (IdlType::Nat, Value::Nat(_))
        | (IdlType::Int, Value::Int(_))
        | (IdlType::Nat8, Value::Nat8(_))
        | (IdlType::Nat16, Value::Nat16(_))
        | (IdlType::Nat32, Value::Nat32(_))
        | (IdlType::Nat64, Value::Nat64(_))
        | (IdlType::Int8, Value::Int8(_))
        | (IdlType::Int16, Value::Int16(_))
        | (IdlType::Int32, Value::Int32(_))
        | (IdlType::Int64, Value::Int64(_))
        | (IdlType::Float32, Value::Float32(_))
        | (IdlType::Float64, Value::Float64(_))
        | (IdlType::Text, Value::Text(_))
        | (IdlType::Reserved, Value::Reserved)
        | (IdlType::Principal, Value::Principal(_))
        | (IdlType::Opt(_), Value::Opt(None))
        | (IdlType::Func(_), Value::Func(..))
        | (IdlType::Service(_), Value::Service(_)) => true,
        (IdlType::Opt(inner), Value::Opt(Some(v))) => return check(v, inner),
        (IdlType::Vec(inner), Value::Vec(items)) => {
            return items.iter().try_for_each(|item| check(item, inner));
        }
        (IdlType::Record(fields), Value::Record(values)) => {
            if fields.len() != values.len() {
                false
            } else {
                for (label, field_ty) in fields {
                    let v = values.get(label).ok_or_else(|| mismatch(ty, value))?;
                    check(v, field_ty)?;
                }
                true
            }
        }
        (IdlType::Variant(branches), Value::Variant(label, v)) => match branches.get(label) {
            Some(branch_ty) => return check(v, branch_ty),
            None => false,
        },
        _ => false,
    };
    if ok { Ok(()) } else { Err(mismatch(ty, value)) }
}

fn mismatch(ty: &IdlType, value: &Value) -> ConformanceError {
    ConformanceError {
        expected: ty.to_string(),
        found: value.kind_name(),
    }
}

fn infer_type(value: &Value) -> IdlType {
    match value {
        Value::Null => IdlType::Null,
        Value::Bool(_) => IdlType::Bool,
        Value::Nat(_) => IdlType::Nat,
        Value::Int(_) => IdlType::Int,
        Value::Nat8(_) => IdlType::Nat8,
        Value::Nat16(_) => IdlType::Nat16,
        Value::Nat32(_) => IdlType::Nat32,
        Value::Nat64(_) => IdlType::Nat64,
        Value::Int8(_) => IdlType::Int8,
        Value::Int16(_) => IdlType::Int16,
        Value::Int32(_) => IdlType::Int32,
        Value::Int64(_) => IdlType::Int64,
        Value::Float32(_) => IdlType::Float32,
        Value::Float64(_) => IdlType::Float64,
        Value::Text(_) => IdlType::Text,
        Value::Reserved => IdlType::Reserved,
        Value::Principal(_) => IdlType::Principal,
        Value::Opt(None) => IdlType::opt(IdlType::Null),
        Value::Opt(Some(inner)) => IdlType::opt(infer_type(inner)),
        Value::Vec(items) => IdlType::vec(items.first().map_or(IdlType::Null, infer_type)),
        Value::Record(fields) => IdlType::Record(
            fields
                .iter()
                .map(|(label, v)| (label.clone(), infer_type(v)))
                .collect(),
        ),
        Value::Variant(label, v) => {
            IdlType::Variant(BTreeMap::from([(label.clone(), infer_type(v))]))
        }
        Value::Func(..) => IdlType::func(Vec::new(), Vec::new(), Vec::new()),
        Value::Service(_) => IdlType::Service(BTreeMap::new()),
    }
}
