//! Value serializer.
//!
//! Writes values in the shape of their declared type. The type table has
//! already been emitted by the time values are written.

use candid_core::{IdlType, Principal, Value};
use candid_wire::{Error, Result, leb128};

pub(crate) struct ValueSerializer<'o> {
    out: &'o mut Vec<u8>,
}

impl<'o> ValueSerializer<'o> {
    pub(crate) fn new(out: &'o mut Vec<u8>) -> Self {
        Self { out }
    }

    pub(crate) fn write(&mut self, value: &Value, ty: &IdlType) -> Result<()> {
        match (ty, value) {
            (IdlType::Null, Value::Null) | (IdlType::Reserved, Value::Reserved) => {}
            (IdlType::Bool, Value::Bool(b)) => self.out.push(u8::from(*b)),
            (IdlType::Nat, Value::Nat(n)) => leb128::write_nat(self.out, n),
            (IdlType::Int, Value::Int(i)) => leb128::write_int(self.out, i),
            (IdlType::Nat8, Value::Nat8(n)) => self.out.push(*n),
            (IdlType::Nat16, Value::Nat16(n)) => self.out.extend_from_slice(&n.to_le_bytes()),
            (IdlType::Nat32, Value::Nat32(n)) => self.out.extend_from_slice(&n.to_le_bytes()),
            (IdlType::Nat64, Value::Nat64(n)) => self.out.extend_from_slice(&n.to_le_bytes()),
            (IdlType::Int8, Value::Int8(i)) => self.out.extend_from_slice(&i.to_le_bytes()),
            (IdlType::Int16, Value::Int16(i)) => self.out.extend_from_slice(&i.to_le_bytes()),
            (IdlType::Int32, Value::Int32(i)) => self.out.extend_from_slice(&i.to_le_bytes()),
            (IdlType::Int64, Value::Int64(i)) => self.out.extend_from_slice(&i.to_le_bytes()),
            (IdlType::Float32, Value::Float32(x)) => self.out.extend_from_slice(&x.to_le_bytes()),
            (IdlType::Float64, Value::Float64(x)) => self.out.extend_from_slice(&x.to_le_bytes()),
            (IdlType::Text, Value::Text(s)) => self.write_text(s),
            (IdlType::Principal, Value::Principal(p)) => self.write_principal(p),
            (IdlType::Opt(_), Value::Opt(None)) => self.out.push(0),
            (IdlType::Opt(inner), Value::Opt(Some(v))) => {
                self.out.push(1);
                self.write(v, inner)?;
            }
            (IdlType::Vec(inner), Value::Vec(items)) => {
                leb128::write_unsigned(self.out, items.len() as u64);
                for item in items {
                    self.write(item, inner)?;
                }
            }
            (IdlType::Record(fields), Value::Record(values)) => {
                if let Some(extra) = values.keys().find(|l| !fields.contains_key(*l)) {
                    return Err(Error::UnexpectedField {
                        label: extra.to_string(),
                    });
                }
                for (label, field_ty) in fields {
                    let v = values.get(label).ok_or_else(|| Error::MissingField {
                        label: label.to_string(),
                    })?;
                    self.write(v, field_ty)?;
                }
            }
            (IdlType::Variant(branches), Value::Variant(label, v)) => {
                let (index, (_, branch_ty)) = branches
                    .iter()
                    .enumerate()
                    .find(|(_, (l, _))| *l == label)
                    .ok_or_else(|| Error::UnknownVariantLabel {
                        label: label.to_string(),
                        ty: ty.to_string(),
                    })?;
                leb128::write_unsigned(self.out, index as u64);
                self.write(v, branch_ty)?;
            }
            (IdlType::Func(_), Value::Func(p, method)) => {
                self.out.push(1);
                self.write_principal(p);
                self.write_text(method);
            }
            (IdlType::Service(_), Value::Service(p)) => self.write_principal(p),
            _ => {
                return Err(Error::ValueTypeMismatch {
                    expected: ty.to_string(),
                    found: value.kind_name(),
                });
            }
        }
        Ok(())
    }

    fn write_text(&mut self, s: &str) {
        leb128::write_unsigned(self.out, s.len() as u64);
        self.out.extend_from_slice(s.as_bytes());
    }

    fn write_principal(&mut self, p: &Principal) {
        self.out.push(1);
        leb128::write_unsigned(self.out, p.len() as u64);
        self.out.extend_from_slice(p.as_slice());
    }
}
