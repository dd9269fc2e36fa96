//! Deserializer state machine.
//!
//! The current-type cursor holds the wire types still to be consumed. Each
//! decode step pops the front, resolves table indices, and pushes child
//! types to the front before descending into them. An optional expected
//! type travels alongside and supplies field names and descriptors.

use std::collections::{BTreeMap, VecDeque};

use candid_core::{IdlType, Label, Opcode, Principal, Value};
use candid_wire::{Error, Reader, Result, TypeEntry, TypeRef, TypeTable, leb128};

use crate::config::DecodeLimits;

/// A decoded value and the type it was decoded as.
pub(crate) type Decoded = (Value, IdlType);

pub(crate) struct Deserializer<'a> {
    reader: Reader<'a>,
    table: &'a TypeTable,
    current_type: VecDeque<TypeRef>,
    /// Records entered since the last non-record value.
    record_nesting_depth: usize,
    depth: u32,
    fuel: u64,
    limits: DecodeLimits,
}

impl<'a> Deserializer<'a> {
    pub(crate) fn new(reader: Reader<'a>, table: &'a TypeTable, limits: DecodeLimits) -> Self {
        Self {
            reader,
            table,
            current_type: VecDeque::new(),
            record_nesting_depth: 0,
            depth: 0,
            fuel: limits.fuel,
            limits,
        }
    }

    /// Decode one top-level argument of wire type `wire`.
    pub(crate) fn decode_arg(&mut self, wire: TypeRef, expected: Option<&IdlType>) -> Result<Decoded> {
        self.record_nesting_depth = 0;
        self.push_and_decode(wire, expected)
    }

    /// Fail if any value bytes are left unread.
    pub(crate) fn finish(self) -> Result<()> {
        match self.reader.remaining() {
            0 => Ok(()),
            remaining => Err(Error::TrailingBytes { remaining }),
        }
    }

    fn push_and_decode(&mut self, wire: TypeRef, expected: Option<&IdlType>) -> Result<Decoded> {
        self.current_type.push_front(wire);
        self.deserialize_any(expected)
    }

    fn deserialize_any(&mut self, expected: Option<&IdlType>) -> Result<Decoded> {
        let Some(wire) = self.current_type.pop_front() else {
            unreachable!("a type is pushed before every decode step");
        };

        if self.fuel == 0 {
            return Err(Error::FuelExhausted);
        }
        self.fuel -= 1;
        if self.depth >= self.limits.recursion_limit {
            return Err(Error::RecursionLimitExceeded(self.depth));
        }

        self.depth += 1;
        let result = self.dispatch(wire, expected);
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self, wire: TypeRef, expected: Option<&IdlType>) -> Result<Decoded> {
        let op = self.table.opcode_of(wire)?;
        if op != Opcode::Record {
            self.record_nesting_depth = 0;
        }

        match expected {
            Some(IdlType::Reserved) => {
                self.decode_wire(wire, None)?;
                return Ok((Value::Reserved, IdlType::Reserved));
            }
            Some(exp) if exp.opcode() != op => {
                return Err(Error::TypeMismatch {
                    expected: exp.opcode().name(),
                    actual: op.name(),
                });
            }
            _ => {}
        }
        self.decode_wire(wire, expected)
    }

    fn decode_wire(&mut self, wire: TypeRef, expected: Option<&IdlType>) -> Result<Decoded> {
        let table = self.table;
        let index = match wire {
            TypeRef::Primitive(op) => return self.deserialize_primitive(op),
            TypeRef::Index(index) => index,
        };
        match table.entry(index)? {
            TypeEntry::Opt(inner) => self.deserialize_opt(*inner, expected),
            TypeEntry::Vec(inner) => self.deserialize_vec(*inner, expected),
            TypeEntry::Record(fields) => self.deserialize_record(fields, expected),
            TypeEntry::Variant(branches) => self.deserialize_variant(branches, expected),
            TypeEntry::Func { .. } => {
                self.expect_reference_tag()?;
                let principal = self.read_principal()?;
                let method = self.read_text()?;
                Ok((Value::Func(principal, method), self.describe(wire, expected)?))
            }
            TypeEntry::Service(_) => {
                let principal = self.read_principal()?;
                Ok((Value::Service(principal), self.describe(wire, expected)?))
            }
        }
    }

    fn deserialize_primitive(&mut self, op: Opcode) -> Result<Decoded> {
        let value = match op {
            Opcode::Null => Value::Null,
            Opcode::Bool => match self.reader.read_u8()? {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                byte => return Err(Error::InvalidBool(byte)),
            },
            Opcode::Nat => Value::Nat(leb128::read_nat(&mut self.reader)?),
            Opcode::Int => Value::Int(leb128::read_int(&mut self.reader)?),
            Opcode::Nat8 => Value::Nat8(self.reader.read_u8()?),
            Opcode::Nat16 => Value::Nat16(u16::from_le_bytes(self.reader.read_array()?)),
            Opcode::Nat32 => Value::Nat32(u32::from_le_bytes(self.reader.read_array()?)),
            Opcode::Nat64 => Value::Nat64(u64::from_le_bytes(self.reader.read_array()?)),
            Opcode::Int8 => Value::Int8(i8::from_le_bytes(self.reader.read_array()?)),
            Opcode::Int16 => Value::Int16(i16::from_le_bytes(self.reader.read_array()?)),
            Opcode::Int32 => Value::Int32(i32::from_le_bytes(self.reader.read_array()?)),
            Opcode::Int64 => Value::Int64(i64::from_le_bytes(self.reader.read_array()?)),
            Opcode::Float32 => Value::Float32(f32::from_le_bytes(self.reader.read_array()?)),
            Opcode::Float64 => Value::Float64(f64::from_le_bytes(self.reader.read_array()?)),
            Opcode::Text => Value::Text(self.read_text()?),
            Opcode::Reserved => Value::Reserved,
            Opcode::Empty => return Err(Error::EmptyValue),
            Opcode::Principal => Value::Principal(self.read_principal()?),
            Opcode::Opt
            | Opcode::Vec
            | Opcode::Record
            | Opcode::Variant
            | Opcode::Func
            | Opcode::Service => return Err(Error::UnsupportedOpcode { code: op.code() }),
        };
        let ty = IdlType::from_opcode(op).ok_or(Error::UnsupportedOpcode { code: op.code() })?;
        Ok((value, ty))
    }

    fn deserialize_opt(&mut self, inner: TypeRef, expected: Option<&IdlType>) -> Result<Decoded> {
        let hint = match expected {
            Some(IdlType::Opt(t)) => Some(t.as_ref()),
            _ => None,
        };
        match self.reader.read_u8()? {
            0 => Ok((Value::Opt(None), IdlType::opt(self.describe(inner, hint)?))),
            1 => {
                let (value, ty) = self.push_and_decode(inner, hint)?;
                Ok((Value::some(value), IdlType::opt(ty)))
            }
            tag => Err(Error::InvalidOptTag(tag)),
        }
    }

    fn deserialize_vec(&mut self, inner: TypeRef, expected: Option<&IdlType>) -> Result<Decoded> {
        let hint = match expected {
            Some(IdlType::Vec(t)) => Some(t.as_ref()),
            _ => None,
        };
        let len = leb128::read_len(&mut self.reader)?;
        let mut items = Vec::with_capacity(len.min(self.reader.remaining()));
        let mut element_ty = None;
        for _ in 0..len {
            let (value, ty) = self.push_and_decode(inner, hint)?;
            element_ty.get_or_insert(ty);
            items.push(value);
        }
        let element_ty = match element_ty {
            Some(ty) => ty,
            None => self.describe(inner, hint)?,
        };
        Ok((Value::Vec(items), IdlType::vec(element_ty)))
    }

    fn deserialize_record(
        &mut self,
        fields: &'a [(u32, TypeRef)],
        expected: Option<&IdlType>,
    ) -> Result<Decoded> {
        let saved = self.record_nesting_depth;
        self.record_nesting_depth += 1;
        if self.record_nesting_depth > self.table.len() {
            return Err(Error::RecursiveRecord {
                depth: self.record_nesting_depth,
                table_len: self.table.len(),
            });
        }

        let expected_fields = match expected {
            Some(IdlType::Record(f)) => Some(f),
            _ => None,
        };
        let mut values = BTreeMap::new();
        let mut types = BTreeMap::new();
        for &(hash, field_ref) in fields {
            let (label, hint) = resolve_label(expected_fields, hash);
            let (value, ty) = self.push_and_decode(field_ref, hint)?;
            values.insert(label.clone(), value);
            types.insert(label, ty);
        }

        self.record_nesting_depth = saved;
        Ok((Value::Record(values), IdlType::Record(types)))
    }

    fn deserialize_variant(
        &mut self,
        branches: &'a [(u32, TypeRef)],
        expected: Option<&IdlType>,
    ) -> Result<Decoded> {
        let expected_branches = match expected {
            Some(IdlType::Variant(b)) => Some(b),
            _ => None,
        };
        let index = leb128::read_u64(&mut self.reader)?;
        let selected = usize::try_from(index)
            .ok()
            .filter(|&i| i < branches.len())
            .ok_or(Error::VariantIndexOutOfRange {
                index,
                len: branches.len(),
            })?;

        let (hash, branch_ref) = branches[selected];
        let (label, hint) = resolve_label(expected_branches, hash);
        if expected_branches.is_some() && hint.is_none() {
            return Err(Error::UnknownFieldHash { hash });
        }
        let (value, ty) = self.push_and_decode(branch_ref, hint)?;

        let mut types = BTreeMap::new();
        for (i, &(other_hash, other_ref)) in branches.iter().enumerate() {
            if i != selected {
                let (other_label, other_hint) = resolve_label(expected_branches, other_hash);
                types.insert(other_label, self.describe(other_ref, other_hint)?);
            }
        }
        types.insert(label.clone(), ty);
        Ok((
            Value::Variant(label, Box::new(value)),
            IdlType::Variant(types),
        ))
    }

    /// Descriptor for a wire type without decoding a value of it.
    ///
    /// Materialized descriptors draw on the same fuel and depth as values.
    fn describe(&mut self, wire: TypeRef, expected: Option<&IdlType>) -> Result<IdlType> {
        match expected {
            Some(ty) => Ok(ty.clone()),
            None => {
                let depth_limit = self.limits.recursion_limit.saturating_sub(self.depth);
                self.table.materialize(wire, &mut self.fuel, depth_limit)
            }
        }
    }

    fn expect_reference_tag(&mut self) -> Result<()> {
        match self.reader.read_u8()? {
            1 => Ok(()),
            tag => Err(Error::InvalidReferenceTag(tag)),
        }
    }

    fn read_principal(&mut self) -> Result<Principal> {
        self.expect_reference_tag()?;
        let len = leb128::read_len(&mut self.reader)?;
        let bytes = self.reader.take(len)?;
        Ok(Principal::from_slice(bytes)?)
    }

    fn read_text(&mut self) -> Result<String> {
        let len = leb128::read_len(&mut self.reader)?;
        let offset = self.reader.offset();
        let bytes = self.reader.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| Error::InvalidUtf8 { offset })
    }
}

/// Map a wire hash onto the expected type's label, if it declares one.
fn resolve_label(
    expected: Option<&BTreeMap<Label, IdlType>>,
    hash: u32,
) -> (Label, Option<&IdlType>) {
    match expected.and_then(|fields| fields.get_key_value(&Label::Id(hash))) {
        Some((label, ty)) => (label.clone(), Some(ty)),
        None => (Label::Id(hash), None),
    }
}
