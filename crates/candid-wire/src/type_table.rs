//! Type table parsing.
//!
//! Layout after the magic: entry count, entries, argument count, argument
//! type references. References are signed: negative values are primitive
//! opcodes, non-negative values index the table.

use std::collections::BTreeMap;

use candid_core::{FuncMode, IdlType, Label, Opcode};

use crate::MAGIC;
use crate::error::{Error, Result};
use crate::leb128;
use crate::reader::Reader;

/// Type reference: a primitive opcode or a table index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(Opcode),
    Index(u32),
}

impl TypeRef {
    /// Validate a wire reference against a table of `table_len` entries.
    pub fn from_code(code: i64, table_len: usize) -> Result<Self> {
        let invalid = Error::InvalidTypeRef {
            reference: code,
            table_len,
        };
        if code >= 0 {
            return match u32::try_from(code) {
                Ok(index) if (index as usize) < table_len => Ok(Self::Index(index)),
                _ => Err(invalid),
            };
        }
        match Opcode::from_code(code) {
            Some(op) if op.is_primitive() => Ok(Self::Primitive(op)),
            _ => Err(invalid),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Primitive(op) => op.code(),
            Self::Index(index) => i64::from(index),
        }
    }
}

/// One parsed type table entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeEntry {
    Opt(TypeRef),
    Vec(TypeRef),
    /// Fields in strictly ascending hash order.
    Record(Vec<(u32, TypeRef)>),
    Variant(Vec<(u32, TypeRef)>),
    Func {
        args: Vec<TypeRef>,
        rets: Vec<TypeRef>,
        modes: Vec<FuncMode>,
    },
    Service(Vec<(String, TypeRef)>),
}

impl TypeEntry {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Opt(_) => Opcode::Opt,
            Self::Vec(_) => Opcode::Vec,
            Self::Record(_) => Opcode::Record,
            Self::Variant(_) => Opcode::Variant,
            Self::Func { .. } => Opcode::Func,
            Self::Service(_) => Opcode::Service,
        }
    }

    /// References this entry points at, in wire order.
    pub fn children(&self) -> Vec<TypeRef> {
        match self {
            Self::Opt(r) | Self::Vec(r) => vec![*r],
            Self::Record(fields) | Self::Variant(fields) => {
                fields.iter().map(|(_, r)| *r).collect()
            }
            Self::Func { args, rets, .. } => args.iter().chain(rets).copied().collect(),
            Self::Service(methods) => methods.iter().map(|(_, r)| *r).collect(),
        }
    }
}

/// Parsed type table plus the argument type list. Immutable once parsed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeTable {
    entries: Vec<TypeEntry>,
    args: Vec<TypeRef>,
    /// Descriptor node count per entry, back-edges counted as one node.
    sizes: Vec<u64>,
}

impl TypeTable {
    /// Check the magic, then parse the table and argument list.
    pub fn parse(r: &mut Reader<'_>) -> Result<Self> {
        let magic = r.take(MAGIC.len()).map_err(|_| Error::InvalidMagic)?;
        if magic != MAGIC.as_slice() {
            return Err(Error::InvalidMagic);
        }

        let len = leb128::read_len(r)?;
        let mut entries = Vec::with_capacity(len.min(r.remaining()));
        for index in 0..len {
            let entry = parse_entry(r, len)?;
            tracing::trace!(index, ?entry, "type table entry");
            entries.push(entry);
        }

        let arg_count = leb128::read_len(r)?;
        let mut args = Vec::with_capacity(arg_count.min(r.remaining()));
        for _ in 0..arg_count {
            args.push(read_ref(r, len)?);
        }

        tracing::debug!(entries = entries.len(), args = args.len(), "parsed type table");
        let sizes = descriptor_sizes(&entries);
        Ok(Self {
            entries,
            args,
            sizes,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TypeEntry] {
        &self.entries
    }

    pub fn args(&self) -> &[TypeRef] {
        &self.args
    }

    pub fn entry(&self, index: u32) -> Result<&TypeEntry> {
        self.entries
            .get(index as usize)
            .ok_or(Error::InvalidTypeRef {
                reference: i64::from(index),
                table_len: self.entries.len(),
            })
    }

    /// Opcode a reference resolves to.
    pub fn opcode_of(&self, r: TypeRef) -> Result<Opcode> {
        match r {
            TypeRef::Primitive(op) => Ok(op),
            TypeRef::Index(index) => Ok(self.entry(index)?.opcode()),
        }
    }

    /// Nodes a descriptor for `r` is expected to hold. Saturates.
    pub fn descriptor_size(&self, r: TypeRef) -> u64 {
        match r {
            TypeRef::Primitive(_) => 1,
            TypeRef::Index(index) => self.sizes.get(index as usize).copied().unwrap_or(1),
        }
    }

    /// Build a descriptor for a wire type.
    ///
    /// Recursive references fold to `reserved` at the back-edge, since
    /// descriptors are finite trees. Every node costs one unit of `fuel`,
    /// and nesting deeper than `depth_limit` fails.
    pub fn materialize(&self, r: TypeRef, fuel: &mut u64, depth_limit: u32) -> Result<IdlType> {
        if self.descriptor_size(r) > *fuel {
            *fuel = 0;
            return Err(Error::FuelExhausted);
        }
        let mut walk = Walk {
            visiting: Vec::new(),
            fuel,
            depth_limit,
        };
        self.materialize_inner(r, &mut walk)
    }

    fn materialize_inner(&self, r: TypeRef, walk: &mut Walk<'_>) -> Result<IdlType> {
        if *walk.fuel == 0 {
            return Err(Error::FuelExhausted);
        }
        *walk.fuel -= 1;

        let index = match r {
            TypeRef::Primitive(op) => {
                return Ok(IdlType::from_opcode(op).unwrap_or(IdlType::Reserved));
            }
            TypeRef::Index(index) => index,
        };
        if walk.visiting.contains(&index) {
            return Ok(IdlType::Reserved);
        }
        let depth = walk.visiting.len() as u32;
        if depth >= walk.depth_limit {
            return Err(Error::RecursionLimitExceeded(depth));
        }
        let entry = self.entry(index)?;

        walk.visiting.push(index);
        let ty = match entry {
            TypeEntry::Opt(inner) => IdlType::opt(self.materialize_inner(*inner, walk)?),
            TypeEntry::Vec(inner) => IdlType::vec(self.materialize_inner(*inner, walk)?),
            TypeEntry::Record(fields) => IdlType::Record(self.materialize_fields(fields, walk)?),
            TypeEntry::Variant(fields) => {
                IdlType::Variant(self.materialize_fields(fields, walk)?)
            }
            TypeEntry::Func { args, rets, modes } => IdlType::func(
                args.iter()
                    .map(|a| self.materialize_inner(*a, walk))
                    .collect::<Result<_>>()?,
                rets.iter()
                    .map(|a| self.materialize_inner(*a, walk))
                    .collect::<Result<_>>()?,
                modes.clone(),
            ),
            TypeEntry::Service(methods) => IdlType::Service(
                methods
                    .iter()
                    .map(|(name, m)| {
                        Ok::<_, Error>((name.clone(), self.materialize_inner(*m, walk)?))
                    })
                    .collect::<Result<_>>()?,
            ),
        };
        walk.visiting.pop();
        Ok(ty)
    }

    fn materialize_fields(
        &self,
        fields: &[(u32, TypeRef)],
        walk: &mut Walk<'_>,
    ) -> Result<BTreeMap<Label, IdlType>> {
        fields
            .iter()
            .map(|(hash, r)| {
                Ok::<_, Error>((Label::Id(*hash), self.materialize_inner(*r, walk)?))
            })
            .collect()
    }
}

struct Walk<'f> {
    visiting: Vec<u32>,
    fuel: &'f mut u64,
    depth_limit: u32,
}

#[derive(Clone, Copy)]
enum Mark {
    Unvisited,
    Active,
    Done(u64),
}

/// Memoized node counts, one per entry. Shared subtrees count once per
/// occurrence, so a DAG-shaped table reports its full expanded size.
fn descriptor_sizes(entries: &[TypeEntry]) -> Vec<u64> {
    let mut marks = vec![Mark::Unvisited; entries.len()];
    for root in 0..entries.len() {
        if !matches!(marks[root], Mark::Unvisited) {
            continue;
        }
        marks[root] = Mark::Active;
        // (index, children, next child, size so far)
        let mut stack = vec![(root, entries[root].children(), 0usize, 1u64)];
        while let Some((index, children, next, size)) = stack.last_mut() {
            let Some(&child) = children.get(*next) else {
                let (index, done) = (*index, *size);
                stack.pop();
                marks[index] = Mark::Done(done);
                if let Some(parent) = stack.last_mut() {
                    parent.3 = parent.3.saturating_add(done);
                }
                continue;
            };
            *next += 1;
            let child_size = match child {
                TypeRef::Primitive(_) => 1,
                TypeRef::Index(i) => match marks[i as usize] {
                    Mark::Done(s) => s,
                    Mark::Active => 1,
                    Mark::Unvisited => {
                        marks[i as usize] = Mark::Active;
                        stack.push((i as usize, entries[i as usize].children(), 0, 1));
                        continue;
                    }
                },
            };
            *size = size.saturating_add(child_size);
        }
    }
    marks
        .into_iter()
        .map(|m| match m {
            Mark::Done(s) => s,
            Mark::Unvisited | Mark::Active => 1,
        })
        .collect()
}

fn read_ref(r: &mut Reader<'_>, table_len: usize) -> Result<TypeRef> {
    let code = leb128::read_i32(r)?;
    TypeRef::from_code(i64::from(code), table_len)
}

fn parse_entry(r: &mut Reader<'_>, table_len: usize) -> Result<TypeEntry> {
    let code = i64::from(leb128::read_i32(r)?);
    let op = Opcode::from_code(code)
        .filter(|op| !op.is_primitive())
        .ok_or(Error::UnsupportedOpcode { code })?;

    let entry = match op {
        Opcode::Opt => TypeEntry::Opt(read_ref(r, table_len)?),
        Opcode::Vec => TypeEntry::Vec(read_ref(r, table_len)?),
        Opcode::Record => TypeEntry::Record(parse_fields(r, table_len)?),
        Opcode::Variant => TypeEntry::Variant(parse_fields(r, table_len)?),
        Opcode::Func => {
            let args = parse_func_refs(r, table_len)?;
            let rets = parse_func_refs(r, table_len)?;
            let modes = parse_annotations(r)?;
            TypeEntry::Func { args, rets, modes }
        }
        Opcode::Service => TypeEntry::Service(parse_methods(r, table_len)?),
        _ => return Err(Error::UnsupportedOpcode { code }),
    };
    Ok(entry)
}

fn parse_fields(r: &mut Reader<'_>, table_len: usize) -> Result<Vec<(u32, TypeRef)>> {
    let count = leb128::read_len(r)?;
    let mut fields: Vec<(u32, TypeRef)> = Vec::with_capacity(count.min(r.remaining()));
    for _ in 0..count {
        let hash = leb128::read_u32(r)?;
        match fields.last() {
            Some(&(previous, _)) if hash <= previous => {
                return Err(Error::FieldHashOrder { previous, hash });
            }
            _ => {}
        }
        fields.push((hash, read_ref(r, table_len)?));
    }
    Ok(fields)
}

fn parse_func_refs(r: &mut Reader<'_>, table_len: usize) -> Result<Vec<TypeRef>> {
    let count = leb128::read_len(r)?;
    let mut refs = Vec::with_capacity(count.min(r.remaining()));
    for _ in 0..count {
        let type_ref = read_ref(r, table_len)?;
        if !matches!(type_ref, TypeRef::Primitive(_)) {
            return Err(Error::FuncArgNotPrimitive {
                reference: type_ref.code(),
            });
        }
        refs.push(type_ref);
    }
    Ok(refs)
}

fn parse_annotations(r: &mut Reader<'_>) -> Result<Vec<FuncMode>> {
    let count = leb128::read_len(r)?;
    if count > 1 {
        return Err(Error::AnnotationCount { count });
    }
    let mut modes = Vec::with_capacity(count);
    for _ in 0..count {
        let byte = r.read_u8()?;
        modes.push(FuncMode::from_u8(byte).ok_or(Error::InvalidAnnotation { byte })?);
    }
    Ok(modes)
}

fn parse_methods(r: &mut Reader<'_>, table_len: usize) -> Result<Vec<(String, TypeRef)>> {
    let count = leb128::read_len(r)?;
    let mut methods: Vec<(String, TypeRef)> = Vec::with_capacity(count.min(r.remaining()));
    for _ in 0..count {
        let name_len = leb128::read_len(r)?;
        let offset = r.offset();
        let name = std::str::from_utf8(r.take(name_len)?)
            .map_err(|_| Error::InvalidUtf8 { offset })?
            .to_string();
        if methods.last().is_some_and(|(previous, _)| *previous >= name) {
            return Err(Error::ServiceMethodOrder { name });
        }
        methods.push((name, read_ref(r, table_len)?));
    }
    Ok(methods)
}
