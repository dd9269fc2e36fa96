//! Type table construction for encoding.
//!
//! Compound types are deduplicated by structural identity. A compound type
//! reserves its slot before its children are registered, so a parent index
//! is always lower than the indices of its children. Func entries are also
//! deduplicated by their encoded bytes, and a service's method funcs are
//! placed ahead of the service entry itself.

use std::collections::{BTreeMap, HashMap};

use candid_core::{FuncType, IdlType, Label};

use crate::error::{Error, Result};
use crate::leb128;
use crate::type_table::TypeRef;

#[derive(Debug, Default)]
pub struct TypeTableBuilder {
    entries: Vec<Vec<u8>>,
    index: HashMap<IdlType, u32>,
    func_index: HashMap<Vec<u8>, u32>,
    args: Vec<TypeRef>,
}

impl TypeTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an argument type and append it to the argument list.
    pub fn push_arg(&mut self, ty: &IdlType) -> Result<TypeRef> {
        let type_ref = self.register(ty)?;
        self.args.push(type_ref);
        Ok(type_ref)
    }

    /// Register a type and every compound type nested in it.
    pub fn register(&mut self, ty: &IdlType) -> Result<TypeRef> {
        if ty.is_primitive() {
            return Ok(TypeRef::Primitive(ty.opcode()));
        }
        if let Some(&index) = self.index.get(ty) {
            return Ok(TypeRef::Index(index));
        }

        let index = match ty {
            IdlType::Func(func) => self.register_func(func, ty)?,
            IdlType::Service(methods) => {
                let mut method_refs = Vec::with_capacity(methods.len());
                for (name, method) in methods {
                    let IdlType::Func(func) = method else {
                        return Err(Error::InvalidServiceMethod { name: name.clone() });
                    };
                    method_refs.push((name, self.register_func(func, method)?));
                }

                let mut body = Vec::new();
                leb128::write_signed(&mut body, ty.opcode().code());
                leb128::write_unsigned(&mut body, method_refs.len() as u64);
                for (name, index) in method_refs {
                    leb128::write_unsigned(&mut body, name.len() as u64);
                    body.extend_from_slice(name.as_bytes());
                    write_ref(&mut body, TypeRef::Index(index));
                }
                let index = self.push_entry(body);
                self.index.insert(ty.clone(), index);
                index
            }
            _ => self.register_constructed(ty)?,
        };
        Ok(TypeRef::Index(index))
    }

    /// Opt, vec, record and variant entries. Func and service go through
    /// `register`, which handles their placement and dedup.
    pub(crate) fn register_constructed(&mut self, ty: &IdlType) -> Result<u32> {
        let children = match ty {
            IdlType::Opt(inner) | IdlType::Vec(inner) => Children::Inner(inner.as_ref()),
            IdlType::Record(fields) | IdlType::Variant(fields) => Children::Fields(fields),
            IdlType::Func(_) | IdlType::Service(_) => {
                return Err(Error::UnsupportedFuncType { ty: ty.to_string() });
            }
            _ => {
                return Err(Error::UnsupportedOpcode {
                    code: ty.opcode().code(),
                });
            }
        };

        let index = self.push_entry(Vec::new());
        self.index.insert(ty.clone(), index);

        let mut body = Vec::new();
        leb128::write_signed(&mut body, ty.opcode().code());
        match children {
            Children::Inner(inner) => {
                let inner_ref = self.register(inner)?;
                write_ref(&mut body, inner_ref);
            }
            Children::Fields(fields) => {
                leb128::write_unsigned(&mut body, fields.len() as u64);
                for (label, field_ty) in fields {
                    let field_ref = self.register(field_ty)?;
                    leb128::write_unsigned(&mut body, u64::from(label.id()));
                    write_ref(&mut body, field_ref);
                }
            }
        }
        self.entries[index as usize] = body;
        Ok(index)
    }

    fn register_func(&mut self, func: &FuncType, ty: &IdlType) -> Result<u32> {
        let body = encode_func(func, ty)?;
        if let Some(&index) = self.func_index.get(&body) {
            self.index.insert(ty.clone(), index);
            return Ok(index);
        }
        let index = self.push_entry(body.clone());
        self.func_index.insert(body, index);
        self.index.insert(ty.clone(), index);
        Ok(index)
    }

    fn push_entry(&mut self, body: Vec<u8>) -> u32 {
        self.entries.push(body);
        (self.entries.len() - 1) as u32
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn args(&self) -> &[TypeRef] {
        &self.args
    }

    /// Write entry count, entries, argument count and argument references.
    pub fn emit(&self, out: &mut Vec<u8>) {
        leb128::write_unsigned(out, self.entries.len() as u64);
        for body in &self.entries {
            out.extend_from_slice(body);
        }
        leb128::write_unsigned(out, self.args.len() as u64);
        for &arg in &self.args {
            write_ref(out, arg);
        }
        tracing::debug!(
            entries = self.entries.len(),
            args = self.args.len(),
            "emitted type table"
        );
    }
}

pub fn write_ref(out: &mut Vec<u8>, type_ref: TypeRef) {
    leb128::write_signed(out, type_ref.code());
}

fn encode_func(func: &FuncType, ty: &IdlType) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    leb128::write_signed(&mut body, ty.opcode().code());
    for list in [&func.args, &func.rets] {
        leb128::write_unsigned(&mut body, list.len() as u64);
        for arg in list {
            if !arg.is_primitive() {
                return Err(Error::UnsupportedFuncType { ty: ty.to_string() });
            }
            write_ref(&mut body, TypeRef::Primitive(arg.opcode()));
        }
    }
    if func.modes.len() > 1 {
        return Err(Error::AnnotationCount {
            count: func.modes.len(),
        });
    }
    leb128::write_unsigned(&mut body, func.modes.len() as u64);
    body.extend(func.modes.iter().map(|m| m.as_u8()));
    Ok(body)
}

enum Children<'t> {
    Inner(&'t IdlType),
    Fields(&'t BTreeMap<Label, IdlType>),
}
