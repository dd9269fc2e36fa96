//! Type descriptors.

use std::collections::BTreeMap;
use std::fmt;

use crate::label::Label;
use crate::opcode::{FuncMode, Opcode};

/// Function signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct FuncType {
    pub args: Vec<IdlType>,
    pub rets: Vec<IdlType>,
    pub modes: Vec<FuncMode>,
}

/// Candid type descriptor.
///
/// Records and variants key their fields by [`Label`], so iteration is in
/// ascending field-id order, which is also the wire order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IdlType {
    Null,
    Bool,
    Nat,
    Int,
    Nat8,
    Nat16,
    Nat32,
    Nat64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Text,
    Reserved,
    Empty,
    Principal,
    Opt(Box<IdlType>),
    Vec(Box<IdlType>),
    Record(BTreeMap<Label, IdlType>),
    Variant(BTreeMap<Label, IdlType>),
    Func(FuncType),
    Service(BTreeMap<String, IdlType>),
}

impl IdlType {
    pub fn opt(inner: IdlType) -> Self {
        Self::Opt(Box::new(inner))
    }

    pub fn vec(inner: IdlType) -> Self {
        Self::Vec(Box::new(inner))
    }

    pub fn record<L, I>(fields: I) -> Self
    where
        L: Into<Label>,
        I: IntoIterator<Item = (L, IdlType)>,
    {
        Self::Record(fields.into_iter().map(|(l, t)| (l.into(), t)).collect())
    }

    pub fn variant<L, I>(branches: I) -> Self
    where
        L: Into<Label>,
        I: IntoIterator<Item = (L, IdlType)>,
    {
        Self::Variant(branches.into_iter().map(|(l, t)| (l.into(), t)).collect())
    }

    /// Record with positional labels `0..n`.
    pub fn tuple<I>(items: I) -> Self
    where
        I: IntoIterator<Item = IdlType>,
    {
        Self::Record(
            items
                .into_iter()
                .enumerate()
                .map(|(i, t)| (Label::Unnamed(i as u32), t))
                .collect(),
        )
    }

    pub fn func(args: Vec<IdlType>, rets: Vec<IdlType>, modes: Vec<FuncMode>) -> Self {
        Self::Func(FuncType { args, rets, modes })
    }

    pub fn service<N, I>(methods: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, IdlType)>,
    {
        Self::Service(methods.into_iter().map(|(n, t)| (n.into(), t)).collect())
    }

    /// Primitive descriptor for a primitive opcode.
    pub fn from_opcode(op: Opcode) -> Option<Self> {
        let ty = match op {
            Opcode::Null => Self::Null,
            Opcode::Bool => Self::Bool,
            Opcode::Nat => Self::Nat,
            Opcode::Int => Self::Int,
            Opcode::Nat8 => Self::Nat8,
            Opcode::Nat16 => Self::Nat16,
            Opcode::Nat32 => Self::Nat32,
            Opcode::Nat64 => Self::Nat64,
            Opcode::Int8 => Self::Int8,
            Opcode::Int16 => Self::Int16,
            Opcode::Int32 => Self::Int32,
            Opcode::Int64 => Self::Int64,
            Opcode::Float32 => Self::Float32,
            Opcode::Float64 => Self::Float64,
            Opcode::Text => Self::Text,
            Opcode::Reserved => Self::Reserved,
            Opcode::Empty => Self::Empty,
            Opcode::Principal => Self::Principal,
            Opcode::Opt
            | Opcode::Vec
            | Opcode::Record
            | Opcode::Variant
            | Opcode::Func
            | Opcode::Service => return None,
        };
        Some(ty)
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Null => Opcode::Null,
            Self::Bool => Opcode::Bool,
            Self::Nat => Opcode::Nat,
            Self::Int => Opcode::Int,
            Self::Nat8 => Opcode::Nat8,
            Self::Nat16 => Opcode::Nat16,
            Self::Nat32 => Opcode::Nat32,
            Self::Nat64 => Opcode::Nat64,
            Self::Int8 => Opcode::Int8,
            Self::Int16 => Opcode::Int16,
            Self::Int32 => Opcode::Int32,
            Self::Int64 => Opcode::Int64,
            Self::Float32 => Opcode::Float32,
            Self::Float64 => Opcode::Float64,
            Self::Text => Opcode::Text,
            Self::Reserved => Opcode::Reserved,
            Self::Empty => Opcode::Empty,
            Self::Principal => Opcode::Principal,
            Self::Opt(_) => Opcode::Opt,
            Self::Vec(_) => Opcode::Vec,
            Self::Record(_) => Opcode::Record,
            Self::Variant(_) => Opcode::Variant,
            Self::Func(_) => Opcode::Func,
            Self::Service(_) => Opcode::Service,
        }
    }

    pub fn is_primitive(&self) -> bool {
        self.opcode().is_primitive()
    }

    /// Record whose labels are exactly `0..n`, printed without labels.
    pub fn is_tuple(&self) -> bool {
        match self {
            Self::Record(fields) => is_tuple_labels(fields.keys()),
            _ => false,
        }
    }
}

pub(crate) fn is_tuple_labels<'a>(labels: impl ExactSizeIterator<Item = &'a Label>) -> bool {
    labels.len() > 0 && labels.enumerate().all(|(i, l)| l.id() as usize == i)
}

impl fmt::Display for IdlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opt(inner) => write!(f, "opt {inner}"),
            Self::Vec(inner) => write!(f, "vec {inner}"),
            Self::Record(fields) if self.is_tuple() => {
                f.write_str("record { ")?;
                for (i, t) in fields.values().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{t}")?;
                }
                f.write_str(" }")
            }
            Self::Record(fields) => write_fields(f, "record", fields, false),
            Self::Variant(branches) => write_fields(f, "variant", branches, true),
            Self::Func(func) => write!(f, "func {func}"),
            Self::Service(methods) => {
                if methods.is_empty() {
                    return f.write_str("service {}");
                }
                f.write_str("service { ")?;
                for (i, (name, t)) in methods.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    match t {
                        Self::Func(func) => write!(f, "{name} : {func}")?,
                        other => write!(f, "{name} : {other}")?,
                    }
                }
                f.write_str(" }")
            }
            primitive => f.write_str(primitive.opcode().name()),
        }
    }
}

fn write_fields(
    f: &mut fmt::Formatter<'_>,
    keyword: &str,
    fields: &BTreeMap<Label, IdlType>,
    elide_null: bool,
) -> fmt::Result {
    if fields.is_empty() {
        return write!(f, "{keyword} {{}}");
    }
    write!(f, "{keyword} {{ ")?;
    for (i, (label, t)) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str("; ")?;
        }
        if elide_null && *t == IdlType::Null {
            write!(f, "{label}")?;
        } else {
            write!(f, "{label} : {t}")?;
        }
    }
    f.write_str(" }")
}

impl fmt::Display for FuncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) -> ({})", join(&self.args), join(&self.rets))?;
        for mode in &self.modes {
            write!(f, " {}", mode.name())?;
        }
        Ok(())
    }
}

fn join(types: &[IdlType]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
