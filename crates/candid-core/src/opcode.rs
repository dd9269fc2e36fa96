//! Wire opcodes for Candid types.
//!
//! Opcodes are negative signed integers on the wire. Non-negative type
//! references point into the type table instead.

/// Type opcodes.
///
/// Primitive opcodes (`Null` through `Empty`, plus `Principal`) may appear
/// directly as type references. Constructor opcodes (`Opt` through `Service`)
/// only appear as the head of a type table entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(i8)]
pub enum Opcode {
    Null = -1,
    Bool = -2,
    Nat = -3,
    Int = -4,
    Nat8 = -5,
    Nat16 = -6,
    Nat32 = -7,
    Nat64 = -8,
    Int8 = -9,
    Int16 = -10,
    Int32 = -11,
    Int64 = -12,
    Float32 = -13,
    Float64 = -14,
    Text = -15,
    Reserved = -16,
    Empty = -17,
    Opt = -18,
    Vec = -19,
    Record = -20,
    Variant = -21,
    Func = -22,
    Service = -23,
    Principal = -24,
}

impl Opcode {
    /// Convert from a signed wire code.
    pub fn from_code(code: i64) -> Option<Self> {
        let op = match code {
            -1 => Self::Null,
            -2 => Self::Bool,
            -3 => Self::Nat,
            -4 => Self::Int,
            -5 => Self::Nat8,
            -6 => Self::Nat16,
            -7 => Self::Nat32,
            -8 => Self::Nat64,
            -9 => Self::Int8,
            -10 => Self::Int16,
            -11 => Self::Int32,
            -12 => Self::Int64,
            -13 => Self::Float32,
            -14 => Self::Float64,
            -15 => Self::Text,
            -16 => Self::Reserved,
            -17 => Self::Empty,
            -18 => Self::Opt,
            -19 => Self::Vec,
            -20 => Self::Record,
            -21 => Self::Variant,
            -22 => Self::Func,
            -23 => Self::Service,
            -24 => Self::Principal,
            _ => return None,
        };
        Some(op)
    }

    pub fn code(self) -> i64 {
        self as i8 as i64
    }

    /// Whether this opcode is usable as a bare type reference.
    pub fn is_primitive(self) -> bool {
        is_primitive_code(self.code())
    }

    /// Whether this is a single-inner wrapper (`opt`, `vec`).
    pub fn is_wrapper(self) -> bool {
        matches!(self, Self::Opt | Self::Vec)
    }

    /// Whether this is a labelled composite (`record`, `variant`).
    pub fn is_composite(self) -> bool {
        matches!(self, Self::Record | Self::Variant)
    }

    /// Whether this is a reference type (`func`, `service`).
    pub fn is_reference(self) -> bool {
        matches!(self, Self::Func | Self::Service)
    }

    /// Keyword used in the Candid textual syntax.
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Nat => "nat",
            Self::Int => "int",
            Self::Nat8 => "nat8",
            Self::Nat16 => "nat16",
            Self::Nat32 => "nat32",
            Self::Nat64 => "nat64",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Text => "text",
            Self::Reserved => "reserved",
            Self::Empty => "empty",
            Self::Opt => "opt",
            Self::Vec => "vec",
            Self::Record => "record",
            Self::Variant => "variant",
            Self::Func => "func",
            Self::Service => "service",
            Self::Principal => "principal",
        }
    }
}

/// Primitive codes are `-1..=-17` and `-24`.
pub fn is_primitive_code(code: i64) -> bool {
    code < 0 && (code >= -17 || code == -24)
}

/// Function annotation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum FuncMode {
    Query = 1,
    Oneway = 2,
}

impl FuncMode {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Query),
            2 => Some(Self::Oneway),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Oneway => "oneway",
        }
    }
}
