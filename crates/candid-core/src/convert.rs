//! Mapping between native Rust types and Candid values.

use num_bigint::{BigInt, BigUint};

use crate::principal::Principal;
use crate::types::IdlType;
use crate::value::Value;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert {found} value into {expected}")]
pub struct ConversionError {
    pub expected: String,
    pub found: &'static str,
}

impl ConversionError {
    fn new<T: CandidType>(value: &Value) -> Self {
        Self {
            expected: T::idl_type().to_string(),
            found: value.kind_name(),
        }
    }
}

/// Native type with a fixed Candid type.
pub trait CandidType: Sized {
    fn idl_type() -> IdlType;
    fn to_value(&self) -> Value;
    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

macro_rules! impl_scalar {
    ($($native:ty => $variant:ident),* $(,)?) => {
        $(
            impl CandidType for $native {
                fn idl_type() -> IdlType {
                    IdlType::$variant
                }

                fn to_value(&self) -> Value {
                    Value::$variant(self.clone())
                }

                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(ConversionError::new::<Self>(&other)),
                    }
                }
            }
        )*
    };
}

impl_scalar! {
    bool => Bool,
    u8 => Nat8,
    u16 => Nat16,
    u32 => Nat32,
    u64 => Nat64,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    String => Text,
    BigUint => Nat,
    BigInt => Int,
    Principal => Principal,
}

impl CandidType for () {
    fn idl_type() -> IdlType {
        IdlType::Null
    }

    fn to_value(&self) -> Value {
        Value::Null
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(()),
            other => Err(ConversionError::new::<Self>(&other)),
        }
    }
}

impl<T: CandidType> CandidType for Option<T> {
    fn idl_type() -> IdlType {
        IdlType::opt(T::idl_type())
    }

    fn to_value(&self) -> Value {
        Value::Opt(self.as_ref().map(|v| Box::new(v.to_value())))
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Opt(None) => Ok(None),
            Value::Opt(Some(inner)) => T::from_value(*inner).map(Some),
            other => Err(ConversionError::new::<Self>(&other)),
        }
    }
}

impl<T: CandidType> CandidType for Vec<T> {
    fn idl_type() -> IdlType {
        IdlType::vec(T::idl_type())
    }

    fn to_value(&self) -> Value {
        Value::Vec(self.iter().map(CandidType::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Vec(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ConversionError::new::<Self>(&other)),
        }
    }
}
