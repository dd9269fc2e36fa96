//! Candid argument list codec.
//!
//! Encodes typed values into `DIDL` messages and decodes them back, with or
//! without an expected type to recover field names.
//!
//! ```ignore
//! let bytes = candid::encode_args(&[TypedValue::from_native(&42u8)])?;
//! let args = candid::decode_args(&bytes, None)?;
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod args;
mod config;
mod de;
mod ser;

#[cfg(test)]
mod de_tests;

pub use args::{Decoder, DecoderBuilder, decode_args, decode_one, encode_args, encode_one};
pub use config::DecodeLimits;

pub use candid_core::{
    CandidType, Colors, ConformanceError, ConversionError, FuncMode, FuncType, IdlType, Label,
    Opcode, Principal, PrincipalClass, PrincipalError, TypedValue, Value, format_args, idl_hash,
};
pub use candid_wire::{Error, MAGIC, Reader, Result, TypeEntry, TypeRef, TypeTable, dump};
