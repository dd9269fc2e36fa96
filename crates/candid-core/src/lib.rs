//! Core data structures for the Candid codec.
//!
//! This crate contains:
//! - Opcodes and function annotations (`Opcode`, `FuncMode`)
//! - Field labels and the label hash (`Label`, `idl_hash`)
//! - Type descriptors (`IdlType`, `FuncType`)
//! - Runtime values (`Value`, `TypedValue`) and principals (`Principal`)
//! - Native Rust mappings (`CandidType`)

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod colors;
pub mod convert;
pub mod label;
pub mod opcode;
pub mod principal;
pub mod typed;
pub mod types;
pub mod value;

#[cfg(test)]
mod principal_tests;

pub use colors::Colors;
pub use convert::{CandidType, ConversionError};
pub use label::{Label, idl_hash};
pub use opcode::{FuncMode, Opcode};
pub use principal::{Principal, PrincipalClass, PrincipalError};
pub use typed::{ConformanceError, TypedValue, format_args};
pub use types::{FuncType, IdlType};
pub use value::Value;
