//! Wire format primitives for the Candid codec.
//!
//! This crate contains:
//! - The codec error type (`Error`, `Result`)
//! - A bounds-checked byte cursor (`Reader`)
//! - LEB128 integer encoding (`leb128`)
//! - Type table parsing and construction (`TypeTable`, `TypeTableBuilder`)
//! - A human-readable type table dump (`dump`)

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod dump;
pub mod error;
pub mod leb128;
pub mod reader;
pub mod type_builder;
pub mod type_table;

#[cfg(test)]
mod type_builder_tests;
#[cfg(test)]
mod type_table_tests;

/// Magic bytes opening every message.
pub const MAGIC: [u8; 4] = *b"DIDL";

pub use dump::{dump, width_for_count};
pub use error::{Error, Result};
pub use reader::Reader;
pub use type_builder::{TypeTableBuilder, write_ref};
pub use type_table::{TypeEntry, TypeRef, TypeTable};
