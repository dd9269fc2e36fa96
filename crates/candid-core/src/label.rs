//! Record and variant field labels.
//!
//! Only the 32-bit id ever reaches the wire. Names are kept for printing and
//! for mapping decoded fields back onto caller-supplied types.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

/// Hash a field name: `h = h * 223 + byte` over the UTF-8 bytes, mod 2^32.
pub fn idl_hash(name: &str) -> u32 {
    name.bytes()
        .fold(0u32, |h, b| h.wrapping_mul(223).wrapping_add(u32::from(b)))
}

/// Field label.
///
/// Equality, ordering and hashing all go through [`Label::id`], so
/// `Label::named("foo")` and `Label::Id(idl_hash("foo"))` are the same key.
#[derive(Clone, Debug)]
pub enum Label {
    /// Raw field id, as found on the wire.
    Id(u32),
    /// Named field, identified by its hash.
    Named(String),
    /// Positional tuple field.
    Unnamed(u32),
}

impl Label {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn id(&self) -> u32 {
        match self {
            Self::Id(id) | Self::Unnamed(id) => *id,
            Self::Named(name) => idl_hash(name),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Id(_) | Self::Unnamed(_) => None,
        }
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Label {}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id().cmp(&other.id())
    }
}

impl Hash for Label {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<u32> for Label {
    fn from(id: u32) -> Self {
        Self::Id(id)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) | Self::Unnamed(id) => write!(f, "{id}"),
            Self::Named(name) if is_identifier(name) => f.write_str(name),
            Self::Named(name) => write!(f, "{name:?}"),
        }
    }
}

impl Serialize for Label {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Named(name) => serializer.serialize_str(name),
            Self::Id(id) | Self::Unnamed(id) => serializer.collect_str(id),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
