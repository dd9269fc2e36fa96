//! Principal identifiers and their textual form.
//!
//! Text form: CRC32 of the raw bytes (big-endian) prepended to the bytes,
//! base32 encoded (RFC 4648 alphabet, lowercase, unpadded), grouped into
//! dash-separated chunks of five characters.

use std::fmt;
use std::str::FromStr;

use data_encoding::{BASE32_NOPAD, DecodeError, DecodeKind};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha224};

const MAX_LENGTH: usize = 29;
const CHECKSUM_LENGTH: usize = 4;
const GROUP_SIZE: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PrincipalError {
    #[error("principal is {0} bytes long, at most 29 allowed")]
    TooLong(usize),
    #[error("principal text is too short")]
    TooShort,
    #[error("invalid character {0:?} in principal text")]
    InvalidChar(char),
    #[error("malformed principal text: {0}")]
    Malformed(DecodeError),
    #[error("principal checksum mismatch")]
    ChecksumMismatch,
    #[error("principal text is not in canonical form, expected {0}")]
    NonCanonical(String),
}

/// Principal class, taken from the last byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PrincipalClass {
    Opaque = 1,
    SelfAuthenticating = 2,
    Derived = 3,
    Anonymous = 4,
}

impl PrincipalClass {
    pub fn name(self) -> &'static str {
        match self {
            Self::Opaque => "opaque",
            Self::SelfAuthenticating => "self-authenticating",
            Self::Derived => "derived",
            Self::Anonymous => "anonymous",
        }
    }
}

/// Opaque identity of a canister or user, at most 29 bytes.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct Principal {
    bytes: Vec<u8>,
}

impl Principal {
    /// The empty principal, `aaaaa-aa`.
    pub fn management_canister() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn anonymous() -> Self {
        Self {
            bytes: vec![PrincipalClass::Anonymous as u8],
        }
    }

    /// Principal derived from a DER-encoded public key.
    pub fn self_authenticating(public_key: &[u8]) -> Self {
        let mut bytes = Sha224::digest(public_key).to_vec();
        bytes.push(PrincipalClass::SelfAuthenticating as u8);
        Self { bytes }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, PrincipalError> {
        if bytes.len() > MAX_LENGTH {
            return Err(PrincipalError::TooLong(bytes.len()));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    pub fn from_text(text: &str) -> Result<Self, PrincipalError> {
        let lowered = text.to_ascii_lowercase();
        let compact: String = lowered.chars().filter(|c| *c != '-').collect();
        let decoded = BASE32_NOPAD
            .decode(compact.to_ascii_uppercase().as_bytes())
            .map_err(|e| decode_error(&compact, e))?;
        if decoded.len() < CHECKSUM_LENGTH {
            return Err(PrincipalError::TooShort);
        }

        let (checksum, bytes) = decoded.split_at(CHECKSUM_LENGTH);
        let principal = Self::from_slice(bytes)?;
        if checksum != crc32fast::hash(bytes).to_be_bytes() {
            return Err(PrincipalError::ChecksumMismatch);
        }

        let canonical = principal.to_text();
        if canonical != lowered {
            return Err(PrincipalError::NonCanonical(canonical));
        }
        Ok(principal)
    }

    pub fn to_text(&self) -> String {
        let mut data = Vec::with_capacity(CHECKSUM_LENGTH + self.bytes.len());
        data.extend_from_slice(&crc32fast::hash(&self.bytes).to_be_bytes());
        data.extend_from_slice(&self.bytes);

        let encoded = BASE32_NOPAD.encode(&data).to_ascii_lowercase();
        let mut out = String::with_capacity(encoded.len() + encoded.len() / GROUP_SIZE);
        for (i, ch) in encoded.chars().enumerate() {
            if i > 0 && i % GROUP_SIZE == 0 {
                out.push('-');
            }
            out.push(ch);
        }
        out
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn class(&self) -> Option<PrincipalClass> {
        match self.bytes.last()? {
            1 => Some(PrincipalClass::Opaque),
            2 => Some(PrincipalClass::SelfAuthenticating),
            3 => Some(PrincipalClass::Derived),
            4 => Some(PrincipalClass::Anonymous),
            _ => None,
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for Principal {
    type Err = PrincipalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl Serialize for Principal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_text())
    }
}

fn decode_error(text: &str, err: DecodeError) -> PrincipalError {
    let symbol = text.get(err.position..).and_then(|rest| rest.chars().next());
    match (err.kind, symbol) {
        (DecodeKind::Symbol, Some(ch)) => PrincipalError::InvalidChar(ch),
        _ => PrincipalError::Malformed(err),
    }
}
