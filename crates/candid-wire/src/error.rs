//! Codec errors.

use candid_core::{ConformanceError, ConversionError, PrincipalError};

/// Every failure the codec can report. All of them abort the current call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid magic: expected DIDL")]
    InvalidMagic,
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },
    #[error("varint at offset {offset} overflows its target width")]
    VarintOverflow { offset: usize },
    #[error("field id collision or not sorted: {hash} after {previous}")]
    FieldHashOrder { previous: u32, hash: u32 },
    #[error("service method {name:?} is duplicated or not sorted")]
    ServiceMethodOrder { name: String },
    #[error("invalid type reference {reference} (table has {table_len} entries)")]
    InvalidTypeRef { reference: i64, table_len: usize },
    #[error("unsupported opcode {code} in type table")]
    UnsupportedOpcode { code: i64 },
    #[error("func argument or result {reference} is not a primitive type")]
    FuncArgNotPrimitive { reference: i64 },
    #[error("invalid func annotation byte {byte}")]
    InvalidAnnotation { byte: u8 },
    #[error("func has {count} annotations, at most 1 allowed")]
    AnnotationCount { count: usize },
    #[error("not an expected type: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("variant index {index} out of range for {len} branches")]
    VariantIndexOutOfRange { index: u64, len: usize },
    #[error("unknown field hash {hash}")]
    UnknownFieldHash { hash: u32 },
    #[error("invalid bool byte {0:#04x}")]
    InvalidBool(u8),
    #[error("not an option tag: {0:#04x}")]
    InvalidOptTag(u8),
    #[error("opaque reference not supported: tag {0:#04x}")]
    InvalidReferenceTag(u8),
    #[error("invalid UTF-8 in text at offset {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("invalid principal: {0}")]
    InvalidPrincipal(#[from] PrincipalError),
    #[error("cannot decode a value of type empty")]
    EmptyValue,
    #[error(
        "infinite loop in record definition, isomorphic to empty type (depth {depth}, table has {table_len} entries)"
    )]
    RecursiveRecord { depth: usize, table_len: usize },
    #[error("recursion limit exceeded: {0}")]
    RecursionLimitExceeded(u32),
    #[error("decoding fuel exhausted")]
    FuelExhausted,
    #[error("{remaining} trailing bytes after the last argument")]
    TrailingBytes { remaining: usize },
    #[error("missing argument {index}")]
    MissingArgument { index: usize },
    #[error("{found} value does not match type {expected}")]
    ValueTypeMismatch {
        expected: String,
        found: &'static str,
    },
    #[error("record value is missing field {label}")]
    MissingField { label: String },
    #[error("record value has field {label} not declared by its type")]
    UnexpectedField { label: String },
    #[error("variant label {label} is not a branch of {ty}")]
    UnknownVariantLabel { label: String, ty: String },
    #[error("func types may only use primitive arguments and results: {ty}")]
    UnsupportedFuncType { ty: String },
    #[error("service method {name} is not a func type")]
    InvalidServiceMethod { name: String },
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl From<ConformanceError> for Error {
    fn from(err: ConformanceError) -> Self {
        Self::ValueTypeMismatch {
            expected: err.expected,
            found: err.found,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
