//! Argument list encoding and decoding.

use candid_core::{CandidType, IdlType, TypedValue, Value};
use candid_wire::{Error, MAGIC, Reader, Result, TypeTable, TypeTableBuilder};

use crate::config::DecodeLimits;
use crate::de::Deserializer;
use crate::ser::ValueSerializer;

/// Encode an argument list into a complete `DIDL` message.
pub fn encode_args(args: &[TypedValue]) -> Result<Vec<u8>> {
    let mut builder = TypeTableBuilder::new();
    for arg in args {
        builder.push_arg(arg.ty())?;
    }

    let mut out = MAGIC.to_vec();
    builder.emit(&mut out);
    let table_len = out.len();

    let mut serializer = ValueSerializer::new(&mut out);
    for arg in args {
        serializer.write(arg.value(), arg.ty())?;
    }

    tracing::debug!(
        args = args.len(),
        table_bytes = table_len,
        total_bytes = out.len(),
        "encoded arguments"
    );
    Ok(out)
}

/// Encode a single native value as a one-argument message.
pub fn encode_one<T: CandidType>(value: &T) -> Result<Vec<u8>> {
    encode_args(&[TypedValue::from_native(value)])
}

/// Decode a message with default limits.
///
/// When `expected` is given, field and branch names are taken from it and
/// the wire types must match it.
pub fn decode_args(bytes: &[u8], expected: Option<&[IdlType]>) -> Result<Vec<TypedValue>> {
    Decoder::new().decode(bytes, expected)
}

/// Decode the first argument of a message into a native value.
pub fn decode_one<T: CandidType>(bytes: &[u8]) -> Result<T> {
    Decoder::new().decode_one(bytes)
}

/// Message decoder with configurable limits.
#[derive(Clone, Copy, Debug, Default)]
pub struct Decoder {
    limits: DecodeLimits,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> DecoderBuilder {
        DecoderBuilder::default()
    }

    pub fn limits(&self) -> DecodeLimits {
        self.limits
    }

    pub fn decode(&self, bytes: &[u8], expected: Option<&[IdlType]>) -> Result<Vec<TypedValue>> {
        let mut reader = Reader::new(bytes);
        let table = TypeTable::parse(&mut reader)?;
        tracing::debug!(
            types = table.len(),
            args = table.args().len(),
            offset = reader.offset(),
            "parsed type table"
        );

        let mut de = Deserializer::new(reader, &table, self.limits);
        let mut result = Vec::with_capacity(table.args().len());
        for (index, &wire) in table.args().iter().enumerate() {
            let hint = expected.and_then(|types| types.get(index));
            tracing::trace!(index, ?wire, "decoding argument");
            let (value, ty) = de.decode_arg(wire, hint)?;
            result.push(TypedValue::new_unchecked(value, ty));
        }
        de.finish()?;

        // Expected arguments missing from the message take their default.
        if let Some(types) = expected {
            for (index, ty) in types.iter().enumerate().skip(result.len()) {
                let value = default_value(ty).ok_or(Error::MissingArgument { index })?;
                result.push(TypedValue::new_unchecked(value, ty.clone()));
            }
        }
        Ok(result)
    }

    /// Decode a message and convert its first argument into `T`.
    pub fn decode_one<T: CandidType>(&self, bytes: &[u8]) -> Result<T> {
        let expected = [T::idl_type()];
        let first = self
            .decode(bytes, Some(&expected))?
            .into_iter()
            .next()
            .ok_or(Error::MissingArgument { index: 0 })?;
        Ok(T::from_value(first.into_value())?)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DecoderBuilder {
    limits: DecodeLimits,
}

impl DecoderBuilder {
    pub fn limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn build(self) -> Decoder {
        Decoder {
            limits: self.limits,
        }
    }
}

fn default_value(ty: &IdlType) -> Option<Value> {
    match ty {
        IdlType::Null => Some(Value::Null),
        IdlType::Reserved => Some(Value::Reserved),
        IdlType::Opt(_) => Some(Value::Opt(None)),
        _ => None,
    }
}
