//! Runtime values.

use std::collections::BTreeMap;
use std::fmt;

use num_bigint::{BigInt, BigUint};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::colors::Colors;
use crate::label::Label;
use crate::opcode::Opcode;
use crate::principal::Principal;
use crate::types::is_tuple_labels;

/// Candid value.
///
/// There is no value of type `empty`. `Reserved` carries no payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Nat(BigUint),
    Int(BigInt),
    Nat8(u8),
    Nat16(u16),
    Nat32(u32),
    Nat64(u64),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Reserved,
    Principal(Principal),
    Opt(Option<Box<Value>>),
    Vec(Vec<Value>),
    Record(BTreeMap<Label, Value>),
    Variant(Label, Box<Value>),
    /// Method reference: service principal and method name.
    Func(Principal, String),
    Service(Principal),
}

impl Value {
    pub fn nat(n: impl Into<BigUint>) -> Self {
        Self::Nat(n.into())
    }

    pub fn int(i: impl Into<BigInt>) -> Self {
        Self::Int(i.into())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn some(value: Value) -> Self {
        Self::Opt(Some(Box::new(value)))
    }

    pub fn none() -> Self {
        Self::Opt(None)
    }

    pub fn record<L, I>(fields: I) -> Self
    where
        L: Into<Label>,
        I: IntoIterator<Item = (L, Value)>,
    {
        Self::Record(fields.into_iter().map(|(l, v)| (l.into(), v)).collect())
    }

    pub fn tuple<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::Record(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Label::Unnamed(i as u32), v))
                .collect(),
        )
    }

    pub fn variant(label: impl Into<Label>, value: Value) -> Self {
        Self::Variant(label.into(), Box::new(value))
    }

    /// Opcode of the type this value naturally belongs to.
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Null => Opcode::Null,
            Self::Bool(_) => Opcode::Bool,
            Self::Nat(_) => Opcode::Nat,
            Self::Int(_) => Opcode::Int,
            Self::Nat8(_) => Opcode::Nat8,
            Self::Nat16(_) => Opcode::Nat16,
            Self::Nat32(_) => Opcode::Nat32,
            Self::Nat64(_) => Opcode::Nat64,
            Self::Int8(_) => Opcode::Int8,
            Self::Int16(_) => Opcode::Int16,
            Self::Int32(_) => Opcode::Int32,
            Self::Int64(_) => Opcode::Int64,
            Self::Float32(_) => Opcode::Float32,
            Self::Float64(_) => Opcode::Float64,
            Self::Text(_) => Opcode::Text,
            Self::Reserved => Opcode::Reserved,
            Self::Principal(_) => Opcode::Principal,
            Self::Opt(_) => Opcode::Opt,
            Self::Vec(_) => Opcode::Vec,
            Self::Record(_) => Opcode::Record,
            Self::Variant(..) => Opcode::Variant,
            Self::Func(..) => Opcode::Func,
            Self::Service(_) => Opcode::Service,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.opcode().name()
    }

    /// Format in Candid textual syntax.
    ///
    /// Color scheme:
    /// - Labels: Blue
    /// - Text and principals: Green
    /// - Keywords, `null`, punctuation: Dim
    pub fn format(&self, colors: Colors) -> String {
        let mut out = String::new();
        format_value(&mut out, self, &colors);
        out
    }
}

fn format_value(out: &mut String, value: &Value, c: &Colors) {
    match value {
        Value::Null | Value::Reserved => dim(out, c, "null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Nat(n) => out.push_str(&n.to_string()),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Nat8(n) => out.push_str(&n.to_string()),
        Value::Nat16(n) => out.push_str(&n.to_string()),
        Value::Nat32(n) => out.push_str(&n.to_string()),
        Value::Nat64(n) => out.push_str(&n.to_string()),
        Value::Int8(i) => out.push_str(&i.to_string()),
        Value::Int16(i) => out.push_str(&i.to_string()),
        Value::Int32(i) => out.push_str(&i.to_string()),
        Value::Int64(i) => out.push_str(&i.to_string()),
        Value::Float32(x) => out.push_str(&format!("{x:?}")),
        Value::Float64(x) => out.push_str(&format!("{x:?}")),
        Value::Text(s) => green_quoted(out, c, s),
        Value::Principal(p) => {
            dim(out, c, "principal ");
            green_quoted(out, c, &p.to_text());
        }
        Value::Opt(None) => dim(out, c, "null"),
        Value::Opt(Some(inner)) => {
            dim(out, c, "opt ");
            format_value(out, inner, c);
        }
        Value::Vec(items) => {
            dim(out, c, "vec {");
            for (i, item) in items.iter().enumerate() {
                out.push_str(if i == 0 { " " } else { "; " });
                format_value(out, item, c);
            }
            dim(out, c, if items.is_empty() { "}" } else { " }" });
        }
        Value::Record(fields) => {
            let tuple = is_tuple_labels(fields.keys());
            dim(out, c, "record {");
            for (i, (label, v)) in fields.iter().enumerate() {
                out.push_str(if i == 0 { " " } else { "; " });
                if !tuple {
                    push_label(out, c, label);
                    dim(out, c, " = ");
                }
                format_value(out, v, c);
            }
            dim(out, c, if fields.is_empty() { "}" } else { " }" });
        }
        Value::Variant(label, v) => {
            dim(out, c, "variant { ");
            push_label(out, c, label);
            if **v != Value::Null {
                dim(out, c, " = ");
                format_value(out, v, c);
            }
            dim(out, c, " }");
        }
        Value::Func(p, method) => {
            dim(out, c, "func ");
            green_quoted(out, c, &p.to_text());
            out.push('.');
            out.push_str(&Label::named(method.as_str()).to_string());
        }
        Value::Service(p) => {
            dim(out, c, "service ");
            green_quoted(out, c, &p.to_text());
        }
    }
}

fn dim(out: &mut String, c: &Colors, s: &str) {
    out.push_str(c.dim);
    out.push_str(s);
    out.push_str(c.reset);
}

fn push_label(out: &mut String, c: &Colors, label: &Label) {
    out.push_str(c.blue);
    out.push_str(&label.to_string());
    out.push_str(c.reset);
}

fn green_quoted(out: &mut String, c: &Colors, s: &str) {
    out.push_str(c.green);
    out.push('"');
    out.push_str(&escape_text(s));
    out.push('"');
    out.push_str(c.reset);
}

/// Escape text for a Candid string literal.
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => result.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => result.push(c),
        }
    }
    result
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(Colors::OFF))
    }
}

/// JSON shape: big integers as decimal strings, labels as keys, variants as
/// single-entry objects, absent options as `null`.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null | Value::Reserved | Value::Opt(None) => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Nat(n) => serializer.collect_str(n),
            Value::Int(i) => serializer.collect_str(i),
            Value::Nat8(n) => serializer.serialize_u8(*n),
            Value::Nat16(n) => serializer.serialize_u16(*n),
            Value::Nat32(n) => serializer.serialize_u32(*n),
            Value::Nat64(n) => serializer.serialize_u64(*n),
            Value::Int8(i) => serializer.serialize_i8(*i),
            Value::Int16(i) => serializer.serialize_i16(*i),
            Value::Int32(i) => serializer.serialize_i32(*i),
            Value::Int64(i) => serializer.serialize_i64(*i),
            Value::Float32(x) => serializer.serialize_f32(*x),
            Value::Float64(x) => serializer.serialize_f64(*x),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Principal(p) | Value::Service(p) => p.serialize(serializer),
            Value::Opt(Some(inner)) => inner.serialize(serializer),
            Value::Vec(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (label, value) in fields {
                    map.serialize_entry(label, value)?;
                }
                map.end()
            }
            Value::Variant(label, value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(label, value)?;
                map.end()
            }
            Value::Func(p, method) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("principal", p)?;
                map.serialize_entry("method", method)?;
                map.end()
            }
        }
    }
}
