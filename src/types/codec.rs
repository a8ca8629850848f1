//! # Value Codec
//!
//! Per-type literal rendering, database type naming, and raw-column decoding.
//! This is the leaf of the mapping engine: everything above it (encoder,
//! decoder, statement factory) deals in the text this module produces.
//!
//! ## Literal Rendering
//!
//! Text-shaped values (text, timestamps, enum cases, list blobs) are
//! percent-escaped against a restrictive allowed set and wrapped in double
//! quotes. The allowed set is the URL-query set minus the general delimiters
//! `:#[]@` and sub-delimiters `!$&'()*+,;=`, which leaves ASCII
//! alphanumerics and `- . _ ~ / ?`. Everything else, including every
//! non-ASCII byte, is emitted as `%XX`.
//!
//! This is a best-effort escape, not a parameterized-query mechanism. It
//! keeps quotes and statement metacharacters out of rendered literals, but
//! it is a security-relevant simplification compared to real bind
//! parameters.
//!
//! ## Lists
//!
//! A list serializes as its members' plain bodies joined by `,`, and the
//! joined blob is then escaped and quoted as one text literal. Decoding
//! splits the unescaped blob on the same delimiter. A member whose body
//! contains the delimiter therefore splits wrongly on the way back. This is
//! a known open defect, guarded by an expected-to-fail regression test, and
//! deliberately not patched here.
//!
//! ## Timestamps
//!
//! Rendered with the fixed pattern `%Y-%m-%d %H:%M:%S` and stored as text.
//! Sub-second precision is dropped.

use crate::error::DbError;
use crate::types::{DataType, RawValue, Value};
use eyre::{bail, Result};
use std::fmt::Write as _;

/// Fixed textual pattern for timestamp literals.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Delimiter joining list member bodies inside one text column.
pub const LIST_DELIMITER: char = ',';

fn is_allowed(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~' | b'/' | b'?')
}

/// Percent-escapes `input` against the allowed character set.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if is_allowed(byte) {
            out.push(byte as char);
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

/// Reverses [`escape`]. Stray `%` sequences that do not form `%XX` are kept
/// verbatim; the escaper never emits them.
pub fn unescape(input: &str) -> Result<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3);
            if let Some(decoded) = hex.and_then(|h| {
                std::str::from_utf8(h)
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
            }) {
                out.push(decoded);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).map_err(|e| eyre::eyre!("escaped text is not valid utf-8: {e}"))
}

fn quoted(body: &str) -> String {
    format!("\"{body}\"")
}

/// Renders a value as SQL-ready literal text.
pub fn literal(value: &Value) -> Result<String> {
    Ok(match value {
        Value::Text(s) => quoted(&escape(s)),
        Value::Bool(b) => b.to_string(),
        Value::Int8(v) => v.to_string(),
        Value::Int16(v) => v.to_string(),
        Value::Int32(v) => v.to_string(),
        Value::Int64(v) => v.to_string(),
        Value::UInt8(v) => v.to_string(),
        Value::UInt16(v) => v.to_string(),
        Value::UInt32(v) => v.to_string(),
        Value::UInt64(v) => v.to_string(),
        Value::Float32(v) => v.to_string(),
        Value::Float64(v) => v.to_string(),
        Value::Timestamp(ts) => quoted(&escape(&ts.format(TIMESTAMP_FORMAT).to_string())),
        Value::Enum(case) => quoted(&escape(case)),
        Value::List(items) => {
            let bodies = items.iter().map(body).collect::<Result<Vec<_>>>()?;
            quoted(&escape(&bodies.join(&LIST_DELIMITER.to_string())))
        }
    })
}

/// Plain member body used inside a list blob. Not escaped: escaping happens
/// once for the whole joined blob, which is what makes a member body
/// containing the delimiter ambiguous on the way back.
fn body(value: &Value) -> Result<String> {
    Ok(match value {
        Value::Text(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Int8(v) => v.to_string(),
        Value::Int16(v) => v.to_string(),
        Value::Int32(v) => v.to_string(),
        Value::Int64(v) => v.to_string(),
        Value::UInt8(v) => v.to_string(),
        Value::UInt16(v) => v.to_string(),
        Value::UInt32(v) => v.to_string(),
        Value::UInt64(v) => v.to_string(),
        Value::Float32(v) => v.to_string(),
        Value::Float64(v) => v.to_string(),
        Value::Timestamp(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
        Value::Enum(case) => case.clone(),
        Value::List(_) => {
            return Err(DbError::UnsupportedType("list nested inside a list".into()).into())
        }
    })
}

/// Database type name for a declared kind, optionally suffixed `NOT NULL`.
pub fn type_name(declared: &DataType, not_null: bool) -> String {
    let base = match declared {
        DataType::Text | DataType::List(_) => "LONGTEXT".to_string(),
        DataType::Bool | DataType::Int8 => "TINYINT".to_string(),
        DataType::Int16 => "SMALLINT".to_string(),
        DataType::Int32 => "INT".to_string(),
        DataType::Int64 => "BIGINT".to_string(),
        DataType::UInt8 => "TINYINT UNSIGNED".to_string(),
        DataType::UInt16 => "SMALLINT UNSIGNED".to_string(),
        DataType::UInt32 => "INT UNSIGNED".to_string(),
        DataType::UInt64 => "BIGINT UNSIGNED".to_string(),
        DataType::Float32 => "FLOAT".to_string(),
        DataType::Float64 => "DOUBLE".to_string(),
        DataType::Timestamp => "DATETIME".to_string(),
        DataType::Enum(cases) => {
            let rendered: Vec<String> = cases.iter().map(|c| quoted(&escape(c))).collect();
            format!("ENUM({})", rendered.join(", "))
        }
    };
    if not_null {
        format!("{base} NOT NULL")
    } else {
        base
    }
}

fn unsupported(declared: &DataType, raw: &RawValue) -> eyre::Report {
    DbError::UnsupportedType(format!(
        "cannot decode {} column as {declared:?}",
        raw.class_name()
    ))
    .into()
}

/// Decodes one raw column into the declared kind.
pub fn decode(declared: &DataType, raw: &RawValue) -> Result<Value> {
    match declared {
        DataType::Text => match raw {
            RawValue::Text(s) => Ok(Value::Text(unescape(s)?)),
            _ => Err(unsupported(declared, raw)),
        },
        DataType::Bool => match raw {
            RawValue::Integer(i) => Ok(Value::Bool(*i != 0)),
            _ => Err(unsupported(declared, raw)),
        },
        DataType::Int8 => decode_integer(declared, raw, |i| i8::try_from(i).map(Value::Int8)),
        DataType::Int16 => decode_integer(declared, raw, |i| i16::try_from(i).map(Value::Int16)),
        DataType::Int32 => decode_integer(declared, raw, |i| i32::try_from(i).map(Value::Int32)),
        DataType::Int64 => decode_integer(declared, raw, |i| {
            Ok::<_, std::convert::Infallible>(Value::Int64(i))
        }),
        DataType::UInt8 => decode_integer(declared, raw, |i| u8::try_from(i).map(Value::UInt8)),
        DataType::UInt16 => decode_integer(declared, raw, |i| u16::try_from(i).map(Value::UInt16)),
        DataType::UInt32 => decode_integer(declared, raw, |i| u32::try_from(i).map(Value::UInt32)),
        DataType::UInt64 => decode_integer(declared, raw, |i| u64::try_from(i).map(Value::UInt64)),
        DataType::Float32 => match raw {
            RawValue::Real(f) => Ok(Value::Float32(*f as f32)),
            RawValue::Integer(i) => Ok(Value::Float32(*i as f32)),
            _ => Err(unsupported(declared, raw)),
        },
        DataType::Float64 => match raw {
            RawValue::Real(f) => Ok(Value::Float64(*f)),
            RawValue::Integer(i) => Ok(Value::Float64(*i as f64)),
            _ => Err(unsupported(declared, raw)),
        },
        DataType::Timestamp => match raw {
            RawValue::Text(s) => {
                let text = unescape(s)?;
                let ts = chrono::NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT)
                    .map_err(|e| eyre::eyre!("malformed timestamp '{text}': {e}"))?;
                Ok(Value::Timestamp(ts))
            }
            _ => Err(unsupported(declared, raw)),
        },
        DataType::Enum(cases) => match raw {
            RawValue::Text(s) => {
                let case = unescape(s)?;
                if !cases.iter().any(|c| *c == case) {
                    bail!("'{case}' is not a declared case of {declared:?}");
                }
                Ok(Value::Enum(case))
            }
            _ => Err(unsupported(declared, raw)),
        },
        DataType::List(element) => match raw {
            RawValue::Text(s) => {
                let blob = unescape(s)?;
                let items = blob
                    .split(LIST_DELIMITER)
                    .filter(|part| !part.is_empty())
                    .map(|part| decode_body(element, part))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::List(items))
            }
            _ => Err(unsupported(declared, raw)),
        },
    }
}

fn decode_integer<F, E>(declared: &DataType, raw: &RawValue, convert: F) -> Result<Value>
where
    F: FnOnce(i64) -> std::result::Result<Value, E>,
{
    match raw {
        RawValue::Integer(i) => {
            convert(*i).map_err(|_| eyre::eyre!("integer {i} out of range for {declared:?}"))
        }
        _ => Err(unsupported(declared, raw)),
    }
}

/// Parses one list member body back into the element kind.
fn decode_body(element: &DataType, part: &str) -> Result<Value> {
    Ok(match element {
        DataType::Text => Value::Text(part.to_string()),
        DataType::Bool => match part {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            other => bail!("malformed bool list member '{other}'"),
        },
        DataType::Int8 => Value::Int8(parse_member(part)?),
        DataType::Int16 => Value::Int16(parse_member(part)?),
        DataType::Int32 => Value::Int32(parse_member(part)?),
        DataType::Int64 => Value::Int64(parse_member(part)?),
        DataType::UInt8 => Value::UInt8(parse_member(part)?),
        DataType::UInt16 => Value::UInt16(parse_member(part)?),
        DataType::UInt32 => Value::UInt32(parse_member(part)?),
        DataType::UInt64 => Value::UInt64(parse_member(part)?),
        DataType::Float32 => Value::Float32(parse_member(part)?),
        DataType::Float64 => Value::Float64(parse_member(part)?),
        DataType::Timestamp => Value::Timestamp(
            chrono::NaiveDateTime::parse_from_str(part, TIMESTAMP_FORMAT)
                .map_err(|e| eyre::eyre!("malformed timestamp list member '{part}': {e}"))?,
        ),
        DataType::Enum(cases) => {
            if !cases.iter().any(|c| c == part) {
                bail!("'{part}' is not a declared case of {element:?}");
            }
            Value::Enum(part.to_string())
        }
        DataType::List(_) => {
            return Err(DbError::UnsupportedType("list nested inside a list".into()).into())
        }
    })
}

fn parse_member<T: std::str::FromStr>(part: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    part.parse()
        .map_err(|e| eyre::eyre!("malformed list member '{part}': {e}"))
}
