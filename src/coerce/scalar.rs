//! Scalar kinds and the text <-> value conversions between them.

use std::fmt;
use std::str::FromStr;

use serde::de::Visitor;

use crate::error::Error;

/// The separator between list elements, in both directions.
pub const LIST_SEPARATOR: char = ',';

/// The scalar kinds a query value can be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Str,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    Bool,
    F32,
    F64,
}

impl ScalarKind {
    /// The name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Str => "string",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::I128 => "i128",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::U128 => "u128",
            ScalarKind::Bool => "bool",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Bool(bool),
    F32(f32),
    F64(f64),
}

impl Scalar {
    /// The zero value of a kind, used for keys missing from the query.
    pub fn zero(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Str => Scalar::Str(String::new()),
            ScalarKind::I8 => Scalar::I8(0),
            ScalarKind::I16 => Scalar::I16(0),
            ScalarKind::I32 => Scalar::I32(0),
            ScalarKind::I64 => Scalar::I64(0),
            ScalarKind::I128 => Scalar::I128(0),
            ScalarKind::U8 => Scalar::U8(0),
            ScalarKind::U16 => Scalar::U16(0),
            ScalarKind::U32 => Scalar::U32(0),
            ScalarKind::U64 => Scalar::U64(0),
            ScalarKind::U128 => Scalar::U128(0),
            ScalarKind::Bool => Scalar::Bool(false),
            ScalarKind::F32 => Scalar::F32(0.0),
            ScalarKind::F64 => Scalar::F64(0.0),
        }
    }

    /// The kind of this value.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Str(_) => ScalarKind::Str,
            Scalar::I8(_) => ScalarKind::I8,
            Scalar::I16(_) => ScalarKind::I16,
            Scalar::I32(_) => ScalarKind::I32,
            Scalar::I64(_) => ScalarKind::I64,
            Scalar::I128(_) => ScalarKind::I128,
            Scalar::U8(_) => ScalarKind::U8,
            Scalar::U16(_) => ScalarKind::U16,
            Scalar::U32(_) => ScalarKind::U32,
            Scalar::U64(_) => ScalarKind::U64,
            Scalar::U128(_) => ScalarKind::U128,
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::F32(_) => ScalarKind::F32,
            Scalar::F64(_) => ScalarKind::F64,
        }
    }

    /// Hand the value to a serde visitor through the matching `visit_*` call.
    pub(crate) fn visit<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self {
            Scalar::Str(v) => visitor.visit_string(v),
            Scalar::I8(v) => visitor.visit_i8(v),
            Scalar::I16(v) => visitor.visit_i16(v),
            Scalar::I32(v) => visitor.visit_i32(v),
            Scalar::I64(v) => visitor.visit_i64(v),
            Scalar::I128(v) => visitor.visit_i128(v),
            Scalar::U8(v) => visitor.visit_u8(v),
            Scalar::U16(v) => visitor.visit_u16(v),
            Scalar::U32(v) => visitor.visit_u32(v),
            Scalar::U64(v) => visitor.visit_u64(v),
            Scalar::U128(v) => visitor.visit_u128(v),
            Scalar::Bool(v) => visitor.visit_bool(v),
            Scalar::F32(v) => visitor.visit_f32(v),
            Scalar::F64(v) => visitor.visit_f64(v),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(v) => f.write_str(v),
            Scalar::I8(v) => write!(f, "{v}"),
            Scalar::I16(v) => write!(f, "{v}"),
            Scalar::I32(v) => write!(f, "{v}"),
            Scalar::I64(v) => write!(f, "{v}"),
            Scalar::I128(v) => write!(f, "{v}"),
            Scalar::U8(v) => write!(f, "{v}"),
            Scalar::U16(v) => write!(f, "{v}"),
            Scalar::U32(v) => write!(f, "{v}"),
            Scalar::U64(v) => write!(f, "{v}"),
            Scalar::U128(v) => write!(f, "{v}"),
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::F32(v) => write!(f, "{v}"),
            Scalar::F64(v) => write!(f, "{v}"),
        }
    }
}

fn parse_number<N: FromStr>(kind: ScalarKind, text: &str) -> Result<N, Error> {
    text.parse().map_err(|_| Error::InvalidNumber {
        kind,
        value: text.to_string(),
    })
}

fn parse_bool(text: &str) -> Result<bool, Error> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(Error::InvalidBoolean(text.to_string())),
    }
}

/// Coerce one textual value into a scalar of the given kind.
///
/// Integers are parsed in base 10 at the width of `kind`, so out-of-range
/// text is rejected the same way as non-numeric text.
///
/// # Errors
///
/// * `Error::InvalidNumber` - the text is not a number of that kind
/// * `Error::InvalidBoolean` - the text is not an accepted boolean form
pub fn parse_scalar(kind: ScalarKind, text: &str) -> Result<Scalar, Error> {
    let scalar = match kind {
        ScalarKind::Str => Scalar::Str(text.to_string()),
        ScalarKind::I8 => Scalar::I8(parse_number(kind, text)?),
        ScalarKind::I16 => Scalar::I16(parse_number(kind, text)?),
        ScalarKind::I32 => Scalar::I32(parse_number(kind, text)?),
        ScalarKind::I64 => Scalar::I64(parse_number(kind, text)?),
        ScalarKind::I128 => Scalar::I128(parse_number(kind, text)?),
        ScalarKind::U8 => Scalar::U8(parse_number(kind, text)?),
        ScalarKind::U16 => Scalar::U16(parse_number(kind, text)?),
        ScalarKind::U32 => Scalar::U32(parse_number(kind, text)?),
        ScalarKind::U64 => Scalar::U64(parse_number(kind, text)?),
        ScalarKind::U128 => Scalar::U128(parse_number(kind, text)?),
        ScalarKind::Bool => Scalar::Bool(parse_bool(text)?),
        ScalarKind::F32 => Scalar::F32(parse_number(kind, text)?),
        ScalarKind::F64 => Scalar::F64(parse_number(kind, text)?),
    };
    Ok(scalar)
}

/// Coerce a comma-separated value into a list of scalars.
///
/// Elements are parsed in order and the first failure is returned as is.
/// An empty input is an empty list. Elements cannot contain a literal comma.
pub fn parse_list(kind: ScalarKind, text: &str) -> Result<Vec<Scalar>, Error> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    split_list(text)
        .map(|segment| parse_scalar(kind, segment))
        .collect()
}

/// Render a scalar in its base-10 textual form.
pub fn format_scalar(value: &Scalar) -> String {
    value.to_string()
}

/// Render a list as its comma-joined elements, without escaping.
pub fn format_list(values: &[Scalar]) -> String {
    join_list(&values.iter().map(format_scalar).collect::<Vec<String>>())
}

/// Split a list value into its segments.
pub fn split_list(text: &str) -> std::str::Split<'_, char> {
    text.split(LIST_SEPARATOR)
}

/// Join rendered list elements with the separator.
pub fn join_list(items: &[String]) -> String {
    let mut joined = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            joined.push(LIST_SEPARATOR);
        }
        joined.push_str(item);
    }
    joined
}
