//! Deserializing structures from looked-up query values.
//!
//! A structure is walked through the field list serde derives for it. Each
//! field is handed a [`FieldValue`] which coerces its text according to the
//! kind the field asks for. Keys that are missing yield the zero value of
//! the field rather than an error. Every declared field is visited, so
//! `#[serde(default)]` never applies; an enum without a value is an error.

use serde::de::value::StrDeserializer;
use serde::de::{DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::forward_to_deserialize_any;
use log::debug;

use crate::coerce::scalar::{parse_scalar, split_list, Scalar, ScalarKind};
use crate::error::Error;

/// Deserializes a structure, looking up each field's binding key with `lookup`.
pub struct StructDeserializer<F> {
    lookup: F,
}

impl<'a, F> StructDeserializer<F>
where
    F: Fn(&str) -> Option<&'a str>,
{
    /// Create a deserializer resolving binding keys through `lookup`.
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

impl<'de, 'a, F> Deserializer<'de> for StructDeserializer<F>
where
    F: Fn(&str) -> Option<&'a str>,
{
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Error> {
        Err(Error::UnsupportedKind("non-struct value"))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_map(FieldAccess::new(fields, self.lookup))
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct seq tuple tuple_struct map enum
        identifier ignored_any
    }
}

/// Walks the declared fields of a structure, pairing each with its value.
struct FieldAccess<'a, F> {
    fields: std::slice::Iter<'static, &'static str>,
    lookup: F,
    value: Option<FieldValue<'a>>,
    key: &'static str,
}

impl<'a, F> FieldAccess<'a, F>
where
    F: Fn(&str) -> Option<&'a str>,
{
    fn new(fields: &'static [&'static str], lookup: F) -> Self {
        Self {
            fields: fields.iter(),
            lookup,
            value: None,
            key: "",
        }
    }
}

impl<'de, 'a, F> MapAccess<'de> for FieldAccess<'a, F>
where
    F: Fn(&str) -> Option<&'a str>,
{
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>, Error> {
        let Some(&key) = self.fields.next() else {
            return Ok(None);
        };

        // An empty value counts as absent
        self.value = Some(match (self.lookup)(key) {
            Some(text) if !text.is_empty() => FieldValue::Present(text),
            _ => FieldValue::Absent,
        });
        self.key = key;

        seed.deserialize(StrDeserializer::<Error>::new(key)).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Error> {
        let value = self
            .value
            .take()
            .ok_or_else(|| Error::Custom("field value requested before its key".to_string()))?;

        seed.deserialize(value).inspect_err(|err| {
            debug!("Failed to bind query key `{key}`: {err}", key = self.key);
        })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// A single query value on its way into one field.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FieldValue<'a> {
    /// The key is missing or empty; the field takes its zero value.
    Absent,
    /// The raw text bound to a top-level field.
    Present(&'a str),
    /// One comma-separated segment of a list field.
    Element(&'a str),
}

impl<'a> FieldValue<'a> {
    fn text(&self) -> Option<&'a str> {
        match *self {
            FieldValue::Absent => None,
            FieldValue::Present(text) | FieldValue::Element(text) => Some(text),
        }
    }

    fn scalar(&self, kind: ScalarKind) -> Result<Scalar, Error> {
        match self.text() {
            Some(text) => parse_scalar(kind, text),
            None => Ok(Scalar::zero(kind)),
        }
    }

    /// Fail with `UnsupportedKind` unless the key is absent.
    fn reject(&self, kind: &'static str) -> Result<(), Error> {
        match self {
            FieldValue::Absent => Ok(()),
            _ => Err(Error::UnsupportedKind(kind)),
        }
    }
}

macro_rules! deserialize_scalar {
    ($($method:ident => $kind:ident),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
                self.scalar(ScalarKind::$kind)?.visit(visitor)
            }
        )*
    };
}

impl<'de, 'a> Deserializer<'de> for FieldValue<'a> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.text() {
            Some(text) => visitor.visit_str(text),
            None => visitor.visit_unit(),
        }
    }

    deserialize_scalar! {
        deserialize_bool => Bool,
        deserialize_i8 => I8,
        deserialize_i16 => I16,
        deserialize_i32 => I32,
        deserialize_i64 => I64,
        deserialize_i128 => I128,
        deserialize_u8 => U8,
        deserialize_u16 => U16,
        deserialize_u32 => U32,
        deserialize_u64 => U64,
        deserialize_u128 => U128,
        deserialize_f32 => F32,
        deserialize_f64 => F64,
        deserialize_str => Str,
        deserialize_string => Str,
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.text() {
            Some(text) => visitor.visit_str(text),
            None => visitor.visit_char('\0'),
        }
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.reject("bytes")?;
        visitor.visit_bytes(&[])
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self {
            FieldValue::Absent => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.reject("unit")?;
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self {
            FieldValue::Absent => visitor.visit_seq(ListAccess::empty()),
            FieldValue::Present(text) => visitor.visit_seq(ListAccess::new(text)),
            FieldValue::Element(_) => Err(Error::UnsupportedKind("nested list")),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> Result<V::Value, Error> {
        Err(Error::UnsupportedKind("tuple"))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value, Error> {
        Err(Error::UnsupportedKind("tuple struct"))
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.reject("map")?;
        visitor.visit_map(NoEntries)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.reject("struct")?;
        visitor.visit_map(FieldAccess::new(fields, |_: &str| -> Option<&'a str> { None }))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        match self.text() {
            // Only unit variants can be named by a bare string
            Some(text) => visitor.visit_enum(StrDeserializer::<Error>::new(text)),
            None => Err(Error::UnsupportedKind("enum without a value")),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_unit()
    }
}

/// Yields the comma-separated segments of a list value.
struct ListAccess<'a> {
    segments: Option<std::str::Split<'a, char>>,
}

impl<'a> ListAccess<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            segments: Some(split_list(text)),
        }
    }

    fn empty() -> Self {
        Self { segments: None }
    }
}

impl<'de, 'a> SeqAccess<'de> for ListAccess<'a> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>, Error> {
        match self.segments.as_mut().and_then(Iterator::next) {
            Some(segment) => seed.deserialize(FieldValue::Element(segment)).map(Some),
            None => Ok(None),
        }
    }
}

/// The zero value of a map field.
struct NoEntries;

impl<'de> MapAccess<'de> for NoEntries {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, _seed: K) -> Result<Option<K::Value>, Error> {
        Ok(None)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, _seed: V) -> Result<V::Value, Error> {
        Err(Error::Custom("map value requested without a key".to_string()))
    }
}
