//! Serializing structures into ordered `(key, text)` query pairs.

use serde::ser::{self, Impossible, Serialize, SerializeSeq, SerializeStruct};
use log::warn;

use crate::coerce::scalar::{format_scalar, join_list, Scalar};
use crate::error::Error;

/// Collect the non-empty fields of a structure as ordered `(key, text)` pairs.
///
/// Pairs follow the field declaration order. A field whose kind has no text
/// form (a map, a nested structure, ...) is logged and left out; the rest of
/// the structure is still emitted.
///
/// # Errors
///
/// `Error::UnsupportedKind` if `value` is not a structure.
pub fn to_query_pairs<T: Serialize + ?Sized>(value: &T) -> Result<Vec<(String, String)>, Error> {
    value.serialize(PairSerializer)
}

/// Render one field value as text; an empty string means "nothing to emit".
pub fn to_text<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    value.serialize(TextSerializer { in_list: false })
}

/// Top-level serializer: accepts a structure and produces its pairs.
struct PairSerializer;

/// Accumulates the pairs of one structure.
struct PairCollector {
    pairs: Vec<(String, String)>,
}

impl SerializeStruct for PairCollector {
    type Ok = Vec<(String, String)>;
    type Error = Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<(), Error> {
        match to_text(value) {
            Ok(text) if !text.is_empty() => self.pairs.push((key.to_string(), text)),
            Ok(_) => {}
            Err(err) => warn!("Skipping query key `{key}`: {err}"),
        }
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Error> {
        Ok(self.pairs)
    }
}

type NoPairs = Impossible<Vec<(String, String)>, Error>;

impl ser::Serializer for PairSerializer {
    type Ok = Vec<(String, String)>;
    type Error = Error;
    type SerializeSeq = NoPairs;
    type SerializeTuple = NoPairs;
    type SerializeTupleStruct = NoPairs;
    type SerializeTupleVariant = NoPairs;
    type SerializeMap = NoPairs;
    type SerializeStruct = PairCollector;
    type SerializeStructVariant = NoPairs;

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<PairCollector, Error> {
        Ok(PairCollector {
            pairs: Vec::with_capacity(len),
        })
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(self, _name: &'static str, value: &T) -> Result<Self::Ok, Error> {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("i8"))
    }

    fn serialize_i16(self, _v: i16) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("i16"))
    }

    fn serialize_i32(self, _v: i32) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("i32"))
    }

    fn serialize_i64(self, _v: i64) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("i64"))
    }

    fn serialize_u8(self, _v: u8) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("u8"))
    }

    fn serialize_u16(self, _v: u16) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("u16"))
    }

    fn serialize_u32(self, _v: u32) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("u32"))
    }

    fn serialize_u64(self, _v: u64) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("u64"))
    }

    fn serialize_f32(self, _v: f32) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("f64"))
    }

    fn serialize_char(self, _v: char) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("char"))
    }

    fn serialize_str(self, _v: &str) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("string"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("bytes"))
    }

    fn serialize_none(self) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("option"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("option"))
    }

    fn serialize_unit(self) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("enum"))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok, Error> {
        Err(Error::UnsupportedKind("enum"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Error> {
        Err(Error::UnsupportedKind("list"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Error> {
        Err(Error::UnsupportedKind("tuple"))
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeTupleStruct, Error> {
        Err(Error::UnsupportedKind("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Error> {
        Err(Error::UnsupportedKind("enum"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Error> {
        Err(Error::UnsupportedKind("map"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Error> {
        Err(Error::UnsupportedKind("enum"))
    }
}

/// Field-level serializer: renders scalars and flat lists of scalars.
struct TextSerializer {
    in_list: bool,
}

/// Joins the rendered elements of a list field.
struct ListSerializer {
    items: Vec<String>,
}

impl SerializeSeq for ListSerializer {
    type Ok = String;
    type Error = Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        self.items.push(value.serialize(TextSerializer { in_list: true })?);
        Ok(())
    }

    fn end(self) -> Result<String, Error> {
        Ok(join_list(&self.items))
    }
}

type NoText = Impossible<String, Error>;

impl ser::Serializer for TextSerializer {
    type Ok = String;
    type Error = Error;
    type SerializeSeq = ListSerializer;
    type SerializeTuple = NoText;
    type SerializeTupleStruct = NoText;
    type SerializeTupleVariant = NoText;
    type SerializeMap = NoText;
    type SerializeStruct = NoText;
    type SerializeStructVariant = NoText;

    fn serialize_bool(self, v: bool) -> Result<String, Error> {
        Ok(format_scalar(&Scalar::Bool(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<String, Error> {
        Ok(format_scalar(&Scalar::I8(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<String, Error> {
        Ok(format_scalar(&Scalar::I16(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<String, Error> {
        Ok(format_scalar(&Scalar::I32(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<String, Error> {
        Ok(format_scalar(&Scalar::I64(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<String, Error> {
        Ok(format_scalar(&Scalar::I128(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<String, Error> {
        Ok(format_scalar(&Scalar::U8(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<String, Error> {
        Ok(format_scalar(&Scalar::U16(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<String, Error> {
        Ok(format_scalar(&Scalar::U32(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<String, Error> {
        Ok(format_scalar(&Scalar::U64(v)))
    }

    fn serialize_u128(self, v: u128) -> Result<String, Error> {
        Ok(format_scalar(&Scalar::U128(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<String, Error> {
        Ok(format_scalar(&Scalar::F32(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<String, Error> {
        Ok(format_scalar(&Scalar::F64(v)))
    }

    fn serialize_char(self, v: char) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, Error> {
        Err(Error::UnsupportedKind("bytes"))
    }

    fn serialize_none(self) -> Result<String, Error> {
        Ok(String::new())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<String, Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String, Error> {
        Ok(String::new())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String, Error> {
        Ok(String::new())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, Error> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(self, _name: &'static str, value: &T) -> Result<String, Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, Error> {
        Err(Error::UnsupportedKind("enum"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<ListSerializer, Error> {
        if self.in_list {
            return Err(Error::UnsupportedKind("nested list"));
        }
        Ok(ListSerializer {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, _len: usize) -> Result<NoText, Error> {
        Err(Error::UnsupportedKind("tuple"))
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<NoText, Error> {
        Err(Error::UnsupportedKind("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<NoText, Error> {
        Err(Error::UnsupportedKind("enum"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<NoText, Error> {
        Err(Error::UnsupportedKind("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<NoText, Error> {
        Err(Error::UnsupportedKind("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<NoText, Error> {
        Err(Error::UnsupportedKind("enum"))
    }
}
