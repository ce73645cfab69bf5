//! Type coercion between query text and typed values.
//!
//! [`parse_scalar`] and [`format_scalar`] convert single values, [`parse_list`]
//! and [`format_list`] handle the comma-separated list form. The serde
//! adapters built on them walk whole structures.

mod scalar;
mod de;
mod ser;

// Re-export public items
pub use scalar::{
    format_list, format_scalar, join_list, parse_list, parse_scalar, split_list, Scalar, ScalarKind, LIST_SEPARATOR,
};
pub use de::StructDeserializer;
pub use ser::{to_query_pairs, to_text};
