//! Binding query strings into structures and pushing structures back.

mod bag;
mod bind;
mod options;
mod push;
mod tests;

// Re-export public items
pub use bag::QueryBag;
pub use bind::{bind, bind_bag, merged_query, SeedSource};
pub use options::{ResponseOptions, PUSH_URL_HEADER};
pub use push::{encode_query, push_url, response_bind, response_bind_with};

pub(crate) use bag::query_component;
