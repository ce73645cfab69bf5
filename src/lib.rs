//! Bind HTTP query strings into typed structures, and push structures back
//! to the client as a navigation URL.
//!
//! Partial-page-update UIs (htmx and friends) keep filter and paging state in
//! the browser URL. This library reads that state into a plain struct and,
//! after the handler has updated it, writes it back in the `HX-Push-Url`
//! response header.
//!
//! # Features
//!
//! - Binding keys come from serde: the field name, or `#[serde(rename = "...")]`
//! - Strings, integers of any width, booleans, floats and lists of those
//! - Lists travel as comma-separated values (`ids=1,2,3`)
//! - Missing or empty keys leave a field at its zero value; enums have none,
//!   so an enum field that may be absent must be an `Option` (`#[serde(default)]` is not consulted)
//! - Query state is seeded from the `Referer` URL and overridden by the live request
//! - Fields that cannot be rendered are left out of the pushed URL instead of failing
//!
//! # Examples
//!
//! ## Binding
//!
//! ```
//! use querybind::{bind, Exchange};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Listing {
//!     #[serde(rename = "q")]
//!     search: String,
//!     page: u32,
//!     tags: Vec<String>,
//! }
//!
//! let request = b"GET /items?q=lamp&tags=red,blue HTTP/1.1\r\nHost: shop.example\r\n\r\n";
//! let exchange = Exchange::parse(request).unwrap();
//!
//! let listing: Listing = bind(&exchange).unwrap();
//! assert_eq!(listing.search, "lamp");
//! assert_eq!(listing.page, 0);
//! assert_eq!(listing.tags, ["red", "blue"]);
//! ```
//!
//! ## Error handling
//!
//! ```
//! use querybind::{bind, Error, Exchange};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Paging {
//!     page: u32,
//! }
//!
//! let exchange = Exchange::new("GET", "/items?page=-1");
//!
//! match bind::<Paging, _>(&exchange) {
//!     Ok(paging) => println!("Page {}", paging.page),
//!     Err(Error::InvalidNumber { kind, value }) => println!("{value:?} is not a valid {kind}"),
//!     Err(err) => println!("Other error: {err}"),
//! }
//! ```
//!
//! ## Pushing state back
//!
//! ```
//! use querybind::{response_bind, Exchange, HttpContext, PUSH_URL_HEADER};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Listing {
//!     q: String,
//!     page: u32,
//!     tags: Vec<String>,
//! }
//!
//! let mut exchange = Exchange::new("GET", "/items").with_header("Host", "shop.example");
//! let listing = Listing {
//!     q: "desk lamp".to_string(),
//!     page: 2,
//!     tags: vec!["red".to_string(), "blue".to_string()],
//! };
//! response_bind(&mut exchange, &listing);
//!
//! assert_eq!(
//!     exchange.response_header(PUSH_URL_HEADER),
//!     Some("http://shop.example/items?q=desk+lamp&page=2&tags=red,blue")
//! );
//! ```
//!
//! List elements cannot contain a literal comma: it is read back as a
//! separator.

pub mod binder;
pub mod coerce;
pub mod context;
mod error;

// Re-export commonly used items for convenience
pub use binder::{
    bind, bind_bag, merged_query, response_bind, response_bind_with, QueryBag, ResponseOptions, SeedSource,
    PUSH_URL_HEADER,
};
pub use coerce::{format_scalar, parse_scalar, Scalar, ScalarKind};
pub use context::{Exchange, HttpContext};
pub use error::Error;
