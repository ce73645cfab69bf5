//! The HTTP capabilities the binder needs from a web framework.

mod exchange;

use crate::binder::QueryBag;
use crate::error::Error;

pub use exchange::Exchange;

/// Read access to the current request and write access to the response
/// headers of one HTTP exchange.
///
/// Implement this for the request/response types of a web framework to use
/// [`bind`](crate::bind) and [`response_bind`](crate::response_bind) with it.
pub trait HttpContext {
    /// Get a request header (case-insensitive).
    fn request_header(&self, name: &str) -> Option<&str>;

    /// Get a response header set so far (case-insensitive).
    fn response_header(&self, name: &str) -> Option<&str>;

    /// Add or replace a response header.
    fn set_response_header(&mut self, name: &str, value: String);

    /// The original request target, path plus query.
    fn original_url(&self) -> &str;

    /// The URL of the page that issued the request.
    fn referer(&self) -> Option<&str> {
        self.request_header("Referer")
    }

    /// Scheme and authority, e.g. `https://example.com`.
    fn base_url(&self) -> String;

    /// The request path without its query.
    fn path(&self) -> &str;

    /// Overlay the live query parameters of the request onto `bag`.
    fn query_params(&self, bag: &mut QueryBag) -> Result<(), Error>;
}
