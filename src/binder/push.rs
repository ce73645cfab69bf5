//! Pushing a structure back to the client as a navigation URL.

use serde::Serialize;
use log::{debug, warn};

use crate::binder::options::ResponseOptions;
use crate::coerce::to_query_pairs;
use crate::context::HttpContext;

/// Form-urlencode a query value, keeping commas literal so list values
/// stay readable and split back the same way.
fn escape(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace("%2C", ",")
}

/// Encode ordered pairs as `key=value&key=value`.
pub fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", escape(key), escape(value)))
        .collect::<Vec<String>>()
        .join("&")
}

/// Build `base + path + "?" + query` from the fields of `value`.
///
/// Returns `None` if `value` is not a structure.
pub fn push_url<T: Serialize + ?Sized>(base: &str, path: &str, value: &T) -> Option<String> {
    match to_query_pairs(value) {
        Ok(pairs) => Some(format!("{base}{path}?{query}", query = encode_query(&pairs))),
        Err(err) => {
            warn!("Cannot build a push URL: {err}");
            None
        }
    }
}

/// Write the navigation URL for `value` into the `HX-Push-Url` header.
///
/// Equivalent to [`response_bind_with`] with default options.
pub fn response_bind<T, C>(ctx: &mut C, value: &T)
where
    T: Serialize + ?Sized,
    C: HttpContext + ?Sized,
{
    response_bind_with(ctx, value, &ResponseOptions::default());
}

/// Write the navigation URL for `value` into the configured header.
///
/// This never fails: fields that cannot be rendered are left out, and a
/// value that is not a structure leaves the header untouched.
///
/// # Examples
///
/// ```
/// use querybind::{response_bind_with, Exchange, HttpContext, ResponseOptions};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Filter {
///     a: u32,
///     b: Vec<String>,
/// }
///
/// let mut exchange = Exchange::new("GET", "/").with_header("Host", "example.com");
/// let filter = Filter { a: 1, b: vec!["x".into(), "y".into()] };
/// response_bind_with(&mut exchange, &filter, &ResponseOptions::new().with_path("/foo"));
///
/// assert_eq!(
///     exchange.response_header("HX-Push-Url"),
///     Some("http://example.com/foo?a=1&b=x,y")
/// );
/// ```
pub fn response_bind_with<T, C>(ctx: &mut C, value: &T, options: &ResponseOptions)
where
    T: Serialize + ?Sized,
    C: HttpContext + ?Sized,
{
    let path = options.path.as_deref().unwrap_or_else(|| ctx.path()).to_string();
    let Some(url) = push_url(&ctx.base_url(), &path, value) else {
        return;
    };

    debug!("Pushing {header}: {url}", header = options.header);
    ctx.set_response_header(&options.header, url);
}
