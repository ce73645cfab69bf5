//! A self-contained HTTP exchange built from a raw request head.

use std::collections::HashMap;

use crate::binder::{query_component, QueryBag};
use crate::context::HttpContext;
use crate::error::Error;

const METHODS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "HEAD", "OPTIONS", "PATCH"];
const VERSIONS: [&str; 4] = ["HTTP/1.0", "HTTP/1.1", "HTTP/2", "HTTP/2.0"];

/// One request and the response headers set while handling it.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// The HTTP method (GET, POST, etc.)
    pub method: String,
    /// The request target, path plus query
    pub target: String,
    /// The HTTP version
    pub version: String,
    /// Request headers, keyed by lowercase name
    pub headers: HashMap<String, String>,
    scheme: String,
    response_headers: Vec<(String, String)>,
}

impl Exchange {
    /// Create an HTTP/1.1 exchange for `method` and `target` with no headers.
    pub fn new(method: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            version: "HTTP/1.1".to_string(),
            headers: HashMap::new(),
            scheme: "http".to_string(),
            response_headers: Vec::new(),
        }
    }

    /// Add or replace a request header.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Set the scheme used by [`HttpContext::base_url`] (`http` by default).
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Parse an exchange from a raw HTTP request head.
    ///
    /// # Arguments
    ///
    /// * `input` - The request line and headers, up to the blank line
    ///
    /// # Returns
    ///
    /// The exchange, or `Error::MalformedRequest` if the head is invalid
    pub fn parse(input: &[u8]) -> Result<Self, Error> {
        let input_str = std::str::from_utf8(input)
            .map_err(|_| Error::MalformedRequest("invalid UTF-8".to_string()))?;

        let mut lines = input_str.lines();
        let request_line = lines
            .next()
            .filter(|line| !line.trim().is_empty())
            .ok_or_else(|| Error::MalformedRequest("empty request".to_string()))?;

        let parts: Vec<&str> = request_line.split_whitespace().collect();
        let &[method, target, version] = parts.as_slice() else {
            return Err(Error::MalformedRequest(format!("bad request line {request_line:?}")));
        };
        if !METHODS.contains(&method) {
            return Err(Error::MalformedRequest(format!("unsupported method {method:?}")));
        }
        if !VERSIONS.contains(&version) {
            return Err(Error::MalformedRequest(format!("unsupported version {version:?}")));
        }

        let mut exchange = Self::new(method, target);
        exchange.version = version.to_string();

        for line in lines {
            // Empty line indicates the end of headers
            if line.is_empty() {
                break;
            }
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| Error::MalformedRequest(format!("bad header line {line:?}")))?;
            exchange = exchange.with_header(name.trim(), value.trim());
        }

        if version == "HTTP/1.1" && !exchange.headers.contains_key("host") {
            return Err(Error::MalformedRequest("missing Host header".to_string()));
        }

        Ok(exchange)
    }

    /// All response headers, in the order they were first set.
    pub fn response_headers(&self) -> &[(String, String)] {
        &self.response_headers
    }
}

/// Drop the `scheme://authority` of an absolute-form target.
fn strip_origin(target: &str) -> &str {
    let Some((scheme, rest)) = target.split_once("://") else {
        return target;
    };
    let is_scheme = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !is_scheme {
        return target;
    }
    rest.find(['/', '?', '#']).map_or("", |start| &rest[start..])
}

impl HttpContext for Exchange {
    fn request_header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    fn response_header(&self, name: &str) -> Option<&str> {
        self.response_headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn set_response_header(&mut self, name: &str, value: String) {
        match self
            .response_headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => self.response_headers.push((name.to_string(), value)),
        }
    }

    fn original_url(&self) -> &str {
        &self.target
    }

    fn base_url(&self) -> String {
        match self.request_header("Host") {
            Some(host) => format!("{scheme}://{host}", scheme = self.scheme),
            None => String::new(),
        }
    }

    fn path(&self) -> &str {
        let target = strip_origin(&self.target);
        let end = target.find(['?', '#']).unwrap_or(target.len());
        match &target[..end] {
            "" => "/",
            path => path,
        }
    }

    fn query_params(&self, bag: &mut QueryBag) -> Result<(), Error> {
        if let Some(query) = query_component(&self.target) {
            bag.overlay(&QueryBag::parse(query)?);
        }
        Ok(())
    }
}
