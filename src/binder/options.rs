//! Options for pushing a structure back to the client.

/// The response header htmx reads to update the browser URL.
pub const PUSH_URL_HEADER: &str = "HX-Push-Url";

/// Response binding options.
#[derive(Debug, Clone)]
pub struct ResponseOptions {
    /// The header the navigation URL is written to.
    pub header: String,
    /// Path to push instead of the request path.
    pub path: Option<String>,
}

impl ResponseOptions {
    /// Create the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `path` instead of the request path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Write the navigation URL to `header` instead of `HX-Push-Url`.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }
}

impl Default for ResponseOptions {
    fn default() -> Self {
        Self {
            header: PUSH_URL_HEADER.to_string(),
            path: None,
        }
    }
}
