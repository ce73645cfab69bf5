//! The query parameter bag.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use crate::error::Error;

/// An ordered multi-map from query parameter name to its values.
///
/// Keys keep the order in which they were first inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBag {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Parse a raw query string (without the leading `?`).
    ///
    /// Pairs are separated by `&`; a pair without `=` has an empty value.
    /// `+` decodes to a space and `%XX` to the escaped byte.
    ///
    /// # Errors
    ///
    /// `Error::MalformedUrl` if a `%` is not followed by two hex digits.
    pub fn parse(query: &str) -> Result<Self, Error> {
        let mut bag = Self::new();
        for pair in query.split('&').filter(|s| !s.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            bag.append(unescape(key)?, unescape(value)?);
        }
        Ok(bag)
    }

    /// Parse the query component of a URL: the text between the first `?`
    /// and any `#` fragment. A URL without a query yields an empty bag.
    pub fn from_url(url: &str) -> Result<Self, Error> {
        match query_component(url) {
            Some(query) => Self::parse(query),
            None => Ok(Self::new()),
        }
    }

    /// Get the first value of a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// Get all values of a key, in insertion order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// Check if a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Add a value to a key, keeping any values already there.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Replace every value of a key with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set_all(key, vec![value.into()]);
    }

    /// Replace every value of a key with `values`.
    pub fn set_all(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key, values)),
        }
    }

    /// Remove a key and return its values.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Overlay another bag: every key of `other` replaces the same key here.
    pub fn overlay(&mut self, other: &QueryBag) {
        for (key, values) in &other.entries {
            self.set_all(key.as_str(), values.clone());
        }
    }

    /// Iterate over keys and their values, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// The number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the bag has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The query component of a URL, if it has one.
pub(crate) fn query_component(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once('?')?;
    Some(rest.split_once('#').map_or(rest, |(query, _)| query))
}

fn unescape(raw: &str) -> Result<String, Error> {
    let bytes = raw.as_bytes();
    for (i, _) in raw.match_indices('%') {
        let valid = bytes.len() > i + 2 && bytes[i + 1].is_ascii_hexdigit() && bytes[i + 2].is_ascii_hexdigit();
        if !valid {
            let end = raw.len().min(i + 3);
            return Err(Error::MalformedUrl(format!(
                "invalid escape {escape:?} in query",
                escape = raw.get(i..end).unwrap_or(&raw[i..])
            )));
        }
    }

    let plus_decoded: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };
    Ok(percent_decode_str(&plus_decoded).decode_utf8_lossy().into_owned())
}
