//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! builds a `Request` and hands it to an injected `Transport`; it never opens
//! a socket itself. Headers and query parameters keep insertion order so the
//! wire form is deterministic and easy to assert on in tests.
//!
//! A `Request` is single-use: a file body is a live byte stream that the
//! transport drains, so the type is deliberately not `Clone`.

use std::borrow::Cow;
use std::fmt;
use std::io::Read;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Characters left untouched when percent-encoding a URL component
/// (RFC 3986 unreserved set).
pub(crate) const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encode a single path segment or query component.
pub(crate) fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// Ordered header set with case-insensitive, last-writer-wins keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any existing entry whose name matches
    /// case-insensitively. A replaced entry keeps its position but takes the
    /// new spelling of the name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
            Some(entry) => *entry = (name, value),
            None => self.entries.push((name, value)),
        }
    }

    /// Layer `other` on top of `self`; `other` wins on collisions.
    pub fn merge(&mut self, other: &HeaderSet) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = HeaderSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// A readable byte stream handed to the transport as a raw request body.
pub type ByteStream = Box<dyn Read + Send>;

/// Request body as seen by the transport.
#[derive(Default)]
pub enum RequestBody {
    #[default]
    Absent,
    /// Structured value; the transport serializes it.
    Json(serde_json::Value),
    /// Raw file content, streamed as-is.
    Stream(ByteStream),
}

impl RequestBody {
    pub fn is_absent(&self) -> bool {
        matches!(self, RequestBody::Absent)
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Absent => write!(f, "Absent"),
            RequestBody::Json(value) => f.debug_tuple("Json").field(value).finish(),
            RequestBody::Stream(_) => write!(f, "Stream(..)"),
        }
    }
}

/// An HTTP request described as plain data.
///
/// Populated by `RequestBuilder::apply`, then moved into the transport.
#[derive(Debug)]
pub struct Request {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderSet,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl Request {
    /// An empty accumulator for `method`.
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            url: String::new(),
            headers: HeaderSet::new(),
            query: Vec::new(),
            body: RequestBody::Absent,
        }
    }

    /// The URL with the query parameters percent-encoded and appended.
    pub fn full_url(&self) -> Cow<'_, str> {
        if self.query.is_empty() {
            return Cow::Borrowed(&self.url);
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&");
        Cow::Owned(format!("{}?{query}", self.url))
    }
}

/// An HTTP response described as plain data.
///
/// Produced by the transport and returned to the caller untouched; decoding
/// the body is the caller's business.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
