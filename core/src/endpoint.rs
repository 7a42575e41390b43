//! Static description of an API operation.
//!
//! An `EndpointDescriptor` is built once per logical operation by the
//! endpoint catalog and shared freely afterwards; nothing here is mutated
//! once constructed.

use serde::{Deserialize, Serialize};

use crate::http::{HeaderSet, HttpMethod};

/// One segment of a URL path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Fixed text, percent-encoded as-is.
    Literal(String),
    /// Named slot filled from `CallDescriptor` path values.
    Placeholder(String),
}

impl PathSegment {
    pub fn literal(text: impl Into<String>) -> Self {
        PathSegment::Literal(text.into())
    }

    pub fn placeholder(name: impl Into<String>) -> Self {
        PathSegment::Placeholder(name.into())
    }
}

/// Ordered sequence of path segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTemplate {
    segments: Vec<PathSegment>,
}

impl PathTemplate {
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Parse a `/`-separated template such as `sheets/{sheet_id}/rows`.
    ///
    /// A segment becomes a placeholder only when it is exactly `{name}` with a
    /// non-empty name; anything else, including `{}`, is a literal. Empty
    /// segments from leading, trailing or doubled slashes are dropped.
    pub fn parse(template: &str) -> Self {
        let segments = template
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) if !name.is_empty() => PathSegment::placeholder(name),
                _ => PathSegment::literal(s),
            })
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Placeholder names in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            PathSegment::Placeholder(name) => Some(name.as_str()),
            PathSegment::Literal(_) => None,
        })
    }
}

/// How a request body is populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyStrategy {
    /// No body is ever sent.
    #[default]
    None,
    /// The call's structured value, serialized by the transport.
    Json,
    /// The call's `FileSpec` content, streamed raw.
    File,
}

/// Shape of one API operation: method, path, mandated headers and body policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    method: HttpMethod,
    path: PathTemplate,
    headers: HeaderSet,
    body: BodyStrategy,
}

impl EndpointDescriptor {
    /// Endpoint with a parsed path template, no mandated headers and no body.
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self::with_template(method, PathTemplate::parse(path))
    }

    pub fn with_template(method: HttpMethod, path: PathTemplate) -> Self {
        Self {
            method,
            path,
            headers: HeaderSet::new(),
            body: BodyStrategy::None,
        }
    }

    /// Add a header every call to this endpoint must carry.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, strategy: BodyStrategy) -> Self {
        self.body = strategy;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &PathTemplate {
        &self.path
    }

    pub fn mandatory_headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn body_strategy(&self) -> BodyStrategy {
        self.body
    }
}
