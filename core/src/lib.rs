//! Declarative request composition for the Smartsheet REST API.
//!
//! # Overview
//! Callers describe an operation once as an `EndpointDescriptor` (method,
//! path template, mandated headers, body strategy) and each invocation as a
//! `CallDescriptor` (path values, query, header overrides, JSON body or file).
//! `RequestClient` compiles the pair into a `Request` and hands it to an
//! injected `Transport` (host-does-IO pattern).
//!
//! # Design
//! - `UrlBuilder` resolves the path template, `HeaderBuilder` layers headers,
//!   `RequestBuilder` fills the request in dependency order.
//! - `FileSpec` abstracts in-memory and on-disk payloads; disk access is
//!   deferred until the request is composed.
//! - `RequestClient` is stateless between calls and holds only read-only
//!   configuration, so one instance can serve many threads.
//! - Response decoding, retries and connection handling belong to the
//!   transport and the caller.

pub mod builder;
pub mod call;
pub mod client;
pub mod config;
pub mod constants;
pub mod endpoint;
pub mod error;
pub mod file_spec;
pub mod headers;
pub mod http;
pub mod logger;
pub mod url;

pub use builder::RequestBuilder;
pub use call::CallDescriptor;
pub use client::{RequestClient, Transport};
pub use config::ClientConfig;
pub use endpoint::{BodyStrategy, EndpointDescriptor, PathSegment, PathTemplate};
pub use error::ApiError;
pub use file_spec::{to_content_type, FileSpec, FileType};
pub use headers::HeaderBuilder;
pub use http::{ByteStream, HeaderSet, HttpMethod, HttpResponse, Request, RequestBody};
pub use logger::{MuteRequestLogger, RequestLogger, TracingRequestLogger};
pub use url::UrlBuilder;
