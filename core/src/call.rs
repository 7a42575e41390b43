//! Per-invocation parameters supplied by the caller.

use std::collections::HashMap;
use std::fmt::Display;

use crate::file_spec::FileSpec;
use crate::http::HeaderSet;

/// Everything a single call contributes to a request.
///
/// Every field defaults to empty. Path values are stringified on insertion so
/// numeric and string identifiers are treated the same way downstream.
#[derive(Debug, Default)]
pub struct CallDescriptor {
    pub query: Vec<(String, String)>,
    pub header_overrides: HeaderSet,
    pub body: Option<serde_json::Value>,
    pub file: Option<FileSpec>,
    pub path_values: HashMap<String, String>,
}

impl CallDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_value(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.path_values.insert(name.into(), value.to_string());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_overrides.insert(name, value);
        self
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn file(mut self, file: FileSpec) -> Self {
        self.file = Some(file);
        self
    }
}
