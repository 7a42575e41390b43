//! Path template resolution.

use tracing::trace;

use crate::call::CallDescriptor;
use crate::endpoint::{EndpointDescriptor, PathSegment};
use crate::error::ApiError;
use crate::http::encode_component;

/// Resolves an endpoint's path template under a fixed base URL.
#[derive(Debug, Clone, Copy)]
pub struct UrlBuilder<'a> {
    base_url: &'a str,
}

impl<'a> UrlBuilder<'a> {
    pub fn new(base_url: &'a str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/'),
        }
    }

    /// Walk the template in order, percent-encoding every segment.
    ///
    /// Fails on the first placeholder with no value in `call`. Extra path
    /// values that the template never names are ignored.
    pub fn build(&self, endpoint: &EndpointDescriptor, call: &CallDescriptor) -> Result<String, ApiError> {
        let mut url = String::from(self.base_url);
        for segment in endpoint.path().segments() {
            let raw = match segment {
                PathSegment::Literal(text) => text.as_str(),
                PathSegment::Placeholder(name) => call
                    .path_values
                    .get(name)
                    .map(String::as_str)
                    .ok_or_else(|| ApiError::MissingPathValue { name: name.clone() })?,
            };
            url.push('/');
            url.push_str(&encode_component(raw));
        }
        trace!(%url, "resolved path template");
        Ok(url)
    }
}
