//! Header composition.
//!
//! # Design
//! Headers are assembled from five layers, each merged over the previous one
//! with case-insensitive, last-writer-wins keys:
//!
//! 1. defaults (`Accept`, `User-Agent`, body-strategy content headers)
//! 2. `Authorization: Bearer <token>`
//! 3. `Assume-User`, when the client impersonates someone
//! 4. the endpoint's mandatory headers
//! 5. the caller's per-call overrides
//!
//! File content headers are derived from the call's `FileSpec` here, before
//! the body is attached, so a path-backed spec is stat'ed at this point.

use crate::call::CallDescriptor;
use crate::config::ClientConfig;
use crate::constants::{ASSUME_USER_HEADER, JSON_TYPE, USER_AGENT};
use crate::endpoint::{BodyStrategy, EndpointDescriptor};
use crate::error::ApiError;
use crate::http::{encode_component, HeaderSet};

/// Builds the final header set for one request.
#[derive(Debug, Clone, Copy)]
pub struct HeaderBuilder<'a> {
    config: &'a ClientConfig,
}

impl<'a> HeaderBuilder<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, endpoint: &EndpointDescriptor, call: &CallDescriptor) -> Result<HeaderSet, ApiError> {
        let mut headers = self.defaults(endpoint, call)?;
        headers.merge(&self.auth());
        if let Some(assume) = self.assume_user() {
            headers.merge(&assume);
        }
        headers.merge(endpoint.mandatory_headers());
        headers.merge(&call.header_overrides);
        Ok(headers)
    }

    /// `smartsheet-rust-sdk/<version>`, suffixed with the application name if set.
    pub fn user_agent(&self) -> String {
        match &self.config.app_user_agent {
            Some(app) => format!("{USER_AGENT}/{app}"),
            None => USER_AGENT.to_string(),
        }
    }

    fn defaults(&self, endpoint: &EndpointDescriptor, call: &CallDescriptor) -> Result<HeaderSet, ApiError> {
        let mut headers = HeaderSet::new();
        headers.insert("Accept", JSON_TYPE);
        headers.insert("User-Agent", self.user_agent());

        match endpoint.body_strategy() {
            BodyStrategy::None => {}
            BodyStrategy::Json => headers.insert("Content-Type", JSON_TYPE),
            BodyStrategy::File => {
                if let Some(file) = &call.file {
                    headers.insert("Content-Type", file.content_type());
                    headers.insert("Content-Length", file.length()?.to_string());
                    if let Some(name) = file.filename() {
                        headers.insert(
                            "Content-Disposition",
                            format!("attachment; filename=\"{}\"", encode_component(&name)),
                        );
                    }
                }
            }
        }
        Ok(headers)
    }

    fn auth(&self) -> HeaderSet {
        let mut headers = HeaderSet::new();
        headers.insert("Authorization", format!("Bearer {}", self.config.token));
        headers
    }

    fn assume_user(&self) -> Option<HeaderSet> {
        let identity = self.config.assume_user.as_deref()?;
        let mut headers = HeaderSet::new();
        headers.insert(ASSUME_USER_HEADER, encode_component(identity));
        Some(headers)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::constants::{CSV_TYPE, PDF_TYPE};
    use crate::file_spec::FileSpec;
    use crate::http::HttpMethod;

    fn config() -> ClientConfig {
        ClientConfig::new("secret-token")
    }

    #[test]
    fn defaults_and_auth_for_plain_get() {
        let config = config();
        let headers = HeaderBuilder::new(&config)
            .build(&EndpointDescriptor::new(HttpMethod::Get, "sheets"), &CallDescriptor::new())
            .unwrap();
        assert_eq!(headers.get("accept"), Some(JSON_TYPE));
        assert_eq!(headers.get("authorization"), Some("Bearer secret-token"));
        assert_eq!(headers.get("user-agent"), Some(USER_AGENT));
        assert!(!headers.contains("content-type"));
        assert!(!headers.contains(ASSUME_USER_HEADER));
    }

    #[test]
    fn app_user_agent_is_appended() {
        let config = config().with_app_user_agent("reporting-bot");
        assert_eq!(
            HeaderBuilder::new(&config).user_agent(),
            format!("{USER_AGENT}/reporting-bot")
        );
    }

    #[test]
    fn assume_user_is_percent_encoded() {
        let config = config().with_assume_user("jane.doe@example.com");
        let headers = HeaderBuilder::new(&config)
            .build(&EndpointDescriptor::new(HttpMethod::Get, "users/me"), &CallDescriptor::new())
            .unwrap();
        assert_eq!(headers.get("assume-user"), Some("jane.doe%40example.com"));
    }

    #[test]
    fn json_strategy_sets_content_type() {
        let config = config();
        let endpoint = EndpointDescriptor::new(HttpMethod::Post, "sheets").with_body(BodyStrategy::Json);
        let headers = HeaderBuilder::new(&config).build(&endpoint, &CallDescriptor::new()).unwrap();
        assert_eq!(headers.get("Content-Type"), Some(JSON_TYPE));
    }

    #[test]
    fn file_strategy_derives_content_headers_from_spec() {
        let config = config();
        let endpoint = EndpointDescriptor::new(HttpMethod::Post, "sheets/import").with_body(BodyStrategy::File);
        let call = CallDescriptor::new().file(
            FileSpec::from_reader(Cursor::new(b"a,b\n".to_vec()), 4, CSV_TYPE).with_filename("my data.csv"),
        );
        let headers = HeaderBuilder::new(&config).build(&endpoint, &call).unwrap();
        assert_eq!(headers.get("content-type"), Some(CSV_TYPE));
        assert_eq!(headers.get("content-length"), Some("4"));
        assert_eq!(
            headers.get("content-disposition"),
            Some("attachment; filename=\"my%20data.csv\"")
        );
    }

    #[test]
    fn file_strategy_surfaces_missing_file() {
        let config = config();
        let endpoint = EndpointDescriptor::new(HttpMethod::Post, "sheets/import").with_body(BodyStrategy::File);
        let call = CallDescriptor::new().file(FileSpec::from_path("/no/such/file.csv", CSV_TYPE));
        let err = HeaderBuilder::new(&config).build(&endpoint, &call).unwrap_err();
        assert!(matches!(err, ApiError::FileNotFound { .. }));
    }

    #[test]
    fn endpoint_headers_override_defaults() {
        let config = config();
        let endpoint = EndpointDescriptor::new(HttpMethod::Get, "sheets/{sheet_id}").with_header("Accept", PDF_TYPE);
        let headers = HeaderBuilder::new(&config).build(&endpoint, &CallDescriptor::new()).unwrap();
        assert_eq!(headers.get("accept"), Some(PDF_TYPE));
        assert_eq!(headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case("accept")).count(), 1);
    }

    #[test]
    fn call_overrides_win_over_every_layer() {
        let config = config().with_assume_user("a@b.c");
        let endpoint = EndpointDescriptor::new(HttpMethod::Get, "sheets").with_header("Accept", PDF_TYPE);
        let call = CallDescriptor::new()
            .header("ACCEPT", CSV_TYPE)
            .header("authorization", "Bearer other")
            .header("assume-user", "x%40y.z")
            .header("X-Trace", "1");
        let headers = HeaderBuilder::new(&config).build(&endpoint, &call).unwrap();
        assert_eq!(headers.get("Accept"), Some(CSV_TYPE));
        assert_eq!(headers.get("Authorization"), Some("Bearer other"));
        assert_eq!(headers.get("Assume-User"), Some("x%40y.z"));
        assert_eq!(headers.get("x-trace"), Some("1"));
        // Accept, User-Agent, Authorization, Assume-User, X-Trace
        assert_eq!(headers.len(), 5);
    }
}
