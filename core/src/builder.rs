//! Populates a `Request` from an endpoint and a call.

use tracing::debug;

use crate::call::CallDescriptor;
use crate::config::ClientConfig;
use crate::endpoint::{BodyStrategy, EndpointDescriptor};
use crate::error::ApiError;
use crate::headers::HeaderBuilder;
use crate::http::{Request, RequestBody};
use crate::url::UrlBuilder;

/// Fills a request accumulator in dependency order: URL, headers, query, body.
///
/// Headers must be complete before the body is attached because file-mode
/// content headers are read from the `FileSpec` that the body step consumes.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    config: &'a ClientConfig,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    pub fn apply(
        &self,
        endpoint: &EndpointDescriptor,
        call: CallDescriptor,
        request: &mut Request,
    ) -> Result<(), ApiError> {
        request.url = UrlBuilder::new(&self.config.base_url).build(endpoint, &call)?;
        request.headers = HeaderBuilder::new(self.config).build(endpoint, &call)?;
        request.query = call.query;
        request.body = match endpoint.body_strategy() {
            BodyStrategy::None => {
                if call.body.is_some() || call.file.is_some() {
                    debug!(url = %request.url, "endpoint takes no body; ignoring supplied payload");
                }
                RequestBody::Absent
            }
            BodyStrategy::Json => call.body.map_or(RequestBody::Absent, RequestBody::Json),
            BodyStrategy::File => match call.file {
                Some(file) => RequestBody::Stream(file.open_stream()?),
                None => RequestBody::Absent,
            },
        };
        Ok(())
    }

    /// Build a fresh request for `endpoint`.
    pub fn build(&self, endpoint: &EndpointDescriptor, call: CallDescriptor) -> Result<Request, ApiError> {
        let mut request = Request::new(endpoint.method());
        self.apply(endpoint, call, &mut request)?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use serde_json::json;

    use super::*;
    use crate::constants::{CSV_TYPE, EXCEL_TYPE};
    use crate::file_spec::FileSpec;
    use crate::http::HttpMethod;

    fn config() -> ClientConfig {
        ClientConfig::new("tok").with_base_url("https://api.example.com/2.0")
    }

    #[test]
    fn get_sheet_with_query() {
        let config = config();
        let endpoint = EndpointDescriptor::new(HttpMethod::Get, "sheets/{sheet_id}");
        let call = CallDescriptor::new().path_value("sheet_id", 42).query("include", "discussions");
        let req = RequestBuilder::new(&config).build(&endpoint, call).unwrap();

        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.url.ends_with("/sheets/42"));
        assert_eq!(req.query, vec![("include".to_string(), "discussions".to_string())]);
        assert!(req.body.is_absent());
    }

    #[test]
    fn json_body_passes_through_unserialized() {
        let config = config();
        let endpoint = EndpointDescriptor::new(HttpMethod::Post, "sheets").with_body(BodyStrategy::Json);
        let body = json!({"name": "x"});
        let req = RequestBuilder::new(&config)
            .build(&endpoint, CallDescriptor::new().body(body.clone()))
            .unwrap();
        assert_eq!(req.body.as_json(), Some(&body));
    }

    #[test]
    fn json_strategy_without_body_stays_absent() {
        let config = config();
        let endpoint = EndpointDescriptor::new(HttpMethod::Post, "sheets/{sheet_id}/copy").with_body(BodyStrategy::Json);
        let req = RequestBuilder::new(&config)
            .build(&endpoint, CallDescriptor::new().path_value("sheet_id", 1))
            .unwrap();
        assert!(req.body.is_absent());
    }

    #[test]
    fn none_strategy_ignores_supplied_body_and_file() {
        let config = config();
        let endpoint = EndpointDescriptor::new(HttpMethod::Delete, "sheets/{sheet_id}");
        let call = CallDescriptor::new()
            .path_value("sheet_id", 9)
            .body(json!({"ignored": true}))
            .file(FileSpec::from_path("/missing.csv", CSV_TYPE));
        let req = RequestBuilder::new(&config).build(&endpoint, call).unwrap();
        assert!(req.body.is_absent());
        assert!(!req.headers.contains("content-type"));
    }

    #[test]
    fn file_strategy_streams_spec_content() {
        let config = config();
        let endpoint = EndpointDescriptor::new(HttpMethod::Post, "sheets/import").with_body(BodyStrategy::File);
        let call = CallDescriptor::new()
            .query("sheetName", "Imported")
            .file(FileSpec::from_reader(Cursor::new(b"a,b\n1,2\n".to_vec()), 8, CSV_TYPE));
        let req = RequestBuilder::new(&config).build(&endpoint, call).unwrap();

        assert_eq!(req.headers.get("content-type"), Some(CSV_TYPE));
        assert_eq!(req.headers.get("content-length"), Some("8"));
        match req.body {
            RequestBody::Stream(mut stream) => {
                let mut out = String::new();
                stream.read_to_string(&mut out).unwrap();
                assert_eq!(out, "a,b\n1,2\n");
            }
            other => panic!("expected stream body, got {other:?}"),
        }
    }

    #[test]
    fn file_strategy_surfaces_missing_path_at_build_time() {
        let config = config();
        let endpoint = EndpointDescriptor::new(HttpMethod::Post, "sheets/import").with_body(BodyStrategy::File);
        let call = CallDescriptor::new().file(FileSpec::from_path("/nope/data.csv", CSV_TYPE));
        let err = RequestBuilder::new(&config).build(&endpoint, call).unwrap_err();
        assert!(matches!(err, ApiError::FileNotFound { .. }));
    }

    #[test]
    fn missing_path_value_aborts_before_headers() {
        let config = config();
        let endpoint = EndpointDescriptor::new(HttpMethod::Get, "sheets/{sheet_id}");
        let mut req = Request::new(HttpMethod::Get);
        let err = RequestBuilder::new(&config)
            .apply(&endpoint, CallDescriptor::new(), &mut req)
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingPathValue { .. }));
        assert!(req.headers.is_empty());
    }

    #[test]
    fn export_accept_header_reaches_request() {
        let config = config();
        let endpoint = EndpointDescriptor::new(HttpMethod::Get, "sheets/{sheet_id}").with_header("Accept", EXCEL_TYPE);
        let req = RequestBuilder::new(&config)
            .build(&endpoint, CallDescriptor::new().path_value("sheet_id", 3))
            .unwrap();
        assert_eq!(req.headers.get("accept"), Some(EXCEL_TYPE));
    }
}
