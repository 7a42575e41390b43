//! Request logging collaborators.
//!
//! # Design
//! The client hands every fully built request to a `RequestLogger` just
//! before dispatch. Loggers observe only: they get a shared reference and
//! must return promptly. The default logs nothing.

use tracing::debug;

use crate::http::{Request, RequestBody};

/// Observer invoked with each request before it reaches the transport.
pub trait RequestLogger: Send + Sync {
    fn log_request(&self, request: &Request);
}

/// Logs nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct MuteRequestLogger;

impl RequestLogger for MuteRequestLogger {
    fn log_request(&self, _request: &Request) {}
}

/// Emits one `debug` event per request through `tracing`.
///
/// Credentials in `Authorization` are masked down to their last four
/// characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRequestLogger;

impl RequestLogger for TracingRequestLogger {
    fn log_request(&self, request: &Request) {
        let headers = request
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    format!("{name}: {}", censor_authorization(value))
                } else {
                    format!("{name}: {value}")
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let body = match &request.body {
            RequestBody::Absent => "none".to_string(),
            RequestBody::Json(value) => value.to_string(),
            RequestBody::Stream(_) => match request.headers.get("content-length") {
                Some(len) => format!("<file stream, {len} bytes>"),
                None => "<file stream>".to_string(),
            },
        };
        debug!(
            method = %request.method,
            url = %request.full_url(),
            headers = %headers,
            body = %body,
            "sending request"
        );
    }
}

/// Mask all but the last four characters of a credential.
pub fn censor(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let keep = chars.len().saturating_sub(4);
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i < keep { '*' } else { *c })
        .collect()
}

fn censor_authorization(value: &str) -> String {
    match value.split_once(' ') {
        Some((scheme, token)) => format!("{scheme} {}", censor(token)),
        None => censor(value),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;
    use crate::http::HttpMethod;

    fn request() -> Request {
        let mut req = Request::new(HttpMethod::Post);
        req.url = "https://api.example.com/2.0/sheets".to_string();
        req.headers.insert("Authorization", "Bearer abcdefgh1234");
        req.headers.insert("Accept", "application/json");
        req.query.push(("include".to_string(), "discussions".to_string()));
        req.body = RequestBody::Json(json!({"name": "Budget"}));
        req
    }

    #[test]
    fn censor_keeps_last_four() {
        assert_eq!(censor("abcdefgh1234"), "********1234");
        assert_eq!(censor("abc"), "abc");
        assert_eq!(censor(""), "");
    }

    #[test]
    fn censor_authorization_keeps_scheme() {
        assert_eq!(censor_authorization("Bearer abcdefgh1234"), "Bearer ********1234");
    }

    #[test]
    #[traced_test]
    fn tracing_logger_masks_token() {
        TracingRequestLogger.log_request(&request());
        assert!(logs_contain("sending request"));
        assert!(logs_contain("POST"));
        assert!(logs_contain("include=discussions"));
        assert!(logs_contain("Budget"));
        assert!(logs_contain("********1234"));
        assert!(!logs_contain("abcdefgh1234"));
    }

    #[test]
    #[traced_test]
    fn tracing_logger_summarizes_streams() {
        let mut req = request();
        req.headers.insert("Content-Length", "42");
        req.body = RequestBody::Stream(Box::new(std::io::empty()));
        TracingRequestLogger.log_request(&req);
        assert!(logs_contain("<file stream, 42 bytes>"));
    }

    #[test]
    #[traced_test]
    fn mute_logger_is_silent() {
        MuteRequestLogger.log_request(&request());
        assert!(!logs_contain("sending request"));
    }
}
