//! Composition root: endpoint + call in, transport response out.
//!
//! # Design
//! `RequestClient` holds only read-only configuration and its collaborators.
//! Each `make_request` builds a fresh `Request`, shows it to the logger, and
//! moves it into the transport. The transport owns the network round-trip
//! and whatever concurrency, retries or timeouts it wants; its result is
//! returned untouched.

use tracing::instrument;

use crate::builder::RequestBuilder;
use crate::call::CallDescriptor;
use crate::config::ClientConfig;
use crate::endpoint::EndpointDescriptor;
use crate::error::ApiError;
use crate::http::{HttpResponse, Request};
use crate::logger::{MuteRequestLogger, RequestLogger};

/// Executes a fully built request.
pub trait Transport {
    fn execute(&self, request: Request) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: Fn(Request) -> Result<HttpResponse, ApiError>,
{
    fn execute(&self, request: Request) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

/// Stateless client that turns endpoint and call descriptors into requests.
///
/// Safe to share across threads whenever the transport is.
pub struct RequestClient<T> {
    config: ClientConfig,
    transport: T,
    logger: Box<dyn RequestLogger>,
}

impl<T: Transport> RequestClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            logger: Box::new(MuteRequestLogger),
        }
    }

    pub fn with_logger(mut self, logger: impl RequestLogger + 'static) -> Self {
        self.logger = Box::new(logger);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the request described by `endpoint` and `call`, log it, and
    /// dispatch it through the transport.
    #[instrument(
        name = "make_request",
        skip_all,
        fields(http.method = %endpoint.method())
    )]
    pub fn make_request(&self, endpoint: &EndpointDescriptor, call: CallDescriptor) -> Result<HttpResponse, ApiError> {
        let mut request = Request::new(endpoint.method());
        RequestBuilder::new(&self.config).apply(endpoint, call, &mut request)?;
        self.logger.log_request(&request);
        self.transport.execute(request)
    }
}
