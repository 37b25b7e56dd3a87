use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use tracing::debug;

use crate::error::Error;
use crate::options::{RequestOptions, TlsPolicy};

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One GET to issue: target, headers, and the hash prefix used to tag
/// diagnostics without exposing the full hash.
#[derive(Debug, Clone, Copy)]
pub struct LookupRequest<'a> {
    pub url: &'a str,
    pub headers: &'a HeaderMap,
    pub prefix: &'a str,
}

/// Performs a single GET against the lookup service.
///
/// Implementations must issue exactly one request per call and must not
/// retry or cache. A response with any status code is returned as
/// `Ok`; only failures to obtain a response are errors.
pub trait Transport {
    fn get(&self, request: &LookupRequest<'_>) -> Result<RawResponse, Error>;
}

/// [`Transport`] backed by a blocking reqwest client configured from
/// [`RequestOptions`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds the underlying client with the timeouts, TLS policy and proxy from
    /// `options`. Headers are not baked in; they travel with each request.
    pub fn new(options: &RequestOptions) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .timeout(options.read_timeout)
            .danger_accept_invalid_certs(options.tls == TlsPolicy::AcceptInvalidCerts);

        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        if let Some(proxy) = &options.proxy {
            let proxy = reqwest::Proxy::all(proxy).map_err(|source| Error::Client { source })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|source| Error::Client { source })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, request: &LookupRequest<'_>) -> Result<RawResponse, Error> {
        let prefix = request.prefix;

        let response = self
            .client
            .get(request.url)
            .headers(request.headers.clone())
            .send()
            .map_err(|source| transport_error(prefix, source))?;

        let status = response.status().as_u16();
        debug!(prefix, status, "lookup response received");

        // The body is read even for failures so the API error can carry the
        // service's own message.
        let body = response.text().map_err(|source| transport_error(prefix, source))?;

        Ok(RawResponse { status, body })
    }
}

fn transport_error(prefix: &str, source: reqwest::Error) -> Error {
    debug!(prefix, timeout = source.is_timeout(), connect = source.is_connect(), "lookup request failed");
    Error::Transport { prefix: prefix.to_string(), source }
}
