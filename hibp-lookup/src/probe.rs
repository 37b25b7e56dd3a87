use reqwest::header::HeaderMap;
use tracing::{debug, warn};

use crate::client::{HttpTransport, LookupRequest, Transport};
use crate::error::Error;
use crate::hash::{hash_prefix, normalize_hash, sha1_hex};
use crate::options::RequestOptions;
use crate::response::parse_count;

/// A single password or hash check, ready to be sent to the lookup service.
///
/// The probe is immutable: it holds the normalized hash, the merged request
/// headers and the transport options. Caller headers are folded into
/// [`headers`](Self::headers) on construction and are not kept a second time in
/// [`options`](Self::options). It may be checked any number of times; every
/// check is a fresh request.
#[derive(Debug, Clone)]
pub struct Probe {
    hash: String,
    headers: HeaderMap,
    options: RequestOptions,
}

impl Probe {
    /// Creates a probe for an already hashed password.
    ///
    /// The hash is uppercased. Fails with [`Error::InvalidHash`] if it is empty
    /// or not hex, and with [`Error::InvalidHeader`] if a caller header cannot
    /// be sent over HTTP.
    ///
    /// ```
    /// use hibp_lookup::{Probe, RequestOptions};
    ///
    /// let options = RequestOptions::default().header("User-Agent", "My user agent");
    /// let probe = Probe::new("cbfdac6008f9cab4083784cbd1874f76618d2a97", options).unwrap();
    /// assert_eq!(probe.hash(), "CBFDAC6008F9CAB4083784CBD1874F76618D2A97");
    /// assert_eq!(probe.headers()["user-agent"], "My user agent");
    /// ```
    pub fn new(hash: impl AsRef<str>, mut options: RequestOptions) -> Result<Self, Error> {
        let hash = normalize_hash(hash.as_ref())?;
        let headers = options.merged_headers()?;
        options.headers.clear();
        Ok(Self { hash, headers, options })
    }

    /// Creates a probe for a plaintext password by hashing it with SHA-1.
    ///
    /// The password itself is not retained.
    pub fn from_password(password: &str, options: RequestOptions) -> Result<Self, Error> {
        Self::new(sha1_hex(password), options)
    }

    /// Canonical (uppercase) hash.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Default headers merged with the caller's overrides.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Transport options. The `headers` list is always empty here; see
    /// [`headers`](Self::headers) for what is sent.
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Request target: the configured base URL followed by the hash.
    pub fn url(&self) -> String {
        format!("{}{}", self.options.base_url, self.hash)
    }

    /// Looks the hash up and returns how many times it has been seen in breaches.
    ///
    /// Performs exactly one blocking HTTP request. A response without an entry
    /// for the hash yields `Ok(0)`.
    pub fn check(&self) -> Result<u64, Error> {
        let transport = HttpTransport::new(&self.options)?;
        self.check_with(&transport)
    }

    /// Same as [`check`](Self::check), over a caller-provided transport.
    pub fn check_with<T: Transport + ?Sized>(&self, transport: &T) -> Result<u64, Error> {
        let prefix = hash_prefix(&self.hash);
        debug!(base_url = %self.options.base_url, prefix, "looking up hash");

        let url = self.url();
        let request = LookupRequest { url: &url, headers: &self.headers, prefix };
        let response = transport.get(&request)?;

        if !response.is_success() {
            warn!(prefix, status = response.status, "lookup service returned an error status");
            return Err(Error::Api {
                prefix: prefix.to_string(),
                status: response.status,
                message: error_message(&response.body),
            });
        }

        parse_count(&response.body, &self.hash)
    }

    /// True if the hash has been seen in at least one breach.
    pub fn is_pwned(&self) -> Result<bool, Error> {
        Ok(self.check()? > 0)
    }

    /// Runs [`check`](Self::check) on tokio's blocking pool.
    #[cfg(feature = "tokio")]
    pub async fn check_async(&self) -> Result<u64, Error> {
        let probe = self.clone();
        tokio::task::spawn_blocking(move || probe.check()).await?
    }
}

/// First line of an error body, bounded so a full HTML error page does not end
/// up in the error message.
fn error_message(body: &str) -> String {
    const MAX_LEN: usize = 200;

    let line = body.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    match line.char_indices().nth(MAX_LEN) {
        Some((idx, _)) => format!("{}...", &line[..idx]),
        None => line.to_string(),
    }
}
