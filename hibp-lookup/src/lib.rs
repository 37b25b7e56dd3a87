//! Blocking client for the Have I Been Pwned password lookup service.
//!
//! A [`Probe`] wraps a SHA-1 hash (or a plaintext password, hashed on
//! construction) together with the request options. Calling
//! [`Probe::check`] issues a single HTTP GET to the lookup service and
//! returns how many times the hash has been seen in known breaches, with `0`
//! meaning it was not found.
//!
//! There is no caching and no retrying: every check is exactly one request,
//! and every failure is returned to the caller as an [`Error`] that tells
//! connection problems, error statuses and unreadable bodies apart.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use hibp_lookup::{Probe, RequestOptions};
//!
//! let options = RequestOptions::default()
//!     .header("User-Agent", "my-signup-service")
//!     .read_timeout(Some(Duration::from_secs(10)));
//!
//! let probe = Probe::from_password("password123", options)?;
//! if probe.check()? > 0 {
//!     println!("choose a different password");
//! }
//! # Ok::<(), hibp_lookup::Error>(())
//! ```
//!
//! Options can also be taken from the `HIBP_*` environment variables with
//! [`RequestOptions::from_env`].

pub mod client;
pub mod error;
pub mod hash;
pub mod options;
pub mod probe;
pub mod response;

pub use client::{HttpTransport, LookupRequest, RawResponse, Transport};
pub use error::Error;
pub use hash::{normalize_hash, sha1_hex};
pub use options::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, RequestOptions, TlsPolicy};
pub use probe::Probe;
pub use response::parse_count;

/// Number of breaches `password` appears in, using the default options.
pub fn pwned_count(password: &str) -> Result<u64, Error> {
    Probe::from_password(password, RequestOptions::default())?.check()
}

/// Whether `password` appears in any breach, using the default options.
pub fn is_pwned(password: &str) -> Result<bool, Error> {
    Ok(pwned_count(password)? > 0)
}
