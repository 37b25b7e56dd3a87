use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};

use crate::error::Error;

/// Default lookup endpoint. The normalized hash is appended to it verbatim.
pub const DEFAULT_BASE_URL: &str = "https://api.pwnedpasswords.com/range/";

/// User agent sent unless the caller overrides `User-Agent`.
pub const DEFAULT_USER_AGENT: &str = concat!("hibp-lookup/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable overriding [`RequestOptions::base_url`].
pub const HIBP_BASE_URL_ENV: &str = "HIBP_BASE_URL";
/// Environment variable adding a `User-Agent` override.
pub const HIBP_USER_AGENT_ENV: &str = "HIBP_USER_AGENT";
/// Environment variable for the read timeout in seconds (`0` disables it).
pub const HIBP_READ_TIMEOUT_ENV: &str = "HIBP_READ_TIMEOUT_SECS";
/// Environment variable for the connect timeout in seconds (`0` disables it).
pub const HIBP_CONNECT_TIMEOUT_ENV: &str = "HIBP_CONNECT_TIMEOUT_SECS";
/// Environment variable holding a proxy URL.
pub const HIBP_PROXY_ENV: &str = "HIBP_PROXY";
/// Environment variable that disables certificate verification when `1` or `true`.
pub const HIBP_ACCEPT_INVALID_CERTS_ENV: &str = "HIBP_ACCEPT_INVALID_CERTS";

/// Certificate verification policy handed to the HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsPolicy {
    #[default]
    Verify,
    /// Skip certificate verification. Only meant for test doubles of the service.
    AcceptInvalidCerts,
}

/// Request settings for a probe.
///
/// Every field has a documented default; the builder methods override one
/// field at a time. Headers listed here are merged over the default header set
/// when a [`Probe`](crate::Probe) is built, with the caller's value winning on
/// a (case-insensitive) name collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub read_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub tls: TlsPolicy,
    pub proxy: Option<String>,
    pub base_url: String,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            tls: TlsPolicy::Verify,
            proxy: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl RequestOptions {
    /// Defaults overlaid with the `HIBP_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_vars(|var| std::env::var(var).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(url) = lookup(HIBP_BASE_URL_ENV) {
            options.base_url = url;
        }
        if let Some(agent) = lookup(HIBP_USER_AGENT_ENV) {
            options = options.header(USER_AGENT.as_str(), agent);
        }
        if let Some(value) = lookup(HIBP_READ_TIMEOUT_ENV) {
            options.read_timeout = parse_timeout(HIBP_READ_TIMEOUT_ENV, value)?;
        }
        if let Some(value) = lookup(HIBP_CONNECT_TIMEOUT_ENV) {
            options.connect_timeout = parse_timeout(HIBP_CONNECT_TIMEOUT_ENV, value)?;
        }
        if let Some(proxy) = lookup(HIBP_PROXY_ENV).filter(|p| !p.is_empty()) {
            options.proxy = Some(proxy);
        }
        if let Some(value) = lookup(HIBP_ACCEPT_INVALID_CERTS_ENV) {
            options.tls = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => TlsPolicy::AcceptInvalidCerts,
                "0" | "false" | "" => TlsPolicy::Verify,
                _ => return Err(Error::Config { var: HIBP_ACCEPT_INVALID_CERTS_ENV, value }),
            };
        }

        Ok(options)
    }

    /// Sets a header, replacing any earlier one of the same (case-insensitive) name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.trim().eq_ignore_ascii_case(name.trim()));
        self.headers.push((name, value.into()));
        self
    }

    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn tls(mut self, tls: TlsPolicy) -> Self {
        self.tls = tls;
        self
    }

    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Default headers with the caller's headers applied on top.
    ///
    /// Headers behave as a mapping: a caller header replaces the default of the
    /// same name, and a later caller header replaces an earlier one.
    pub fn merged_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = default_headers();

        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.trim().as_bytes())
                .map_err(|_| Error::InvalidHeader { name: name.clone() })?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| Error::InvalidHeader { name: name.clone() })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }
}

/// Headers sent with every request unless overridden.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers
}

fn parse_timeout(var: &'static str, value: String) -> Result<Option<Duration>, Error> {
    match value.trim().parse::<f64>() {
        Ok(secs) if secs == 0.0 => Ok(None),
        Ok(secs) if secs.is_finite() && secs > 0.0 => Ok(Some(Duration::from_secs_f64(secs))),
        _ => Err(Error::Config { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let options = RequestOptions::default();
        assert!(options.headers.is_empty());
        assert_eq!(options.read_timeout, Some(Duration::from_secs(60)));
        assert_eq!(options.connect_timeout, Some(Duration::from_secs(10)));
        assert_eq!(options.tls, TlsPolicy::Verify);
        assert_eq!(options.proxy, None);
        assert_eq!(options.base_url, "https://api.pwnedpasswords.com/range/");
    }

    #[test]
    fn test_default_user_agent_present() {
        let headers = RequestOptions::default().merged_headers().unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[USER_AGENT], DEFAULT_USER_AGENT);
        assert!(DEFAULT_USER_AGENT.starts_with("hibp-lookup/"));
    }

    #[test]
    fn test_caller_header_wins() {
        let headers = RequestOptions::default()
            .header("user-agent", "My user agent")
            .merged_headers()
            .unwrap();

        let agents: Vec<_> = headers.get_all(USER_AGENT).iter().collect();
        assert_eq!(agents, vec!["My user agent"]);
    }

    #[test]
    fn test_extra_headers_pass_through() {
        let headers = RequestOptions::default()
            .header("Add-Padding", "true")
            .header("X-Trace", "a")
            .merged_headers()
            .unwrap();

        assert_eq!(headers.len(), 3);
        assert_eq!(headers[USER_AGENT], DEFAULT_USER_AGENT);
        assert_eq!(headers["add-padding"], "true");
        assert_eq!(headers["x-trace"], "a");
    }

    #[test]
    fn test_later_header_replaces_earlier() {
        let options = RequestOptions::default().header("X-Trace", "a").header("x-trace", "b");
        assert_eq!(options.headers, vec![("x-trace".to_string(), "b".to_string())]);

        let headers = options.merged_headers().unwrap();
        let traces: Vec<_> = headers.get_all("x-trace").iter().collect();
        assert_eq!(traces, vec!["b"]);
    }

    #[test]
    fn test_caller_user_agent_replaces_env_user_agent() {
        let headers = RequestOptions::from_vars(vars(&[(HIBP_USER_AGENT_ENV, "env-agent")]))
            .unwrap()
            .header("User-Agent", "flag-agent")
            .merged_headers()
            .unwrap();

        let agents: Vec<_> = headers.get_all(USER_AGENT).iter().collect();
        assert_eq!(agents, vec!["flag-agent"]);
    }

    #[test]
    fn test_duplicate_names_in_raw_list_collapse() {
        let options = RequestOptions {
            headers: vec![
                ("User-Agent".to_string(), "first".to_string()),
                ("user-agent".to_string(), "second".to_string()),
            ],
            ..RequestOptions::default()
        };

        let agents: Vec<_> =
            options.merged_headers().unwrap().get_all(USER_AGENT).iter().cloned().collect();
        assert_eq!(agents, vec!["second"]);
    }

    #[test]
    fn test_invalid_header_rejected() {
        let err = RequestOptions::default().header("bad name", "x").merged_headers().unwrap_err();
        assert!(matches!(err, Error::InvalidHeader { ref name } if name == "bad name"));

        let err = RequestOptions::default().header("X-Ok", "line\nbreak").merged_headers();
        assert!(err.unwrap_err().is_input());
    }

    #[test]
    fn test_from_vars_empty_is_default() {
        let options = RequestOptions::from_vars(vars(&[])).unwrap();
        assert_eq!(options, RequestOptions::default());
    }

    #[test]
    fn test_from_vars_overrides() {
        let options = RequestOptions::from_vars(vars(&[
            (HIBP_BASE_URL_ENV, "http://127.0.0.1:8080/hash/"),
            (HIBP_USER_AGENT_ENV, "probe-tests"),
            (HIBP_READ_TIMEOUT_ENV, "2.5"),
            (HIBP_CONNECT_TIMEOUT_ENV, "0"),
            (HIBP_PROXY_ENV, "http://proxy.local:3128"),
            (HIBP_ACCEPT_INVALID_CERTS_ENV, "true"),
        ]))
        .unwrap();

        assert_eq!(options.base_url, "http://127.0.0.1:8080/hash/");
        assert_eq!(options.headers, vec![("user-agent".to_string(), "probe-tests".to_string())]);
        assert_eq!(options.read_timeout, Some(Duration::from_millis(2500)));
        assert_eq!(options.connect_timeout, None);
        assert_eq!(options.proxy.as_deref(), Some("http://proxy.local:3128"));
        assert_eq!(options.tls, TlsPolicy::AcceptInvalidCerts);
    }

    #[test]
    fn test_from_vars_bad_timeout() {
        let err = RequestOptions::from_vars(vars(&[(HIBP_READ_TIMEOUT_ENV, "soon")])).unwrap_err();
        assert!(matches!(err, Error::Config { var: HIBP_READ_TIMEOUT_ENV, .. }));

        let err = RequestOptions::from_vars(vars(&[(HIBP_CONNECT_TIMEOUT_ENV, "-1")])).unwrap_err();
        assert!(matches!(err, Error::Config { var: HIBP_CONNECT_TIMEOUT_ENV, .. }));
    }

    #[test]
    fn test_from_vars_bad_tls_flag() {
        let err =
            RequestOptions::from_vars(vars(&[(HIBP_ACCEPT_INVALID_CERTS_ENV, "maybe")])).unwrap_err();
        assert!(matches!(err, Error::Config { var: HIBP_ACCEPT_INVALID_CERTS_ENV, .. }));
    }
}
