use std::net::TcpListener;

use hibp_lookup::{Error, Probe};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Base URL (with trailing `/range/`) for a running mock server.
pub fn base_url(server: &MockServer) -> String {
    format!("{}/range/", server.uri())
}

/// Answers `GET /range/{hash}` with `response`, expecting exactly `times` hits.
pub async fn mount_lookup(server: &MockServer, hash: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/range/{}", hash)))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

/// Runs the blocking lookup off the async test runtime.
pub async fn check(probe: Probe) -> Result<u64, Error> {
    tokio::task::spawn_blocking(move || probe.check()).await.unwrap()
}

/// A local address nothing is listening on.
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/range/", addr)
}
