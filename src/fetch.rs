//! Spec retrieval from a running Directus instance.
//!
//! Issues a single authenticated GET against `{host}/server/specs/oas` and
//! returns the parsed JSON document.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Error;

/// Path of the OpenAPI document relative to the Directus host.
pub const SPEC_PATH: &str = "/server/specs/oas";

/// Anything that can produce an OpenAPI document.
pub trait SpecSource {
    fn fetch(&self) -> Result<Value, Error>;
}

/// Fetches the spec over HTTP with bearer-token auth.
pub struct HttpSpecSource {
    client: Client,
    url: String,
    token: String,
}

impl HttpSpecSource {
    pub fn new(host: &str, token: &str, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::ClientBuild)?;
        Ok(Self {
            client,
            url: spec_url(host),
            token: token.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(&config.host, &config.token, config.timeout)
    }}

impl fmt::Debug for HttpSpecSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSpecSource")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl SpecSource for HttpSpecSource {
    fn fetch(&self) -> Result<Value, Error> {
        info!(url = %self.url, "fetching OpenAPI spec");
        let req = self.client.get(&self.url).bearer_auth(&self.token);
        send_request(req)
    }
}

fn spec_url(host: &str) -> String {
    format!("{}{}", host.trim_end_matches('/'), SPEC_PATH)
}

fn send_request(req: reqwest::blocking::RequestBuilder) -> Result<Value, Error> {
    let resp = req.send().map_err(Error::RequestFailed)?;
    let status = resp.status();
    let text = resp.text().map_err(Error::ResponseRead)?;

    if !status.is_success() {
        return Err(Error::HttpStatus { status, body: text });
    }
    debug!(%status, bytes = text.len(), "spec received");

    let value: Value = serde_json::from_str(&text).map_err(Error::InvalidSpec)?;
    if !value.is_object() {
        return Err(Error::SpecNotObject);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source_for(server: &mockito::Server, token: &str) -> HttpSpecSource {
        HttpSpecSource::new(&server.url(), token, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn spec_url_appends_path_and_trims_slashes() {
        assert_eq!(
            spec_url("http://test.com/"),
            "http://test.com/server/specs/oas"
        );
        assert_eq!(
            spec_url("http://test.com"),
            "http://test.com/server/specs/oas"
        );
    }

    #[test]
    fn fetch_sends_bearer_token_and_parses_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/server/specs/oas")
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"openapi":"3.0.1","info":{"title":"Dynamic API","version":"10.0.0"},"paths":{}}"#)
            .create();

        let spec = source_for(&server, "test-token").fetch().unwrap();
        assert_eq!(spec["openapi"], "3.0.1");
        assert_eq!(spec["paths"], json!({}));
        mock.assert();
    }

    #[test]
    fn fetch_preserves_key_order() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/server/specs/oas")
            .with_status(200)
            .with_body(r#"{"components":{"schemas":{"Zeta":{},"Alpha":{},"Mid":{}}}}"#)
            .create();

        let spec = source_for(&server, "t").fetch().unwrap();
        let keys: Vec<&String> = spec["components"]["schemas"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys, ["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn fetch_returns_error_on_non_success_status() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/server/specs/oas")
            .with_status(401)
            .with_body("API Error")
            .create();

        let err = source_for(&server, "bad").fetch().unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, Error::HttpStatus { .. }));
        assert!(msg.contains("401"), "got: {msg}");
        assert!(msg.contains("API Error"), "got: {msg}");
    }

    #[test]
    fn fetch_rejects_non_json_body() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/server/specs/oas")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html>maintenance</html>")
            .create();

        let err = source_for(&server, "t").fetch().unwrap_err();
        assert!(matches!(err, Error::InvalidSpec(_)), "got: {err}");
    }

    #[test]
    fn fetch_rejects_non_object_json() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/server/specs/oas")
            .with_status(200)
            .with_body("[1, 2, 3]")
            .create();

        let err = source_for(&server, "t").fetch().unwrap_err();
        assert!(matches!(err, Error::SpecNotObject));
    }

    #[test]
    fn fetch_reports_connection_failure() {
        // Nothing listens on the discard port.
        let source =
            HttpSpecSource::new("http://127.0.0.1:9", "t", Duration::from_secs(2)).unwrap();
        let err = source.fetch().unwrap_err();
        assert!(matches!(err, Error::RequestFailed(_)), "got: {err}");
    }

    #[test]
    fn debug_output_hides_token() {
        let source =
            HttpSpecSource::new("http://localhost:8055/", "s3cret", Duration::from_secs(1)).unwrap();
        let debug = format!("{source:?}");
        assert!(debug.contains("http://localhost:8055/server/specs/oas"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn fetch_times_out_on_silent_server() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold the connection without ever answering.
        let _hold = std::thread::spawn(move || {
            let conn = listener.accept();
            std::thread::sleep(Duration::from_secs(10));
            drop(conn);
        });

        let source =
            HttpSpecSource::new(&format!("http://{addr}"), "t", Duration::from_secs(1)).unwrap();
        let started = std::time::Instant::now();
        let err = source.fetch().unwrap_err();

        assert!(matches!(err, Error::RequestFailed(_)), "got: {err}");
        assert!(started.elapsed() < Duration::from_secs(5), "took {:?}", started.elapsed());
    }
}
