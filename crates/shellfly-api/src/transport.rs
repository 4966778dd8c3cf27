// Shared HTTP plumbing for both device dialects.
//
// The Gen1 and Gen2 clients share address normalization, Basic-auth
// attachment, TLS handling, and status-to-error classification through
// this module, avoiding duplicated builder logic.

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Default per-request timeout for regular device calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Hard deadline for a single generation-detection probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Basic-auth credentials for a device.
///
/// An empty username means "send no credentials at all", even when a
/// password is configured — some devices reject any `Authorization`
/// header, so the header is attached only when the username is set.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: SecretString::from(String::new()),
        }
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Whether these credentials should be attached to requests.
    pub fn is_enabled(&self) -> bool {
        !self.username.is_empty()
    }
}

/// Transport tuning shared by both dialect clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout applied by the underlying client.
    pub timeout: Duration,
    /// Accept invalid TLS certificates (devices serve self-signed HTTPS).
    pub insecure: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            insecure: false,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("shellfly/0.1.0");

        if self.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().map_err(|e| Error::ConnectionFailed {
            reason: format!("failed to build HTTP client: {e}"),
        })
    }
}

/// Normalize a user-supplied device address into a base URL.
///
/// Bare `host[:port]` addresses get an `http://` scheme prepended.
pub fn normalize_address(address: &str) -> Result<Url, Error> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(Error::ConnectionFailed {
            reason: "empty device address".into(),
        });
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("http://{trimmed}")
    };

    Ok(Url::parse(&candidate)?)
}

/// Authenticated HTTP transport for one device.
///
/// Owns the `reqwest::Client` (and therefore its keep-alive pool);
/// dropping the transport releases the connections. Safe for concurrent
/// use — the scheduler, operator actuations, and ad-hoc fetches all
/// share one transport per device.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base: Url,
    credentials: Option<Credentials>,
}

impl HttpTransport {
    /// Build a transport for `address` with optional Basic-auth credentials.
    pub fn new(
        address: &str,
        credentials: Option<Credentials>,
        config: &TransportConfig,
    ) -> Result<Self, Error> {
        let base = normalize_address(address)?;
        let http = config.build_client()?;
        Ok(Self {
            http,
            base,
            credentials,
        })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some(creds) if creds.is_enabled() => req.basic_auth(
                &creds.username,
                Some(creds.password.expose_secret().to_owned()),
            ),
            _ => req,
        }
    }

    /// `GET {base}/{path}?{query}`, returning the raw body on 2xx.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>, Error> {
        let url = self.url(path)?;
        debug!("GET {url} query={query:?}");

        let mut req = self.http.get(url);
        if !query.is_empty() {
            req = req.query(query);
        }
        self.send(self.apply_auth(req)).await
    }

    /// Same as [`get`](Self::get) but under an explicit deadline.
    ///
    /// Used by detection probes, whose deadline (5 s) is tighter than
    /// the transport's own timeout.
    pub async fn get_with_deadline(
        &self,
        path: &str,
        query: &[(&str, String)],
        deadline: Duration,
    ) -> Result<Vec<u8>, Error> {
        tokio::time::timeout(deadline, self.get(path, query))
            .await
            .map_err(|_| Error::Timeout)?
    }

    /// `POST {base}/{path}` with a JSON body, returning the raw body on 2xx.
    pub async fn post_json<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let req = self.http.post(url).json(body);
        self.send(self.apply_auth(req)).await
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Vec<u8>, Error> {
        let resp = req.send().await.map_err(classify_transport)?;
        let status = resp.status();

        // The body is always read to completion, even on error paths,
        // so keep-alive connections are returned to the pool.
        let body = resp.bytes().await.map_err(classify_transport)?;

        if status.is_success() {
            Ok(body.to_vec())
        } else {
            Err(status_error(status))
        }
    }
}

fn status_error(status: StatusCode) -> Error {
    Error::from_status(status)
}

/// Map low-level reqwest failures onto the shared taxonomy.
fn classify_transport(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else if e.is_connect() {
        Error::ConnectionFailed {
            reason: e.to_string(),
        }
    } else {
        Error::Transport(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_host_gets_http_scheme() {
        let url = normalize_address("192.168.1.50").expect("normalizes");
        assert_eq!(url.as_str(), "http://192.168.1.50/");
    }

    #[test]
    fn host_with_port_is_preserved() {
        let url = normalize_address("shelly-plug.local:8080").expect("normalizes");
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn explicit_scheme_is_untouched() {
        let url = normalize_address("https://10.0.0.7").expect("normalizes");
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn empty_address_fails_fast() {
        let err = normalize_address("  ").expect_err("must fail");
        assert!(matches!(err, Error::ConnectionFailed { .. }));
    }

    #[test]
    fn empty_username_disables_credentials() {
        let creds = Credentials::new("", "secret");
        assert!(!creds.is_enabled());
        assert!(Credentials::new("admin", "secret").is_enabled());
    }
}
