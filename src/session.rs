/// Transport session shared by the discovery and monitoring components.
///
/// Wraps a pooled `reqwest` blocking client together with a closed flag.
/// Clones share the same pool and the same flag, so a session handed to
/// several clients is closed for all of them at once.

use crate::model::{Result, VigicruesError};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
struct SessionInner {
    client: reqwest::blocking::Client,
    timeout: Option<Duration>,
    closed: AtomicBool,
}

/// Closable handle to a pooled HTTP client.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Creates a session whose requests fail with
    /// [`VigicruesError::Timeout`] once `timeout` has elapsed.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vigicrues/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VigicruesError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::wrap(client, Some(timeout)))
    }

    /// Adopts an already configured client.
    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self::wrap(client, None)
    }

    fn wrap(client: reqwest::blocking::Client, timeout: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                client,
                timeout,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Timeout the session was built with, if it built its own client.
    pub fn timeout(&self) -> Option<Duration> {
        self.inner.timeout
    }

    /// Marks the session closed. Further requests fail with a
    /// precondition error. Idempotent.
    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            debug!("HTTP session closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Issues a GET, fails on non-2xx status and decodes the JSON body
    /// into `T`.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        if self.is_closed() {
            return Err(VigicruesError::Precondition("Session is closed".to_string()));
        }

        debug!(url, "GET");

        let response = self
            .inner
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(VigicruesError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text()?;
        let decoded = serde_json::from_str(&body)?;
        Ok(decoded)
    }
}

/// Appends percent-encoded query parameters to `base`.
pub fn build_url(base: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return base.to_string();
    }

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, query)
}

/// Resolves the session of a component, or the precondition error every
/// operation reports when none was configured.
pub(crate) fn require(session: Option<&Session>) -> Result<&Session> {
    session.ok_or_else(|| VigicruesError::Precondition("Session is not initialized".to_string()))
}
