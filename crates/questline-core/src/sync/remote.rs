//! Remote snapshot store client.
//!
//! The remote is opaque storage: `GET` returns `{data, updated_at}`, `POST`
//! accepts `{data}` and returns `{updated_at}`, one slot per domain. The
//! trait seam lets the engine run against an in-memory fake in tests.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::types::{Domain, Snapshot, SyncEnvelope, SyncError};

/// Abstract remote snapshot storage.
pub trait RemoteStore {
    /// Fetch the current remote snapshot for a domain.
    fn fetch(&self, domain: Domain) -> Result<SyncEnvelope, SyncError>;

    /// Store a snapshot, returning the server-assigned timestamp.
    fn publish(&self, domain: Domain, snapshot: &Snapshot) -> Result<DateTime<Utc>, SyncError>;

    /// Fire-and-forget delivery for the unload path. No response is awaited
    /// and failures are swallowed; this is best-effort by design.
    fn send_beacon(&self, domain: Domain, snapshot: &Snapshot);
}

/// HTTP implementation against the platform's snapshot endpoints.
pub struct HttpRemoteStore {
    client: reqwest::blocking::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct PublishResponse {
    updated_at: DateTime<Utc>,
}

impl HttpRemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn state_url(&self, domain: Domain) -> String {
        format!("{}/state/{}", self.base_url, domain.as_str())
    }
}

impl RemoteStore for HttpRemoteStore {
    fn fetch(&self, domain: Domain) -> Result<SyncEnvelope, SyncError> {
        let response = self.client.get(self.state_url(domain)).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::RemoteStatus {
                status: status.as_u16(),
            });
        }
        let envelope: SyncEnvelope = response.json()?;
        if envelope.data.domain != domain {
            return Err(SyncError::MalformedEnvelope(format!(
                "requested {} but envelope carries {}",
                domain.as_str(),
                envelope.data.domain.as_str()
            )));
        }
        Ok(envelope)
    }

    fn publish(&self, domain: Domain, snapshot: &Snapshot) -> Result<DateTime<Utc>, SyncError> {
        let response = self
            .client
            .post(self.state_url(domain))
            .json(&json!({ "data": snapshot }))
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::RemoteStatus {
                status: status.as_u16(),
            });
        }
        let ack: PublishResponse = response.json()?;
        Ok(ack.updated_at)
    }

    fn send_beacon(&self, domain: Domain, snapshot: &Snapshot) {
        // Short timeout: the page is closing; either it lands or it doesn't.
        let _ = self
            .client
            .post(self.state_url(domain))
            .timeout(Duration::from_millis(800))
            .json(&json!({ "data": snapshot }))
            .send();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_url_includes_domain_segment() {
        let remote = HttpRemoteStore::new("http://example.test/api");
        assert_eq!(
            remote.state_url(Domain::Fitness),
            "http://example.test/api/state/fitness"
        );
    }
}
