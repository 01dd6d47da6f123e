//! Completion reporting to the platform's award endpoint.
//!
//! Completions are scored locally first; reporting them server-side is an
//! enhancement layer. The server acknowledges with the unlock ids it has on
//! record, and those are folded back into the profile as a set union — an
//! unreachable or disagreeing server can add unlocks but never remove one.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::types::{Domain, SyncError};
use crate::achievement::AchievementId;
use crate::events::Event;
use crate::store::{CompletionReceipt, LocalStore};

/// Server acknowledgement for a reported completion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwardAck {
    /// Unlock ids the server considers earned for this profile.
    #[serde(default)]
    pub confirmed_achievements: Vec<AchievementId>,
}

/// Abstract award endpoint, faked in tests.
pub trait AwardService {
    fn report_completion(&self, receipt: &CompletionReceipt) -> Result<AwardAck, SyncError>;
}

/// HTTP implementation against `POST {base}/awards/{domain}`.
pub struct HttpAwardService {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpAwardService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn award_url(&self, domain: Domain) -> String {
        format!("{}/awards/{}", self.base_url, domain.as_str())
    }
}

impl AwardService for HttpAwardService {
    fn report_completion(&self, receipt: &CompletionReceipt) -> Result<AwardAck, SyncError> {
        let response = self
            .client
            .post(self.award_url(receipt.domain))
            .json(&json!({
                "unit_id": receipt.unit_id,
                "awarded_xp": receipt.awarded_xp,
                "base_xp": receipt.base_xp,
                "unlocked": receipt.newly_unlocked,
            }))
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::RemoteStatus {
                status: status.as_u16(),
            });
        }
        Ok(response.json()?)
    }
}

/// Report a completion and fold any server-confirmed unlocks back into the
/// local profile. Best-effort: a failure is recorded to the event log and the
/// completion stands untouched.
pub fn report_completion(
    store: &mut LocalStore,
    service: &impl AwardService,
    receipt: &CompletionReceipt,
    now: DateTime<Utc>,
) -> Vec<AchievementId> {
    match service.report_completion(receipt) {
        Ok(ack) => store.absorb_confirmed_unlocks(receipt.domain, &ack.confirmed_achievements, now),
        Err(err) => {
            store.record_event(Event::SyncDeferred {
                reason: err.to_string(),
                at: now,
            });
            Vec::new()
        }
    }
}
