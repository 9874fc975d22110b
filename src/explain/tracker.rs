use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::client::{ExplainError, NarrativeService};
use super::reply::{decode_reply, Explanation};
use super::request::ExplanationRequest;
use crate::catalog::SchoolId;
use crate::profile::StudentProfile;

/// Identifies what an explanation was requested for. A result is only
/// applied if the caller's current key still matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExplanationKey {
    pub school: SchoolId,
    pub profile: u64,
}

impl ExplanationKey {
    pub fn new(school: SchoolId, profile: &StudentProfile) -> Self {
        Self {
            school,
            profile: profile.fingerprint(),
        }
    }
}

/// Ask the service once and decode whatever comes back. Never fails;
/// errors become [`Explanation::Failed`].
pub async fn explain_once<S: NarrativeService>(
    service: &S,
    request: &ExplanationRequest,
    timeout: Duration,
) -> Explanation {
    match tokio::time::timeout(timeout, service.generate(request.prompt())).await {
        Ok(Ok(text)) => decode_reply(&text),
        Ok(Err(e)) => {
            warn!(error = %e, "explanation unavailable");
            Explanation::Failed(e.to_string())
        }
        Err(_elapsed) => {
            let e = ExplainError::Timeout(timeout);
            warn!(error = %e, "explanation unavailable");
            Explanation::Failed(e.to_string())
        }
    }
}

struct PendingExplanation {
    key: ExplanationKey,
    handle: JoinHandle<Explanation>,
}

/// Holds at most one outstanding explanation request.
///
/// Starting a new request aborts the previous one, and a finished result
/// whose key no longer matches the caller's selection is dropped.
pub struct ExplanationTracker {
    pending: Option<PendingExplanation>,
    timeout: Duration,
}

impl ExplanationTracker {
    pub fn new(timeout: Duration) -> Self {
        Self {
            pending: None,
            timeout,
        }
    }

    /// Spawn a request, replacing any request still in flight.
    pub fn start<S: NarrativeService>(
        &mut self,
        service: Arc<S>,
        request: ExplanationRequest,
    ) -> ExplanationKey {
        self.cancel();

        let key = request.key();
        let timeout = self.timeout;
        let handle = tokio::spawn(async move { explain_once(service.as_ref(), &request, timeout).await });

        debug!(school = %key.school, profile = key.profile, "explanation requested");
        self.pending = Some(PendingExplanation { key, handle });
        key
    }

    /// Abort the in-flight request, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
            debug!(school = %pending.key.school, "explanation request cancelled");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_key(&self) -> Option<ExplanationKey> {
        self.pending.as_ref().map(|p| p.key)
    }

    /// Non-blocking check. Returns the result once the request has finished,
    /// provided it was made for `current`.
    pub async fn poll(&mut self, current: ExplanationKey) -> Option<Explanation> {
        match &self.pending {
            Some(pending) if pending.handle.is_finished() => {}
            _ => return None,
        }
        let pending = self.pending.take()?;
        Self::accept(pending, current).await
    }

    /// Wait for the in-flight request. Returns `None` if nothing is pending
    /// or the request was made for a different key.
    pub async fn wait(&mut self, current: ExplanationKey) -> Option<Explanation> {
        let pending = self.pending.take()?;
        Self::accept(pending, current).await
    }

    async fn accept(pending: PendingExplanation, current: ExplanationKey) -> Option<Explanation> {
        if pending.key != current {
            pending.handle.abort();
            debug!(
                requested = %pending.key.school,
                current = %current.school,
                "discarding stale explanation"
            );
            return None;
        }

        match pending.handle.await {
            Ok(explanation) => Some(explanation),
            Err(e) if e.is_cancelled() => None,
            Err(e) => Some(Explanation::Failed(format!("explanation task failed: {}", e))),
        }
    }
}

impl Drop for ExplanationTracker {
    fn drop(&mut self) {
        self.cancel();
    }
}
