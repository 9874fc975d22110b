use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::entities::decode_html_entities;

pub const REASONS_MIN: usize = 4;
pub const REASONS_MAX: usize = 6;
pub const IMPROVEMENTS_LEN: usize = 3;
pub const SPIKE_IDEAS_LEN: usize = 2;

/// The structured narrative the service is asked to return.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeReport {
    pub headline: String,
    pub summary: String,
    pub reasons: Vec<String>,
    pub improvements: Vec<String>,
    pub spike_ideas: Vec<String>,
}

impl NarrativeReport {
    /// Whether the list lengths match what the prompt asked for.
    pub fn conforms(&self) -> bool {
        (REASONS_MIN..=REASONS_MAX).contains(&self.reasons.len())
            && self.improvements.len() == IMPROVEMENTS_LEN
            && self.spike_ideas.len() == SPIKE_IDEAS_LEN
    }
}

/// Outcome of asking for a narrative explanation. None of these are fatal;
/// the numeric estimate stands on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum Explanation {
    Parsed(NarrativeReport),
    /// The reply had no usable JSON object; this is the decoded text.
    RawFallback(String),
    /// No reply at all: network, HTTP, timeout, or an empty body.
    Failed(String),
}

impl Explanation {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Explanation::RawFallback(_))
    }

    pub fn report(&self) -> Option<&NarrativeReport> {
        match self {
            Explanation::Parsed(report) => Some(report),
            _ => None,
        }
    }
}

/// Slice from the first `{` to the last `}`, dropping code fences and any
/// prose around the object.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end >= start).then_some(&raw[start..=end])
}

/// Decode a free-text reply from the narrative service.
pub fn decode_reply(raw: &str) -> Explanation {
    let text = decode_html_entities(raw);
    let text = text.trim();

    if text.is_empty() {
        return Explanation::Failed("narrative service returned an empty reply".to_string());
    }

    let parsed = extract_json_object(text)
        .ok_or_else(|| "no JSON object found".to_string())
        .and_then(|json| {
            serde_json::from_str::<NarrativeReport>(json).map_err(|e| e.to_string())
        });

    match parsed {
        Ok(report) => {
            if !report.conforms() {
                debug!(
                    reasons = report.reasons.len(),
                    improvements = report.improvements.len(),
                    spike_ideas = report.spike_ideas.len(),
                    "explanation list lengths differ from the requested shape"
                );
            }
            Explanation::Parsed(report)
        }
        Err(reason) => {
            warn!(%reason, "explanation malformed, falling back to raw text");
            Explanation::RawFallback(text.to_string())
        }
    }
}
