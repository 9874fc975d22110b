pub mod client;
pub mod entities;
pub mod reply;
pub mod request;
pub mod tracker;

pub use client::{ExplainError, HttpNarrativeService, NarrativeService};
pub use entities::decode_html_entities;
pub use reply::{decode_reply, extract_json_object, Explanation, NarrativeReport};
pub use request::ExplanationRequest;
pub use tracker::{explain_once, ExplanationKey, ExplanationTracker};
