pub mod engine;
pub mod factors;
pub mod price;

pub use engine::{
    compute_chance, ComputationResult, Label, ReferenceStats, ScoreBreakdown, MAX_PROBABILITY,
    MIN_PROBABILITY,
};
pub use factors::{major_fit_score, token_overlap, tokenize};
pub use price::{estimate_net_price, REFERENCE_INCOME};
