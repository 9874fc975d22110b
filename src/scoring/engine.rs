use std::fmt;

use super::factors::{
    ec_norm, logit, major_fit_score, rigor_norm, sanitize, sigmoid, FIT_PARTIAL,
};
use crate::catalog::normalize::{DEFAULT_ACCEPTANCE_RATE, MAX_ACCEPTANCE_RATE, MIN_ACCEPTANCE_RATE};
use crate::catalog::{Range, School, SchoolId};
use crate::profile::{StudentProfile, TestType, ACT_MAX, ACT_MIN, GPA_MAX, GPA_MIN, SAT_MAX, SAT_MIN};

pub const DEFAULT_GPA_MID: f64 = 3.85;
pub const DEFAULT_SAT_MID: f64 = 1450.0;
pub const DEFAULT_ACT_MID: f64 = 33.0;

const GPA_STEP: f64 = 0.15;
const SAT_STEP: f64 = 80.0;
const ACT_STEP: f64 = 2.0;

const W_GPA: f64 = 0.95;
const W_TEST: f64 = 0.75;
const W_RIGOR: f64 = 0.6;
const RIGOR_PIVOT: f64 = 0.55;

const W_EC: f64 = 0.55;
const W_LEADERSHIP: f64 = 0.45;
const NO_LEADERSHIP_CREDIT: f64 = 0.55;

const W_ACADEMICS: f64 = 0.58;
const W_HOLISTIC: f64 = 0.24;
const W_FIT: f64 = 0.18;

const STRENGTH_SLOPE: f64 = 2.15;
const BONUS_LEADERSHIP: f64 = 0.06;
const BONUS_FIRST_GEN: f64 = 0.04;
const BONUS_LEGACY: f64 = 0.02;

pub const MIN_PROBABILITY: f64 = 0.01;
pub const MAX_PROBABILITY: f64 = 0.95;

pub const REACH_BELOW: f64 = 0.12;
pub const MATCH_BELOW: f64 = 0.35;

const STRONG_RIGOR: f64 = 0.75;
const HIGH_IMPACT_EC: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Reach,
    Match,
    Likely,
}

impl Label {
    pub fn from_probability(p: f64) -> Self {
        if p < REACH_BELOW {
            Label::Reach
        } else if p < MATCH_BELOW {
            Label::Match
        } else {
            Label::Likely
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Reach => "Reach",
            Label::Match => "Match",
            Label::Likely => "Likely",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// School midpoints the profile was compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceStats {
    pub gpa_mid: f64,
    pub sat_mid: f64,
    pub act_mid: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub gpa_delta: f64,
    pub test_delta: f64,
    pub rigor_norm: f64,
    pub ec_norm: f64,
    pub academics: f64,
    pub holistic: f64,
    pub major_fit: f64,
    pub overall: f64,
    pub base_rate: f64,
    pub adjusted_logit: f64,
    pub reference: ReferenceStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputationResult {
    pub school_id: SchoolId,
    /// Admission probability, always within [0.01, 0.95]
    pub probability: f64,
    pub label: Label,
    pub reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

/// Estimate the admission probability of `profile` at `school`.
///
/// Pure and deterministic. Out-of-domain input is clamped, never rejected.
pub fn compute_chance(profile: &StudentProfile, school: &School) -> ComputationResult {
    let reference = ReferenceStats {
        gpa_mid: school.gpa.midpoint().unwrap_or(DEFAULT_GPA_MID),
        sat_mid: school.sat.midpoint().unwrap_or(DEFAULT_SAT_MID),
        act_mid: school.act.midpoint().unwrap_or(DEFAULT_ACT_MID),
    };

    let gpa = sanitize(profile.gpa, GPA_MIN, GPA_MIN, GPA_MAX);
    let gpa_delta = (gpa - reference.gpa_mid) / GPA_STEP;

    let test = clamped_test_score(profile);
    let test_delta = match test {
        Some((TestType::Sat, score)) => (score - reference.sat_mid) / SAT_STEP,
        Some((TestType::Act, score)) => (score - reference.act_mid) / ACT_STEP,
        None => 0.0,
    };

    let rigor = rigor_norm(profile.ap_count);
    let ec = ec_norm(profile.ec_tier);
    let major_fit = major_fit_score(&profile.intended_major, &school.notable_strengths);

    let academics =
        sigmoid(W_GPA * gpa_delta + W_TEST * test_delta + W_RIGOR * (rigor - RIGOR_PIVOT));
    let leadership_credit = if profile.leadership {
        1.0
    } else {
        NO_LEADERSHIP_CREDIT
    };
    let holistic = (W_EC * ec + W_LEADERSHIP * leadership_credit).clamp(0.0, 1.0);
    let overall = (W_ACADEMICS * academics + W_HOLISTIC * holistic + W_FIT * major_fit)
        .clamp(0.0, 1.0);

    let base_rate = sanitize(
        school.acceptance_rate,
        DEFAULT_ACCEPTANCE_RATE,
        MIN_ACCEPTANCE_RATE,
        MAX_ACCEPTANCE_RATE,
    );
    let adjusted_logit = logit(base_rate)
        + STRENGTH_SLOPE * (overall - 0.5)
        + flag(profile.leadership) * BONUS_LEADERSHIP
        + flag(profile.first_gen) * BONUS_FIRST_GEN
        + flag(profile.legacy) * BONUS_LEGACY;

    let probability = sigmoid(adjusted_logit).clamp(MIN_PROBABILITY, MAX_PROBABILITY);

    let breakdown = ScoreBreakdown {
        gpa_delta,
        test_delta,
        rigor_norm: rigor,
        ec_norm: ec,
        academics,
        holistic,
        major_fit,
        overall,
        base_rate,
        adjusted_logit,
        reference,
    };

    ComputationResult {
        school_id: school.id,
        probability,
        label: Label::from_probability(probability),
        reasons: build_reasons(profile, school, gpa, test, &breakdown),
        breakdown,
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn clamped_test_score(profile: &StudentProfile) -> Option<(TestType, f64)> {
    profile.test_score().map(|(kind, score)| {
        let score = match kind {
            TestType::Sat => score.clamp(SAT_MIN as f64, SAT_MAX as f64),
            TestType::Act => score.clamp(ACT_MIN as f64, ACT_MAX as f64),
        };
        (kind, score)
    })
}

/// Describe where the profile sits against a school band. Without a band
/// the assumed midpoint stands in for the lower bound.
fn describe_band(range: &Range, fallback_mid: f64, decimals: usize) -> (f64, String) {
    match range.low {
        Some(low) if range.is_known() => (low, format!("typical range {}", range.display(decimals))),
        _ => (
            fallback_mid,
            format!("assumed midpoint {:.*}", decimals, fallback_mid),
        ),
    }
}

fn build_reasons(
    profile: &StudentProfile,
    school: &School,
    gpa: f64,
    test: Option<(TestType, f64)>,
    breakdown: &ScoreBreakdown,
) -> Vec<String> {
    let mut reasons = Vec::new();

    let (gpa_floor, gpa_band) = describe_band(&school.gpa, breakdown.reference.gpa_mid, 2);
    if gpa < gpa_floor {
        reasons.push(format!("GPA {:.2} is below the school's {}", gpa, gpa_band));
    } else {
        reasons.push(format!(
            "GPA {:.2} is at or above the school's {}",
            gpa, gpa_band
        ));
    }

    match test {
        Some((kind, score)) => {
            let (range, mid) = match kind {
                TestType::Sat => (&school.sat, breakdown.reference.sat_mid),
                TestType::Act => (&school.act, breakdown.reference.act_mid),
            };
            let (floor, band) = describe_band(range, mid, 0);
            if score < floor {
                reasons.push(format!("{} {:.0} is below the school's {}", kind, score, band));
            } else {
                reasons.push(format!(
                    "{} {:.0} is at or above the school's {}",
                    kind, score, band
                ));
            }
        }
        None => reasons.push(
            "No test score provided; the estimate leans on GPA and the rest of the profile"
                .to_string(),
        ),
    }

    if breakdown.rigor_norm >= STRONG_RIGOR {
        reasons.push(format!(
            "Strong course rigor ({} AP/IB courses)",
            profile.ap_count
        ));
    }

    if breakdown.ec_norm >= HIGH_IMPACT_EC {
        reasons.push(format!(
            "High-impact extracurriculars (tier {})",
            profile.ec_tier
        ));
    }

    if breakdown.major_fit >= FIT_PARTIAL {
        reasons.push(format!(
            "Intended major \"{}\" lines up with the school's notable strengths",
            profile.intended_major.trim()
        ));
    } else if profile.intended_major.trim().is_empty() {
        reasons.push(
            "No intended major given; fit with the school's strengths is unknown".to_string(),
        );
    } else {
        reasons.push(format!(
            "Little overlap between \"{}\" and the school's listed strengths (a rough text match, not a program rating)",
            profile.intended_major.trim()
        ));
    }

    reasons
}
