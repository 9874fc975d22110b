use super::tracker::ExplanationKey;
use crate::catalog::School;
use crate::profile::StudentProfile;
use crate::scoring::{ComputationResult, Label};

/// Everything the narrative service needs: the profile, the selected
/// school's statistics, and the estimate already computed for them.
#[derive(Debug, Clone)]
pub struct ExplanationRequest {
    pub profile: StudentProfile,
    pub school: School,
    pub probability: f64,
    pub label: Label,
}

impl ExplanationRequest {
    pub fn new(profile: &StudentProfile, school: &School, result: &ComputationResult) -> Self {
        Self {
            profile: profile.clone(),
            school: school.clone(),
            probability: result.probability,
            label: result.label,
        }
    }

    pub fn key(&self) -> ExplanationKey {
        ExplanationKey::new(self.school.id, &self.profile)
    }

    /// Render the prompt sent to the narrative service.
    pub fn prompt(&self) -> String {
        let s = &self.school;
        let p = &self.profile;

        let mut lines = vec![
            "You are an experienced college admissions counselor. Explain a student's admission estimate.".to_string(),
            String::new(),
            format!("School: {} (#{} {})", s.name, s.rank, s.school_type),
            format!("- GPA range: {}", s.gpa.display(2)),
            format!("- SAT range: {}", s.sat.display(0)),
            format!("- ACT range: {}", s.act.display(0)),
            format!("- Acceptance rate: {:.1}%", s.acceptance_rate * 100.0),
            format!("- Average aid: ${:.0}", s.average_aid),
            format!(
                "- Early decision: {}, early action: {}, need-blind: {}",
                yes_no(s.early_decision),
                yes_no(s.early_action),
                yes_no(s.need_blind)
            ),
        ];
        if !s.special_programs.is_empty() {
            lines.push(format!("- Special programs: {}", s.special_programs));
        }
        if !s.notable_strengths.is_empty() {
            lines.push(format!("- Notable strengths: {}", s.notable_strengths));
        }

        lines.push(String::new());
        lines.push("Student:".to_string());
        lines.push(format!("- Unweighted GPA: {:.2}", p.gpa));
        lines.push(match p.test_score() {
            Some((kind, score)) => format!("- {}: {:.0}", kind, score),
            None => "- Test score: not submitted".to_string(),
        });
        lines.push(format!("- AP/IB courses: {}", p.ap_count));
        lines.push(format!(
            "- Extracurricular tier: {} (1 = highest impact)",
            p.ec_tier
        ));
        lines.push(format!("- Leadership: {}", yes_no(p.leadership)));
        lines.push(format!("- First-generation: {}", yes_no(p.first_gen)));
        lines.push(format!("- Legacy: {}", yes_no(p.legacy)));
        let major = p.intended_major.trim();
        lines.push(format!(
            "- Intended major: {}",
            if major.is_empty() { "undecided" } else { major }
        ));

        lines.push(String::new());
        lines.push(format!(
            "Estimated admission probability: {:.1}% ({})",
            self.probability * 100.0,
            self.label
        ));
        lines.push(String::new());
        lines.push(
            "Reply with ONLY a JSON object, no markdown and no other text, in exactly this shape:"
                .to_string(),
        );
        lines.push(
            r#"{"headline": string, "summary": string, "reasons": [4 to 6 strings], "improvements": [3 strings], "spikeIdeas": [2 strings]}"#
                .to_string(),
        );

        lines.join("\n")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
