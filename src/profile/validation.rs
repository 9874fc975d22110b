use super::types::{StudentProfile, TestType};

pub const GPA_MIN: f64 = 2.0;
pub const GPA_MAX: f64 = 4.0;
pub const SAT_MIN: u32 = 800;
pub const SAT_MAX: u32 = 1600;
pub const ACT_MIN: u32 = 1;
pub const ACT_MAX: u32 = 36;

/// Validate a profile before scoring.
/// Returns all validation errors at once (not just the first).
///
/// The scoring engine clamps out-of-range input on its own; this is for
/// telling the user their input was off instead of silently clamping it.
pub fn validate_profile(profile: &StudentProfile) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !(profile.gpa.is_finite() && (GPA_MIN..=GPA_MAX).contains(&profile.gpa)) {
        errors.push(format!(
            "profile.gpa: {} is outside {:.1}-{:.1}",
            profile.gpa, GPA_MIN, GPA_MAX
        ));
    }

    if let Some(sat) = profile.sat_score {
        if !(SAT_MIN..=SAT_MAX).contains(&sat) {
            errors.push(format!(
                "profile.sat_score: {} is outside {}-{}",
                sat, SAT_MIN, SAT_MAX
            ));
        }
    }

    if let Some(act) = profile.act_score {
        if !(ACT_MIN..=ACT_MAX).contains(&act) {
            errors.push(format!(
                "profile.act_score: {} is outside {}-{}",
                act, ACT_MIN, ACT_MAX
            ));
        }
    }

    if profile.test_type == TestType::Act && profile.act_score.is_none() && profile.sat_score.is_some() {
        errors.push("profile.test_type: ACT selected but only a SAT score was given".to_string());
    }

    if !(1..=4).contains(&profile.ec_tier) {
        errors.push(format!(
            "profile.ec_tier: {} must be between 1 and 4",
            profile.ec_tier
        ));
    }

    if !(profile.family_income.is_finite() && profile.family_income > 0.0) {
        errors.push("profile.family_income: must be a positive amount".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_profile() {
        assert!(validate_profile(&StudentProfile::default()).is_ok());
    }

    #[test]
    fn test_profile_without_score_is_valid() {
        let profile = StudentProfile {
            sat_score: None,
            ..Default::default()
        };
        assert!(validate_profile(&profile).is_ok());
    }

    #[test]
    fn test_gpa_out_of_range() {
        let profile = StudentProfile {
            gpa: 4.3,
            ..Default::default()
        };
        let errors = validate_profile(&profile).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("profile.gpa"));
    }

    #[test]
    fn test_nan_gpa_rejected() {
        let profile = StudentProfile {
            gpa: f64::NAN,
            ..Default::default()
        };
        assert!(validate_profile(&profile).is_err());
    }

    #[test]
    fn test_bad_scores() {
        let profile = StudentProfile {
            sat_score: Some(1700),
            act_score: Some(0),
            ..Default::default()
        };
        let errors = validate_profile(&profile).unwrap_err();
        assert!(errors[0].contains("profile.sat_score"));
        assert!(errors[1].contains("profile.act_score"));
    }

    #[test]
    fn test_act_selected_with_only_sat() {
        let profile = StudentProfile {
            test_type: TestType::Act,
            ..Default::default()
        };
        let errors = validate_profile(&profile).unwrap_err();
        assert!(errors[0].contains("profile.test_type"));
    }

    #[test]
    fn test_collects_all_errors() {
        let profile = StudentProfile {
            gpa: 1.0,
            ec_tier: 7,
            family_income: 0.0,
            ..Default::default()
        };
        let errors = validate_profile(&profile).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
