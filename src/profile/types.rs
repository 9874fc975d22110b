use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum TestType {
    #[default]
    #[serde(rename = "SAT", alias = "sat")]
    Sat,
    #[serde(rename = "ACT", alias = "act")]
    Act,
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestType::Sat => f.write_str("SAT"),
            TestType::Act => f.write_str("ACT"),
        }
    }
}

/// A student's academic and holistic profile.
///
/// Example YAML:
/// ```yaml
/// gpa: 3.8
/// test_type: SAT
/// sat_score: 1450
/// ap_count: 8
/// ec_tier: 2
/// leadership: true
/// family_income: 90000
/// intended_major: Biology
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StudentProfile {
    /// Unweighted GPA on a 4.0 scale
    pub gpa: f64,

    #[serde(default)]
    pub test_type: TestType,

    #[serde(default)]
    pub sat_score: Option<u32>,

    #[serde(default)]
    pub act_score: Option<u32>,

    /// Number of AP/IB courses taken
    #[serde(default)]
    pub ap_count: u32,

    /// Extracurricular impact tier, 1 (national/top) to 4 (participation)
    #[serde(default = "default_ec_tier")]
    pub ec_tier: u8,

    #[serde(default)]
    pub leadership: bool,

    #[serde(default)]
    pub first_gen: bool,

    #[serde(default)]
    pub legacy: bool,

    /// Annual family income in dollars
    #[serde(default = "default_family_income")]
    pub family_income: f64,

    #[serde(default)]
    pub intended_major: String,
}

fn default_ec_tier() -> u8 {
    2
}

fn default_family_income() -> f64 {
    120_000.0
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            gpa: 3.8,
            test_type: TestType::Sat,
            sat_score: Some(1450),
            act_score: None,
            ap_count: 6,
            ec_tier: default_ec_tier(),
            leadership: false,
            first_gen: false,
            legacy: false,
            family_income: default_family_income(),
            intended_major: String::new(),
        }
    }
}

impl StudentProfile {
    /// The score matching the selected test type, if one was given.
    pub fn test_score(&self) -> Option<(TestType, f64)> {
        match self.test_type {
            TestType::Sat => self.sat_score.map(|s| (TestType::Sat, s as f64)),
            TestType::Act => self.act_score.map(|s| (TestType::Act, s as f64)),
        }
    }

    /// Stable hash of every field. Two profiles with the same fingerprint
    /// score identically against every school.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.gpa.to_bits().hash(&mut hasher);
        self.test_type.hash(&mut hasher);
        self.sat_score.hash(&mut hasher);
        self.act_score.hash(&mut hasher);
        self.ap_count.hash(&mut hasher);
        self.ec_tier.hash(&mut hasher);
        self.leadership.hash(&mut hasher);
        self.first_gen.hash(&mut hasher);
        self.legacy.hash(&mut hasher);
        self.family_income.to_bits().hash(&mut hasher);
        self.intended_major.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_score_follows_type() {
        let mut profile = StudentProfile {
            sat_score: Some(1500),
            act_score: Some(34),
            ..Default::default()
        };
        assert_eq!(profile.test_score(), Some((TestType::Sat, 1500.0)));

        profile.test_type = TestType::Act;
        assert_eq!(profile.test_score(), Some((TestType::Act, 34.0)));

        profile.act_score = None;
        assert_eq!(profile.test_score(), None);
    }

    #[test]
    fn test_fingerprint_stable_and_sensitive() {
        let a = StudentProfile::default();
        let b = StudentProfile::default();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let c = StudentProfile {
            gpa: 3.81,
            ..Default::default()
        };
        assert_ne!(a.fingerprint(), c.fingerprint());

        let d = StudentProfile {
            intended_major: "Physics".to_string(),
            ..Default::default()
        };
        assert_ne!(a.fingerprint(), d.fingerprint());
    }

    #[test]
    fn test_profile_yaml_parse() {
        let yaml = r#"
gpa: 3.9
test_type: ACT
act_score: 34
ap_count: 10
ec_tier: 1
leadership: true
intended_major: "Computer Science"
"#;
        let profile: StudentProfile = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(profile.gpa, 3.9);
        assert_eq!(profile.test_type, TestType::Act);
        assert_eq!(profile.act_score, Some(34));
        assert_eq!(profile.sat_score, None);
        assert_eq!(profile.ec_tier, 1);
        assert!(profile.leadership);
        assert!(!profile.first_gen);
        assert_eq!(profile.family_income, 120_000.0);
    }

    #[test]
    fn test_profile_yaml_rejects_unknown_fields() {
        let yaml = "gpa: 3.9\nfavorite_color: blue\n";
        let result: Result<StudentProfile, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_profile_serde_roundtrip() {
        let profile = StudentProfile {
            intended_major: "Biology".to_string(),
            leadership: true,
            ..Default::default()
        };
        let yaml = serde_saphyr::to_string(&profile).unwrap();
        let parsed: StudentProfile = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(profile, parsed);
    }
}
