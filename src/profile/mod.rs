mod types;
mod validation;

pub use types::{StudentProfile, TestType};
pub use validation::{
    validate_profile, ACT_MAX, ACT_MIN, GPA_MAX, GPA_MIN, SAT_MAX, SAT_MIN,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load a student profile from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the YAML does not
/// describe a profile.
pub fn load_profile(path: &Path) -> Result<StudentProfile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile at {}", path.display()))?;

    let profile: StudentProfile = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse profile: invalid YAML in {}", path.display()))?;

    Ok(profile)
}
