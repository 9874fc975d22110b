use tracing::debug;

use crate::catalog::{Catalog, School};
use crate::profile::StudentProfile;
use crate::scoring::{compute_chance, ComputationResult};

pub const DEFAULT_COMPARABLE_LIMIT: usize = 10;

/// A school whose estimated probability sits close to the reference school's.
#[derive(Debug, Clone)]
pub struct Comparable<'a> {
    pub school: &'a School,
    pub result: ComputationResult,
    /// |p_this - p_reference|
    pub distance: f64,
}

/// Score `profile` against every other school in the catalog and return the
/// `limit` schools whose probability is nearest to `reference_probability`,
/// closest first. The reference school is never included. Ties keep
/// catalog order.
pub fn rank_comparables<'a>(
    catalog: &'a Catalog,
    profile: &StudentProfile,
    reference: &School,
    reference_probability: f64,
    limit: usize,
) -> Vec<Comparable<'a>> {
    let mut scored: Vec<Comparable<'a>> = catalog
        .iter()
        .filter(|school| school.id != reference.id)
        .map(|school| {
            let result = compute_chance(profile, school);
            let distance = (result.probability - reference_probability).abs();
            Comparable {
                school,
                result,
                distance,
            }
        })
        .collect();

    // sort_by is stable, so equal distances stay in catalog order
    scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    scored.truncate(limit);

    debug!(
        reference = %reference.name,
        candidates = catalog.len().saturating_sub(1),
        returned = scored.len(),
        "ranked comparable schools"
    );

    scored
}

/// Convenience wrapper that scores the reference school first.
pub fn comparables_for<'a>(
    catalog: &'a Catalog,
    profile: &StudentProfile,
    reference: &School,
    limit: usize,
) -> (ComputationResult, Vec<Comparable<'a>>) {
    let result = compute_chance(profile, reference);
    let comparables = rank_comparables(catalog, profile, reference, result.probability, limit);
    (result, comparables)
}
