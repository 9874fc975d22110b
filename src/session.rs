use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::catalog::{Catalog, School, SchoolId};
use crate::explain::{Explanation, ExplanationKey, ExplanationRequest, ExplanationTracker, NarrativeService};
use crate::profile::StudentProfile;
use crate::ranking::{comparables_for, Comparable};
use crate::scoring::{compute_chance, ComputationResult};

/// State a caller carries across profile and selection changes.
///
/// The catalog is shared and never mutated. Scores are memoized per
/// (profile fingerprint, school) and an explanation is only surfaced if it
/// still matches the current profile and selection.
pub struct Session {
    catalog: Arc<Catalog>,
    profile: StudentProfile,
    fingerprint: u64,
    selected: Option<SchoolId>,
    memo: HashMap<(u64, SchoolId), ComputationResult>,
    tracker: ExplanationTracker,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>, profile: StudentProfile, explain_timeout: Duration) -> Self {
        let fingerprint = profile.fingerprint();
        Self {
            catalog,
            profile,
            fingerprint,
            selected: None,
            memo: HashMap::new(),
            tracker: ExplanationTracker::new(explain_timeout),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn profile(&self) -> &StudentProfile {
        &self.profile
    }

    /// Replace the profile. Memoized scores and any in-flight explanation
    /// belong to the old profile and are dropped.
    pub fn set_profile(&mut self, profile: StudentProfile) {
        let fingerprint = profile.fingerprint();
        self.profile = profile;
        if fingerprint != self.fingerprint {
            self.fingerprint = fingerprint;
            self.memo.clear();
            self.tracker.cancel();
            debug!(profile = fingerprint, "profile changed");
        }
    }

    /// Edit the profile in place.
    pub fn update_profile(&mut self, edit: impl FnOnce(&mut StudentProfile)) {
        let mut profile = self.profile.clone();
        edit(&mut profile);
        self.set_profile(profile);
    }

    /// Select a school by id. Returns false if the id is not in the catalog.
    pub fn select(&mut self, id: SchoolId) -> bool {
        if self.catalog.get(id).is_none() {
            return false;
        }
        if self.selected != Some(id) {
            self.selected = Some(id);
            self.tracker.cancel();
            debug!(school = %id, "selection changed");
        }
        true
    }

    /// Select a school by (partial) name. Returns the selected school.
    pub fn select_by_name(&mut self, query: &str) -> Option<&School> {
        let id = self.catalog.find(query)?.id;
        self.select(id);
        self.catalog.get(id)
    }

    pub fn selected_school(&self) -> Option<&School> {
        self.selected.and_then(|id| self.catalog.get(id))
    }

    /// Score the current profile against `id`, reusing a memoized result.
    pub fn chance_for(&mut self, id: SchoolId) -> Option<&ComputationResult> {
        let school = self.catalog.get(id)?;
        let profile = &self.profile;
        Some(
            self.memo
                .entry((self.fingerprint, id))
                .or_insert_with(|| compute_chance(profile, school)),
        )
    }

    /// Score the current profile against the selected school.
    pub fn chance(&mut self) -> Option<&ComputationResult> {
        let id = self.selected?;
        self.chance_for(id)
    }

    /// Comparable schools for the current selection.
    pub fn comparables(&self, limit: usize) -> Option<(ComputationResult, Vec<Comparable<'_>>)> {
        let school = self.selected_school()?;
        Some(comparables_for(&self.catalog, &self.profile, school, limit))
    }

    /// Key identifying the current profile and selection.
    pub fn current_key(&self) -> Option<ExplanationKey> {
        self.selected
            .map(|id| ExplanationKey::new(id, &self.profile))
    }

    /// Start an explanation for the selected school, replacing any request
    /// still in flight.
    pub fn request_explanation<S: NarrativeService>(&mut self, service: Arc<S>) -> Option<ExplanationKey> {
        let id = self.selected?;
        let result = self.chance_for(id)?.clone();
        let school = self.catalog.get(id)?;
        let request = ExplanationRequest::new(&self.profile, school, &result);
        Some(self.tracker.start(service, request))
    }

    pub fn explanation_pending(&self) -> bool {
        self.tracker.is_pending()
    }

    /// Non-blocking: the explanation for the current selection, once ready.
    pub async fn poll_explanation(&mut self) -> Option<Explanation> {
        let key = self.current_key()?;
        self.tracker.poll(key).await
    }

    /// Wait for the explanation for the current selection.
    pub async fn wait_explanation(&mut self) -> Option<Explanation> {
        let key = self.current_key()?;
        self.tracker.wait(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::tracker::tests::{school, ScriptedService};
    use std::sync::atomic::Ordering;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::from_schools(vec![
            school(0, "Alpha University"),
            school(1, "Slow College"),
            school(2, "Gamma Institute"),
        ]))
    }

    fn session() -> Session {
        Session::new(catalog(), StudentProfile::default(), Duration::from_secs(30))
    }

    #[test]
    fn test_select_by_name_and_unknown_id() {
        let mut session = session();
        assert!(session.selected_school().is_none());
        assert!(session.chance().is_none());

        let picked = session.select_by_name("gamma").unwrap();
        assert_eq!(picked.id, SchoolId(2));
        assert!(!session.select(SchoolId(99)));
        assert_eq!(session.selected_school().unwrap().id, SchoolId(2));
    }

    #[test]
    fn test_chance_matches_engine_and_is_memoized() {
        let mut session = session();
        session.select(SchoolId(0));

        let expected = compute_chance(&StudentProfile::default(), &school(0, "Alpha University"));
        assert_eq!(session.chance().unwrap(), &expected);
        assert_eq!(session.chance().unwrap(), &expected);
        assert_eq!(session.memo.len(), 1);
    }

    #[test]
    fn test_profile_change_rescores() {
        let mut session = session();
        session.select(SchoolId(0));
        let before = session.chance().unwrap().probability;

        session.update_profile(|p| p.gpa = 3.2);
        assert!(session.memo.is_empty());
        let after = session.chance().unwrap().probability;
        assert!(after < before);
    }

    #[test]
    fn test_comparables_exclude_selection() {
        let mut session = session();
        assert!(session.comparables(5).is_none());

        session.select(SchoolId(1));
        let (_, comparables) = session.comparables(5).unwrap();
        assert_eq!(comparables.len(), 2);
        assert!(comparables.iter().all(|c| c.school.id != SchoolId(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_explanation_for_current_selection() {
        let service = Arc::new(ScriptedService::new());
        let mut session = session();
        assert!(session.request_explanation(service.clone()).is_none());

        session.select(SchoolId(0));
        let key = session.request_explanation(service.clone()).unwrap();
        assert_eq!(Some(key), session.current_key());

        let explanation = session.wait_explanation().await.unwrap();
        assert_eq!(explanation.report().unwrap().headline, "Alpha University");
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_school_drops_old_explanation() {
        let service = Arc::new(ScriptedService::new());
        let mut session = session();

        session.select(SchoolId(1));
        session.request_explanation(service.clone()).unwrap();
        tokio::task::yield_now().await;
        session.select(SchoolId(2));
        assert!(!session.explanation_pending());
        assert!(session.wait_explanation().await.is_none());

        session.request_explanation(service.clone()).unwrap();
        let explanation = session.wait_explanation().await.unwrap();
        assert_eq!(explanation.report().unwrap().headline, "Gamma Institute");
        assert_eq!(service.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_profile_edit_drops_old_explanation() {
        let service = Arc::new(ScriptedService::new());
        let mut session = session();

        session.select(SchoolId(0));
        session.request_explanation(service).unwrap();
        session.update_profile(|p| p.ap_count = 10);
        assert!(!session.explanation_pending());
        assert!(session.poll_explanation().await.is_none());
    }
}
