//! Name-based identity resolution.
//!
//! Resolution order:
//! 1. supplied candidate ID, when it exists
//! 2. exact (case-insensitive, trimmed) name match, lowest ID first
//! 3. create a new patient

use strsim::jaro_winkler;

use crate::config::DEFAULT_LOOKALIKE_THRESHOLD;
use crate::db::Database;
use crate::models::Patient;

use super::{IdentityClaim, IdentityResolver, Resolution, ResolverError, ResolverResult};

/// Resolves patients by exact name when no usable ID is supplied.
pub struct NameMatchResolver<'a> {
    db: &'a Database,
    lookalike_threshold: f64,
}

impl<'a> NameMatchResolver<'a> {
    /// Create a new resolver with the default look-alike threshold.
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            lookalike_threshold: DEFAULT_LOOKALIKE_THRESHOLD,
        }
    }

    /// Set the similarity above which new names are reported as look-alikes.
    pub fn with_lookalike_threshold(mut self, threshold: f64) -> Self {
        self.lookalike_threshold = threshold;
        self
    }

    /// Existing patients whose names are similar to, but not the same as, `name`.
    ///
    /// Case folding is ASCII-only, matching the exact-name lookup.
    pub fn find_lookalikes(&self, name: &str) -> ResolverResult<Vec<Patient>> {
        let wanted = name.trim().to_ascii_lowercase();
        let lookalikes = self
            .db
            .list_patients()?
            .into_iter()
            .filter(|p| {
                let existing = p.name.trim().to_ascii_lowercase();
                existing != wanted && jaro_winkler(&existing, &wanted) >= self.lookalike_threshold
            })
            .collect();
        Ok(lookalikes)
    }

    fn refresh(&self, mut patient: Patient, claim: &IdentityClaim<'_>) -> ResolverResult<i64> {
        patient.refresh_from_visit(claim.age, claim.visit_date);
        self.db.update_patient(&patient)?;
        Ok(patient.id)
    }

    fn create(&self, name: &str, claim: &IdentityClaim<'_>) -> ResolverResult<i64> {
        let lookalikes = self.find_lookalikes(name)?;
        if !lookalikes.is_empty() {
            let ids: Vec<i64> = lookalikes.iter().map(|p| p.id).collect();
            tracing::warn!(
                name,
                similar_patient_ids = ?ids,
                "creating patient with a name similar to existing patients"
            );
        }

        let mut patient = Patient::new(name);
        patient.age = claim.age.map(|a| a.to_string()).unwrap_or_default();
        patient.last_visit = Some(claim.visit_date);
        let id = self.db.insert_patient(&patient)?;

        tracing::info!(patient_id = id, "created patient from visit");
        Ok(id)
    }
}

impl IdentityResolver for NameMatchResolver<'_> {
    fn resolve(&self, claim: &IdentityClaim<'_>) -> ResolverResult<Resolution> {
        let name = claim.name.trim();
        if name.is_empty() {
            return Err(ResolverError::InvalidInput("patient name is required".into()));
        }

        if let Some(candidate_id) = claim.candidate_id {
            match self.db.get_patient(candidate_id)? {
                Some(patient) => {
                    let id = self.refresh(patient, claim)?;
                    return Ok(Resolution::Candidate(id));
                }
                None => {
                    tracing::debug!(candidate_id, "candidate patient not found, matching by name");
                }
            }
        }

        if let Some(patient) = self.db.find_patient_by_name_exact(name)? {
            let id = self.refresh(patient, claim)?;
            tracing::debug!(patient_id = id, "matched existing patient by name");
            return Ok(Resolution::Matched(id));
        }

        self.create(name, claim).map(Resolution::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn claim(name: &str, age: Option<i32>, day: NaiveDate) -> IdentityClaim<'_> {
        IdentityClaim {
            candidate_id: None,
            name,
            age,
            visit_date: day,
        }
    }

    #[test]
    fn test_creates_unknown_patient() {
        let db = setup_db();
        let resolver = NameMatchResolver::new(&db);

        let resolution = resolver
            .resolve(&claim("Alice", Some(30), date(2024, 1, 10)))
            .unwrap();
        assert!(resolution.is_new_patient());

        let patient = db.get_patient(resolution.patient_id()).unwrap().unwrap();
        assert_eq!(patient.name, "Alice");
        assert_eq!(patient.age, "30");
        assert_eq!(patient.last_visit, Some(date(2024, 1, 10)));
    }

    #[test]
    fn test_created_patient_without_age_has_empty_age() {
        let db = setup_db();
        let resolver = NameMatchResolver::new(&db);

        let id = resolver
            .resolve(&claim("Alice", None, date(2024, 1, 10)))
            .unwrap()
            .patient_id();
        assert_eq!(db.get_patient(id).unwrap().unwrap().age, "");
    }

    #[test]
    fn test_name_is_trimmed_on_create() {
        let db = setup_db();
        let resolver = NameMatchResolver::new(&db);

        let id = resolver
            .resolve(&claim("  Alice  ", None, date(2024, 1, 10)))
            .unwrap()
            .patient_id();
        assert_eq!(db.get_patient(id).unwrap().unwrap().name, "Alice");
    }

    #[test]
    fn test_matches_existing_by_name() {
        let db = setup_db();
        let existing = db.insert_patient(&Patient::new("Alice")).unwrap();
        let resolver = NameMatchResolver::new(&db);

        let resolution = resolver
            .resolve(&claim("ALICE", Some(31), date(2024, 2, 1)))
            .unwrap();
        assert_eq!(resolution, Resolution::Matched(existing));

        let patient = db.get_patient(existing).unwrap().unwrap();
        assert_eq!(patient.age, "31");
        assert_eq!(patient.last_visit, Some(date(2024, 2, 1)));
        assert_eq!(db.count_patients().unwrap(), 1);
    }

    #[test]
    fn test_partial_name_does_not_match() {
        let db = setup_db();
        db.insert_patient(&Patient::new("Alice Smith")).unwrap();
        let resolver = NameMatchResolver::new(&db);

        let resolution = resolver
            .resolve(&claim("Alice", None, date(2024, 2, 1)))
            .unwrap();
        assert!(resolution.is_new_patient());
        assert_eq!(db.count_patients().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_names_lowest_id_wins() {
        let db = setup_db();
        let first = db.insert_patient(&Patient::new("Rahim")).unwrap();
        db.insert_patient(&Patient::new("Rahim")).unwrap();
        let resolver = NameMatchResolver::new(&db);

        let resolution = resolver
            .resolve(&claim("Rahim", None, date(2024, 2, 1)))
            .unwrap();
        assert_eq!(resolution, Resolution::Matched(first));
    }

    #[test]
    fn test_candidate_id_takes_precedence_over_name() {
        let db = setup_db();
        let by_name = db.insert_patient(&Patient::new("Alice")).unwrap();
        let mut other = Patient::new("Alicia");
        other.age = "50".into();
        let candidate = db.insert_patient(&other).unwrap();
        let resolver = NameMatchResolver::new(&db);

        let mut c = claim("Alice", Some(51), date(2024, 3, 1));
        c.candidate_id = Some(candidate);
        let resolution = resolver.resolve(&c).unwrap();

        assert_eq!(resolution, Resolution::Candidate(candidate));
        let patient = db.get_patient(candidate).unwrap().unwrap();
        assert_eq!(patient.name, "Alicia");
        assert_eq!(patient.age, "51");
        assert_eq!(db.get_patient(by_name).unwrap().unwrap().last_visit, None);
    }

    #[test]
    fn test_unknown_candidate_falls_back_to_name() {
        let db = setup_db();
        let existing = db.insert_patient(&Patient::new("Alice")).unwrap();
        let resolver = NameMatchResolver::new(&db);

        let mut c = claim("Alice", None, date(2024, 3, 1));
        c.candidate_id = Some(existing + 100);
        assert_eq!(resolver.resolve(&c).unwrap(), Resolution::Matched(existing));
    }

    #[test]
    fn test_refresh_keeps_age_when_not_stated() {
        let db = setup_db();
        let mut patient = Patient::new("Alice");
        patient.age = "30".into();
        let id = db.insert_patient(&patient).unwrap();
        let resolver = NameMatchResolver::new(&db);

        resolver
            .resolve(&claim("Alice", None, date(2024, 3, 1)))
            .unwrap();
        assert_eq!(db.get_patient(id).unwrap().unwrap().age, "30");
    }

    #[test]
    fn test_blank_name_rejected() {
        let db = setup_db();
        let resolver = NameMatchResolver::new(&db);

        for name in ["", "   ", "\t\n"] {
            let result = resolver.resolve(&claim(name, Some(20), date(2024, 1, 1)));
            assert!(matches!(result, Err(ResolverError::InvalidInput(_))));
        }
        assert_eq!(db.count_patients().unwrap(), 0);
    }

    #[test]
    fn test_find_lookalikes() {
        let db = setup_db();
        db.insert_patient(&Patient::new("Mohammad Karim")).unwrap();
        db.insert_patient(&Patient::new("Fatema Begum")).unwrap();
        let resolver = NameMatchResolver::new(&db);

        let lookalikes = resolver.find_lookalikes("Mohammed Karim").unwrap();
        assert_eq!(lookalikes.len(), 1);
        assert_eq!(lookalikes[0].name, "Mohammad Karim");

        // Exact matches are not look-alikes
        assert!(resolver.find_lookalikes("mohammad karim").unwrap().is_empty());
    }

    #[test]
    fn test_lookalike_does_not_change_outcome() {
        let db = setup_db();
        db.insert_patient(&Patient::new("Mohammad Karim")).unwrap();
        let resolver = NameMatchResolver::new(&db).with_lookalike_threshold(0.5);

        let resolution = resolver
            .resolve(&claim("Mohammed Karim", None, date(2024, 1, 1)))
            .unwrap();
        assert!(resolution.is_new_patient());
        assert_eq!(db.count_patients().unwrap(), 2);
    }

    #[test]
    fn test_non_ascii_case_variant_is_a_lookalike() {
        let db = setup_db();
        db.insert_patient(&Patient::new("Amélie Durand")).unwrap();
        let resolver = NameMatchResolver::new(&db);

        assert_eq!(resolver.find_lookalikes("AMÉLIE DURAND").unwrap().len(), 1);
        assert!(resolver.find_lookalikes("amélie DURAND").unwrap().is_empty());

        let resolution = resolver
            .resolve(&claim("AMÉLIE DURAND", None, date(2024, 1, 10)))
            .unwrap();
        assert!(resolution.is_new_patient());
        assert_eq!(db.count_patients().unwrap(), 2);
    }
}
