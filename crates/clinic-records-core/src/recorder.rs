//! Visit recording.
//!
//! The recorder is the only component that writes patients and visits
//! together. Each operation runs in a single transaction so a visit is never
//! stored pointing at a patient write that did not land.

use chrono::NaiveDate;

use crate::db::Database;
use crate::error::{RecordError, RecordResult};
use crate::models::{Visit, VisitDraft};
use crate::resolver::{IdentityClaim, IdentityResolver, NameMatchResolver};

/// Today's date on the local calendar.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Records and edits visits, keeping patient records in step.
pub struct VisitRecorder<'a, R = NameMatchResolver<'a>> {
    db: &'a Database,
    resolver: R,
}

impl<'a> VisitRecorder<'a> {
    /// Create a recorder using name-based identity resolution.
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            resolver: NameMatchResolver::new(db),
        }
    }
}

impl<'a, R: IdentityResolver> VisitRecorder<'a, R> {
    /// Create a recorder with a custom identity resolver.
    pub fn with_resolver(db: &'a Database, resolver: R) -> Self {
        Self { db, resolver }
    }

    /// Record a new visit, resolving (or creating) its patient.
    ///
    /// The visit date defaults to today. The visit's name/age/gender snapshot
    /// is taken from the draft, not from the resolved patient.
    pub fn record_new_visit(&self, draft: VisitDraft) -> RecordResult<Visit> {
        let visit_date = draft.visit_date.unwrap_or_else(today);

        let tx = self.db.begin()?;
        let resolution = self.resolver.resolve(&IdentityClaim {
            candidate_id: draft.patient_id,
            name: &draft.snapshot.name,
            age: draft.snapshot.age,
            visit_date,
        })?;

        let mut visit = draft.into_visit(resolution.patient_id(), visit_date);
        visit.id = self.db.insert_visit(&visit)?;
        tx.commit()?;

        tracing::info!(
            visit_id = visit.id,
            patient_id = resolution.patient_id(),
            new_patient = resolution.is_new_patient(),
            "recorded visit"
        );
        Ok(visit)
    }

    /// Replace the content of an existing visit.
    ///
    /// Identity resolution is not re-run: the visit stays with its patient,
    /// whose name, age and last visit are refreshed from the edit. A patient
    /// that no longer exists is logged and skipped.
    pub fn update_visit(&self, id: i64, draft: VisitDraft) -> RecordResult<Visit> {
        let tx = self.db.begin()?;
        let mut visit = self
            .db
            .get_visit(id)?
            .ok_or_else(|| RecordError::visit_not_found(id))?;
        if draft.snapshot.name.trim().is_empty() {
            return Err(RecordError::Validation("patient name is required".into()));
        }
        visit.apply_edit(draft);

        if let Some(patient_id) = visit.patient_id {
            match self.db.get_patient(patient_id)? {
                Some(mut patient) => {
                    patient.name = visit.snapshot.name.trim().to_string();
                    patient.refresh_from_visit(visit.snapshot.age, visit.visit_date);
                    self.db.update_patient(&patient)?;
                }
                None => {
                    tracing::warn!(
                        visit_id = id,
                        patient_id,
                        "visit references a missing patient; updating the visit only"
                    );
                }
            }
        }

        self.db.update_visit(&visit)?;
        tx.commit()?;
        Ok(visit)
    }

    /// Delete a visit. Its patient is kept.
    pub fn delete_visit(&self, id: i64) -> RecordResult<()> {
        if !self.db.delete_visit(id)? {
            return Err(RecordError::visit_not_found(id));
        }
        Ok(())
    }

    /// Get a visit, failing when it does not exist.
    pub fn get_visit(&self, id: i64) -> RecordResult<Visit> {
        self.db
            .get_visit(id)?
            .ok_or_else(|| RecordError::visit_not_found(id))
    }

    /// All visits, newest first.
    pub fn list_visits(&self) -> RecordResult<Vec<Visit>> {
        Ok(self.db.list_visits()?)
    }

    /// Visit history of one patient, newest first.
    pub fn patient_history(&self, patient_id: i64) -> RecordResult<Vec<Visit>> {
        Ok(self.db.list_visits_for_patient(patient_id)?)
    }

    /// Visits whose recorded name contains `fragment`.
    pub fn search_visits_by_name(&self, fragment: &str) -> RecordResult<Vec<Visit>> {
        Ok(self.db.search_visits_by_name(fragment)?)
    }
}
