//! Patient management outside of visit recording.

use crate::db::Database;
use crate::error::{RecordError, RecordResult};
use crate::models::Patient;
use crate::recorder::today;

/// Explicit create/edit/delete of patient records.
///
/// Patients created here get today as their last visit, matching how the
/// front desk registers someone who is being seen now.
pub struct PatientManager<'a> {
    db: &'a Database,
}

impl<'a> PatientManager<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a patient. The `id` and `last_visit` of `patient` are ignored.
    pub fn create_patient(&self, mut patient: Patient) -> RecordResult<Patient> {
        patient.name = required_name(&patient.name)?;
        patient.last_visit = Some(today());
        patient.id = self.db.insert_patient(&patient)?;

        tracing::info!(patient_id = patient.id, "registered patient");
        Ok(patient)
    }

    /// Replace the details of patient `id`.
    pub fn update_patient(&self, id: i64, mut patient: Patient) -> RecordResult<Patient> {
        patient.name = required_name(&patient.name)?;
        patient.id = id;
        patient.last_visit = Some(today());

        if !self.db.update_patient(&patient)? {
            return Err(RecordError::patient_not_found(id));
        }
        Ok(patient)
    }

    /// Delete a patient. Recorded visits keep their patient ID.
    pub fn delete_patient(&self, id: i64) -> RecordResult<()> {
        if !self.db.delete_patient(id)? {
            return Err(RecordError::patient_not_found(id));
        }
        tracing::info!(patient_id = id, "deleted patient");
        Ok(())
    }

    pub fn get_patient(&self, id: i64) -> RecordResult<Patient> {
        self.db
            .get_patient(id)?
            .ok_or_else(|| RecordError::patient_not_found(id))
    }

    pub fn list_patients(&self) -> RecordResult<Vec<Patient>> {
        Ok(self.db.list_patients()?)
    }

    /// Patients whose name contains `fragment`, case-insensitively.
    pub fn search_by_name(&self, fragment: &str, limit: usize) -> RecordResult<Vec<Patient>> {
        Ok(self.db.search_patients_by_name(fragment, limit)?)
    }

    /// Patients whose phone number contains `fragment`.
    pub fn search_by_phone(&self, fragment: &str, limit: usize) -> RecordResult<Vec<Patient>> {
        Ok(self.db.search_patients_by_phone(fragment, limit)?)
    }
}

fn required_name(name: &str) -> RecordResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RecordError::Validation("patient name is required".into()));
    }
    Ok(trimmed.to_string())
}
