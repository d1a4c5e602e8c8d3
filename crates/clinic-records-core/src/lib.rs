//! Clinic Records Core Library
//!
//! Local-first clinic records: patients, prescriptions (visits), a medicine
//! catalog and free-text suggestion templates, stored in SQLite.
//!
//! # Architecture
//!
//! ```text
//!   Visit draft (name, age, optional patient ID, clinical notes)
//!                          │
//!                          ▼
//!   ┌──────────────────────────────────────────────┐
//!   │ VisitRecorder            (one transaction)   │
//!   │   IdentityResolver → patient ID              │
//!   │     candidate ID │ exact name │ new patient  │
//!   │   refresh patient age / last visit           │
//!   │   insert visit with name/age/gender snapshot │
//!   └──────────────────────┬───────────────────────┘
//!                          │
//!              ┌───────────┴───────────┐
//!              ▼                       ▼
//!        patients table          visits table ──► DayWiseReporter
//! ```
//!
//! # Core Principle
//!
//! **No client supplies a reliable patient identifier.** Every recorded visit
//! is reconciled to a patient record by the resolver, and the visit keeps its
//! own snapshot of what was stated at the time.
//!
//! # Modules
//!
//! - [`db`]: SQLite stores (patients, visits, medicines with FTS5, templates)
//! - [`models`]: Domain types (Patient, Visit, Medicine, SuggestionTemplate)
//! - [`resolver`]: Patient identity resolution
//! - [`recorder`]: Visit create/update/delete coupled to patient records
//! - [`patients`]: Explicit patient management
//! - [`report`]: Day-wise visit reporting and export
//! - [`config`]: Startup configuration

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod patients;
pub mod recorder;
pub mod report;
pub mod resolver;

// Re-export commonly used types
pub use config::{ClinicConfig, ConfigError, DatabaseLocation};
pub use db::{Database, DayCount, DbError};
pub use error::{RecordError, RecordResult};
pub use models::{
    ClinicalNotes, Medicine, Patient, PatientSnapshot, SuggestionKind, SuggestionTemplate, Visit,
    VisitDraft,
};
pub use patients::PatientManager;
pub use recorder::VisitRecorder;
pub use report::{DayWiseReport, DayWiseReporter};
pub use resolver::{IdentityClaim, IdentityResolver, NameMatchResolver, Resolution};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for ClinicError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(what) => ClinicError::NotFound(what),
            db::DbError::Constraint(msg) => ClinicError::InvalidInput(msg),
            other => ClinicError::DatabaseError(other.to_string()),
        }
    }
}

impl From<RecordError> for ClinicError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::Validation(msg) => ClinicError::InvalidInput(msg),
            e @ RecordError::NotFound { .. } => ClinicError::NotFound(e.to_string()),
            RecordError::Database(e) => e.into(),
        }
    }
}

impl From<ConfigError> for ClinicError {
    fn from(e: ConfigError) -> Self {
        ClinicError::InvalidInput(e.to_string())
    }
}

impl From<models::UnknownSuggestionKind> for ClinicError {
    fn from(e: models::UnknownSuggestionKind) -> Self {
        ClinicError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for ClinicError {
    fn from(e: serde_json::Error) -> Self {
        ClinicError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path with default settings.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<ClinicCore>, ClinicError> {
    ClinicCore::open(ClinicConfig::new(path))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<ClinicCore>, ClinicError> {
    ClinicCore::open(ClinicConfig::in_memory())
}

/// Open a database from raw configuration values.
///
/// Blank values fall back to defaults; a missing path selects an in-memory
/// store.
#[uniffi::export]
pub fn open_database_with_config(
    database: Option<String>,
    suggestion_limit: Option<String>,
    top_medicines_limit: Option<String>,
    lookalike_threshold: Option<String>,
) -> Result<Arc<ClinicCore>, ClinicError> {
    let config = ClinicConfig::from_values(
        database,
        suggestion_limit,
        top_medicines_limit,
        lookalike_threshold,
    )?;
    ClinicCore::open(config)
}

/// Install a `tracing` subscriber writing to stderr.
///
/// `directive` uses `EnvFilter` syntax (e.g. `"clinic_records_core=debug"`).
/// Calling it again after a subscriber is installed has no effect.
#[uniffi::export]
pub fn init_logging(directive: String) -> Result<(), ClinicError> {
    let filter = tracing_subscriber::EnvFilter::try_new(&directive)
        .map_err(|e| ClinicError::InvalidInput(e.to_string()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
///
/// The mutex serializes every operation, so two visits for the same new
/// patient can never race into duplicate patient records.
#[derive(uniffi::Object)]
pub struct ClinicCore {
    db: Arc<Mutex<Database>>,
    config: ClinicConfig,
}

impl ClinicCore {
    fn open(config: ClinicConfig) -> Result<Arc<Self>, ClinicError> {
        let db = Database::open_with_config(&config)?;
        tracing::info!(database = ?config.database(), "opened clinic database");
        Ok(Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            config,
        }))
    }

    fn recorder<'a>(&self, db: &'a Database) -> VisitRecorder<'a> {
        let resolver =
            NameMatchResolver::new(db).with_lookalike_threshold(self.config.lookalike_threshold());
        VisitRecorder::with_resolver(db, resolver)
    }
}

#[uniffi::export]
impl ClinicCore {
    // =========================================================================
    // Visit Operations
    // =========================================================================

    /// Record a new visit, resolving or creating its patient.
    pub fn record_new_visit(&self, draft: FfiVisitDraft) -> Result<FfiVisit, ClinicError> {
        let db = self.db.lock()?;
        let visit = self.recorder(&db).record_new_visit(draft.try_into()?)?;
        Ok(visit.into())
    }

    /// Replace the content of an existing visit.
    pub fn update_visit(&self, id: i64, draft: FfiVisitDraft) -> Result<FfiVisit, ClinicError> {
        let db = self.db.lock()?;
        let visit = self.recorder(&db).update_visit(id, draft.try_into()?)?;
        Ok(visit.into())
    }

    pub fn delete_visit(&self, id: i64) -> Result<(), ClinicError> {
        let db = self.db.lock()?;
        self.recorder(&db).delete_visit(id)?;
        Ok(())
    }

    pub fn get_visit(&self, id: i64) -> Result<FfiVisit, ClinicError> {
        let db = self.db.lock()?;
        Ok(self.recorder(&db).get_visit(id)?.into())
    }

    /// All visits, newest first.
    pub fn list_visits(&self) -> Result<Vec<FfiVisit>, ClinicError> {
        let db = self.db.lock()?;
        let visits = self.recorder(&db).list_visits()?;
        Ok(visits.into_iter().map(|v| v.into()).collect())
    }

    /// Visit history of a patient, newest first.
    pub fn patient_history(&self, patient_id: i64) -> Result<Vec<FfiVisit>, ClinicError> {
        let db = self.db.lock()?;
        let visits = self.recorder(&db).patient_history(patient_id)?;
        Ok(visits.into_iter().map(|v| v.into()).collect())
    }

    pub fn search_visits_by_name(&self, query: String) -> Result<Vec<FfiVisit>, ClinicError> {
        let db = self.db.lock()?;
        let visits = self.recorder(&db).search_visits_by_name(&query)?;
        Ok(visits.into_iter().map(|v| v.into()).collect())
    }

    // =========================================================================
    // Report Operations
    // =========================================================================

    /// Visit counts per day within the inclusive window.
    pub fn day_wise_counts(
        &self,
        start: Option<String>,
        end: Option<String>,
    ) -> Result<Vec<FfiDayCount>, ClinicError> {
        let (start, end) = (parse_optional_date("start", start)?, parse_optional_date("end", end)?);
        let db = self.db.lock()?;
        let counts = DayWiseReporter::new(&db).day_wise_counts(start, end)?;
        Ok(counts.into_iter().map(|c| c.into()).collect())
    }

    /// Export the day-wise report as JSON.
    pub fn export_day_wise_json(
        &self,
        start: Option<String>,
        end: Option<String>,
    ) -> Result<String, ClinicError> {
        let (start, end) = (parse_optional_date("start", start)?, parse_optional_date("end", end)?);
        let db = self.db.lock()?;
        let report = DayWiseReporter::new(&db).report(start, end)?;
        Ok(report.to_json()?)
    }

    /// Export the day-wise report as CSV.
    pub fn export_day_wise_csv(
        &self,
        start: Option<String>,
        end: Option<String>,
    ) -> Result<String, ClinicError> {
        let (start, end) = (parse_optional_date("start", start)?, parse_optional_date("end", end)?);
        let db = self.db.lock()?;
        let report = DayWiseReporter::new(&db).report(start, end)?;
        Ok(report.to_csv())
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    pub fn create_patient(&self, details: FfiPatientDetails) -> Result<FfiPatient, ClinicError> {
        let db = self.db.lock()?;
        let patient = PatientManager::new(&db).create_patient(details.into())?;
        Ok(patient.into())
    }

    pub fn update_patient(
        &self,
        id: i64,
        details: FfiPatientDetails,
    ) -> Result<FfiPatient, ClinicError> {
        let db = self.db.lock()?;
        let patient = PatientManager::new(&db).update_patient(id, details.into())?;
        Ok(patient.into())
    }

    pub fn delete_patient(&self, id: i64) -> Result<(), ClinicError> {
        let db = self.db.lock()?;
        PatientManager::new(&db).delete_patient(id)?;
        Ok(())
    }

    pub fn get_patient(&self, id: i64) -> Result<FfiPatient, ClinicError> {
        let db = self.db.lock()?;
        Ok(PatientManager::new(&db).get_patient(id)?.into())
    }

    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, ClinicError> {
        let db = self.db.lock()?;
        let patients = PatientManager::new(&db).list_patients()?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    /// Search patients by name fragment.
    pub fn search_patients_by_name(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiPatient>, ClinicError> {
        let db = self.db.lock()?;
        let patients = PatientManager::new(&db).search_by_name(&query, limit as usize)?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    /// Search patients by phone fragment.
    pub fn search_patients_by_phone(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiPatient>, ClinicError> {
        let db = self.db.lock()?;
        let patients = PatientManager::new(&db).search_by_phone(&query, limit as usize)?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Medicine Catalog Operations
    // =========================================================================

    /// Add a medicine to the catalog. Its usage counter starts at zero.
    pub fn add_medicine(&self, medicine: FfiMedicine) -> Result<FfiMedicine, ClinicError> {
        let db = self.db.lock()?;
        let mut medicine: Medicine = medicine.into();
        medicine.id = db.insert_medicine(&medicine)?;
        medicine.occurrence = 0;
        Ok(medicine.into())
    }

    /// Update catalog details; the usage counter is kept.
    pub fn update_medicine(&self, medicine: FfiMedicine) -> Result<(), ClinicError> {
        let db = self.db.lock()?;
        let id = medicine.id;
        if !db.update_medicine(&medicine.into())? {
            return Err(ClinicError::NotFound(format!("medicine {id}")));
        }
        Ok(())
    }

    pub fn get_medicine(&self, id: i64) -> Result<Option<FfiMedicine>, ClinicError> {
        let db = self.db.lock()?;
        Ok(db.get_medicine(id)?.map(|m| m.into()))
    }

    pub fn delete_medicine(&self, id: i64) -> Result<bool, ClinicError> {
        let db = self.db.lock()?;
        Ok(db.delete_medicine(id)?)
    }

    pub fn list_medicines(&self) -> Result<Vec<FfiMedicine>, ClinicError> {
        let db = self.db.lock()?;
        let medicines = db.list_medicines()?;
        Ok(medicines.into_iter().map(|m| m.into()).collect())
    }

    /// Search brand and generic names.
    pub fn search_medicines(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiMedicine>, ClinicError> {
        let db = self.db.lock()?;
        let medicines = db.search_medicines(&query, limit as usize)?;
        Ok(medicines.into_iter().map(|m| m.into()).collect())
    }

    /// Most prescribed medicines, up to the configured limit.
    pub fn top_medicines(&self) -> Result<Vec<FfiMedicine>, ClinicError> {
        let db = self.db.lock()?;
        let medicines = db.top_medicines(self.config.top_medicines_limit())?;
        Ok(medicines.into_iter().map(|m| m.into()).collect())
    }

    /// Count one more use of a medicine.
    pub fn record_medicine_use(&self, id: i64) -> Result<(), ClinicError> {
        let db = self.db.lock()?;
        if !db.increment_medicine_occurrence(id)? {
            return Err(ClinicError::NotFound(format!("medicine {id}")));
        }
        Ok(())
    }

    // =========================================================================
    // Suggestion Template Operations
    // =========================================================================

    /// Add a template; returns false when it already existed.
    pub fn add_template(&self, kind: String, content: String) -> Result<bool, ClinicError> {
        let kind: SuggestionKind = kind.parse()?;
        let db = self.db.lock()?;
        Ok(db.add_template(kind, &content)?)
    }

    /// Most used templates of a kind, up to the configured limit.
    pub fn top_templates(&self, kind: String) -> Result<Vec<FfiTemplate>, ClinicError> {
        let kind: SuggestionKind = kind.parse()?;
        let db = self.db.lock()?;
        let templates = db.top_templates(kind, self.config.suggestion_limit())?;
        Ok(templates.into_iter().map(|t| t.into()).collect())
    }

    pub fn search_templates(
        &self,
        kind: String,
        query: String,
    ) -> Result<Vec<FfiTemplate>, ClinicError> {
        let kind: SuggestionKind = kind.parse()?;
        let db = self.db.lock()?;
        let templates = db.search_templates(kind, &query, self.config.suggestion_limit())?;
        Ok(templates.into_iter().map(|t| t.into()).collect())
    }

    /// Count one more use of a template.
    pub fn record_template_use(&self, kind: String, content: String) -> Result<(), ClinicError> {
        let kind: SuggestionKind = kind.parse()?;
        let db = self.db.lock()?;
        if !db.increment_template_occurrence(kind, &content)? {
            return Err(ClinicError::NotFound(format!("{kind} template")));
        }
        Ok(())
    }

    pub fn delete_template(&self, kind: String, content: String) -> Result<bool, ClinicError> {
        let kind: SuggestionKind = kind.parse()?;
        let db = self.db.lock()?;
        Ok(db.delete_template(kind, &content)?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

const DATE_FORMAT: &str = "%Y-%m-%d";

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse an optional `YYYY-MM-DD` string; blank counts as absent.
fn parse_optional_date(field: &str, value: Option<String>) -> Result<Option<NaiveDate>, ClinicError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Some)
            .map_err(|e| ClinicError::InvalidInput(format!("{field}: {s:?} is not a YYYY-MM-DD date ({e})"))),
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: i64,
    pub name: String,
    pub age: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub blood_group: Option<String>,
    pub last_visit: Option<String>,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            age: patient.age,
            address: patient.address,
            phone: patient.phone,
            blood_group: patient.blood_group,
            last_visit: patient.last_visit.map(format_date),
        }
    }
}

/// Editable patient details for create/update.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientDetails {
    pub name: String,
    pub age: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub blood_group: Option<String>,
}

impl From<FfiPatientDetails> for Patient {
    fn from(details: FfiPatientDetails) -> Self {
        Patient {
            address: details.address,
            phone: details.phone,
            blood_group: details.blood_group,
            age: details.age,
            ..Patient::new(details.name)
        }
    }
}

/// FFI-safe visit.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisit {
    pub id: i64,
    pub patient_id: Option<i64>,
    pub visit_date: String,
    pub patient_name: String,
    pub patient_age: Option<i32>,
    pub gender: Option<String>,
    pub complaint: Option<String>,
    pub history: Option<String>,
    pub on_examination: Option<String>,
    pub investigation: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
    pub medicine: Option<String>,
    pub advice: Option<String>,
    pub follow_up: Option<String>,
    pub notes: Option<String>,
    pub next_visit: Option<String>,
}

impl From<Visit> for FfiVisit {
    fn from(visit: Visit) -> Self {
        let c = visit.clinical;
        Self {
            id: visit.id,
            patient_id: visit.patient_id,
            visit_date: format_date(visit.visit_date),
            patient_name: visit.snapshot.name,
            patient_age: visit.snapshot.age,
            gender: visit.snapshot.gender,
            complaint: c.complaint,
            history: c.history,
            on_examination: c.on_examination,
            investigation: c.investigation,
            diagnosis: c.diagnosis,
            treatment_plan: c.treatment_plan,
            medicine: c.medicine,
            advice: c.advice,
            follow_up: c.follow_up,
            notes: c.notes,
            next_visit: visit.next_visit.map(format_date),
        }
    }
}

/// Visit data submitted for create/update.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitDraft {
    pub patient_id: Option<i64>,
    pub visit_date: Option<String>,
    pub patient_name: String,
    pub patient_age: Option<i32>,
    pub gender: Option<String>,
    pub complaint: Option<String>,
    pub history: Option<String>,
    pub on_examination: Option<String>,
    pub investigation: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
    pub medicine: Option<String>,
    pub advice: Option<String>,
    pub follow_up: Option<String>,
    pub notes: Option<String>,
    pub next_visit: Option<String>,
}

impl TryFrom<FfiVisitDraft> for VisitDraft {
    type Error = ClinicError;

    fn try_from(draft: FfiVisitDraft) -> Result<Self, Self::Error> {
        Ok(VisitDraft {
            patient_id: draft.patient_id,
            visit_date: parse_optional_date("visit_date", draft.visit_date)?,
            snapshot: PatientSnapshot {
                name: draft.patient_name,
                age: draft.patient_age,
                gender: draft.gender,
            },
            clinical: ClinicalNotes {
                complaint: draft.complaint,
                history: draft.history,
                on_examination: draft.on_examination,
                investigation: draft.investigation,
                diagnosis: draft.diagnosis,
                treatment_plan: draft.treatment_plan,
                medicine: draft.medicine,
                advice: draft.advice,
                follow_up: draft.follow_up,
                notes: draft.notes,
            },
            next_visit: parse_optional_date("next_visit", draft.next_visit)?,
        })
    }
}

/// FFI-safe day bucket.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDayCount {
    pub day: String,
    pub count: u32,
}

impl From<DayCount> for FfiDayCount {
    fn from(count: DayCount) -> Self {
        Self {
            day: format_date(count.day),
            count: count.count,
        }
    }
}

/// FFI-safe medicine.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub id: i64,
    pub manufacturer_name: Option<String>,
    pub brand_name: String,
    pub generic_name: Option<String>,
    pub strength: Option<String>,
    pub medicine_type: Option<String>,
    pub dosage_description: Option<String>,
    pub occurrence: i64,
}

impl From<Medicine> for FfiMedicine {
    fn from(m: Medicine) -> Self {
        Self {
            id: m.id,
            manufacturer_name: m.manufacturer_name,
            brand_name: m.brand_name,
            generic_name: m.generic_name,
            strength: m.strength,
            medicine_type: m.medicine_type,
            dosage_description: m.dosage_description,
            occurrence: m.occurrence,
        }
    }
}

impl From<FfiMedicine> for Medicine {
    fn from(m: FfiMedicine) -> Self {
        Medicine {
            id: m.id,
            manufacturer_name: m.manufacturer_name,
            brand_name: m.brand_name,
            generic_name: m.generic_name,
            strength: m.strength,
            medicine_type: m.medicine_type,
            dosage_description: m.dosage_description,
            occurrence: m.occurrence,
        }
    }
}

/// FFI-safe suggestion template.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTemplate {
    pub kind: String,
    pub content: String,
    pub occurrence: i64,
}

impl From<SuggestionTemplate> for FfiTemplate {
    fn from(t: SuggestionTemplate) -> Self {
        Self {
            kind: t.kind.to_string(),
            content: t.content,
            occurrence: t.occurrence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, day: Option<&str>) -> FfiVisitDraft {
        FfiVisitDraft {
            patient_id: None,
            visit_date: day.map(String::from),
            patient_name: name.to_string(),
            patient_age: Some(30),
            gender: None,
            complaint: None,
            history: None,
            on_examination: None,
            investigation: None,
            diagnosis: None,
            treatment_plan: None,
            medicine: None,
            advice: None,
            follow_up: None,
            notes: None,
            next_visit: None,
        }
    }

    #[test]
    fn test_record_and_report() {
        let core = open_database_in_memory().unwrap();
        core.record_new_visit(draft("Alice", Some("2024-01-10"))).unwrap();
        core.record_new_visit(draft("alice", Some("2024-01-10"))).unwrap();

        assert_eq!(core.list_patients().unwrap().len(), 1);
        let counts = core.day_wise_counts(None, None).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].day, "2024-01-10");
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn test_malformed_date_rejected() {
        let core = open_database_in_memory().unwrap();
        let result = core.record_new_visit(draft("Alice", Some("10/01/2024")));
        assert!(matches!(result, Err(ClinicError::InvalidInput(_))));
        assert!(core.list_visits().unwrap().is_empty());
    }

    #[test]
    fn test_error_mapping() {
        let core = open_database_in_memory().unwrap();
        assert!(matches!(
            core.record_new_visit(draft(" ", None)),
            Err(ClinicError::InvalidInput(_))
        ));
        assert!(matches!(core.get_visit(5), Err(ClinicError::NotFound(_))));
        assert!(matches!(
            core.top_templates("prognosis".into()),
            Err(ClinicError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_config_values_validated() {
        let result = open_database_with_config(None, None, None, Some("1.5".into()));
        assert!(matches!(result, Err(ClinicError::InvalidInput(_))));

        let core = open_database_with_config(None, Some("2".into()), None, None).unwrap();
        for content in ["Fever", "Cough", "Headache"] {
            core.add_template("diagnosis".into(), content.into()).unwrap();
        }
        assert_eq!(core.top_templates("diagnosis".into()).unwrap().len(), 2);
    }

    #[test]
    fn test_medicine_usage() {
        let core = open_database_in_memory().unwrap();
        let added = core
            .add_medicine(FfiMedicine {
                id: 0,
                manufacturer_name: Some("Square".into()),
                brand_name: "Napa".into(),
                generic_name: Some("Paracetamol".into()),
                strength: Some("500mg".into()),
                medicine_type: Some("Tablet".into()),
                dosage_description: None,
                occurrence: 9,
            })
            .unwrap();
        assert_eq!(added.occurrence, 0);

        core.record_medicine_use(added.id).unwrap();
        let top = core.top_medicines().unwrap();
        assert_eq!(top[0].brand_name, "Napa");
        assert_eq!(top[0].occurrence, 1);

        assert!(matches!(core.record_medicine_use(99), Err(ClinicError::NotFound(_))));
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging("clinic_records_core=debug".into()).unwrap();
        init_logging("info".into()).unwrap();
    }
}
