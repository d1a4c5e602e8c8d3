//! Visit (prescription) models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Patient attributes frozen onto a visit when it is recorded.
///
/// Kept separate from [`super::Patient`]: editing the patient later must not
/// rewrite prescription history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientSnapshot {
    /// Name as stated on the visit
    pub name: String,
    /// Age in years as stated on the visit
    pub age: Option<i32>,
    /// M/F/Other
    pub gender: Option<String>,
}

/// Free-text clinical sections of a prescription.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClinicalNotes {
    /// Chief complaint
    pub complaint: Option<String>,
    /// Medical history
    pub history: Option<String>,
    /// Physical examination findings
    pub on_examination: Option<String>,
    /// Lab tests/investigations ordered
    pub investigation: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
    /// Prescribed medicines
    pub medicine: Option<String>,
    pub advice: Option<String>,
    /// Follow-up instructions
    pub follow_up: Option<String>,
    /// Special notes
    pub notes: Option<String>,
}

/// A recorded visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    /// Surrogate ID assigned by the ledger
    pub id: i64,
    /// Owning patient, set by identity resolution
    pub patient_id: Option<i64>,
    /// Date of the visit
    pub visit_date: NaiveDate,
    #[serde(flatten)]
    pub snapshot: PatientSnapshot,
    #[serde(flatten)]
    pub clinical: ClinicalNotes,
    /// Suggested date for the next visit
    pub next_visit: Option<NaiveDate>,
}

/// Visit data as submitted by a client, before it has an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VisitDraft {
    /// Candidate patient ID, if the client knows it
    pub patient_id: Option<i64>,
    /// Defaults to today on creation; kept as-is on update when absent
    pub visit_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub snapshot: PatientSnapshot,
    #[serde(flatten)]
    pub clinical: ClinicalNotes,
    pub next_visit: Option<NaiveDate>,
}

impl VisitDraft {
    /// Create a draft carrying only the patient's stated name.
    pub fn for_patient(name: impl Into<String>) -> Self {
        Self {
            snapshot: PatientSnapshot {
                name: name.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Turn the draft into a visit bound to a resolved patient.
    pub fn into_visit(self, patient_id: i64, visit_date: NaiveDate) -> Visit {
        Visit {
            id: 0,
            patient_id: Some(patient_id),
            visit_date,
            snapshot: self.snapshot,
            clinical: self.clinical,
            next_visit: self.next_visit,
        }
    }
}

impl Visit {
    /// Replace the visit's content with an edited draft.
    ///
    /// Every field is replaced except the visit date, which only changes when
    /// the draft carries one. The patient link is never touched.
    pub fn apply_edit(&mut self, draft: VisitDraft) {
        if let Some(date) = draft.visit_date {
            self.visit_date = date;
        }
        self.snapshot = draft.snapshot;
        self.clinical = draft.clinical;
        self.next_visit = draft.next_visit;
    }
}
