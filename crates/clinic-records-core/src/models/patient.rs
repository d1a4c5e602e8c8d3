//! Patient models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A patient record.
///
/// `age` is kept as free text the way the clinic records it ("34", "6 months").
/// `last_visit` tracks the latest visit date seen for the patient and never
/// moves backwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Surrogate ID assigned by the store, 0 until inserted
    pub id: i64,
    /// Display name, never empty once persisted
    pub name: String,
    /// Age as text, empty when unknown
    pub age: String,
    /// Residential address
    pub address: Option<String>,
    /// Contact number
    pub phone: Option<String>,
    /// Blood group (A+, O-, ...)
    pub blood_group: Option<String>,
    /// Date of the most recent visit
    pub last_visit: Option<NaiveDate>,
}

impl Patient {
    /// Create an unsaved patient with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            age: String::new(),
            address: None,
            phone: None,
            blood_group: None,
            last_visit: None,
        }
    }

    /// Whether the store has assigned an ID yet.
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    /// Apply the denormalized fields carried by a new visit.
    ///
    /// The stored age is only replaced when the visit states one. An older
    /// visit date leaves `last_visit` alone.
    pub fn refresh_from_visit(&mut self, age: Option<i32>, visit_date: NaiveDate) {
        if let Some(age) = age {
            self.age = age.to_string();
        }
        self.last_visit = Some(self.last_visit.map_or(visit_date, |last| last.max(visit_date)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_patient() {
        let patient = Patient::new("Alice");
        assert_eq!(patient.name, "Alice");
        assert_eq!(patient.age, "");
        assert!(patient.last_visit.is_none());
        assert!(!patient.is_persisted());
    }

    #[test]
    fn test_refresh_keeps_age_when_absent() {
        let mut patient = Patient::new("Alice");
        patient.age = "30".into();
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        patient.refresh_from_visit(None, date);
        assert_eq!(patient.age, "30");
        assert_eq!(patient.last_visit, Some(date));

        patient.refresh_from_visit(Some(31), date);
        assert_eq!(patient.age, "31");
    }

    #[test]
    fn test_refresh_never_moves_last_visit_back() {
        let mut patient = Patient::new("Alice");
        let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let january = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

        patient.refresh_from_visit(None, march);
        patient.refresh_from_visit(Some(29), january);
        assert_eq!(patient.last_visit, Some(march));
        assert_eq!(patient.age, "29");
    }
}
