//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Patient;

const PATIENT_COLUMNS: &str = "id, name, age, address, phone, blood_group, last_visit";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        address: row.get(3)?,
        phone: row.get(4)?,
        blood_group: row.get(5)?,
        last_visit: row.get(6)?,
    })
}

/// Build a `LIKE` pattern matching `fragment` anywhere, with wildcards escaped.
pub(crate) fn contains_pattern(fragment: &str) -> String {
    let escaped = fragment
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl Database {
    /// Insert a new patient, returning the assigned ID.
    ///
    /// The `id` field of `patient` is ignored.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                name, age, address, phone, blood_group, last_visit
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                patient.name,
                patient.age,
                patient.address,
                patient.phone,
                patient.blood_group,
                patient.last_visit,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update an existing patient.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                name = ?2,
                age = ?3,
                address = ?4,
                phone = ?5,
                blood_group = ?6,
                last_visit = ?7,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                patient.id,
                patient.name,
                patient.age,
                patient.address,
                patient.phone,
                patient.blood_group,
                patient.last_visit,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: i64) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Find the patient whose name equals `name`, ignoring ASCII case and
    /// surrounding whitespace.
    ///
    /// When several patients share the name the lowest ID wins.
    pub fn find_patient_by_name_exact(&self, name: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {PATIENT_COLUMNS} FROM patients
                     WHERE trim(name) = ?1 COLLATE NOCASE
                     ORDER BY id
                     LIMIT 1"
                ),
                [name.trim()],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Search patients whose name contains `query` (case-insensitive).
    pub fn search_patients_by_name(&self, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients
             WHERE name LIKE ?1 ESCAPE '\\'
             ORDER BY name COLLATE NOCASE, id
             LIMIT ?2"
        ))?;

        let rows = stmt.query_map(
            params![contains_pattern(query), limit as i64],
            patient_from_row,
        )?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Search patients whose phone number contains `query`.
    pub fn search_patients_by_phone(&self, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients
             WHERE phone LIKE ?1 ESCAPE '\\'
             ORDER BY name COLLATE NOCASE, id
             LIMIT ?2"
        ))?;

        let rows = stmt.query_map(
            params![contains_pattern(query), limit as i64],
            patient_from_row,
        )?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List all patients.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY name COLLATE NOCASE, id"
        ))?;

        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count stored patients.
    pub fn count_patients(&self) -> DbResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a patient. Visits referencing it are left untouched.
    pub fn delete_patient(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let mut patient = Patient::new("Alice");
        patient.age = "30".into();
        patient.blood_group = Some("O+".into());
        patient.last_visit = NaiveDate::from_ymd_opt(2024, 1, 10);

        let id = db.insert_patient(&patient).unwrap();
        assert!(id > 0);

        let retrieved = db.get_patient(id).unwrap().unwrap();
        assert_eq!(retrieved.id, id);
        assert_eq!(retrieved.name, "Alice");
        assert_eq!(retrieved.age, "30");
        assert_eq!(retrieved.blood_group, Some("O+".into()));
        assert_eq!(retrieved.last_visit, NaiveDate::from_ymd_opt(2024, 1, 10));
    }

    #[test]
    fn test_ids_are_distinct() {
        let db = setup_db();
        let first = db.insert_patient(&Patient::new("Alice")).unwrap();
        let second = db.insert_patient(&Patient::new("Bob")).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_update_patient() {
        let db = setup_db();

        let mut patient = Patient::new("Alice");
        patient.id = db.insert_patient(&patient).unwrap();

        patient.phone = Some("01711000000".into());
        patient.address = Some("12 Lake Road".into());
        assert!(db.update_patient(&patient).unwrap());

        let retrieved = db.get_patient(patient.id).unwrap().unwrap();
        assert_eq!(retrieved.phone, Some("01711000000".into()));
        assert_eq!(retrieved.address, Some("12 Lake Road".into()));
    }

    #[test]
    fn test_update_missing_patient() {
        let db = setup_db();
        let mut patient = Patient::new("Ghost");
        patient.id = 42;
        assert!(!db.update_patient(&patient).unwrap());
    }

    #[test]
    fn test_find_by_name_exact_ignores_case() {
        let db = setup_db();
        let id = db.insert_patient(&Patient::new("Alice")).unwrap();

        let found = db.find_patient_by_name_exact("  aLiCe ").unwrap().unwrap();
        assert_eq!(found.id, id);
    }

    #[test]
    fn test_find_by_name_exact_is_not_partial() {
        let db = setup_db();
        db.insert_patient(&Patient::new("Alice Smith")).unwrap();
        db.insert_patient(&Patient::new("Ali")).unwrap();

        assert!(db.find_patient_by_name_exact("Alice").unwrap().is_none());
    }

    #[test]
    fn test_find_by_name_exact_lowest_id_wins() {
        let db = setup_db();
        let first = db.insert_patient(&Patient::new("Rahim")).unwrap();
        db.insert_patient(&Patient::new("RAHIM")).unwrap();

        let found = db.find_patient_by_name_exact("rahim").unwrap().unwrap();
        assert_eq!(found.id, first);
    }

    #[test]
    fn test_search_patients_by_name() {
        let db = setup_db();
        db.insert_patient(&Patient::new("Maxwell")).unwrap();
        db.insert_patient(&Patient::new("Emily Max")).unwrap();
        db.insert_patient(&Patient::new("Luna")).unwrap();

        let results = db.search_patients_by_name("max", 10).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().any(|p| p.name == "Maxwell"));
        assert!(results.iter().any(|p| p.name == "Emily Max"));
    }

    #[test]
    fn test_search_escapes_wildcards() {
        let db = setup_db();
        db.insert_patient(&Patient::new("Alice")).unwrap();

        assert!(db.search_patients_by_name("%", 10).unwrap().is_empty());
        assert!(db.search_patients_by_name("_", 10).unwrap().is_empty());
    }

    #[test]
    fn test_search_patients_by_phone() {
        let db = setup_db();
        let mut patient = Patient::new("Alice");
        patient.phone = Some("+8801711223344".into());
        db.insert_patient(&patient).unwrap();
        db.insert_patient(&Patient::new("Bob")).unwrap();

        let results = db.search_patients_by_phone("1122", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Alice");
    }

    #[test]
    fn test_delete_patient() {
        let db = setup_db();
        let id = db.insert_patient(&Patient::new("Alice")).unwrap();

        assert!(db.delete_patient(id).unwrap());
        assert!(!db.delete_patient(id).unwrap());
        assert!(db.get_patient(id).unwrap().is_none());
        assert_eq!(db.count_patients().unwrap(), 0);
    }
}
