//! Visit ledger operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use super::patients::contains_pattern;
use super::{Database, DbResult};
use crate::models::{ClinicalNotes, PatientSnapshot, Visit};

const VISIT_COLUMNS: &str = "id, patient_id, visit_date, patient_name, patient_age, gender, \
     complaint, history, on_examination, investigation, diagnosis, treatment_plan, \
     medicine, advice, follow_up, notes, next_visit";

fn visit_from_row(row: &Row<'_>) -> rusqlite::Result<Visit> {
    Ok(Visit {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        visit_date: row.get(2)?,
        snapshot: PatientSnapshot {
            name: row.get(3)?,
            age: row.get(4)?,
            gender: row.get(5)?,
        },
        clinical: ClinicalNotes {
            complaint: row.get(6)?,
            history: row.get(7)?,
            on_examination: row.get(8)?,
            investigation: row.get(9)?,
            diagnosis: row.get(10)?,
            treatment_plan: row.get(11)?,
            medicine: row.get(12)?,
            advice: row.get(13)?,
            follow_up: row.get(14)?,
            notes: row.get(15)?,
        },
        next_visit: row.get(16)?,
    })
}

/// Number of visits recorded on one calendar day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayCount {
    pub day: NaiveDate,
    pub count: u32,
}

impl Database {
    /// Insert a new visit, returning the assigned ID.
    ///
    /// The `id` field of `visit` is ignored.
    pub fn insert_visit(&self, visit: &Visit) -> DbResult<i64> {
        let c = &visit.clinical;
        self.conn.execute(
            r#"
            INSERT INTO visits (
                patient_id, visit_date, patient_name, patient_age, gender,
                complaint, history, on_examination, investigation, diagnosis,
                treatment_plan, medicine, advice, follow_up, notes, next_visit
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                visit.patient_id,
                visit.visit_date,
                visit.snapshot.name,
                visit.snapshot.age,
                visit.snapshot.gender,
                c.complaint,
                c.history,
                c.on_examination,
                c.investigation,
                c.diagnosis,
                c.treatment_plan,
                c.medicine,
                c.advice,
                c.follow_up,
                c.notes,
                visit.next_visit,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrite a stored visit in place.
    pub fn update_visit(&self, visit: &Visit) -> DbResult<bool> {
        let c = &visit.clinical;
        let rows_affected = self.conn.execute(
            r#"
            UPDATE visits SET
                patient_id = ?2,
                visit_date = ?3,
                patient_name = ?4,
                patient_age = ?5,
                gender = ?6,
                complaint = ?7,
                history = ?8,
                on_examination = ?9,
                investigation = ?10,
                diagnosis = ?11,
                treatment_plan = ?12,
                medicine = ?13,
                advice = ?14,
                follow_up = ?15,
                notes = ?16,
                next_visit = ?17,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                visit.id,
                visit.patient_id,
                visit.visit_date,
                visit.snapshot.name,
                visit.snapshot.age,
                visit.snapshot.gender,
                c.complaint,
                c.history,
                c.on_examination,
                c.investigation,
                c.diagnosis,
                c.treatment_plan,
                c.medicine,
                c.advice,
                c.follow_up,
                c.notes,
                visit.next_visit,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a visit by ID.
    pub fn get_visit(&self, id: i64) -> DbResult<Option<Visit>> {
        self.conn
            .query_row(
                &format!("SELECT {VISIT_COLUMNS} FROM visits WHERE id = ?"),
                [id],
                visit_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All visits of a patient, newest first.
    pub fn list_visits_for_patient(&self, patient_id: i64) -> DbResult<Vec<Visit>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits
             WHERE patient_id = ?
             ORDER BY visit_date DESC, id DESC"
        ))?;

        let rows = stmt.query_map([patient_id], visit_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Visits dated within `[start, end]`; a missing bound is open.
    pub fn list_visits_in_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> DbResult<Vec<Visit>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits
             WHERE (?1 IS NULL OR visit_date >= ?1)
               AND (?2 IS NULL OR visit_date <= ?2)
             ORDER BY visit_date, id"
        ))?;

        let rows = stmt.query_map(params![start, end], visit_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Visits whose recorded patient name contains `query` (case-insensitive).
    pub fn search_visits_by_name(&self, query: &str) -> DbResult<Vec<Visit>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits
             WHERE patient_name LIKE ?1 ESCAPE '\\'
             ORDER BY visit_date DESC, id DESC"
        ))?;

        let rows = stmt.query_map([contains_pattern(query)], visit_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List all visits, newest first.
    pub fn list_visits(&self) -> DbResult<Vec<Visit>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits ORDER BY visit_date DESC, id DESC"
        ))?;

        let rows = stmt.query_map([], visit_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Count stored visits.
    pub fn count_visits(&self) -> DbResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM visits", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a visit. The referenced patient is left untouched.
    pub fn delete_visit(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM visits WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Count visits per calendar day within `[start, end]`, ascending by day.
    pub fn day_wise_counts(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> DbResult<Vec<DayCount>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT visit_date, COUNT(*)
            FROM visits
            WHERE (?1 IS NULL OR visit_date >= ?1)
              AND (?2 IS NULL OR visit_date <= ?2)
            GROUP BY visit_date
            ORDER BY visit_date
            "#,
        )?;

        let rows = stmt.query_map(params![start, end], |row| {
            Ok(DayCount {
                day: row.get(0)?,
                count: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
