//! Medicine catalog database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Medicine;

const MEDICINE_COLUMNS: &str = "id, manufacturer_name, brand_name, generic_name, strength, \
     medicine_type, dosage_description, occurrence";

fn medicine_from_row(row: &Row<'_>) -> rusqlite::Result<Medicine> {
    Ok(Medicine {
        id: row.get(0)?,
        manufacturer_name: row.get(1)?,
        brand_name: row.get(2)?,
        generic_name: row.get(3)?,
        strength: row.get(4)?,
        medicine_type: row.get(5)?,
        dosage_description: row.get(6)?,
        occurrence: row.get(7)?,
    })
}

impl Database {
    /// Insert a new medicine, returning the assigned ID. Usage starts at zero.
    pub fn insert_medicine(&self, medicine: &Medicine) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO medicines (
                manufacturer_name, brand_name, generic_name, strength,
                medicine_type, dosage_description, occurrence
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)
            "#,
            params![
                medicine.manufacturer_name,
                medicine.brand_name,
                medicine.generic_name,
                medicine.strength,
                medicine.medicine_type,
                medicine.dosage_description,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update descriptive fields of a medicine. The usage counter is kept.
    pub fn update_medicine(&self, medicine: &Medicine) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE medicines SET
                manufacturer_name = ?2,
                brand_name = ?3,
                generic_name = ?4,
                strength = ?5,
                medicine_type = ?6,
                dosage_description = ?7,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                medicine.id,
                medicine.manufacturer_name,
                medicine.brand_name,
                medicine.generic_name,
                medicine.strength,
                medicine.medicine_type,
                medicine.dosage_description,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a medicine by ID.
    pub fn get_medicine(&self, id: i64) -> DbResult<Option<Medicine>> {
        self.conn
            .query_row(
                &format!("SELECT {MEDICINE_COLUMNS} FROM medicines WHERE id = ?"),
                [id],
                medicine_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Search brand and generic names using FTS5 (BM25 ranking).
    pub fn search_medicines(&self, query: &str, limit: usize) -> DbResult<Vec<Medicine>> {
        let escaped_query = escape_fts_query(query);
        if escaped_query.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT m.id, m.manufacturer_name, m.brand_name, m.generic_name, m.strength,
                   m.medicine_type, m.dosage_description, m.occurrence,
                   bm25(medicines_fts) as rank
            FROM medicines m
            JOIN medicines_fts fts ON m.id = fts.rowid
            WHERE medicines_fts MATCH ?
            ORDER BY rank, m.occurrence DESC
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map(params![escaped_query, limit as i64], medicine_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Most used medicines first.
    pub fn top_medicines(&self, limit: usize) -> DbResult<Vec<Medicine>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MEDICINE_COLUMNS} FROM medicines
             ORDER BY occurrence DESC, brand_name COLLATE NOCASE
             LIMIT ?"
        ))?;

        let rows = stmt.query_map([limit as i64], medicine_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// List the whole catalog.
    pub fn list_medicines(&self) -> DbResult<Vec<Medicine>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MEDICINE_COLUMNS} FROM medicines ORDER BY brand_name COLLATE NOCASE, id"
        ))?;

        let rows = stmt.query_map([], medicine_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Bump the usage counter of a medicine.
    pub fn increment_medicine_occurrence(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE medicines SET occurrence = occurrence + 1, updated_at = datetime('now') WHERE id = ?",
            [id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a medicine.
    pub fn delete_medicine(&self, id: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM medicines WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Escape special FTS5 characters and prepare query for prefix matching.
fn escape_fts_query(query: &str) -> String {
    let cleaned: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .map(|word| format!("{}*", word))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_medicine(brand: &str, generic: &str) -> Medicine {
        let mut medicine = Medicine::new(brand);
        medicine.generic_name = Some(generic.into());
        medicine.strength = Some("500mg".into());
        medicine.medicine_type = Some("Tablet".into());
        medicine
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let mut medicine = make_medicine("Napa", "Paracetamol");
        medicine.occurrence = 99;
        let id = db.insert_medicine(&medicine).unwrap();

        let retrieved = db.get_medicine(id).unwrap().unwrap();
        assert_eq!(retrieved.brand_name, "Napa");
        assert_eq!(retrieved.generic_name.as_deref(), Some("Paracetamol"));
        // New entries always start unused
        assert_eq!(retrieved.occurrence, 0);
    }

    #[test]
    fn test_update_keeps_occurrence() {
        let db = setup_db();

        let mut medicine = make_medicine("Napa", "Paracetamol");
        medicine.id = db.insert_medicine(&medicine).unwrap();
        db.increment_medicine_occurrence(medicine.id).unwrap();

        medicine.strength = Some("665mg".into());
        medicine.occurrence = 0;
        assert!(db.update_medicine(&medicine).unwrap());

        let retrieved = db.get_medicine(medicine.id).unwrap().unwrap();
        assert_eq!(retrieved.strength.as_deref(), Some("665mg"));
        assert_eq!(retrieved.occurrence, 1);
    }

    #[test]
    fn test_search_medicines() {
        let db = setup_db();
        let napa = db.insert_medicine(&make_medicine("Napa", "Paracetamol")).unwrap();
        let seclo = db.insert_medicine(&make_medicine("Seclo", "Omeprazole")).unwrap();

        // Brand name
        let results = db.search_medicines("napa", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, napa);

        // Generic name
        let results = db.search_medicines("omeprazole", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, seclo);

        // Prefix search
        let results = db.search_medicines("parac", 10).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_search_with_only_operators_is_empty() {
        let db = setup_db();
        db.insert_medicine(&make_medicine("Napa", "Paracetamol")).unwrap();
        assert!(db.search_medicines("\"*(", 10).unwrap().is_empty());
    }

    #[test]
    fn test_top_medicines() {
        let db = setup_db();
        let napa = db.insert_medicine(&make_medicine("Napa", "Paracetamol")).unwrap();
        let seclo = db.insert_medicine(&make_medicine("Seclo", "Omeprazole")).unwrap();
        db.insert_medicine(&make_medicine("Fexo", "Fexofenadine")).unwrap();

        for _ in 0..3 {
            db.increment_medicine_occurrence(seclo).unwrap();
        }
        db.increment_medicine_occurrence(napa).unwrap();

        let top = db.top_medicines(2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, seclo);
        assert_eq!(top[1].id, napa);
    }

    #[test]
    fn test_delete_removes_from_search() {
        let db = setup_db();
        let id = db.insert_medicine(&make_medicine("Napa", "Paracetamol")).unwrap();

        assert!(db.delete_medicine(id).unwrap());
        assert!(db.search_medicines("napa", 10).unwrap().is_empty());
        assert!(db.list_medicines().unwrap().is_empty());
    }

    #[test]
    fn test_escape_fts_query() {
        assert_eq!(escape_fts_query("napa extra"), "napa* extra*");
        assert_eq!(escape_fts_query("a\"b"), "ab*");
    }
}
