//! Suggestion template operations.

use rusqlite::{params, Row};

use super::patients::contains_pattern;
use super::{Database, DbError, DbResult};
use crate::models::{SuggestionKind, SuggestionTemplate};

fn template_from_row(row: &Row<'_>) -> rusqlite::Result<(String, String, i64)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_template((kind, content, occurrence): (String, String, i64)) -> DbResult<SuggestionTemplate> {
    let kind = kind
        .parse::<SuggestionKind>()
        .map_err(|e| DbError::Constraint(e.to_string()))?;
    Ok(SuggestionTemplate {
        kind,
        content,
        occurrence,
    })
}

impl Database {
    /// Add a template. Re-adding existing content is a no-op.
    ///
    /// Returns `true` when a new row was created.
    pub fn add_template(&self, kind: SuggestionKind, content: &str) -> DbResult<bool> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DbError::Constraint("template content cannot be empty".into()));
        }

        let rows_affected = self.conn.execute(
            "INSERT OR IGNORE INTO suggestion_templates (kind, content, occurrence) VALUES (?1, ?2, 0)",
            params![kind.as_str(), content],
        )?;
        Ok(rows_affected > 0)
    }

    /// Most used templates of a kind first.
    pub fn top_templates(&self, kind: SuggestionKind, limit: usize) -> DbResult<Vec<SuggestionTemplate>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT kind, content, occurrence
            FROM suggestion_templates
            WHERE kind = ?1
            ORDER BY occurrence DESC, content COLLATE NOCASE
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![kind.as_str(), limit as i64], template_from_row)?;
        let mut templates = Vec::new();
        for row in rows {
            templates.push(into_template(row?)?);
        }
        Ok(templates)
    }

    /// Templates of a kind whose content contains `query` (case-insensitive).
    pub fn search_templates(
        &self,
        kind: SuggestionKind,
        query: &str,
        limit: usize,
    ) -> DbResult<Vec<SuggestionTemplate>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT kind, content, occurrence
            FROM suggestion_templates
            WHERE kind = ?1 AND content LIKE ?2 ESCAPE '\'
            ORDER BY occurrence DESC, content COLLATE NOCASE
            LIMIT ?3
            "#,
        )?;

        let rows = stmt.query_map(
            params![kind.as_str(), contains_pattern(query), limit as i64],
            template_from_row,
        )?;
        let mut templates = Vec::new();
        for row in rows {
            templates.push(into_template(row?)?);
        }
        Ok(templates)
    }

    /// Bump the usage counter of a template.
    pub fn increment_template_occurrence(&self, kind: SuggestionKind, content: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE suggestion_templates SET occurrence = occurrence + 1 WHERE kind = ?1 AND content = ?2",
            params![kind.as_str(), content.trim()],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a template.
    pub fn delete_template(&self, kind: SuggestionKind, content: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM suggestion_templates WHERE kind = ?1 AND content = ?2",
            params![kind.as_str(), content.trim()],
        )?;
        Ok(rows_affected > 0)
    }
}
