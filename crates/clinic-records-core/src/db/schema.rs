//! SQLite schema definition.

/// Complete database schema for the clinic records store.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    age TEXT NOT NULL DEFAULT '',
    address TEXT,
    phone TEXT,
    blood_group TEXT,
    last_visit TEXT,                             -- YYYY-MM-DD, NULL until first visit
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS idx_patients_phone ON patients(phone);

-- ============================================================================
-- Visits (prescription ledger)
-- ============================================================================

-- patient_id has no REFERENCES clause: deleting a patient leaves its visits.
CREATE TABLE IF NOT EXISTS visits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id INTEGER,
    visit_date TEXT NOT NULL,                    -- YYYY-MM-DD
    patient_name TEXT NOT NULL,
    patient_age INTEGER,
    gender TEXT,
    complaint TEXT,
    history TEXT,
    on_examination TEXT,
    investigation TEXT,
    diagnosis TEXT,
    treatment_plan TEXT,
    medicine TEXT,
    advice TEXT,
    follow_up TEXT,
    notes TEXT,
    next_visit TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_visits_patient ON visits(patient_id, visit_date);
CREATE INDEX IF NOT EXISTS idx_visits_date ON visits(visit_date);

-- ============================================================================
-- Medicine Catalog
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicines (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    manufacturer_name TEXT,
    brand_name TEXT NOT NULL,
    generic_name TEXT,
    strength TEXT,
    medicine_type TEXT,
    dosage_description TEXT,
    occurrence INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_medicines_occurrence ON medicines(occurrence);

-- FTS5 virtual table for brand/generic name search
CREATE VIRTUAL TABLE IF NOT EXISTS medicines_fts USING fts5(
    brand_name,
    generic_name,
    content='medicines',
    content_rowid='id'
);

-- Triggers to keep FTS5 in sync with main table
CREATE TRIGGER IF NOT EXISTS medicines_ai AFTER INSERT ON medicines BEGIN
    INSERT INTO medicines_fts(rowid, brand_name, generic_name)
    VALUES (new.id, new.brand_name, new.generic_name);
END;

CREATE TRIGGER IF NOT EXISTS medicines_ad AFTER DELETE ON medicines BEGIN
    INSERT INTO medicines_fts(medicines_fts, rowid, brand_name, generic_name)
    VALUES ('delete', old.id, old.brand_name, old.generic_name);
END;

CREATE TRIGGER IF NOT EXISTS medicines_au AFTER UPDATE ON medicines BEGIN
    INSERT INTO medicines_fts(medicines_fts, rowid, brand_name, generic_name)
    VALUES ('delete', old.id, old.brand_name, old.generic_name);
    INSERT INTO medicines_fts(rowid, brand_name, generic_name)
    VALUES (new.id, new.brand_name, new.generic_name);
END;

-- ============================================================================
-- Suggestion Templates
-- ============================================================================

CREATE TABLE IF NOT EXISTS suggestion_templates (
    kind TEXT NOT NULL CHECK (kind IN (
        'diagnosis', 'advice', 'chief-complaint', 'history', 'on-examination',
        'investigation', 'treatment-plan', 'follow-up', 'special-note'
    )),
    content TEXT NOT NULL,
    occurrence INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (kind, content)
);

CREATE INDEX IF NOT EXISTS idx_templates_rank ON suggestion_templates(kind, occurrence);
"#;
