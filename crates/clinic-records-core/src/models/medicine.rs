//! Medicine catalog models.

use serde::{Deserialize, Serialize};

/// A medicine available for prescribing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medicine {
    /// Surrogate ID, 0 until inserted
    pub id: i64,
    /// Company that manufactures the medicine
    pub manufacturer_name: Option<String>,
    /// Commercial/brand name
    pub brand_name: String,
    /// Generic/scientific name
    pub generic_name: Option<String>,
    /// Dosage strength (e.g., "500mg")
    pub strength: Option<String>,
    /// Tablet, Capsule, Syrup, Injection, ...
    pub medicine_type: Option<String>,
    /// How to take the medicine
    pub dosage_description: Option<String>,
    /// Usage counter driving suggestions
    pub occurrence: i64,
}

impl Medicine {
    /// Create a new catalog entry with required fields.
    pub fn new(brand_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            manufacturer_name: None,
            brand_name: brand_name.into(),
            generic_name: None,
            strength: None,
            medicine_type: None,
            dosage_description: None,
            occurrence: 0,
        }
    }

    /// Label shown in prescription pickers, e.g. "Napa 500mg (Paracetamol)".
    pub fn display_label(&self) -> String {
        let mut label = self.brand_name.clone();
        if let Some(strength) = self.strength.as_deref().filter(|s| !s.is_empty()) {
            label.push(' ');
            label.push_str(strength);
        }
        if let Some(generic) = self.generic_name.as_deref().filter(|s| !s.is_empty()) {
            label.push_str(&format!(" ({})", generic));
        }
        label
    }
}
