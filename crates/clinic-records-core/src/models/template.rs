//! Free-text suggestion templates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which prescription section a template suggests text for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionKind {
    Diagnosis,
    Advice,
    ChiefComplaint,
    History,
    OnExamination,
    Investigation,
    TreatmentPlan,
    FollowUp,
    SpecialNote,
}

impl SuggestionKind {
    /// All kinds, in display order.
    pub const ALL: [SuggestionKind; 9] = [
        SuggestionKind::Diagnosis,
        SuggestionKind::Advice,
        SuggestionKind::ChiefComplaint,
        SuggestionKind::History,
        SuggestionKind::OnExamination,
        SuggestionKind::Investigation,
        SuggestionKind::TreatmentPlan,
        SuggestionKind::FollowUp,
        SuggestionKind::SpecialNote,
    ];

    /// Stable storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Diagnosis => "diagnosis",
            SuggestionKind::Advice => "advice",
            SuggestionKind::ChiefComplaint => "chief-complaint",
            SuggestionKind::History => "history",
            SuggestionKind::OnExamination => "on-examination",
            SuggestionKind::Investigation => "investigation",
            SuggestionKind::TreatmentPlan => "treatment-plan",
            SuggestionKind::FollowUp => "follow-up",
            SuggestionKind::SpecialNote => "special-note",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised suggestion kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown suggestion kind: {0}")]
pub struct UnknownSuggestionKind(pub String);

impl FromStr for SuggestionKind {
    type Err = UnknownSuggestionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('_', "-");
        SuggestionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| UnknownSuggestionKind(s.to_string()))
    }
}

/// A reusable snippet of prescription text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionTemplate {
    pub kind: SuggestionKind,
    /// The suggested text, unique per kind
    pub content: String,
    /// How often the snippet has been used
    pub occurrence: i64,
}
