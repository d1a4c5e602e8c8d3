//! Patient identity resolution.
//!
//! Maps the identity stated on an incoming visit (optional patient ID, name,
//! age) onto a stored patient, creating one when nothing matches. The
//! [`IdentityResolver`] trait keeps the matching scheme swappable; the visit
//! recorder only depends on the trait.

mod name_match;

pub use name_match::*;

use chrono::NaiveDate;
use thiserror::Error;

/// Resolver errors.
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type ResolverResult<T> = Result<T, ResolverError>;

/// Identity stated on a visit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentityClaim<'a> {
    /// Patient ID supplied by the client, if any
    pub candidate_id: Option<i64>,
    /// Patient name as written on the visit
    pub name: &'a str,
    /// Age in years as written on the visit
    pub age: Option<i32>,
    /// Date of the visit, becomes the patient's last visit
    pub visit_date: NaiveDate,
}

/// How a claim was matched to a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The supplied candidate ID exists
    Candidate(i64),
    /// An existing patient matched the stated identity
    Matched(i64),
    /// No patient matched; a new one was created
    Created(i64),
}

impl Resolution {
    pub fn patient_id(&self) -> i64 {
        match *self {
            Resolution::Candidate(id) | Resolution::Matched(id) | Resolution::Created(id) => id,
        }
    }

    pub fn is_new_patient(&self) -> bool {
        matches!(self, Resolution::Created(_))
    }
}

/// Decides which patient a visit belongs to.
///
/// Implementations persist the selected or created patient (with refreshed
/// age and last-visit) before returning, and never touch the visit ledger.
pub trait IdentityResolver {
    fn resolve(&self, claim: &IdentityClaim<'_>) -> ResolverResult<Resolution>;
}
