//! Domain models for the clinic records system.

mod medicine;
mod patient;
mod template;
mod visit;

pub use medicine::*;
pub use patient::*;
pub use template::*;
pub use visit::*;
