//! Evidence model: justification elements and the justifications that order them.

pub mod element;
pub mod justification;

pub use element::{ElementKind, JustificationElement};
pub use justification::Justification;
