//! Report rendering for finished scenarios

pub mod console;
pub mod formatter;
pub mod report;
