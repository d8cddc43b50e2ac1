//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod agent;
pub mod negotiate;

#[cfg(test)]
pub(crate) mod testing;
