//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement. The evidence scorer port lives in the domain layer
//! because frames consult it directly.

pub mod observer;
pub mod planner;
