//! Core domain concepts shared across all subdomains.
//!
//! - [`proposition::Proposition`]: an opaque claim with a canonical negation
//! - [`agent_id::AgentId`]: identity of a belief-holding agent
//! - [`error::DomainError`]: domain-level errors

pub mod agent_id;
pub mod error;
pub mod proposition;
