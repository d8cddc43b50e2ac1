//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`AgentSettings`]: per-agent thresholds, context capacity, exchange parameters
//! - [`NegotiationParams`]: negotiation round limits and arbitration

pub mod agent_settings;
pub mod negotiation_params;

pub use agent_settings::{AgentSettings, DEFAULT_CONTEXT_CAPACITY};
pub use negotiation_params::NegotiationParams;
