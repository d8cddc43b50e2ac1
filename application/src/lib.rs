//! Application layer for doxa
//!
//! This crate contains the agent orchestrator, the negotiation use case,
//! port definitions, and application configuration. It depends only on the
//! domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AgentSettings, NegotiationParams};
pub use ports::{
    observer::{BeliefObserver, CompositeObserver, NoObserver},
    planner::{NoPlanner, Planner, PlannerError},
};
pub use use_cases::agent::{
    Agent, AgentError, AgentSnapshot, FrameSwitchReport, PerceptionReport, ResolutionNotice,
};
pub use use_cases::negotiate::{
    NegotiateUseCase, NegotiationError, NegotiationReport, NegotiationRound,
};
