//! Logging infrastructure: structured event logging.
//!
//! Provides [`JsonlEventLogger`], a JSONL file writer that implements the
//! [`BeliefObserver`](doxa_application::BeliefObserver) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlEventLogger;
