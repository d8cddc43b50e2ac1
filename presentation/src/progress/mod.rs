//! Event reporting while a scenario is still running

pub mod reporter;
