//! Cadence: recurring task scheduling.
//!
//! This crate computes the next occurrence of a repeating task and generates
//! the follow-up task row when the current one is completed.
//!
//! # Architecture
//!
//! Cadence follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`config`]: Scheduler tunables and TOML loading
//! - [`task`]: Tasks, recurrence rules, and completion handling

pub mod config;
pub mod task;
