//! Recurring task scheduling.
//!
//! A task carrying a recurrence rule produces a follow-up instance when it is
//! completed close enough to its due date. The module follows hexagonal
//! architecture:
//!
//! - Domain types and the next-occurrence calculation in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
