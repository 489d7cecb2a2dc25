//! In-memory adapters, used by tests and embedders without a backing store.

mod task;

pub use task::InMemoryTaskRepository;
