//! Execution store implementations.

pub mod memory;
pub mod pattern;

pub use memory::InMemoryExecutionStore;
pub use pattern::StepNamePattern;
