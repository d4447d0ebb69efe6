pub mod execution;
pub mod snapshot;

pub use execution::*;
pub use snapshot::*;
