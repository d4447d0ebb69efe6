pub mod error;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use models::*;
pub use store::ExecutionStore;
