pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod policy;
pub mod progress;
pub mod service;
pub mod store;

pub use config::MonitoringConfig;
pub use error::{BatchlensError, Result};
pub use progress::{CompletionBasis, ProgressEstimate};
pub use service::MonitoringService;
