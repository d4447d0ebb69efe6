use super::execution::JobExecution;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Serialized contents of an execution store.
///
/// Step executions are nested under the job execution that owns them; the
/// `job_execution_id` of each nested step must match its parent.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub job_executions: Vec<JobExecution>,
}
