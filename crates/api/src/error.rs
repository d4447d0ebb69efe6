#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("No job with that name either current or historic: [{0}]")]
    NoSuchJob(String),
    #[error("No job instance with id={0}")]
    NoSuchJobInstance(i64),
    #[error("There is no JobExecution with id={0}")]
    NoSuchJobExecution(i64),
    #[error(
        "There is no StepExecution with jobExecutionId={job_execution_id} and id={step_execution_id}"
    )]
    NoSuchStepExecution {
        job_execution_id: i64,
        step_execution_id: i64,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// True for the "no such ..." family of lookup failures.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            ApiError::NoSuchJob(_)
                | ApiError::NoSuchJobInstance(_)
                | ApiError::NoSuchJobExecution(_)
                | ApiError::NoSuchStepExecution { .. }
        )
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
