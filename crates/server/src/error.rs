//! HTTP mapping for store and service errors.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use batchlens_api::ApiError;

#[derive(Debug)]
pub enum HttpError {
    Api(ApiError),
    /// Rejected with the given text as the body.
    BadRequest(String),
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        HttpError::Api(err)
    }
}

impl HttpError {
    /// Lookup failures and bad arguments are the client's fault.
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Api(ApiError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::Api(_) | HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(&self) -> String {
        let err = match self {
            HttpError::BadRequest(message) => return message.clone(),
            HttpError::Api(err) => err,
        };
        match err {
            ApiError::NoSuchJob(name) => format!("There is no such job ({name})"),
            ApiError::NoSuchJobInstance(id) => format!("There is no such job instance ({id})"),
            ApiError::NoSuchJobExecution(id) => format!("There is no such job execution ({id})"),
            ApiError::NoSuchStepExecution {
                step_execution_id, ..
            } => format!("There is no such step execution ({step_execution_id})"),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!("request failed: {}", message);
        } else {
            tracing::warn!("rejected request: {}", message);
        }
        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}

pub type HttpResult<T> = std::result::Result<T, HttpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_failures_are_bad_requests() {
        let err = HttpError::from(ApiError::NoSuchJobInstance(3));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "There is no such job instance (3)");

        let err = HttpError::from(ApiError::Internal("boom".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = HttpError::BadRequest("wrong job name x".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "wrong job name x");
    }
}
