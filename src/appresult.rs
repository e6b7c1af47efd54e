use axum::{http::StatusCode, response::{IntoResponse, Response}};

use crate::error::ChatError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        use ChatError::*;
        match self.0.downcast_ref::<ChatError>() {
            Some(InvalidInput(_)) | Some(UnknownSender) => StatusCode::UNPROCESSABLE_ENTITY,
            Some(Conflict(_)) => StatusCode::CONFLICT,
            Some(NotFound(_)) => StatusCode::NOT_FOUND,
            Some(Store(_)) | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:#}\n\n{}", self.0, self.0.backtrace());
            return status.into_response();
        }

        tracing::debug!("rejected request: {}", self.0);
        (status, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
