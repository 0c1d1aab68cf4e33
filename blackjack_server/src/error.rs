use actix_web::{error, http::StatusCode, HttpResponse};
use blackjack_lib::BlackjackGameError;
use serde_json::json;
use thiserror::Error;

/// An enum that will handle user facing errors
#[derive(Debug, Error)]
pub enum UserError {
    #[error("an internal error occurred")]
    InternalError,
    #[error("{0}")]
    BadInput(String),
    #[error(transparent)]
    Game(#[from] BlackjackGameError),
}

impl error::ResponseError for UserError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            UserError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            UserError::BadInput(_) => StatusCode::BAD_REQUEST,
            UserError::Game(_) => StatusCode::CONFLICT,
        }
    }
}
