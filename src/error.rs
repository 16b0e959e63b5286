use crate::api::ApiError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::{debug, warn};

const ERROR_TEMPLATE: &str = include_str!("../templates/error.html");

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("session error: {0}")]
    Session(#[from] serde_json::Error),
    #[error("score must be between 1 and 5, got {0:?}")]
    InvalidScore(String),
    #[error("malformed form data: {0}")]
    BadForm(String),
    #[error("page not found")]
    NotFound,
}

fn passed_through(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND
        || status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Api(ApiError::Status(status)) if passed_through(*status) => *status,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Api(_) => StatusCode::BAD_GATEWAY,
            Error::InvalidScore(_) | Error::BadForm(_) => StatusCode::BAD_REQUEST,
            Error::Template(_) | Error::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            warn!("{}", self);
        }
        debug!("{:?}", self);
        render_error_page(status)
    }
}

/// Standalone page so that rendering it cannot depend on the loaded templates.
pub fn render_error_page(status: StatusCode) -> HttpResponse {
    let mut ctx = tera::Context::new();
    ctx.insert("status", &status.as_u16());
    ctx.insert("reason", status.canonical_reason().unwrap_or("Error"));
    match tera::Tera::one_off(ERROR_TEMPLATE, &ctx, true) {
        Ok(body) => HttpResponse::build(status)
            .content_type("text/html")
            .body(body),
        Err(err) => {
            debug!("{:?}", err);
            HttpResponse::build(status).body("Something went wrong")
        }
    }
}
