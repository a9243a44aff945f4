use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use diesel::result::DatabaseErrorKind;
use log::error;
use thiserror::Error;

use crate::core::Resource;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error querying database: {0}")]
    DBQueryError(diesel::result::Error),
    #[error("error getting database connection: {0}")]
    PoolError(#[from] r2d2::Error),
    #[error("error running migrations: {0}")]
    MigrationError(String),
    #[error("error running blocking task: {0}")]
    BlockingError(#[from] actix_web::error::BlockingError),
    #[error("invalid setting {name}: {reason}")]
    SettingError { name: &'static str, reason: String },
    #[error("{resource} id={id} does not exist - {resource} not found")]
    NotFoundError { resource: Resource, id: i32 },
    #[error("Not updated")]
    NotUpdatedError,
    #[error("{0} - bad request")]
    PayloadError(String),
    #[error("{0} - referenced director or genre not found")]
    DanglingReferenceError(String),
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) =>
                Error::DanglingReferenceError(info.message().to_string()),
            other => Error::DBQueryError(other),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFoundError { .. } => StatusCode::NOT_FOUND,
            Error::NotUpdatedError
            | Error::PayloadError(_)
            | Error::DanglingReferenceError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
            return HttpResponse::build(status).json("Internal server error");
        }

        HttpResponse::build(status).json(self.to_string())
    }
}
