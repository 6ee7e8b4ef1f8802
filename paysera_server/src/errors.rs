use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use paysera_engine::PayseraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("{0}")]
    PaymentError(#[from] PayseraError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::PaymentError(e) => match e {
                PayseraError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                PayseraError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                PayseraError::ProtocolError(_) => StatusCode::CONFLICT,
                PayseraError::MissingField(_)
                | PayseraError::DecodeError(_)
                | PayseraError::ParseError(_)
                | PayseraError::SignatureError(_) => StatusCode::BAD_REQUEST,
                PayseraError::ConfigurationError(_) | PayseraError::BackendError(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                },
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Paysera endpoints answer in plain text, so errors do too.
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).insert_header(ContentType::plaintext()).body(format!("Error: {self}"))
    }
}
