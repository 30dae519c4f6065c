use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("cannot interpret `{value}` as a date: {reason}")]
    Parse { value: String, reason: &'static str },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{year}-{month:02} is not a calendar month")]
    InvalidMonth { year: i32, month: u32 },
    #[error("configuration error: {0}")]
    Config(String),
}

impl AnalyticsError {
    pub fn parse(value: impl Into<String>, reason: &'static str) -> Self {
        Self::Parse {
            value: value.into(),
            reason,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::InvalidInput(_) | AnalyticsError::InvalidMonth { .. } => {
                Self::bad_request(err.to_string())
            }
            other => Self::internal(other),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
