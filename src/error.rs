use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

pub type Result<T> = std::result::Result<T, AccountError>;

/// Failure of an account operation.
///
/// `InvalidCredentials` covers both an unknown email and a wrong password so
/// callers cannot tell which one failed.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User with the provided email already exists")]
    DuplicateUser,
    #[error("Not Authorized")]
    Unauthorized,
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Unexpected(String),
}

impl AccountError {
    pub fn unexpected<E: std::fmt::Display>(e: E) -> Self {
        Self::Unexpected(e.to_string())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::DuplicateUser => "duplicate_user",
            Self::Unauthorized => "unauthorized",
            Self::InvalidInput(_) => "invalid_input",
            Self::Unexpected(_) => "unexpected",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::DuplicateUser => StatusCode::CONFLICT,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AccountError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return Self::DuplicateUser;
            }
        }
        Self::Unexpected(e.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(e: anyhow::Error) -> Self {
        Self::Unexpected(e.to_string())
    }
}

/// Wire shape of every failed call.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};

    #[test]
    fn messages_match_client_contract() {
        assert_eq!(
            AccountError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
        assert_eq!(
            AccountError::DuplicateUser.to_string(),
            "User with the provided email already exists"
        );
        assert_eq!(AccountError::Unauthorized.to_string(), "Not Authorized");
        assert_eq!(
            AccountError::unexpected("connection reset").to_string(),
            "connection reset"
        );
    }

    #[test]
    fn statuses() {
        assert_eq!(AccountError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AccountError::DuplicateUser.status(), StatusCode::CONFLICT);
        assert_eq!(
            AccountError::Unexpected("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[derive(Debug)]
    struct UniqueViolation;

    impl std::fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.message())
        }
    }

    impl std::error::Error for UniqueViolation {}

    impl DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"users_email_key\""
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn unique_violation_is_duplicate_user() {
        let err = AccountError::from(sqlx::Error::Database(Box::new(UniqueViolation)));
        assert!(matches!(err, AccountError::DuplicateUser));
        assert_eq!(err.to_string(), "User with the provided email already exists");
    }

    #[test]
    fn non_database_sqlx_error_is_unexpected() {
        let err = AccountError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.kind(), "unexpected");
    }

    #[test]
    fn error_body_serialization() {
        let body = ErrorBody {
            error: AccountError::Unauthorized.to_string(),
            kind: AccountError::Unauthorized.kind(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"Not Authorized","kind":"unauthorized"}"#);
    }
}
