use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{instrument, warn};

use crate::{
    auth::dto::{LoginRequest, PublicUser, RegisterRequest, RegisteredUser},
    error::AccountError,
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_registration(payload: &RegisterRequest) -> Result<(), AccountError> {
    if !is_valid_email(&payload.email) {
        return Err(AccountError::InvalidInput("Invalid email".into()));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::InvalidInput("Password too short".into()));
    }
    let required = [
        ("firstName", &payload.first_name),
        ("lastName", &payload.last_name),
        ("gender", &payload.gender),
        ("city", &payload.city),
        ("profession", &payload.profession),
        ("phoneNumber", &payload.phone_number),
    ];
    if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
        return Err(AccountError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisteredUser>), AccountError> {
    payload.email = payload.email.trim().to_lowercase();

    if let Err(e) = validate_registration(&payload) {
        warn!(error = %e, "registration rejected");
        return Err(e);
    }

    let registered = state.accounts.register(payload).await?;
    Ok((StatusCode::CREATED, Json(registered)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<PublicUser>), AccountError> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AccountError::InvalidInput(
            "Email and password are required".into(),
        ));
    }

    let outcome = state
        .accounts
        .authenticate(&payload.email, &payload.password)
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, outcome.cookie.to_header_value()?);
    Ok((headers, Json(outcome.user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn request() -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "a@x.com".into(),
            gender: "female".into(),
            birth_date: date!(1995 - 12 - 10),
            city: "London".into(),
            profession: "Engineer".into(),
            password: "secret123".into(),
            phone_number: "123".into(),
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("a x@y.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn registration_validation() {
        assert!(validate_registration(&request()).is_ok());

        let mut short = request();
        short.password = "short".into();
        assert_eq!(
            validate_registration(&short).unwrap_err().to_string(),
            "Password too short"
        );

        let mut blank = request();
        blank.city = "  ".into();
        assert_eq!(
            validate_registration(&blank).unwrap_err().to_string(),
            "city is required"
        );
    }
}
