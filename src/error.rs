use axum::{Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use oauth2::basic::BasicErrorResponseType;
use oauth2::{RequestTokenError, StandardErrorResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

use crate::crypto::CipherError;
use crate::validation::FieldError;

pub const MSG_SUSPICIOUS: &str =
    "Sorry, your request can't be processed right now due to suspicious activity.";
pub const MSG_RISK_FAILURE: &str = "There appears to be an issue...";
pub const MSG_INTERNAL: &str = "An error occurred";
pub const MSG_TOO_LARGE: &str = "Request body too large";

#[derive(Debug, ThisError)]
pub enum PortfolioError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Always built through `From<reqwest::Error>`, which drops the request URL.
    #[error("HTTP request error: {0}")]
    Reqwest(reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("credential `{0}` unavailable")]
    CredentialUnavailable(&'static str),

    #[error("OAuth2 token request error: {0}")]
    Oauth2Token(String),

    #[error("OAuth2 server error: {error}")]
    Oauth2Server { error: String },

    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("risk score {score} at or below threshold")]
    RiskRejected { score: f64 },

    #[error("risk assessment failed: {0}")]
    RiskCheckFailed(String),

    #[error("invalid mail: {0}")]
    InvalidMail(String),

    /// Unreadable JSON body; keeps only the status axum would have answered.
    #[error("rejected request body ({0})")]
    MalformedBody(StatusCode),

    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
}

impl From<JsonRejection> for PortfolioError {
    fn from(rejection: JsonRejection) -> Self {
        PortfolioError::MalformedBody(rejection.status())
    }
}

impl From<reqwest::Error> for PortfolioError {
    fn from(e: reqwest::Error) -> Self {
        // Assessment URLs carry the API key as a query parameter.
        PortfolioError::Reqwest(e.without_url())
    }
}

/// Classifies transient upstream failures for retry policies.
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for PortfolioError {
    fn is_retryable(&self) -> bool {
        match self {
            PortfolioError::Reqwest(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            PortfolioError::Oauth2Server { error } => {
                matches!(error.as_str(), "temporarily_unavailable" | "server_error")
            }
            PortfolioError::UpstreamStatus(code) => {
                code.is_server_error() || *code == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

/// Token requests run through a transport that already reports transport
/// failures and throttled or 5xx answers as `PortfolioError`.
impl From<RequestTokenError<PortfolioError, StandardErrorResponse<BasicErrorResponseType>>>
    for PortfolioError
{
    fn from(
        e: RequestTokenError<PortfolioError, StandardErrorResponse<BasicErrorResponseType>>,
    ) -> Self {
        match e {
            RequestTokenError::ServerResponse(err) => PortfolioError::Oauth2Server {
                error: err.error().to_string(),
            },
            RequestTokenError::Request(transport) => transport,
            RequestTokenError::Parse(parse_err, _body) => {
                PortfolioError::Json(parse_err.into_inner())
            }
            RequestTokenError::Other(s) => PortfolioError::Oauth2Token(s),
        }
    }
}

impl IntoResponse for PortfolioError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            // Field errors are answered with 200 so the contact form renders them inline.
            PortfolioError::Validation(errors) => {
                return (StatusCode::OK, Json(errors)).into_response();
            }
            PortfolioError::RiskRejected { .. } => (StatusCode::BAD_REQUEST, MSG_SUSPICIOUS),
            PortfolioError::RiskCheckFailed(_) => (StatusCode::BAD_REQUEST, MSG_RISK_FAILURE),
            PortfolioError::MalformedBody(code) if code == StatusCode::PAYLOAD_TOO_LARGE => {
                (StatusCode::PAYLOAD_TOO_LARGE, MSG_TOO_LARGE)
            }
            PortfolioError::MalformedBody(_) => (StatusCode::BAD_REQUEST, MSG_RISK_FAILURE),
            PortfolioError::UrlParse(_)
            | PortfolioError::Reqwest(_)
            | PortfolioError::Json(_)
            | PortfolioError::DatabaseError(_)
            | PortfolioError::Cipher(_)
            | PortfolioError::InvalidConfig(_)
            | PortfolioError::CredentialUnavailable(_)
            | PortfolioError::Oauth2Token(_)
            | PortfolioError::Oauth2Server { .. }
            | PortfolioError::UpstreamStatus(_)
            | PortfolioError::InvalidMail(_) => (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL),
        };
        (
            status,
            Json(ApiErrorBody {
                message: message.to_string(),
            }),
        )
            .into_response()
    }
}

/// Standardized API error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: PortfolioError) -> (StatusCode, String) {
        let resp = err.into_response();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn risk_errors_are_bad_request() {
        let (status, body) = body_of(PortfolioError::RiskRejected { score: 0.1 }).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("suspicious activity"));

        let (status, body) = body_of(PortfolioError::RiskCheckFailed("x".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains(MSG_RISK_FAILURE));
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) =
            body_of(PortfolioError::Oauth2Server { error: "invalid_grant".into() }).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"message":"An error occurred"}"#);

        let (status, _) = body_of(PortfolioError::CredentialUnavailable("ClientID")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn validation_errors_answer_ok_with_list() {
        let err = PortfolioError::Validation(vec![FieldError::new("name", "Required")]);
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"[{"path":"name","message":"Required"}]"#);
    }

    #[test]
    fn upstream_5xx_is_retryable() {
        assert!(PortfolioError::UpstreamStatus(StatusCode::BAD_GATEWAY).is_retryable());
        assert!(PortfolioError::UpstreamStatus(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(!PortfolioError::UpstreamStatus(StatusCode::BAD_REQUEST).is_retryable());
        assert!(!PortfolioError::CredentialUnavailable("APIKey").is_retryable());
    }

    #[test]
    fn only_transient_oauth_errors_are_retryable() {
        let server = |error: &str| PortfolioError::Oauth2Server {
            error: error.to_string(),
        };
        assert!(server("temporarily_unavailable").is_retryable());
        assert!(server("server_error").is_retryable());
        assert!(!server("invalid_grant").is_retryable());
        assert!(!PortfolioError::Oauth2Token("unexpected response".into()).is_retryable());
    }

    #[tokio::test]
    async fn unreadable_bodies_answer_json() {
        let (status, body) = body_of(PortfolioError::MalformedBody(StatusCode::UNSUPPORTED_MEDIA_TYPE)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"message":"There appears to be an issue..."}"#);

        let (status, body) = body_of(PortfolioError::MalformedBody(StatusCode::PAYLOAD_TOO_LARGE)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, r#"{"message":"Request body too large"}"#);
    }
}
