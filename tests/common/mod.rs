#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use portfolio_api::PortfolioError;
use portfolio_api::crypto::{AesCbcCipher, SecretCache, SecretVault};
use portfolio_api::db::{ContentStore, SecretRecord};
use portfolio_api::google_oauth::OAuthCredentials;
use portfolio_api::service::{
    Catalog, MailDispatcher, MailProvider, MailSettings, RiskAssessor, RiskGate,
};
use portfolio_api::types::mail::OutgoingMail;
use portfolio_api::{PortfolioState, portfolio_router};
use secrecy::SecretString;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

pub const OWNER: &str = "owner@example.com";

pub fn cipher() -> AesCbcCipher {
    AesCbcCipher::new([0x11; 32], [0x22; 16])
}

/// Treats the client token as the score to return; `"broken"` fails like a bad upstream.
pub struct TokenIsScore;

#[async_trait]
impl RiskAssessor for TokenIsScore {
    async fn assess(&self, _api_key: &SecretString, token: &str) -> Result<f64, PortfolioError> {
        token
            .parse::<f64>()
            .map_err(|_| PortfolioError::RiskCheckFailed("no riskAnalysis.score".to_string()))
    }
}

#[derive(Default)]
pub struct RecordingMail {
    pub sent: Mutex<Vec<OutgoingMail>>,
}

#[async_trait]
impl MailProvider for RecordingMail {
    async fn access_token(&self, _creds: &OAuthCredentials) -> Result<SecretString, PortfolioError> {
        Ok(SecretString::from("access-token".to_string()))
    }

    async fn send(&self, _token: &SecretString, mail: &OutgoingMail) -> Result<(), PortfolioError> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: ContentStore,
    pub mail: Arc<RecordingMail>,
}

pub async fn temp_store() -> ContentStore {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "portfolio-routes-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    let database_url = format!("sqlite:{}", temp_path.display());
    ContentStore::connect(&database_url, 1)
        .await
        .expect("failed to open temp store")
}

pub async fn seal(store: &ContentStore, name: &str, plaintext: &str) {
    store
        .insert_secret(&SecretRecord {
            name: name.to_string(),
            ciphertext: cipher().encrypt(plaintext),
        })
        .await
        .expect("failed to store secret");
}

pub async fn seal_all(store: &ContentStore) {
    seal(store, "APIKey", "risk-api-key").await;
    seal(store, "ClientID", "client-id").await;
    seal(store, "ClientSecret", "client-secret").await;
    seal(store, "RefreshToken", "refresh-token").await;
}

pub async fn spawn_app(store: ContentStore, resume_split: bool) -> TestApp {
    let vault = Arc::new(SecretVault::new(
        Arc::new(store.clone()),
        Arc::new(cipher()),
        SecretCache::default(),
    ));
    let mail = Arc::new(RecordingMail::default());
    let gate = Arc::new(RiskGate::new(vault.clone(), Arc::new(TokenIsScore)));
    let mailer = Arc::new(MailDispatcher::new(
        vault,
        mail.clone(),
        MailSettings {
            owner_email: OWNER.to_string(),
            send_confirmation: true,
            confirmation_subject: "Confirmation".to_string(),
            confirmation_body: "Thanks for reaching out.".to_string(),
        },
    ));
    let state = PortfolioState::new(Catalog::new(store.clone()), gate, mailer, resume_split);
    TestApp {
        router: portfolio_router(state),
        store,
        mail,
    }
}

pub async fn exec(app: &TestApp, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let resp = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, value)
}
