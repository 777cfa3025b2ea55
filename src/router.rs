use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::crypto::{AesCbcCipher, SecretCache, SecretVault};
use crate::db::ContentStore;
use crate::error::PortfolioError;
use crate::google_oauth::GoogleOauthService;
use crate::handlers::contact::contact_mail_handler;
use crate::handlers::content::{
    profile_images_handler, projects_handler, resume_handler, skills_handler, timeline_handler,
};
use crate::service::{
    Catalog, GmailProvider, MailDispatcher, MailProvider, MailSettings, RecaptchaAssessor,
    RiskAssessor, RiskGate,
};

/// Contact payloads are small; anything larger is refused with 413.
pub const BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone)]
pub struct PortfolioState {
    pub catalog: Catalog,
    pub gate: Arc<RiskGate>,
    pub mailer: Arc<MailDispatcher>,
    pub resume_split: bool,
}

impl PortfolioState {
    pub fn new(
        catalog: Catalog,
        gate: Arc<RiskGate>,
        mailer: Arc<MailDispatcher>,
        resume_split: bool,
    ) -> Self {
        Self {
            catalog,
            gate,
            mailer,
            resume_split,
        }
    }

    /// Wire the production components: one shared vault and HTTP client.
    /// Fails on incomplete configuration before anything is served.
    pub fn from_config(cfg: &Config, store: ContentStore) -> Result<Self, PortfolioError> {
        cfg.validate()?;
        let cipher = AesCbcCipher::from_hex(&cfg.encryption_key, &cfg.encryption_iv)?;
        let vault = Arc::new(SecretVault::new(
            Arc::new(store.clone()),
            Arc::new(cipher),
            SecretCache::default(),
        ));
        let client = build_http_client(cfg)?;

        let assessor: Arc<dyn RiskAssessor> = Arc::new(RecaptchaAssessor::new(
            client.clone(),
            &cfg.recaptcha_base_url,
            &cfg.recaptcha_project,
            cfg.site_key.clone(),
        )?);
        let oauth = GoogleOauthService::new(
            client.clone(),
            cfg.oauth_token_url.clone(),
            cfg.redirect_uri.clone(),
        );
        let provider: Arc<dyn MailProvider> = Arc::new(GmailProvider::new(
            oauth,
            client,
            cfg.gmail_send_url.clone(),
        ));

        let gate = Arc::new(RiskGate::new(vault.clone(), assessor));
        let mailer = Arc::new(MailDispatcher::new(
            vault,
            provider,
            MailSettings {
                owner_email: cfg.email.clone(),
                send_confirmation: cfg.send_confirmation,
                confirmation_subject: cfg.confirmation_subject.clone(),
                confirmation_body: cfg.confirmation_body.clone(),
            },
        ));

        Ok(Self::new(Catalog::new(store), gate, mailer, cfg.resume_split))
    }
}

/// Shared outbound client for OAuth, Gmail and risk assessment.
pub fn build_http_client(cfg: &Config) -> Result<reqwest::Client, PortfolioError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("portfolio-api/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(15))
        // token endpoints must not follow redirects
        .redirect(reqwest::redirect::Policy::none());
    if let Some(proxy_url) = cfg.proxy.as_ref() {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }
    Ok(builder.build()?)
}

pub fn portfolio_router(state: PortfolioState) -> Router {
    Router::new()
        .route("/api/images", get(profile_images_handler))
        .route("/api/timeline", get(timeline_handler))
        .route("/api/skills", get(skills_handler))
        .route("/api/projects", get(projects_handler))
        .route("/api/resume", post(resume_handler))
        .route("/api/mail", post(contact_mail_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
