use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

use crate::error::PortfolioError;
use crate::validation::contact::is_valid_email;

/// Environment variables overriding the defaults carry this prefix.
pub const ENV_PREFIX: &str = "PORTFOLIO_";

/// Secret names as stored in the `keys` collection.
pub const SECRET_CLIENT_ID: &str = "ClientID";
pub const SECRET_CLIENT_SECRET: &str = "ClientSecret";
pub const SECRET_REFRESH_TOKEN: &str = "RefreshToken";
pub const SECRET_RISK_API_KEY: &str = "APIKey";

pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const GMAIL_SEND_URI: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";
pub const RECAPTCHA_BASE_URI: &str = "https://recaptchaenterprise.googleapis.com";

/// Process configuration, read once in `main` and handed to components explicitly.
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|e| panic!("FATAL: invalid configuration: {e}"))
});

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub loglevel: String,
    pub listen_addr: String,
    pub proxy: Option<Url>,

    /// Hex-encoded 32-byte AES key.
    pub encryption_key: String,
    /// Hex-encoded 16-byte CBC initialization vector.
    pub encryption_iv: String,

    /// Owner mailbox: receives contact mails and sends confirmations.
    pub email: String,
    pub redirect_uri: Option<Url>,
    pub oauth_token_url: Url,
    pub gmail_send_url: Url,
    pub send_confirmation: bool,
    pub confirmation_subject: String,
    pub confirmation_body: String,

    pub site_key: String,
    pub recaptcha_project: String,
    pub recaptcha_base_url: Url,

    /// Answer `/api/resume` with `{resume, coverletter}` instead of a flat list.
    pub resume_split: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:portfolio.sqlite".to_string(),
            db_max_connections: 5,
            loglevel: "info".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            proxy: None,
            encryption_key: String::new(),
            encryption_iv: String::new(),
            email: String::new(),
            redirect_uri: None,
            oauth_token_url: Url::parse(GOOGLE_TOKEN_URI).expect("valid token url"),
            gmail_send_url: Url::parse(GMAIL_SEND_URI).expect("valid gmail url"),
            send_confirmation: true,
            confirmation_subject: "Portfolio - Confirmation".to_string(),
            confirmation_body: "Thank you for reaching out! This is just to confirm that I \
                received your email. I will get back to you as soon as possible."
                .to_string(),
            site_key: String::new(),
            recaptcha_project: String::new(),
            recaptcha_base_url: Url::parse(RECAPTCHA_BASE_URI).expect("valid recaptcha url"),
            resume_split: false,
        }
    }
}

impl Config {
    /// Defaults overridden by `PORTFOLIO_*` environment variables.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Settings the server cannot answer a single contact or resume request without.
    pub fn validate(&self) -> Result<(), PortfolioError> {
        if !is_valid_email(&self.email) {
            return Err(PortfolioError::InvalidConfig(
                "PORTFOLIO_EMAIL must be a valid address",
            ));
        }
        if self.site_key.trim().is_empty() {
            return Err(PortfolioError::InvalidConfig("PORTFOLIO_SITE_KEY is empty"));
        }
        if self.recaptcha_project.trim().is_empty() {
            return Err(PortfolioError::InvalidConfig(
                "PORTFOLIO_RECAPTCHA_PROJECT is empty",
            ));
        }
        Ok(())
    }
}
