pub mod gmail_api;
pub mod recaptcha_api;

pub use gmail_api::GmailApi;
pub use recaptcha_api::RecaptchaApi;
