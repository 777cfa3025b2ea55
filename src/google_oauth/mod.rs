pub mod credentials;
pub mod endpoints;
pub mod service;

pub use credentials::OAuthCredentials;
pub use service::GoogleOauthService;
