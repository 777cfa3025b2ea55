use crate::error::PortfolioError;
use crate::google_oauth::credentials::OAuthCredentials;

use oauth2::{
    Client as OAuth2Client, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpRequest,
    HttpResponse, RedirectUrl, RefreshToken, StandardRevocableToken, TokenResponse, TokenUrl,
    basic::{
        BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
        BasicTokenResponse,
    },
};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;
use url::Url;

/// Stateless Google OAuth Endpoints.
pub(super) struct GoogleOauthEndpoints;

impl GoogleOauthEndpoints {
    /// Exchange the refresh token for a fresh access token.
    pub(super) async fn refresh_access_token(
        creds: &OAuthCredentials,
        token_url: &Url,
        redirect_uri: Option<&Url>,
        http_client: &reqwest::Client,
    ) -> Result<SecretString, PortfolioError> {
        let client = build_oauth2_client(creds, token_url, redirect_uri)?;
        let token_result = client
            .exchange_refresh_token(&RefreshToken::new(
                creds.refresh_token.expose_secret().to_string(),
            ))
            .request_async(&|request: HttpRequest| {
                let http_client = http_client.clone();
                async move { execute_token_request(&http_client, request).await }
            })
            .await?;
        info!("Access token refreshed successfully");
        Ok(SecretString::from(
            token_result.access_token().secret().to_string(),
        ))
    }
}

/// Run one token request on the shared client.
///
/// Throttled and 5xx answers surface as `UpstreamStatus` so they stay retryable
/// whatever body the endpoint sent with them.
async fn execute_token_request(
    http_client: &reqwest::Client,
    request: HttpRequest,
) -> Result<HttpResponse, PortfolioError> {
    let response = http_client
        .execute(reqwest::Request::try_from(request)?)
        .await?;
    let status = response.status();
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        return Err(PortfolioError::UpstreamStatus(status));
    }

    let headers = response.headers().clone();
    let mut http_response = HttpResponse::new(response.bytes().await?.to_vec());
    *http_response.status_mut() = status;
    *http_response.headers_mut() = headers;
    Ok(http_response)
}

/// Build the Google OAuth2 client from credentials.
fn build_oauth2_client(
    creds: &OAuthCredentials,
    token_url: &Url,
    redirect_uri: Option<&Url>,
) -> Result<GoogleOauth2Client, PortfolioError> {
    let mut client = OAuth2Client::new(ClientId::new(creds.client_id.expose_secret().to_string()))
        .set_client_secret(ClientSecret::new(
            creds.client_secret.expose_secret().to_string(),
        ))
        .set_token_uri(TokenUrl::new(token_url.as_str().to_string())?);
    if let Some(uri) = redirect_uri {
        client = client.set_redirect_uri(RedirectUrl::new(uri.as_str().to_string())?);
    }
    Ok(client)
}

pub(super) type GoogleOauth2Client = OAuth2Client<
    BasicErrorResponse,
    BasicTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;
