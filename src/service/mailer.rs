use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{error, info};
use url::Url;

use crate::api::GmailApi;
use crate::config::{SECRET_CLIENT_ID, SECRET_CLIENT_SECRET, SECRET_REFRESH_TOKEN};
use crate::crypto::SecretVault;
use crate::error::PortfolioError;
use crate::google_oauth::{GoogleOauthService, OAuthCredentials};
use crate::types::mail::OutgoingMail;
use crate::validation::ContactSubmission;

/// OAuth2 token exchange plus authenticated delivery.
#[async_trait]
pub trait MailProvider: Send + Sync {
    async fn access_token(&self, creds: &OAuthCredentials) -> Result<SecretString, PortfolioError>;

    async fn send(&self, access_token: &SecretString, mail: &OutgoingMail)
    -> Result<(), PortfolioError>;
}

/// Google OAuth2 token endpoint + Gmail REST send.
pub struct GmailProvider {
    oauth: GoogleOauthService,
    client: reqwest::Client,
    send_url: Url,
}

impl GmailProvider {
    pub fn new(oauth: GoogleOauthService, client: reqwest::Client, send_url: Url) -> Self {
        Self {
            oauth,
            client,
            send_url,
        }
    }
}

#[async_trait]
impl MailProvider for GmailProvider {
    async fn access_token(&self, creds: &OAuthCredentials) -> Result<SecretString, PortfolioError> {
        self.oauth.refresh_access_token(creds).await
    }

    async fn send(
        &self,
        access_token: &SecretString,
        mail: &OutgoingMail,
    ) -> Result<(), PortfolioError> {
        let body = mail.to_gmail_request()?;
        GmailApi::send(&self.client, &self.send_url, access_token.expose_secret(), &body).await
    }
}

/// Owner mailbox and confirmation behaviour.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub owner_email: String,
    pub send_confirmation: bool,
    pub confirmation_subject: String,
    pub confirmation_body: String,
}

pub const SUBJECT_SUFFIX: &str = "Portfolio";

pub struct MailDispatcher {
    vault: Arc<SecretVault>,
    provider: Arc<dyn MailProvider>,
    settings: MailSettings,
}

impl MailDispatcher {
    pub fn new(
        vault: Arc<SecretVault>,
        provider: Arc<dyn MailProvider>,
        settings: MailSettings,
    ) -> Self {
        Self {
            vault,
            provider,
            settings,
        }
    }

    /// Deliver a contact submission to the owner, then (if enabled) confirm to the
    /// submitter. Any failure fails the whole dispatch.
    pub async fn send_contact_mail(
        &self,
        submission: &ContactSubmission,
    ) -> Result<(), PortfolioError> {
        let (client_id, client_secret, refresh_token) = futures::try_join!(
            self.vault.reveal(SECRET_CLIENT_ID),
            self.vault.reveal(SECRET_CLIENT_SECRET),
            self.vault.reveal(SECRET_REFRESH_TOKEN),
        )
        .inspect_err(|e| error!(error = %e, "unable to retrieve mail credentials"))?;

        let creds = OAuthCredentials {
            client_id,
            client_secret,
            refresh_token,
        };
        let access_token = self
            .provider
            .access_token(&creds)
            .await
            .inspect_err(|e| error!(error = %e, "OAuth2 token exchange failed"))?;

        for mail in self.compose(submission) {
            self.provider
                .send(&access_token, &mail)
                .await
                .inspect_err(|e| error!(error = %e, "mail delivery failed"))?;
        }
        info!(
            confirmation = self.settings.send_confirmation,
            "contact mail dispatched"
        );
        Ok(())
    }

    /// Mails in delivery order: the contact mail first, then the confirmation.
    pub fn compose(&self, submission: &ContactSubmission) -> Vec<OutgoingMail> {
        let mut mails = vec![OutgoingMail {
            from: submission.email.clone(),
            to: self.settings.owner_email.clone(),
            reply_to: Some(submission.email.clone()),
            subject: format!(
                "{} {} - {SUBJECT_SUFFIX}",
                submission.name, submission.email
            ),
            body: submission.message.clone(),
        }];
        if self.settings.send_confirmation {
            mails.push(OutgoingMail {
                from: self.settings.owner_email.clone(),
                to: submission.email.clone(),
                reply_to: None,
                subject: self.settings.confirmation_subject.clone(),
                body: self.settings.confirmation_body.clone(),
            });
        }
        mails
    }
}
