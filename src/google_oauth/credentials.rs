use secrecy::SecretString;

/// The three decrypted values needed for a refresh-token grant.
#[derive(Clone)]
pub struct OAuthCredentials {
    pub client_id: SecretString,
    pub client_secret: SecretString,
    pub refresh_token: SecretString,
}
