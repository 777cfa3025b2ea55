use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use serde::Serialize;

use crate::error::PortfolioError;
use crate::validation::contact::is_valid_email;

/// A plain-text message ready to be rendered as RFC 5322.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Gmail `users.messages.send` body.
#[derive(Debug, Serialize)]
pub struct GmailSendRequest {
    pub raw: String,
}

impl OutgoingMail {
    /// Render headers and a base64 body. Addresses must be well-formed; CR/LF is
    /// stripped from the subject.
    pub fn to_rfc5322(&self) -> Result<String, PortfolioError> {
        for addr in [Some(&self.from), Some(&self.to), self.reply_to.as_ref()]
            .into_iter()
            .flatten()
        {
            if !is_valid_email(addr) {
                return Err(PortfolioError::InvalidMail(format!(
                    "malformed address `{addr}`"
                )));
            }
        }

        let mut out = String::new();
        out.push_str(&format!("From: {}\r\n", self.from));
        out.push_str(&format!("To: {}\r\n", self.to));
        if let Some(reply_to) = &self.reply_to {
            out.push_str(&format!("Reply-To: {reply_to}\r\n"));
        }
        out.push_str(&format!("Subject: {}\r\n", encode_header(&self.subject)));
        out.push_str("MIME-Version: 1.0\r\n");
        out.push_str("Content-Type: text/plain; charset=UTF-8\r\n");
        out.push_str("Content-Transfer-Encoding: base64\r\n\r\n");

        let encoded = STANDARD.encode(self.body.as_bytes());
        // base64 output is ASCII, so chunking by bytes is safe
        for line in encoded.as_bytes().chunks(76) {
            out.push_str(std::str::from_utf8(line).unwrap_or_default());
            out.push_str("\r\n");
        }
        Ok(out)
    }

    pub fn to_gmail_request(&self) -> Result<GmailSendRequest, PortfolioError> {
        Ok(GmailSendRequest {
            raw: URL_SAFE.encode(self.to_rfc5322()?),
        })
    }
}

/// Single-line header value; non-ASCII becomes an RFC 2047 encoded-word.
fn encode_header(value: &str) -> String {
    let flat: String = value
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();
    if flat.is_ascii() {
        flat
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(flat.as_bytes()))
    }
}
