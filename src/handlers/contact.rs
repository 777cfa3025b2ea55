use axum::{Json, extract::State};
use serde::Serialize;
use tracing::info;

use crate::middleware::RiskChecked;
use crate::validation::{ContactForm, validate_contact};
use crate::{PortfolioError, router::PortfolioState};

pub const MSG_MAIL_SENT: &str = "Email successfully sent";

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

/// POST /api/mail -> gate, sanitize + validate, then dispatch.
///
/// Field errors answer 200 with the error list (see `PortfolioError::Validation`).
pub async fn contact_mail_handler(
    State(state): State<PortfolioState>,
    RiskChecked(form): RiskChecked<ContactForm>,
) -> Result<Json<MessageBody>, PortfolioError> {
    let submission = validate_contact(&form).map_err(|errors| {
        info!(fields = errors.len(), "contact form failed validation");
        PortfolioError::Validation(errors)
    })?;

    state.mailer.send_contact_mail(&submission).await?;

    Ok(Json(MessageBody {
        message: MSG_MAIL_SENT,
    }))
}
