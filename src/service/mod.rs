pub mod catalog;
pub mod mailer;
pub mod risk_gate;

pub use catalog::{Catalog, ResumeImages};
pub use mailer::{GmailProvider, MailDispatcher, MailProvider, MailSettings};
pub use risk_gate::{RecaptchaAssessor, RiskAssessor, RiskGate};
