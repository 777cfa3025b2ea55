pub mod assessment;
pub mod mail;
