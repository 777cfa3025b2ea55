pub mod api;
pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod google_oauth;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod types;
pub mod validation;

pub use error::PortfolioError;
pub use router::{PortfolioState, portfolio_router};
