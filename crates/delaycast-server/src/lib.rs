//! Delaycast Server
//!
//! HTTP boundary over the Delaycast services: loads models, serves
//! predictions and exposes the inference history as JSON.

pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use cli::Cli;
pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
