pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError, ServerConfig};
pub use error::ApiError;
pub use routes::app;
pub use state::AppState;
