pub mod app_config;
pub mod model;

pub use app_config::{AppConfig, ConfigError, load_config};
pub use model::{ProbeConfig, ServerConfig};
