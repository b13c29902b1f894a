use serde::Deserialize;

/// Server configuration as read from `config.yml`.
/// Every field is optional in the file; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Socket address the gRPC server binds to.
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// How long in-flight requests may run after a shutdown signal before the server is aborted.
    #[serde(default = "default_shutdown_grace_period_seconds")]
    pub shutdown_grace_period_seconds: u64,

    /// Settings for the outbound HTTP probe.
    #[serde(default)]
    pub probe: ProbeConfig,
}

/// Outbound probe configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProbeConfig {
    /// Upper bound on one outbound request, in seconds.
    /// Unset means the request is bounded only by the caller's gRPC deadline.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Follow HTTP redirects instead of reporting the 3xx status.
    #[serde(default)]
    pub follow_redirects: bool,

    /// User-Agent header sent with each probe.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_listen_address() -> String {
    "0.0.0.0:50055".to_string()
}

fn default_shutdown_grace_period_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("resource-tester/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            shutdown_grace_period_seconds: default_shutdown_grace_period_seconds(),
            probe: ProbeConfig::default(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            follow_redirects: false,
            user_agent: default_user_agent(),
        }
    }
}
