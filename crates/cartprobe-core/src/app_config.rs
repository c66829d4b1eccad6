use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration for the probe pipeline and its shells.
///
/// All fields are env-var driven with working defaults; see
/// [`crate::load_app_config`] for the variable names.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Per-request timeout applied to every storefront fetch.
    pub request_timeout_secs: u64,
    /// TCP connect timeout, separate from the full-request timeout.
    pub connect_timeout_secs: u64,
    /// Wall-clock ceiling for one whole probe run (discovery through checkout).
    pub probe_deadline_secs: u64,
    /// User-Agent sent on every request. Defaults to a desktop Chrome string;
    /// many storefront WAFs serve empty pages to non-browser agents.
    pub user_agent: String,
    /// When `false`, TLS certificate errors are ignored. Some target sites
    /// run on expired or self-signed certificates and are still worth probing.
    pub verify_tls: bool,
    /// In-flight fetch cap for the candidate-path walk. `1` keeps the walk
    /// strictly sequential, which is the polite default against rate limiters.
    pub candidate_concurrency: usize,
}
