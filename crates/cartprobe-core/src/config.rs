use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Default User-Agent: a current desktop Chrome string. Storefront WAFs and
/// anti-bot layers frequently serve stripped or empty markup to anything
/// that does not look like a browser.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but unparseable.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but unparseable.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(default),
            Ok(raw) => match raw.as_str() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" => Ok(false),
                other => Err(ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: format!("expected a boolean, got \"{other}\""),
                }),
            },
        }
    };

    let env = parse_environment(&or_default("CARTPROBE_ENV", "development"));
    let bind_addr = parse_addr("CARTPROBE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("CARTPROBE_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("CARTPROBE_REQUEST_TIMEOUT_SECS", "8")?;
    let connect_timeout_secs = parse_u64("CARTPROBE_CONNECT_TIMEOUT_SECS", "5")?;
    let probe_deadline_secs = parse_u64("CARTPROBE_PROBE_DEADLINE_SECS", "120")?;
    let user_agent = or_default("CARTPROBE_USER_AGENT", DEFAULT_USER_AGENT);
    let verify_tls = parse_bool("CARTPROBE_VERIFY_TLS", true)?;

    let candidate_concurrency = parse_usize("CARTPROBE_CANDIDATE_CONCURRENCY", "1")?;
    if candidate_concurrency == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CARTPROBE_CANDIDATE_CONCURRENCY".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        request_timeout_secs,
        connect_timeout_secs,
        probe_deadline_secs,
        user_agent,
        verify_tls,
        candidate_concurrency,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.request_timeout_secs, 8);
        assert_eq!(cfg.connect_timeout_secs, 5);
        assert_eq!(cfg.probe_deadline_secs, 120);
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
        assert!(cfg.verify_tls);
        assert_eq!(cfg.candidate_concurrency, 1);
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("CARTPROBE_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARTPROBE_BIND_ADDR"),
            "expected InvalidEnvVar(CARTPROBE_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_request_timeout_override() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("CARTPROBE_REQUEST_TIMEOUT_SECS", "3");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, 3);
    }

    #[test]
    fn build_app_config_request_timeout_invalid() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("CARTPROBE_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARTPROBE_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(CARTPROBE_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_user_agent_override() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("CARTPROBE_USER_AGENT", "custom-agent/2.0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.user_agent, "custom-agent/2.0");
    }

    #[test]
    fn build_app_config_verify_tls_accepts_false() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("CARTPROBE_VERIFY_TLS", "false");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(!cfg.verify_tls);
    }

    #[test]
    fn build_app_config_verify_tls_rejects_garbage() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("CARTPROBE_VERIFY_TLS", "maybe");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARTPROBE_VERIFY_TLS"),
            "expected InvalidEnvVar(CARTPROBE_VERIFY_TLS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_candidate_concurrency_override() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("CARTPROBE_CANDIDATE_CONCURRENCY", "4");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.candidate_concurrency, 4);
    }

    #[test]
    fn build_app_config_candidate_concurrency_rejects_zero() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("CARTPROBE_CANDIDATE_CONCURRENCY", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CARTPROBE_CANDIDATE_CONCURRENCY"),
            "expected InvalidEnvVar(CARTPROBE_CANDIDATE_CONCURRENCY), got: {result:?}"
        );
    }
}
