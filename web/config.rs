use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

/// Server settings, read from flags, the environment, or a `.env` file.
#[derive(Parser, Debug, Clone)]
#[command(name = "maskpair-web")]
#[command(about = "HTTP API for storing original/mask image pairs", long_about = None)]
pub struct Config {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:maskpair.db")]
    pub database_url: String,

    #[arg(long, env = "MASKPAIR_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    #[arg(long, env = "MASKPAIR_CORS", value_enum, default_value_t = CorsPolicy::default())]
    pub cors: CorsPolicy,
}

/// Cross-origin policy applied to every route.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Any origin, with credentials, any method and any header. Development only.
    Permissive,
    /// No CORS headers at all; browsers fall back to same-origin.
    Disabled,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            CorsPolicy::Permissive
        } else {
            CorsPolicy::Disabled
        }
    }
}

impl CorsPolicy {
    pub fn layer(self) -> Option<CorsLayer> {
        match self {
            // Mirrors the request origin, since a wildcard origin cannot carry credentials.
            CorsPolicy::Permissive => Some(CorsLayer::very_permissive()),
            CorsPolicy::Disabled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, CorsPolicy};
    use clap::Parser;

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "maskpair-web",
            "--database-url",
            "sqlite::memory:",
            "--bind",
            "127.0.0.1:9000",
            "--cors",
            "disabled",
        ])
        .unwrap();

        assert_eq!("sqlite::memory:", config.database_url);
        assert_eq!(9000, config.bind.port());
        assert_eq!(CorsPolicy::Disabled, config.cors);
    }

    #[test]
    fn test_rejects_unknown_cors_policy() {
        assert!(Config::try_parse_from(["maskpair-web", "--cors", "sometimes"]).is_err());
    }

    #[test]
    fn test_layer() {
        assert!(CorsPolicy::Permissive.layer().is_some());
        assert!(CorsPolicy::Disabled.layer().is_none());
    }
}
