//! Host-environment signals.
//!
//! The embedding layer captures these once and injects them; simulation
//! resolution is then a pure function of the injected data.

/// Snapshot of the hosting environment.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Full URL of the page hosting the widget.
    pub page_url: String,

    /// User-agent string reported by the host.
    pub user_agent: String,

    /// Hostname of the hosting page.
    pub hostname: String,

    /// Raw query string of the hosting page.
    pub query: String,

    /// Explicit simulation opt-in from the embedder.
    pub force_local: bool,
}

/// API keys that always select simulation.
const PLACEHOLDER_KEYS: &[&str] = &["demo-api-key", "test-key"];

/// Query-string marker that forces simulation.
const DEV_QUERY_MARKER: &str = "feedbackly-dev=true";

fn is_local_host(host: &str) -> bool {
    host == "localhost" || host == "127.0.0.1" || host.contains("local")
}

impl Environment {
    /// Decide whether a client for this key and endpoint must simulate.
    ///
    /// Simulation is selected by: an absent or placeholder API key, a local
    /// hosting page, an endpoint URL resolving to a local host, the dev
    /// query marker, or the explicit opt-in flag.
    pub fn resolve_simulation(&self, api_key: &str, api_url: &str) -> bool {
        if self.force_local || self.query.contains(DEV_QUERY_MARKER) {
            return true;
        }
        if api_key.is_empty() || PLACEHOLDER_KEYS.contains(&api_key) {
            return true;
        }
        if !self.hostname.is_empty() && is_local_host(&self.hostname) {
            return true;
        }
        match reqwest::Url::parse(api_url) {
            Ok(url) => url.host_str().map(is_local_host).unwrap_or(false),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const API_URL: &str = "https://api.feedbackly.com";

    fn production_env() -> Environment {
        Environment {
            page_url: "https://example.com/pricing".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            hostname: "example.com".to_string(),
            query: "utm_source=mail".to_string(),
            force_local: false,
        }
    }

    #[test]
    fn test_production_environment_does_not_simulate() {
        assert!(!production_env().resolve_simulation("key-123", API_URL));
    }

    #[test]
    fn test_placeholder_keys_simulate() {
        let env = production_env();
        assert!(env.resolve_simulation("", API_URL));
        assert!(env.resolve_simulation("demo-api-key", API_URL));
        assert!(env.resolve_simulation("test-key", API_URL));
    }

    #[test]
    fn test_local_hostnames_simulate() {
        for hostname in ["localhost", "127.0.0.1", "myapp.local", "local.example.com"] {
            let env = Environment {
                hostname: hostname.to_string(),
                ..production_env()
            };
            assert!(env.resolve_simulation("key-123", API_URL), "{hostname}");
        }
    }

    #[test]
    fn test_empty_hostname_is_not_local() {
        let env = Environment {
            hostname: String::new(),
            ..production_env()
        };
        assert!(!env.resolve_simulation("key-123", API_URL));
    }

    #[test]
    fn test_dev_query_marker_simulates() {
        let env = Environment {
            query: "a=1&feedbackly-dev=true".to_string(),
            ..production_env()
        };
        assert!(env.resolve_simulation("key-123", API_URL));
    }

    #[test]
    fn test_force_local_simulates() {
        let env = Environment {
            force_local: true,
            ..production_env()
        };
        assert!(env.resolve_simulation("key-123", API_URL));
    }

    #[test]
    fn test_local_endpoint_simulates() {
        let env = production_env();
        assert!(env.resolve_simulation("key-123", "http://localhost:3000"));
        assert!(env.resolve_simulation("key-123", "http://127.0.0.1:8080/api"));
        assert!(!env.resolve_simulation("key-123", "https://api.example.com"));
    }

    #[test]
    fn test_unparseable_endpoint_does_not_simulate() {
        assert!(!production_env().resolve_simulation("key-123", "not a url"));
    }
}
