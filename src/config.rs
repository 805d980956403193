/// Service configuration, read once from the environment at startup.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Shared API key for `/astro/*`; `None` disables authentication
    pub api_key: Option<String>,
    /// Optional path to Swiss Ephemeris data files; without it the
    /// Moshier analytical ephemeris is used
    pub ephe_path: Option<String>,
    pub port: u16,
}

const DEFAULT_PORT: u16 = 8080;

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty(std::env::var("MC_API_KEY").ok()),
            ephe_path: non_empty(std::env::var("SWISSEPH_PATH").ok()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }

    /// Config with auth enabled, for tests
    pub fn with_key(key: &str) -> Self {
        Self {
            api_key: Some(key.to_string()),
            ephe_path: None,
            port: DEFAULT_PORT,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
