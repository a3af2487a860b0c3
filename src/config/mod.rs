use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    /// Origins allowed to call the API. Empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

pub const DEFAULT_IDEMPOTENCY_WINDOW_SECS: u64 = 300;

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub idempotency_window_secs: u64,
    /// Drop keyed reactions once they age past the idempotency window.
    pub prune_expired_idempotent_reactions: bool,
    pub default_comment_limit: usize,
    pub max_comment_limit: usize,
}

impl StoreConfig {
    /// Falls back to the default window when the configured value does not
    /// fit a `chrono::Duration`.
    pub fn idempotency_window(&self) -> chrono::Duration {
        i64::try_from(self.idempotency_window_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or_else(|| {
                tracing::warn!(
                    "store.idempotency_window_secs = {} is out of range. Using {}.",
                    self.idempotency_window_secs,
                    DEFAULT_IDEMPOTENCY_WINDOW_SECS
                );
                chrono::Duration::seconds(DEFAULT_IDEMPOTENCY_WINDOW_SECS as i64)
            })
    }

    /// Upper bound for a comment page. A configured 0 is raised to 1.
    pub fn effective_max_comment_limit(&self) -> usize {
        if self.max_comment_limit == 0 {
            tracing::warn!("store.max_comment_limit = 0 would return empty pages. Using 1.");
            return 1;
        }
        self.max_comment_limit
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            idempotency_window_secs: DEFAULT_IDEMPOTENCY_WINDOW_SECS,
            prune_expired_idempotent_reactions: true,
            default_comment_limit: 10,
            max_comment_limit: 100,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 4000)?
            .set_default("store.idempotency_window_secs", DEFAULT_IDEMPOTENCY_WINDOW_SECS)?
            .set_default("store.prune_expired_idempotent_reactions", true)?
            .set_default("store.default_comment_limit", 10)?
            .set_default("store.max_comment_limit", 100)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with NOTICEBOARD__ prefix, double underscore separates levels)
            .add_source(
                Environment::with_prefix("NOTICEBOARD")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 4000,
            },
            cors: CorsConfig::default(),
            store: StoreConfig::default(),
        }
    }
}
