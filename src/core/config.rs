//! Configuration management for the Planted API server.
//!
//! All settings come from environment variables (optionally seeded from a
//! `.env` file by `main`). The resulting [`AppConfig`] is built once at
//! startup and handed to handlers through the shared application state.

use anyhow::{Context, Result};

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 3000;

/// Environment name when `APP_ENVIRONMENT` is unset.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Default base URL for the OpenAI-compatible completion API.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Model used for plan and recipe generation.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Model used for recipe search, which asks for structured JSON output.
pub const DEFAULT_SEARCH_MODEL: &str = "gpt-4o";

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration (host, port)
    pub server: ServerConfig,

    /// Completion API settings
    pub openai: OpenAiConfig,

    /// Optional timeout for the upstream call. `None` leaves the client default.
    pub upstream_timeout_secs: Option<u64>,

    /// Deployment environment name reported by the health endpoint
    pub environment: String,
}

/// Server-specific configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Completion API configuration.
#[derive(Clone)]
pub struct OpenAiConfig {
    /// Bearer credential. AI endpoints answer 503 while this is unset.
    pub api_key: Option<String>,

    /// Base URL; `/chat/completions` is appended per call
    pub api_base: String,

    /// Model for nutrition, plant-care and recipe generation
    pub model: String,

    /// Model for recipe search
    pub search_model: String,
}

// Keeps the credential out of logs.
impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("search_model", &self.search_model)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            openai: OpenAiConfig::default(),
            upstream_timeout_secs: None,
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            search_model: DEFAULT_SEARCH_MODEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use planted_api::core::config::AppConfig;
    ///
    /// let config = AppConfig::from_env().expect("invalid configuration");
    /// println!("listening on port {}", config.server.port);
    /// ```
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unset variables keep their defaults. Blank values are treated as unset,
    /// so `OPENAI_API_KEY=` disables the AI endpoints just like omitting it.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = AppConfig::default();

        if let Some(host) = var("HOST") {
            config.server.host = host;
        }

        if let Some(port) = var("PORT") {
            config.server.port = port
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", port))?;
        }

        config.openai.api_key = var("OPENAI_API_KEY");

        if let Some(api_base) = var("OPENAI_API_BASE") {
            config.openai.api_base = api_base.trim_end_matches('/').to_string();
        }

        if let Some(model) = var("OPENAI_MODEL") {
            config.openai.model = model;
        }

        if let Some(model) = var("OPENAI_SEARCH_MODEL") {
            config.openai.search_model = model;
        }

        if let Some(timeout) = var("UPSTREAM_TIMEOUT_SECS") {
            let secs = timeout.parse::<u64>().with_context(|| {
                format!(
                    "UPSTREAM_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    timeout
                )
            })?;
            config.upstream_timeout_secs = Some(secs);
        }

        if let Some(environment) = var("APP_ENVIRONMENT") {
            config.environment = environment;
        }

        Ok(config)
    }

    /// Whether a completion API credential is present.
    pub fn has_api_key(&self) -> bool {
        self.openai.api_key.is_some()
    }
}
