//! Server settings loaded from the environment
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_SECRET_KEY: &str = "your-secret-key-for-development-only";

#[derive(Clone)]
pub struct Settings {
    pub api_prefix: String,
    pub project_name: String,
    pub debug: bool,
    pub port: u16,
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub cors_origins: Vec<String>,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub interaction_timeout: Duration,
    pub blockchain_service_url: String,
    pub blockchain_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_prefix: "/api".to_string(),
            project_name: "Smart Contract Intelligence Platform".to_string(),
            debug: false,
            port: 8000,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            // 8 days
            access_token_expire_minutes: 60 * 24 * 8,
            cors_origins: vec!["http://localhost:3000".to_string()],
            openai_api_key: String::new(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            llm_model: "gpt-4-turbo".to_string(),
            llm_timeout: Duration::from_secs(60),
            interaction_timeout: Duration::from_secs(30),
            blockchain_service_url: "http://localhost:8080".to_string(),
            blockchain_timeout: Duration::from_secs(30),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_prefix", &self.api_prefix)
            .field("project_name", &self.project_name)
            .field("debug", &self.debug)
            .field("port", &self.port)
            .field("secret_key", &"***")
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .field("cors_origins", &self.cors_origins)
            .field("openai_api_key", &"***")
            .field("openai_base_url", &self.openai_base_url)
            .field("llm_model", &self.llm_model)
            .field("llm_timeout", &self.llm_timeout)
            .field("interaction_timeout", &self.interaction_timeout)
            .field("blockchain_service_url", &self.blockchain_service_url)
            .field("blockchain_timeout", &self.blockchain_timeout)
            .finish()
    }
}

impl Settings {
    /// Read settings from the process environment (after loading `.env`)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; missing keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| lookup(key).unwrap_or(default);
        let seconds = |key: &str, default: Duration| {
            Duration::from_secs(parse_or(key, lookup(key), default.as_secs()))
        };

        let secret_key = match lookup("SECRET_KEY") {
            Some(key) if !key.is_empty() => key,
            _ => {
                warn!("SECRET_KEY not set, using the development key");
                defaults.secret_key.clone()
            }
        };

        Self {
            api_prefix: text("API_PREFIX", defaults.api_prefix),
            project_name: text("PROJECT_NAME", defaults.project_name),
            debug: lookup("DEBUG")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.debug),
            port: parse_or("PORT", lookup("PORT"), defaults.port),
            secret_key,
            access_token_expire_minutes: parse_or(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                lookup("ACCESS_TOKEN_EXPIRE_MINUTES"),
                defaults.access_token_expire_minutes,
            ),
            cors_origins: lookup("CORS_ORIGINS")
                .map(|v| parse_origins(&v))
                .filter(|origins| !origins.is_empty())
                .unwrap_or(defaults.cors_origins),
            openai_api_key: text("OPENAI_API_KEY", defaults.openai_api_key),
            openai_base_url: text("OPENAI_BASE_URL", defaults.openai_base_url),
            llm_model: text("LLM_MODEL", defaults.llm_model),
            llm_timeout: seconds("LLM_TIMEOUT_SECONDS", defaults.llm_timeout),
            interaction_timeout: seconds(
                "INTERACTION_TIMEOUT_SECONDS",
                defaults.interaction_timeout,
            ),
            blockchain_service_url: text(
                "BLOCKCHAIN_SERVICE_URL",
                defaults.blockchain_service_url,
            ),
            blockchain_timeout: seconds("BLOCKCHAIN_TIMEOUT_SECONDS", defaults.blockchain_timeout),
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

fn parse_or<T: FromStr + Copy>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value for {}: {:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "t")
}

/// Accepts `a,b,c` or a JSON list `["a", "b"]`
pub fn parse_origins(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(trimmed) {
            return list;
        }
        warn!("CORS_ORIGINS is not a valid JSON list, reading it as comma separated");
    }

    trimmed
        .trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .map(|origin| origin.trim().trim_matches('"').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
