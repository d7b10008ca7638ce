use std::str::FromStr;

const DEFAULT_JWT_SECRET: &str = "dev-secret-key";

/// Settings for the external chat-completion API
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

/// Server configuration loaded from environment variables
///
/// | Env Var                    | Default                       |
/// |----------------------------|-------------------------------|
/// | `HOST`                     | `0.0.0.0`                     |
/// | `PORT`                     | `3000`                        |
/// | `DATABASE_URL`             | unset (in-memory store)       |
/// | `DATABASE_MAX_CONNECTIONS` | `5`                           |
/// | `JWT_SECRET`               | `dev-secret-key`              |
/// | `JWT_EXPIRY_HOURS`         | `8`                           |
/// | `OPENAI_API_KEY`           | unset (assistant disabled)    |
/// | `OPENAI_BASE_URL`          | `https://api.openai.com/v1`   |
/// | `OPENAI_MODEL`             | `gpt-3.5-turbo`               |
/// | `OPENAI_TEMPERATURE`       | `0.7`                         |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    /// `None` when no API key is configured
    pub llm: Option<LlmConfig>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set, using development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let llm = match var("OPENAI_API_KEY") {
            Some(api_key) => Some(LlmConfig {
                api_key,
                base_url: var("OPENAI_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
                model: var("OPENAI_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
                temperature: parse_or("OPENAI_TEMPERATURE", var("OPENAI_TEMPERATURE"), 0.7),
            }),
            None => None,
        };

        Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", var("PORT"), 3000),
            database_url: var("DATABASE_URL"),
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                var("DATABASE_MAX_CONNECTIONS"),
                5,
            ),
            jwt_secret,
            jwt_expiry_hours: parse_or("JWT_EXPIRY_HOURS", var("JWT_EXPIRY_HOURS"), 8),
            llm,
        }
    }

    /// Configuration for tests: in-memory store, fixed secret, no LLM
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: None,
            database_max_connections: 1,
            jwt_secret: "test-secret".to_string(),
            jwt_expiry_hours: 8,
            llm: None,
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "Invalid value, using default");
            default
        }),
        None => default,
    }
}
