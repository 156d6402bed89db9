use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub chatbot: ChatbotSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_issuer() -> String { "rental-service".to_string() }
fn default_token_ttl_hours() -> i64 { 24 }
fn default_bcrypt_cost() -> u32 { bcrypt::DEFAULT_COST }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatbotSettings {
    /// Fixed seed for reply-pool selection; random when unset
    pub reply_seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `rental_service=debug,sqlx=warn`
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` for multi-line output, anything else for compact lines
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl LoggingSettings {
    /// Replace level and format with `LOG_LEVEL` / `LOG_FORMAT` style overrides
    pub fn with_overrides(mut self, level: Option<String>, format: Option<String>) -> Self {
        if let Some(level) = level.filter(|l| !l.trim().is_empty()) {
            self.level = level;
        }
        if let Some(format) = format.filter(|f| !f.trim().is_empty()) {
            self.format = format;
        }
        self
    }

    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RENTAL__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RENTAL__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("RENTAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }
}

/// Apply the conventional `DATABASE_URL` and `JWT_SECRET` variables on top of
/// whatever the files and prefixed variables set
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> Result<Settings, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let settings = parse(
            r#"
            [database]
            url = "postgres://localhost/rentals"

            [auth]
            jwt_secret = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.auth.issuer, "rental-service");
        assert_eq!(settings.auth.token_ttl_hours, 24);
        assert_eq!(settings.auth.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(settings.chatbot.reply_seed, None);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_reply_seed_is_read() {
        let settings = parse(
            r#"
            [database]
            url = "postgres://localhost/rentals"

            [auth]
            jwt_secret = "secret"

            [chatbot]
            reply_seed = 42
            "#,
        )
        .unwrap();

        assert_eq!(settings.chatbot.reply_seed, Some(42));
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let result = parse(
            r#"
            [database]
            url = "postgres://localhost/rentals"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_default_logging() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "compact");
        assert!(!LoggingSettings::default().is_pretty());
    }

    #[test]
    fn test_logging_section_is_read() {
        let settings = parse(
            r#"
            [database]
            url = "postgres://localhost/rentals"

            [auth]
            jwt_secret = "secret"

            [logging]
            level = "rental_service=debug"
            format = "Pretty"
            "#,
        )
        .unwrap();

        assert_eq!(settings.logging.level, "rental_service=debug");
        assert!(settings.logging.is_pretty());
    }

    #[test]
    fn test_logging_env_overrides() {
        let logging = LoggingSettings::default().with_overrides(Some("warn".to_string()), Some("pretty".to_string()));
        assert_eq!(logging.level, "warn");
        assert!(logging.is_pretty());

        let logging = LoggingSettings::default().with_overrides(None, Some("  ".to_string()));
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "compact");
    }
}
