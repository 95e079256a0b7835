use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;

use crate::ai::gemini::{GeminiConfig, GEMINI_API_BASE};
use crate::ai::GenerationOptions;

/// Process-wide settings, read once at startup.
///
/// Sources, later ones winning: an optional `configuration.{toml,yaml,json}`
/// file, then environment variables (`OFFICIAL_EMAIL`, `PORT`,
/// `GEMINI_API_KEY`, ...). A `.env` file is loaded into the environment first.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub official_email: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub gemini_api_key: Option<SecretString>,
    #[serde(default = "default_model")]
    pub gemini_model: String,
    #[serde(default = "default_base_url")]
    pub gemini_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub ai_timeout_secs: u64,
    #[serde(default = "default_max_output_tokens")]
    pub ai_max_output_tokens: u32,
    #[serde(default = "default_temperature")]
    pub ai_temperature: f32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_port() -> u16 {
    3000
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    GEMINI_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_output_tokens() -> u32 {
    GenerationOptions::default().max_output_tokens
}

fn default_temperature() -> f32 {
    GenerationOptions::default().temperature
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let source = Config::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::default())
            .build()?;

        Self::from_config(source)
    }

    pub fn from_config(source: Config) -> Result<Self, ConfigError> {
        let config: Self = source.try_deserialize()?;
        if config.official_email.trim().is_empty() {
            return Err(ConfigError::Message(
                "official_email must not be empty".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            max_output_tokens: self.ai_max_output_tokens,
            temperature: self.ai_temperature,
        }
    }

    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.gemini_api_key.clone(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
            timeout: Duration::from_secs(self.ai_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn from_overrides(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let mut builder = Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value)?;
        }
        AppConfig::from_config(builder.build()?)
    }

    #[test]
    fn defaults_fill_optional_settings() {
        let config = from_overrides(&[("official_email", "dev@example.edu")]).unwrap();

        assert_eq!(config.official_email, "dev@example.edu");
        assert_eq!(config.port, 3000);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_base_url, GEMINI_API_BASE);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.generation_options(), GenerationOptions::default());
    }

    #[test]
    fn explicit_settings_override_defaults() {
        let config = from_overrides(&[
            ("official_email", "dev@example.edu"),
            ("port", "8081"),
            ("gemini_api_key", "secret"),
            ("ai_timeout_secs", "5"),
            ("log_format", "json"),
        ])
        .unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.log_format, LogFormat::Json);
        let gemini = config.gemini();
        assert_eq!(gemini.api_key.unwrap().expose_secret(), "secret");
        assert_eq!(gemini.timeout, Duration::from_secs(5));
    }

    #[test]
    fn official_email_is_required() {
        assert!(from_overrides(&[]).is_err());
        assert!(from_overrides(&[("official_email", "  ")]).is_err());
    }
}
