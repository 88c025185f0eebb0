//! Settings loader for Docmind.
//!
//! Reads an optional TOML file (`docmind.toml` by default) and overlays the
//! process environment on top of it. Environment variables win over file
//! values, and blank strings count as unset in both places.

use std::collections::HashMap;
use std::path::Path;

use secrecy::SecretString;
use serde::Deserialize;

use docmind_types::ai::{AiSettings, ErrorLocale};
use docmind_types::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "docmind.toml";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;

/// Where environment variables come from.
///
/// Tests pass a `HashMap` instead of mutating the process environment.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// The real process environment.
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    ai: AiSection,
    server: ServerSection,
    database: DatabaseSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct AiSection {
    driver: Option<String>,
    completion_model: Option<String>,
    embedding_model: Option<String>,
    openai_api_key: Option<String>,
    openai_api_url: Option<String>,
    gemini_api_key: Option<String>,
    ollama_api_url: Option<String>,
    error_locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DatabaseSection {
    url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Fully resolved application settings.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub ai: AiSettings,
    pub server: ServerSettings,
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| ConfigError::Missing("DATABASE_URL".to_string()))
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Environment value if set and non-blank, else the file value.
fn pick(env: &impl EnvSource, key: &str, file: Option<String>) -> Option<String> {
    blank_to_none(env.get(key)).or_else(|| blank_to_none(file))
}

fn resolve(file: FileConfig, env: &impl EnvSource) -> Result<AppConfig, ConfigError> {
    let ai = file.ai;
    let error_locale = match pick(env, "AI_ERROR_LOCALE", ai.error_locale) {
        Some(raw) => raw.parse::<ErrorLocale>().map_err(|message| ConfigError::Invalid {
            key: "AI_ERROR_LOCALE".to_string(),
            message,
        })?,
        None => ErrorLocale::default(),
    };

    let ai = AiSettings {
        driver: pick(env, "AI_DRIVER", ai.driver),
        completion_model: pick(env, "AI_COMPLETION_MODEL", ai.completion_model),
        embedding_model: pick(env, "AI_EMBEDDING_MODEL", ai.embedding_model),
        openai_api_key: pick(env, "OPENAI_API_KEY", ai.openai_api_key).map(SecretString::from),
        openai_api_url: pick(env, "OPENAI_API_URL", ai.openai_api_url),
        gemini_api_key: pick(env, "GEMINI_API_KEY", ai.gemini_api_key).map(SecretString::from),
        ollama_api_url: pick(env, "OLLAMA_API_URL", ai.ollama_api_url),
        error_locale,
    };

    let server = ServerSettings {
        host: blank_to_none(file.server.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: file.server.port.unwrap_or(DEFAULT_PORT),
    };

    Ok(AppConfig {
        ai,
        server,
        database_url: pick(env, "DATABASE_URL", file.database.url),
    })
}

/// Load settings from `path` (if it exists) overlaid with `env`.
///
/// A missing file yields defaults; an unreadable or malformed one is an error.
pub async fn load_config(path: &Path, env: &impl EnvSource) -> Result<AppConfig, ConfigError> {
    let file = match tokio::fs::read_to_string(path).await {
        Ok(content) => toml::from_str::<FileConfig>(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using environment only", path.display());
            FileConfig::default()
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    resolve(file, env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    async fn write(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        tokio::fs::write(&path, content).await.unwrap();
        path
    }

    #[tokio::test]
    async fn load_config_missing_file_uses_env() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(
            &tmp.path().join("absent.toml"),
            &env(&[("AI_DRIVER", "ollama"), ("AI_COMPLETION_MODEL", "llama3.2")]),
        )
        .await
        .unwrap();

        assert_eq!(config.ai.driver.as_deref(), Some("ollama"));
        assert_eq!(config.ai.completion_model.as_deref(), Some("llama3.2"));
        assert_eq!(config.server, ServerSettings::default());
        assert_eq!(config.ai.error_locale, ErrorLocale::Zh);
        assert!(config.database_url.is_none());
    }

    #[tokio::test]
    async fn load_config_env_overrides_file() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            r#"
[ai]
driver = "openai"
completion_model = "gpt-4o-mini"
openai_api_key = "sk-file"
error_locale = "en"

[server]
port = 8080

[database]
url = "postgres://file/docmind"
"#,
        )
        .await;

        let config = load_config(
            &path,
            &env(&[("OPENAI_API_KEY", "sk-env"), ("DATABASE_URL", "postgres://env/docmind")]),
        )
        .await
        .unwrap();

        assert_eq!(config.ai.driver.as_deref(), Some("openai"));
        assert_eq!(config.ai.openai_api_key.unwrap().expose_secret(), "sk-env");
        assert_eq!(config.ai.error_locale, ErrorLocale::En);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.database_url.as_deref(), Some("postgres://env/docmind"));
    }

    #[tokio::test]
    async fn load_config_blank_env_does_not_override() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "[ai]\ndriver = \"gemini\"\n").await;

        let config = load_config(&path, &env(&[("AI_DRIVER", "   "), ("AI_EMBEDDING_MODEL", "")]))
            .await
            .unwrap();
        assert_eq!(config.ai.driver.as_deref(), Some("gemini"));
        assert!(config.ai.embedding_model.is_none());
    }

    #[tokio::test]
    async fn load_config_malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "this is not { valid toml !!!").await;

        let err = load_config(&path, &env(&[])).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn load_config_rejects_unknown_locale() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(&tmp.path().join("none.toml"), &env(&[("AI_ERROR_LOCALE", "fr")]))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "AI_ERROR_LOCALE"));
    }

    #[test]
    fn require_database_url_reports_missing_variable() {
        let err = AppConfig::default().require_database_url().unwrap_err();
        assert_eq!(err.to_string(), "DATABASE_URL is not set");
    }
}
