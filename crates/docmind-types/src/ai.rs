//! AI driver selection and provider settings.

use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Hosted model vendor selected by the `AI_DRIVER` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiDriver {
    /// OpenAI or any OpenAI-compatible API (DeepSeek, vLLM, ...).
    #[serde(rename = "openai")]
    OpenAi,
    Gemini,
    Ollama,
}

impl fmt::Display for AiDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiDriver::OpenAi => write!(f, "openai"),
            AiDriver::Gemini => write!(f, "gemini"),
            AiDriver::Ollama => write!(f, "ollama"),
        }
    }
}

impl FromStr for AiDriver {
    type Err = String;

    /// Case-insensitive lookup; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(AiDriver::OpenAi),
            "gemini" => Ok(AiDriver::Gemini),
            "ollama" => Ok(AiDriver::Ollama),
            _ => Err(s.to_string()),
        }
    }
}

/// Language used for user-facing provider failure messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLocale {
    #[default]
    Zh,
    En,
}

impl fmt::Display for ErrorLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorLocale::Zh => write!(f, "zh"),
            ErrorLocale::En => write!(f, "en"),
        }
    }
}

impl FromStr for ErrorLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zh" | "zh-cn" | "zh_cn" => Ok(ErrorLocale::Zh),
            "en" | "en-us" | "en_us" => Ok(ErrorLocale::En),
            other => Err(format!("invalid error locale: '{other}'")),
        }
    }
}

/// Resolved AI provider settings.
///
/// The driver is kept as the raw configured string so that an unsupported
/// value can be reported back verbatim. Blank values are normalized to
/// `None` by the loader.
#[derive(Debug, Clone, Default)]
pub struct AiSettings {
    pub driver: Option<String>,
    pub completion_model: Option<String>,
    pub embedding_model: Option<String>,
    pub openai_api_key: Option<SecretString>,
    pub openai_api_url: Option<String>,
    pub gemini_api_key: Option<SecretString>,
    pub ollama_api_url: Option<String>,
    pub error_locale: ErrorLocale,
}

impl AiSettings {
    /// AI counts as configured as soon as a driver is named.
    pub fn is_configured(&self) -> bool {
        self.driver
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_parse_is_case_insensitive() {
        assert_eq!("OpenAI".parse::<AiDriver>().unwrap(), AiDriver::OpenAi);
        assert_eq!("GEMINI".parse::<AiDriver>().unwrap(), AiDriver::Gemini);
        assert_eq!(" ollama ".parse::<AiDriver>().unwrap(), AiDriver::Ollama);
    }

    #[test]
    fn test_driver_parse_unknown_returns_raw() {
        let err = "anthropic".parse::<AiDriver>().unwrap_err();
        assert_eq!(err, "anthropic");
    }

    #[test]
    fn test_driver_roundtrip() {
        for driver in [AiDriver::OpenAi, AiDriver::Gemini, AiDriver::Ollama] {
            let parsed: AiDriver = driver.to_string().parse().unwrap();
            assert_eq!(parsed, driver);
        }
    }

    #[test]
    fn test_locale_default_is_zh() {
        assert_eq!(ErrorLocale::default(), ErrorLocale::Zh);
        assert_eq!("EN".parse::<ErrorLocale>().unwrap(), ErrorLocale::En);
        assert!("fr".parse::<ErrorLocale>().is_err());
    }

    #[test]
    fn test_is_configured() {
        let mut settings = AiSettings::default();
        assert!(!settings.is_configured());
        settings.driver = Some("   ".to_string());
        assert!(!settings.is_configured());
        settings.driver = Some("openai".to_string());
        assert!(settings.is_configured());
    }
}
