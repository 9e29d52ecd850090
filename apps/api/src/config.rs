use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_MODEL};

const DEFAULT_ORIGINS: &[&str] = &[
    "https://boikanyomz23.appsmith.com",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

const DEFAULT_EXTENSIONS: &[&str] = &["pdf", "docx", "doc", "txt"];

/// Application configuration loaded from environment variables.
/// Startup fails if the Gemini credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    /// Lower-cased, without the leading dot.
    pub allowed_extensions: Vec<String>,
    pub max_upload_bytes: usize,
    /// CV text beyond this many characters is cut before prompt construction.
    pub max_cv_chars: usize,
    /// Upper bound on blocking worker threads (gateway calls, document parsing).
    pub gateway_workers: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            port: parse_env("PORT", 8000)?,
            allowed_origins: optional_env("ALLOWED_ORIGINS")
                .map(|raw| parse_list(&raw, false))
                .unwrap_or_else(|| to_owned_list(DEFAULT_ORIGINS)),
            allowed_extensions: optional_env("ALLOWED_EXTENSIONS")
                .map(|raw| parse_list(&raw, true))
                .unwrap_or_else(|| to_owned_list(DEFAULT_EXTENSIONS)),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            max_cv_chars: parse_env("MAX_CV_CHARS", 40_000)?,
            gateway_workers: parse_env("GATEWAY_WORKERS", 16)?,
        })
    }

    pub fn is_extension_allowed(&self, ext: &str) -> bool {
        self.allowed_extensions.iter().any(|allowed| allowed == ext)
    }
}

fn require_env(key: &str) -> Result<String> {
    optional_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

/// Splits a comma-separated list, dropping blanks. Extensions also lose a leading dot.
fn parse_list(raw: &str, as_extensions: bool) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            if as_extensions {
                item.trim_start_matches('.').to_lowercase()
            } else {
                item.to_string()
            }
        })
        .collect()
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        gemini_api_key: "test-key".to_string(),
        gemini_model: "gemini-test".to_string(),
        gemini_api_base: "http://127.0.0.1:9".to_string(),
        port: 8000,
        allowed_origins: to_owned_list(DEFAULT_ORIGINS),
        allowed_extensions: to_owned_list(DEFAULT_EXTENSIONS),
        max_upload_bytes: 1024 * 1024,
        max_cv_chars: 40_000,
        gateway_workers: 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_trims_and_drops_blanks() {
        let origins = parse_list(" http://a.example , ,http://b.example,", false);
        assert_eq!(origins, vec!["http://a.example", "http://b.example"]);
    }

    #[test]
    fn test_parse_list_normalizes_extensions() {
        let exts = parse_list(".PDF, Docx ,txt", true);
        assert_eq!(exts, vec!["pdf", "docx", "txt"]);
    }

    #[test]
    fn test_default_extension_allow_list() {
        let config = test_config();
        for ext in ["pdf", "docx", "doc", "txt"] {
            assert!(config.is_extension_allowed(ext), "{ext} should be allowed");
        }
        assert!(!config.is_extension_allowed("png"));
        assert!(!config.is_extension_allowed("PDF"));
    }
}
