use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Nothing is required: without a Gemini key the service runs on the heuristic estimator.
#[derive(Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub llm_max_retries: u32,
    pub llm_backoff_step_ms: u64,
    pub llm_timeout_secs: u64,
    pub max_upload_bytes: usize,
    /// Where uploads are staged while their text is extracted.
    pub staging_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

// Hand-written so the key never reaches the logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("llm_max_retries", &self.llm_max_retries)
            .field("llm_backoff_step_ms", &self.llm_backoff_step_ms)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("staging_dir", &self.staging_dir)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            llm_max_retries: 2,
            llm_backoff_step_ms: 600,
            llm_timeout_secs: 120,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            staging_dir: std::env::temp_dir(),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        let defaults = Config::default();

        Ok(Config {
            gemini_api_key: resolve_api_key(
                std::env::var("GEMINI_API_KEY_FILE").ok().as_deref(),
                std::env::var("GEMINI_API_KEY").ok().as_deref(),
            ),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: optional_env("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            llm_max_retries: parse_env("LLM_MAX_RETRIES", defaults.llm_max_retries)?,
            llm_backoff_step_ms: parse_env("LLM_BACKOFF_STEP_MS", defaults.llm_backoff_step_ms)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", defaults.llm_timeout_secs)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            staging_dir: optional_env("UPLOAD_STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.staging_dir),
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

/// Picks the credential: a secrets file wins over the plain environment variable.
/// Blank values count as absent.
fn resolve_api_key(secrets_file: Option<&str>, env_value: Option<&str>) -> Option<String> {
    if let Some(path) = secrets_file.map(str::trim).filter(|p| !p.is_empty()) {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                if let Some(key) = non_blank(&contents) {
                    return Some(key);
                }
            }
            Err(e) => warn!("Could not read GEMINI_API_KEY_FILE '{path}': {e}"),
        }
    }
    env_value.and_then(non_blank)
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().as_deref().and_then(non_blank)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_secrets_file_takes_priority() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  file-key  ").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let key = resolve_api_key(Some(&path), Some("env-key"));
        assert_eq!(key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_missing_secrets_file_falls_back_to_env() {
        let key = resolve_api_key(Some("/definitely/not/a/secrets/file"), Some("env-key"));
        assert_eq!(key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_blank_secrets_file_falls_back_to_env() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let key = resolve_api_key(Some(&path), Some(" env-key\n"));
        assert_eq!(key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_blank_key_is_absent() {
        assert_eq!(resolve_api_key(None, Some("   ")), None);
        assert_eq!(resolve_api_key(None, None), None);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config {
            gemini_api_key: Some("super-secret".to_string()),
            ..Config::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
