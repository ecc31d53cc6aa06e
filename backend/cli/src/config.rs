use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use warelay_markdown::MarkdownParseOptions;

/// WhatsApp caps a message body at 1600 characters.
pub const DEFAULT_CHUNK_LIMIT: usize = 1600;

/// warelay-md runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Log level filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Directory for rolling NDJSON logs; console only when unset
    pub log_dir: Option<PathBuf>,
    /// Default chunk limit in characters, 0 for unlimited
    pub chunk_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_dir: None,
            chunk_limit: DEFAULT_CHUNK_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_level: var("WARELAY_LOG_LEVEL")
                .or_else(|| var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            log_dir: var("WARELAY_LOG_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            chunk_limit: var("WARELAY_CHUNK_LIMIT")
                .and_then(|limit| limit.trim().parse().ok())
                .unwrap_or(defaults.chunk_limit),
        }
    }
}

/// Read parse options from a YAML or JSON file. Missing keys take defaults.
pub fn load_parse_options(path: &Path) -> Result<MarkdownParseOptions> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading options file {}", path.display()))?;
    parse_options(&raw).with_context(|| format!("parsing options file {}", path.display()))
}

fn parse_options(raw: &str) -> Result<MarkdownParseOptions> {
    if raw.trim().is_empty() {
        return Ok(MarkdownParseOptions::default());
    }
    Ok(serde_yaml::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use warelay_markdown::HeadingStyle;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_env() {
        assert_eq!(config(&[]), Config::default());
        assert_eq!(Config::default().chunk_limit, 1600);
    }

    #[test]
    fn env_overrides() {
        let cfg = config(&[
            ("RUST_LOG", "info"),
            ("WARELAY_LOG_LEVEL", "debug"),
            ("WARELAY_LOG_DIR", "/tmp/warelay"),
            ("WARELAY_CHUNK_LIMIT", "320"),
        ]);
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.log_dir, Some(PathBuf::from("/tmp/warelay")));
        assert_eq!(cfg.chunk_limit, 320);

        assert_eq!(config(&[("RUST_LOG", "trace")]).log_level, "trace");
    }

    #[test]
    fn invalid_chunk_limit_falls_back() {
        assert_eq!(config(&[("WARELAY_CHUNK_LIMIT", "lots")]).chunk_limit, 1600);
        assert_eq!(config(&[("WARELAY_LOG_DIR", " ")]).log_dir, None);
    }

    #[test]
    fn options_from_yaml() {
        let options = parse_options("enableSpoilers: true\nheadingStyle: bold\n").unwrap();
        assert!(options.enable_spoilers);
        assert_eq!(options.heading_style, HeadingStyle::Bold);
        assert!(options.linkify);
    }

    #[test]
    fn options_from_json() {
        let options = parse_options(r#"{"linkify": false, "blockquotePrefix": "> "}"#).unwrap();
        assert!(!options.linkify);
        assert_eq!(options.blockquote_prefix, "> ");
    }

    #[test]
    fn empty_options_file_is_default() {
        assert_eq!(parse_options("  \n").unwrap(), MarkdownParseOptions::default());
        assert!(parse_options("headingStyle: loud").is_err());
    }
}
