//! Configuration loading and resolution.

use std::path::{Path, PathBuf};
use std::time::Duration;

use policytypes::OutputFormat;

/// Upstream IDL declaring every content policy type.
pub const DEFAULT_URL: &str =
    "https://hg.mozilla.org/mozilla-central/raw-file/tip/dom/base/nsIContentPolicy.idl";

/// Generated list consumed by the log parser.
pub const DEFAULT_OUTPUT: &str = "src/policytypes.in";

pub const URL_ENV: &str = "POLICYTYPES_URL";
pub const OUTPUT_ENV: &str = "POLICYTYPES_OUTPUT";

/// Where the IDL text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Remote {
        url: String,
        /// `None` waits indefinitely.
        timeout: Option<Duration>,
    },
    File(PathBuf),
}

impl Source {
    pub fn describe(&self) -> String {
        match self {
            Source::Remote { url, .. } => url.clone(),
            Source::File(path) => path.display().to_string(),
        }
    }
}

/// Everything one generate or check run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    pub source: Source,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub check_ordinals: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            source: Source::Remote {
                url: DEFAULT_URL.to_string(),
                timeout: None,
            },
            output: PathBuf::from(DEFAULT_OUTPUT),
            format: OutputFormat::List,
            check_ordinals: false,
        }
    }
}

impl GenerateConfig {
    /// Build a config from optional overrides, filling gaps from the
    /// environment and then the built-in defaults.
    pub fn resolve(
        url: Option<&str>,
        input: Option<&Path>,
        output: Option<&Path>,
        timeout_ms: Option<u64>,
    ) -> Self {
        let source = match input {
            Some(path) => Source::File(path.to_path_buf()),
            None => Source::Remote {
                url: resolve_url(url),
                timeout: timeout_ms.map(Duration::from_millis),
            },
        };

        Self {
            source,
            output: resolve_output(output),
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_ordinal_check(mut self, enabled: bool) -> Self {
        self.check_ordinals = enabled;
        self
    }
}

/// Resolve the IDL URL.
pub fn resolve_url(explicit: Option<&str>) -> String {
    pick(
        explicit.map(str::to_string),
        std::env::var(URL_ENV).ok(),
        DEFAULT_URL,
    )
}

/// Resolve the output file path.
pub fn resolve_output(explicit: Option<&Path>) -> PathBuf {
    PathBuf::from(pick(
        explicit.map(|p| p.display().to_string()),
        std::env::var(OUTPUT_ENV).ok(),
        DEFAULT_OUTPUT,
    ))
}

fn pick(explicit: Option<String>, env: Option<String>, default: &str) -> String {
    explicit
        .or(env.filter(|v| !v.is_empty()))
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_precedence() {
        assert_eq!(
            pick(Some("a".into()), Some("b".into()), "c"),
            "a".to_string()
        );
        assert_eq!(pick(None, Some("b".into()), "c"), "b".to_string());
        assert_eq!(pick(None, None, "c"), "c".to_string());
    }

    #[test]
    fn test_pick_ignores_empty_env() {
        assert_eq!(pick(None, Some(String::new()), "c"), "c".to_string());
    }

    #[test]
    fn test_env_overrides_defaults() {
        // The only test in this binary that touches these variables.
        std::env::set_var(URL_ENV, "http://mirror.local/nsIContentPolicy.idl");
        std::env::set_var(OUTPUT_ENV, "generated/policytypes.in");

        let url = resolve_url(None);
        let output = resolve_output(None);
        let explicit = resolve_output(Some(Path::new("cli.in")));

        std::env::remove_var(URL_ENV);
        std::env::remove_var(OUTPUT_ENV);

        assert_eq!(url, "http://mirror.local/nsIContentPolicy.idl");
        assert_eq!(output, PathBuf::from("generated/policytypes.in"));
        assert_eq!(explicit, PathBuf::from("cli.in"));
        assert_eq!(resolve_output(None), PathBuf::from(DEFAULT_OUTPUT));
    }

    #[test]
    fn test_default_config() {
        let config = GenerateConfig::default();
        assert_eq!(config.output, PathBuf::from("src/policytypes.in"));
        assert_eq!(config.format, OutputFormat::List);
        assert!(!config.check_ordinals);
        match config.source {
            Source::Remote { url, timeout } => {
                assert!(url.ends_with("dom/base/nsIContentPolicy.idl"));
                assert!(timeout.is_none());
            }
            other => panic!("expected remote source, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_explicit_values() {
        let config = GenerateConfig::resolve(
            Some("http://localhost/idl"),
            None,
            Some(Path::new("out/list.in")),
            Some(1500),
        );
        assert_eq!(
            config.source,
            Source::Remote {
                url: "http://localhost/idl".to_string(),
                timeout: Some(Duration::from_millis(1500)),
            }
        );
        assert_eq!(config.output, PathBuf::from("out/list.in"));
    }

    #[test]
    fn test_resolve_input_wins_over_url() {
        let config = GenerateConfig::resolve(
            Some("http://localhost/idl"),
            Some(Path::new("local.idl")),
            Some(Path::new("out.in")),
            None,
        );
        assert_eq!(config.source, Source::File(PathBuf::from("local.idl")));
        assert_eq!(config.source.describe(), "local.idl");
    }
}
