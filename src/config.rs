//! Configuration for the adOS board client.
//!
//! Settings are read from `.ados/ados.toml` in the project directory and then
//! layered: file → environment → CLI.
//!
//! # Configuration File Format
//!
//! ```toml
//! [webhooks]
//! tasks_url = "https://hooks.example.com/webhook/workflow"
//! status_url = "https://hooks.example.com/webhook/workflow-status"
//! ad_blocks_url = "https://hooks.example.com/webhook/ad-blocks"
//!
//! [http]
//! timeout_secs = 30
//!
//! [board]
//! default_account = "act_123"
//! ```
//!
//! | Variable             | Overrides                  |
//! |----------------------|----------------------------|
//! | `ADOS_TASKS_URL`     | `webhooks.tasks_url`       |
//! | `ADOS_STATUS_URL`    | `webhooks.status_url`      |
//! | `ADOS_AD_BLOCKS_URL` | `webhooks.ad_blocks_url`   |
//! | `ADOS_TIMEOUT_SECS`  | `http.timeout_secs`        |
//! | `ADOS_ACCOUNT`       | `board.default_account`    |

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Webhook endpoints of the workflow-automation backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Bulk task fetch (GET, `accountId` query parameter)
    #[serde(default)]
    pub tasks_url: Option<String>,
    /// Status persist (POST `{id, status}`)
    #[serde(default)]
    pub status_url: Option<String>,
    /// Ad-block detail fetch (GET, `taskId` query parameter)
    #[serde(default)]
    pub ad_blocks_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Account loaded when none is given on the command line
    #[serde(default)]
    pub default_account: Option<String>,
}

/// The complete ados.toml structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdosToml {
    #[serde(default)]
    pub webhooks: WebhookConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub board: BoardConfig,
}

impl AdosToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse ados.toml")
    }

    /// Load `ados.toml` from `ados_dir`, or defaults if it doesn't exist.
    pub fn load_or_default(ados_dir: &Path) -> Result<Self> {
        let config_path = ados_dir.join("ados.toml");
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize ados.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply `ADOS_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("ADOS_TASKS_URL") {
            self.webhooks.tasks_url = Some(url);
        }
        if let Some(url) = lookup("ADOS_STATUS_URL") {
            self.webhooks.status_url = Some(url);
        }
        if let Some(url) = lookup("ADOS_AD_BLOCKS_URL") {
            self.webhooks.ad_blocks_url = Some(url);
        }
        if let Some(secs) = lookup("ADOS_TIMEOUT_SECS") {
            self.http.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid ADOS_TIMEOUT_SECS '{}'", secs))?;
        }
        if let Some(account) = lookup("ADOS_ACCOUNT") {
            self.board.default_account = Some(account);
        }
        Ok(())
    }

    /// Return warnings for settings that will make commands fail.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let endpoints = [
            ("tasks_url", &self.webhooks.tasks_url),
            ("status_url", &self.webhooks.status_url),
            ("ad_blocks_url", &self.webhooks.ad_blocks_url),
        ];
        for (name, url) in endpoints {
            match url.as_deref() {
                None => warnings.push(format!("webhooks.{} is not set", name)),
                Some(u) if !(u.starts_with("http://") || u.starts_with("https://")) => {
                    warnings.push(format!("webhooks.{} '{}' is not an http(s) URL", name, u))
                }
                Some(_) => {}
            }
        }
        if self.http.timeout_secs == 0 {
            warnings.push("http.timeout_secs must be greater than 0".to_string());
        }
        warnings
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AdosConfig {
    pub project_dir: PathBuf,
    pub ados_dir: PathBuf,
    pub toml: AdosToml,
}

impl AdosConfig {
    /// Load file settings for `project_dir` and apply environment overrides.
    pub fn load(project_dir: PathBuf) -> Result<Self> {
        let ados_dir = project_dir.join(".ados");
        let mut toml = AdosToml::load_or_default(&ados_dir)?;
        toml.apply_env(|key| std::env::var(key).ok())?;
        Ok(Self {
            project_dir,
            ados_dir,
            toml,
        })
    }

    pub fn config_file(&self) -> PathBuf {
        self.ados_dir.join("ados.toml")
    }

    pub fn webhooks(&self) -> &WebhookConfig {
        &self.toml.webhooks
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.toml.http.timeout_secs)
    }

    /// Account to load (CLI → env/file).
    pub fn account(&self, cli_account: Option<&str>) -> Option<String> {
        cli_account
            .map(str::to_string)
            .or_else(|| self.toml.board.default_account.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let toml = AdosToml::default();
        assert_eq!(toml.http.timeout_secs, 30);
        assert!(toml.webhooks.tasks_url.is_none());
        assert!(toml.board.default_account.is_none());
    }

    #[test]
    fn test_parse_full_file() {
        let content = r#"
[webhooks]
tasks_url = "https://hooks.test/workflow"
status_url = "https://hooks.test/status"
ad_blocks_url = "https://hooks.test/ad-blocks"

[http]
timeout_secs = 5

[board]
default_account = "act_42"
"#;
        let toml = AdosToml::parse(content).unwrap();
        assert_eq!(toml.webhooks.tasks_url.as_deref(), Some("https://hooks.test/workflow"));
        assert_eq!(toml.http.timeout_secs, 5);
        assert_eq!(toml.board.default_account.as_deref(), Some("act_42"));
        assert!(toml.validate().is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let toml = AdosToml::parse("[board]\ndefault_account = \"a\"\n").unwrap();
        assert_eq!(toml.http.timeout_secs, 30);
    }

    #[test]
    fn test_parse_invalid_toml_errors() {
        assert!(AdosToml::parse("[http\ntimeout_secs = ").is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut toml = AdosToml::parse(
            "[webhooks]\ntasks_url = \"https://file/tasks\"\n[http]\ntimeout_secs = 5\n",
        )
        .unwrap();
        let env: HashMap<&str, &str> = [
            ("ADOS_TASKS_URL", "https://env/tasks"),
            ("ADOS_TIMEOUT_SECS", "12"),
            ("ADOS_ACCOUNT", "act_env"),
        ]
        .into_iter()
        .collect();

        toml.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(toml.webhooks.tasks_url.as_deref(), Some("https://env/tasks"));
        assert_eq!(toml.http.timeout_secs, 12);
        assert_eq!(toml.board.default_account.as_deref(), Some("act_env"));
        assert!(toml.webhooks.status_url.is_none());
    }

    #[test]
    fn test_env_invalid_timeout_errors() {
        let mut toml = AdosToml::default();
        let result = toml.apply_env(|k| (k == "ADOS_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_reports_missing_and_bad_urls() {
        let mut toml = AdosToml::default();
        toml.webhooks.tasks_url = Some("ftp://nope".into());
        toml.http.timeout_secs = 0;
        let warnings = toml.validate();
        assert_eq!(warnings.len(), 4);
        assert!(warnings.iter().any(|w| w.contains("ftp://nope")));
        assert!(warnings.iter().any(|w| w.contains("status_url is not set")));
        assert!(warnings.iter().any(|w| w.contains("timeout_secs")));
    }

    #[test]
    fn test_save_and_load_from_dir() {
        let dir = TempDir::new().unwrap();
        let mut toml = AdosToml::default();
        toml.board.default_account = Some("act_7".into());
        toml.save(&dir.path().join("ados.toml")).unwrap();

        let loaded = AdosToml::load_or_default(dir.path()).unwrap();
        assert_eq!(loaded, toml);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(AdosToml::load_or_default(dir.path()).unwrap(), AdosToml::default());
    }

    #[test]
    fn test_cli_account_wins() {
        let config = AdosConfig {
            project_dir: PathBuf::from("."),
            ados_dir: PathBuf::from(".ados"),
            toml: AdosToml {
                board: BoardConfig {
                    default_account: Some("act_file".into()),
                },
                ..AdosToml::default()
            },
        };
        assert_eq!(config.account(Some("act_cli")).as_deref(), Some("act_cli"));
        assert_eq!(config.account(None).as_deref(), Some("act_file"));
    }
}
