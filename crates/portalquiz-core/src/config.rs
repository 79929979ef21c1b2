//! TOML-based application configuration.
//!
//! Stores:
//! - Optional custom quiz tables (questions, archetypes, milestones)
//! - Presentation hints (answer and interlude delays, mute)
//! - Logging preferences
//!
//! Configuration is stored at `~/.config/portalquiz/config.toml`.
//! Set `PORTALQUIZ_ENV=dev` to use `~/.config/portalquiz-dev/` instead, or
//! `PORTALQUIZ_HOME` to point at an explicit directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::quiz::{
    ArchetypeBucket, ArchetypeTable, Milestone, MilestoneTable, Question, QuestionBank, QuizTables,
};

/// Returns the config directory, creating it if needed.
///
/// `PORTALQUIZ_HOME` wins when set. Otherwise `~/.config/portalquiz[-dev]/`
/// depending on `PORTALQUIZ_ENV`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("PORTALQUIZ_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PORTALQUIZ_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("portalquiz-dev")
            } else {
                base_dir.join("portalquiz")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

/// Custom quiz tables. Any table left unset falls back to the built-in one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetypes: Option<Vec<ArchetypeBucket>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestones: Option<Vec<Milestone>>,
}

/// Timing and sound hints for presentation layers. The flow engine never reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Pause between picking an option and showing what comes next.
    #[serde(default = "default_answer_delay_ms")]
    pub answer_delay_ms: u64,
    /// Pause after the last ritual step of an interlude.
    #[serde(default = "default_interlude_delay_ms")]
    pub interlude_delay_ms: u64,
    #[serde(default)]
    pub muted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Send completed sessions to the tracing sink.
    #[serde(default = "default_true")]
    pub log_completions: bool,
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/portalquiz/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub presentation: PresentationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
}

// Default functions
fn default_answer_delay_ms() -> u64 {
    300
}
fn default_interlude_delay_ms() -> u64 {
    1500
}
fn default_true() -> bool {
    true
}
fn default_filter() -> String {
    "portalquiz_core=info,portalquiz_cli=info".into()
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            answer_delay_ms: default_answer_delay_ms(),
            interlude_delay_ms: default_interlude_delay_ms(),
            muted: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_completions: true,
            filter: default_filter(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|e| invalid(e.to_string()))?
                            .into(),
                    ),
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                    _ => serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?,
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Serialized form used by `get`/`set`: every known key present, unset
    /// tables as `null`.
    fn to_json(&self) -> Result<serde_json::Value, ConfigError> {
        let mut json = serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            key: String::new(),
            message: e.to_string(),
        })?;
        if let Some(quiz) = json.get_mut("quiz").and_then(|q| q.as_object_mut()) {
            for table in ["questions", "archetypes", "milestones"] {
                quiz.entry(table).or_insert(serde_json::Value::Null);
            }
        }
        Ok(json)
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = self.to_json().ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value in memory by dot-separated key.
    ///
    /// Tables take a JSON array (e.g. `quiz.milestones`), or `null` to go
    /// back to the built-in table. The config is left unchanged on error.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value does not fit it, or
    /// the resulting quiz tables fail validation.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = self.to_json()?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.tables()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and save to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// the quiz tables become invalid, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Build and validate the quiz tables, using built-ins for unset ones.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure among the custom tables.
    pub fn tables(&self) -> Result<QuizTables, ConfigError> {
        let bank = match &self.quiz.questions {
            Some(questions) => QuestionBank::new(questions.clone())?,
            None => QuestionBank::default(),
        };
        let archetypes = match &self.quiz.archetypes {
            Some(buckets) => ArchetypeTable::new(buckets.clone())?,
            None => ArchetypeTable::default(),
        };
        let milestones = match &self.quiz.milestones {
            Some(milestones) => MilestoneTable::new(milestones.clone())?,
            None => MilestoneTable::default(),
        };
        Ok(QuizTables::new(bank, archetypes, milestones))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.presentation.answer_delay_ms, 300);
        assert_eq!(parsed.presentation.interlude_delay_ms, 1500);
    }

    #[test]
    fn empty_file_gives_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed, Config::default());
        assert!(parsed.logging.log_completions);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("presentation.answer_delay_ms").as_deref(), Some("300"));
        assert_eq!(cfg.get("presentation.muted").as_deref(), Some("false"));
        assert_eq!(cfg.get("quiz.milestones").as_deref(), Some("null"));
        assert!(cfg.get("presentation.volume").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_value_updates_bool_and_number() {
        let mut cfg = Config::default();
        cfg.set_value("presentation.muted", "true").unwrap();
        cfg.set_value("presentation.interlude_delay_ms", "0").unwrap();
        assert!(cfg.presentation.muted);
        assert_eq!(cfg.presentation.interlude_delay_ms, 0);
    }

    #[test]
    fn set_value_updates_string() {
        let mut cfg = Config::default();
        cfg.set_value("logging.filter", "debug").unwrap();
        assert_eq!(cfg.logging.filter, "debug");
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert_eq!(
            cfg.set_value("presentation.volume", "3"),
            Err(ConfigError::UnknownKey("presentation.volume".into()))
        );
        assert!(cfg.set_value("", "3").is_err());
    }

    #[test]
    fn set_value_rejects_invalid_type() {
        let mut cfg = Config::default();
        let err = cfg.set_value("presentation.muted", "loud").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "presentation.muted"));
        assert!(!cfg.presentation.muted);
    }

    #[test]
    fn set_value_accepts_table_json() {
        let mut cfg = Config::default();
        cfg.set_value("quiz.milestones", r#"[{"threshold_percent": 40}]"#)
            .unwrap();
        let tables = cfg.tables().unwrap();
        assert_eq!(tables.milestones.len(), 1);
        assert_eq!(tables.milestones.milestones()[0].threshold_percent, 40);

        cfg.set_value("quiz.milestones", "null").unwrap();
        assert!(cfg.quiz.milestones.is_none());
    }

    #[test]
    fn set_value_rejects_invalid_table_and_keeps_previous() {
        let mut cfg = Config::default();
        cfg.set_value("quiz.milestones", r#"[{"threshold_percent": 40}]"#)
            .unwrap();

        let err = cfg
            .set_value(
                "quiz.milestones",
                r#"[{"threshold_percent": 75}, {"threshold_percent": 25}]"#,
            )
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::ThresholdNotAscending {
                previous: 75,
                threshold: 25
            }
        );
        assert_eq!(cfg.quiz.milestones, Some(vec![Milestone::at(40)]));
    }

    #[test]
    fn tables_default_to_builtins() {
        let tables = Config::default().tables().unwrap();
        assert_eq!(tables, QuizTables::default());
    }

    #[test]
    fn tables_reject_invalid_custom_milestones() {
        let mut cfg = Config::default();
        cfg.quiz.milestones = Some(vec![Milestone::at(75), Milestone::at(25)]);
        assert_eq!(
            cfg.tables(),
            Err(ConfigError::ThresholdNotAscending {
                previous: 75,
                threshold: 25
            })
        );
    }

    #[test]
    fn save_and_load_custom_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.quiz.milestones = Some(vec![Milestone::at(40)]);
        cfg.presentation.muted = true;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.tables().unwrap().milestones.len(), 1);
    }

    #[test]
    fn load_from_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[presentation]\nanswer_delay_ms = \"soon\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::LoadFailed { path: ref p, .. } if p == &path));
    }
}
