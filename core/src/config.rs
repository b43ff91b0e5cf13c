use crate::sla::DEFAULT_SLA_HOURS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeskConfig {
    /// SLA window applied when a submission does not carry its own.
    #[serde(default = "default_sla_hours")]
    pub default_sla_hours: u32,
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_photo_dir")]
    pub photo_dir: String,
    /// How often `--watch` re-reads the dashboard summary.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_sla_hours() -> u32 {
    DEFAULT_SLA_HOURS
}

fn default_db_path() -> String {
    "complaints.db".into()
}

fn default_photo_dir() -> String {
    "./uploads".into()
}

fn default_poll_interval_secs() -> u64 {
    30
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            default_sla_hours: default_sla_hours(),
            db_path: default_db_path(),
            photo_dir: default_photo_dir(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl DeskConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    /// In tests, use DeskConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DeskConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        if config.default_sla_hours == 0 {
            anyhow::bail!("{path}: default_sla_hours must be positive");
        }
        Ok(config)
    }

    /// In-memory database, no photo directory, default SLA.
    pub fn default_test() -> Self {
        Self {
            db_path: ":memory:".into(),
            photo_dir: String::new(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{json}").unwrap();
        file
    }

    #[test]
    fn missing_fields_take_defaults() {
        let file = config_file(r#"{ "db_path": "desk.db" }"#);
        let config = DeskConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.db_path, "desk.db");
        assert_eq!(config.default_sla_hours, DEFAULT_SLA_HOURS);
        assert_eq!(config.photo_dir, "./uploads");
        assert_eq!(config.poll_interval_secs, 30);
    }

    #[test]
    fn zero_sla_window_is_rejected() {
        let file = config_file(r#"{ "default_sla_hours": 0 }"#);
        let err = DeskConfig::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("default_sla_hours must be positive"));
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = DeskConfig::load("/nonexistent/desk.json").unwrap_err();
        assert!(err.to_string().contains("Cannot read /nonexistent/desk.json"));
    }
}
