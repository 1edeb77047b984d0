//! Configuration schema.

use std::path::PathBuf;

use autotemplation::lookup::FileLookupSource;
use autotemplation::pipeline::GeneratorSettings;
use autotemplation::store::FsDocumentStore;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Folders, relative to `store_root`, searched for `.docx` templates.
    #[serde(default = "default_template_folders")]
    pub template_folders: Vec<String>,

    /// Folder, relative to `store_root`, that receives published documents.
    #[serde(default = "default_destination_folder")]
    pub destination_folder: String,

    /// Root directory of the document store.
    #[serde(default = "default_dir")]
    pub store_root: PathBuf,

    /// Local directory for rendered documents and CSV exports.
    #[serde(default = "default_dir")]
    pub output_dir: PathBuf,

    /// Lookup sheet (csv, tsv or spreadsheet). Prompted for when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup: Option<PathBuf>,
}

fn default_template_folders() -> Vec<String> {
    vec!["templates".to_string()]
}

fn default_destination_folder() -> String {
    "autotemplation".to_string()
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_folders: default_template_folders(),
            destination_folder: default_destination_folder(),
            store_root: default_dir(),
            output_dir: default_dir(),
            lookup: None,
        }
    }
}

impl Config {
    /// Validate the configuration and return any issues found.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.template_folders.is_empty() {
            issues.push(ConfigIssue::error(
                "template_folders",
                "At least one template folder is required",
            ));
        }
        if self.template_folders.iter().any(|f| f.trim().is_empty()) {
            issues.push(ConfigIssue::error(
                "template_folders",
                "Template folder names must not be empty",
            ));
        }

        if self.destination_folder.trim().is_empty() {
            issues.push(ConfigIssue::error(
                "destination_folder",
                "Destination folder name must not be empty",
            ));
        } else if self.template_folders.contains(&self.destination_folder) {
            issues.push(ConfigIssue::warning(
                "destination_folder",
                "Destination is also a template folder; \
                 published documents will be offered as templates",
            ));
        }

        if !self.store_root.is_dir() {
            issues.push(ConfigIssue::warning(
                "store_root",
                format!(
                    "{} does not exist; no templates will be found",
                    self.store_root.display()
                ),
            ));
        }

        if let Some(lookup) = &self.lookup {
            if !FileLookupSource::supports(lookup) {
                issues.push(ConfigIssue::error(
                    "lookup",
                    "Lookup sheet must be a csv, tsv, xlsx, xlsm, xlsb, xls or ods file",
                ));
            } else if !lookup.is_file() {
                issues.push(ConfigIssue::warning(
                    "lookup",
                    format!("{} does not exist", lookup.display()),
                ));
            }
        }

        issues
    }

    /// Check if the configuration is valid (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate()
            .iter()
            .all(|issue| issue.level != IssueLevel::Error)
    }

    /// Generator settings derived from this configuration.
    #[must_use]
    pub fn settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            template_folders: self.template_folders.clone(),
            destination_folder: self.destination_folder.clone(),
            output_dir: self.output_dir.clone(),
        }
    }

    /// The document store this configuration points at.
    #[must_use]
    pub fn store(&self) -> FsDocumentStore {
        FsDocumentStore::new(&self.store_root)
    }
}

/// Configuration validation issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Issue severity level.
    pub level: IssueLevel,
    /// Configuration key (e.g., "destination_folder").
    pub path: String,
    /// Human-readable message.
    pub message: String,
}

impl ConfigIssue {
    /// Create an error-level issue.
    #[must_use]
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a warning-level issue.
    #[must_use]
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.level {
            IssueLevel::Error => "ERROR",
            IssueLevel::Warning => "WARN",
        };
        write!(f, "[{prefix}] {}: {}", self.path, self.message)
    }
}

/// Severity level for configuration issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// Error that prevents a run.
    Error,
    /// Warning about potential issues.
    Warning,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use assert_fs::TempDir;
    use assert_fs::prelude::*;

    use super::*;

    fn rooted(dir: &TempDir) -> Config {
        Config {
            store_root: dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.template_folders, ["templates"]);
        assert_eq!(config.destination_folder, "autotemplation");
        assert!(config.lookup.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            lookup: Some(PathBuf::from("sheet.csv")),
            ..Config::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_sample_config() {
        let toml_str = r#"
template_folders = ["templates", "shared/templates"]
destination_folder = "generated"
lookup = "clients.xlsx"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.template_folders.len(), 2);
        assert_eq!(config.destination_folder, "generated");
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.lookup, Some(PathBuf::from("clients.xlsx")));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(toml::from_str::<Config>("template_folder = \"x\"").is_err());
    }

    #[test]
    fn test_validation() {
        let dir = TempDir::new().unwrap();
        let config = rooted(&dir);
        assert!(config.validate().is_empty(), "default config should have no issues");
        assert!(config.is_valid());
    }

    #[test]
    fn test_validation_no_template_folders() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            template_folders: Vec::new(),
            ..rooted(&dir)
        };
        assert!(!config.is_valid());
    }

    #[test]
    fn test_validation_destination_is_template_folder() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            destination_folder: "templates".into(),
            ..rooted(&dir)
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].level, IssueLevel::Warning);
        assert!(config.is_valid());
    }

    #[test]
    fn test_validation_lookup() {
        let dir = TempDir::new().unwrap();
        dir.child("sheet.csv").write_str(",a\n").unwrap();

        let unsupported = Config {
            lookup: Some(dir.path().join("sheet.txt")),
            ..rooted(&dir)
        };
        assert!(!unsupported.is_valid());

        let missing = Config {
            lookup: Some(dir.path().join("other.csv")),
            ..rooted(&dir)
        };
        assert!(missing.is_valid());
        assert_eq!(missing.validate()[0].level, IssueLevel::Warning);

        let present = Config {
            lookup: Some(dir.path().join("sheet.csv")),
            ..rooted(&dir)
        };
        assert!(present.validate().is_empty());
    }

    #[test]
    fn test_issue_display() {
        let issue = ConfigIssue::error("lookup", "bad");
        assert_eq!(issue.to_string(), "[ERROR] lookup: bad");
    }
}
