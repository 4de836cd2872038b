use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use studio_editor::{EditorConfig, NodeDefinition};

pub const DEFAULT_CONFIG_NAME: &str = "studio.config.json";

/// Studio project configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Editor settings (history depth, page defaults)
    #[serde(flatten)]
    pub editor: EditorConfig,

    /// Node definitions available to every script in the project
    #[serde(default)]
    pub definitions: Vec<NodeDefinition>,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = Self::path(cwd);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn path(cwd: &Path) -> PathBuf {
        cwd.join(DEFAULT_CONFIG_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "maxHistoryLevels": 20,
            "pageGap": 40,
            "definitions": [
                { "nodeName": "Box" },
                { "nodeName": "Text", "leaf": true }
            ]
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.editor.max_history_levels, 20);
        assert_eq!(config.editor.page_gap, 40.0);
        assert_eq!(config.editor.default_page_label, "New Page");
        assert_eq!(config.definitions.len(), 2);
        assert!(config.definitions[1].leaf);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config.editor, EditorConfig::default());
        assert!(config.definitions.is_empty());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            Config::path(dir.path()),
            r#"{ "defaultPageLabel": "Screen" }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.editor.default_page_label, "Screen");
        assert_eq!(config.editor.max_history_levels, 0);
    }
}
