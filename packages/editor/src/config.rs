//! Editor configuration

use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_MAX_LEVELS;
use crate::node::{Size, DEFAULT_PAGE_LABEL};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Undo levels kept in history (0 = unlimited)
    pub max_history_levels: usize,

    /// Size of pages created by `add_page`
    pub default_page_size: Size,

    pub default_page_label: String,

    /// Horizontal space between a new page and the last existing one
    pub page_gap: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history_levels: DEFAULT_MAX_LEVELS,
            default_page_size: Size::new(720.0, 640.0),
            default_page_label: DEFAULT_PAGE_LABEL.to_string(),
            page_gap: 80.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}
