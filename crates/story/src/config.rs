use foundation::geo::CameraPose;
use serde::{Deserialize, Serialize};

use crate::chapter::{Chapter, empty_as_none};
use crate::error::{Result, StoryError};
use crate::registry::ChapterRegistry;

/// Query parameter tagging every tile and style request the map makes.
pub const PLUGIN_NAME: &str = "scrollytellingV2";

const DEFAULT_THEME: &str = "dark";
const DEFAULT_MARKER_COLOR: &str = "#3FB1CE";

/// Page-level story configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryConfig {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub subtitle: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub footer: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub access_token: String,
    /// Map style URL.
    #[serde(default)]
    pub style: String,
    #[serde(default = "default_true")]
    pub show_markers: bool,
    #[serde(default = "default_marker_color")]
    pub marker_color: String,
    #[serde(default, rename = "use3dTerrain")]
    pub use_3d_terrain: bool,
    pub chapters: Vec<Chapter>,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

fn default_marker_color() -> String {
    DEFAULT_MARKER_COLOR.to_string()
}

fn default_true() -> bool {
    true
}

impl StoryConfig {
    /// Parses and validates a JSON config. Any problem is fatal.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: StoryConfig = serde_json::from_str(json)
            .map_err(|e| StoryError::InvalidChapterConfig(e.to_string()))?;
        config.registry()?;
        Ok(config)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: StoryConfig = serde_json::from_value(value)
            .map_err(|e| StoryError::InvalidChapterConfig(e.to_string()))?;
        config.registry()?;
        Ok(config)
    }

    pub fn registry(&self) -> Result<ChapterRegistry> {
        ChapterRegistry::new(self.chapters.clone())
    }

    /// Camera the map opens on: the first chapter's pose.
    pub fn initial_pose(&self) -> Option<CameraPose> {
        self.chapters.first().map(|c| c.location)
    }
}

/// Appends the plugin tag to a request URL.
pub fn transform_request(url: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}pluginName={PLUGIN_NAME}")
}
