use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub behavior: BehaviorConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory or base URL holding the dataset files
    pub location: String,

    pub catalog_file: String,
    pub literature_file: String,
    pub field_file: String,

    /// Directory of the card images, relative to `location`
    pub image_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Quiet period after the last keystroke before the search runs
    pub search_debounce_ms: u64,

    /// How long a closing sidebar stays on screen
    pub sidebar_transition_ms: u64,

    /// Event loop poll interval
    pub tick_rate_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for visual channel cells
    pub use_glyphs: bool,

    /// Glyphs for visual channel cells (set to ASCII when use_glyphs = false)
    pub glyphs: GlyphConfig,

    /// Card grid column width in terminal cells
    pub card_column_width: u16,

    /// Gap between card grid columns
    pub card_gutter: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphConfig {
    pub affirmative: String,
    pub negative: String,
    pub neutral: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            location: ".".to_string(),
            catalog_file: "energynetworks.csv".to_string(),
            literature_file: "literature_tasks.csv".to_string(),
            field_file: "field_tasks.csv".to_string(),
            image_dir: "energyimg".to_string(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            sidebar_transition_ms: 300,
            tick_rate_ms: 50,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            glyphs: GlyphConfig::default(),
            card_column_width: 30,
            card_gutter: 2,
        }
    }
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            affirmative: "✓".to_string(),
            negative: "✗".to_string(),
            neutral: "—".to_string(),
        }
    }
}

impl GlyphConfig {
    /// ASCII alternatives for terminals without glyph support
    pub fn simple() -> Self {
        Self {
            affirmative: "Y".to_string(),
            negative: "N".to_string(),
            neutral: "-".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or defaults if there is none
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        if !config.display.use_glyphs {
            config.display.glyphs = GlyphConfig::simple();
        }
        Ok(config)
    }

    /// Switch to ASCII glyphs regardless of the file
    pub fn use_ascii(&mut self) {
        self.display.use_glyphs = false;
        self.display.glyphs = GlyphConfig::simple();
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("energyvis").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# energyvis configuration file
# Location: ~/.config/energyvis/config.toml (Linux)
#           ~/Library/Application Support/energyvis/config.toml (macOS)
#           %APPDATA%\energyvis\config.toml (Windows)

[data]
# Directory or http(s) base URL holding the dataset files
location = "."
catalog_file = "energynetworks.csv"
literature_file = "literature_tasks.csv"
field_file = "field_tasks.csv"
# Card images are referenced as <image_dir>/<image>.png
image_dir = "energyimg"

[behavior]
# Search runs after this many milliseconds without a keystroke
search_debounce_ms = 300

# Closing sidebar transition
sidebar_transition_ms = 300

# Event loop poll interval
tick_rate_ms = 50

[display]
# Set to false for ASCII-only visual channel cells
use_glyphs = true

# Card grid geometry, in terminal cells
card_column_width = 30
card_gutter = 2

[display.glyphs]
affirmative = "✓"
negative = "✗"
neutral = "—"
"#
        .to_string()
    }
}
