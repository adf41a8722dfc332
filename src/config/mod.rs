use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Cards per draw when the config does not say otherwise
pub const DEFAULT_DRAW_SIZE: usize = 3;

fn default_draw_size() -> usize {
    DEFAULT_DRAW_SIZE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deck file to use instead of the embedded default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deck_path: Option<PathBuf>,

    /// How many cards each draw reveals
    #[serde(default = "default_draw_size")]
    pub draw_size: usize,

    /// Color overrides applied on top of the built-in palette
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            deck_path: None,
            draw_size: DEFAULT_DRAW_SIZE,
            theme: ThemeConfig::default(),
        }
    }
}

/// Hex color strings ("#RRGGBB" or "#RGB"); unknown or malformed values
/// fall back to the built-in palette.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub danger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_dim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_selected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("kokoro");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(mut config) => {
                        // A zero draw size would make every draw a no-op
                        if config.draw_size == 0 {
                            tracing::warn!("draw_size must be at least 1, using default");
                            config.draw_size = DEFAULT_DRAW_SIZE;
                        }
                        return Ok(config);
                    }
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }

        let config = AppConfig::default();
        let _ = config.save();
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
