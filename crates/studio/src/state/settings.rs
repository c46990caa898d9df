//! Application settings

use serde::{Deserialize, Serialize};

/// Color theme of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Grid settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    /// Grid cell size in scene units
    pub size: f64,
    /// Snap dragged objects to the grid
    pub snap: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: 1.0,
            snap: false,
        }
    }
}

/// Dimension display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSettings {
    /// Number of decimal places for measured values
    pub precision: usize,
    /// Show unit suffix
    pub show_units: bool,
}

impl Default for DimensionSettings {
    fn default() -> Self {
        Self {
            precision: 2,
            show_units: true,
        }
    }
}

impl DimensionSettings {
    /// Format a measured value with the configured precision
    pub fn format(&self, value: f64, unit: &str) -> String {
        if self.show_units && !unit.is_empty() {
            format!("{:.*} {}", self.precision, value, unit)
        } else {
            format!("{:.*}", self.precision, value)
        }
    }
}

/// All application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub dimensions: DimensionSettings,
    /// Color given to newly created shapes; `None` cycles the shape palette
    #[serde(default)]
    pub default_shape_color: Option<String>,
    /// Wait this long (ms) before re-validating a challenge after a scene change
    #[serde(default = "default_validation_delay")]
    pub validation_delay_ms: u64,
}

fn default_validation_delay() -> u64 {
    500
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            grid: GridSettings::default(),
            dimensions: DimensionSettings::default(),
            default_shape_color: None,
            validation_delay_ms: default_validation_delay(),
        }
    }
}

impl AppSettings {
    /// Color for the `index`-th shape created in a session
    pub fn shape_color(&self, index: usize) -> String {
        match &self.default_shape_color {
            Some(color) => color.clone(),
            None => shared::SHAPE_PALETTE[index % shared::SHAPE_PALETTE.len()].to_string(),
        }
    }
}

#[cfg(feature = "native")]
impl AppSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "cadara", "cadara")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(json) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring unreadable settings {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                if std::fs::create_dir_all(parent).is_err() {
                    return;
                }
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("Failed to save settings: {e}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_json() {
        let settings: AppSettings = serde_json::from_str(r#"{"theme": "light"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.grid.size, 1.0);
        assert_eq!(settings.validation_delay_ms, 500);
    }

    #[test]
    fn test_shape_color_cycles_palette() {
        let settings = AppSettings::default();
        assert_eq!(settings.shape_color(0), "#6366f1");
        assert_eq!(settings.shape_color(7), "#10b981");

        let fixed = AppSettings {
            default_shape_color: Some("#ff0000".into()),
            ..AppSettings::default()
        };
        assert_eq!(fixed.shape_color(3), "#ff0000");
    }

    #[test]
    fn test_dimension_format() {
        let dims = DimensionSettings::default();
        assert_eq!(dims.format(1.23456, "u"), "1.23 u");
        let bare = DimensionSettings {
            precision: 0,
            show_units: false,
        };
        assert_eq!(bare.format(2.6, "u"), "3");
    }
}
