//! Preferences persisted across sessions

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "snipper";
const FILE_NAME: &str = "preferences.json";

/// Border color of snapshot windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BorderColor {
    pub const BLACK: BorderColor = BorderColor { r: 0, g: 0, b: 0 };
    pub const RED: BorderColor = BorderColor { r: 255, g: 0, b: 0 };

    /// Components scaled to 0.0..=1.0, as cairo and GDK expect them
    pub fn to_rgb_f64(self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }

    pub fn from_rgb_f32(r: f32, g: f32, b: f32) -> Self {
        let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: to_u8(r),
            g: to_u8(g),
            b: to_u8(b),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for BorderColor {
    fn default() -> Self {
        BorderColor::BLACK
    }
}

#[derive(Debug)]
pub enum PreferencesError {
    NoConfigDir,
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferencesError::NoConfigDir => write!(f, "No configuration directory available"),
            PreferencesError::Io(e) => write!(f, "Preferences I/O error: {}", e),
            PreferencesError::Json(e) => write!(f, "Invalid preferences file: {}", e),
        }
    }
}

impl std::error::Error for PreferencesError {}

impl From<std::io::Error> for PreferencesError {
    fn from(e: std::io::Error) -> Self {
        PreferencesError::Io(e)
    }
}

impl From<serde_json::Error> for PreferencesError {
    fn from(e: serde_json::Error) -> Self {
        PreferencesError::Json(e)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Directory the last snapshot was saved in
    pub save_dir: Option<PathBuf>,
    /// Extension of the last used save format
    pub save_format: String,
    /// Border color for new snapshot windows
    pub border_color: BorderColor,
    /// Keep snapshot windows above others
    pub always_on_top: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            save_dir: None,
            save_format: "png".to_string(),
            border_color: BorderColor::default(),
            always_on_top: true,
        }
    }
}

impl Preferences {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!("Preferences written to {:?}", path);
        Ok(())
    }

    /// Load from the default location; missing or broken files give defaults
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(prefs) => prefs,
            Err(PreferencesError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                warn!("Ignoring preferences at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        let path = Self::default_path().ok_or(PreferencesError::NoConfigDir)?;
        self.save_to(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILE_NAME);
        let prefs = Preferences {
            save_dir: Some(PathBuf::from("/home/user/Pictures")),
            save_format: "jpg".to_string(),
            border_color: BorderColor::RED,
            always_on_top: false,
        };
        prefs.save_to(&path).unwrap();
        assert_eq!(Preferences::load_from(&path).unwrap(), prefs);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        std::fs::write(&path, r#"{"save_format":"bmp"}"#).unwrap();
        let prefs = Preferences::load_from(&path).unwrap();
        assert_eq!(prefs.save_format, "bmp");
        assert_eq!(prefs.border_color, BorderColor::BLACK);
        assert!(prefs.always_on_top);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Preferences::load_from(&path),
            Err(PreferencesError::Json(_))
        ));
    }

    #[test]
    fn test_border_color_conversions() {
        assert_eq!(BorderColor::RED.to_hex(), "#FF0000");
        assert_eq!(BorderColor::from_rgb_f32(1.0, 0.5, 0.0).to_hex(), "#FF8000");
        assert_eq!(BorderColor::RED.to_rgb_f64(), (1.0, 0.0, 0.0));
    }
}
