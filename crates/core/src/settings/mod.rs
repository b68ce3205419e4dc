//! Runtime configuration, read from a TOML file.
//!
//! ```toml
//! [logging]
//! enabled = true
//! level = "info"
//! max-files = 3
//! directory = "logs"
//!
//! [chrome]
//! icon-scale = 0.4
//! default-background = 0xFFF5F5F5
//! height = 56
//! icon-directory = "icons"
//! ```
//!
//! Every key is optional; missing keys take their default values.

use crate::color::{Color, MATERIAL_GREY};
use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ICON_SCALE: f32 = 0.4;
pub const DEFAULT_BAR_HEIGHT: u32 = 56;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub logging: LoggingSettings,
    pub chrome: ChromeSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingSettings {
    pub enabled: bool,
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Number of run logs to keep, `0` keeps all of them.
    pub max_files: usize,
    pub directory: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            enabled: true,
            level: "info".to_string(),
            max_files: 3,
            directory: PathBuf::from("logs"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ChromeSettings {
    /// Icon edge length as a fraction of the bar's height.
    pub icon_scale: f32,
    pub default_background: Color,
    pub height: u32,
    /// Root of the PNG icons referenced by buttons.
    pub icon_directory: Option<PathBuf>,
}

impl Default for ChromeSettings {
    fn default() -> Self {
        ChromeSettings {
            icon_scale: DEFAULT_ICON_SCALE,
            default_background: MATERIAL_GREY,
            height: DEFAULT_BAR_HEIGHT,
            icon_directory: None,
        }
    }
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Settings, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("can't read settings file {}", path.display()))?;
        let settings: Settings = toml::from_str(&text)
            .with_context(|| format!("can't parse settings file {}", path.display()))?;

        if !(settings.chrome.icon_scale > 0.0) {
            anyhow::bail!("icon-scale must be positive, got {}", settings.chrome.icon_scale);
        }

        Ok(settings)
    }

    /// Loads `path`, falling back to defaults when it's missing or invalid.
    ///
    /// Tracing isn't configured before settings are read, so problems are
    /// reported on stderr.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Settings {
        let path = path.as_ref();
        if !path.exists() {
            return Settings::default();
        }

        match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{:#}; using default settings", e);
                Settings::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let text = toml::to_string(self).context("can't serialize settings")?;
        fs::write(path, text)
            .with_context(|| format!("can't write settings file {}", path.display()))?;
        Ok(())
    }
}
