//! Inspector settings loaded from `config/layout.toml`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use surviveler_ui::Viewport;
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config/layout.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Root width used when a document has no `[viewport]`.
    pub viewport_width: f32,
    /// Root height used when a document has no `[viewport]`.
    pub viewport_height: f32,
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            log_filter: "warn".to_string(),
            pretty: true,
        }
    }
}

impl InspectorConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<InspectorConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    InspectorConfig::default()
                }
            },
            Err(err) => {
                if path == Path::new(DEFAULT_CONFIG_PATH) && err.kind() == std::io::ErrorKind::NotFound {
                    debug!("No inspector config at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                InspectorConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Viewport for documents that do not declare one.
    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("surviveler-{name}-{nanos}.toml"))
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: InspectorConfig = toml::from_str("viewport_width = 640\n").unwrap();
        assert_eq!(cfg.viewport_width, 640.0);
        assert_eq!(cfg.viewport_height, 720.0);
        assert_eq!(cfg.log_filter, "warn");
    }

    #[test]
    fn round_trips_through_disk() {
        let path = temp_path("roundtrip");
        let cfg = InspectorConfig {
            viewport_width: 320.0,
            pretty: false,
            ..InspectorConfig::default()
        };
        cfg.save_to_path(&path).unwrap();
        assert_eq!(InspectorConfig::load_from_path(&path), cfg);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = temp_path("malformed");
        fs::write(&path, "viewport_width = \"wide\"\n").unwrap();
        assert_eq!(InspectorConfig::load_from_path(&path), InspectorConfig::default());
        let _ = fs::remove_file(&path);
    }
}
