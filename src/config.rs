use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/studio.json";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Scene Studio".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Spin rates in radians per second of wall time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub spin_rate_y: f32,
    pub spin_rate_x: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            spin_rate_y: 1.0,
            spin_rate_x: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub fps_report_interval_ms: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            fps_report_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    #[default]
    Fixed,
    Randomized,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub mode: PlacementMode,
    /// Half extent of the square used for randomized x/z placement.
    pub spread: f32,
    pub seed: Option<u64>,
    pub sphere_radius: f32,
    pub light_range: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            mode: PlacementMode::Fixed,
            spread: 4.0,
            seed: None,
            sphere_radius: 0.6,
            light_range: 15.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            position: [6.0, 4.0, 6.0],
            target: [0.0, 0.0, 0.0],
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 1.0,
            max_distance: 200.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub starter_scene: bool,
    pub console_capacity: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            starter_scene: true,
            console_capacity: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f32; 3],
    pub show_grid: bool,
    pub grid_size: f32,
    pub grid_divisions: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            // 0x08121a
            clear_color: [0.031, 0.071, 0.102],
            show_grid: true,
            grid_size: 50.0,
            grid_divisions: 50,
        }
    }
}

impl SessionConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn fps_report_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.stats.fps_report_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_starter_scene_setup() {
        let config = SessionConfig::default();
        assert_eq!(config.placement.mode, PlacementMode::Fixed);
        assert_eq!(config.stats.fps_report_interval_ms, 500);
        assert!(config.editor.starter_scene);
        assert_eq!(config.camera.position, [6.0, 4.0, 6.0]);
        assert!((config.placement.sphere_radius - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{ "placement": {{ "mode": "randomized", "seed": 7 }}, "stats": {{ "fps_report_interval_ms": 250 }} }}"#
        )
        .expect("write config");

        let config = SessionConfig::load(file.path()).expect("config parses");
        assert_eq!(config.placement.mode, PlacementMode::Randomized);
        assert_eq!(config.placement.seed, Some(7));
        assert!((config.placement.spread - 4.0).abs() < f32::EPSILON);
        assert_eq!(config.stats.fps_report_interval_ms, 250);
        assert_eq!(config.window.width, 1280);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{ not json").expect("write config");

        assert!(SessionConfig::load(file.path()).is_err());
        let config = SessionConfig::load_or_default(file.path());
        assert_eq!(config.window.title, "Scene Studio");
    }
}
