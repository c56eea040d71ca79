//! Viewer configuration.
//!
//! Everything the frame loop used to hard-code (window size, asset paths,
//! camera, light) lives here. Every section falls back to its defaults, so a
//! config file only needs the keys it wants to change.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "mp3d-viewer.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Requested core-profile version, `[major, minor]`.
    pub gl_version: [u8; 2],
    /// Hidden windows are used by the GL test-suite.
    pub hidden: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "mp3d-viewer".to_string(),
            width: 512,
            height: 512,
            vsync: true,
            gl_version: [4, 3],
            hidden: false,
        }
    }
}

/// What the frame loop draws each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    /// The configured mesh, textured and lit.
    #[default]
    LitMesh,
    /// The configured mesh with vertex colours only.
    MvpMesh,
    /// The built-in triangle, untransformed.
    FlatTriangle,
    /// The built-in full-screen quad, untransformed.
    FlatQuad,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f32; 4],
    pub rotation_degrees_per_frame: f32,
    pub scene: Scene,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.25, 0.25, 0.25, 1.0],
            rotation_degrees_per_frame: 1.0,
            scene: Scene::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub mesh: PathBuf,
    /// When unset, a generated checkerboard is used instead.
    pub texture: Option<PathBuf>,
    pub basic_vert: PathBuf,
    pub basic_frag: PathBuf,
    pub mvp_vert: PathBuf,
    pub light_vert: PathBuf,
    pub light_frag: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            mesh: PathBuf::from("res/cube.obj"),
            texture: Some(PathBuf::from("res/crate.png")),
            basic_vert: PathBuf::from("res/shaders/basic.vert"),
            basic_frag: PathBuf::from("res/shaders/basic.frag"),
            mvp_vert: PathBuf::from("res/shaders/mvp.vert"),
            light_vert: PathBuf::from("res/shaders/light.vert"),
            light_frag: PathBuf::from("res/shaders/light.frag"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 80.0,
            eye: [1.0, 1.0, 3.0],
            target: [0.0, 0.0, 0.0],
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub direction: [f32; 3],
    pub color: [f32; 3],
    pub ambient: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: [-1.0, 0.0, 0.0],
            color: [1.0, 1.0, 1.0],
            ambient: [0.1, 0.1, 0.1],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub assets: AssetConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            render: RenderConfig::default(),
            assets: AssetConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Reads and parses the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given, else [`DEFAULT_CONFIG_FILE`] if it exists,
    /// else the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn level_filter(&self) -> Result<log::LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "window": {{ "title": "Zavala" }}, "light": {{ "color": [1.0, 0.5, 0.0] }} }}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.window.title, "Zavala");
        assert_eq!(config.window.width, 512);
        assert_eq!(config.light.color, [1.0, 0.5, 0.0]);
        assert_eq!(config.light.direction, [-1.0, 0.0, 0.0]);
        assert_eq!(config.render, RenderConfig::default());
        assert_eq!(config.assets, AssetConfig::default());
    }

    #[test]
    fn scene_names_are_snake_case() {
        let render: RenderConfig = serde_json::from_str(r#"{ "scene": "flat_quad" }"#).unwrap();
        assert_eq!(render.scene, Scene::FlatQuad);
        assert!(serde_json::from_str::<RenderConfig>(r#"{ "scene": "wireframe" }"#).is_err());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ window: ").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(
            Config::discover(Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn log_level_is_validated() {
        let mut config = Config::default();
        assert_eq!(config.level_filter().unwrap(), log::LevelFilter::Info);
        config.log_level = "trace".to_string();
        assert_eq!(config.level_filter().unwrap(), log::LevelFilter::Trace);
        config.log_level = "loud".to_string();
        assert!(matches!(
            config.level_filter(),
            Err(ConfigError::InvalidLogLevel(level)) if level == "loud"
        ));
    }
}
