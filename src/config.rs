//! Render configuration loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable config files. Every
//! field has a default, so a config file only needs the values it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::rasterizer::{Axis, Color, RenderSettings, Resolution, Rgb, Vec3};

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::SerializeError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Largest width or height the display texture can hold
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Continuous model rotation about one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinConfig {
    pub axis: Axis,
    /// Radians per frame
    pub speed: f32,
}

/// Camera circling the model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub radius: f32,
    /// Starting azimuth and elevation, radians
    pub phi: f32,
    pub theta: f32,
    /// Radians per frame
    pub phi_speed: f32,
    pub theta_speed: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            radius: 3.0,
            phi: 0.0,
            theta: 0.3,
            phi_speed: 0.005,
            theta_speed: 0.0,
        }
    }
}

/// Everything needed to set up the renderer and the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Horizontal field of view, degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Direction towards the light, camera space
    pub light_dir: Vec3,
    pub ambient: f32,
    pub material: Rgb,
    pub clear_color: Color,
    pub wireframe: bool,
    pub wire_color: Color,
    /// OBJ file to display; the built-in cube when absent
    pub mesh: Option<PathBuf>,
    pub model_offset: Vec3,
    pub spin: Option<SpinConfig>,
    pub orbit: OrbitConfig,
    /// Raw framebuffer device (e.g. /dev/fb0) mirrored every frame
    pub device: Option<PathBuf>,
    pub snapshot_path: PathBuf,
    /// Window pixels per framebuffer pixel
    pub window_scale: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let settings = RenderSettings::default();
        Self {
            width: 640,
            height: 480,
            fov_degrees: settings.fov.to_degrees(),
            near: settings.near,
            far: settings.far,
            light_dir: settings.light_dir,
            ambient: settings.ambient,
            material: settings.material,
            clear_color: Color::BLACK,
            wireframe: settings.wireframe,
            wire_color: settings.wire_color,
            mesh: None,
            model_offset: Vec3::ZERO,
            spin: None,
            orbit: OrbitConfig::default(),
            device: None,
            snapshot_path: PathBuf::from("snapshot.png"),
            window_scale: 1,
        }
    }
}

impl RenderConfig {
    /// Reject values the renderer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.width == 0 || self.height == 0 {
            return invalid(format!("resolution {}x{} must be at least 1x1", self.width, self.height));
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return invalid(format!(
                "resolution {}x{} exceeds {} pixels per side",
                self.width, self.height, MAX_DIMENSION
            ));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return invalid(format!("fov_degrees {} must be between 0 and 180", self.fov_degrees));
        }
        if !(self.near > 0.0 && self.near < self.far) {
            return invalid(format!("need 0 < near < far, got near={} far={}", self.near, self.far));
        }
        if !(self.light_dir.len() > 0.0) {
            return invalid("light_dir must not be zero".to_string());
        }
        if !(0.0..=1.0).contains(&self.ambient) {
            return invalid(format!("ambient {} must be between 0 and 1", self.ambient));
        }
        if !(self.orbit.radius > 0.0) {
            return invalid(format!("orbit radius {} must be positive", self.orbit.radius));
        }
        if self.window_scale == 0 {
            return invalid("window_scale must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            fov: self.fov_degrees.to_radians(),
            near: self.near,
            far: self.far,
            light_dir: self.light_dir,
            ambient: self.ambient,
            material: self.material,
            alpha: 255,
            wireframe: self.wireframe,
            wire_color: self.wire_color,
        }
    }
}

/// Load and validate a config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RenderConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Save a config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &RenderConfig, path: P) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Load a config from a RON string (for embedded configs or testing)
pub fn load_config_from_str(s: &str) -> Result<RenderConfig, ConfigError> {
    let config: RenderConfig = ron::from_str(s)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolution(), Resolution::new(640, 480));

        let settings = config.render_settings();
        assert!((settings.fov - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(settings.near, 0.5);
        assert_eq!(settings.far, 15.0);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = load_config_from_str(
            "(width: 320, height: 200, wireframe: true, spin: Some((axis: Y, speed: 0.01)))",
        )
        .unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, 200);
        assert!(config.wireframe);
        assert_eq!(config.spin, Some(SpinConfig { axis: Axis::Y, speed: 0.01 }));
        assert_eq!(config.far, 15.0);
        assert_eq!(config.orbit, OrbitConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        for bad in [
            "(width: 0)",
            "(width: 65536)",
            "(height: 100000)",
            "(fov_degrees: 180.0)",
            "(near: 2.0, far: 1.0)",
            "(near: 0.0)",
            "(light_dir: (x: 0.0, y: 0.0, z: 0.0))",
            "(ambient: 1.5)",
            "(window_scale: 0)",
        ] {
            match load_config_from_str(bad) {
                Err(ConfigError::Invalid(_)) => {}
                other => panic!("{} gave {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_largest_resolution_accepted() {
        let config = load_config_from_str("(width: 65535, height: 1)").unwrap();
        assert_eq!(config.resolution().width(), MAX_DIMENSION);
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(load_config_from_str("(width: "), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.ron");

        let config = RenderConfig {
            width: 100,
            mesh: Some(PathBuf::from("models/cat.obj")),
            material: Rgb::new(0.2, 0.4, 0.6),
            device: Some(PathBuf::from("/dev/fb0")),
            ..RenderConfig::default()
        };
        save_config(&config, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);

        assert!(matches!(load_config(dir.path().join("none.ron")), Err(ConfigError::IoError(_))));
    }
}
