use std::path::{ Path, PathBuf };

use anyhow::Context;
use serde::{ Deserialize, Serialize };

use crate::engine::components::shapes::check_torus_parameters;
use crate::engine::error::RenderError;
use crate::engine::managers::shader_manager::GlslDialect;
use crate::engine::rendering::scene::ANGLE_PERIOD;

/// Geometry, animation and projection settings for [`crate::Scene`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub ring_resolution: u32,
    pub major_radius: f32,
    pub minor_radius: f32,
    /// Radians added to the animation angle every frame.
    pub angle_step: f64,
    /// How far down -Z the torus is pushed.
    pub camera_distance: f32,
    pub near: f32,
    pub far: f32,
    /// Half of the shorter viewport axis at the near plane.
    pub half_extent: f32,
    pub clear_color: [f32; 4],
    pub glsl: GlslDialect,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ring_resolution: 48,
            major_radius: 1.0,
            minor_radius: 0.4,
            angle_step: 0.02,
            camera_distance: 4.0,
            near: 1.0,
            far: 100.0,
            half_extent: 0.5,
            clear_color: [0.05, 0.05, 0.08, 1.0],
            glsl: GlslDialect::Desktop,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), RenderError> {
        check_torus_parameters(self.ring_resolution, self.major_radius, self.minor_radius)?;

        if !self.angle_step.is_finite() || self.angle_step.abs() >= ANGLE_PERIOD {
            return Err(RenderError::InvalidMesh(format!(
                "angle step {} must be finite and smaller than one period",
                self.angle_step
            )));
        }
        if !(self.near.is_finite() && self.near > 0.0 && self.far.is_finite() && self.far > self.near) {
            return Err(RenderError::InvalidMesh(format!(
                "clip planes need 0 < near < far, got {} and {}",
                self.near, self.far
            )));
        }
        if !(self.half_extent.is_finite() && self.half_extent > 0.0) {
            return Err(RenderError::InvalidMesh(format!("half extent {} must be positive", self.half_extent)));
        }
        if !(self.camera_distance.is_finite() && self.camera_distance > 0.0) {
            return Err(RenderError::InvalidMesh(format!(
                "camera distance {} must be positive",
                self.camera_distance
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "Torus".to_string(), width: 500, height: 500 }
    }
}

/// Settings for the windowed demo binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    /// Delay between frame requests.
    pub tick_interval_ms: u64,
    /// Image for the torus. Noise is used when unset or unreadable.
    pub texture: Option<PathBuf>,
    pub noise_size: u32,
    pub noise_seed: u64,
    pub scene: SceneConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            tick_interval_ms: 17,
            texture: None,
            noise_size: 64,
            noise_seed: 1,
            scene: SceneConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads a JSON config file, or returns the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.scene.validate()?;
        anyhow::ensure!(config.tick_interval_ms > 0, "tick_interval_ms must be positive");
        anyhow::ensure!(config.noise_size > 0, "noise_size must be positive");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "tick_interval_ms": 100, "scene": { "ring_resolution": 16, "glsl": "gles" } }"#
        ).unwrap();
        assert_eq!(config.tick_interval_ms, 100);
        assert_eq!(config.scene.ring_resolution, 16);
        assert_eq!(config.scene.glsl, GlslDialect::Gles);
        assert_eq!(config.scene.major_radius, SceneConfig::default().major_radius);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn rejects_bad_projection() {
        let config = SceneConfig { near: 2.0, far: 1.0, ..SceneConfig::default() };
        assert!(matches!(config.validate(), Err(RenderError::InvalidMesh(_))));

        let config = SceneConfig { angle_step: f64::INFINITY, ..SceneConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_geometry() {
        let config = SceneConfig { ring_resolution: 0, ..SceneConfig::default() };
        assert!(config.validate().is_err());

        let config = SceneConfig { ring_resolution: 2, ..SceneConfig::default() };
        assert!(matches!(config.validate(), Err(RenderError::InvalidMesh(_))));
    }

    #[test]
    fn missing_path_means_defaults() {
        assert_eq!(AppConfig::load(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn unreadable_file_is_an_error() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/torus.json"))).is_err());
    }
}
