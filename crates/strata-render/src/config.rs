use crate::common::{
    camera::Camera,
    push_constants::{
        LightType,
        PushConstantRay,
    },
};
use anyhow::{
    ensure,
    Result,
};
use nalgebra_glm::{
    Vec2,
    Vec3,
    Vec4,
};
use serde::Deserialize;
use std::path::Path;
use strata_base::path::get_render_config_root;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Light {
    pub position: [f32; 3],
    pub intensity: f32,
    pub kind: LightType,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: [10.0, 15.0, 8.0],
            intensity: 100.0,
            kind: LightType::Point,
        }
    }
}

impl Light {
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Yaw and pitch in radians.
    pub rotation: [f32; 2],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 5.0],
            rotation: [std::f32::consts::PI, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderConfig {
    pub scene: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_max_depth")]
    pub max_depth: i32,
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 4],
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: Light,
}

fn default_max_depth() -> i32 {
    2
}

fn default_clear_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

impl RenderConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        ensure!(path.exists(), "Config doesn't exist: {:?}", path);

        let config: RenderConfig = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        ensure!(
            config.width > 0 && config.height > 0,
            "Render target must not be empty: {}x{}",
            config.width,
            config.height
        );
        Ok(config)
    }

    pub fn from_config_root() -> Result<Self> {
        Self::from_path(&get_render_config_root()?.join("render.json"))
    }

    pub fn camera(&self) -> Camera {
        Camera::new(
            self.width,
            self.height,
            Vec3::from(self.camera.position),
            Vec2::from(self.camera.rotation),
        )
    }

    pub fn ray_push_constants(&self) -> PushConstantRay {
        PushConstantRay::new(
            Vec4::from(self.clear_color),
            self.light.position(),
            self.light.intensity,
            self.light.kind,
            self.max_depth,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/render.json");
        let config = RenderConfig::from_path(&path).unwrap();
        assert_eq!(config.scene, "triangles");
        assert!(config.max_depth >= 1);

        let push = config.ray_push_constants();
        assert_eq!(push.max_depth, config.max_depth);
        assert_eq!(push.clear_color, config.clear_color);
        assert_eq!(push.light_type, i32::from(config.light.kind));
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.json");
        std::fs::write(
            &path,
            r#"{ "scene": "triangles", "width": 8, "height": 4, "light": { "kind": "infinite" } }"#,
        )
        .unwrap();
        let config = RenderConfig::from_path(&path).unwrap();

        assert_eq!(config.max_depth, 2);
        assert_eq!(config.camera, CameraConfig::default());
        assert_eq!(config.light.kind, LightType::Infinite);
        assert_eq!(config.light.intensity, Light::default().intensity);
    }

    #[test]
    fn test_rejects_empty_target_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RenderConfig::from_path(&dir.path().join("missing.json")).is_err());

        let path = dir.path().join("render.json");
        std::fs::write(&path, r#"{ "scene": "triangles", "width": 0, "height": 4 }"#).unwrap();
        assert!(RenderConfig::from_path(&path).is_err());
    }
}
