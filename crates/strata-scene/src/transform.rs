use nalgebra_glm::{
    Mat4,
    Vec3,
};
use serde::Deserialize;

/// Object-to-world placement of a model. Rotation is XYZ Euler angles in radians.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub scale: f32,
    pub translation: [f32; 3],
    pub rotation: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translation: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        let rotation = nalgebra_glm::quat_angle_axis(self.rotation[0], &Vec3::new(1.0, 0.0, 0.0))
            * nalgebra_glm::quat_angle_axis(self.rotation[1], &Vec3::new(0.0, 1.0, 0.0))
            * nalgebra_glm::quat_angle_axis(self.rotation[2], &Vec3::new(0.0, 0.0, 1.0));

        let translation = nalgebra_glm::translation(&Vec3::from(self.translation));
        let rotation = nalgebra_glm::quat_to_mat4(&rotation);
        let scale = nalgebra_glm::scaling(&Vec3::new(self.scale, self.scale, self.scale));
        translation * rotation * scale
    }
}
