use bytemuck::{
    Pod,
    Zeroable,
};
use nalgebra_glm::Vec3;

/// Per-ray state threaded through the hit and miss stages (56 bytes).
///
/// `done` is cleared by a hit stage that wants another bounce along `ray_origin`/`ray_dir`;
/// the ray-generation driver stops as soon as it reads it set.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct HitPayload {
    pub hit_value: [f32; 3],
    pub depth: i32,
    pub attenuation: [f32; 3],
    pub done: i32,
    pub ray_origin: [f32; 3],
    pub ray_dir: [f32; 3],
}

impl HitPayload {
    /// Payload for a freshly generated primary ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            hit_value: [0.0; 3],
            depth: 0,
            attenuation: [1.0; 3],
            done: 1,
            ray_origin: origin.into(),
            ray_dir: direction.into(),
        }
    }

    pub fn hit_value(&self) -> Vec3 {
        Vec3::from(self.hit_value)
    }

    pub fn set_hit_value(&mut self, value: Vec3) {
        self.hit_value = value.into();
    }

    pub fn attenuation(&self) -> Vec3 {
        Vec3::from(self.attenuation)
    }

    pub fn set_attenuation(&mut self, attenuation: Vec3) {
        self.attenuation = attenuation.into();
    }

    pub fn is_done(&self) -> bool {
        self.done != 0
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done as i32;
    }

    pub fn ray_origin(&self) -> Vec3 {
        Vec3::from(self.ray_origin)
    }

    pub fn ray_dir(&self) -> Vec3 {
        Vec3::from(self.ray_dir)
    }

    /// Requests another bounce from a hit stage.
    pub fn continue_with(&mut self, origin: Vec3, direction: Vec3) {
        self.ray_origin = origin.into();
        self.ray_dir = direction.into();
        self.done = 0;
    }
}
