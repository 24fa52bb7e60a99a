use anyhow::{
    bail,
    Result,
};
use ash::vk;
use bytemuck::{
    Pod,
    Zeroable,
};
use nalgebra_glm::{
    Mat4,
    Vec3,
    Vec4,
};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightType {
    #[default]
    Point,
    Infinite,
}

impl From<LightType> for i32 {
    fn from(light_type: LightType) -> Self {
        match light_type {
            LightType::Point => 0,
            LightType::Infinite => 1,
        }
    }
}

impl TryFrom<i32> for LightType {
    type Error = anyhow::Error;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(LightType::Point),
            1 => Ok(LightType::Infinite),
            _ => bail!("unknown light type: {}", value),
        }
    }
}

/// Per-draw constants of the raster pipeline (88 bytes). `obj_index` selects the object
/// descriptor the draw reads its geometry through.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PushConstantRaster {
    pub model_matrix: [[f32; 4]; 4],
    pub light_position: [f32; 3],
    pub obj_index: u32,
    pub light_intensity: f32,
    pub light_type: i32,
}

impl PushConstantRaster {
    pub fn new(
        model_matrix: &Mat4,
        obj_index: u32,
        light_position: Vec3,
        light_intensity: f32,
        light_type: LightType,
    ) -> Self {
        Self {
            model_matrix: (*model_matrix).into(),
            light_position: light_position.into(),
            obj_index,
            light_intensity,
            light_type: light_type.into(),
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from(self.model_matrix)
    }

    pub fn range() -> vk::PushConstantRange {
        vk::PushConstantRange::default()
            .stage_flags(vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT)
            .offset(0)
            .size(std::mem::size_of::<Self>() as u32)
    }
}

/// Per-dispatch constants of the ray-tracing pipeline (40 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PushConstantRay {
    pub clear_color: [f32; 4],
    pub light_position: [f32; 3],
    pub light_intensity: f32,
    pub light_type: i32,
    pub max_depth: i32,
}

impl PushConstantRay {
    pub fn new(
        clear_color: Vec4,
        light_position: Vec3,
        light_intensity: f32,
        light_type: LightType,
        max_depth: i32,
    ) -> Self {
        Self {
            clear_color: clear_color.into(),
            light_position: light_position.into(),
            light_intensity,
            light_type: light_type.into(),
            max_depth,
        }
    }

    pub fn clear_color(&self) -> Vec4 {
        Vec4::from(self.clear_color)
    }

    pub fn range() -> vk::PushConstantRange {
        vk::PushConstantRange::default()
            .stage_flags(
                vk::ShaderStageFlags::RAYGEN_KHR
                    | vk::ShaderStageFlags::CLOSEST_HIT_KHR
                    | vk::ShaderStageFlags::MISS_KHR,
            )
            .offset(0)
            .size(std::mem::size_of::<Self>() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    #[test]
    fn test_raster_layout() {
        assert_eq!(std::mem::size_of::<PushConstantRaster>(), 88);
        assert_eq!(offset_of!(PushConstantRaster, light_position), 64);
        assert_eq!(offset_of!(PushConstantRaster, obj_index), 76);
        assert_eq!(offset_of!(PushConstantRaster, light_type), 84);
        assert_eq!(PushConstantRaster::range().size, 88);
    }

    #[test]
    fn test_ray_layout() {
        assert_eq!(std::mem::size_of::<PushConstantRay>(), 40);
        assert_eq!(offset_of!(PushConstantRay, light_position), 16);
        assert_eq!(offset_of!(PushConstantRay, max_depth), 36);
        assert_eq!(PushConstantRay::range().size, 40);
    }

    #[test]
    fn test_light_type_codes() {
        assert_eq!(i32::from(LightType::Infinite), 1);
        assert_eq!(LightType::try_from(0).unwrap(), LightType::Point);
        assert!(LightType::try_from(2).is_err());
    }
}
