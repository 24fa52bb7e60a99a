use bytemuck::{
    Pod,
    Zeroable,
};
use strata_scene::mesh::MaterialData;

pub const NO_TEXTURE_ID: i32 = -1;

/// Wavefront material record as read by both pipelines (80 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct WaveFrontMaterial {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub transmittance: [f32; 3],
    pub emission: [f32; 3],
    pub shininess: f32,
    pub ior: f32,
    pub dissolve: f32,
    pub illum: i32,
    pub texture_id: i32,
}

impl Default for WaveFrontMaterial {
    fn default() -> Self {
        Self::from(&MaterialData::default())
    }
}

impl From<&MaterialData> for WaveFrontMaterial {
    fn from(material: &MaterialData) -> Self {
        Self {
            ambient: material.ambient,
            diffuse: material.diffuse,
            specular: material.specular,
            transmittance: material.transmittance,
            emission: material.emission,
            shininess: material.shininess,
            ior: material.ior,
            dissolve: material.dissolve,
            illum: material.illum,
            texture_id: material.texture_id,
        }
    }
}

impl WaveFrontMaterial {
    /// Object-local texture id, `None` for untextured materials.
    pub fn texture_id(&self) -> Option<u32> {
        u32::try_from(self.texture_id).ok()
    }
}
