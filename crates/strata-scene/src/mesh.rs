use anyhow::{
    ensure,
    Result,
};
use nalgebra_glm::Vec3;
use serde::Deserialize;

pub const NO_TEXTURE: i32 = -1;

/// Wavefront-style material parameters as authored in scene files.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MaterialData {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub transmittance: [f32; 3],
    pub emission: [f32; 3],
    pub shininess: f32,
    pub ior: f32,
    pub dissolve: f32,
    pub illum: i32,
    /// Model-local texture id, `-1` when untextured.
    pub texture_id: i32,
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            ambient: [0.1, 0.1, 0.1],
            diffuse: [0.7, 0.7, 0.7],
            specular: [1.0, 1.0, 1.0],
            transmittance: [0.0, 0.0, 0.0],
            emission: [0.0, 0.0, 0.0],
            shininess: 0.0,
            ior: 1.0,
            dissolve: 1.0,
            illum: 0,
            texture_id: NO_TEXTURE,
        }
    }
}

/// Geometry of a single scene object, one entry per object descriptor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MeshData {
    #[serde(default)]
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,
    #[serde(default)]
    pub colors: Vec<[f32; 3]>,
    #[serde(default)]
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<[u32; 3]>,
    #[serde(default)]
    pub materials: Vec<MaterialData>,
    /// One entry per triangle. Empty means every triangle uses material 0.
    #[serde(default)]
    pub material_indices: Vec<i32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.vertex_count();
        ensure!(
            self.normals.is_empty() || self.normals.len() == vertex_count,
            "Mesh {:?}: {} normals for {} vertices",
            self.name,
            self.normals.len(),
            vertex_count
        );
        ensure!(
            self.colors.is_empty() || self.colors.len() == vertex_count,
            "Mesh {:?}: {} colors for {} vertices",
            self.name,
            self.colors.len(),
            vertex_count
        );
        ensure!(
            self.tex_coords.is_empty() || self.tex_coords.len() == vertex_count,
            "Mesh {:?}: {} texture coordinates for {} vertices",
            self.name,
            self.tex_coords.len(),
            vertex_count
        );
        for (triangle_i, triangle) in self.indices.iter().enumerate() {
            for &index in triangle {
                ensure!(
                    (index as usize) < vertex_count,
                    "Mesh {:?}: triangle {} references vertex {} (vertex count: {})",
                    self.name,
                    triangle_i,
                    index,
                    vertex_count
                );
            }
        }
        ensure!(
            self.material_indices.is_empty()
                || self.material_indices.len() == self.triangle_count(),
            "Mesh {:?}: {} material indices for {} triangles",
            self.name,
            self.material_indices.len(),
            self.triangle_count()
        );
        let material_count = self.materials.len().max(1);
        for (triangle_i, &material_index) in self.material_indices.iter().enumerate() {
            ensure!(
                material_index >= 0 && (material_index as usize) < material_count,
                "Mesh {:?}: triangle {} uses material {} (material count: {})",
                self.name,
                triangle_i,
                material_index,
                material_count
            );
        }
        Ok(())
    }

    /// Area-weighted per-vertex normals, used when the source carries none.
    pub fn compute_vertex_normals(&self) -> Vec<[f32; 3]> {
        let mut normals = vec![Vec3::zeros(); self.vertex_count()];
        for triangle in &self.indices {
            let [a, b, c] = triangle.map(|i| Vec3::from(self.positions[i as usize]));
            let face_normal = nalgebra_glm::cross(&(b - a), &(c - a));
            for &i in triangle {
                normals[i as usize] += face_normal;
            }
        }
        normals
            .into_iter()
            .map(|n| {
                if nalgebra_glm::length(&n) > 0.0 {
                    nalgebra_glm::normalize(&n).into()
                } else {
                    [0.0, 0.0, 0.0]
                }
            })
            .collect()
    }
}
