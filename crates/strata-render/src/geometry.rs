use crate::{
    arena::BufferArena,
    common::{
        material::WaveFrontMaterial,
        object::TextureOffset,
        vertex::Vertex,
    },
    error::Result,
    resolver::{
        self,
        DescriptorTable,
        ObjectDescriptor,
    },
};
use anyhow::ensure;
use nalgebra_glm::Mat4;
use strata_scene::{
    mesh::MeshData,
    scene::Scene,
};

/// Geometry and material access shared by the raster and ray-tracing passes.
///
/// Both passes reach per-object data only through this trait, so the layout knowledge lives in
/// one implementation.
pub trait GeometryProvider {
    fn object_count(&self) -> u32;
    fn texture_count(&self) -> u32;
    fn resolve(&self, obj_index: u32) -> Result<ObjectDescriptor>;
    fn vertex(&self, desc: &ObjectDescriptor, index: u32) -> Result<Vertex>;
    fn triangle(&self, desc: &ObjectDescriptor, triangle: u32) -> Result<[u32; 3]>;
    fn triangle_material(
        &self,
        desc: &ObjectDescriptor,
        triangle: u32,
    ) -> Result<WaveFrontMaterial>;

    fn triangle_vertices(&self, desc: &ObjectDescriptor, triangle: u32) -> Result<[Vertex; 3]> {
        let [a, b, c] = self.triangle(desc, triangle)?;
        Ok([
            self.vertex(desc, a)?,
            self.vertex(desc, b)?,
            self.vertex(desc, c)?,
        ])
    }

    /// Global texture slot of `material` on this object, `None` when untextured.
    fn texture_slot(&self, desc: &ObjectDescriptor, material: &WaveFrontMaterial) -> Option<u32> {
        desc.texture_offset
            .slot(material.texture_id())
            .filter(|&slot| slot < self.texture_count())
    }
}

/// Range of the global texture array a model registered; its materials' texture ids index it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelTextures {
    pub offset: TextureOffset,
    pub count: u32,
}

impl ModelTextures {
    pub const NONE: ModelTextures = ModelTextures {
        offset: TextureOffset::NONE,
        count: 0,
    };
}

impl Default for ModelTextures {
    fn default() -> Self {
        Self::NONE
    }
}

/// One placement of an object in the scene; the raster pass issues one draw per instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub obj_index: u32,
    pub transform: Mat4,
}

/// Packed scene: every per-object array in one arena plus the descriptor table over it.
#[derive(Debug, Clone, Default)]
pub struct SceneGeometry {
    arena: BufferArena,
    table: DescriptorTable,
    instances: Vec<Instance>,
    textures: Vec<String>,
}

impl SceneGeometry {
    pub fn arena(&self) -> &BufferArena {
        &self.arena
    }

    pub fn table(&self) -> &DescriptorTable {
        &self.table
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Global texture array, indexed by texture slot.
    pub fn textures(&self) -> &[String] {
        &self.textures
    }

    pub fn from_scene(scene: &Scene) -> anyhow::Result<Self> {
        let mut builder = SceneGeometryBuilder::default();
        for model in &scene.models {
            let textures = builder.add_textures(model.read_textures());
            let transform = model.transform().matrix();
            for mesh in model.read_meshes()? {
                let obj_index = builder.add_mesh(&mesh, textures)?;
                builder.add_instance(obj_index, transform);
            }
        }
        let geometry = builder.build();
        log::info!(
            "Packed scene {:?}: {} objects, {} buffers, {} textures",
            scene.name,
            geometry.object_count(),
            geometry.arena.len(),
            geometry.textures.len()
        );
        Ok(geometry)
    }
}

impl GeometryProvider for SceneGeometry {
    fn object_count(&self) -> u32 {
        self.table.len()
    }

    fn texture_count(&self) -> u32 {
        self.textures.len() as u32
    }

    fn resolve(&self, obj_index: u32) -> Result<ObjectDescriptor> {
        self.table.resolve(obj_index)
    }

    fn vertex(&self, desc: &ObjectDescriptor, index: u32) -> Result<Vertex> {
        resolver::load_vertex(&self.arena, desc.vertices, index)
    }

    fn triangle(&self, desc: &ObjectDescriptor, triangle: u32) -> Result<[u32; 3]> {
        resolver::load_triangle(&self.arena, desc.indices, triangle)
    }

    fn triangle_material(
        &self,
        desc: &ObjectDescriptor,
        triangle: u32,
    ) -> Result<WaveFrontMaterial> {
        resolver::load_triangle_material(&self.arena, desc, triangle)
    }
}

#[derive(Debug, Default)]
pub struct SceneGeometryBuilder {
    arena: BufferArena,
    descriptors: Vec<ObjectDescriptor>,
    instances: Vec<Instance>,
    textures: Vec<String>,
}

impl SceneGeometryBuilder {
    /// Registers a model's textures and returns the range its objects use.
    pub fn add_textures(&mut self, textures: Vec<String>) -> ModelTextures {
        if textures.is_empty() {
            return ModelTextures::NONE;
        }
        let range = ModelTextures {
            offset: TextureOffset::new(self.textures.len() as u32),
            count: textures.len() as u32,
        };
        self.textures.extend(textures);
        range
    }

    /// Uploads one object's arrays and returns its object index.
    ///
    /// An empty material list gets one default material; an empty material-index list maps
    /// every triangle to material 0. On a textured object every material texture id must fall
    /// inside `textures`, so no slot reaches into another model's range.
    pub fn add_object(
        &mut self,
        name: &str,
        vertices: &[Vertex],
        triangles: &[[u32; 3]],
        materials: &[WaveFrontMaterial],
        material_indices: &[i32],
        textures: ModelTextures,
    ) -> anyhow::Result<u32> {
        ensure!(
            material_indices.is_empty() || material_indices.len() == triangles.len(),
            "Object {:?}: {} material indices for {} triangles",
            name,
            material_indices.len(),
            triangles.len()
        );
        if textures.offset.get().is_some() {
            for (i, material) in materials.iter().enumerate() {
                if let Some(texture_id) = material.texture_id() {
                    ensure!(
                        texture_id < textures.count,
                        "Object {:?}: material {} uses texture {} of {}",
                        name,
                        i,
                        texture_id,
                        textures.count
                    );
                }
            }
        }
        let default_materials = [WaveFrontMaterial::default()];
        let materials = if materials.is_empty() {
            &default_materials[..]
        } else {
            materials
        };
        let zero_indices;
        let material_indices = if material_indices.is_empty() {
            zero_indices = vec![0i32; triangles.len()];
            &zero_indices[..]
        } else {
            material_indices
        };

        let obj_index = self.descriptors.len() as u32;
        let desc = ObjectDescriptor {
            texture_offset: textures.offset,
            vertices: self.arena.upload(&format!("{}.vertices", name), vertices),
            indices: self.arena.upload(&format!("{}.indices", name), triangles),
            materials: self.arena.upload(&format!("{}.materials", name), materials),
            material_indices: self
                .arena
                .upload(&format!("{}.material_indices", name), material_indices),
        };
        log::debug!(
            "object {} {:?}: {} vertices, {} triangles, {} materials, texture offset {:?}",
            obj_index,
            name,
            vertices.len(),
            triangles.len(),
            materials.len(),
            textures.offset
        );
        self.descriptors.push(desc);
        Ok(obj_index)
    }

    /// Converts scene mesh data into the shared vertex/material layouts and uploads it.
    pub fn add_mesh(&mut self, mesh: &MeshData, textures: ModelTextures) -> anyhow::Result<u32> {
        mesh.validate()?;
        let normals = if mesh.normals.is_empty() {
            mesh.compute_vertex_normals()
        } else {
            mesh.normals.clone()
        };
        let vertices = (0..mesh.vertex_count())
            .map(|i| Vertex {
                pos: mesh.positions[i],
                nrm: normals[i],
                color: mesh.colors.get(i).copied().unwrap_or([1.0, 1.0, 1.0]),
                tex_coord: mesh.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect::<Vec<_>>();
        let materials = mesh
            .materials
            .iter()
            .map(WaveFrontMaterial::from)
            .collect::<Vec<_>>();
        self.add_object(
            &mesh.name,
            &vertices,
            &mesh.indices,
            &materials,
            &mesh.material_indices,
            textures,
        )
    }

    pub fn add_instance(&mut self, obj_index: u32, transform: Mat4) {
        self.instances.push(Instance {
            obj_index,
            transform,
        });
    }

    pub fn build(self) -> SceneGeometry {
        SceneGeometry {
            arena: self.arena,
            table: DescriptorTable::new(self.descriptors),
            instances: self.instances,
            textures: self.textures,
        }
    }
}
