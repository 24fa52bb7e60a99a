use crate::{
    arena::{
        BufferArena,
        BufferView,
    },
    common::{
        material::WaveFrontMaterial,
        object::TextureOffset,
        vertex::Vertex,
    },
    error::{
        ResolveError,
        Result,
    },
};

/// Host form of an object descriptor: the texture offset plus one view per per-object array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectDescriptor {
    pub texture_offset: TextureOffset,
    pub vertices: BufferView<Vertex>,
    pub indices: BufferView<[u32; 3]>,
    pub materials: BufferView<WaveFrontMaterial>,
    pub material_indices: BufferView<i32>,
}

impl ObjectDescriptor {
    pub fn triangle_count(&self) -> u32 {
        self.indices.len()
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len()
    }
}

/// Immutable table of object descriptors, indexed by object index.
#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    descriptors: Vec<ObjectDescriptor>,
}

impl DescriptorTable {
    pub fn new(descriptors: Vec<ObjectDescriptor>) -> Self {
        Self { descriptors }
    }

    pub fn len(&self) -> u32 {
        self.descriptors.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectDescriptor> {
        self.descriptors.iter()
    }

    pub fn resolve(&self, obj_index: u32) -> Result<ObjectDescriptor> {
        self.descriptors
            .get(obj_index as usize)
            .copied()
            .ok_or(ResolveError::ObjectOutOfRange {
                index: obj_index,
                count: self.len(),
            })
    }
}

pub fn load_vertex(
    arena: &BufferArena,
    vertices: BufferView<Vertex>,
    index: u32,
) -> Result<Vertex> {
    arena.load(vertices, index)
}

pub fn load_triangle(
    arena: &BufferArena,
    indices: BufferView<[u32; 3]>,
    triangle: u32,
) -> Result<[u32; 3]> {
    arena.load(indices, triangle)
}

pub fn load_material(
    arena: &BufferArena,
    materials: BufferView<WaveFrontMaterial>,
    material_index: u32,
) -> Result<WaveFrontMaterial> {
    arena.load(materials, material_index)
}

pub fn load_material_index(
    arena: &BufferArena,
    material_indices: BufferView<i32>,
    triangle: u32,
) -> Result<i32> {
    arena.load(material_indices, triangle)
}

/// Material of `triangle`, always read through the material-index array.
pub fn load_triangle_material(
    arena: &BufferArena,
    desc: &ObjectDescriptor,
    triangle: u32,
) -> Result<WaveFrontMaterial> {
    let material_index = load_material_index(arena, desc.material_indices, triangle)?;
    let material_index =
        u32::try_from(material_index).map_err(|_| ResolveError::NegativeMaterialIndex {
            triangle,
            material_index,
        })?;
    load_material(arena, desc.materials, material_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm::{
        Vec2,
        Vec3,
    };

    fn material(diffuse: f32) -> WaveFrontMaterial {
        WaveFrontMaterial {
            diffuse: [diffuse; 3],
            ..Default::default()
        }
    }

    fn upload_object(
        arena: &mut BufferArena,
        texture_offset: TextureOffset,
        vertices: &[Vertex],
        indices: &[[u32; 3]],
        materials: &[WaveFrontMaterial],
        material_indices: &[i32],
    ) -> ObjectDescriptor {
        ObjectDescriptor {
            texture_offset,
            vertices: arena.upload("vertices", vertices),
            indices: arena.upload("indices", indices),
            materials: arena.upload("materials", materials),
            material_indices: arena.upload("material_indices", material_indices),
        }
    }

    #[test]
    fn test_resolve_round_trips_uploaded_descriptors() {
        let mut arena = BufferArena::new();
        let first = upload_object(
            &mut arena,
            TextureOffset::NONE,
            &[Vertex::default(); 3],
            &[[0, 1, 2]],
            &[material(0.5)],
            &[0],
        );
        let second = upload_object(
            &mut arena,
            TextureOffset::new(2),
            &[Vertex::default(); 4],
            &[[0, 1, 2], [0, 2, 3]],
            &[material(0.1), material(0.2)],
            &[1, 0],
        );
        let table = DescriptorTable::new(vec![first, second]);

        assert_eq!(table.resolve(0).unwrap(), first);
        assert_eq!(table.resolve(1).unwrap(), second);
        assert_eq!(table.resolve(1).unwrap().texture_offset, TextureOffset::new(2));
        assert_eq!(
            table.resolve(2),
            Err(ResolveError::ObjectOutOfRange { index: 2, count: 2 })
        );
    }

    #[test]
    fn test_load_vertex_reproduces_every_field() {
        let vertices = [
            Vertex::new(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec2::new(0.0, 0.0),
            ),
            Vertex::new(
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec2::new(1.0, 0.0),
            ),
            Vertex::new(
                Vec3::new(0.0, 1.0, 0.5),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec2::new(0.25, 0.75),
            ),
        ];
        let mut arena = BufferArena::new();
        let view = arena.upload("vertices", &vertices);

        for (i, expected) in vertices.iter().enumerate() {
            let loaded = load_vertex(&arena, view, i as u32).unwrap();
            assert_eq!(bytemuck::bytes_of(&loaded), bytemuck::bytes_of(expected));
            assert_eq!(loaded.tex_coord(), expected.tex_coord());
        }
        assert!(load_vertex(&arena, view, 3).is_err());
    }

    #[test]
    fn test_material_is_resolved_through_material_indices() {
        let mut arena = BufferArena::new();
        let materials = [material(0.1), material(0.2), material(0.3)];
        // triangle t uses material (t + 1) % 3
        let desc = upload_object(
            &mut arena,
            TextureOffset::NONE,
            &[Vertex::default(); 3],
            &[[0, 1, 2], [0, 1, 2], [0, 1, 2]],
            &materials,
            &[1, 2, 0],
        );

        for triangle in 0..3u32 {
            let resolved = load_triangle_material(&arena, &desc, triangle).unwrap();
            assert_eq!(resolved, materials[((triangle + 1) % 3) as usize]);
            assert_ne!(resolved, materials[triangle as usize]);
        }
    }

    #[test]
    fn test_negative_material_index() {
        let mut arena = BufferArena::new();
        let desc = upload_object(
            &mut arena,
            TextureOffset::NONE,
            &[Vertex::default(); 3],
            &[[0, 1, 2]],
            &[material(0.1)],
            &[-1],
        );
        assert_eq!(
            load_triangle_material(&arena, &desc, 0),
            Err(ResolveError::NegativeMaterialIndex {
                triangle: 0,
                material_index: -1,
            })
        );
    }
}
