use crate::{
    mesh::{
        MaterialData,
        MeshData,
        NO_TEXTURE,
    },
    model::{
        ModelDescriptor,
        ModelTrait,
    },
    transform::Transform,
};
use anyhow::{
    bail,
    Context,
    Result,
};
use gltf::{
    buffer,
    image::Source,
    Document,
    Material,
    Node,
};
use nalgebra_glm::{
    Mat4,
    Vec3,
    Vec4,
};
use std::path::PathBuf;
use strata_base::path::get_project_root;

/// DFS traversal of the glTF scene graph to get all the nodes
fn read_object_nodes_recursive<'a>(
    node: Node<'a>,
    parent_transform: Mat4,
    nodes: &mut Vec<Node<'a>>,
    transforms: &mut Vec<Mat4>,
) {
    let cur_transform = parent_transform * Mat4::from(node.transform().matrix());
    if node.mesh().is_some() {
        nodes.push(node.clone());
        transforms.push(cur_transform);
    }
    for child in node.children() {
        read_object_nodes_recursive(child, cur_transform, nodes, transforms);
    }
}

/// Get all the mesh nodes in the glTF document with their accumulated transforms
fn read_object_nodes(document: &Document) -> (Vec<Node>, Vec<Mat4>) {
    let mut nodes = Vec::new();
    let mut transforms = Vec::new();
    for scene in document.scenes() {
        for node in scene.nodes() {
            read_object_nodes_recursive(node, Mat4::identity(), &mut nodes, &mut transforms);
        }
    }
    (nodes, transforms)
}

fn convert_material(material: &Material) -> MaterialData {
    let pbr = material.pbr_metallic_roughness();
    let base_color = pbr.base_color_factor();
    let emissive_strength = material.emissive_strength().unwrap_or(1.0);
    let emission = material.emissive_factor().map(|c| c * emissive_strength);
    let specular = material
        .specular()
        .map(|specular| specular.specular_color_factor())
        .unwrap_or([1.0, 1.0, 1.0]);
    let transmittance = material
        .transmission()
        .map(|transmission| {
            let factor = transmission.transmission_factor();
            [factor, factor, factor]
        })
        .unwrap_or([0.0, 0.0, 0.0]);
    let texture_id = pbr
        .base_color_texture()
        .map(|info| info.texture().index() as i32)
        .unwrap_or(NO_TEXTURE);

    MaterialData {
        ambient: [0.1, 0.1, 0.1],
        diffuse: [base_color[0], base_color[1], base_color[2]],
        specular,
        transmittance,
        emission,
        shininess: (1.0 - pbr.roughness_factor()) * 128.0,
        ior: material.ior().unwrap_or(1.5),
        dissolve: base_color[3],
        illum: 2,
        texture_id,
    }
}

#[derive(Debug, Clone)]
pub struct GltfAdapter {
    document: Document,
    buffers: Vec<buffer::Data>,
    transform: Transform,
    path: PathBuf,
}

impl GltfAdapter {
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Document materials followed by a default material for primitives without one.
    fn read_materials(&self) -> Vec<MaterialData> {
        let mut materials = self
            .document
            .materials()
            .map(|material| convert_material(&material))
            .collect::<Vec<_>>();
        materials.push(MaterialData::default());
        materials
    }
}

impl ModelTrait for GltfAdapter {
    fn from_model_descriptor(desc: &ModelDescriptor) -> Result<Self> {
        let Some(relative_path) = &desc.path else {
            bail!("Model descriptor has no glTF path");
        };
        let path = if relative_path.is_absolute() {
            relative_path.clone()
        } else {
            get_project_root()?.join(relative_path)
        };
        log::info!("Loading glTF from: {:?}", path);
        let (document, buffers, _images) =
            gltf::import(&path).with_context(|| format!("failed to import {:?}", path))?;
        Ok(Self {
            document,
            buffers,
            transform: desc.transform.clone(),
            path,
        })
    }

    fn read_meshes(&self) -> Result<Vec<MeshData>> {
        let materials = self.read_materials();
        let default_material = (materials.len() - 1) as i32;

        let mut meshes = Vec::new();
        let (nodes, transforms) = read_object_nodes(&self.document);
        for (node, transform) in nodes.iter().zip(transforms.iter()) {
            let Some(mesh) = node.mesh() else {
                continue;
            };
            let normal_matrix = nalgebra_glm::inverse_transpose(*transform);

            for primitive in mesh.primitives() {
                let reader = primitive.reader(|buffer| Some(&self.buffers[buffer.index()]));

                let positions = reader
                    .read_positions()
                    .with_context(|| {
                        format!(
                            "primitive {} of mesh {} has no positions",
                            primitive.index(),
                            mesh.index()
                        )
                    })?
                    .map(|p| {
                        let p = transform * Vec4::new(p[0], p[1], p[2], 1.0);
                        [p.x, p.y, p.z]
                    })
                    .collect::<Vec<_>>();

                let normals = reader
                    .read_normals()
                    .map(|iter| {
                        iter.map(|n| {
                            let n = normal_matrix * Vec4::new(n[0], n[1], n[2], 0.0);
                            let n = nalgebra_glm::normalize(&Vec3::new(n.x, n.y, n.z));
                            [n.x, n.y, n.z]
                        })
                        .collect()
                    })
                    .unwrap_or_default();

                let colors = reader
                    .read_colors(0)
                    .map(|iter| iter.into_rgb_f32().collect())
                    .unwrap_or_default();

                let tex_coords = reader
                    .read_tex_coords(0)
                    .map(|iter| iter.into_f32().collect())
                    .unwrap_or_default();

                let flat_indices = match reader.read_indices() {
                    Some(indices) => indices.into_u32().collect::<Vec<_>>(),
                    None => (0..positions.len() as u32).collect(),
                };
                if flat_indices.len() % 3 != 0 {
                    log::warn!(
                        "Primitive {} of mesh {} has {} indices, dropping the trailing ones",
                        primitive.index(),
                        mesh.index(),
                        flat_indices.len()
                    );
                }
                let indices = flat_indices
                    .chunks_exact(3)
                    .map(|triangle| [triangle[0], triangle[1], triangle[2]])
                    .collect::<Vec<_>>();

                let material_index = primitive
                    .material()
                    .index()
                    .map(|index| index as i32)
                    .unwrap_or(default_material);

                let mesh_data = MeshData {
                    name: mesh
                        .name()
                        .map(str::to_owned)
                        .unwrap_or_else(|| format!("mesh{}", mesh.index())),
                    positions,
                    normals,
                    colors,
                    tex_coords,
                    material_indices: vec![material_index; indices.len()],
                    indices,
                    materials: materials.clone(),
                };
                mesh_data.validate()?;
                meshes.push(mesh_data);
            }
        }
        Ok(meshes)
    }

    fn read_textures(&self) -> Vec<String> {
        let base_dir = self.path.parent().map(PathBuf::from).unwrap_or_default();
        self.document
            .textures()
            .map(|texture| match texture.source().source() {
                Source::Uri { uri, .. } => base_dir.join(uri).to_string_lossy().into_owned(),
                Source::View { .. } => {
                    format!("{}#image{}", self.path.display(), texture.source().index())
                }
            })
            .collect()
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }
}
