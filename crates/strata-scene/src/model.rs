use crate::{
    gltf::GltfAdapter,
    mesh::MeshData,
    transform::Transform,
};
use anyhow::{
    bail,
    Result,
};
use serde::Deserialize;

/// A model is either a glTF file on disk or a mesh written inline in the scene file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelDescriptor {
    #[serde(default)]
    pub path: Option<std::path::PathBuf>,
    #[serde(default)]
    pub mesh: Option<MeshData>,
    /// Texture sources for inline meshes; glTF models read theirs from the file.
    #[serde(default)]
    pub textures: Vec<String>,
    #[serde(default)]
    pub transform: Transform,
}

#[derive(Debug, Clone)]
pub enum Model {
    Gltf(GltfAdapter),
    Inline(InlineModel),
}

pub trait ModelTrait: Sized {
    fn from_model_descriptor(model_descriptor: &ModelDescriptor) -> Result<Self>;
    /// One mesh per object descriptor the model contributes.
    fn read_meshes(&self) -> Result<Vec<MeshData>>;
    /// Model-local texture table; material texture ids index into it.
    fn read_textures(&self) -> Vec<String>;
    fn transform(&self) -> &Transform;
}

#[derive(Debug, Clone)]
pub struct InlineModel {
    mesh: MeshData,
    textures: Vec<String>,
    transform: Transform,
}

impl ModelTrait for InlineModel {
    fn from_model_descriptor(desc: &ModelDescriptor) -> Result<Self> {
        let Some(mesh) = &desc.mesh else {
            bail!("Model descriptor has no inline mesh");
        };
        mesh.validate()?;
        Ok(Self {
            mesh: mesh.clone(),
            textures: desc.textures.clone(),
            transform: desc.transform.clone(),
        })
    }

    fn read_meshes(&self) -> Result<Vec<MeshData>> {
        Ok(vec![self.mesh.clone()])
    }

    fn read_textures(&self) -> Vec<String> {
        self.textures.clone()
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }
}

impl Model {
    pub fn from_model_descriptor(desc: &ModelDescriptor) -> Result<Self> {
        match (&desc.path, &desc.mesh) {
            (Some(_), None) => Ok(Model::Gltf(GltfAdapter::from_model_descriptor(desc)?)),
            (None, Some(_)) => Ok(Model::Inline(InlineModel::from_model_descriptor(desc)?)),
            (Some(path), Some(_)) => {
                bail!("Model {:?} sets both a path and an inline mesh", path)
            }
            (None, None) => bail!("Model descriptor needs either a path or an inline mesh"),
        }
    }

    pub fn read_meshes(&self) -> Result<Vec<MeshData>> {
        match self {
            Model::Gltf(gltf) => gltf.read_meshes(),
            Model::Inline(inline) => inline.read_meshes(),
        }
    }

    pub fn read_textures(&self) -> Vec<String> {
        match self {
            Model::Gltf(gltf) => gltf.read_textures(),
            Model::Inline(inline) => inline.read_textures(),
        }
    }

    pub fn transform(&self) -> &Transform {
        match self {
            Model::Gltf(gltf) => gltf.transform(),
            Model::Inline(inline) => inline.transform(),
        }
    }
}
