use crate::model::{
    Model,
    ModelDescriptor,
};
use anyhow::{
    bail,
    ensure,
    Result,
};
use serde::Deserialize;
use std::path::Path;
use strata_base::path::get_scene_config_root;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneDescriptor {
    pub scene: String,
    pub models: Vec<ModelDescriptor>,
}

impl SceneDescriptor {
    pub fn from_path(path: &Path) -> Result<Self> {
        ensure!(path.exists(), "Specified path doesn't exist: {:?}", path);

        let file = std::fs::File::open(path)?;
        let mut deserializer = serde_json::Deserializer::from_reader(file);
        let scene_descriptor = SceneDescriptor::deserialize(&mut deserializer)?;
        Ok(scene_descriptor)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub name: String,
    pub models: Vec<Model>,
}

impl Scene {
    pub fn from_scene_descriptor(desc: SceneDescriptor) -> Result<Self> {
        let mut models = Vec::with_capacity(desc.models.len());
        for model_desc in &desc.models {
            models.push(Model::from_model_descriptor(model_desc)?);
        }
        log::debug!("Scene {:?}: {} models", desc.scene, models.len());

        Ok(Self {
            name: desc.scene,
            models,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let scene_descriptor = SceneDescriptor::from_path(path)?;
        Self::from_scene_descriptor(scene_descriptor)
    }

    /// Searches `config_root` for a descriptor whose `scene` field equals `scene_name`.
    pub fn from_config_root(config_root: &Path, scene_name: &str) -> Result<Self> {
        for entry in std::fs::read_dir(config_root)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                let scene_desc = SceneDescriptor::from_path(&path)?;
                if scene_desc.scene == scene_name {
                    return Self::from_scene_descriptor(scene_desc);
                }
            }
        }
        bail!("Scene not found: {}", scene_name);
    }

    pub fn from_scene_name(scene_name: &str) -> Result<Self> {
        Self::from_config_root(&get_scene_config_root()?, scene_name)
    }
}
