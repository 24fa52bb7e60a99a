use anyhow::{
    bail,
    Result,
};
use std::path::{
    Path,
    PathBuf,
};

const WORKSPACE_MANIFEST_MARKER: &str = "[workspace]";

fn is_workspace_root(dir: &Path) -> bool {
    std::fs::read_to_string(dir.join("Cargo.toml"))
        .map(|manifest| manifest.contains(WORKSPACE_MANIFEST_MARKER))
        .unwrap_or(false)
}

/// Resolves the project root starting from `start`.
///
/// The enclosing git work tree wins; outside of a repository the nearest ancestor holding a
/// workspace manifest is used instead.
pub fn find_project_root_from(start: &Path) -> Result<PathBuf> {
    if let Ok(repo) = git2::Repository::discover(start) {
        if let Some(workdir) = repo.workdir() {
            return Ok(workdir.to_path_buf());
        }
    }
    for dir in start.ancestors() {
        if is_workspace_root(dir) {
            return Ok(dir.to_path_buf());
        }
    }
    bail!("No project root found above {:?}", start);
}

pub fn get_project_root() -> Result<PathBuf> {
    find_project_root_from(&std::env::current_dir()?)
}

pub fn get_shader_root() -> Result<PathBuf> {
    let project_root = get_project_root()?;
    Ok(project_root.join("shader"))
}

pub fn get_shader_src_root() -> Result<PathBuf> {
    let shader_root = get_shader_root()?;
    Ok(shader_root.join("src"))
}

pub fn get_shader_spv_root() -> Result<PathBuf> {
    let shader_root = get_shader_root()?;
    Ok(shader_root.join("spv"))
}

/// Directory holding the generated GLSL header shared by every pipeline.
pub fn get_shader_include_root() -> Result<PathBuf> {
    let shader_src_root = get_shader_src_root()?;
    Ok(shader_src_root.join("shared"))
}

pub fn get_scene_config_root() -> Result<PathBuf> {
    let project_root = get_project_root()?;
    Ok(project_root.join("crates/strata-scene/config"))
}

pub fn get_render_config_root() -> Result<PathBuf> {
    let project_root = get_project_root()?;
    Ok(project_root.join("crates/strata-render/configs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_project_root_from_workspace_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Cargo.toml"),
            "[workspace]\nmembers = []\n",
        )
        .unwrap();
        let nested = dir.path().join("crates/inner/src");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join("crates/inner/Cargo.toml"),
            "[package]\nname = \"inner\"\n",
        )
        .unwrap();

        let root = find_project_root_from(&nested).unwrap();
        assert_eq!(
            root.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_project_root_of_this_workspace() {
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let root = find_project_root_from(manifest_dir).unwrap();
        assert!(manifest_dir.starts_with(&root));
    }
}
