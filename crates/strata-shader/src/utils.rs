use anyhow::{
    Context,
    Result,
};
use glob::glob;
use std::{
    collections::HashSet,
    path::{
        Path,
        PathBuf,
    },
};

/// Every file below `shader_src_root` whose extension is one of `extensions`.
pub fn glob_shader_src(shader_src_root: &Path, extensions: &HashSet<&str>) -> Result<Vec<PathBuf>> {
    let pattern = shader_src_root.join("**/*");
    let pattern = pattern.to_str().context("failed to convert to str")?;
    let mut paths = Vec::new();
    for entry in glob(pattern)? {
        let path = entry?;
        let is_shader = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(ext));
        if path.is_file() && is_shader {
            paths.push(path);
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_shader_src_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("raytrace")).unwrap();
        for name in ["raytrace/raytrace.rgen", "passthrough.frag", "shared.glsl", "notes.txt"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let extensions = ["frag", "rgen"].into_iter().collect();

        let mut paths = glob_shader_src(dir.path(), &extensions).unwrap();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                dir.path().join("passthrough.frag"),
                dir.path().join("raytrace/raytrace.rgen"),
            ]
        );
    }
}
