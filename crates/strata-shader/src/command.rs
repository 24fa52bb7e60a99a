use anyhow::{
    ensure,
    Context,
    Result,
};
use std::{
    io::Write,
    path::{
        Path,
        PathBuf,
    },
    process::Command,
};
use strata_base::path::{
    get_shader_include_root,
    get_shader_spv_root,
    get_shader_src_root,
};
use strata_render::shader::glsl::shared_header;

const SHARED_HEADER_NAME: &str = "layout.glsl";
const SHARED_HEADER_PREAMBLE: &str = concat!(
    "// Generated by strata-shader. Do not edit.\n",
    "#ifndef STRATA_LAYOUT_GLSL\n",
    "#define STRATA_LAYOUT_GLSL\n",
);
const SHADER_EXTENSIONS: [&str; 9] = [
    "vert", "frag", "comp", "rgen", "rmiss", "rchit", "rahit", "mesh", "task",
];

/// Writes the generated record declarations into `include_root`, returning the header path.
pub fn write_shared_header_to(include_root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(include_root)?;
    let header_path = include_root.join(SHARED_HEADER_NAME);
    let header = format!("{}\n{}\n#endif\n", SHARED_HEADER_PREAMBLE, shared_header());
    std::fs::write(&header_path, header)
        .with_context(|| format!("failed to write {}", header_path.display()))?;
    log::info!("wrote shared header: {}", header_path.display());
    Ok(header_path)
}

pub fn write_shared_header() -> Result<PathBuf> {
    write_shared_header_to(&get_shader_include_root()?)
}

pub fn compile(input_path: &Path) -> Result<()> {
    let input_filename = input_path
        .file_name()
        .context("failed to get file name")?
        .to_str()
        .context("failed to convert to string")?;
    let output_filename = format!("{}.spv", input_filename);

    let shader_src_root = get_shader_src_root()?;
    let relative_input_path = input_path.strip_prefix(&shader_src_root)?;
    let relative_output_path = relative_input_path.with_file_name(output_filename);

    let shader_spv_root = get_shader_spv_root()?;
    let output_path = shader_spv_root.join(relative_output_path);
    std::fs::create_dir_all(output_path.parent().context("failed to get parent")?)?;

    log::info!(
        "compiling shader: {} -> {}",
        input_path.display(),
        output_path.display()
    );
    let output = Command::new("glslc")
        .arg(input_path.as_os_str())
        .arg("--target-spv=spv1.6")
        .arg("-g")
        .arg("-O0")
        .arg("-o")
        .arg(output_path.as_os_str())
        .output()?;
    std::io::stderr().write_all(&output.stderr)?;
    ensure!(
        output.status.success(),
        "failed to compile shader: {}",
        input_path.display()
    );
    Ok(())
}

pub fn compile_all() -> Result<()> {
    let shader_src_root = get_shader_src_root()?;
    let extensions = SHADER_EXTENSIONS.iter().cloned().collect();
    let target_paths = crate::utils::glob_shader_src(&shader_src_root, &extensions)?;
    for path in target_paths {
        compile(&path)?;
    }
    Ok(())
}
