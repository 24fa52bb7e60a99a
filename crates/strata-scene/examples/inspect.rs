use anyhow::Result;
use strata_scene::scene::Scene;

fn main() -> Result<()> {
    std::env::set_var("RUST_LOG", "debug");
    env_logger::init();

    let scene_name = std::env::args().nth(1).unwrap_or_else(|| "triangles".to_owned());
    let scene = Scene::from_scene_name(&scene_name)?;
    log::info!("Scene: {}", scene.name);
    for (model_i, model) in scene.models.iter().enumerate() {
        let meshes = model.read_meshes()?;
        log::info!(
            "model {}: {} meshes, {} textures, transform {:?}",
            model_i,
            meshes.len(),
            model.read_textures().len(),
            model.transform()
        );
        for mesh in &meshes {
            log::info!(
                "- {:?}: {} vertices, {} triangles, {} materials",
                mesh.name,
                mesh.vertex_count(),
                mesh.triangle_count(),
                mesh.materials.len()
            );
        }
    }
    Ok(())
}
