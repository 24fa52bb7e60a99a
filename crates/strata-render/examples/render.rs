use nalgebra_glm::{
    Vec2,
    Vec3,
};
use strata_base::path::get_project_root;
use strata_render::{
    common::payload::HitPayload,
    config::RenderConfig,
    draw::{
        passthrough,
        raster::{
            RasterPass,
            RasterTriangle,
        },
        raytracing::RayPass,
    },
    geometry::{
        GeometryProvider,
        SceneGeometry,
    },
};
use strata_scene::scene::Scene;

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Minimal depth-tested rasterizer for the vertex-stage output; stands in for fixed function.
fn rasterize(triangles: &[RasterTriangle], width: u32, height: u32, background: Vec3) -> Vec<Vec3> {
    let mut colors = vec![background; (width * height) as usize];
    let mut depth = vec![f32::INFINITY; (width * height) as usize];
    for triangle in triangles {
        if triangle.vertices.iter().any(|v| v.clip_position.w <= 0.0) {
            continue;
        }
        let screen = triangle.vertices.map(|v| {
            let ndc = v.clip_position.xyz() / v.clip_position.w;
            Vec3::new(
                (ndc.x * 0.5 + 0.5) * width as f32,
                (ndc.y * 0.5 + 0.5) * height as f32,
                ndc.z,
            )
        });
        let [a, b, c] = screen.map(|s| s.xy());
        let area = edge(a, b, c);
        if area.abs() < f32::EPSILON {
            continue;
        }
        for y in 0..height {
            for x in 0..width {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w = Vec3::new(edge(b, c, p), edge(c, a, p), edge(a, b, p)) / area;
                if w.x < 0.0 || w.y < 0.0 || w.z < 0.0 {
                    continue;
                }
                let z = w.x * screen[0].z + w.y * screen[1].z + w.z * screen[2].z;
                let i = (y * width + x) as usize;
                if z < depth[i] {
                    depth[i] = z;
                    colors[i] = triangle.vertices[0].frag_color * w.x
                        + triangle.vertices[1].frag_color * w.y
                        + triangle.vertices[2].frag_color * w.z;
                }
            }
        }
    }
    colors
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("RUST_LOG", "debug");
    env_logger::init();

    log::info!("Parsing arguments");
    let config = RenderConfig::from_config_root()?;

    log::info!("Packing scene {:?}", config.scene);
    let scene = Scene::from_scene_name(&config.scene)?;
    let geometry = SceneGeometry::from_scene(&scene)?;
    let uniforms = config.camera().create_global_uniforms();

    log::info!("Raster pass");
    let raster = RasterPass::new(&geometry, uniforms);
    let triangles = raster.draw_instances(geometry.instances(), &config.light)?;
    let clear_color = config.ray_push_constants().clear_color().xyz();
    let frag_colors = rasterize(&triangles, config.width, config.height, clear_color);

    let output_root = get_project_root()?.join("output");
    passthrough::resolve_target(config.width, config.height, &frag_colors)?
        .save(&output_root.join("raster.png"))?;

    log::info!("Ray pass");
    // no acceleration structure here: every primary ray misses
    let ray = RayPass::new(&geometry, config.ray_push_constants());
    let frag_colors = ray.render(
        &|_: Vec3, _: Vec3, payload: &mut HitPayload| ray.miss(payload),
        &uniforms,
        config.width,
        config.height,
    );
    passthrough::resolve_target(config.width, config.height, &frag_colors)?
        .save(&output_root.join("ray.png"))?;

    log::info!(
        "Rendered {} objects, {} textures",
        geometry.object_count(),
        geometry.texture_count()
    );
    Ok(())
}
