use crate::{
    common::{
        camera::GlobalUniforms,
        material::WaveFrontMaterial,
        push_constants::PushConstantRaster,
        vertex::Vertex,
    },
    config::Light,
    error::Result,
    geometry::{
        GeometryProvider,
        Instance,
    },
};
use nalgebra_glm::{
    Mat4,
    Vec2,
    Vec3,
    Vec4,
};

/// Vertex-stage output handed to fixed-function rasterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterVertex {
    pub clip_position: Vec4,
    pub world_position: Vec3,
    pub world_normal: Vec3,
    pub frag_color: Vec3,
    pub tex_coord: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterTriangle {
    pub obj_index: u32,
    pub triangle: u32,
    pub vertices: [RasterVertex; 3],
    pub material: WaveFrontMaterial,
    pub texture_slot: Option<u32>,
}

/// Vertex fetch and primitive assembly for the raster pipeline.
pub struct RasterPass<'a, G: GeometryProvider + ?Sized> {
    geometry: &'a G,
    uniforms: GlobalUniforms,
}

impl<'a, G: GeometryProvider + ?Sized> RasterPass<'a, G> {
    pub fn new(geometry: &'a G, uniforms: GlobalUniforms) -> Self {
        Self { geometry, uniforms }
    }

    fn shade_vertex(&self, vertex: &Vertex, model: &Mat4, normal_matrix: &Mat4) -> RasterVertex {
        let [px, py, pz] = vertex.pos;
        let [nx, ny, nz] = vertex.nrm;
        let world_position = model * Vec4::new(px, py, pz, 1.0);
        let world_normal = (normal_matrix * Vec4::new(nx, ny, nz, 0.0)).xyz();
        let world_normal = if nalgebra_glm::length(&world_normal) > 0.0 {
            nalgebra_glm::normalize(&world_normal)
        } else {
            world_normal
        };
        RasterVertex {
            clip_position: self.uniforms.view_proj() * world_position,
            world_position: world_position.xyz(),
            world_normal,
            frag_color: vertex.color(),
            tex_coord: vertex.tex_coord(),
        }
    }

    /// Runs one draw call: every triangle of the object selected by `push.obj_index`.
    pub fn draw(&self, push: &PushConstantRaster) -> Result<Vec<RasterTriangle>> {
        let desc = self.geometry.resolve(push.obj_index)?;
        let model = push.model_matrix();
        let normal_matrix = nalgebra_glm::inverse_transpose(model);

        let mut triangles = Vec::with_capacity(desc.triangle_count() as usize);
        for triangle in 0..desc.triangle_count() {
            let vertices = self.geometry.triangle_vertices(&desc, triangle)?;
            let material = self.geometry.triangle_material(&desc, triangle)?;
            triangles.push(RasterTriangle {
                obj_index: push.obj_index,
                triangle,
                vertices: vertices.map(|v| self.shade_vertex(&v, &model, &normal_matrix)),
                material,
                texture_slot: self.geometry.texture_slot(&desc, &material),
            });
        }
        log::debug!(
            "raster draw: object {} -> {} triangles",
            push.obj_index,
            triangles.len()
        );
        Ok(triangles)
    }

    /// One draw per instance, each with its own push constants.
    pub fn draw_instances(
        &self,
        instances: &[Instance],
        light: &Light,
    ) -> Result<Vec<RasterTriangle>> {
        let mut triangles = Vec::new();
        for instance in instances {
            let push = PushConstantRaster::new(
                &instance.transform,
                instance.obj_index,
                light.position(),
                light.intensity,
                light.kind,
            );
            triangles.extend(self.draw(&push)?);
        }
        Ok(triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::push_constants::LightType,
        error::ResolveError,
        geometry::{
            ModelTextures,
            SceneGeometry,
            SceneGeometryBuilder,
        },
    };

    fn material(illum: i32) -> WaveFrontMaterial {
        WaveFrontMaterial {
            illum,
            ..Default::default()
        }
    }

    fn quad_scene() -> SceneGeometry {
        let vertices = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]
        .map(|pos| Vertex {
            pos,
            nrm: [0.0, 0.0, 1.0],
            color: [0.2, 0.4, 0.8],
            tex_coord: [pos[0], pos[1]],
        });
        let mut builder = SceneGeometryBuilder::default();
        builder
            .add_object(
                "quad",
                &vertices,
                &[[0, 1, 2], [0, 2, 3]],
                &[material(1), material(2)],
                &[1, 0],
                ModelTextures::NONE,
            )
            .unwrap();
        builder.build()
    }

    fn push(model: &Mat4, obj_index: u32) -> PushConstantRaster {
        PushConstantRaster::new(model, obj_index, Vec3::new(0.0, 5.0, 0.0), 10.0, LightType::Point)
    }

    #[test]
    fn test_draw_fetches_vertices_and_indirect_materials() {
        let geometry = quad_scene();
        let pass = RasterPass::new(&geometry, GlobalUniforms::default());
        let triangles = pass.draw(&push(&Mat4::identity(), 0)).unwrap();

        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[0].material.illum, 2);
        assert_eq!(triangles[1].material.illum, 1);
        assert_eq!(triangles[1].vertices[2].world_position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(triangles[0].vertices[0].frag_color, Vec3::new(0.2, 0.4, 0.8));
        assert_eq!(triangles[0].texture_slot, None);
    }

    #[test]
    fn test_draw_applies_model_matrix() {
        let geometry = quad_scene();
        let pass = RasterPass::new(&geometry, GlobalUniforms::default());
        let model = nalgebra_glm::translation(&Vec3::new(0.0, 0.0, -3.0));
        let triangles = pass.draw(&push(&model, 0)).unwrap();

        let v = triangles[0].vertices[1];
        assert_eq!(v.world_position, Vec3::new(1.0, 0.0, -3.0));
        assert_eq!(v.clip_position, Vec4::new(1.0, 0.0, -3.0, 1.0));
        assert_eq!(v.world_normal, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_draw_with_bad_object_index() {
        let geometry = quad_scene();
        let pass = RasterPass::new(&geometry, GlobalUniforms::default());
        assert_eq!(
            pass.draw(&push(&Mat4::identity(), 3)),
            Err(ResolveError::ObjectOutOfRange { index: 3, count: 1 })
        );
    }

    #[test]
    fn test_draw_instances() {
        let geometry = quad_scene();
        let pass = RasterPass::new(&geometry, GlobalUniforms::default());
        let instances = [
            Instance {
                obj_index: 0,
                transform: Mat4::identity(),
            },
            Instance {
                obj_index: 0,
                transform: nalgebra_glm::translation(&Vec3::new(2.0, 0.0, 0.0)),
            },
        ];
        let triangles = pass.draw_instances(&instances, &Light::default()).unwrap();
        assert_eq!(triangles.len(), 4);
        assert_eq!(triangles[2].vertices[0].world_position, Vec3::new(2.0, 0.0, 0.0));
    }
}
