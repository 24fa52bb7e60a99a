use crate::{
    common::{
        camera::GlobalUniforms,
        material::WaveFrontMaterial,
        payload::HitPayload,
        push_constants::PushConstantRay,
    },
    error::Result,
    geometry::GeometryProvider,
};
use nalgebra_glm::{
    Mat4,
    Vec2,
    Vec3,
    Vec4,
};

/// Built-in inputs of a closest-hit invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitAttributes {
    /// Object index the hit instance was created with.
    pub instance_custom_index: u32,
    pub primitive_id: u32,
    pub barycentrics: Vec2,
}

/// Interpolated surface attributes at a hit point, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Vec3,
    pub tex_coord: Vec2,
    pub material: WaveFrontMaterial,
    pub texture_slot: Option<u32>,
}

/// Traversal plus hit/miss dispatch for one ray. Acceleration structures live behind this.
pub trait RayTracer {
    fn trace_ray(&self, origin: Vec3, direction: Vec3, payload: &mut HitPayload);
}

impl<F> RayTracer for F
where
    F: Fn(Vec3, Vec3, &mut HitPayload),
{
    fn trace_ray(&self, origin: Vec3, direction: Vec3, payload: &mut HitPayload) {
        self(origin, direction, payload)
    }
}

pub struct RayPass<'a, G: GeometryProvider + ?Sized> {
    geometry: &'a G,
    push: PushConstantRay,
}

impl<'a, G: GeometryProvider + ?Sized> RayPass<'a, G> {
    pub fn new(geometry: &'a G, push: PushConstantRay) -> Self {
        Self { geometry, push }
    }

    pub fn push_constants(&self) -> &PushConstantRay {
        &self.push
    }

    /// Fetches the hit triangle through the object descriptor and interpolates its attributes.
    pub fn closest_hit(
        &self,
        attributes: &HitAttributes,
        object_to_world: &Mat4,
    ) -> Result<SurfaceHit> {
        let desc = self.geometry.resolve(attributes.instance_custom_index)?;
        let [v0, v1, v2] = self.geometry.triangle_vertices(&desc, attributes.primitive_id)?;
        let material = self
            .geometry
            .triangle_material(&desc, attributes.primitive_id)?;

        let b = attributes.barycentrics;
        let weights = Vec3::new(1.0 - b.x - b.y, b.x, b.y);
        let interpolate = |a: Vec3, b: Vec3, c: Vec3| a * weights.x + b * weights.y + c * weights.z;

        let position = interpolate(v0.position(), v1.position(), v2.position());
        let normal = interpolate(v0.normal(), v1.normal(), v2.normal());
        let world_position = object_to_world * Vec4::new(position.x, position.y, position.z, 1.0);
        let world_normal = nalgebra_glm::inverse_transpose(*object_to_world)
            * Vec4::new(normal.x, normal.y, normal.z, 0.0);
        let tex_coord =
            v0.tex_coord() * weights.x + v1.tex_coord() * weights.y + v2.tex_coord() * weights.z;

        Ok(SurfaceHit {
            position: world_position.xyz(),
            normal: nalgebra_glm::normalize(&world_normal.xyz()),
            color: interpolate(v0.color(), v1.color(), v2.color()),
            tex_coord,
            material,
            texture_slot: self.geometry.texture_slot(&desc, &material),
        })
    }

    /// Miss stage: the ray escaped, contribute the clear color and stop.
    pub fn miss(&self, payload: &mut HitPayload) {
        payload.set_hit_value(self.push.clear_color().xyz());
        payload.set_done(true);
    }

    /// Ray-generation driver for one primary ray.
    ///
    /// Each bounce adds `hit_value * attenuation`. Tracing ends once a stage leaves `done` set or
    /// `max_depth` bounces were traced; at least one ray is always traced.
    pub fn trace<T: RayTracer + ?Sized>(&self, tracer: &T, origin: Vec3, direction: Vec3) -> Vec3 {
        let mut payload = HitPayload::new(origin, direction);
        let mut accumulated = Vec3::zeros();
        loop {
            tracer.trace_ray(payload.ray_origin(), payload.ray_dir(), &mut payload);
            accumulated += payload.hit_value().component_mul(&payload.attenuation());

            payload.depth += 1;
            if payload.is_done() || payload.depth >= self.push.max_depth {
                break;
            }
            payload.set_done(true);
        }
        accumulated
    }

    /// Traces one primary ray per pixel center, row-major from the top-left.
    pub fn render<T: RayTracer + ?Sized>(
        &self,
        tracer: &T,
        uniforms: &GlobalUniforms,
        width: u32,
        height: u32,
    ) -> Vec<Vec3> {
        let mut colors = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let uv = Vec2::new(
                    (x as f32 + 0.5) / width as f32,
                    (y as f32 + 0.5) / height as f32,
                );
                let (origin, direction) = uniforms.primary_ray(uv);
                colors.push(self.trace(tracer, origin, direction));
            }
        }
        log::debug!("ray pass: traced {}x{} primary rays", width, height);
        colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::{
            push_constants::LightType,
            vertex::Vertex,
        },
        error::ResolveError,
        geometry::{
            SceneGeometry,
            SceneGeometryBuilder,
        },
    };
    use std::cell::Cell;

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
            color: [pos[0], pos[1], 1.0],
            tex_coord: [pos[0], pos[1]],
        });
        let materials = [1, 2].map(|illum| WaveFrontMaterial {
            illum,
            texture_id: 0,
            ..Default::default()
        });
        let mut builder = SceneGeometryBuilder::default();
        let textures = builder.add_textures(vec!["checker.png".into()]);
        builder
            .add_object(
                "quad",
                &vertices,
                &[[0, 1, 2], [0, 2, 3]],
                &materials,
                &[1, 0],
                textures,
            )
            .unwrap();
        builder.build()
    }

    fn push(max_depth: i32) -> PushConstantRay {
        PushConstantRay::new(
            Vec4::new(0.25, 0.5, 0.75, 1.0),
            Vec3::new(0.0, 5.0, 0.0),
            10.0,
            LightType::Infinite,
            max_depth,
        )
    }

    #[test]
    fn test_closest_hit_interpolates_through_the_descriptor() {
        let geometry = quad_scene();
        let pass = RayPass::new(&geometry, push(1));
        let hit = pass
            .closest_hit(
                &HitAttributes {
                    instance_custom_index: 0,
                    primitive_id: 1,
                    barycentrics: Vec2::new(0.5, 0.5),
                },
                &Mat4::identity(),
            )
            .unwrap();

        assert_eq!(hit.position, Vec3::new(0.5, 1.0, 0.0));
        assert_eq!(hit.normal, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(hit.tex_coord, Vec2::new(0.5, 1.0));
        // triangle 1 maps to material 0
        assert_eq!(hit.material.illum, 1);
        assert_eq!(hit.texture_slot, Some(0));
    }

    #[test]
    fn test_closest_hit_applies_object_to_world() {
        let geometry = quad_scene();
        let pass = RayPass::new(&geometry, push(1));
        let hit = pass
            .closest_hit(
                &HitAttributes {
                    instance_custom_index: 0,
                    primitive_id: 0,
                    barycentrics: Vec2::new(1.0, 0.0),
                },
                &nalgebra_glm::translation(&Vec3::new(0.0, 2.0, 0.0)),
            )
            .unwrap();
        assert_eq!(hit.position, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(hit.material.illum, 2);
    }

    #[test]
    fn test_closest_hit_with_bad_primitive() {
        let geometry = quad_scene();
        let pass = RayPass::new(&geometry, push(1));
        let result = pass.closest_hit(
            &HitAttributes {
                instance_custom_index: 0,
                primitive_id: 2,
                barycentrics: Vec2::zeros(),
            },
            &Mat4::identity(),
        );
        assert!(matches!(result, Err(ResolveError::ElementOutOfRange { index: 2, .. })));
    }

    #[test]
    fn test_miss_writes_clear_color() {
        let geometry = quad_scene();
        let pass = RayPass::new(&geometry, push(4));
        let color = pass.trace(
            &|_: Vec3, _: Vec3, payload: &mut HitPayload| pass.miss(payload),
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, -1.0),
        );
        assert_eq!(color, Vec3::new(0.25, 0.5, 0.75));
    }

    #[test]
    fn test_done_halts_further_tracing() {
        let geometry = quad_scene();
        let pass = RayPass::new(&geometry, push(8));
        let calls = Cell::new(0);
        let tracer = |_: Vec3, _: Vec3, payload: &mut HitPayload| {
            calls.set(calls.get() + 1);
            payload.set_hit_value(Vec3::new(0.1, 0.2, 0.3));
        };
        let color = pass.trace(&tracer, Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(calls.get(), 1);
        assert_eq!(color, Vec3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_bounces_stop_at_max_depth() {
        let geometry = quad_scene();
        let pass = RayPass::new(&geometry, push(3));
        let calls = Cell::new(0);
        let tracer = |origin: Vec3, direction: Vec3, payload: &mut HitPayload| {
            calls.set(calls.get() + 1);
            payload.set_hit_value(Vec3::new(1.0, 1.0, 1.0));
            payload.set_attenuation(payload.attenuation() * 0.5);
            payload.continue_with(origin + direction, direction);
        };
        let color = pass.trace(&tracer, Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));

        assert_eq!(calls.get(), 3);
        // 0.5 + 0.25 + 0.125
        assert_eq!(color, Vec3::new(0.875, 0.875, 0.875));
    }

    #[test]
    fn test_non_positive_max_depth_traces_once() {
        let geometry = quad_scene();
        let pass = RayPass::new(&geometry, push(0));
        let calls = Cell::new(0);
        let tracer = |origin: Vec3, direction: Vec3, payload: &mut HitPayload| {
            calls.set(calls.get() + 1);
            payload.continue_with(origin, direction);
        };
        pass.trace(&tracer, Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_render_traces_one_ray_per_pixel() {
        let geometry = quad_scene();
        let pass = RayPass::new(&geometry, push(1));
        let calls = Cell::new(0);
        let tracer = |_: Vec3, _: Vec3, payload: &mut HitPayload| {
            calls.set(calls.get() + 1);
            pass.miss(payload);
        };
        let colors = pass.render(&tracer, &GlobalUniforms::default(), 4, 3);
        assert_eq!(colors.len(), 12);
        assert_eq!(calls.get(), 12);
    }
}
