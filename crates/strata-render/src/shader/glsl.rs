use crate::common::{
    camera::GlobalUniforms,
    material::WaveFrontMaterial,
    object::ObjDesc,
    payload::HitPayload,
    push_constants::{
        PushConstantRaster,
        PushConstantRay,
    },
    vertex::Vertex,
};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlslType {
    Int,
    Uint,
    Float,
    Uint64,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
}

impl GlslType {
    pub fn name(self) -> &'static str {
        match self {
            GlslType::Int => "int",
            GlslType::Uint => "uint",
            GlslType::Float => "float",
            GlslType::Uint64 => "uint64_t",
            GlslType::Vec2 => "vec2",
            GlslType::Vec3 => "vec3",
            GlslType::Vec4 => "vec4",
            GlslType::Mat4 => "mat4",
        }
    }

    pub fn size(self) -> u32 {
        match self {
            GlslType::Int | GlslType::Uint | GlslType::Float => 4,
            GlslType::Uint64 | GlslType::Vec2 => 8,
            GlslType::Vec3 => 12,
            GlslType::Vec4 => 16,
            GlslType::Mat4 => 64,
        }
    }

    /// Alignment under scalar block layout: the size of the component type.
    pub fn scalar_alignment(self) -> u32 {
        match self {
            GlslType::Uint64 => 8,
            _ => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlslField {
    pub ty: GlslType,
    pub name: &'static str,
}

const fn field(ty: GlslType, name: &'static str) -> GlslField {
    GlslField { ty, name }
}

/// A host record with a GLSL struct counterpart, fields in declaration order.
pub trait GlslStruct {
    const NAME: &'static str;
    const FIELDS: &'static [GlslField];
}

fn align_up(offset: u32, alignment: u32) -> u32 {
    offset.div_ceil(alignment) * alignment
}

/// Byte offset of every field under scalar block layout.
pub fn scalar_layout_offsets(fields: &[GlslField]) -> Vec<u32> {
    let mut offset = 0;
    fields
        .iter()
        .map(|f| {
            let field_offset = align_up(offset, f.ty.scalar_alignment());
            offset = field_offset + f.ty.size();
            field_offset
        })
        .collect()
}

pub fn scalar_layout_size(fields: &[GlslField]) -> u32 {
    let alignment = fields
        .iter()
        .map(|f| f.ty.scalar_alignment())
        .max()
        .unwrap_or(1);
    let end = fields
        .iter()
        .zip(scalar_layout_offsets(fields))
        .map(|(f, offset)| offset + f.ty.size())
        .last()
        .unwrap_or(0);
    align_up(end, alignment)
}

pub fn declaration<T: GlslStruct>() -> String {
    let mut out = format!("struct {}\n{{\n", T::NAME);
    for f in T::FIELDS {
        let _ = writeln!(out, "  {} {};", f.ty.name(), f.name);
    }
    out.push_str("};\n");
    out
}

/// Buffer-reference blocks an `ObjDesc` address is cast to.
const BUFFER_REFERENCES: &str = "\
layout(buffer_reference, scalar) buffer Vertices { Vertex v[]; };
layout(buffer_reference, scalar) buffer Indices { uvec3 i[]; };
layout(buffer_reference, scalar) buffer Materials { WaveFrontMaterial m[]; };
layout(buffer_reference, scalar) buffer MatIndices { int i[]; };
";

/// Complete shared header: extensions, light-type constants, every record, buffer references.
pub fn shared_header() -> String {
    let mut out = String::from(
        "#extension GL_EXT_shader_explicit_arithmetic_types_int64 : require\n\
         #extension GL_EXT_scalar_block_layout : enable\n\
         #extension GL_EXT_buffer_reference2 : require\n\n\
         #define LIGHT_TYPE_POINT 0\n\
         #define LIGHT_TYPE_INFINITE 1\n\n",
    );
    for decl in [
        declaration::<ObjDesc>(),
        declaration::<Vertex>(),
        declaration::<WaveFrontMaterial>(),
        declaration::<GlobalUniforms>(),
        declaration::<PushConstantRaster>(),
        declaration::<PushConstantRay>(),
        declaration::<HitPayload>(),
    ] {
        out.push_str(&decl);
        out.push('\n');
    }
    out.push_str(BUFFER_REFERENCES);
    out
}

impl GlslStruct for ObjDesc {
    const NAME: &'static str = "ObjDesc";
    const FIELDS: &'static [GlslField] = &[
        field(GlslType::Int, "txtOffset"),
        field(GlslType::Uint64, "vertexAddress"),
        field(GlslType::Uint64, "indexAddress"),
        field(GlslType::Uint64, "materialAddress"),
        field(GlslType::Uint64, "materialIndexAddress"),
    ];
}

impl GlslStruct for Vertex {
    const NAME: &'static str = "Vertex";
    const FIELDS: &'static [GlslField] = &[
        field(GlslType::Vec3, "pos"),
        field(GlslType::Vec3, "nrm"),
        field(GlslType::Vec3, "color"),
        field(GlslType::Vec2, "texCoord"),
    ];
}

impl GlslStruct for WaveFrontMaterial {
    const NAME: &'static str = "WaveFrontMaterial";
    const FIELDS: &'static [GlslField] = &[
        field(GlslType::Vec3, "ambient"),
        field(GlslType::Vec3, "diffuse"),
        field(GlslType::Vec3, "specular"),
        field(GlslType::Vec3, "transmittance"),
        field(GlslType::Vec3, "emission"),
        field(GlslType::Float, "shininess"),
        field(GlslType::Float, "ior"),
        field(GlslType::Float, "dissolve"),
        field(GlslType::Int, "illum"),
        field(GlslType::Int, "textureId"),
    ];
}

impl GlslStruct for GlobalUniforms {
    const NAME: &'static str = "GlobalUniforms";
    const FIELDS: &'static [GlslField] = &[
        field(GlslType::Mat4, "viewProj"),
        field(GlslType::Mat4, "viewInverse"),
        field(GlslType::Mat4, "projInverse"),
    ];
}

impl GlslStruct for PushConstantRaster {
    const NAME: &'static str = "PushConstantRaster";
    const FIELDS: &'static [GlslField] = &[
        field(GlslType::Mat4, "modelMatrix"),
        field(GlslType::Vec3, "lightPosition"),
        field(GlslType::Uint, "objIndex"),
        field(GlslType::Float, "lightIntensity"),
        field(GlslType::Int, "lightType"),
    ];
}

impl GlslStruct for PushConstantRay {
    const NAME: &'static str = "PushConstantRay";
    const FIELDS: &'static [GlslField] = &[
        field(GlslType::Vec4, "clearColor"),
        field(GlslType::Vec3, "lightPosition"),
        field(GlslType::Float, "lightIntensity"),
        field(GlslType::Int, "lightType"),
        field(GlslType::Int, "maxDepth"),
    ];
}

impl GlslStruct for HitPayload {
    const NAME: &'static str = "hitPayload";
    const FIELDS: &'static [GlslField] = &[
        field(GlslType::Vec3, "hitValue"),
        field(GlslType::Int, "depth"),
        field(GlslType::Vec3, "attenuation"),
        field(GlslType::Int, "done"),
        field(GlslType::Vec3, "rayOrigin"),
        field(GlslType::Vec3, "rayDir"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{
        offset_of,
        size_of,
    };

    fn assert_matches_rust_layout<T: GlslStruct>() {
        assert_eq!(
            scalar_layout_size(T::FIELDS) as usize,
            size_of::<T>(),
            "{}",
            T::NAME
        );
    }

    #[test]
    fn test_scalar_size_matches_every_record() {
        assert_matches_rust_layout::<ObjDesc>();
        assert_matches_rust_layout::<Vertex>();
        assert_matches_rust_layout::<WaveFrontMaterial>();
        assert_matches_rust_layout::<GlobalUniforms>();
        assert_matches_rust_layout::<PushConstantRaster>();
        assert_matches_rust_layout::<PushConstantRay>();
        assert_matches_rust_layout::<HitPayload>();
    }

    #[test]
    fn test_obj_desc_addresses_are_eight_byte_aligned() {
        let offsets = scalar_layout_offsets(ObjDesc::FIELDS);
        assert_eq!(offsets, vec![0, 8, 16, 24, 32]);
        assert_eq!(offsets[1] as usize, offset_of!(ObjDesc, vertex_address));
        assert_eq!(offsets[4] as usize, offset_of!(ObjDesc, material_index_address));
    }

    #[test]
    fn test_declaration() {
        assert_eq!(
            declaration::<Vertex>(),
            "struct Vertex\n{\n  vec3 pos;\n  vec3 nrm;\n  vec3 color;\n  vec2 texCoord;\n};\n"
        );
    }

    #[test]
    fn test_shared_header() {
        let header = shared_header();
        assert!(header.starts_with("#extension GL_EXT_shader_explicit_arithmetic_types_int64"));
        assert!(header.contains("  uint64_t materialIndexAddress;\n"));
        assert!(header.contains("struct hitPayload\n"));
        assert!(header.contains("buffer MatIndices { int i[]; };"));
    }
}
