use ash::vk;
use bytemuck::{
    Pod,
    Zeroable,
};
use nalgebra_glm::{
    Vec2,
    Vec3,
};
use std::mem::offset_of;

/// Per-vertex attributes, tightly packed (44 bytes) to match the shaders' scalar layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub nrm: [f32; 3],
    pub color: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    pub fn new(pos: Vec3, nrm: Vec3, color: Vec3, tex_coord: Vec2) -> Self {
        Self {
            pos: pos.into(),
            nrm: nrm.into(),
            color: color.into(),
            tex_coord: tex_coord.into(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from(self.pos)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from(self.nrm)
    }

    pub fn color(&self) -> Vec3 {
        Vec3::from(self.color)
    }

    pub fn tex_coord(&self) -> Vec2 {
        Vec2::from(self.tex_coord)
    }

    pub fn get_binding_descriptions() -> Vec<vk::VertexInputBindingDescription> {
        vec![vk::VertexInputBindingDescription::default()
            .binding(0)
            .stride(std::mem::size_of::<Vertex>() as u32)
            .input_rate(vk::VertexInputRate::VERTEX)]
    }

    pub fn get_attribute_descriptions() -> Vec<vk::VertexInputAttributeDescription> {
        vec![
            // pos
            vk::VertexInputAttributeDescription::default()
                .binding(0)
                .location(0)
                .format(vk::Format::R32G32B32_SFLOAT)
                .offset(offset_of!(Vertex, pos) as u32),
            // nrm
            vk::VertexInputAttributeDescription::default()
                .binding(0)
                .location(1)
                .format(vk::Format::R32G32B32_SFLOAT)
                .offset(offset_of!(Vertex, nrm) as u32),
            // color
            vk::VertexInputAttributeDescription::default()
                .binding(0)
                .location(2)
                .format(vk::Format::R32G32B32_SFLOAT)
                .offset(offset_of!(Vertex, color) as u32),
            // tex_coord
            vk::VertexInputAttributeDescription::default()
                .binding(0)
                .location(3)
                .format(vk::Format::R32G32_SFLOAT)
                .offset(offset_of!(Vertex, tex_coord) as u32),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 44);
        assert_eq!(offset_of!(Vertex, pos), 0);
        assert_eq!(offset_of!(Vertex, nrm), 12);
        assert_eq!(offset_of!(Vertex, color), 24);
        assert_eq!(offset_of!(Vertex, tex_coord), 36);
    }

    #[test]
    fn test_attribute_descriptions_follow_field_order() {
        let attributes = Vertex::get_attribute_descriptions();
        let offsets = attributes.iter().map(|a| a.offset).collect::<Vec<_>>();
        assert_eq!(offsets, vec![0, 12, 24, 36]);
        assert_eq!(attributes[3].format, vk::Format::R32G32_SFLOAT);
        assert_eq!(Vertex::get_binding_descriptions()[0].stride, 44);
    }
}
