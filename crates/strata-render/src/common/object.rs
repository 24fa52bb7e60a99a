use ash::vk;
use bytemuck::{
    Pod,
    Zeroable,
};

/// Index of an object's first texture in the global texture array.
///
/// Any negative value means the object has no texture bound; it is never used as an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureOffset(pub i32);

impl TextureOffset {
    pub const NONE: TextureOffset = TextureOffset(-1);

    pub fn new(offset: u32) -> Self {
        Self(offset as i32)
    }

    pub fn get(self) -> Option<u32> {
        u32::try_from(self.0).ok()
    }

    /// Global texture slot for an object-local texture id.
    pub fn slot(self, texture_id: Option<u32>) -> Option<u32> {
        Some(self.get()? + texture_id?)
    }
}

impl Default for TextureOffset {
    fn default() -> Self {
        Self::NONE
    }
}

/// Device form of an object descriptor, as read through the descriptor table address.
///
/// Addresses are buffer device addresses; `0` marks an absent buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct ObjDesc {
    pub txt_offset: i32,
    _padding: u32,
    pub vertex_address: vk::DeviceAddress,
    pub index_address: vk::DeviceAddress,
    pub material_address: vk::DeviceAddress,
    pub material_index_address: vk::DeviceAddress,
}

impl ObjDesc {
    pub fn new(
        texture_offset: TextureOffset,
        vertex_address: vk::DeviceAddress,
        index_address: vk::DeviceAddress,
        material_address: vk::DeviceAddress,
        material_index_address: vk::DeviceAddress,
    ) -> Self {
        Self {
            txt_offset: texture_offset.0,
            _padding: 0,
            vertex_address,
            index_address,
            material_address,
            material_index_address,
        }
    }

    pub fn texture_offset(&self) -> TextureOffset {
        TextureOffset(self.txt_offset)
    }
}
