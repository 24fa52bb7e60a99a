use super::{
    buffer::DeviceBuffer,
    object::ObjDesc,
};
use crate::{
    arena::{
        BufferArena,
        BufferHandle,
        BufferView,
    },
    resolver::DescriptorTable,
};
use anyhow::{
    ensure,
    Result,
};
use ash::vk;
use std::collections::HashMap;

fn view_address<T, F>(view: BufferView<T>, address_of: &mut F) -> Result<vk::DeviceAddress>
where
    F: FnMut(BufferHandle) -> vk::DeviceAddress,
{
    if view.is_empty() {
        return Ok(0);
    }
    // shaders index every array with the dense scalar stride
    ensure!(
        view.stride() as usize == std::mem::size_of::<T>(),
        "{:?} has stride {}, the device reads {}-byte elements",
        view,
        view.stride(),
        std::mem::size_of::<T>()
    );
    Ok(address_of(view.handle()))
}

/// Converts the host descriptor table into the `ObjDesc` array shaders index by object.
///
/// Views without elements become address `0`. Strided views are rejected since an address
/// alone cannot carry the stride.
pub fn pack_obj_descs<F>(table: &DescriptorTable, mut address_of: F) -> Result<Vec<ObjDesc>>
where
    F: FnMut(BufferHandle) -> vk::DeviceAddress,
{
    table
        .iter()
        .map(|desc| {
            Ok(ObjDesc::new(
                desc.texture_offset,
                view_address(desc.vertices, &mut address_of)?,
                view_address(desc.indices, &mut address_of)?,
                view_address(desc.materials, &mut address_of)?,
                view_address(desc.material_indices, &mut address_of)?,
            ))
        })
        .collect()
}

/// Scene arrays resident on the device plus the `ObjDesc` table pointing into them.
pub struct DeviceGeometry {
    buffers: HashMap<BufferHandle, DeviceBuffer>,
    obj_desc_buffer: Option<DeviceBuffer>,
}

impl DeviceGeometry {
    pub fn upload(
        arena: &BufferArena,
        table: &DescriptorTable,
        physical_device: vk::PhysicalDevice,
        device: &ash::Device,
        instance: &ash::Instance,
    ) -> Result<Self> {
        let usage = vk::BufferUsageFlags::STORAGE_BUFFER
            | vk::BufferUsageFlags::VERTEX_BUFFER
            | vk::BufferUsageFlags::INDEX_BUFFER;

        let mut buffers = HashMap::new();
        for (handle, label, bytes) in arena.buffers() {
            if bytes.is_empty() {
                continue;
            }
            let buffer =
                DeviceBuffer::new_with_data(bytes, usage, physical_device, device, instance)?;
            log::debug!(
                "uploaded '{}' ({} bytes) at {:#x}",
                label,
                bytes.len(),
                buffer.device_address()
            );
            buffers.insert(handle, buffer);
        }

        let obj_descs = pack_obj_descs(table, |handle| {
            buffers
                .get(&handle)
                .map(DeviceBuffer::device_address)
                .unwrap_or(0)
        })?;
        let obj_desc_buffer = if obj_descs.is_empty() {
            None
        } else {
            Some(DeviceBuffer::new_with_data(
                bytemuck::cast_slice(&obj_descs),
                vk::BufferUsageFlags::STORAGE_BUFFER,
                physical_device,
                device,
                instance,
            )?)
        };
        log::info!(
            "Uploaded {} buffers, {} object descriptors",
            buffers.len(),
            obj_descs.len()
        );

        Ok(Self {
            buffers,
            obj_desc_buffer,
        })
    }

    /// Address of the `ObjDesc` array, `0` for an empty scene.
    pub fn obj_desc_address(&self) -> vk::DeviceAddress {
        self.obj_desc_buffer
            .as_ref()
            .map(DeviceBuffer::device_address)
            .unwrap_or(0)
    }

    pub fn buffer(&self, handle: BufferHandle) -> Option<&DeviceBuffer> {
        self.buffers.get(&handle)
    }
}
