use super::memory::find_memory_type;
use anyhow::{
    ensure,
    Result,
};
use ash::vk;

fn flush_mapped_memory(device: &ash::Device, device_memory: vk::DeviceMemory) -> Result<()> {
    let mapped_range = [vk::MappedMemoryRange::default()
        .memory(device_memory)
        .size(vk::WHOLE_SIZE)];
    unsafe {
        device.flush_mapped_memory_ranges(&mapped_range)?;
    }
    Ok(())
}

/// Host-visible buffer filled once at creation, addressable from shaders.
pub struct DeviceBuffer {
    buffer: vk::Buffer,
    device: ash::Device,
    device_memory: vk::DeviceMemory,
    size: vk::DeviceSize,
    device_address: vk::DeviceAddress,
}

impl DeviceBuffer {
    pub fn new_with_data(
        data: &[u8],
        usage_flags: vk::BufferUsageFlags,
        physical_device: vk::PhysicalDevice,
        device: &ash::Device,
        instance: &ash::Instance,
    ) -> Result<Self> {
        ensure!(!data.is_empty(), "Device buffers cannot be empty");
        let size = data.len() as vk::DeviceSize;
        let usage_flags = usage_flags | vk::BufferUsageFlags::SHADER_DEVICE_ADDRESS;
        let memory_property_flags = vk::MemoryPropertyFlags::HOST_VISIBLE;

        let create_info = vk::BufferCreateInfo::default()
            .size(size)
            .usage(usage_flags)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);
        let buffer = unsafe { device.create_buffer(&create_info, None)? };

        let mem_requirements = unsafe { device.get_buffer_memory_requirements(buffer) };
        let memory_type = match find_memory_type(
            mem_requirements.memory_type_bits,
            memory_property_flags,
            physical_device,
            instance,
        ) {
            Ok(memory_type) => memory_type,
            Err(err) => {
                unsafe { device.destroy_buffer(buffer, None) };
                return Err(err);
            }
        };
        let is_coherent = unsafe { instance.get_physical_device_memory_properties(physical_device) }
            .memory_types[memory_type as usize]
            .property_flags
            .contains(vk::MemoryPropertyFlags::HOST_COHERENT);

        let mut alloc_flags_info =
            vk::MemoryAllocateFlagsInfo::default().flags(vk::MemoryAllocateFlags::DEVICE_ADDRESS);
        let alloc_info = vk::MemoryAllocateInfo::default()
            .allocation_size(mem_requirements.size)
            .memory_type_index(memory_type)
            .push_next(&mut alloc_flags_info);
        let device_memory = match unsafe { device.allocate_memory(&alloc_info, None) } {
            Ok(device_memory) => device_memory,
            Err(err) => {
                unsafe { device.destroy_buffer(buffer, None) };
                return Err(err.into());
            }
        };

        // from here on Drop releases both handles
        let mut device_buffer = Self {
            buffer,
            device: device.clone(),
            device_memory,
            size,
            device_address: 0,
        };

        unsafe {
            device.bind_buffer_memory(buffer, device_memory, 0)?;
            let mapped_memory =
                device.map_memory(device_memory, 0, size, vk::MemoryMapFlags::empty())?;
            std::ptr::copy_nonoverlapping(data.as_ptr(), mapped_memory.cast::<u8>(), data.len());
            if !is_coherent {
                flush_mapped_memory(device, device_memory)?;
            }
            device.unmap_memory(device_memory);
        }

        let address_info = vk::BufferDeviceAddressInfo::default().buffer(buffer);
        device_buffer.device_address = unsafe { device.get_buffer_device_address(&address_info) };
        Ok(device_buffer)
    }

    pub fn vk_buffer(&self) -> vk::Buffer {
        self.buffer
    }

    pub fn size(&self) -> vk::DeviceSize {
        self.size
    }

    pub fn device_address(&self) -> vk::DeviceAddress {
        self.device_address
    }
}

impl Drop for DeviceBuffer {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_buffer(self.buffer, None);
            self.device.free_memory(self.device_memory, None);
        }
    }
}
