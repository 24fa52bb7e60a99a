use anyhow::{
    bail,
    Result,
};
use ash::vk;

/// First memory type allowed by `type_filter` that has every `required_properties` flag.
pub fn select_memory_type(
    mem_props: &vk::PhysicalDeviceMemoryProperties,
    type_filter: u32,
    required_properties: vk::MemoryPropertyFlags,
) -> Result<u32> {
    let memory_types = &mem_props.memory_types[..mem_props.memory_type_count as usize];
    for (type_i, mem_type) in memory_types.iter().enumerate() {
        if type_filter & (1 << type_i) != 0 && mem_type.property_flags.contains(required_properties)
        {
            return Ok(type_i as u32);
        }
    }
    bail!(
        "failed to find suitable memory type! type_filter: {:?}, properties: {:?}",
        type_filter,
        required_properties
    );
}

pub fn find_memory_type(
    type_filter: u32,
    required_properties: vk::MemoryPropertyFlags,
    physical_device: vk::PhysicalDevice,
    instance: &ash::Instance,
) -> Result<u32> {
    let mem_props = unsafe { instance.get_physical_device_memory_properties(physical_device) };
    select_memory_type(&mem_props, type_filter, required_properties)
}
