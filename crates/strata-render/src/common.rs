pub mod buffer;
pub mod camera;
pub mod device_geometry;
pub mod material;
pub mod memory;
pub mod object;
pub mod payload;
pub mod push_constants;
pub mod vertex;
