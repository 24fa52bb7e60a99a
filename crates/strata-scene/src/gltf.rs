#[allow(clippy::module_inception)]
mod gltf;

pub use self::gltf::GltfAdapter;
