pub mod gltf;
pub mod mesh;
pub mod model;
pub mod scene;
pub mod transform;
