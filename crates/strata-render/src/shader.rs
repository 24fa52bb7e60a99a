pub mod glsl;
