pub mod arena;
pub mod common;
pub mod config;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod resolver;
pub mod shader;
