pub mod passthrough;
pub mod raster;
pub mod raytracing;
