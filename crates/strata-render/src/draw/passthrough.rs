use anyhow::{
    ensure,
    Context,
    Result,
};
use image::{
    codecs::png::{
        CompressionType,
        FilterType,
        PngEncoder,
    },
    ImageEncoder,
};
use nalgebra_glm::{
    Vec3,
    Vec4,
};
use std::{
    fs::File,
    io::BufWriter,
    path::Path,
};

/// Fragment stage: writes the already-shaded color with opaque alpha.
pub fn resolve(frag_color: Vec3) -> Vec4 {
    Vec4::new(frag_color.x, frag_color.y, frag_color.z, 1.0)
}

/// Resolved color attachment, row-major from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTarget {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec4>,
}

pub fn resolve_target(width: u32, height: u32, frag_colors: &[Vec3]) -> Result<ColorTarget> {
    ensure!(
        frag_colors.len() == width as usize * height as usize,
        "{} fragment colors for a {}x{} target",
        frag_colors.len(),
        width,
        height
    );
    Ok(ColorTarget {
        width,
        height,
        pixels: frag_colors.iter().copied().map(resolve).collect(),
    })
}

impl ColorTarget {
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Quantizes to 8-bit RGBA, clamping each channel to `[0, 1]`.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| [p.x, p.y, p.z, p.w])
            .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
        let encoder = PngEncoder::new_with_quality(
            BufWriter::new(file),
            CompressionType::Fast,
            FilterType::NoFilter,
        );
        encoder.write_image(
            &self.to_rgba8(),
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;
        log::info!("Saved {}x{} target to {:?}", self.width, self.height, path);
        Ok(())
    }
}
