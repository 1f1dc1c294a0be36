use log::info;

use crate::engine::error::RenderError;
use crate::engine::rendering::device::GraphicsDevice;

/// Tightly packed RGBA8 pixels, rows top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Checks that `pixels` holds exactly `width * height` RGBA texels.
    pub fn validate(&self) -> Result<(), RenderError> {
        validate_rgba(self.width, self.height, &self.pixels)
    }
}

fn validate_rgba(width: u32, height: u32, pixels: &[u8]) -> Result<(), RenderError> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|texels| texels.checked_mul(4));
    let fits_gl = i32::try_from(width).is_ok() && i32::try_from(height).is_ok();

    match expected {
        Some(len) if width > 0 && height > 0 && fits_gl && len == pixels.len() => Ok(()),
        _ => Err(RenderError::InvalidTexture { width, height, len: pixels.len() }),
    }
}

/// Creates a 2D texture from RGBA8 pixels.
///
/// Sampling is always nearest with clamp-to-edge and there are no mipmaps.
/// The buffer is validated before any GL object is created.
pub fn upload_texture<G: GraphicsDevice>(
    gpu: &G,
    width: u32,
    height: u32,
    pixels: &[u8]
) -> Result<G::Texture, RenderError> {
    validate_rgba(width, height, pixels)?;

    let texture = gpu.create_texture().map_err(|detail| RenderError::GraphicsApi {
        operation: "create texture",
        detail,
    })?;
    gpu.bind_texture(glow::TEXTURE_2D, Some(texture));
    gpu.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
    gpu.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
    gpu.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
    gpu.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
    gpu.tex_image_2d_rgba8(glow::TEXTURE_2D, width as i32, height as i32, pixels);
    gpu.bind_texture(glow::TEXTURE_2D, None);

    info!("Uploaded {}x{} texture", width, height);
    Ok(texture)
}

/// Square greyscale-ish noise, identical for identical seeds.
pub fn noise_image(size: u32, seed: u64) -> DecodedImage {
    let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        // splitmix64
        state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    };

    let texels = (size as usize) * (size as usize);
    let mut pixels = Vec::with_capacity(texels * 4);
    for _ in 0..texels {
        let bits = next();
        let level = (bits & 0xFF) as u8;
        let tint = ((bits >> 8) & 0x1F) as u8;
        pixels.extend_from_slice(&[
            level.saturating_add(tint),
            level,
            level.saturating_sub(tint),
            u8::MAX,
        ]);
    }

    DecodedImage { width: size, height: size, pixels }
}
