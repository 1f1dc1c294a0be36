use std::path::Path;

use anyhow::Context;

use crate::engine::managers::texture_manager::DecodedImage;

/// Turns an image file into RGBA8 pixels for the texture uploader.
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> anyhow::Result<DecodedImage>;
}

/// Decodes whatever the `image` crate was built to read (PNG here).
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageDecoder;

impl ImageDecoder for FileImageDecoder {
    fn decode(&self, path: &Path) -> anyhow::Result<DecodedImage> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading texture {}", path.display()))?;
        decode_bytes(&bytes).with_context(|| format!("decoding texture {}", path.display()))
    }
}

pub fn decode_bytes(bytes: &[u8]) -> anyhow::Result<DecodedImage> {
    let img = image::io::Reader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    log::debug!("Source image color type: {:?}", img.color());

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage { width, height, pixels: rgba.into_raw() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_into_rgba() {
        let mut png = Vec::new();
        let source = image::RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8 * 40, y as u8 * 90, 7]));
        image::DynamicImage::ImageRgb8(source)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .unwrap();

        let decoded = decode_bytes(&png).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert!(decoded.validate().is_ok());
        // Pixel (2, 1) is texel 5; alpha is filled in.
        assert_eq!(&decoded.pixels[20..24], &[80, 90, 7, 255]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = FileImageDecoder.decode(Path::new("/nonexistent/texture.png")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/texture.png"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode_bytes(b"definitely not an image").is_err());
    }
}
