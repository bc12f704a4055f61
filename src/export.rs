//! Raster export
//!
//! A render into a [`Bitmap`] is handed to an `image` encoder. Formats that are
//! recognised but not implemented are rejected with `UnsupportedFormat` so
//! callers never get a silently substituted format.

use std::fmt;
use std::path::Path;

use image::ImageEncoder;
use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use log::info;

use crate::canvas::Bitmap;
use crate::constants::JPEG_QUALITY;
use crate::{PlotError, PlotResult};

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
    /// Vector output, recognised but not implemented
    Svg,
    /// Recognised but not implemented
    Webp,
}

impl ImageFormat {
    /// Parse a file extension, case-insensitively and with or without the dot
    pub fn from_extension(extension: &str) -> PlotResult<Self> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        match extension.as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "bmp" => Ok(Self::Bmp),
            "svg" => Ok(Self::Svg),
            "webp" => Ok(Self::Webp),
            _ => Err(PlotError::unsupported_format(extension)),
        }
    }

    /// Format implied by a file path's extension
    pub fn from_path(path: impl AsRef<Path>) -> PlotResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| PlotError::unsupported_format(path.display().to_string()))?;
        Self::from_extension(extension)
    }

    /// Whether an encoder exists for this format
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Png | Self::Jpeg | Self::Bmp)
    }

    /// Fail with `UnsupportedFormat` unless an encoder exists
    pub fn ensure_supported(&self) -> PlotResult<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(PlotError::unsupported_format(self.to_string()))
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Bmp => "bmp",
            Self::Svg => "svg",
            Self::Webp => "webp",
        };
        f.write_str(name)
    }
}

/// Encode a bitmap into the bytes of an image file
pub fn encode(bitmap: &Bitmap, format: ImageFormat) -> PlotResult<Vec<u8>> {
    format.ensure_supported()?;

    let data = bitmap.to_rgb_bytes();
    let (width, height) = (bitmap.width(), bitmap.height());
    let mut out = Vec::new();

    let result = match format {
        ImageFormat::Png => {
            PngEncoder::new(&mut out).write_image(&data, width, height, image::ColorType::Rgb8)
        }
        ImageFormat::Jpeg => JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).write_image(
            &data,
            width,
            height,
            image::ColorType::Rgb8,
        ),
        ImageFormat::Bmp => {
            BmpEncoder::new(&mut out).write_image(&data, width, height, image::ColorType::Rgb8)
        }
        ImageFormat::Svg | ImageFormat::Webp => {
            return Err(PlotError::unsupported_format(format.to_string()));
        }
    };
    result.map_err(|e| PlotError::Export {
        reason: format!("{format} encode failed: {e}"),
    })?;

    Ok(out)
}

/// Encode a bitmap and write it to `path`
pub fn save(bitmap: &Bitmap, path: impl AsRef<Path>, format: ImageFormat) -> PlotResult<()> {
    let path = path.as_ref();
    let bytes = encode(bitmap, format)?;
    std::fs::write(path, &bytes).map_err(|e| PlotError::Export {
        reason: format!("writing {}: {e}", path.display()),
    })?;

    info!(
        "Saved {}x{} {format} ({} bytes) to {}",
        bitmap.width(),
        bitmap.height(),
        bytes.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_parse_case_insensitively() {
        assert_eq!(ImageFormat::from_extension("PNG").unwrap(), ImageFormat::Png);
        assert_eq!(ImageFormat::from_extension(".jpg").unwrap(), ImageFormat::Jpeg);
        assert_eq!(
            ImageFormat::from_path("out/chart.webp").unwrap(),
            ImageFormat::Webp
        );
        assert!(matches!(
            ImageFormat::from_extension("tiff"),
            Err(PlotError::UnsupportedFormat { .. })
        ));
        assert!(ImageFormat::from_path("no_extension").is_err());
    }

    #[test]
    fn png_has_signature() {
        let bitmap = Bitmap::new(3, 2).unwrap();
        let bytes = encode(&bitmap, ImageFormat::Png).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn bmp_and_jpeg_encode() {
        let bitmap = Bitmap::new(4, 4).unwrap();
        assert_eq!(&encode(&bitmap, ImageFormat::Bmp).unwrap()[..2], b"BM");
        assert_eq!(
            &encode(&bitmap, ImageFormat::Jpeg).unwrap()[..2],
            &[0xff, 0xd8]
        );
    }

    #[test]
    fn vector_formats_are_rejected() {
        let bitmap = Bitmap::new(1, 1).unwrap();
        for format in [ImageFormat::Svg, ImageFormat::Webp] {
            assert!(matches!(
                encode(&bitmap, format),
                Err(PlotError::UnsupportedFormat { .. })
            ));
        }
    }
}
