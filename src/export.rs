//! Encoding annotated images for export

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, RgbaImage};

use crate::config::ExportFormat;

/// Default export quality
pub const DEFAULT_QUALITY: f32 = 0.95;

/// Encode `img` in `format`
///
/// `quality` (clamped to `0.0..=1.0`) only affects JPEG; PNG and WebP are
/// written losslessly. JPEG drops the alpha channel.
pub fn encode_image(img: &RgbaImage, format: ExportFormat, quality: f32) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    match format {
        ExportFormat::Png => img
            .write_with_encoder(PngEncoder::new(&mut buffer))
            .context("failed to encode PNG image")?,
        ExportFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            let quality = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))
                .context("failed to encode JPEG image")?
        }
        ExportFormat::Webp => img
            .write_with_encoder(WebPEncoder::new_lossless(&mut buffer))
            .context("failed to encode WebP image")?,
    }
    log::debug!(
        "Encoded {}x{} image as {} ({} bytes)",
        img.width(),
        img.height(),
        format.mime_type(),
        buffer.get_ref().len()
    );
    Ok(buffer.into_inner())
}

/// Timestamped file name such as `annotated-20240101-120000.png`
pub fn default_filename(format: ExportFormat) -> String {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    format!("annotated-{stamp}.{}", format.extension())
}

/// Resolve a download target; directories get a default file name
pub fn resolve_target(target: &Path, format: ExportFormat) -> PathBuf {
    if target.is_dir() {
        target.join(default_filename(format))
    } else {
        target.to_path_buf()
    }
}

/// Write already-encoded bytes to `target`, returning the written path
pub fn write_encoded(target: &Path, format: ExportFormat, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    let path = resolve_target(target, format);
    std::fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("Saved image to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        RgbaImage::from_pixel(16, 8, Rgba([10, 200, 30, 255]))
    }

    #[test]
    fn test_png_round_trip_is_lossless() {
        let bytes = encode_image(&sample(), ExportFormat::Png, DEFAULT_QUALITY).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_jpeg_and_webp_signatures() {
        let jpeg = encode_image(&sample(), ExportFormat::Jpeg, 0.5).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        let webp = encode_image(&sample(), ExportFormat::Webp, 2.0).unwrap();
        assert_eq!(&webp[8..12], b"WEBP");
    }

    #[test]
    fn test_default_filename_extension() {
        assert!(default_filename(ExportFormat::Jpeg).ends_with(".jpg"));
        assert!(default_filename(ExportFormat::Png).starts_with("annotated-"));
    }

    #[test]
    fn test_write_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_encoded(dir.path(), ExportFormat::Png, b"data").unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(std::fs::read(&path).unwrap(), b"data");
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.png");
        let err = write_encoded(&target, ExportFormat::Png, b"data").unwrap_err();
        assert!(err.to_string().starts_with("failed to write"));
    }
}
