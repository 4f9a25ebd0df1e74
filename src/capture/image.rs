//! Screenshot image type for captured pages

use image::RgbaImage;

use crate::config::ExportFormat;
use crate::export;
use crate::surface::ImageSurface;

/// A captured screenshot
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenshotImage {
    pub rgba: RgbaImage,
}

impl ScreenshotImage {
    pub fn new(rgba: RgbaImage) -> Self {
        log::debug!(
            "ScreenshotImage captured: {}x{} pixels",
            rgba.width(),
            rgba.height()
        );
        Self { rgba }
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    pub fn encode_png(&self) -> anyhow::Result<Vec<u8>> {
        export::encode_image(&self.rgba, ExportFormat::Png, export::DEFAULT_QUALITY)
    }

    /// Surface for annotating this capture
    pub fn into_surface(self) -> ImageSurface {
        ImageSurface::new(self.rgba)
    }
}
