//! Raster surface the annotation tool draws on

use image::{RgbaImage, imageops};

use crate::config::ExportFormat;
use crate::domain::Rect;
use crate::export;

/// Pixel-addressable drawing target
///
/// The surface keeps the last externally supplied base image (a screenshot,
/// with no annotations) next to the working canvas that annotations are
/// rendered into.
pub trait RasterSurface {
    /// Last base image supplied from outside
    fn base_image(&self) -> &RgbaImage;

    /// Current working pixels
    fn canvas(&self) -> &RgbaImage;

    fn canvas_mut(&mut self) -> &mut RgbaImage;

    /// Reset the canvas to the base image
    fn restore_base(&mut self) {
        let base = self.base_image().clone();
        *self.canvas_mut() = base;
    }

    /// Copy of the canvas pixels under `rect`, clamped to the canvas
    fn pixel_block(&self, rect: Rect) -> Option<RgbaImage> {
        read_block(self.canvas(), rect)
    }

    /// Write `block` with its top-left at the top-left of `rect`
    fn write_block(&mut self, rect: Rect, block: &RgbaImage) {
        write_block(self.canvas_mut(), rect, block);
    }

    /// Encode the canvas
    fn encode(&self, format: ExportFormat, quality: f32) -> anyhow::Result<Vec<u8>> {
        export::encode_image(self.canvas(), format, quality)
    }
}

/// Part of `rect` that lies on `img`
pub fn clamp_rect(img: &RgbaImage, rect: Rect) -> Option<Rect> {
    rect.intersect(Rect::new(0, 0, img.width() as i32, img.height() as i32))
}

/// Copy of the pixels under `rect`, clamped to the image
pub fn read_block(img: &RgbaImage, rect: Rect) -> Option<RgbaImage> {
    let area = clamp_rect(img, rect)?;
    let block = imageops::crop_imm(
        img,
        area.left as u32,
        area.top as u32,
        area.width() as u32,
        area.height() as u32,
    );
    Some(block.to_image())
}

/// Paste `block` at the top-left of `rect`; pixels outside `rect` or the
/// image are dropped
pub fn write_block(img: &mut RgbaImage, rect: Rect, block: &RgbaImage) {
    let width = (rect.width().max(0) as u32).min(block.width());
    let height = (rect.height().max(0) as u32).min(block.height());
    if width == 0 || height == 0 {
        return;
    }
    let visible = imageops::crop_imm(block, 0, 0, width, height).to_image();
    imageops::replace(img, &visible, rect.left as i64, rect.top as i64);
}

/// In-memory surface backed by two RGBA buffers
#[derive(Clone, Debug)]
pub struct ImageSurface {
    base: RgbaImage,
    canvas: RgbaImage,
}

impl ImageSurface {
    pub fn new(base: RgbaImage) -> Self {
        let canvas = base.clone();
        Self { base, canvas }
    }

    /// Replace the base image; the canvas is reset to it
    pub fn set_base_image(&mut self, base: RgbaImage) {
        self.canvas = base.clone();
        self.base = base;
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }
}

impl RasterSurface for ImageSurface {
    fn base_image(&self) -> &RgbaImage {
        &self.base
    }

    fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    fn canvas_mut(&mut self) -> &mut RgbaImage {
        &mut self.canvas
    }

    fn restore_base(&mut self) {
        if self.canvas.dimensions() == self.base.dimensions() {
            self.canvas.copy_from_slice(self.base.as_raw());
        } else {
            self.canvas = self.base.clone();
        }
    }
}
