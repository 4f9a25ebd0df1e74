//! Page capture
//!
//! This module consolidates:
//! - The rasterizer boundary (a renderer supplied by the host)
//! - Screenshot image type (image.rs)
//! - The screenshot tool that records the last capture

pub mod image;

use ::image::RgbaImage;
use anyhow::Context;

use crate::domain::Rect;
pub use self::image::ScreenshotImage;

/// What part of the page to rasterize
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureRequest {
    /// The whole scrollable page
    FullPage,
    /// The visible viewport
    Viewport { width: u32, height: u32 },
    /// A page-space rectangle
    Area(Rect),
}

/// Renders a page into pixels
pub trait Rasterizer {
    fn render(&mut self, request: &CaptureRequest) -> anyhow::Result<RgbaImage>;
}

/// Any closure with the right shape works as a rasterizer
impl<F> Rasterizer for F
where
    F: FnMut(&CaptureRequest) -> anyhow::Result<RgbaImage>,
{
    fn render(&mut self, request: &CaptureRequest) -> anyhow::Result<RgbaImage> {
        self(request)
    }
}

/// Captures screenshots and keeps the most recent one
pub struct ScreenshotTool<R> {
    rasterizer: R,
    last: Option<ScreenshotImage>,
}

impl<R: Rasterizer> ScreenshotTool<R> {
    pub fn new(rasterizer: R) -> Self {
        Self {
            rasterizer,
            last: None,
        }
    }

    pub fn capture_full_page(&mut self) -> anyhow::Result<&ScreenshotImage> {
        let rgba = self
            .rasterizer
            .render(&CaptureRequest::FullPage)
            .context("full-page capture failed")?;
        Ok(self.store(rgba))
    }

    pub fn capture_viewport(&mut self, width: u32, height: u32) -> anyhow::Result<&ScreenshotImage> {
        let rgba = self
            .rasterizer
            .render(&CaptureRequest::Viewport { width, height })
            .context("viewport capture failed")?;
        Ok(self.store(rgba))
    }

    /// Capture only `rect`; an empty rect is an error
    pub fn capture_area(&mut self, rect: Rect) -> anyhow::Result<&ScreenshotImage> {
        let rgba = self.render_area(rect).context("area capture failed")?;
        Ok(self.store(rgba))
    }

    fn render_area(&mut self, rect: Rect) -> anyhow::Result<RgbaImage> {
        let Some(size) = rect.dimensions() else {
            anyhow::bail!("empty capture area {rect:?}");
        };
        let rgba = self.rasterizer.render(&CaptureRequest::Area(rect))?;
        if rgba.dimensions() != (size.width(), size.height()) {
            log::warn!(
                "Area capture returned {}x{}, requested {}x{}",
                rgba.width(),
                rgba.height(),
                size.width(),
                size.height()
            );
        }
        Ok(rgba)
    }

    fn store(&mut self, rgba: RgbaImage) -> &ScreenshotImage {
        self.last.insert(ScreenshotImage::new(rgba))
    }

    /// Most recent capture
    pub fn screenshot(&self) -> Option<&ScreenshotImage> {
        self.last.as_ref()
    }

    /// Hand the most recent capture over, leaving none behind
    pub fn take_screenshot(&mut self) -> Option<ScreenshotImage> {
        self.last.take()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}
