//! Annotation rendering module
//!
//! This module contains:
//! - Geometry constants and math shared by the shape renderers
//! - Image rendering using tiny-skia, plus the mosaic/blur pixel transforms
//! - Text rendering with system fonts

pub mod geometry;
pub mod image;
pub mod text;

pub use self::image::{draw_annotation, draw_annotations_in_order, draw_connector};
pub use self::text::FontCache;
