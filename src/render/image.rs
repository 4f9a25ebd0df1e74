//! Image rendering for annotations using tiny-skia
//!
//! These functions draw annotations directly onto an `RgbaImage`.

use image::{Rgba, RgbaImage, imageops};
use tiny_skia::{
    ColorU8, FillRule, IntSize, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

use super::geometry::{self, arrow, redact};
use super::text::{self, FontCache};
use crate::config::ShapeColor;
use crate::diagram::ConnectorPath;
use crate::domain::{
    Annotation, Point, Rect, RegionAnnotation, ShapeAnnotation, StrokeAnnotation, distance,
};
use crate::surface;

/// Run a tiny-skia drawing function over an RgbaImage
///
/// The image holds straight alpha while tiny-skia works premultiplied, so
/// pixels are converted on the way in and out.
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let Some(size) = IntSize::from_wh(img.width(), img.height()) else {
        return;
    };
    let data = img
        .pixels()
        .flat_map(|p| {
            let c = ColorU8::from_rgba(p[0], p[1], p[2], p[3]).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    let Some(mut pixmap) = Pixmap::from_vec(data, size) else {
        return;
    };

    f(&mut pixmap);

    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
}

fn paint_for(color: ShapeColor) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

fn build_line_path(start: Point, end: Point) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(start.x, start.y);
    pb.line_to(end.x, end.y);
    pb.finish()
}

/// Stroke a straight line with round caps
pub fn draw_line(img: &mut RgbaImage, line: &StrokeAnnotation) {
    let Some(path) = build_line_path(line.start, line.end) else {
        return;
    };
    with_pixmap(img, |pixmap| {
        let paint = paint_for(line.color);
        let stroke = round_stroke(line.line_width);
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    });
}

/// Stroke the shaft, then fill a triangular head at `end`
pub fn draw_arrow(img: &mut RgbaImage, arrow_ann: &StrokeAnnotation) {
    let (head1, head2) = arrow::head_points(arrow_ann.start, arrow_ann.end, arrow::HEAD_SIZE);
    let end = arrow_ann.end;

    let mut pb = PathBuilder::new();
    pb.move_to(end.x, end.y);
    pb.line_to(head1.x, head1.y);
    pb.line_to(head2.x, head2.y);
    pb.close();
    let head = pb.finish();
    let shaft = build_line_path(arrow_ann.start, end);

    with_pixmap(img, |pixmap| {
        let paint = paint_for(arrow_ann.color);
        if let Some(shaft) = shaft {
            let stroke = round_stroke(arrow_ann.line_width);
            pixmap.stroke_path(&shaft, &paint, &stroke, Transform::identity(), None);
        }
        if let Some(head) = head {
            pixmap.fill_path(&head, &paint, FillRule::Winding, Transform::identity(), None);
        }
    });
}

fn stroke_and_fill(img: &mut RgbaImage, path: &tiny_skia::Path, shape: &ShapeAnnotation) {
    with_pixmap(img, |pixmap| {
        let stroke = round_stroke(shape.line_width);
        pixmap.stroke_path(
            path,
            &paint_for(shape.stroke),
            &stroke,
            Transform::identity(),
            None,
        );
        if !shape.fill.is_transparent() {
            pixmap.fill_path(
                path,
                &paint_for(shape.fill),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    });
}

/// Axis-aligned rectangle spanned by the drag corners
pub fn draw_rectangle(img: &mut RgbaImage, rect: &ShapeAnnotation) {
    let (min_x, min_y, max_x, max_y) = geometry::normalize_rect(rect.start, rect.end);
    let Some(bounds) = tiny_skia::Rect::from_ltrb(min_x, min_y, max_x, max_y) else {
        return;
    };
    let path = PathBuilder::from_rect(bounds);
    stroke_and_fill(img, &path, rect);
}

/// Circle centered on the drag start, through the drag end
pub fn draw_circle(img: &mut RgbaImage, circle: &ShapeAnnotation) {
    let radius = distance(circle.start, circle.end);
    let Some(path) = PathBuilder::from_circle(circle.start.x, circle.start.y, radius) else {
        return;
    };
    stroke_and_fill(img, &path, circle);
}

/// Clamp a drag region to the image; `None` when nothing is left
fn clamp_region(img: &RgbaImage, region: &RegionAnnotation) -> Option<Rect> {
    surface::clamp_rect(img, Rect::from_corners(region.start, region.end))
}

/// Fill each `cell`-sized cell with its top-left color, fully opaque
fn pixelate(block: &mut RgbaImage, cell: u32) {
    let (width, height) = block.dimensions();
    for cell_y in (0..height).step_by(cell as usize) {
        let cell_end_y = (cell_y + cell).min(height);
        for cell_x in (0..width).step_by(cell as usize) {
            let cell_end_x = (cell_x + cell).min(width);
            let [r, g, b, _] = block.get_pixel(cell_x, cell_y).0;
            let sample = Rgba([r, g, b, 255]);
            for py in cell_y..cell_end_y {
                for px in cell_x..cell_end_x {
                    block.put_pixel(px, py, sample);
                }
            }
        }
    }
}

/// Pixelate a region; cells are anchored at the region's top-left
pub fn draw_mosaic(img: &mut RgbaImage, region: &RegionAnnotation) {
    let Some(area) = clamp_region(img, region) else {
        return;
    };
    let Some(mut block) = surface::read_block(img, area) else {
        return;
    };
    pixelate(&mut block, redact::MOSAIC_BLOCK_SIZE);
    surface::write_block(img, area, &block);
}

/// Gaussian-blur a region in place, leaving the rest untouched
pub fn draw_blur(img: &mut RgbaImage, region: &RegionAnnotation) {
    let Some(area) = clamp_region(img, region) else {
        return;
    };
    let Some(block) = surface::read_block(img, area) else {
        return;
    };
    let blurred = imageops::blur(&block, redact::BLUR_RADIUS);
    surface::write_block(img, area, &blurred);
}

/// Draw one annotation
pub fn draw_annotation(img: &mut RgbaImage, annotation: &Annotation, fonts: &mut FontCache) {
    match annotation {
        Annotation::Arrow(a) => draw_arrow(img, a),
        Annotation::Line(l) => draw_line(img, l),
        Annotation::Rectangle(r) => draw_rectangle(img, r),
        Annotation::Circle(c) => draw_circle(img, c),
        Annotation::Text(t) => text::draw_text(img, t, fonts),
        Annotation::Mosaic(m) => draw_mosaic(img, m),
        Annotation::Blur(b) => draw_blur(img, b),
    }
}

/// Draw annotations in log order; later entries land on top
pub fn draw_annotations_in_order(
    img: &mut RgbaImage,
    annotations: &[Annotation],
    fonts: &mut FontCache,
) {
    for annotation in annotations {
        draw_annotation(img, annotation, fonts);
    }
}

/// Stroke a diagram connector onto an image
pub fn draw_connector(img: &mut RgbaImage, path: &ConnectorPath, color: ShapeColor, width: f32) {
    let Some(path) = path.to_skia_path() else {
        return;
    };
    with_pixmap(img, |pixmap| {
        let stroke = round_stroke(width);
        pixmap.stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), None);
    });
}
