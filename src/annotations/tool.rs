//! Pointer-driven annotation authoring over a raster surface

use std::path::{Path, PathBuf};

use crate::config::{EditorConfig, ExportFormat, StyleUpdate, Tool, ToolStyle};
use crate::domain::{Annotation, Point, TextAnnotation};
use crate::export;
use crate::render::{self, FontCache};
use crate::surface::RasterSurface;

/// Label committed when an empty text field is confirmed
pub const DEFAULT_TEXT_LABEL: &str = "Text";

/// Text being typed into the inline text field
#[derive(Clone, Debug, PartialEq)]
pub struct TextEdit {
    annotation: TextAnnotation,
}

impl TextEdit {
    fn new(position: Point, style: &ToolStyle) -> Self {
        Self {
            annotation: TextAnnotation {
                position,
                text: String::new(),
                color: style.stroke_color,
                font_size: style.font_size,
                font_family: style.font_family.clone(),
            },
        }
    }

    /// Baseline anchor of the text in surface coordinates
    pub fn anchor(&self) -> Point {
        self.annotation.position
    }

    /// Where the host should place the top-left of its text field
    pub fn field_origin(&self) -> Point {
        let anchor = self.anchor();
        Point::new(anchor.x, anchor.y - self.annotation.font_size)
    }

    pub fn font_size(&self) -> f32 {
        self.annotation.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.annotation.font_family
    }

    pub fn text(&self) -> &str {
        &self.annotation.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.annotation.text = text.into();
    }

    pub fn push_str(&mut self, text: &str) {
        self.annotation.text.push_str(text);
    }

    fn is_blank(&self) -> bool {
        self.annotation.text.trim().is_empty()
    }
}

/// Input state machine
#[derive(Clone, Debug, Default, PartialEq)]
pub enum InputState {
    #[default]
    Idle,
    /// A drag is in progress; holds the provisional annotation
    Drawing(Annotation),
    TextEditing(TextEdit),
}

/// How a text edit ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TextExit {
    Confirm,
    Cancel,
    FocusLost,
}

/// Annotation tool bound to a surface it does not own
///
/// The tool owns its annotation log and style; the surface must outlive it.
/// All methods run synchronously, so every event observes the log as left
/// by the previous one.
pub struct AnnotationTool<'s, S: RasterSurface + ?Sized> {
    surface: &'s mut S,
    tool: Tool,
    style: ToolStyle,
    annotations: Vec<Annotation>,
    state: InputState,
    /// Viewport position of the surface's top-left corner
    origin: Point,
    attached: bool,
    fonts: FontCache,
}

impl<'s, S: RasterSurface + ?Sized> AnnotationTool<'s, S> {
    /// Create a tool attached to the surface's pointer events
    pub fn new(surface: &'s mut S, style: ToolStyle) -> Self {
        Self {
            surface,
            tool: Tool::default(),
            style,
            annotations: Vec::new(),
            state: InputState::Idle,
            origin: Point::default(),
            attached: true,
            fonts: FontCache::new(),
        }
    }

    pub fn from_config(surface: &'s mut S, config: &EditorConfig) -> Self {
        let mut tool = Self::new(surface, config.style.clone());
        tool.tool = config.default_tool;
        tool
    }

    // ========================================================================
    // Event binding
    // ========================================================================

    /// Start receiving pointer events; returns `false` if already attached
    pub fn attach(&mut self) -> bool {
        if self.attached {
            return false;
        }
        self.attached = true;
        true
    }

    /// Stop receiving pointer events
    ///
    /// An in-progress drag or text edit is abandoned. Returns `false` if
    /// already detached.
    pub fn detach(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        self.attached = false;
        if !matches!(self.state, InputState::Idle) {
            log::debug!("Detaching, abandoning in-progress input");
            self.state = InputState::Idle;
            self.redraw();
        }
        true
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Set where the surface sits in viewport coordinates
    pub fn set_viewport_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    fn to_surface(&self, viewport: Point) -> Point {
        viewport.offset(-self.origin.x, -self.origin.y)
    }

    // ========================================================================
    // Pointer input (viewport coordinates)
    // ========================================================================

    pub fn pointer_down(&mut self, viewport: Point) {
        if !self.attached {
            return;
        }
        let start = self.to_surface(viewport);

        // Clicking the surface takes focus away from the text field
        if matches!(self.state, InputState::TextEditing(_)) {
            self.finish_text(TextExit::FocusLost);
        }
        // A drag whose release we never saw is kept rather than lost
        if matches!(self.state, InputState::Drawing(_)) {
            self.commit_current();
        }

        self.state = match Annotation::begin_drag(self.tool, start, &self.style) {
            Some(provisional) => InputState::Drawing(provisional),
            None => InputState::TextEditing(TextEdit::new(start, &self.style)),
        };
    }

    pub fn pointer_move(&mut self, viewport: Point) {
        if !self.attached {
            return;
        }
        let current = self.to_surface(viewport);
        if let InputState::Drawing(provisional) = &mut self.state {
            provisional.set_end(current);
            self.redraw();
        }
    }

    pub fn pointer_up(&mut self, viewport: Point) {
        if !self.attached {
            return;
        }
        let current = self.to_surface(viewport);
        if let InputState::Drawing(provisional) = &mut self.state {
            provisional.set_end(current);
            self.commit_current();
            self.redraw();
        }
    }

    /// Leaving the surface ends a drag like a release at the last position
    pub fn pointer_leave(&mut self) {
        if !self.attached {
            return;
        }
        if matches!(self.state, InputState::Drawing(_)) {
            self.commit_current();
            self.redraw();
        }
    }

    fn commit_current(&mut self) {
        if let InputState::Drawing(annotation) = std::mem::take(&mut self.state) {
            log::debug!("Committing {} annotation", annotation.tool().name());
            self.annotations.push(annotation);
        }
    }

    // ========================================================================
    // Text editing
    // ========================================================================

    pub fn text_edit(&self) -> Option<&TextEdit> {
        match &self.state {
            InputState::TextEditing(edit) => Some(edit),
            _ => None,
        }
    }

    pub fn text_edit_mut(&mut self) -> Option<&mut TextEdit> {
        match &mut self.state {
            InputState::TextEditing(edit) => Some(edit),
            _ => None,
        }
    }

    /// Explicit commit (Enter); blank text is discarded
    pub fn confirm_text(&mut self) {
        self.finish_text(TextExit::Confirm);
    }

    /// Explicit cancel (Escape)
    pub fn cancel_text(&mut self) {
        self.finish_text(TextExit::Cancel);
    }

    /// The text field lost focus
    pub fn text_focus_lost(&mut self) {
        self.finish_text(TextExit::FocusLost);
    }

    fn finish_text(&mut self, exit: TextExit) {
        let InputState::TextEditing(edit) = std::mem::take(&mut self.state) else {
            return;
        };
        let annotation = match exit {
            TextExit::Cancel => None,
            TextExit::Confirm if edit.is_blank() => {
                let mut annotation = edit.annotation;
                annotation.text = DEFAULT_TEXT_LABEL.to_string();
                Some(annotation)
            }
            TextExit::FocusLost if edit.is_blank() => None,
            _ => Some(edit.annotation),
        };
        match annotation {
            Some(annotation) => {
                log::debug!("Committing text annotation ({exit:?})");
                self.annotations.push(Annotation::Text(annotation));
                self.redraw();
            }
            None => log::debug!("Discarding text edit ({exit:?})"),
        }
    }

    // ========================================================================
    // Tool and style
    // ========================================================================

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Select a tool by name; unknown names keep the current tool
    pub fn set_tool_by_name(&mut self, name: &str) -> bool {
        match Tool::from_name(name) {
            Some(tool) => {
                self.tool = tool;
                true
            }
            None => {
                log::warn!("Unknown annotation tool {name:?}, keeping {}", self.tool.name());
                false
            }
        }
    }

    pub fn style(&self) -> &ToolStyle {
        &self.style
    }

    /// Update the style for future annotations; existing ones keep theirs
    pub fn set_style(&mut self, update: StyleUpdate) {
        self.style.apply(update);
    }

    // ========================================================================
    // Log and rendering
    // ========================================================================

    /// Snapshot of the committed annotations in draw order
    pub fn annotations(&self) -> Vec<Annotation> {
        self.annotations.clone()
    }

    /// Annotation currently being dragged out, if any
    pub fn current_annotation(&self) -> Option<&Annotation> {
        match &self.state {
            InputState::Drawing(annotation) => Some(annotation),
            _ => None,
        }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Append a finished annotation to the log
    pub fn commit(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Drop every annotation, including one being dragged, and redraw
    pub fn clear_all(&mut self) {
        self.annotations.clear();
        if matches!(self.state, InputState::Drawing(_)) {
            self.state = InputState::Idle;
        }
        self.redraw();
    }

    /// Repaint from the base image: log in order, then the drag in progress
    pub fn redraw(&mut self) {
        self.surface.restore_base();
        let canvas = self.surface.canvas_mut();
        render::draw_annotations_in_order(canvas, &self.annotations, &mut self.fonts);
        if let InputState::Drawing(current) = &self.state {
            render::draw_annotation(canvas, current, &mut self.fonts);
        }
        log::trace!("Redrew {} annotations", self.annotations.len());
    }

    pub fn surface(&self) -> &S {
        self.surface
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Encode the annotated canvas
    pub fn export_image(&self, format: ExportFormat, quality: f32) -> anyhow::Result<Vec<u8>> {
        self.surface.encode(format, quality)
    }

    /// Encode and write to `target` (a file, or a directory for a
    /// timestamped file name); returns the written path
    pub fn download_image(
        &self,
        target: &Path,
        format: ExportFormat,
        quality: f32,
    ) -> anyhow::Result<PathBuf> {
        let bytes = self.export_image(format, quality)?;
        export::write_encoded(target, format, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShapeColor;
    use crate::domain::{RegionAnnotation, ShapeAnnotation};
    use crate::surface::ImageSurface;
    use image::{Rgba, RgbaImage};

    fn base() -> RgbaImage {
        RgbaImage::from_fn(80, 60, |x, y| Rgba([(x * 3) as u8, (y * 4) as u8, 128, 255]))
    }

    fn drag<S: RasterSurface + ?Sized>(tool: &mut AnnotationTool<'_, S>, from: Point, to: Point) {
        tool.pointer_down(from);
        tool.pointer_move(to);
        tool.pointer_up(to);
    }

    #[test]
    fn test_rectangle_drag_commits_one_annotation() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        tool.set_tool(Tool::Rectangle);

        tool.pointer_down(Point::new(10.0, 10.0));
        tool.pointer_move(Point::new(50.0, 50.0));
        assert!(tool.current_annotation().is_some());
        assert!(tool.annotations().is_empty());
        tool.pointer_up(Point::new(50.0, 50.0));

        let style = ToolStyle::default();
        assert_eq!(
            tool.annotations(),
            vec![Annotation::Rectangle(ShapeAnnotation {
                start: Point::new(10.0, 10.0),
                end: Point::new(50.0, 50.0),
                stroke: style.stroke_color,
                fill: style.fill_color,
                line_width: style.line_width,
            })]
        );
        assert!(tool.current_annotation().is_none());
        assert_eq!(tool.state(), &InputState::Idle);
    }

    #[test]
    fn test_viewport_translation_happens_once() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        tool.set_tool(Tool::Line);
        tool.set_viewport_origin(Point::new(100.0, 40.0));
        drag(&mut tool, Point::new(110.0, 45.0), Point::new(130.0, 75.0));

        let log = tool.annotations();
        assert_eq!(log[0].start(), Point::new(10.0, 5.0));
        assert_eq!(log[0].end(), Some(Point::new(30.0, 35.0)));
    }

    #[test]
    fn test_move_and_up_without_down_are_noops() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        tool.pointer_move(Point::new(5.0, 5.0));
        tool.pointer_up(Point::new(5.0, 5.0));
        tool.pointer_leave();
        assert!(tool.annotations().is_empty());
        assert_eq!(tool.surface().canvas(), &base());
    }

    #[test]
    fn test_pointer_leave_commits_drag() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        tool.pointer_down(Point::new(5.0, 5.0));
        tool.pointer_move(Point::new(40.0, 20.0));
        tool.pointer_leave();
        let log = tool.annotations();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].tool(), Tool::Arrow);
        assert_eq!(log[0].end(), Some(Point::new(40.0, 20.0)));
    }

    #[test]
    fn test_redraw_is_idempotent() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        tool.set_tool(Tool::Circle);
        drag(&mut tool, Point::new(30.0, 30.0), Point::new(40.0, 35.0));
        tool.set_tool(Tool::Mosaic);
        drag(&mut tool, Point::new(0.0, 0.0), Point::new(45.0, 45.0));
        tool.set_tool(Tool::Blur);
        drag(&mut tool, Point::new(20.0, 10.0), Point::new(70.0, 50.0));

        tool.redraw();
        let first = tool.surface().canvas().clone();
        tool.redraw();
        assert_eq!(tool.surface().canvas(), &first);
        assert_ne!(&first, &base());
    }

    #[test]
    fn test_clear_all_restores_base() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        drag(&mut tool, Point::new(5.0, 5.0), Point::new(60.0, 40.0));
        tool.set_tool(Tool::Mosaic);
        drag(&mut tool, Point::new(0.0, 0.0), Point::new(30.0, 30.0));
        assert_ne!(tool.surface().canvas(), &base());

        tool.clear_all();
        assert!(tool.annotations().is_empty());
        tool.redraw();
        assert_eq!(tool.surface().canvas(), &base());
    }

    #[test]
    fn test_mosaic_over_earlier_annotations() {
        let mut surface = ImageSurface::new(RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 255])));
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        tool.commit(Annotation::Rectangle(ShapeAnnotation {
            start: Point::new(0.0, 0.0),
            end: Point::new(40.0, 40.0),
            stroke: ShapeColor::rgb(0.0, 0.0, 0.0),
            fill: ShapeColor::rgb(0.0, 0.0, 1.0),
            line_width: 1.0,
        }));
        tool.commit(Annotation::Mosaic(RegionAnnotation {
            start: Point::new(10.0, 10.0),
            end: Point::new(30.0, 30.0),
        }));
        tool.redraw();
        // The mosaic samples the filled rectangle beneath it
        assert_eq!(*tool.surface().canvas().get_pixel(15, 15), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_text_commit_on_focus_loss() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        tool.set_tool(Tool::Text);
        tool.pointer_down(Point::new(12.0, 30.0));
        tool.pointer_up(Point::new(12.0, 30.0));

        let edit = tool.text_edit_mut().unwrap();
        assert_eq!(edit.anchor(), Point::new(12.0, 30.0));
        assert_eq!(edit.field_origin(), Point::new(12.0, 14.0));
        edit.set_text("hello");
        tool.text_focus_lost();

        let log = tool.annotations();
        assert_eq!(log.len(), 1);
        let Annotation::Text(text) = &log[0] else {
            panic!("expected text annotation");
        };
        assert_eq!(text.text, "hello");
        assert_eq!(text.font_size, 16.0);
        assert!(tool.text_edit().is_none());
    }

    #[test]
    fn test_blank_text_is_discarded_on_focus_loss() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        tool.set_tool(Tool::Text);

        tool.pointer_down(Point::new(1.0, 20.0));
        tool.text_focus_lost();
        assert!(tool.annotations().is_empty());

        tool.pointer_down(Point::new(1.0, 20.0));
        tool.text_edit_mut().unwrap().set_text("   ");
        tool.text_focus_lost();
        assert!(tool.annotations().is_empty());
        assert_eq!(tool.state(), &InputState::Idle);
    }

    #[test]
    fn test_confirming_blank_text_commits_default_label() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        tool.set_tool(Tool::Text);

        tool.pointer_down(Point::new(1.0, 20.0));
        tool.text_edit_mut().unwrap().set_text("  ");
        tool.confirm_text();

        let log = tool.annotations();
        assert_eq!(log.len(), 1);
        let Annotation::Text(text) = &log[0] else {
            panic!("expected text annotation");
        };
        assert_eq!(text.text, DEFAULT_TEXT_LABEL);
        assert_eq!(text.position, Point::new(1.0, 20.0));
        assert_eq!(tool.state(), &InputState::Idle);
    }

    #[test]
    fn test_pointer_down_commits_pending_drag() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        tool.set_tool(Tool::Rectangle);

        tool.pointer_down(Point::new(5.0, 5.0));
        tool.pointer_move(Point::new(25.0, 30.0));
        // The release was never delivered
        tool.pointer_down(Point::new(40.0, 40.0));

        let log = tool.annotations();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].start(), Point::new(5.0, 5.0));
        assert_eq!(log[0].end(), Some(Point::new(25.0, 30.0)));
        let pending = tool.current_annotation().unwrap();
        assert_eq!(pending.start(), Point::new(40.0, 40.0));
    }

    #[test]
    fn test_cancel_discards_text() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        tool.set_tool(Tool::Text);
        tool.pointer_down(Point::new(1.0, 20.0));
        tool.text_edit_mut().unwrap().push_str("draft");
        tool.cancel_text();
        assert!(tool.annotations().is_empty());

        tool.pointer_down(Point::new(1.0, 20.0));
        tool.text_edit_mut().unwrap().push_str("kept");
        tool.confirm_text();
        assert_eq!(tool.annotations().len(), 1);
    }

    #[test]
    fn test_click_elsewhere_commits_pending_text() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        tool.set_tool(Tool::Text);
        tool.pointer_down(Point::new(1.0, 20.0));
        tool.text_edit_mut().unwrap().set_text("first");
        tool.pointer_down(Point::new(30.0, 40.0));

        assert_eq!(tool.annotations().len(), 1);
        assert_eq!(tool.text_edit().unwrap().anchor(), Point::new(30.0, 40.0));
    }

    #[test]
    fn test_style_changes_do_not_touch_log() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        tool.set_tool(Tool::Line);
        drag(&mut tool, Point::new(1.0, 1.0), Point::new(20.0, 20.0));
        tool.set_style(StyleUpdate {
            line_width: Some(9.0),
            ..Default::default()
        });
        drag(&mut tool, Point::new(1.0, 1.0), Point::new(20.0, 20.0));

        let widths: Vec<f32> = tool
            .annotations()
            .iter()
            .map(|a| match a {
                Annotation::Line(l) => l.line_width,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(widths, vec![2.0, 9.0]);
    }

    #[test]
    fn test_unknown_tool_name_keeps_current() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        assert!(tool.set_tool_by_name("blur"));
        assert!(!tool.set_tool_by_name("lasso"));
        assert_eq!(tool.tool(), Tool::Blur);
    }

    #[test]
    fn test_attach_detach() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        assert!(tool.is_attached());
        assert!(!tool.attach());

        tool.pointer_down(Point::new(1.0, 1.0));
        assert!(tool.detach());
        assert!(!tool.detach());
        assert!(tool.current_annotation().is_none());

        drag(&mut tool, Point::new(1.0, 1.0), Point::new(20.0, 20.0));
        assert!(tool.annotations().is_empty());

        assert!(tool.attach());
        drag(&mut tool, Point::new(1.0, 1.0), Point::new(20.0, 20.0));
        assert_eq!(tool.annotations().len(), 1);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        drag(&mut tool, Point::new(1.0, 1.0), Point::new(20.0, 20.0));
        let mut snapshot = tool.annotations();
        snapshot.clear();
        assert_eq!(tool.annotations().len(), 1);
    }

    #[test]
    fn test_from_config_uses_default_tool() {
        let mut surface = ImageSurface::new(base());
        let config = EditorConfig {
            default_tool: Tool::Mosaic,
            ..Default::default()
        };
        let tool = AnnotationTool::from_config(&mut surface, &config);
        assert_eq!(tool.tool(), Tool::Mosaic);
    }

    #[test]
    fn test_download_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = ImageSurface::new(base());
        let mut tool = AnnotationTool::new(&mut surface, ToolStyle::default());
        drag(&mut tool, Point::new(1.0, 1.0), Point::new(20.0, 20.0));

        let target = dir.path().join("shot.png");
        let written = tool
            .download_image(&target, ExportFormat::Png, export::DEFAULT_QUALITY)
            .unwrap();
        assert_eq!(written, target);
        let decoded = image::open(&written).unwrap().to_rgba8();
        assert_eq!(&decoded, tool.surface().canvas());
    }
}
