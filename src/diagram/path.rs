//! Connector path generation and hit testing

use std::fmt;

use tiny_skia::PathBuilder;

use crate::domain::{Point, angle, cubic_point, distance, distance_to_segment, midpoint};

/// Default curvature factor for [`curved_path`]
pub const DEFAULT_CURVATURE: f32 = 0.5;
/// Upper bound on control point distance from its endpoint
pub const MAX_CONTROL_OFFSET: f32 = 150.0;
/// Default hit tolerance for [`is_point_on_path`]
pub const DEFAULT_HIT_TOLERANCE: f32 = 5.0;
/// Segments used to flatten each cubic when hit testing
const CUBIC_SAMPLES: usize = 24;

/// One drawing command of a connector path
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
}

/// Which axis the middle run of an orthogonal route follows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RouteDirection {
    /// Middle run is horizontal, at the vertical midpoint
    #[default]
    Horizontal,
    /// Middle run is vertical, at the horizontal midpoint
    Vertical,
}

/// Ordered list of path commands, independent of any rendering API
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConnectorPath {
    commands: Vec<PathCommand>,
}

impl ConnectorPath {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Flatten into polylines, one per subpath; cubics are sampled
    pub fn polylines(&self) -> Vec<Vec<Point>> {
        let mut lines: Vec<Vec<Point>> = Vec::new();
        let mut cursor = Point::default();
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    lines.push(vec![p]);
                    cursor = p;
                }
                PathCommand::LineTo(p) => {
                    current_line(&mut lines, cursor).push(p);
                    cursor = p;
                }
                PathCommand::CubicTo { c1, c2, to } => {
                    let from = cursor;
                    let line = current_line(&mut lines, from);
                    for i in 1..=CUBIC_SAMPLES {
                        let t = i as f32 / CUBIC_SAMPLES as f32;
                        line.push(cubic_point(from, c1, c2, to, t));
                    }
                    cursor = to;
                }
            }
        }
        lines
    }

    /// Convert to a tiny-skia path for rasterizing
    ///
    /// Returns `None` when the path has no drawable segment.
    pub fn to_skia_path(&self) -> Option<tiny_skia::Path> {
        let mut pb = PathBuilder::new();
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => pb.move_to(p.x, p.y),
                PathCommand::LineTo(p) => pb.line_to(p.x, p.y),
                PathCommand::CubicTo { c1, c2, to } => {
                    pb.cubic_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y)
                }
            }
        }
        pb.finish()
    }
}

fn current_line(lines: &mut Vec<Vec<Point>>, cursor: Point) -> &mut Vec<Point> {
    if lines.is_empty() {
        lines.push(vec![cursor]);
    }
    let last = lines.len() - 1;
    &mut lines[last]
}

/// SVG path data (`M x y C ...` / `M x y L ...`)
impl fmt::Display for ConnectorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for command in &self.commands {
            match command {
                PathCommand::MoveTo(p) => write!(f, "{sep}M {} {}", p.x, p.y)?,
                PathCommand::LineTo(p) => write!(f, "{sep}L {} {}", p.x, p.y)?,
                PathCommand::CubicTo { c1, c2, to } => write!(
                    f,
                    "{sep}C {} {}, {} {}, {} {}",
                    c1.x, c1.y, c2.x, c2.y, to.x, to.y
                )?,
            }
            sep = " ";
        }
        Ok(())
    }
}

/// Smooth cubic connector from `start` to `end`
///
/// Control points sit on the start→end line, `distance × curvature` away from
/// their endpoint, capped at [`MAX_CONTROL_OFFSET`].
pub fn curved_path(start: Point, end: Point, curvature: f32) -> ConnectorPath {
    let offset = (distance(start, end) * curvature).min(MAX_CONTROL_OFFSET);
    let theta = angle(start, end);
    let (sin, cos) = theta.sin_cos();

    let c1 = Point::new(start.x + cos * offset, start.y + sin * offset);
    let c2 = Point::new(end.x - cos * offset, end.y - sin * offset);

    ConnectorPath::new(vec![
        PathCommand::MoveTo(start),
        PathCommand::CubicTo { c1, c2, to: end },
    ])
}

/// Three-segment right-angle connector through the midpoint
pub fn orthogonal_path(start: Point, end: Point, direction: RouteDirection) -> ConnectorPath {
    let mid = midpoint(start, end);
    let (bend1, bend2) = match direction {
        RouteDirection::Horizontal => (Point::new(start.x, mid.y), Point::new(end.x, mid.y)),
        RouteDirection::Vertical => (Point::new(mid.x, start.y), Point::new(mid.x, end.y)),
    };

    ConnectorPath::new(vec![
        PathCommand::MoveTo(start),
        PathCommand::LineTo(bend1),
        PathCommand::LineTo(bend2),
        PathCommand::LineTo(end),
    ])
}

/// Check whether `point` lies within `tolerance` of the path
pub fn is_point_on_path(path: &ConnectorPath, point: Point, tolerance: f32) -> bool {
    path.polylines().iter().any(|line| match line.as_slice() {
        [] => false,
        [only] => distance(*only, point) <= tolerance,
        _ => line
            .windows(2)
            .any(|seg| distance_to_segment(point, seg[0], seg[1]) <= tolerance),
    })
}
