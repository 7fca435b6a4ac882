//! 2D geometry for the decorative layers: points, rectangles and paths.
//!
//! The only shape the button needs is the ring shape: a rectangle outline
//! with an independent full-circle subpath punched out of its centre. Paths
//! are plain command lists; `Path::contains` evaluates them under a fill
//! rule so the cutout can be checked without a rasteriser.

use std::f32::consts::TAU;

/// Line segments used to flatten one full turn of an arc.
const ARC_SEGMENTS: usize = 64;

/// A point in local layer coordinates. `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The point `distance` away from `self` in direction `angle` (radians).
    pub fn offset_polar(self, distance: f32, angle: f32) -> Self {
        Self::new(self.x + distance * angle.cos(), self.y + distance * angle.sin())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// A rectangle of `size` at the origin.
    pub const fn from_size(size: Size) -> Self {
        Self {
            origin: Point::new(0.0, 0.0),
            size,
        }
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }
}

/// How overlapping subpaths decide which points are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// Path command for building vector paths.
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath.
    MoveTo(Point),
    /// Straight line from the current point.
    LineTo(Point),
    /// Circular arc. A line joins the current point to the arc start.
    ///
    /// Angles are in radians, measured from the +x axis towards +y. With
    /// `clockwise == false` the angle increases from `start_angle` to `end_angle`.
    Arc {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        clockwise: bool,
    },
    /// Close the current subpath.
    Close,
}

/// A vector path made of one or more subpaths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn move_to(mut self, point: Point) -> Self {
        self.commands.push(PathCommand::MoveTo(point));
        self
    }

    pub fn line_to(mut self, point: Point) -> Self {
        self.commands.push(PathCommand::LineTo(point));
        self
    }

    pub fn arc(
        mut self,
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        clockwise: bool,
    ) -> Self {
        self.commands.push(PathCommand::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            clockwise,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Splits the command list at every `MoveTo`.
    pub fn subpaths(&self) -> Vec<&[PathCommand]> {
        let mut subpaths = Vec::new();
        let mut start = 0;
        for (i, command) in self.commands.iter().enumerate() {
            if matches!(command, PathCommand::MoveTo(_)) && i > start {
                subpaths.push(&self.commands[start..i]);
                start = i;
            }
        }
        if start < self.commands.len() {
            subpaths.push(&self.commands[start..]);
        }
        subpaths
    }

    /// Bounding rectangle of every point the path visits.
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.subpaths().into_iter().flat_map(flatten);
        let first = points.next()?;
        let (mut min, mut max) = (first, first);
        for p in points {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        Some(Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// Whether `point` is filled when the path is painted with `rule`.
    ///
    /// Every subpath is implicitly closed. Points exactly on an edge may go
    /// either way.
    pub fn contains(&self, point: Point, rule: FillRule) -> bool {
        let winding: i32 = self
            .subpaths()
            .into_iter()
            .map(|subpath| winding_number(&flatten(subpath), point))
            .sum();
        match rule {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }
}

/// Builds the ring shape for `rect`: the rectangle outline traced from the
/// top-left corner down, across and up, plus a full circle of `radius`
/// centred in the rectangle.
///
/// Coordinates are local to the rectangle; its origin is ignored. The circle
/// winds against the outline, so it cuts a hole under either fill rule.
/// Negative or oversized radii are not rejected.
pub fn ring_shape(rect: Rect, radius: f32) -> Path {
    let (width, height) = (rect.width(), rect.height());
    let center = Point::new(width / 2.0, height / 2.0);
    Path::new()
        .move_to(Point::new(0.0, 0.0))
        .line_to(Point::new(0.0, height))
        .line_to(Point::new(width, height))
        .line_to(Point::new(width, 0.0))
        .move_to(center)
        .arc(center, radius, 0.0, TAU, false)
}

fn flatten(subpath: &[PathCommand]) -> Vec<Point> {
    let mut points = Vec::new();
    for command in subpath {
        match *command {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => points.push(p),
            PathCommand::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                clockwise,
            } => {
                let mut sweep = end_angle - start_angle;
                if clockwise && sweep > 0.0 {
                    sweep -= TAU;
                } else if !clockwise && sweep < 0.0 {
                    sweep += TAU;
                }
                let segments = ((sweep.abs() / TAU) * ARC_SEGMENTS as f32).ceil().max(1.0) as usize;
                for i in 0..=segments {
                    let angle = start_angle + sweep * i as f32 / segments as f32;
                    points.push(center.offset_polar(radius, angle));
                }
            }
            PathCommand::Close => {}
        }
    }
    points
}

/// Winding number of the closed polygon `points` around `p`.
fn winding_number(points: &[Point], p: Point) -> i32 {
    let mut winding = 0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let side = (b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y);
        if a.y <= p.y {
            if b.y > p.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}
