// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building closed polygonal contours from path commands.

use crate::command::PathCommand;
use crate::flatten::{self, EllipticalArc};
use crate::kurbo::{Line, Point, Rect, RoundedRectRadii, Vec2};
use crate::options::DEFAULT_TOLERANCE;
use core::borrow::Borrow;
use core::f64::consts::{FRAC_PI_2, PI, TAU};
use log::{trace, warn};

/// Below this sine of the turn angle, an `ArcTo` corner is treated as straight.
const ARC_TO_EPSILON: f64 = 1e-9;

/// The orientation of a contour, in a y-up coordinate system.
///
/// In y-down screen space the visual orientation is the opposite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Negative signed area.
    Clockwise,
    /// Positive (or zero) signed area.
    CounterClockwise,
}

/// A closed polygon loop approximating one subpath.
///
/// The closing point is stored explicitly, so the first and last points are
/// always equal. A contour always has at least three distinct points.
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    /// Close the loop and check it, returning `None` for degenerate or
    /// non-finite point lists.
    pub fn new(mut points: Vec<Point>) -> Option<Self> {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if first != last {
                points.push(first);
            }
        }

        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            warn!("A contour contains non-finite points, ignoring it.");
            return None;
        }

        if !has_three_distinct(&points) {
            trace!("Dropping degenerate contour with {} points.", points.len());
            return None;
        }

        Some(Self { points })
    }

    /// The points of the loop, including the closing point.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The number of points, including the closing point.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; degenerate contours are never constructed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The axis-aligned bounding box of the loop.
    pub fn bounding_box(&self) -> Rect {
        let first = self.points[0];
        self.points
            .iter()
            .fold(Rect::from_points(first, first), |bbox, &p| bbox.union_pt(p))
    }

    /// The signed area from the shoelace formula.
    ///
    /// Positive for counter-clockwise loops in a y-up coordinate system.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        0.5 * sum
    }

    /// The orientation of the loop, derived from [`Contour::signed_area`].
    pub fn direction(&self) -> Direction {
        if self.signed_area() < 0.0 {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        }
    }

    /// The segments of the loop, in order, skipping zero-length ones.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        let n = self.points.len();
        (0..n)
            .map(move |i| Line::new(self.points[i], self.points[(i + 1) % n]))
            .filter(|line| line.p0 != line.p1)
    }

    /// The winding number of the loop around `p`.
    ///
    /// Counter-clockwise loops (in y-up terms) wind positively. Points exactly
    /// on the boundary may be counted either way.
    pub fn winding_number(&self, p: Point) -> i32 {
        let mut winding = 0;
        for line in self.lines() {
            let (a, b) = (line.p0, line.p1);
            let side = (b - a).cross(p - a);
            if a.y <= p.y && b.y > p.y && side > 0.0 {
                winding += 1;
            } else if b.y <= p.y && a.y > p.y && side < 0.0 {
                winding -= 1;
            }
        }
        winding
    }
}

fn has_three_distinct(points: &[Point]) -> bool {
    let Some(&first) = points.first() else {
        return false;
    };
    let Some(&second) = points.iter().find(|&&p| p != first) else {
        return false;
    };
    points.iter().any(|&p| p != first && p != second)
}

/// Turns a stream of [`PathCommand`]s into closed [`Contour`]s.
///
/// Curves are flattened within the builder's tolerance. Open subpaths are
/// closed implicitly when a new subpath starts or the builder is finished.
#[derive(Debug)]
pub struct ContourBuilder {
    tolerance: f64,
    contours: Vec<Contour>,
    current: Vec<Point>,
    // Where a command following `ClosePath` continues from.
    last_start: Option<Point>,
    scratch: Vec<Point>,
}

impl Default for ContourBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl ContourBuilder {
    /// Create a builder flattening curves within `tolerance`.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            contours: Vec::new(),
            current: Vec::new(),
            last_start: None,
            scratch: Vec::new(),
        }
    }

    /// The flattening tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Change the flattening tolerance for the commands that follow.
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
    }

    /// Consume a single command.
    ///
    /// Commands with non-finite coordinates are skipped.
    pub fn push(&mut self, command: &PathCommand) {
        if !command.is_finite() {
            warn!("A path command contains non-finite values, ignoring it.");
            return;
        }

        match *command {
            PathCommand::MoveTo(p) => self.move_to(p),
            PathCommand::LineTo(p) => self.line_to(p),
            PathCommand::QuadTo(p1, p2) => self.quad_to(p1, p2),
            PathCommand::CurveTo(p1, p2, p3) => self.curve_to(p1, p2, p3),
            PathCommand::ArcTo { p1, p2, radius } => self.arc_to(p1, p2, radius),
            PathCommand::Arc {
                center,
                radius,
                start_angle,
                sweep_angle,
            } => self.arc(center, radius, start_angle, sweep_angle),
            PathCommand::Ellipse {
                center,
                radii,
                rotation,
                start_angle,
                sweep_angle,
            } => self.ellipse(center, radii, rotation, start_angle, sweep_angle),
            PathCommand::Rect(rect) => self.rect(rect),
            PathCommand::RoundRect { rect, radii } => self.round_rect(rect, radii),
            PathCommand::ClosePath => self.close(),
        }
    }

    /// Consume every command of an iterator.
    pub fn extend<I>(&mut self, commands: I)
    where
        I: IntoIterator,
        I::Item: Borrow<PathCommand>,
    {
        for command in commands {
            self.push(command.borrow());
        }
    }

    /// Start a new subpath at `p`.
    pub fn move_to(&mut self, p: Point) {
        self.flush();
        self.current.push(p);
    }

    /// Draw a line to `p`.
    pub fn line_to(&mut self, p: Point) {
        self.begin_at(p);
        self.push_point(p);
    }

    /// Draw a quadratic Bézier.
    pub fn quad_to(&mut self, p1: Point, p2: Point) {
        let p0 = self.begin_at(p1);
        let tolerance = self.tolerance;
        self.append_flattened(|out| flatten::quad(p0, p1, p2, tolerance, out));
    }

    /// Draw a cubic Bézier.
    pub fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) {
        let p0 = self.begin_at(p1);
        let tolerance = self.tolerance;
        self.append_flattened(|out| flatten::cubic(p0, p1, p2, p3, tolerance, out));
    }

    /// Draw a circular fillet of `radius` in the corner formed by the current
    /// point, `p1` and `p2`.
    ///
    /// When the corner has no well-defined fillet (zero or negative radius,
    /// coincident points, or a turn of nearly 0° or 180°) this draws a straight
    /// line to `p1` instead.
    pub fn arc_to(&mut self, p1: Point, p2: Point, radius: f64) {
        let p0 = self.begin_at(p1);

        let d0 = p0 - p1;
        let d2 = p2 - p1;
        let (len0, len2) = (d0.hypot(), d2.hypot());
        if radius <= 0.0 || len0 == 0.0 || len2 == 0.0 {
            self.push_point(p1);
            return;
        }

        let u0 = d0 / len0;
        let u2 = d2 / len2;
        if u0.cross(u2).abs() < ARC_TO_EPSILON {
            self.push_point(p1);
            return;
        }

        // Half of the angle between the two rays leaving the corner.
        let half = 0.5 * u0.dot(u2).clamp(-1.0, 1.0).acos();
        let tangent_len = radius / half.tan();
        let bisector = u0 + u2;
        let center = p1 + bisector * (radius / half.sin() / bisector.hypot());
        let t0 = p1 + u0 * tangent_len;
        let t2 = p1 + u2 * tangent_len;

        if [center, t0, t2]
            .iter()
            .any(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            self.push_point(p1);
            return;
        }

        let start_angle = (t0 - center).atan2();
        let mut sweep_angle = (t2 - center).atan2() - start_angle;
        if sweep_angle > PI {
            sweep_angle -= TAU;
        } else if sweep_angle < -PI {
            sweep_angle += TAU;
        }

        self.push_point(t0);
        let arc = EllipticalArc {
            center,
            radii: Vec2::new(radius, radius),
            rotation: 0.0,
            start_angle,
            sweep_angle,
        };
        let tolerance = self.tolerance;
        self.append_flattened(|out| flatten::arc(&arc, tolerance, out));
    }

    /// Draw a circular arc.
    pub fn arc(&mut self, center: Point, radius: f64, start_angle: f64, sweep_angle: f64) {
        self.ellipse(
            center,
            Vec2::new(radius, radius),
            0.0,
            start_angle,
            sweep_angle,
        );
    }

    /// Draw an elliptical arc.
    ///
    /// If a subpath is open a line joins it to the arc's start, otherwise the
    /// arc's start begins a new subpath. The sweep is clamped to a full turn.
    pub fn ellipse(
        &mut self,
        center: Point,
        radii: Vec2,
        rotation: f64,
        start_angle: f64,
        sweep_angle: f64,
    ) {
        let arc = EllipticalArc {
            center,
            radii: Vec2::new(radii.x.abs(), radii.y.abs()),
            rotation,
            start_angle,
            sweep_angle: sweep_angle.clamp(-TAU, TAU),
        };

        let start = arc.start();
        if self.current.is_empty() {
            self.current.push(start);
        } else {
            self.push_point(start);
        }

        if arc.radii.x == 0.0 || arc.radii.y == 0.0 || arc.sweep_angle == 0.0 {
            return;
        }

        let tolerance = self.tolerance;
        self.append_flattened(|out| flatten::arc(&arc, tolerance, out));
    }

    /// Add a rectangle as a closed subpath.
    pub fn rect(&mut self, rect: Rect) {
        let r = rect.abs();
        self.move_to(Point::new(r.x0, r.y0));
        self.line_to(Point::new(r.x1, r.y0));
        self.line_to(Point::new(r.x1, r.y1));
        self.line_to(Point::new(r.x0, r.y1));
        self.close();
    }

    /// Add a rounded rectangle as a closed subpath.
    ///
    /// Each radius is clamped to `[0, min(width, height) / 2]`.
    pub fn round_rect(&mut self, rect: Rect, radii: RoundedRectRadii) {
        let r = rect.abs();
        let max = 0.5 * r.width().min(r.height());
        let clamp = |radius: f64| radius.clamp(0.0, max);
        let (tl, tr) = (clamp(radii.top_left), clamp(radii.top_right));
        let (br, bl) = (clamp(radii.bottom_right), clamp(radii.bottom_left));

        self.move_to(Point::new(r.x0 + tl, r.y0));
        self.line_to(Point::new(r.x1 - tr, r.y0));
        self.corner(Point::new(r.x1 - tr, r.y0 + tr), tr, -FRAC_PI_2);
        self.line_to(Point::new(r.x1, r.y1 - br));
        self.corner(Point::new(r.x1 - br, r.y1 - br), br, 0.0);
        self.line_to(Point::new(r.x0 + bl, r.y1));
        self.corner(Point::new(r.x0 + bl, r.y1 - bl), bl, FRAC_PI_2);
        self.line_to(Point::new(r.x0, r.y0 + tl));
        self.corner(Point::new(r.x0 + tl, r.y0 + tl), tl, PI);
        self.close();
    }

    fn corner(&mut self, center: Point, radius: f64, start_angle: f64) {
        if radius > 0.0 {
            self.arc(center, radius, start_angle, FRAC_PI_2);
        }
    }

    /// Close the current subpath.
    pub fn close(&mut self) {
        if let Some(&start) = self.current.first() {
            self.flush();
            self.last_start = Some(start);
        }
    }

    /// Commit any open subpath and return all contours built so far.
    pub fn finish(mut self) -> Vec<Contour> {
        self.flush();
        self.contours
    }

    /// Commit any open subpath and move the contours built so far into `out`,
    /// leaving the builder empty and ready for reuse.
    pub fn finish_into(&mut self, out: &mut Vec<Contour>) {
        self.flush();
        out.append(&mut self.contours);
        self.last_start = None;
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let points = core::mem::take(&mut self.current);
        if let Some(contour) = Contour::new(points) {
            self.contours.push(contour);
        }
    }

    /// Make sure a subpath is open and return its last point.
    fn begin_at(&mut self, p: Point) -> Point {
        if self.current.is_empty() {
            self.current.push(self.last_start.unwrap_or(p));
        }
        self.current[self.current.len() - 1]
    }

    fn push_point(&mut self, p: Point) {
        if self.current.last() != Some(&p) {
            self.current.push(p);
        }
    }

    fn append_flattened(&mut self, f: impl FnOnce(&mut Vec<Point>)) {
        let mut scratch = core::mem::take(&mut self.scratch);
        scratch.clear();
        f(&mut scratch);
        for &p in &scratch {
            self.push_point(p);
        }
        self.scratch = scratch;
    }
}

/// Build the contours of a command stream.
pub fn build<I>(commands: I, tolerance: f64) -> Vec<Contour>
where
    I: IntoIterator,
    I::Item: Borrow<PathCommand>,
{
    let mut builder = ContourBuilder::new(tolerance);
    builder.extend(commands);
    builder.finish()
}
