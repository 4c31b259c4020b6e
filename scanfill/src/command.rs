// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path drawing commands consumed by the contour builder.

use crate::kurbo::{PathEl, Point, Rect, RoundedRectRadii, Vec2};

/// A single path drawing command.
///
/// The command stream is read once per fill call and never retained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath, flushing any subpath that is still open.
    MoveTo(Point),
    /// Draw a line to the given point.
    LineTo(Point),
    /// Draw a quadratic Bézier with the given control point and end point.
    QuadTo(Point, Point),
    /// Draw a cubic Bézier with the given control points and end point.
    CurveTo(Point, Point, Point),
    /// Draw a circular fillet of `radius` tangent to the lines from the current
    /// point to `p1` and from `p1` to `p2`, like the canvas `arcTo`.
    ArcTo {
        /// The corner control point.
        p1: Point,
        /// The control point the outgoing tangent points towards.
        p2: Point,
        /// Fillet radius.
        radius: f64,
    },
    /// Draw a circular arc, continuing the current subpath if one is open.
    Arc {
        /// Center of the circle.
        center: Point,
        /// Radius of the circle.
        radius: f64,
        /// Angle of the start point, in radians.
        start_angle: f64,
        /// Signed angle swept from the start point, in radians.
        sweep_angle: f64,
    },
    /// Draw an elliptical arc, continuing the current subpath if one is open.
    Ellipse {
        /// Center of the ellipse.
        center: Point,
        /// Radii along the (rotated) x and y axes.
        radii: Vec2,
        /// Rotation of the ellipse's x axis, in radians.
        rotation: f64,
        /// Parametric angle of the start point, in radians.
        start_angle: f64,
        /// Signed parametric angle swept from the start point, in radians.
        sweep_angle: f64,
    },
    /// Add a closed rectangle as its own subpath.
    Rect(Rect),
    /// Add a closed rectangle with rounded corners as its own subpath.
    RoundRect {
        /// The outer bounds.
        rect: Rect,
        /// Corner radii, clamped to half the smaller side when built.
        radii: RoundedRectRadii,
    },
    /// Close the current subpath.
    ClosePath,
}

impl PathCommand {
    /// A full ellipse as a closed subpath.
    pub fn full_ellipse(center: Point, radii: Vec2, rotation: f64) -> [Self; 3] {
        [
            Self::MoveTo(center + radii.x * Vec2::from_angle(rotation)),
            Self::Ellipse {
                center,
                radii,
                rotation,
                start_angle: 0.0,
                sweep_angle: core::f64::consts::TAU,
            },
            Self::ClosePath,
        ]
    }

    /// A full circle as a closed subpath.
    pub fn circle(center: Point, radius: f64) -> [Self; 3] {
        Self::full_ellipse(center, Vec2::new(radius, radius), 0.0)
    }

    /// Whether every coordinate and scalar of this command is finite.
    pub fn is_finite(&self) -> bool {
        fn pt(p: Point) -> bool {
            p.x.is_finite() && p.y.is_finite()
        }
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => pt(p),
            Self::QuadTo(p1, p2) => pt(p1) && pt(p2),
            Self::CurveTo(p1, p2, p3) => pt(p1) && pt(p2) && pt(p3),
            Self::ArcTo { p1, p2, radius } => pt(p1) && pt(p2) && radius.is_finite(),
            Self::Arc {
                center,
                radius,
                start_angle,
                sweep_angle,
            } => {
                pt(center)
                    && radius.is_finite()
                    && start_angle.is_finite()
                    && sweep_angle.is_finite()
            }
            Self::Ellipse {
                center,
                radii,
                rotation,
                start_angle,
                sweep_angle,
            } => {
                pt(center)
                    && radii.x.is_finite()
                    && radii.y.is_finite()
                    && rotation.is_finite()
                    && start_angle.is_finite()
                    && sweep_angle.is_finite()
            }
            Self::Rect(rect) => {
                pt(Point::new(rect.x0, rect.y0)) && pt(Point::new(rect.x1, rect.y1))
            }
            Self::RoundRect { rect, radii } => {
                pt(Point::new(rect.x0, rect.y0))
                    && pt(Point::new(rect.x1, rect.y1))
                    && radii.top_left.is_finite()
                    && radii.top_right.is_finite()
                    && radii.bottom_right.is_finite()
                    && radii.bottom_left.is_finite()
            }
            Self::ClosePath => true,
        }
    }
}

impl From<PathEl> for PathCommand {
    fn from(el: PathEl) -> Self {
        match el {
            PathEl::MoveTo(p) => Self::MoveTo(p),
            PathEl::LineTo(p) => Self::LineTo(p),
            PathEl::QuadTo(p1, p2) => Self::QuadTo(p1, p2),
            PathEl::CurveTo(p1, p2, p3) => Self::CurveTo(p1, p2, p3),
            PathEl::ClosePath => Self::ClosePath,
        }
    }
}

/// Convert kurbo path elements, e.g. from a `BezPath` or a `Shape`, into commands.
pub fn from_path_elements(
    path: impl IntoIterator<Item = PathEl>,
) -> impl Iterator<Item = PathCommand> {
    path.into_iter().map(PathCommand::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kurbo::BezPath;

    #[test]
    fn converts_bez_path() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.quad_to((1.0, 2.0), (2.0, 0.0));
        path.close_path();

        let commands: Vec<_> = from_path_elements(path).collect();
        assert_eq!(
            commands,
            vec![
                PathCommand::MoveTo(Point::new(0.0, 0.0)),
                PathCommand::QuadTo(Point::new(1.0, 2.0), Point::new(2.0, 0.0)),
                PathCommand::ClosePath,
            ]
        );
    }

    #[test]
    fn finiteness() {
        assert!(PathCommand::LineTo(Point::new(1.0, 2.0)).is_finite());
        assert!(!PathCommand::LineTo(Point::new(f64::NAN, 2.0)).is_finite());
        assert!(!PathCommand::ArcTo {
            p1: Point::ZERO,
            p2: Point::new(1.0, 0.0),
            radius: f64::INFINITY,
        }
        .is_finite());
        assert!(PathCommand::ClosePath.is_finite());
    }
}
