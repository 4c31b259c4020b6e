// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening curves into line segments by recursive subdivision.
//!
//! Every function here appends the points following the curve's start point to
//! `out`; the start point itself is assumed to already be there. The last
//! point appended is always exactly the curve's end point.

use crate::kurbo::{Point, Vec2};
use core::f64::consts::FRAC_PI_2;

/// The max subdivision depth.
///
/// Bounds the number of segments a single curve can produce to `2^MAX_DEPTH`,
/// which only matters for huge coordinates with a tiny tolerance.
pub const MAX_DEPTH: u32 = 16;

/// The smallest tolerance used for a curve, as a fraction of its size.
///
/// A requested tolerance below this is raised to it, so the number of segments
/// a curve produces doesn't grow without bound as the tolerance shrinks.
pub const MIN_RELATIVE_TOLERANCE: f64 = 1e-6;

fn curve_tolerance(tolerance: f64, size: f64) -> f64 {
    tolerance.max(size * MIN_RELATIVE_TOLERANCE)
}

/// Flatten a quadratic Bézier.
///
/// For a quadratic, the distance between a curve point and the chord point at
/// the same parameter peaks at `t = 0.5`, so the midpoint test alone bounds
/// the error by `tolerance`.
pub fn quad(p0: Point, p1: Point, p2: Point, tolerance: f64, out: &mut Vec<Point>) {
    let size = (p1 - p0).hypot().max((p2 - p0).hypot());
    let tolerance = curve_tolerance(tolerance, size);
    quad_rec(p0, p1, p2, tolerance * tolerance, 0, out);
}

fn quad_rec(p0: Point, p1: Point, p2: Point, tol_2: f64, depth: u32, out: &mut Vec<Point>) {
    let p01 = p0.midpoint(p1);
    let p12 = p1.midpoint(p2);
    let mid = p01.midpoint(p12);

    if depth >= MAX_DEPTH || (mid - p0.midpoint(p2)).hypot2() <= tol_2 {
        out.push(p2);
        return;
    }

    quad_rec(p0, p01, mid, tol_2, depth + 1, out);
    quad_rec(mid, p12, p2, tol_2, depth + 1, out);
}

/// Flatten a cubic Bézier.
///
/// Besides the midpoint test, both control points must lie within
/// `tolerance` of the chord. A cubic with an inflection can pass through the
/// chord's midpoint while bulging away on both sides of it.
pub fn cubic(p0: Point, p1: Point, p2: Point, p3: Point, tolerance: f64, out: &mut Vec<Point>) {
    let size = [p1, p2, p3]
        .iter()
        .map(|&p| (p - p0).hypot())
        .fold(0.0, f64::max);
    let tolerance = curve_tolerance(tolerance, size);
    cubic_rec(p0, p1, p2, p3, tolerance * tolerance, 0, out);
}

fn cubic_rec(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    tol_2: f64,
    depth: u32,
    out: &mut Vec<Point>,
) {
    let p01 = p0.midpoint(p1);
    let p12 = p1.midpoint(p2);
    let p23 = p2.midpoint(p3);
    let p012 = p01.midpoint(p12);
    let p123 = p12.midpoint(p23);
    let mid = p012.midpoint(p123);

    let flat = (mid - p0.midpoint(p3)).hypot2() <= tol_2
        && dist_2_to_segment(p1, p0, p3) <= tol_2
        && dist_2_to_segment(p2, p0, p3) <= tol_2;

    if depth >= MAX_DEPTH || flat {
        out.push(p3);
        return;
    }

    cubic_rec(p0, p01, p012, mid, tol_2, depth + 1, out);
    cubic_rec(mid, p123, p23, p3, tol_2, depth + 1, out);
}

/// An elliptical arc in center parameterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EllipticalArc {
    /// Center of the ellipse.
    pub center: Point,
    /// Radii along the rotated x and y axes.
    pub radii: Vec2,
    /// Rotation of the x axis, in radians.
    pub rotation: f64,
    /// Parametric start angle, in radians.
    pub start_angle: f64,
    /// Signed parametric sweep, in radians.
    pub sweep_angle: f64,
}

impl EllipticalArc {
    /// The point at parametric angle `angle`.
    pub fn point_at(&self, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        let (rot_sin, rot_cos) = self.rotation.sin_cos();
        let x = self.radii.x * cos;
        let y = self.radii.y * sin;
        self.center + Vec2::new(x * rot_cos - y * rot_sin, x * rot_sin + y * rot_cos)
    }

    /// The start point.
    pub fn start(&self) -> Point {
        self.point_at(self.start_angle)
    }

    /// The end point.
    pub fn end(&self) -> Point {
        self.point_at(self.start_angle + self.sweep_angle)
    }
}

/// Flatten an elliptical arc.
///
/// The arc is first cut into pieces of at most a quarter turn so that the
/// midpoint test never sees a piece whose chord midpoint is the center.
pub fn arc(arc: &EllipticalArc, tolerance: f64, out: &mut Vec<Point>) {
    let tolerance = curve_tolerance(tolerance, arc.radii.x.abs().max(arc.radii.y.abs()));
    let tol_2 = tolerance * tolerance;
    let pieces = (arc.sweep_angle.abs() / FRAC_PI_2).ceil().max(1.0) as u32;
    let step = arc.sweep_angle / f64::from(pieces);

    let mut a0 = arc.start_angle;
    let mut p0 = arc.start();
    for i in 1..=pieces {
        let a1 = if i == pieces {
            arc.start_angle + arc.sweep_angle
        } else {
            arc.start_angle + step * f64::from(i)
        };
        let p1 = arc.point_at(a1);
        arc_rec(arc, a0, p0, a1, p1, tol_2, 0, out);
        a0 = a1;
        p0 = p1;
    }
}

#[expect(clippy::too_many_arguments, reason = "recursion state")]
fn arc_rec(
    arc: &EllipticalArc,
    a0: f64,
    p0: Point,
    a1: f64,
    p1: Point,
    tol_2: f64,
    depth: u32,
    out: &mut Vec<Point>,
) {
    let am = 0.5 * (a0 + a1);
    let pm = arc.point_at(am);

    if depth >= MAX_DEPTH || (pm - p0.midpoint(p1)).hypot2() <= tol_2 {
        out.push(p1);
        return;
    }

    arc_rec(arc, a0, p0, am, pm, tol_2, depth + 1, out);
    arc_rec(arc, am, pm, a1, p1, tol_2, depth + 1, out);
}

/// Squared distance from `p` to the segment `a..b`.
pub(crate) fn dist_2_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_2 = ab.hypot2();
    if len_2 == 0.0 {
        return (p - a).hypot2();
    }
    let t = ((p - a).dot(ab) / len_2).clamp(0.0, 1.0);
    (p - a.lerp(b, t)).hypot2()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;

    /// The largest distance between samples of `curve` and the polyline.
    fn max_deviation(polyline: &[Point], curve: impl Fn(f64) -> Point) -> f64 {
        let mut worst: f64 = 0.0;
        for i in 0..=1000 {
            let p = curve(f64::from(i) / 1000.0);
            let nearest = polyline
                .windows(2)
                .map(|w| dist_2_to_segment(p, w[0], w[1]))
                .fold(f64::INFINITY, f64::min);
            worst = worst.max(nearest.sqrt());
        }
        worst
    }

    fn eval_cubic(p: [Point; 4], t: f64) -> Point {
        let mt = 1.0 - t;
        let v = p[0].to_vec2() * (mt * mt * mt)
            + p[1].to_vec2() * (3.0 * mt * mt * t)
            + p[2].to_vec2() * (3.0 * mt * t * t)
            + p[3].to_vec2() * (t * t * t);
        v.to_point()
    }

    fn eval_quad(p: [Point; 3], t: f64) -> Point {
        let mt = 1.0 - t;
        let v = p[0].to_vec2() * (mt * mt)
            + p[1].to_vec2() * (2.0 * mt * t)
            + p[2].to_vec2() * (t * t);
        v.to_point()
    }

    #[test]
    fn quad_within_tolerance() {
        let p = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 100.0),
            Point::new(100.0, 0.0),
        ];
        for tolerance in [1.0, 0.25, 0.01] {
            let mut out = vec![p[0]];
            quad(p[0], p[1], p[2], tolerance, &mut out);
            assert_eq!(*out.last().unwrap(), p[2]);
            assert!(max_deviation(&out, |t| eval_quad(p, t)) <= tolerance + 1e-9);
        }
    }

    #[test]
    fn cubic_within_tolerance() {
        let p = [
            Point::new(10.0, 10.0),
            Point::new(30.0, 90.0),
            Point::new(70.0, -40.0),
            Point::new(90.0, 50.0),
        ];
        for tolerance in [2.0, 0.25, 0.05] {
            let mut out = vec![p[0]];
            cubic(p[0], p[1], p[2], p[3], tolerance, &mut out);
            assert_eq!(*out.last().unwrap(), p[3]);
            assert!(max_deviation(&out, |t| eval_cubic(p, t)) <= tolerance + 1e-9);
        }
    }

    #[test]
    fn symmetric_s_curve_is_subdivided() {
        // The curve's midpoint sits exactly on its chord.
        let p = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, -10.0),
            Point::new(30.0, 0.0),
        ];
        let mut out = vec![p[0]];
        cubic(p[0], p[1], p[2], p[3], 0.25, &mut out);
        assert!(out.len() > 2);
        assert!(max_deviation(&out, |t| eval_cubic(p, t)) <= 0.25 + 1e-9);
    }

    #[test]
    fn straight_curve_is_one_segment() {
        let (a, b) = (Point::new(0.0, 0.0), Point::new(9.0, 0.0));
        let mut out = vec![a];
        cubic(a, Point::new(3.0, 0.0), Point::new(6.0, 0.0), b, 0.25, &mut out);
        assert_eq!(out, vec![a, b]);
    }

    #[test]
    fn fewer_segments_at_coarser_tolerance() {
        let p = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            Point::new(100.0, 100.0),
            Point::new(100.0, 0.0),
        ];
        let mut fine = vec![p[0]];
        cubic(p[0], p[1], p[2], p[3], 0.01, &mut fine);
        let mut coarse = vec![p[0]];
        cubic(p[0], p[1], p[2], p[3], 1.0, &mut coarse);
        assert!(coarse.len() < fine.len());
    }

    #[test]
    fn circle_arc_within_tolerance() {
        let a = EllipticalArc {
            center: Point::new(50.0, 50.0),
            radii: Vec2::new(40.0, 40.0),
            rotation: 0.0,
            start_angle: 0.0,
            sweep_angle: 2.0 * PI,
        };
        let mut out = vec![a.start()];
        arc(&a, 0.1, &mut out);
        assert_eq!(*out.last().unwrap(), a.end());
        let deviation = max_deviation(&out, |t| a.point_at(t * 2.0 * PI));
        assert!(deviation <= 0.1 + 1e-9);
    }

    #[test]
    fn tiny_tolerance_is_relative_to_curve_size() {
        let a = EllipticalArc {
            center: Point::ZERO,
            radii: Vec2::new(1000.0, 1000.0),
            rotation: 0.0,
            start_angle: 0.0,
            sweep_angle: 2.0 * PI,
        };
        let mut out = vec![a.start()];
        arc(&a, 1e-9, &mut out);
        // Far from the `4 << MAX_DEPTH` segments the depth cap would allow.
        assert!(out.len() <= 4 * 1024 + 1, "{} points", out.len());
        let deviation = max_deviation(&out, |t| a.point_at(t * 2.0 * PI));
        assert!(deviation <= 1000.0 * MIN_RELATIVE_TOLERANCE + 1e-9);

        let p = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 1e4),
            Point::new(1e4, 1e4),
            Point::new(1e4, 0.0),
        ];
        let mut out = vec![p[0]];
        cubic(p[0], p[1], p[2], p[3], 1e-12, &mut out);
        assert!(out.len() < 1 << 12, "{} points", out.len());
    }

    #[test]
    fn negative_sweep_runs_backwards() {
        let a = EllipticalArc {
            center: Point::ZERO,
            radii: Vec2::new(10.0, 5.0),
            rotation: 0.3,
            start_angle: 0.0,
            sweep_angle: -PI,
        };
        let mut out = vec![a.start()];
        arc(&a, 0.25, &mut out);
        let end = a.point_at(-PI);
        assert!((*out.last().unwrap() - end).hypot() < 1e-12);
        assert!(out.len() > 4);
    }
}
