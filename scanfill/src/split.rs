// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting lines at their mutual intersections.
//!
//! After splitting, no two lines cross except at shared endpoints, which is
//! what the sweep needs to keep its active edges ordered between rows.

use crate::kurbo::{Line, Point};
use smallvec::SmallVec;

/// Lines whose direction cross product is below this fraction of the product of
/// their lengths are treated as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-12;

/// Line parameters within this distance of `0` or `1` are snapped to that end.
pub const PARAM_EPSILON: f64 = 1e-9;

/// A point where two lines meet, other than a shared endpoint.
///
/// A parameter of exactly `0.0` or `1.0` means the point is that endpoint of its
/// line, which then lies on (or within [`PARAM_EPSILON`] of) the other line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// The meeting point.
    pub point: Point,
    /// Parameter of the point along the first line.
    pub t: f64,
    /// Parameter of the point along the second line.
    pub u: f64,
}

impl Intersection {
    /// Whether the point lies strictly inside the first line.
    pub fn cuts_first(&self) -> bool {
        is_interior(self.t)
    }

    /// Whether the point lies strictly inside the second line.
    pub fn cuts_second(&self) -> bool {
        is_interior(self.u)
    }
}

/// Find where two lines meet, if at least one of them has to be cut there.
///
/// A crossing that falls within [`PARAM_EPSILON`] of an endpoint of one line is
/// moved onto that endpoint, so the other line is cut exactly where the first
/// one ends. Near-parallel and collinear lines, and lines meeting only at their
/// endpoints, report no intersection.
pub fn intersect(a: Line, b: Line) -> Option<Intersection> {
    let r = a.p1 - a.p0;
    let s = b.p1 - b.p0;
    let denom = r.cross(s);
    if denom.abs() <= PARALLEL_EPSILON * r.hypot() * s.hypot() {
        return None;
    }

    let qp = b.p0 - a.p0;
    let t = snap(qp.cross(s) / denom)?;
    let u = snap(qp.cross(r) / denom)?;

    let point = match (is_interior(t), is_interior(u)) {
        (false, false) => return None,
        (false, true) => endpoint(a, t),
        (true, false) => endpoint(b, u),
        (true, true) => a.p0.lerp(a.p1, t),
    };
    Some(Intersection { point, t, u })
}

fn snap(v: f64) -> Option<f64> {
    if !(-PARAM_EPSILON..=1.0 + PARAM_EPSILON).contains(&v) {
        None
    } else if v <= PARAM_EPSILON {
        Some(0.0)
    } else if v >= 1.0 - PARAM_EPSILON {
        Some(1.0)
    } else {
        Some(v)
    }
}

fn is_interior(v: f64) -> bool {
    v != 0.0 && v != 1.0
}

fn endpoint(line: Line, v: f64) -> Point {
    if v == 0.0 {
        line.p0
    } else {
        line.p1
    }
}

#[derive(Clone, Copy, Debug)]
struct Cut {
    t: f64,
    point: Point,
}

/// Splits lines at every pairwise crossing.
///
/// Holds per-line scratch storage so it can be reused across fills.
#[derive(Debug, Default)]
pub struct Splitter {
    cuts: Vec<SmallVec<[Cut; 2]>>,
}

impl Splitter {
    /// Create a new splitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `lines` at all of their mutual crossings, writing the result to `out`.
    ///
    /// `out` is cleared first. Both lines of a crossing are cut at the very same
    /// point, so the pieces meet exactly. A line that ends on another one (or
    /// close enough to be snapped onto it) cuts that line at its endpoint. This
    /// tests every pair of lines.
    pub fn split(&mut self, lines: &[Line], out: &mut Vec<Line>) {
        out.clear();
        for cuts in &mut self.cuts {
            cuts.clear();
        }
        if self.cuts.len() < lines.len() {
            self.cuts.resize_with(lines.len(), SmallVec::new);
        }

        for (i, &a) in lines.iter().enumerate() {
            let (a_min, a_max) = bounds(a);
            for (j, &b) in lines.iter().enumerate().skip(i + 1) {
                let (b_min, b_max) = bounds(b);
                if a_max.x < b_min.x || b_max.x < a_min.x || a_max.y < b_min.y || b_max.y < a_min.y
                {
                    continue;
                }
                let Some(hit) = intersect(a, b) else {
                    continue;
                };
                if hit.cuts_first() {
                    self.cuts[i].push(Cut {
                        t: hit.t,
                        point: hit.point,
                    });
                }
                if hit.cuts_second() {
                    self.cuts[j].push(Cut {
                        t: hit.u,
                        point: hit.point,
                    });
                }
            }
        }

        for (line, cuts) in lines.iter().zip(&mut self.cuts) {
            cuts.sort_unstable_by(|a, b| a.t.total_cmp(&b.t));
            let mut start = line.p0;
            for cut in cuts.iter() {
                if cut.point != start {
                    out.push(Line::new(start, cut.point));
                    start = cut.point;
                }
            }
            if start != line.p1 {
                out.push(Line::new(start, line.p1));
            }
        }
    }
}

/// Split `lines` at all of their mutual crossings.
pub fn split(lines: &[Line]) -> Vec<Line> {
    let mut out = Vec::with_capacity(lines.len());
    Splitter::new().split(lines, &mut out);
    out
}

fn bounds(line: Line) -> (Point, Point) {
    (
        Point::new(line.p0.x.min(line.p1.x), line.p0.y.min(line.p1.y)),
        Point::new(line.p0.x.max(line.p1.x), line.p0.y.max(line.p1.y)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Line {
        Line::new((x0, y0), (x1, y1))
    }

    #[test]
    fn crossing_diagonals() {
        let hit = intersect(line(0.0, 0.0, 10.0, 10.0), line(0.0, 10.0, 10.0, 0.0)).unwrap();
        assert_eq!(hit.point, Point::new(5.0, 5.0));
        assert_eq!(hit.t, 0.5);
        assert_eq!(hit.u, 0.5);
    }

    #[test]
    fn no_hit_cases() {
        // Parallel.
        assert!(intersect(line(0.0, 0.0, 10.0, 0.0), line(0.0, 1.0, 10.0, 1.0)).is_none());
        // Collinear overlap.
        assert!(intersect(line(0.0, 0.0, 10.0, 0.0), line(5.0, 0.0, 15.0, 0.0)).is_none());
        // Shared endpoint.
        assert!(intersect(line(0.0, 0.0, 10.0, 0.0), line(10.0, 0.0, 10.0, 10.0)).is_none());
        // Endpoint touching an endpoint, at an angle.
        assert!(intersect(line(0.0, 0.0, 10.0, 0.0), line(10.0, 1e-12, 20.0, 5.0)).is_none());
        // Would cross beyond the end of one line.
        assert!(intersect(line(0.0, 0.0, 4.0, 4.0), line(0.0, 10.0, 10.0, 0.0)).is_none());
        // Degenerate.
        assert!(intersect(line(1.0, 1.0, 1.0, 1.0), line(0.0, 10.0, 10.0, 0.0)).is_none());
    }

    #[test]
    fn t_junction_cuts_the_crossed_line() {
        let hit = intersect(line(0.0, 0.0, 10.0, 0.0), line(5.0, 0.0, 5.0, 10.0)).unwrap();
        assert_eq!(hit.point, Point::new(5.0, 0.0));
        assert_eq!((hit.t, hit.u), (0.5, 0.0));
        assert!(hit.cuts_first());
        assert!(!hit.cuts_second());

        let out = split(&[line(0.0, 0.0, 10.0, 0.0), line(5.0, 10.0, 5.0, 0.0)]);
        assert_eq!(
            out,
            vec![
                line(0.0, 0.0, 5.0, 0.0),
                line(5.0, 0.0, 10.0, 0.0),
                line(5.0, 10.0, 5.0, 0.0),
            ]
        );
    }

    #[test]
    fn crossing_near_an_endpoint_snaps_to_it() {
        // The second line passes 1e-9 from the origin, crossing the first line
        // right next to its start.
        let a = line(0.0, 0.0, 10.0, 10.0);
        let b = line(2.0 + 1e-9, -2.0, -8.0 + 1e-9, 8.0);
        let hit = intersect(a, b).unwrap();
        assert_eq!(hit.point, Point::ZERO);
        assert_eq!(hit.t, 0.0);
        assert!(hit.cuts_second());

        let out = split(&[a, b]);
        assert_eq!(
            out,
            vec![
                a,
                Line::new(b.p0, Point::ZERO),
                Line::new(Point::ZERO, b.p1),
            ]
        );
    }

    #[test]
    fn three_lines_through_one_point() {
        let lines = [
            line(0.0, 5.0, 10.0, 5.0),
            line(5.0, 0.0, 5.0, 10.0),
            line(0.0, 0.0, 10.0, 10.0),
        ];
        let out = split(&lines);
        let center = Point::new(5.0, 5.0);
        assert_eq!(out.len(), 6);
        assert_eq!(out.iter().filter(|l| l.p1 == center).count(), 3);
        assert_eq!(out.iter().filter(|l| l.p0 == center).count(), 3);
    }

    #[test]
    fn split_bowtie() {
        let lines = [
            line(0.0, 0.0, 10.0, 10.0),
            line(10.0, 10.0, 10.0, 0.0),
            line(10.0, 0.0, 0.0, 10.0),
            line(0.0, 10.0, 0.0, 0.0),
        ];
        let out = split(&lines);
        assert_eq!(out.len(), 6);
        let center = Point::new(5.0, 5.0);
        assert_eq!(out.iter().filter(|l| l.p1 == center).count(), 2);
        assert_eq!(out.iter().filter(|l| l.p0 == center).count(), 2);
    }

    #[test]
    fn cuts_are_ordered_along_the_line() {
        let lines = [
            line(0.0, 0.0, 10.0, 0.0),
            line(6.0, -1.0, 6.0, 1.0),
            line(2.0, -1.0, 2.0, 1.0),
            line(4.0, 1.0, 4.0, -1.0),
        ];
        let out = split(&lines);
        let xs: Vec<_> = out
            .iter()
            .filter(|l| l.p0.y == 0.0 && l.p1.y == 0.0)
            .map(|l| (l.p0.x, l.p1.x))
            .collect();
        let expected = [(0.0, 2.0), (2.0, 4.0), (4.0, 6.0), (6.0, 10.0)];
        assert_eq!(xs.len(), expected.len());
        for (&(x0, x1), &(e0, e1)) in xs.iter().zip(&expected) {
            assert!((x0 - e0).abs() < 1e-12 && (x1 - e1).abs() < 1e-12);
        }
    }

    #[test]
    fn splitter_is_reusable() {
        let mut splitter = Splitter::new();
        let mut out = Vec::new();
        splitter.split(
            &[line(0.0, 0.0, 10.0, 10.0), line(0.0, 10.0, 10.0, 0.0)],
            &mut out,
        );
        assert_eq!(out.len(), 4);
        splitter.split(&[line(0.0, 0.0, 10.0, 10.0)], &mut out);
        assert_eq!(out, vec![line(0.0, 0.0, 10.0, 10.0)]);
    }
}
