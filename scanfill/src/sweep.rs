// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scanline sweep that turns non-crossing lines into filled trapezoids.

use crate::kurbo::{Line, Point};
use crate::options::is_inside;
use crate::trapezoid::Trapezoid;
use peniko::Fill;

/// A non-horizontal line, oriented so that it runs downwards (increasing y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    /// The endpoint with the smaller y.
    pub start: Point,
    /// The endpoint with the larger y.
    pub end: Point,
    /// `dx / dy`, used to find x at a given y.
    pub inv_slope: f64,
    /// `+1` if the line ran downwards as authored, `-1` if it ran upwards.
    ///
    /// Set before `start` and `end` are reordered, since the reordering loses
    /// the direction the winding number depends on.
    pub winding: i32,
}

impl Edge {
    /// Create an edge from a line.
    ///
    /// Horizontal lines contribute nothing to the sweep and, like lines with
    /// non-finite coordinates, yield `None`.
    pub fn from_line(line: Line) -> Option<Self> {
        let (p0, p1) = (line.p0, line.p1);
        if !(p0.x.is_finite() && p0.y.is_finite() && p1.x.is_finite() && p1.y.is_finite()) {
            return None;
        }
        if p0.y == p1.y {
            return None;
        }

        let (start, end, winding) = if p0.y < p1.y {
            (p0, p1, 1)
        } else {
            (p1, p0, -1)
        };

        Some(Self {
            start,
            end,
            inv_slope: (end.x - start.x) / (end.y - start.y),
            winding,
        })
    }

    /// The smallest y covered by the edge.
    #[inline]
    pub fn y_min(&self) -> f64 {
        self.start.y
    }

    /// The largest y covered by the edge.
    #[inline]
    pub fn y_max(&self) -> f64 {
        self.end.y
    }

    /// The x coordinate of the edge at `y`.
    ///
    /// Exact at the endpoints.
    #[inline]
    pub fn x_at(&self, y: f64) -> f64 {
        if y == self.start.y {
            self.start.x
        } else if y == self.end.y {
            self.end.x
        } else {
            self.start.x + (y - self.start.y) * self.inv_slope
        }
    }
}

/// The sweep engine.
///
/// Owns its scratch buffers so they can be reused across fills.
#[derive(Debug, Default)]
pub struct Sweep {
    edges: Vec<Edge>,
    rows: Vec<f64>,
    active: Vec<usize>,
}

impl Sweep {
    /// Create a new sweep.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sweep `lines` and append a trapezoid to `out` for every inside span.
    ///
    /// `lines` must not cross each other except at endpoints; see
    /// [`split`](crate::split).
    pub fn run(&mut self, lines: &[Line], fill_rule: Fill, out: &mut Vec<Trapezoid>) {
        self.edges.clear();
        self.edges
            .extend(lines.iter().filter_map(|&line| Edge::from_line(line)));
        self.edges
            .sort_unstable_by(|a, b| a.y_min().total_cmp(&b.y_min()));

        self.rows.clear();
        for edge in &self.edges {
            self.rows.push(edge.y_min());
            self.rows.push(edge.y_max());
        }
        self.rows.sort_unstable_by(f64::total_cmp);
        self.rows.dedup();

        self.active.clear();
        let edges = &self.edges;
        let mut next = 0;

        for row in self.rows.windows(2) {
            let (y0, y1) = (row[0], row[1]);

            self.active.retain(|&i| edges[i].y_max() > y0);
            // Every `y_min` is a row, so this only admits edges starting at `y0`.
            while next < edges.len() && edges[next].y_min() <= y0 {
                self.active.push(next);
                next += 1;
            }

            self.active.sort_unstable_by(|&a, &b| {
                let (a, b) = (&edges[a], &edges[b]);
                a.x_at(y0)
                    .total_cmp(&b.x_at(y0))
                    .then_with(|| a.x_at(y1).total_cmp(&b.x_at(y1)))
            });

            let mut winding = 0;
            for pair in self.active.windows(2) {
                let (left, right) = (&edges[pair[0]], &edges[pair[1]]);
                winding += left.winding;
                if !is_inside(fill_rule, winding) {
                    continue;
                }
                let trapezoid = Trapezoid::from_edges(left, right, y0, y1);
                if !trapezoid.is_empty() {
                    out.push(trapezoid);
                }
            }
        }
    }
}

/// Sweep `lines` into the trapezoids that are inside according to `fill_rule`.
pub fn sweep(lines: &[Line], fill_rule: Fill) -> Vec<Trapezoid> {
    let mut out = Vec::new();
    Sweep::new().run(lines, fill_rule, &mut out);
    out
}
