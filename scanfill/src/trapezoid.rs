// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trapezoids produced by the sweep, and the triangles they decompose into.

use crate::kurbo::Point;
use crate::sweep::Edge;
use bytemuck::{Pod, Zeroable};

/// A filled span between two sweep rows.
///
/// The top and bottom sides are horizontal; "top" is the smaller y.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trapezoid {
    /// Left end of the top side.
    pub top_left: Point,
    /// Right end of the top side.
    pub top_right: Point,
    /// Right end of the bottom side.
    pub bottom_right: Point,
    /// Left end of the bottom side.
    pub bottom_left: Point,
}

impl Trapezoid {
    /// The trapezoid bounded by `left` and `right` between rows `y0` and `y1`.
    ///
    /// Both edges must span the rows.
    pub fn from_edges(left: &Edge, right: &Edge, y0: f64, y1: f64) -> Self {
        Self {
            top_left: Point::new(left.x_at(y0), y0),
            top_right: Point::new(right.x_at(y0), y0),
            bottom_right: Point::new(right.x_at(y1), y1),
            bottom_left: Point::new(left.x_at(y1), y1),
        }
    }

    /// The length of the top side.
    pub fn top_width(&self) -> f64 {
        self.top_right.x - self.top_left.x
    }

    /// The length of the bottom side.
    pub fn bottom_width(&self) -> f64 {
        self.bottom_right.x - self.bottom_left.x
    }

    /// The distance between the top and bottom sides.
    pub fn height(&self) -> f64 {
        self.bottom_left.y - self.top_left.y
    }

    /// The enclosed area.
    pub fn area(&self) -> f64 {
        0.5 * (self.top_width() + self.bottom_width()) * self.height()
    }

    /// Whether the trapezoid encloses no area.
    pub fn is_empty(&self) -> bool {
        (self.top_width() <= 0.0 && self.bottom_width() <= 0.0) || self.height() <= 0.0
    }

    /// Split into two triangles.
    ///
    /// The order is always `(top_left, bottom_left, top_right)` followed by
    /// `(top_right, bottom_left, bottom_right)`.
    pub fn triangles(&self) -> [Triangle; 2] {
        [
            Triangle::new(self.top_left, self.bottom_left, self.top_right),
            Triangle::new(self.top_right, self.bottom_left, self.bottom_right),
        ]
    }
}

/// A triangle, the final output unit of a fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    /// The corners.
    pub points: [Point; 3],
}

impl Triangle {
    /// Create a new triangle.
    pub const fn new(a: Point, b: Point, c: Point) -> Self {
        Self { points: [a, b, c] }
    }

    /// The signed area; positive when the corners wind counter-clockwise in a
    /// y-up coordinate system.
    pub fn signed_area(&self) -> f64 {
        let [a, b, c] = self.points;
        0.5 * (b - a).cross(c - a)
    }

    /// The area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }
}

/// A triangle corner in a form that can be copied straight into a GPU buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
#[repr(C)]
pub struct Vertex {
    /// The x coordinate.
    pub x: f32,
    /// The y coordinate.
    pub y: f32,
}

static_assertions::const_assert_eq!(core::mem::size_of::<Vertex>(), 8);

impl From<Point> for Vertex {
    fn from(p: Point) -> Self {
        Self {
            x: p.x as f32,
            y: p.y as f32,
        }
    }
}
