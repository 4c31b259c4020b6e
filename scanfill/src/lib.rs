// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanfill turns vector paths into filled triangles on the CPU, without any native 2D API.
//!
//! A fill runs four stages, each consuming the previous stage's output:
//!
//! 1. The [contour builder](contour::ContourBuilder) flattens [`PathCommand`]s into closed
//!    polygon loops, within a caller-supplied tolerance.
//! 2. The [splitter](split::Splitter) cuts every line at its crossings with every other line,
//!    so no two lines cross except at shared endpoints.
//! 3. The [sweep](sweep::Sweep) walks a horizontal line over every distinct y coordinate,
//!    accumulates the winding number between adjacent edges and applies the [`Fill`] rule.
//! 4. Each inside span becomes a [`Trapezoid`], which is split into two [`Triangle`]s.
//!
//! The triangles are a renderer-agnostic intermediate form: antialiasing and compositing
//! are up to whoever consumes them.
//!
//! # Usage
//!
//! ```
//! use scanfill::kurbo::Point;
//! use scanfill::{FillOptions, PathCommand};
//!
//! let commands = [
//!     PathCommand::MoveTo(Point::new(0.0, 0.0)),
//!     PathCommand::LineTo(Point::new(10.0, 0.0)),
//!     PathCommand::LineTo(Point::new(10.0, 10.0)),
//!     PathCommand::LineTo(Point::new(0.0, 10.0)),
//!     PathCommand::ClosePath,
//! ];
//! let tessellation = scanfill::fill(&commands, &FillOptions::even_odd()).unwrap();
//! assert_eq!(tessellation.triangles.len(), 2);
//! assert_eq!(tessellation.area(), 100.0);
//! ```
//!
//! A [`Tessellator`] keeps its scratch buffers between fills and should be reused when
//! filling many paths.
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod command;
pub mod contour;
mod error;
pub mod flatten;
pub mod options;
pub mod split;
pub mod sweep;
pub mod trapezoid;

pub use peniko;
pub use peniko::kurbo;
pub use peniko::Fill;

pub use command::PathCommand;
pub use contour::{Contour, ContourBuilder, Direction};
pub use error::Error;
pub use options::{FillOptions, DEFAULT_TOLERANCE};
pub use trapezoid::{Trapezoid, Triangle, Vertex};

use core::borrow::Borrow;
use kurbo::Line;
use log::debug;

/// The result of a fill.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tessellation {
    /// The closed contours the path was flattened into.
    pub contours: Vec<Contour>,
    /// The inside spans found by the sweep.
    pub trapezoids: Vec<Trapezoid>,
    /// Two triangles per trapezoid, in the same order.
    pub triangles: Vec<Triangle>,
}

impl Tessellation {
    /// The total area covered by the triangles.
    pub fn area(&self) -> f64 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Whether the fill produced no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The triangle corners as a flat vertex list, three per triangle.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.triangles
            .iter()
            .flat_map(|triangle| triangle.points)
            .map(Vertex::from)
            .collect()
    }
}

/// Fills paths, reusing its intermediate buffers from one fill to the next.
///
/// Nothing but allocations carries over between fills.
#[derive(Debug, Default)]
pub struct Tessellator {
    builder: ContourBuilder,
    lines: Vec<Line>,
    split_lines: Vec<Line>,
    splitter: split::Splitter,
    sweep: sweep::Sweep,
}

impl Tessellator {
    /// Create a new tessellator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill a path given as a sequence of commands.
    ///
    /// Degenerate or non-finite parts of the path are skipped rather than
    /// failing the fill; an error is only returned for invalid `options`.
    pub fn fill<I>(&mut self, commands: I, options: &FillOptions) -> Result<Tessellation, Error>
    where
        I: IntoIterator,
        I::Item: Borrow<PathCommand>,
    {
        options.validate()?;

        self.builder.set_tolerance(options.tolerance);
        self.builder.extend(commands);
        let mut contours = Vec::new();
        self.builder.finish_into(&mut contours);

        self.lines.clear();
        self.lines
            .extend(contours.iter().flat_map(|contour| contour.lines()));
        self.splitter.split(&self.lines, &mut self.split_lines);

        let mut trapezoids = Vec::new();
        self.sweep
            .run(&self.split_lines, options.fill_rule, &mut trapezoids);
        let triangles: Vec<Triangle> = trapezoids.iter().flat_map(Trapezoid::triangles).collect();

        debug!(
            "Filled {} contours: {} lines, {} after splitting, {} trapezoids.",
            contours.len(),
            self.lines.len(),
            self.split_lines.len(),
            trapezoids.len()
        );

        Ok(Tessellation {
            contours,
            trapezoids,
            triangles,
        })
    }

    /// Fill a kurbo path, e.g. a `BezPath` or the path elements of a `Shape`.
    pub fn fill_path(
        &mut self,
        path: impl IntoIterator<Item = kurbo::PathEl>,
        options: &FillOptions,
    ) -> Result<Tessellation, Error> {
        self.fill(command::from_path_elements(path), options)
    }
}

/// Fill a path given as a sequence of commands.
///
/// See [`Tessellator::fill`].
pub fn fill<I>(commands: I, options: &FillOptions) -> Result<Tessellation, Error>
where
    I: IntoIterator,
    I::Item: Borrow<PathCommand>,
{
    Tessellator::new().fill(commands, options)
}
