// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors that can occur when configuring a fill.
///
/// Malformed geometry never produces an error: degenerate or non-finite
/// primitives are skipped and the rest of the path is still filled.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The flattening tolerance was zero, negative or not finite.
    #[error("Flattening tolerance must be a positive finite number, got {0}")]
    InvalidTolerance(f64),
    /// A raw fill rule value did not name a known fill rule.
    #[error("Unknown fill rule value {0}")]
    InvalidFillRule(u32),
}
