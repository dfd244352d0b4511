// Copyright 2025 Lars Brubaker
// License: MIT
//
// Errors reported before the sweep starts. Geometric degeneracies inside a
// valid input are absorbed by the sweep and never show up here.

use thiserror::Error;

use crate::geom::Real;
use crate::graph::SiteIdx;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoronoiError {
    #[error("no sites to compute a diagram for")]
    NoSites,

    #[error("invalid bounds: width {width} and height {height} must be finite and positive")]
    InvalidBounds { width: Real, height: Real },

    #[error("site {index} has a non-finite coordinate")]
    NonFiniteSite { index: SiteIdx },

    #[error("site {index} at ({x}, {y}) lies outside the bounds")]
    SiteOutOfBounds { index: SiteIdx, x: Real, y: Real },

    #[error("invalid epsilon {epsilon}: must be finite and positive")]
    InvalidEpsilon { epsilon: Real },
}

pub type VoronoiResult<T> = Result<T, VoronoiError>;
