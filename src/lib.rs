//! **Reframe** converts batches of spatial coordinates between
//! geodetic/projected/geocentric reference systems, including changes of
//! geometric datum. It is the computational core a "reproject these points
//! from system A to system B" operation reduces to: axis normalization,
//! projection evaluation, vertical-unit and geoid handling, and datum
//! shifts via Helmert parameters or tabulated grids, sequenced over a
//! mutable batch of points.
//!
//! What it is not: a projection library, a definition-string parser, or a
//! grid-file reader. Projections and grids enter through the capability
//! traits [`Projection`], [`VerticalGrid`] and [`HorizontalGrid`], so any
//! implementation of those can take part in a transformation.
//!
//! # Example
//!
//! ```
//! use reframe::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Two reference systems on the same ellipsoid and datum
//!     let geographic = Crs::geographic(Ellipsoid::named("WGS84")?)?;
//!     let geocentric = Crs::geocentric(Ellipsoid::named("WGS84")?)?;
//!
//!     // On the equator, at the prime meridian, on the ellipsoid surface
//!     let mut points = [Coor3D::origin()];
//!     transform(&geographic, &geocentric, &mut points)?;
//!
//!     // ...where the geocentric X-axis pierces the ellipsoid at distance a
//!     assert_eq!(points[0][0], 6_378_137.0);
//!     assert_eq!(points[0][2], 0.0);
//!     Ok(())
//! }
//! ```

pub mod coordinate;
pub mod crs;
pub mod datum;
pub mod ellipsoid;
mod math;
pub mod pipeline;

use std::io;
use thiserror::Error;

pub use crate::coordinate::Coor3D;
pub use crate::coordinate::CoordinateSet;
pub use crate::coordinate::StridedSet;
pub use crate::crs::Axes;
pub use crate::crs::Crs;
pub use crate::crs::Dimensionality;
pub use crate::crs::HorizontalGrid;
pub use crate::crs::Projection;
pub use crate::crs::VerticalGrid;
pub use crate::datum::DatumShift;
pub use crate::datum::GridHandle;
pub use crate::ellipsoid::Ellipsoid;
pub use crate::pipeline::transform;

/// Marker value carried in the first (and second) element of a coordinate
/// that could not be converted. Points arriving with this marker are left
/// untouched by every pipeline stage, so a partially failed batch can be
/// passed through further transformations without losing track of which
/// points are dead. Deliberately neither NaN nor infinity: both of those
/// can be produced by ordinary arithmetic, this value cannot.
pub const INVALID_COORD: f64 = f64::MAX;

/// The crate-wide error type. The distinction that matters operationally
/// is [`Error::is_transient()`]: a transient failure poisons a single
/// point of a batch, everything else aborts the whole call.
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error")]
    Io(#[from] io::Error),

    #[error("error: {0}")]
    General(&'static str),

    #[error("malformed axis specification: {0}")]
    BadAxes(String),

    #[error("invalid ellipsoid (a = {0}, b = {1})")]
    BadEllipsoid(f64, f64),

    #[error("vertical array required: {0}")]
    MissingVertical(&'static str),

    #[error("source projection not invertible")]
    NonInvertible,

    #[error("{0} not found")]
    NotFound(String),

    // ----- Point-domain failures, transient under batch processing -----
    #[error("latitude or longitude exceeded limits")]
    OutsideLimits,

    #[error("invalid x or y")]
    InvalidCoordinate,

    #[error("non-convergent: {0}")]
    NonConvergent(&'static str),

    #[error("math domain error: {0}")]
    MathDomain(&'static str),

    #[error("tolerance condition error")]
    Tolerance,

    #[error("point outside projection domain")]
    OutsideDomain,

    #[error("grid coverage unavailable")]
    GridUnavailable,

    #[error("unknown error")]
    Unknown,
}

impl Error {
    /// Whether a failure of this kind, hitting one point of a batch,
    /// leaves the remaining points processable. Transient failures mark
    /// the offending point with [`INVALID_COORD`] and processing
    /// continues; non-transient failures abort the whole call. The
    /// classification is consulted identically on the source and the
    /// destination side of a transformation, and a batch of exactly one
    /// point escalates every failure to an abort.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::OutsideLimits
                | Error::InvalidCoordinate
                | Error::NonConvergent(_)
                | Error::MathDomain(_)
                | Error::Tolerance
                | Error::OutsideDomain
                | Error::GridUnavailable
        )
    }
}

/// `Fwd`: Indicate that a two-way operator, function, or method,
/// should run in the *forward* direction.
/// `Inv`: Indicate that a two-way operator, function, or method,
/// should run in the *inverse* direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Fwd,
    Inv,
}

/// The bare essentials for transforming coordinates between two
/// reference systems
pub mod prelude {
    pub use crate::coordinate::Coor3D;
    pub use crate::coordinate::CoordinateSet;
    pub use crate::coordinate::StridedSet;
    pub use crate::crs::Crs;
    pub use crate::crs::Dimensionality;
    pub use crate::crs::HorizontalGrid;
    pub use crate::crs::Projection;
    pub use crate::crs::VerticalGrid;
    pub use crate::datum::DatumShift;
    pub use crate::datum::GridHandle;
    pub use crate::ellipsoid::Ellipsoid;
    pub use crate::pipeline::transform;
    pub use crate::Direction;
    pub use crate::Error;
    pub use crate::INVALID_COORD;
}

/// Preamble for crate-internal modules
pub(crate) mod authoring {
    pub use crate::prelude::*;

    pub use crate::crs::Axes;
    pub use crate::math::angular;

    #[allow(unused_imports)]
    pub use log::{debug, error, trace, warn};
}
