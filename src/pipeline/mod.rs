//! The transformation pipeline: a fixed sequence of stages carrying a
//! batch of coordinates from the conventions of one reference system to
//! the conventions of another

use crate::authoring::*;

// ----- T H E   P I P E L I N E -------------------------------------------

/// Transform `operands` in place from the reference system described by
/// `src` to the one described by `dst`.
///
/// The pipeline runs a fixed sequence of stages, each skipped when the
/// two definitions make it redundant:
///
/// 1.  source axis order and direction to canonical (east, north, up)
/// 2.  source vertical units to meters
/// 3.  into geodetic coordinates: geocentric or projected sources only
/// 4.  source prime meridian to Greenwich
/// 5.  source geoid heights onto the ellipsoid
/// 6.  datum shift, pivoting over the common frame ([`datum`](crate::datum))
/// 7.  destination ellipsoidal heights back onto the geoid
/// 8.  Greenwich to destination prime meridian
/// 9.  out of geodetic coordinates: geocentric or projected destinations
/// 10. longitudes onto the full turn around the destination wrap center
/// 11. destination vertical units from meters
/// 12. canonical order to destination axis convention
///
/// Angular values are in radians, linear values in meters, except where
/// the definitions say otherwise through their unit scales and axis
/// conventions.
///
/// A point failing an individual stage for point-domain reasons (a pole-
/// ward latitude excess, a position outside a projection's domain, a
/// position outside grid coverage) is marked with [`INVALID_COORD`] and
/// the remaining points proceed. Configuration problems, non-transient
/// failures, and any failure in a batch of exactly one point instead
/// abort the whole call with the error.
pub fn transform(src: &Crs, dst: &Crs, operands: &mut dyn CoordinateSet) -> Result<(), Error> {
    preflight(src, dst, &*operands)?;

    // Source axis convention to canonical order
    if !src.axes().is_normalized() {
        let axes = *src.axes();
        apply(operands, |coord| axes.normalize(&coord));
    }

    // Source vertical units to meters
    if src.vertical_to_meters() != 1.0 && operands.has_height() {
        let scale = src.vertical_to_meters();
        apply(operands, |mut coord| {
            coord[2] *= scale;
            coord
        });
    }

    // Into geodetic coordinates. For geocentric sources the linear unit
    // applies to the two first slots only: the vertical element was
    // handled, as a height, by the vertical scale above
    if src.is_geocentric() {
        if src.linear_to_meters() != 1.0 {
            let scale = src.linear_to_meters();
            apply(operands, |mut coord| {
                coord[0] *= scale;
                coord[1] *= scale;
                coord
            });
        }
        let ellipsoid = *src.ellipsoid();
        apply(operands, |coord| ellipsoid.geodetic(&coord));
    } else if let Some(projection) = src.projection() {
        try_apply(operands, |coord| projection.inverse(&coord))?;
    }

    // Source prime meridian to Greenwich
    if src.prime_meridian() != 0.0 {
        let offset = src.prime_meridian();
        apply(operands, |mut coord| {
            coord[0] += offset;
            coord
        });
    }

    // Source geoid heights onto the ellipsoid
    if operands.has_height() {
        if let Some(geoid) = src.geoid() {
            checked_shift(geoid.shift(Direction::Fwd, operands), operands)?;
        }
    }

    datum_transform(src, dst, operands)?;

    // Destination ellipsoidal heights back onto the geoid
    if operands.has_height() {
        if let Some(geoid) = dst.geoid() {
            checked_shift(geoid.shift(Direction::Inv, operands), operands)?;
        }
    }

    // Greenwich to destination prime meridian
    if dst.prime_meridian() != 0.0 {
        let offset = dst.prime_meridian();
        apply(operands, |mut coord| {
            coord[0] -= offset;
            coord
        });
    }

    // Out of geodetic coordinates
    if dst.is_geocentric() {
        let ellipsoid = *dst.ellipsoid();
        try_apply(operands, |coord| ellipsoid.geocentric(&coord))?;
        if dst.linear_to_meters() != 1.0 {
            let scale = 1. / dst.linear_to_meters();
            apply(operands, |mut coord| {
                coord[0] *= scale;
                coord[1] *= scale;
                coord
            });
        }
    } else if let Some(projection) = dst.projection() {
        try_apply(operands, |coord| projection.forward(&coord))?;
    }

    // Longitudes onto the full turn around the preferred center
    if dst.is_geographic() {
        if let Some(center) = dst.rewrap_center() {
            apply(operands, |mut coord| {
                coord[0] = angular::rewrap_about(coord[0], center);
                coord
            });
        }
    }

    // Destination vertical units from meters
    if dst.vertical_to_meters() != 1.0 && operands.has_height() {
        let scale = dst.vertical_from_meters();
        apply(operands, |mut coord| {
            coord[2] *= scale;
            coord
        });
    }

    // Canonical order to destination axis convention
    if !dst.axes().is_normalized() {
        let axes = *dst.axes();
        apply(operands, |coord| axes.denormalize(&coord));
    }

    Ok(())
}

// Configuration problems are caught here, before any point is touched
fn preflight(src: &Crs, dst: &Crs, operands: &dyn CoordinateSet) -> Result<(), Error> {
    if src.is_geocentric() && !operands.has_height() {
        return Err(Error::MissingVertical("geocentric source"));
    }
    if dst.is_geocentric() && !operands.has_height() {
        return Err(Error::MissingVertical("geocentric destination"));
    }

    if let Some(projection) = src.projection() {
        if !projection.invertible() {
            error!("source projection not invertible");
            return Err(Error::NonInvertible);
        }
        if projection.dimensionality() == Dimensionality::Three && !operands.has_height() {
            return Err(Error::MissingVertical("3D source projection"));
        }
    }
    if let Some(projection) = dst.projection() {
        if projection.dimensionality() == Dimensionality::Three && !operands.has_height() {
            return Err(Error::MissingVertical("3D destination projection"));
        }
    }

    Ok(())
}

// The datum step, operating on geodetic coordinates.
//
// Helmert shifts work on cartesian coordinates, so the source and
// destination legs of the cartesian bridge are fused into a single
// pointwise pass through the common frame. This keeps the intermediate
// cartesian z alive also when the operand set carries no vertical array
fn datum_transform(src: &Crs, dst: &Crs, operands: &mut dyn CoordinateSet) -> Result<(), Error> {
    // Identical datums: nothing to do. An explicit short circuit, since
    // a Helmert round trip through the common frame is not an exact
    // identity in floating point
    if src.datum_matches(dst) {
        debug!("identical datums, skipping the datum step");
        return Ok(());
    }

    // A grid anchored source is shifted onto the common frame first,
    // while the coordinates are still geodetic. From here on, the
    // source counts as the common frame itself
    if let Some(grid) = src.horizontal_grid() {
        checked_shift(grid.shift(Direction::Fwd, operands), operands)?;
    }

    let src_ellipsoid = src.effective_ellipsoid();
    let dst_ellipsoid = dst.effective_ellipsoid();

    // The cartesian bridge is needed when an actual Helmert shift is in
    // play, or when the two ellipsoids differ
    let bridge = src.datum().is_helmert()
        || dst.datum().is_helmert()
        || src_ellipsoid.semimajor_axis() != dst_ellipsoid.semimajor_axis()
        || src_ellipsoid.eccentricity_squared() != dst_ellipsoid.eccentricity_squared();

    if bridge {
        let src_datum = src.datum();
        let dst_datum = dst.datum();
        try_apply(operands, |coord| {
            let cartesian = src_ellipsoid.geocentric(&coord)?;
            let common = src_datum.to_common(&cartesian);
            Ok(dst_ellipsoid.geodetic(&dst_datum.from_common(&common)))
        })?;
    }

    // A grid anchored destination leaves the common frame last
    if let Some(grid) = dst.horizontal_grid() {
        checked_shift(grid.shift(Direction::Inv, operands), operands)?;
    }

    Ok(())
}

// ----- T H E   P E R - P O I N T   P O L I C Y ---------------------------

// Apply an infallible pointwise step to every live point of the batch
fn apply<F>(operands: &mut dyn CoordinateSet, mut step: F)
where
    F: FnMut(Coor3D) -> Coor3D,
{
    for i in 0..operands.len() {
        if operands.is_invalid(i) {
            continue;
        }
        let coord = operands.get_coord(i);
        operands.set_coord(i, &step(coord));
    }
}

// Apply a fallible pointwise step under the transient error policy: a
// transient failure poisons the point and the batch proceeds, any other
// failure, or any failure in a batch of one, aborts the call
fn try_apply<F>(operands: &mut dyn CoordinateSet, mut step: F) -> Result<(), Error>
where
    F: FnMut(Coor3D) -> Result<Coor3D, Error>,
{
    let batch = operands.len();
    for i in 0..batch {
        if operands.is_invalid(i) {
            continue;
        }
        let coord = operands.get_coord(i);
        match step(coord) {
            Ok(converted) => operands.set_coord(i, &converted),
            Err(failure) if failure.is_transient() && batch > 1 => operands.invalidate(i),
            Err(failure) => return Err(failure),
        }
    }
    Ok(())
}

// The batchwise counterpart of the transient error policy, for the grid
// collaborators: they mark individual coverage misses themselves, so an
// error return means the whole leg failed and every live point of the
// batch is unusable
fn checked_shift(
    outcome: Result<(), Error>,
    operands: &mut dyn CoordinateSet,
) -> Result<(), Error> {
    let batch = operands.len();
    match outcome {
        Ok(()) => Ok(()),
        Err(failure) if failure.is_transient() && batch > 1 => {
            for i in 0..batch {
                if !operands.is_invalid(i) {
                    operands.invalidate(i);
                }
            }
            Ok(())
        }
        Err(failure) => Err(failure),
    }
}

// ----- T E S T S ---------------------------------------------------------
