use std::f64::consts::{PI, TAU};

/// Normalize arbitrary longitudes to the principal interval (-π, π].
///
/// Values already on the interval, and the boundary value -π, pass
/// through unchanged.
pub fn normalize_longitude(angle: f64) -> f64 {
    if angle.abs() <= PI {
        return angle;
    }
    let angle = angle % TAU;
    if angle > PI {
        return angle - TAU;
    }
    if angle <= -PI {
        return angle + TAU;
    }
    angle
}

/// Wrap a longitude onto the full turn centered on `center`, i.e. onto
/// [center - π, center + π], by adding or subtracting entire turns.
/// Values already on the interval, boundaries included, pass through
/// unchanged.
pub fn rewrap_about(angle: f64, center: f64) -> f64 {
    if (angle - center).abs() <= PI {
        return angle;
    }
    center + normalize_longitude(angle - center)
}

// ----- T E S T S ---------------------------------------------------
