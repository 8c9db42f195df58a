use crate::INVALID_COORD;
use std::ops::{Add, Div, Index, IndexMut, Mul, Sub};

/// Generic 3D coordinate tuple, with no fixed interpretation of the
/// elements. The pipeline reads it as (x, y, z), i.e. (easting, northing,
/// up) or (longitude, latitude, height) with angles in radians, depending
/// on which stage the point is passing through.
#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct Coor3D(pub [f64; 3]);

// ----- I N D E X I N G   A N D   A R I T H M E T I C -----------------------

impl Index<usize> for Coor3D {
    type Output = f64;
    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i]
    }
}

impl IndexMut<usize> for Coor3D {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.0[i]
    }
}

// Generate the vector space operators Add, Sub, Mul, Div
macro_rules! coord_operator {
    ($op:ident, $symbol:tt, $function:ident) => {
        impl $op for Coor3D {
            type Output = Self;
            fn $function(self, other: Self) -> Self {
                Coor3D([
                    self.0[0] $symbol other.0[0],
                    self.0[1] $symbol other.0[1],
                    self.0[2] $symbol other.0[2],
                ])
            }
        }
    };
}

coord_operator!(Add, +, add);
coord_operator!(Sub, -, sub);
coord_operator!(Mul, *, mul);
coord_operator!(Div, /, div);

// ----- C O N S T R U C T O R S ---------------------------------------------

impl Coor3D {
    /// A `Coor3D` from latitude/longitude/height, with the angular input
    /// in degrees. Note the latitude-first order of the arguments, and the
    /// longitude-first order of the stored elements.
    #[must_use]
    pub fn geo(latitude: f64, longitude: f64, height: f64) -> Coor3D {
        Coor3D([longitude.to_radians(), latitude.to_radians(), height])
    }

    /// A `Coor3D` from longitude/latitude/height, with the angular input
    /// in degrees
    #[must_use]
    pub fn gis(longitude: f64, latitude: f64, height: f64) -> Coor3D {
        Coor3D([longitude.to_radians(), latitude.to_radians(), height])
    }

    /// A `Coor3D` taking the elements as given
    #[must_use]
    pub fn raw(first: f64, second: f64, third: f64) -> Coor3D {
        Coor3D([first, second, third])
    }

    /// A `Coor3D` consisting of 3 `NaN`s
    #[must_use]
    pub fn nan() -> Coor3D {
        Coor3D([f64::NAN, f64::NAN, f64::NAN])
    }

    /// A `Coor3D` consisting of 3 `0`s
    #[must_use]
    pub fn origin() -> Coor3D {
        Coor3D([0., 0., 0.])
    }

    /// A `Coor3D` consisting of 3 `1`s
    #[must_use]
    pub fn ones() -> Coor3D {
        Coor3D([1., 1., 1.])
    }

    /// A `Coor3D` carrying the "point could not be converted" marker in
    /// its first two elements
    #[must_use]
    pub fn invalid() -> Coor3D {
        Coor3D([INVALID_COORD, INVALID_COORD, 0.])
    }

    /// Does this tuple carry the "could not be converted" marker?
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.0[0] == INVALID_COORD
    }

    // ----- A N G U L A R   U N I T S -----

    /// Transform the first two elements from degrees to radians
    #[must_use]
    pub fn to_radians(self) -> Coor3D {
        Coor3D([self[0].to_radians(), self[1].to_radians(), self[2]])
    }

    /// Transform the first two elements from radians to degrees
    #[must_use]
    pub fn to_degrees(self) -> Coor3D {
        Coor3D([self[0].to_degrees(), self[1].to_degrees(), self[2]])
    }

    // ----- A R I T H M E T I C -----
    // (also see the operator trait implementations add, sub, mul, div)

    /// Multiply by a scalar
    #[must_use]
    pub fn scale(&self, factor: f64) -> Coor3D {
        Coor3D([self[0] * factor, self[1] * factor, self[2] * factor])
    }

    /// Scalar product
    #[must_use]
    pub fn dot(&self, other: Coor3D) -> f64 {
        self[0] * other[0] + self[1] * other[1] + self[2] * other[2]
    }

    /// Euclidean distance between two points in the 2D plane
    #[must_use]
    pub fn hypot2(&self, other: &Coor3D) -> f64 {
        (self[0] - other[0]).hypot(self[1] - other[1])
    }

    /// Euclidean distance between two points in 3D space
    #[must_use]
    pub fn hypot3(&self, other: &Coor3D) -> f64 {
        (self[0] - other[0])
            .hypot(self[1] - other[1])
            .hypot(self[2] - other[2])
    }
}

// ----- T E S T S ---------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord() {
        let c = Coor3D::raw(12., 55., 100.).to_radians();
        let d = Coor3D::gis(12., 55., 100.);
        assert_eq!(c, d);
        assert_eq!(d[0], 12f64.to_radians());
        let e = d.to_degrees();
        assert_eq!(e[0], c.to_degrees()[0]);

        // geo is latitude-first, gis longitude-first
        assert_eq!(Coor3D::geo(55., 12., 0.), Coor3D::gis(12., 55., 0.));
    }

    #[test]
    fn arithmetic() {
        let a = Coor3D([1., 2., 3.]);
        let b = Coor3D([4., 3., 2.]);
        let t = Coor3D([12., 12., 12.]);

        let c = a + b;
        assert_eq!(c, Coor3D([5., 5., 5.]));

        let d = c.scale(2.);
        assert_eq!(d, Coor3D([10., 10., 10.]));

        let e = t / b;
        assert_eq!(e, Coor3D([3., 4., 6.]));

        assert_eq!(e * b, t);
        assert_eq!(a.dot(b), 16.);

        assert!((Coor3D::origin().hypot3(&Coor3D::ones()) - 3f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn invalidity() {
        let mut c = Coor3D::gis(12., 55., 100.);
        assert!(!c.is_invalid());
        c = Coor3D::invalid();
        assert!(c.is_invalid());
        assert_eq!(c[0], INVALID_COORD);
        assert_eq!(c[2], 0.);

        // NaN is not the marker
        assert!(!Coor3D::nan().is_invalid());
    }
}
