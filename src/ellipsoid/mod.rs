mod geocentric;

use crate::authoring::*;

/// Representation of a biaxial reference ellipsoid, the shape component
/// of a geodetic datum.
#[derive(Clone, Copy, Debug)]
pub struct Ellipsoid {
    a: f64,
    f: f64,
}

/// GRS80 is the default ellipsoid.
impl Default for Ellipsoid {
    fn default() -> Ellipsoid {
        Ellipsoid::new(6_378_137.0, 1. / 298.257_222_100_882_7)
    }
}

impl Ellipsoid {
    // ----- C O N S T R U C T O R S -----------------------------------------

    /// User defined ellipsoid
    #[must_use]
    pub fn new(semimajor_axis: f64, flattening: f64) -> Ellipsoid {
        Ellipsoid {
            a: semimajor_axis,
            f: flattening,
        }
    }

    /// Predefined ellipsoid, from the small built-in registry
    pub fn named(name: &str) -> Result<Ellipsoid, Error> {
        match name {
            "GRS80" => Ok(Ellipsoid::new(6_378_137.0, 1. / 298.257_222_100_882_7)),
            "WGS84" => Ok(Ellipsoid::new(6_378_137.0, 1. / 298.257_223_563)),
            "WGS72" => Ok(Ellipsoid::new(6_378_135.0, 1. / 298.26)),
            "intl" => Ok(Ellipsoid::new(6_378_388.0, 1. / 297.0)),
            "Helmert" => Ok(Ellipsoid::new(6_378_200.0, 1. / 298.3)),
            "clrk66" => Ok(Ellipsoid::new(6_378_206.4, 1. / 294.978_698_2)),
            "clrk80" => Ok(Ellipsoid::new(6_378_249.145, 1. / 293.465)),
            "bessel" => Ok(Ellipsoid::new(6_377_397.155, 1. / 299.152_812_8)),
            "krass" => Ok(Ellipsoid::new(6_378_245.0, 1. / 298.3)),
            _ => Err(Error::NotFound(String::from(name))),
        }
    }

    /// Setup-time sanity check of the defining parameters. A degenerate
    /// or inverted ellipsoid cannot be constructed through [`named`](Self::named),
    /// but [`new`](Self::new) accepts anything, so reference system setup
    /// runs the parameters past this before using them.
    pub fn check_shape(&self) -> Result<(), Error> {
        let b = self.semiminor_axis();
        if self.a <= 0. || b <= 0. || self.a < b {
            return Err(Error::BadEllipsoid(self.a, b));
        }
        Ok(())
    }

    // ----- E C C E N T R I C I T I E S -------------------------------------

    /// The squared eccentricity *e² = (a² - b²) / a² = f (2 - f)*.
    #[must_use]
    pub fn eccentricity_squared(&self) -> f64 {
        self.f * (2_f64 - self.f)
    }

    /// The eccentricity *e*
    #[must_use]
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_squared().sqrt()
    }

    /// The squared second eccentricity *e'² = (a² - b²) / b² = e² / (1 - e²)*
    #[must_use]
    pub fn second_eccentricity_squared(&self) -> f64 {
        let es = self.eccentricity_squared();
        es / (1.0 - es)
    }

    // ----- A X E S ---------------------------------------------------------

    /// The semimajor axis, *a*
    #[must_use]
    pub fn semimajor_axis(&self) -> f64 {
        self.a
    }

    /// The semiminor axis, *b*
    #[must_use]
    pub fn semiminor_axis(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// The flattening, *f = (a - b)/a*
    #[must_use]
    pub fn flattening(&self) -> f64 {
        self.f
    }

    // ----- C U R V A T U R E S ---------------------------------------------

    /// The radius of curvature in the prime vertical, *N*
    #[must_use]
    pub fn prime_vertical_radius_of_curvature(&self, latitude: f64) -> f64 {
        if self.f == 0.0 {
            return self.a;
        }
        self.a / (1.0 - latitude.sin().powi(2) * self.eccentricity_squared()).sqrt()
    }

    /// Near-equality of the squared eccentricities, within `5e-11`. Just
    /// loose enough that the reference ellipsoids which are numerically
    /// twins under different names (GRS80 and WGS84, most prominently)
    /// count as the same shape in datum comparisons, while any two
    /// genuinely distinct ellipsoids stay apart by several orders of
    /// magnitude more than the tolerance.
    #[must_use]
    pub fn shape_agrees_with(&self, other: &Ellipsoid) -> bool {
        self.a == other.a
            && (self.eccentricity_squared() - other.eccentricity_squared()).abs() <= 5e-11
    }
}

// ----- T E S T S ---------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() -> Result<(), Error> {
        let ellps = Ellipsoid::named("intl")?;
        assert_eq!(ellps.flattening(), 1. / 297.);

        let ellps = Ellipsoid::named("GRS80")?;
        assert_eq!(ellps.semimajor_axis(), 6378137.0);
        assert_eq!(ellps.flattening(), 1. / 298.25722_21008_82711_24316);

        assert!(matches!(
            Ellipsoid::named("Mars2000"),
            Err(Error::NotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn shape_and_size() -> Result<(), Error> {
        let ellps = Ellipsoid::named("GRS80")?;
        let ellps = Ellipsoid::new(ellps.semimajor_axis(), ellps.flattening());

        // Additional shape descriptors
        assert!((ellps.eccentricity() - 0.081819191).abs() < 1.0e-10);
        assert!((ellps.eccentricity_squared() - 0.00669_43800_22903_41574).abs() < 1.0e-10);

        // Additional size descriptors
        assert!((ellps.semiminor_axis() - 6_356_752.31414_0347).abs() < 1e-9);
        assert!((ellps.semimajor_axis() - 6_378_137.0).abs() < 1e-9);

        // The curvature behind the geocentric conversions
        assert!(
            (ellps.prime_vertical_radius_of_curvature(0.0) - ellps.semimajor_axis()).abs() < 1.0e-4
        );
        assert!(
            (ellps.prime_vertical_radius_of_curvature(90_f64.to_radians()) - 6_399_593.6259).abs()
                < 1e-4
        );
        Ok(())
    }

    #[test]
    fn shape_check() {
        assert!(Ellipsoid::default().check_shape().is_ok());
        // A perfect sphere is fine
        assert!(Ellipsoid::new(6_378_137.0, 0.).check_shape().is_ok());

        // Nonpositive semimajor axis
        assert!(matches!(
            Ellipsoid::new(0., 1. / 300.).check_shape(),
            Err(Error::BadEllipsoid(..))
        ));
        // Nonpositive semiminor axis
        assert!(matches!(
            Ellipsoid::new(6_378_137.0, 1.5).check_shape(),
            Err(Error::BadEllipsoid(..))
        ));
        // Prolate, i.e. b > a
        assert!(matches!(
            Ellipsoid::new(6_378_137.0, -0.1).check_shape(),
            Err(Error::BadEllipsoid(..))
        ));
    }

    #[test]
    fn near_identical_shapes() -> Result<(), Error> {
        let grs80 = Ellipsoid::named("GRS80")?;
        let wgs84 = Ellipsoid::named("WGS84")?;

        // Nominally distinct, numerically the same shape
        assert_ne!(grs80.flattening(), wgs84.flattening());
        assert!(grs80.shape_agrees_with(&wgs84));
        assert!(wgs84.shape_agrees_with(&grs80));

        // Actually distinct shapes stay distinct
        assert!(!grs80.shape_agrees_with(&Ellipsoid::named("intl")?));
        assert!(!grs80.shape_agrees_with(&Ellipsoid::named("WGS72")?));
        Ok(())
    }
}
