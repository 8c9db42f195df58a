mod axes;

pub use axes::Axes;

use crate::authoring::*;
use std::sync::Arc;

/// The evaluation forms a [`Projection`] can offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dimensionality {
    /// Horizontal evaluation only: the vertical element passes through
    /// untouched
    Two,
    /// Full 3D evaluation, consuming and producing all three elements
    Three,
}

/// Projection evaluator capability: the mapping between geographic
/// coordinates and projected plane coordinates. Implemented outside this
/// crate; a [`Crs`] holds one for each projected system.
///
/// Coordinates cross this interface one point at a time, in canonical
/// slot order and with plane coordinates in meters: whatever axis order
/// and units the system itself mandates are handled by the calling
/// pipeline, not by the evaluator.
pub trait Projection: std::fmt::Debug + Sync + Send {
    /// Plane coordinates from geographic coordinates
    fn forward(&self, coord: &Coor3D) -> Result<Coor3D, Error>;

    /// Geographic coordinates from plane coordinates. May err even for
    /// an invertible projection, e.g. for points outside the domain
    fn inverse(&self, coord: &Coor3D) -> Result<Coor3D, Error>;

    /// Which form both evaluators work in. `Two` obliges them to pass
    /// the vertical element through untouched
    fn dimensionality(&self) -> Dimensionality {
        Dimensionality::Two
    }

    /// Whether [`inverse`](Self::inverse) is implemented at all. Checked
    /// once per transformation, before any point is touched
    fn invertible(&self) -> bool {
        true
    }
}

/// Geoid model capability: the separation between ellipsoidal and
/// geoid-referenced heights, looked up and applied per point.
pub trait VerticalGrid: std::fmt::Debug + Sync + Send {
    /// Apply the separation to the vertical element of every valid point
    /// of `operands`. `Fwd` moves geoid-referenced heights onto the
    /// ellipsoid on the way into a transformation, `Inv` moves them back
    /// out. Points outside the model's coverage are marked with
    /// [`INVALID_COORD`], the batch as a whole proceeds.
    fn shift(&self, direction: Direction, operands: &mut dyn CoordinateSet) -> Result<(), Error>;
}

/// Horizontal grid shift capability: tabulated, spatially varying datum
/// corrections, applied to geodetic coordinates. The high-accuracy
/// sibling of the Helmert variants of [`DatumShift`].
pub trait HorizontalGrid: std::fmt::Debug + Sync + Send {
    /// Shift geodetic coordinates. `Fwd` out of this system's datum into
    /// the common frame, `Inv` back. Points outside the table's coverage
    /// are marked with [`INVALID_COORD`], the batch as a whole proceeds.
    fn shift(&self, direction: Direction, operands: &mut dyn CoordinateSet) -> Result<(), Error>;

    /// Identity of the underlying correction table. Two systems gridded
    /// onto the same table compare as datum-identical
    fn handle(&self) -> GridHandle;
}

#[derive(Clone, Debug)]
enum SystemKind {
    Geographic,
    Geocentric,
    Projected(Arc<dyn Projection>),
}

/// A coordinate reference system definition: everything
/// [`transform`](crate::transform) needs in order to move coordinates
/// between this system's conventions and geodetic coordinates on the
/// common frame.
///
/// Constructed once, through [`geographic`](Self::geographic),
/// [`geocentric`](Self::geocentric) or [`projected`](Self::projected)
/// followed by `with_...` amendments, then read-only: transformations
/// never mutate a `Crs`, so one instance may serve any number of
/// concurrent calls.
#[derive(Clone, Debug)]
pub struct Crs {
    kind: SystemKind,
    ellipsoid: Ellipsoid,
    datum: DatumShift,
    axes: Axes,
    prime_meridian: f64,
    vertical_to_meters: f64,
    linear_to_meters: f64,
    rewrap_center: Option<f64>,
    geoid: Option<Arc<dyn VerticalGrid>>,
}

impl Crs {
    // ----- C O N S T R U C T O R S -----------------------------------------

    fn new(kind: SystemKind, ellipsoid: Ellipsoid) -> Result<Crs, Error> {
        ellipsoid.check_shape()?;
        Ok(Crs {
            kind,
            ellipsoid,
            datum: DatumShift::None,
            axes: Axes::default(),
            prime_meridian: 0.,
            vertical_to_meters: 1.,
            linear_to_meters: 1.,
            rewrap_center: None,
            geoid: None,
        })
    }

    /// Geographic coordinates (longitude, latitude, height), angles in
    /// radians, on `ellipsoid`
    pub fn geographic(ellipsoid: Ellipsoid) -> Result<Crs, Error> {
        Crs::new(SystemKind::Geographic, ellipsoid)
    }

    /// Geocentric cartesian coordinates (X, Y, Z) with origin at the
    /// center of `ellipsoid`
    pub fn geocentric(ellipsoid: Ellipsoid) -> Result<Crs, Error> {
        Crs::new(SystemKind::Geocentric, ellipsoid)
    }

    /// Projected plane coordinates, evaluated by `projection`, on
    /// `ellipsoid`
    pub fn projected(ellipsoid: Ellipsoid, projection: Arc<dyn Projection>) -> Result<Crs, Error> {
        Crs::new(SystemKind::Projected(projection), ellipsoid)
    }

    /// Anchor the system's datum: how its geocentric coordinates relate
    /// to the common frame
    #[must_use]
    pub fn with_datum(mut self, datum: DatumShift) -> Crs {
        self.datum = datum;
        self
    }

    /// Axis order and sign convention, e.g. "neu" for northing first
    pub fn with_axes(mut self, spec: &str) -> Result<Crs, Error> {
        self.axes = Axes::new(spec)?;
        Ok(self)
    }

    /// Longitude origin of the system, as the offset of its prime
    /// meridian from Greenwich, in radians, positive eastward
    #[must_use]
    pub fn with_prime_meridian(mut self, offset: f64) -> Crs {
        self.prime_meridian = offset;
        self
    }

    /// Scale from the system's vertical unit to meters, e.g. 0.3048 for
    /// heights in international feet
    #[must_use]
    pub fn with_vertical_to_meters(mut self, scale: f64) -> Crs {
        self.vertical_to_meters = scale;
        self
    }

    /// Scale from the system's linear unit to meters. Applied to the two
    /// first slots of geocentric coordinates; for projected systems the
    /// plane units are the evaluator's business
    #[must_use]
    pub fn with_linear_to_meters(mut self, scale: f64) -> Crs {
        self.linear_to_meters = scale;
        self
    }

    /// Re-wrap output longitudes onto the full turn centered here
    /// (radians). Without it, longitudes leave the pipeline as the
    /// arctangent delivers them, on (-π, π]
    #[must_use]
    pub fn with_longitude_wrap(mut self, center: f64) -> Crs {
        self.rewrap_center = Some(center);
        self
    }

    /// Geoid model for the system's vertical datum: heights are
    /// referenced to the geoid rather than to the ellipsoid
    #[must_use]
    pub fn with_geoid(mut self, geoid: Arc<dyn VerticalGrid>) -> Crs {
        self.geoid = Some(geoid);
        self
    }

    // ----- A C C E S S ------------------------------------------------------

    #[must_use]
    pub fn is_geographic(&self) -> bool {
        matches!(self.kind, SystemKind::Geographic)
    }

    #[must_use]
    pub fn is_geocentric(&self) -> bool {
        matches!(self.kind, SystemKind::Geocentric)
    }

    /// The projection evaluator, for projected systems
    #[must_use]
    pub fn projection(&self) -> Option<&dyn Projection> {
        match &self.kind {
            SystemKind::Projected(projection) => Some(projection.as_ref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    #[must_use]
    pub fn datum(&self) -> &DatumShift {
        &self.datum
    }

    /// The horizontal grid collaborator, for grid-anchored datums
    #[must_use]
    pub fn horizontal_grid(&self) -> Option<&dyn HorizontalGrid> {
        match &self.datum {
            DatumShift::Grids(grid) => Some(grid.as_ref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    #[must_use]
    pub fn prime_meridian(&self) -> f64 {
        self.prime_meridian
    }

    #[must_use]
    pub fn vertical_to_meters(&self) -> f64 {
        self.vertical_to_meters
    }

    /// The inverse vertical scale, for leaving the pipeline
    #[must_use]
    pub fn vertical_from_meters(&self) -> f64 {
        1. / self.vertical_to_meters
    }

    #[must_use]
    pub fn linear_to_meters(&self) -> f64 {
        self.linear_to_meters
    }

    #[must_use]
    pub fn rewrap_center(&self) -> Option<f64> {
        self.rewrap_center
    }

    #[must_use]
    pub fn geoid(&self) -> Option<&dyn VerticalGrid> {
        self.geoid.as_deref()
    }

    /// Whether this system and `other` sit on the same datum, so that a
    /// transformation between them may skip the datum step outright.
    /// Identical shift parameters on ellipsoids of agreeing shape: since
    /// nominally distinct ellipsoids may be numerically identical, the
    /// shapes are compared with [`Ellipsoid::shape_agrees_with`]
    #[must_use]
    pub fn datum_matches(&self, other: &Crs) -> bool {
        self.datum == other.datum && self.ellipsoid.shape_agrees_with(&other.ellipsoid)
    }

    /// The ellipsoid the cartesian leg of the datum step works on.
    /// Grid-anchored systems count as the common frame: their grids,
    /// applied separately, carry the entire datum difference
    #[must_use]
    pub(crate) fn effective_ellipsoid(&self) -> Ellipsoid {
        if matches!(self.datum, DatumShift::Grids(_)) {
            return *crate::datum::WGS84;
        }
        self.ellipsoid
    }
}

// ----- T E S T S ---------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Unprojection;
    impl Projection for Unprojection {
        fn forward(&self, coord: &Coor3D) -> Result<Coor3D, Error> {
            Ok(*coord)
        }
        fn inverse(&self, coord: &Coor3D) -> Result<Coor3D, Error> {
            Ok(*coord)
        }
    }

    #[test]
    fn kinds() -> Result<(), Error> {
        let geographic = Crs::geographic(Ellipsoid::named("GRS80")?)?;
        assert!(geographic.is_geographic());
        assert!(!geographic.is_geocentric());
        assert!(geographic.projection().is_none());

        let geocentric = Crs::geocentric(Ellipsoid::named("GRS80")?)?;
        assert!(!geocentric.is_geographic());
        assert!(geocentric.is_geocentric());

        let projected = Crs::projected(Ellipsoid::named("GRS80")?, Arc::new(Unprojection))?;
        assert!(!projected.is_geographic());
        assert!(!projected.is_geocentric());
        assert!(projected.projection().is_some());
        Ok(())
    }

    #[test]
    fn setup_validation() {
        // Degenerate ellipsoids are rejected at setup, not mid-batch
        assert!(matches!(
            Crs::geographic(Ellipsoid::new(0., 0.)),
            Err(Error::BadEllipsoid(..))
        ));
        assert!(matches!(
            Crs::geocentric(Ellipsoid::new(6378137., -0.5)),
            Err(Error::BadEllipsoid(..))
        ));

        // So are malformed axis specifications
        let crs = Crs::geographic(Ellipsoid::default()).unwrap();
        assert!(matches!(crs.with_axes("xyz"), Err(Error::BadAxes(_))));
    }

    #[test]
    fn defaults_and_amendments() -> Result<(), Error> {
        let crs = Crs::geographic(Ellipsoid::named("WGS84")?)?;
        assert!(crs.axes().is_normalized());
        assert_eq!(crs.prime_meridian(), 0.);
        assert_eq!(crs.vertical_to_meters(), 1.);
        assert_eq!(crs.linear_to_meters(), 1.);
        assert_eq!(crs.rewrap_center(), None);
        assert!(crs.geoid().is_none());
        assert_eq!(*crs.datum(), DatumShift::None);

        let crs = crs
            .with_axes("neu")?
            .with_prime_meridian(0.04)
            .with_vertical_to_meters(0.3048)
            .with_longitude_wrap(std::f64::consts::PI)
            .with_datum(DatumShift::translation(-87., -98., -121.));
        assert!(!crs.axes().is_normalized());
        assert_eq!(crs.prime_meridian(), 0.04);
        assert_eq!(crs.vertical_from_meters(), 1. / 0.3048);
        assert_eq!(crs.rewrap_center(), Some(std::f64::consts::PI));
        assert!(crs.datum().is_helmert());
        Ok(())
    }

    #[test]
    fn datum_matching() -> Result<(), Error> {
        // GRS80 and WGS84 agree in shape, so with equal shift parameters
        // the datums match across the nominal ellipsoid difference
        let grs = Crs::geographic(Ellipsoid::named("GRS80")?)?;
        let wgs = Crs::geocentric(Ellipsoid::named("WGS84")?)?;
        assert!(grs.datum_matches(&wgs));

        // A genuinely different ellipsoid breaks the match
        let intl = Crs::geographic(Ellipsoid::named("intl")?)?;
        assert!(!grs.datum_matches(&intl));

        // As do differing shift parameters
        let shifted = Crs::geographic(Ellipsoid::named("WGS84")?)?
            .with_datum(DatumShift::translation(-87., -98., -121.));
        assert!(!wgs.datum_matches(&shifted));
        assert!(shifted.datum_matches(&shifted.clone()));
        Ok(())
    }
}
