use crate::authoring::*;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// The frame all datum shifts pivot through. A reference system's shift
/// parameters state how to move its geocentric coordinates into this
/// frame, so a shift between any two systems composes as
/// source-to-common followed by common-to-destination.
pub static WGS84: Lazy<Ellipsoid> =
    Lazy::new(|| Ellipsoid::new(6_378_137.0, 1. / 298.257_223_563));

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub struct GridHandle(uuid::Uuid);
impl GridHandle {
    pub fn new() -> Self {
        GridHandle(uuid::Uuid::new_v4())
    }
}
impl Default for GridHandle {
    fn default() -> Self {
        GridHandle(uuid::Uuid::new_v4())
    }
}

/// How a reference system's datum is anchored to the common frame.
///
/// The `ThreeParam` and `SevenParam` variants operate on geocentric
/// cartesian coordinates, through [`to_common`](Self::to_common) and
/// [`from_common`](Self::from_common). The `Grids` variant instead
/// delegates to its grid collaborator, which corrects geodetic
/// coordinates directly; its cartesian leg is the identity.
#[derive(Clone, Debug, Default)]
pub enum DatumShift {
    /// Anchored directly to the common frame
    #[default]
    None,
    /// Geocentric translation, in meters
    ThreeParam { dx: f64, dy: f64, dz: f64 },
    /// Bursa-Wolf similarity transform in the position vector convention.
    /// Rotations in radians, translations in meters, scale as the
    /// deviation from unity in parts per million
    SevenParam {
        dx: f64,
        dy: f64,
        dz: f64,
        rx: f64,
        ry: f64,
        rz: f64,
        ppm: f64,
    },
    /// Tabulated corrections, looked up per point by the collaborator
    Grids(Arc<dyn HorizontalGrid>),
}

/// Datum descriptions short-circuit to "same datum" on identical variant
/// and parameters. For `Grids`, parameter identity means handle identity:
/// same table, not equal tables.
impl PartialEq for DatumShift {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DatumShift::None, DatumShift::None) => true,
            (
                DatumShift::ThreeParam { dx, dy, dz },
                DatumShift::ThreeParam {
                    dx: odx,
                    dy: ody,
                    dz: odz,
                },
            ) => dx == odx && dy == ody && dz == odz,
            (
                DatumShift::SevenParam {
                    dx,
                    dy,
                    dz,
                    rx,
                    ry,
                    rz,
                    ppm,
                },
                DatumShift::SevenParam {
                    dx: odx,
                    dy: ody,
                    dz: odz,
                    rx: orx,
                    ry: ory,
                    rz: orz,
                    ppm: oppm,
                },
            ) => {
                dx == odx
                    && dy == ody
                    && dz == odz
                    && rx == orx
                    && ry == ory
                    && rz == orz
                    && ppm == oppm
            }
            (DatumShift::Grids(grid), DatumShift::Grids(other_grid)) => {
                grid.handle() == other_grid.handle()
            }
            _ => false,
        }
    }
}

impl DatumShift {
    // ----- C O N S T R U C T O R S -----------------------------------------

    /// Plain geocentric translation, in meters
    #[must_use]
    pub fn translation(dx: f64, dy: f64, dz: f64) -> DatumShift {
        DatumShift::ThreeParam { dx, dy, dz }
    }

    /// Seven parameter shift, taking the parameters as conventionally
    /// published: translations in meters, rotations in arcseconds, scale
    /// deviation in parts per million. The rotations are converted to
    /// radians once, here, rather than per point.
    #[must_use]
    pub fn position_vector(
        dx: f64,
        dy: f64,
        dz: f64,
        rx: f64,
        ry: f64,
        rz: f64,
        ppm: f64,
    ) -> DatumShift {
        DatumShift::SevenParam {
            dx,
            dy,
            dz,
            rx: (rx / 3600.).to_radians(),
            ry: (ry / 3600.).to_radians(),
            rz: (rz / 3600.).to_radians(),
            ppm,
        }
    }

    /// Shift by tabulated corrections, delegated to `grid`
    #[must_use]
    pub fn gridded(grid: Arc<dyn HorizontalGrid>) -> DatumShift {
        DatumShift::Grids(grid)
    }

    // ----- A P P L I C A T I O N -------------------------------------------

    /// Whether the cartesian leg of this shift moves coordinates at all
    #[must_use]
    pub fn is_helmert(&self) -> bool {
        matches!(
            self,
            DatumShift::ThreeParam { .. } | DatumShift::SevenParam { .. }
        )
    }

    /// Into the common frame: the published sense of the parameters.
    /// Rotate, scale, then offset.
    #[must_use]
    pub fn to_common(&self, cartesian: &Coor3D) -> Coor3D {
        let (x, y, z) = (cartesian[0], cartesian[1], cartesian[2]);
        match *self {
            DatumShift::ThreeParam { dx, dy, dz } => Coor3D::raw(x + dx, y + dy, z + dz),
            DatumShift::SevenParam {
                dx,
                dy,
                dz,
                rx,
                ry,
                rz,
                ppm,
            } => {
                let m = 1.0 + ppm * 1e-6;
                Coor3D::raw(
                    m * (x - rz * y + ry * z) + dx,
                    m * (rz * x + y - rx * z) + dy,
                    m * (-ry * x + rx * y + z) + dz,
                )
            }
            _ => *cartesian,
        }
    }

    /// Out of the common frame: deoffset, unscale, then rotate by the
    /// transposed rotation. For the small rotations the linearized matrix
    /// is built for, the transposition inverts [`to_common`](Self::to_common)
    /// to well below the accuracy of the parameters themselves.
    #[must_use]
    pub fn from_common(&self, cartesian: &Coor3D) -> Coor3D {
        let (x, y, z) = (cartesian[0], cartesian[1], cartesian[2]);
        match *self {
            DatumShift::ThreeParam { dx, dy, dz } => Coor3D::raw(x - dx, y - dy, z - dz),
            DatumShift::SevenParam {
                dx,
                dy,
                dz,
                rx,
                ry,
                rz,
                ppm,
            } => {
                let m = 1.0 + ppm * 1e-6;
                let xt = (x - dx) / m;
                let yt = (y - dy) / m;
                let zt = (z - dz) / m;
                Coor3D::raw(
                    xt + rz * yt - ry * zt,
                    -rz * xt + yt + rx * zt,
                    ry * xt - rx * yt + zt,
                )
            }
            _ => *cartesian,
        }
    }
}

// ----- T E S T S ---------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // A geocentric point in northern Europe, 100 m above the ellipsoid
    fn anchor() -> Coor3D {
        Coor3D::raw(3586525.761017918, 762339.584102928, 5201465.438406702)
    }

    #[test]
    fn translation() {
        let shift = DatumShift::translation(-87., -98., -121.);
        assert!(shift.is_helmert());

        let shifted = shift.to_common(&anchor());
        assert_eq!(shifted[0], 3586438.761017918);
        assert_eq!(shifted[1], 762241.584102928);
        assert_eq!(shifted[2], 5201344.438406702);

        let back = shift.from_common(&shifted);
        assert!((back[0] - anchor()[0]).abs() < 1e-9);
        assert!((back[1] - anchor()[1]).abs() < 1e-9);
        assert!((back[2] - anchor()[2]).abs() < 1e-9);
    }

    #[test]
    fn position_vector() {
        // The classic WGS72 alignment: dz = 4.5 m, rz = 0.554'',
        // 0.2263 ppm
        let shift = DatumShift::position_vector(0., 0., 4.5, 0., 0., 0.554, 0.2263);

        // The published arcseconds are stored in radians
        let DatumShift::SevenParam { rx, rz, .. } = &shift else {
            panic!("wrong variant");
        };
        assert_eq!(*rx, 0.);
        assert!((*rz - 2.685_867_793_346_829_4e-6).abs() < 1e-18);

        let shifted = shift.to_common(&anchor());
        assert!((shifted[0] - 3586524.525104898).abs() < 1e-6);
        assert!((shifted[1] - 762349.3895565874).abs() < 1e-6);
        assert!((shifted[2] - 5201471.115498331).abs() < 1e-6);
    }

    #[test]
    fn seven_param_invertibility() {
        // At the rotation magnitudes real frame alignments carry, the
        // transposed rotation inverts to sub-micrometer
        let shift = DatumShift::position_vector(10., -20., 30., 0.05, -0.05, 0.05, 5.0);
        let back = shift.from_common(&shift.to_common(&anchor()));
        assert!((back[0] - anchor()[0]).abs() < 1e-6);
        assert!((back[1] - anchor()[1]).abs() < 1e-6);
        assert!((back[2] - anchor()[2]).abs() < 1e-6);

        // At a full arcsecond, the linearization error grows to the
        // tenth-of-a-millimeter class, but no further
        let shift = DatumShift::position_vector(10., -20., 30., 1., -1., 1., 5.0);
        let back = shift.from_common(&shift.to_common(&anchor()));
        assert!((back[0] - anchor()[0]).abs() < 1e-3);
        assert!((back[1] - anchor()[1]).abs() < 1e-3);
        assert!((back[2] - anchor()[2]).abs() < 1e-3);
    }

    #[test]
    fn equality() {
        let a = DatumShift::translation(1., 2., 3.);
        let b = DatumShift::translation(1., 2., 3.);
        let c = DatumShift::translation(1., 2., 3.5);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, DatumShift::None);
        assert_eq!(DatumShift::default(), DatumShift::None);

        // Same parameters, different variant
        let seven = DatumShift::position_vector(1., 2., 3., 0., 0., 0., 0.);
        assert_ne!(a, seven);

        // The no-op legs
        assert!(!DatumShift::None.is_helmert());
        assert_eq!(DatumShift::None.to_common(&anchor()), anchor());
        assert_eq!(DatumShift::None.from_common(&anchor()), anchor());
    }

    #[test]
    fn pivot_frame() {
        assert_eq!(WGS84.semimajor_axis(), 6_378_137.0);
        assert!((WGS84.eccentricity_squared() - 0.0066943799901413165).abs() < 1e-17);
    }
}
