use super::*;

use std::f64::consts::FRAC_PI_2;

// End criterion of the latitude iteration: accuracy of sin(latitude),
// tested in squared form. Reached after a round or two at terrestrial
// heights. The companion iteration cap makes termination unconditional,
// converged or not.
const ACCURACY: f64 = 1.0e-12;
const MAX_ITERATIONS: usize = 30;

impl Ellipsoid {
    /// Geodetic to geocentric conversion.
    ///
    /// A latitude that has strayed at most 0.1% beyond a pole is clamped
    /// back onto the pole: an overshoot that small is indistinguishable
    /// from accumulated rounding. Anything further out fails with
    /// [`Error::OutsideLimits`]. Longitudes need no such policing, but
    /// are reduced to the principal interval (-π, π] before use.
    #[allow(non_snake_case)] // make it possible to mimic the conventional notation
    pub fn geocentric(&self, geodetic: &Coor3D) -> Result<Coor3D, Error> {
        let mut phi = geodetic[1];
        let h = geodetic[2];

        if phi.abs() > FRAC_PI_2 {
            if phi.abs() >= 1.001 * FRAC_PI_2 {
                return Err(Error::OutsideLimits);
            }
            phi = FRAC_PI_2.copysign(phi);
        }
        let lam = angular::normalize_longitude(geodetic[0]);

        let N = self.prime_vertical_radius_of_curvature(phi);
        let cosphi = phi.cos();
        let sinphi = phi.sin();

        let X = (N + h) * cosphi * lam.cos();
        let Y = (N + h) * cosphi * lam.sin();
        let Z = (N * (1.0 - self.eccentricity_squared()) + h) * sinphi;

        Ok(Coor3D::raw(X, Y, Z))
    }

    /// Geocentric to geodetic conversion.
    ///
    /// Follows the fixed point iteration over the sine of the geodetic
    /// latitude devised at the Institut for Erdmessung, University of
    /// Hannover (1988). Unlike the closed form approximations, it stays
    /// accurate for points arbitrarily far from the ellipsoid surface,
    /// at the cost of an extra round or two of iteration.
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn geodetic(&self, cartesian: &Coor3D) -> Coor3D {
        let (x, y, z) = (cartesian[0], cartesian[1], cartesian[2]);
        let a = self.a;
        let es = self.eccentricity_squared();

        // Distance from the spin axis, and from the center
        let p = x.hypot(y);
        let r = (x * x + y * y + z * z).sqrt();

        // On the spin axis, the longitude is indeterminate: take 0
        let lam = if p / a < ACCURACY {
            // At the center of mass, so is the latitude: take the North
            // Pole, at depth b below the surface
            if r / a < ACCURACY {
                return Coor3D::raw(0., FRAC_PI_2, -self.semiminor_axis());
            }
            0.
        } else {
            y.atan2(x)
        };

        // Starting guess from the closed form spherical solution. ct and
        // st are the cosine and sine of the polar angle, i.e. the sine
        // and cosine of the geocentric latitude
        let ct = z / r;
        let st = p / r;
        let rx = 1.0 / (1.0 - es * (2.0 - es) * st * st).sqrt();
        let mut cphi0 = st * (1.0 - es) * rx;
        let mut sphi0 = ct * rx;
        let mut h = 0.;

        // Iterate over the sine of the geodetic latitude, deflating the
        // eccentricity to its effective value at the current height
        // estimate
        for _ in 0..MAX_ITERATIONS {
            let rn = a / (1.0 - es * sphi0 * sphi0).sqrt();
            h = p * cphi0 + z * sphi0 - rn * (1.0 - es * sphi0 * sphi0);

            let rk = es * rn / (rn + h);
            let rx = 1.0 / (1.0 - rk * (2.0 - rk) * st * st).sqrt();
            let cphi = st * (1.0 - rk) * rx;
            let sphi = ct * rx;

            let sdphi = sphi * cphi0 - cphi * sphi0;
            cphi0 = cphi;
            sphi0 = sphi;
            if sdphi * sdphi <= ACCURACY * ACCURACY {
                break;
            }
        }

        let phi = sphi0.atan2(cphi0.abs());
        Coor3D::raw(lam, phi, h)
    }
}

// ----- T E S T S ---------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() -> Result<(), Error> {
        let ellps = Ellipsoid::named("WGS84")?;
        for lat in [-89., -45., 0., 45., 89.] {
            for lon in [-179.5, -90., 0., 90., 179.5] {
                for h in [-1000., 0., 100., 10000.] {
                    let geo = Coor3D::geo(lat, lon, h);
                    let roundtrip = ellps.geodetic(&ellps.geocentric(&geo)?);
                    assert!((roundtrip[0] - geo[0]).abs() < 1e-9);
                    assert!((roundtrip[1] - geo[1]).abs() < 1e-9);
                    assert!((roundtrip[2] - geo[2]).abs() < 1e-6);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn fixture() -> Result<(), Error> {
        let ellps = Ellipsoid::named("WGS84")?;
        let cart = ellps.geocentric(&Coor3D::geo(55., 12., 100.))?;
        assert!((cart[0] - 3586525.761017918).abs() < 1e-6);
        assert!((cart[1] - 762339.584102928).abs() < 1e-6);
        assert!((cart[2] - 5201465.438406702).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn far_from_the_surface() -> Result<(), Error> {
        // Satellite altitudes and worse: heights comparable to the
        // ellipsoid axes still converge well within the iteration cap
        let ellps = Ellipsoid::named("WGS84")?;
        for (lat, lon, h) in [(45., 30., 6.0e6), (-60., 150., 1.2e7), (10., -100., -6.0e6)] {
            let geo = Coor3D::geo(lat, lon, h);
            let roundtrip = ellps.geodetic(&ellps.geocentric(&geo)?);
            assert!((roundtrip[0] - geo[0]).abs() < 1e-9);
            assert!((roundtrip[1] - geo[1]).abs() < 1e-9);
            assert!((roundtrip[2] - geo[2]).abs() < 1e-3);
        }
        Ok(())
    }

    #[test]
    fn on_the_spin_axis() -> Result<(), Error> {
        let ellps = Ellipsoid::named("WGS84")?;
        let b = ellps.semiminor_axis();

        // The poles themselves
        let north = ellps.geodetic(&Coor3D::raw(0., 0., b));
        assert_eq!(north[0], 0.);
        assert_eq!(north[1], FRAC_PI_2);
        assert!(north[2].abs() < 1e-9);

        let south = ellps.geodetic(&Coor3D::raw(0., 0., -b));
        assert_eq!(south[1], -FRAC_PI_2);
        assert!(south[2].abs() < 1e-9);

        // Above the pole, the height is measured from the pole
        let above = ellps.geodetic(&Coor3D::raw(0., 0., b + 100.));
        assert_eq!(above[1], FRAC_PI_2);
        assert!((above[2] - 100.).abs() < 1e-9);

        // The degenerate center of mass: by convention the North Pole,
        // at depth b
        let center = ellps.geodetic(&Coor3D::origin());
        assert_eq!(center[0], 0.);
        assert_eq!(center[1], FRAC_PI_2);
        assert_eq!(center[2], -b);
        Ok(())
    }

    #[test]
    fn latitude_policing() -> Result<(), Error> {
        let ellps = Ellipsoid::named("WGS84")?;

        // Half a permille past the pole: clamped onto it
        let clamped = ellps.geocentric(&Coor3D::raw(0.3, 1.0005 * FRAC_PI_2, 10.))?;
        let pole = ellps.geocentric(&Coor3D::raw(0.3, FRAC_PI_2, 10.))?;
        assert_eq!(clamped, pole);
        let clamped = ellps.geocentric(&Coor3D::raw(0.3, -1.0005 * FRAC_PI_2, 10.))?;
        let pole = ellps.geocentric(&Coor3D::raw(0.3, -FRAC_PI_2, 10.))?;
        assert_eq!(clamped, pole);

        // The clamping tolerance itself is out of range
        assert!(matches!(
            ellps.geocentric(&Coor3D::raw(0., 1.001 * FRAC_PI_2, 0.)),
            Err(Error::OutsideLimits)
        ));
        assert!(matches!(
            ellps.geocentric(&Coor3D::geo(200., 0., 0.)),
            Err(Error::OutsideLimits)
        ));

        // Wild longitudes are fine
        let weird = ellps.geocentric(&Coor3D::raw(27., 0.5, 0.))?;
        let tame = ellps.geocentric(&Coor3D::raw(angular::normalize_longitude(27.), 0.5, 0.))?;
        assert_eq!(weird, tame);
        Ok(())
    }
}
