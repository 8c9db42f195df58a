use crate::authoring::*;

/// Axis order and sign convention of a reference system, given as a
/// 3 character specification over the alphabet {e, w, n, s, u, d}, one
/// character per coordinate slot. "enu" is plain easting-northing-up,
/// "neu" the swapped order common in legacy national systems, "wnu" a
/// west-positive longitude convention, and so on.
///
/// Internally the specification becomes a slot permutation and a sign
/// per slot, so application is a copy with 3 indexed, signed moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Axes {
    pos: [usize; 3],
    sgn: [f64; 3],
}

/// East-north-up, the canonical convention
impl Default for Axes {
    fn default() -> Axes {
        Axes {
            pos: [0, 1, 2],
            sgn: [1., 1., 1.],
        }
    }
}

impl Axes {
    /// Parse a 3 character axis specification. Each of the three
    /// direction pairs east/west, north/south, up/down must be
    /// represented exactly once; anything else is a malformed
    /// configuration, rejected here rather than mid-batch.
    pub fn new(spec: &str) -> Result<Axes, Error> {
        if spec.chars().count() != 3 {
            return Err(Error::BadAxes(spec.to_string()));
        }

        let mut pos = [0_usize; 3];
        let mut sgn = [1.; 3];
        let mut seen = [0_usize; 3];
        for (slot, direction) in spec.chars().enumerate() {
            let (axis, sign) = match direction {
                'e' => (0, 1.),
                'w' => (0, -1.),
                'n' => (1, 1.),
                's' => (1, -1.),
                'u' => (2, 1.),
                'd' => (2, -1.),
                _ => return Err(Error::BadAxes(spec.to_string())),
            };
            pos[slot] = axis;
            sgn[slot] = sign;
            seen[axis] += 1;
        }
        if seen != [1, 1, 1] {
            return Err(Error::BadAxes(spec.to_string()));
        }

        Ok(Axes { pos, sgn })
    }

    /// Whether this already is the canonical east-north-up convention,
    /// so that normalization may be skipped entirely
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.pos == [0, 1, 2] && self.sgn == [1., 1., 1.]
    }

    /// From system slot order to canonical east-north-up
    #[must_use]
    pub fn normalize(&self, coord: &Coor3D) -> Coor3D {
        let mut out = *coord;
        for slot in 0..3 {
            out[self.pos[slot]] = self.sgn[slot] * coord[slot];
        }
        out
    }

    /// From canonical east-north-up back to system slot order
    #[must_use]
    pub fn denormalize(&self, coord: &Coor3D) -> Coor3D {
        let mut out = *coord;
        for slot in 0..3 {
            out[slot] = self.sgn[slot] * coord[self.pos[slot]];
        }
        out
    }
}

// ----- T E S T S ---------------------------------------------------
