use super::*;
use crate::Error;

// Some helper macros, simplifying the impls for the container types

// Produce the correct len() method for arrays, slices, and vecs
macro_rules! length {
    (array) => {
        fn len(&self) -> usize {
            N
        }
    };

    (slice) => {
        fn len(&self) -> usize {
            (**self).len()
        }
    };

    (vec) => {
        fn len(&self) -> usize {
            self.len()
        }
    };
}

macro_rules! coordinate_set_impl_for_coor3d {
    ($kind:ident) => {
        length!($kind);

        fn get_coord(&self, index: usize) -> Coor3D {
            self[index]
        }

        fn set_coord(&mut self, index: usize, value: &Coor3D) {
            self[index] = *value;
        }
    };
}

impl<const N: usize> CoordinateSet for [Coor3D; N] {
    coordinate_set_impl_for_coor3d!(array);
}

impl CoordinateSet for &mut [Coor3D] {
    coordinate_set_impl_for_coor3d!(slice);
}

impl CoordinateSet for Vec<Coor3D> {
    coordinate_set_impl_for_coor3d!(vec);
}

// ----- S T R I D E D   S E T -----------------------------------------------

/// Caller-owned planar coordinate storage: separate x/y arrays, an
/// optional z array, `count` points, consecutive points `stride` elements
/// apart. This is the classic calling convention of C-era transformation
/// APIs, where a caller hands over the coordinate columns of an
/// interleaved record array.
#[derive(Debug)]
pub struct StridedSet<'a> {
    x: &'a mut [f64],
    y: &'a mut [f64],
    z: Option<&'a mut [f64]>,
    count: usize,
    stride: usize,
}

impl<'a> StridedSet<'a> {
    /// A stride of 0 is taken as 1 (densely packed). Fails if any of the
    /// supplied arrays is too short to hold `count` elements spaced
    /// `stride` apart.
    pub fn new(
        x: &'a mut [f64],
        y: &'a mut [f64],
        z: Option<&'a mut [f64]>,
        count: usize,
        stride: usize,
    ) -> Result<StridedSet<'a>, Error> {
        let stride = stride.max(1);
        let needed = if count == 0 { 0 } else { (count - 1) * stride + 1 };
        if x.len() < needed || y.len() < needed {
            return Err(Error::General(
                "coordinate array too short for count and stride",
            ));
        }
        if z.as_deref().map_or(false, |z| z.len() < needed) {
            return Err(Error::General(
                "vertical array too short for count and stride",
            ));
        }
        Ok(StridedSet {
            x,
            y,
            z,
            count,
            stride,
        })
    }
}

impl CoordinateSet for StridedSet<'_> {
    fn len(&self) -> usize {
        self.count
    }

    fn get_coord(&self, index: usize) -> Coor3D {
        let i = index * self.stride;
        let z = self.z.as_deref().map_or(0., |z| z[i]);
        Coor3D([self.x[i], self.y[i], z])
    }

    fn set_coord(&mut self, index: usize, value: &Coor3D) {
        let i = index * self.stride;
        self.x[i] = value[0];
        self.y[i] = value[1];
        if let Some(z) = self.z.as_deref_mut() {
            z[i] = value[2];
        }
    }

    fn has_height(&self) -> bool {
        self.z.is_some()
    }
}

// ----- T E S T S ---------------------------------------------------
