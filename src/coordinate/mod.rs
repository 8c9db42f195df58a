mod coor3d;
mod set;

pub use coor3d::Coor3D;
pub use set::StridedSet;

use crate::INVALID_COORD;

/// `CoordinateSet` is the fundamental batch access interface: it lets the
/// transformation pipeline iterate over any caller-provided data model,
/// one [`Coor3D`] at a time, and lets it tag individual points as failed
/// without aborting the rest of the batch.
///
/// The validity tagging has default implementations writing the
/// [`INVALID_COORD`] marker into the first two coordinate elements, which
/// keeps batches interoperable with producers that mark dead points
/// in-band. Implementations backed by richer storage (e.g. a separate
/// validity mask) may override both methods and never materialize the
/// marker at all.
pub trait CoordinateSet {
    /// Number of coordinate tuples in the set
    fn len(&self) -> usize;

    /// Access the `index`th coordinate tuple
    fn get_coord(&self, index: usize) -> Coor3D;

    /// Overwrite the `index`th coordinate tuple
    fn set_coord(&mut self, index: usize, value: &Coor3D);

    /// Companion to `len()`
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the set carries a real vertical component. When `false`,
    /// third coordinate elements handed out by [`Self::get_coord()`] are
    /// synthetic zeros, and values stored through [`Self::set_coord()`]
    /// do not round-trip. Stages requiring a vertical array (geocentric
    /// conversion, 3D projection evaluation) refuse such sets up front.
    fn has_height(&self) -> bool {
        true
    }

    /// Mark the `index`th point as one that could not be converted. It
    /// will pass untouched through every subsequent pipeline stage.
    fn invalidate(&mut self, index: usize) {
        let mut coord = self.get_coord(index);
        coord[0] = INVALID_COORD;
        coord[1] = INVALID_COORD;
        self.set_coord(index, &coord);
    }

    /// Has the `index`th point been marked as unconvertible, here or by
    /// an upstream producer?
    fn is_invalid(&self, index: usize) -> bool {
        self.get_coord(index)[0] == INVALID_COORD
    }
}
