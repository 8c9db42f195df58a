//! Miscellaneous math functions for general use

/// Free functions for reducing angles onto their principal intervals.
pub mod angular;
