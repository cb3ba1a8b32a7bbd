//! File formats written by this crate.
//!
//! Only classic TIFF is supported: a single IFD describing one strip per
//! band, with every band stored as 32-bit IEEE floats.

pub mod tiff;
