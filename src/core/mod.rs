//! Core building blocks: the pixel buffer view, rectangle algebra, parameters,
//! and the probe/scan/analyze/plan processing steps. These are the primitives
//! the high-level `api` module is built from.
pub mod buffer;
pub mod geometry;
pub mod params;
pub mod processing;
