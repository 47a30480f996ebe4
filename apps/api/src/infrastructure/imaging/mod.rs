//! Photo preparation: EXIF orientation correction and re-encoding for embedding.

pub mod normalizer;
pub mod orientation;

pub use normalizer::{NormalizeError, NormalizedImage, normalize};
pub use orientation::{OrientationReading, Rotation};
