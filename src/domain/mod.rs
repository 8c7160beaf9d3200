//! Domain types for the form extraction pipeline: geometry, text spans,
//! raw images, typed fields and result structures.

mod field;
mod geometry;
mod image;
mod result;
mod span;

pub use field::{ExtractedField, FieldKind};
pub use geometry::{BoundingBox, Point};
pub use self::image::RawImage;
pub use result::{BatchReport, BatchResult, ImageReport, ImageResult, ImageStatus};
pub use span::{mean_confidence, TextSpan};
