//! Utility functions for images.

mod image;

pub use self::image::{decode_gray, dynamic_to_gray};
