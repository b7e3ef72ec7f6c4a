//! Concrete element types carried on detection streams.
//!
//! Only the fields the nodes read or copy are modeled here; everything else
//! is treated as opaque payload by the graph.

mod classification;
mod landmark;
mod rect;

pub use classification::{Classification, ClassificationList};
pub use landmark::{Landmark, LandmarkList, NormalizedLandmark, NormalizedLandmarkList};
pub use rect::NormalizedRect;
