//! Low-level building blocks for custom nodes and hosts.
//!
//! These items expose the reconciler's center quantization and the erased
//! input plumbing for use cases beyond the typed node API. Most users should
//! prefer the top-level node types and `NodeRegistry`.

pub use crate::node::roi_merge::{center_key, count_unique_centers, DEFAULT_CENTER_GRID_SCALE};
pub use crate::node::TickInputs;
pub use crate::payload::InputSet;
pub use crate::registry::{
    CLASSIFICATION_LIST_VECTOR_HAS_MIN_SIZE, LANDMARK_CONVERT,
    MERGE_BY_LARGER_NORMALIZED_RECT_VECTOR, MERGE_ROI_VECTORS,
    NORMALIZED_LANDMARK_LIST_VECTOR_HAS_MIN_SIZE, NORMALIZED_RECT_VECTOR_HAS_MIN_SIZE,
};
pub use crate::replay::run_ticks_dyn;
