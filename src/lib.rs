//! RoiMerge provides per-tick decision nodes for detection dataflow graphs.
//!
//! Nodes consume tagged input streams of typed collections (normalized
//! rectangles, landmark lists, classification lists), apply a sizing or merge
//! policy and forward exactly one of their inputs downstream. Nodes are
//! stateless: every call to `process` is a pure function of that tick's
//! inputs.
//!
//! The typed API ([`Node`]) is the primary entry point. The type-erased
//! [`DynNode`] layer and the [`NodeRegistry`] exist for hosts that build graphs
//! from declarative descriptions.

mod trace;

pub mod collection;
pub mod lowlevel;
pub mod node;
pub mod packet;
pub mod payload;
pub mod port;
pub mod registry;
pub mod replay;
pub mod types;
pub mod util;

pub use collection::Collection;
pub use node::landmark_convert::LandmarkConverter;
pub use node::merge_larger::{LargerOfTwoMerger, MergeByLargerOptions, MergeInputs, Side};
pub use node::min_size::{MinSizeGate, MinSizeOptions};
pub use node::roi_merge::{RoiInputs, RoiMergeOptions, RoiReconciler, RoiSource};
pub use node::{DynNode, Node, TickInputs};
pub use packet::{Packet, Timestamp};
pub use payload::{InputSet, Payload, PayloadKind, StreamType};
pub use port::{Contract, DeclaredPort, Direction, NodeDecl, PortSpec, PortTag};
pub use registry::{NodeFactory, NodeOptions, NodeRegistry};
pub use types::{
    Classification, ClassificationList, Landmark, LandmarkList, NormalizedLandmark,
    NormalizedLandmarkList, NormalizedRect,
};
pub use util::{NodeError, NodeResult};
