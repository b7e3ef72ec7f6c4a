//! Name-keyed table of node factories.
//!
//! Hosts that build graphs from declarative descriptions look nodes up by a
//! stable identifier. The table is an explicit value: populate it with
//! [`NodeRegistry::with_builtin`] and [`NodeRegistry::register`] at startup.

use crate::collection::Collection;
use crate::node::landmark_convert::LandmarkConverter;
use crate::node::merge_larger::{LargerOfTwoMerger, MergeByLargerOptions};
use crate::node::min_size::{MinSizeGate, MinSizeOptions};
use crate::node::roi_merge::{RoiMergeOptions, RoiReconciler};
use crate::node::DynNode;
use crate::payload::StreamType;
use crate::port::NodeDecl;
use crate::trace::{trace_event, trace_span};
use crate::types::{ClassificationList, NormalizedLandmarkList, NormalizedRect};
use crate::util::{NodeError, NodeResult};
use std::collections::BTreeMap;
use std::fmt;

/// Options for every built-in node; each factory reads its own section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeOptions {
    pub min_size: MinSizeOptions,
    pub merge_by_larger: MergeByLargerOptions,
    pub roi_merge: RoiMergeOptions,
}

/// Constructs a node from options.
pub type NodeFactory = fn(&NodeOptions) -> NodeResult<Box<dyn DynNode>>;

/// Gate over a vector of normalized rectangles.
pub const NORMALIZED_RECT_VECTOR_HAS_MIN_SIZE: &str = "NormalizedRectVectorHasMinSizeCalculator";
/// Gate over a vector of normalized landmark lists.
pub const NORMALIZED_LANDMARK_LIST_VECTOR_HAS_MIN_SIZE: &str =
    "NormalizedLandmarkListVectorHasMinSizeCalculator";
/// Gate over a vector of classification lists.
pub const CLASSIFICATION_LIST_VECTOR_HAS_MIN_SIZE: &str =
    "ClassificationListVectorHasMinSizeCalculator";
/// Larger-of-two merger over vectors of normalized rectangles.
pub const MERGE_BY_LARGER_NORMALIZED_RECT_VECTOR: &str =
    "MergeByLargerNormalizedRectVectorCalculator";
/// Landmark/detection region reconciler.
pub const MERGE_ROI_VECTORS: &str = "MergeRoiVectorsCalculator";
/// World-to-normalized landmark converter.
pub const LANDMARK_CONVERT: &str = "LandmarkConvertCalculator";

fn min_size_factory<C>(options: &NodeOptions) -> NodeResult<Box<dyn DynNode>>
where
    C: Collection + StreamType + 'static,
{
    Ok(Box::new(MinSizeGate::<C>::new(options.min_size.clone())))
}

fn merge_by_larger_factory<C>(options: &NodeOptions) -> NodeResult<Box<dyn DynNode>>
where
    C: Collection + StreamType + 'static,
{
    Ok(Box::new(LargerOfTwoMerger::<C>::new(
        options.merge_by_larger.clone(),
    )))
}

fn roi_merge_factory(options: &NodeOptions) -> NodeResult<Box<dyn DynNode>> {
    Ok(Box::new(RoiReconciler::new(options.roi_merge.clone())?))
}

fn landmark_convert_factory(_options: &NodeOptions) -> NodeResult<Box<dyn DynNode>> {
    Ok(Box::new(LandmarkConverter::new()))
}

/// Registration table mapping identifiers to factories.
#[derive(Clone, Default)]
pub struct NodeRegistry {
    factories: BTreeMap<&'static str, NodeFactory>,
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

impl NodeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in node.
    pub fn with_builtin() -> Self {
        let builtin: [(&'static str, NodeFactory); 6] = [
            (
                NORMALIZED_RECT_VECTOR_HAS_MIN_SIZE,
                min_size_factory::<Vec<NormalizedRect>>,
            ),
            (
                NORMALIZED_LANDMARK_LIST_VECTOR_HAS_MIN_SIZE,
                min_size_factory::<Vec<NormalizedLandmarkList>>,
            ),
            (
                CLASSIFICATION_LIST_VECTOR_HAS_MIN_SIZE,
                min_size_factory::<Vec<ClassificationList>>,
            ),
            (
                MERGE_BY_LARGER_NORMALIZED_RECT_VECTOR,
                merge_by_larger_factory::<Vec<NormalizedRect>>,
            ),
            (MERGE_ROI_VECTORS, roi_merge_factory),
            (LANDMARK_CONVERT, landmark_convert_factory),
        ];
        Self {
            factories: builtin.into_iter().collect(),
        }
    }

    /// Adds a factory under `name`; names must be unique.
    pub fn register(&mut self, name: &'static str, factory: NodeFactory) -> NodeResult<()> {
        if self.factories.contains_key(name) {
            return Err(NodeError::DuplicateNode {
                name: name.to_owned(),
            });
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns registered identifiers in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Builds the node registered as `name` and checks `decl` against it.
    ///
    /// Fails on unknown names, invalid options and any port mismatch; a node
    /// returned from here is ready to process ticks.
    pub fn build(
        &self,
        name: &str,
        decl: &NodeDecl,
        options: &NodeOptions,
    ) -> NodeResult<Box<dyn DynNode>> {
        let _span = trace_span!("build_node", node = name).entered();

        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| NodeError::UnknownNode {
                name: name.to_owned(),
            })?;
        let node = factory(options)?;
        node.ports().validate(decl)?;

        trace_event!(
            "node_built",
            inputs = decl.inputs().len(),
            outputs = decl.outputs().len()
        );
        Ok(node)
    }
}
