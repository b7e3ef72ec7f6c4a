//! Reconciliation of landmark-derived and detection-derived regions.
//!
//! Landmark-derived regions are cheap per-frame continuations of tracked
//! subjects; detection-derived regions are authoritative but less frequent.
//! Landmark regions are kept for stability unless they are outnumbered by
//! detections, or unless two of them have collapsed onto the same center
//! (several tracks converging on one subject).
//!
//! Duplicate detection quantizes every center onto a square grid of
//! `1 / center_grid_scale` cells and counts distinct cells. Two regions whose
//! centers fall into the same cell are treated as the same region.

use crate::node::{Node, TickInputs};
use crate::packet::Packet;
use crate::payload::{InputSet, PayloadKind};
use crate::port::{Contract, PortTag};
use crate::trace::trace_warn;
use crate::types::NormalizedRect;
use crate::util::{NodeError, NodeResult};
use std::collections::HashSet;

/// Grid cells per unit of normalized space used for duplicate detection.
pub const DEFAULT_CENTER_GRID_SCALE: u32 = 100;

/// Configuration for [`RoiReconciler`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoiMergeOptions {
    /// Quantization scale for region centers; must be non-zero.
    pub center_grid_scale: u32,
}

impl Default for RoiMergeOptions {
    fn default() -> Self {
        Self {
            center_grid_scale: DEFAULT_CENTER_GRID_SCALE,
        }
    }
}

/// Packets on the reconciler ports for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoiInputs {
    pub from_landmarks: Option<Packet<Vec<NormalizedRect>>>,
    pub from_detection: Option<Packet<Vec<NormalizedRect>>>,
}

impl RoiInputs {
    pub fn new(
        from_landmarks: Option<Packet<Vec<NormalizedRect>>>,
        from_detection: Option<Packet<Vec<NormalizedRect>>>,
    ) -> Self {
        Self {
            from_landmarks,
            from_detection,
        }
    }
}

impl TickInputs for RoiInputs {
    fn from_input_set(set: &mut InputSet, _contract: &Contract) -> NodeResult<Self> {
        Ok(Self {
            from_landmarks: set.take(PortTag::RectsFromLandmarks)?,
            from_detection: set.take(PortTag::RectsFromDetection)?,
        })
    }
}

/// Which input the reconciler forwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoiSource {
    Landmarks,
    Detection,
}

/// Chooses between landmark-derived and detection-derived regions.
///
/// With both inputs present, the rules apply in order:
/// 1. more detections than landmark regions: forward detections;
/// 2. exactly one landmark region: forward landmarks;
/// 3. landmark regions with colliding quantized centers: forward detections
///    and log a warning;
/// 4. otherwise forward landmarks.
///
/// A lone input is forwarded as is and two absent inputs produce nothing.
#[derive(Clone, Debug)]
pub struct RoiReconciler {
    options: RoiMergeOptions,
}

impl RoiReconciler {
    pub fn new(options: RoiMergeOptions) -> NodeResult<Self> {
        if options.center_grid_scale == 0 {
            return Err(NodeError::InvalidOption(
                "center_grid_scale must be greater than zero",
            ));
        }
        Ok(Self { options })
    }

    pub fn center_grid_scale(&self) -> u32 {
        self.options.center_grid_scale
    }

    /// Decides which collection to forward when both are present.
    pub fn decide(
        &self,
        landmarks: &[NormalizedRect],
        detection: &[NormalizedRect],
    ) -> RoiSource {
        if detection.len() > landmarks.len() {
            return RoiSource::Detection;
        }
        if landmarks.len() == 1 {
            return RoiSource::Landmarks;
        }

        let unique = count_unique_centers(landmarks, self.options.center_grid_scale);
        if unique < landmarks.len() {
            trace_warn!(
                deduplicated = unique,
                original = landmarks.len(),
                "found duplicate landmark ROIs, new count {} <- {}",
                unique,
                landmarks.len()
            );
            RoiSource::Detection
        } else {
            RoiSource::Landmarks
        }
    }

    /// Selects the packet to forward for one tick.
    pub fn reconcile(
        &self,
        from_landmarks: Option<Packet<Vec<NormalizedRect>>>,
        from_detection: Option<Packet<Vec<NormalizedRect>>>,
    ) -> Option<Packet<Vec<NormalizedRect>>> {
        match (from_landmarks, from_detection) {
            (Some(landmarks), Some(detection)) => {
                match self.decide(landmarks.payload(), detection.payload()) {
                    RoiSource::Landmarks => Some(landmarks),
                    RoiSource::Detection => Some(detection),
                }
            }
            (None, detection) => detection,
            (landmarks, None) => landmarks,
        }
    }
}

impl Default for RoiReconciler {
    fn default() -> Self {
        Self {
            options: RoiMergeOptions::default(),
        }
    }
}

impl Node for RoiReconciler {
    type Inputs = RoiInputs;
    type Output = Vec<NormalizedRect>;

    fn contract(&self) -> Contract {
        Contract::new()
            .input(PortTag::RectsFromLandmarks, PayloadKind::NormalizedRectVec)
            .input(PortTag::RectsFromDetection, PayloadKind::NormalizedRectVec)
            .output(PortTag::Index(0), PayloadKind::NormalizedRectVec)
    }

    fn process(&self, inputs: Self::Inputs) -> Option<Packet<Self::Output>> {
        self.reconcile(inputs.from_landmarks, inputs.from_detection)
    }
}

/// Packs the quantized center of `rect` into a single key.
///
/// Each coordinate is scaled and truncated toward zero; X occupies the high
/// 32 bits and Y the low 32 bits, so distinct cells never share a key.
pub fn center_key(rect: &NormalizedRect, scale: u32) -> i64 {
    let scale = scale as f32;
    let qx = (rect.x_center * scale) as i32;
    let qy = (rect.y_center * scale) as i32;
    (i64::from(qx) << 32) | i64::from(qy as u32)
}

/// Counts distinct quantized centers among `rects`.
pub fn count_unique_centers(rects: &[NormalizedRect], scale: u32) -> usize {
    rects
        .iter()
        .map(|rect| center_key(rect, scale))
        .collect::<HashSet<_>>()
        .len()
}
