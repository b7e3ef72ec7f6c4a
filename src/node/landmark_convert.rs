//! Re-tags world landmarks as normalized landmarks.

use crate::node::Node;
use crate::packet::Packet;
use crate::payload::PayloadKind;
use crate::port::{Contract, PortTag};
use crate::types::{LandmarkList, NormalizedLandmark, NormalizedLandmarkList};

/// Copies world landmarks into a normalized landmark list.
///
/// Coordinates, visibility and presence are copied verbatim, one output
/// landmark per input landmark in the same order. No scale or translation is
/// applied. Absent input produces no output.
#[derive(Clone, Copy, Debug, Default)]
pub struct LandmarkConverter;

impl LandmarkConverter {
    pub fn new() -> Self {
        Self
    }

    pub fn convert(&self, landmarks: &LandmarkList) -> NormalizedLandmarkList {
        NormalizedLandmarkList::new(
            landmarks
                .landmarks
                .iter()
                .copied()
                .map(NormalizedLandmark::from)
                .collect(),
        )
    }
}

impl Node for LandmarkConverter {
    type Inputs = Option<Packet<LandmarkList>>;
    type Output = NormalizedLandmarkList;

    fn contract(&self) -> Contract {
        Contract::new()
            .input(PortTag::Landmarks, PayloadKind::LandmarkList)
            .output(PortTag::NormLandmarks, PayloadKind::NormalizedLandmarkList)
    }

    fn process(&self, inputs: Self::Inputs) -> Option<Packet<NormalizedLandmarkList>> {
        let packet = inputs?;
        Some(Packet::new(self.convert(packet.payload()), packet.timestamp()))
    }
}
