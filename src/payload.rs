//! Type-erased payloads for hosts that wire nodes from descriptions.
//!
//! Typed nodes never see a [`Payload`]; the erased layer converts at the
//! boundary through [`StreamType`] and reports a `PayloadMismatch` when a
//! host delivers the wrong type on a port.

use crate::packet::Packet;
use crate::port::PortTag;
use crate::types::{ClassificationList, LandmarkList, NormalizedLandmarkList, NormalizedRect};
use crate::util::{NodeError, NodeResult};
use std::collections::BTreeMap;
use std::fmt;

/// Payload type carried on a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    NormalizedRectVec,
    NormalizedLandmarkListVec,
    ClassificationListVec,
    LandmarkList,
    NormalizedLandmarkList,
    Bool,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayloadKind::NormalizedRectVec => "Vec<NormalizedRect>",
            PayloadKind::NormalizedLandmarkListVec => "Vec<NormalizedLandmarkList>",
            PayloadKind::ClassificationListVec => "Vec<ClassificationList>",
            PayloadKind::LandmarkList => "LandmarkList",
            PayloadKind::NormalizedLandmarkList => "NormalizedLandmarkList",
            PayloadKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// Value of any stream type the built-in nodes consume or produce.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Rects(Vec<NormalizedRect>),
    NormalizedLandmarkLists(Vec<NormalizedLandmarkList>),
    ClassificationLists(Vec<ClassificationList>),
    Landmarks(LandmarkList),
    NormalizedLandmarks(NormalizedLandmarkList),
    Flag(bool),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Rects(_) => PayloadKind::NormalizedRectVec,
            Payload::NormalizedLandmarkLists(_) => PayloadKind::NormalizedLandmarkListVec,
            Payload::ClassificationLists(_) => PayloadKind::ClassificationListVec,
            Payload::Landmarks(_) => PayloadKind::LandmarkList,
            Payload::NormalizedLandmarks(_) => PayloadKind::NormalizedLandmarkList,
            Payload::Flag(_) => PayloadKind::Bool,
        }
    }
}

/// Concrete stream type with a [`Payload`] representation.
pub trait StreamType: Sized {
    /// Payload kind used in contracts.
    const KIND: PayloadKind;

    fn into_payload(self) -> Payload;

    /// Extracts the concrete value, handing the payload back on mismatch.
    fn from_payload(payload: Payload) -> Result<Self, Payload>;
}

macro_rules! impl_stream_type {
    ($ty:ty, $kind:ident, $variant:ident) => {
        impl StreamType for $ty {
            const KIND: PayloadKind = PayloadKind::$kind;

            fn into_payload(self) -> Payload {
                Payload::$variant(self)
            }

            fn from_payload(payload: Payload) -> Result<Self, Payload> {
                match payload {
                    Payload::$variant(value) => Ok(value),
                    other => Err(other),
                }
            }
        }
    };
}

impl_stream_type!(Vec<NormalizedRect>, NormalizedRectVec, Rects);
impl_stream_type!(
    Vec<NormalizedLandmarkList>,
    NormalizedLandmarkListVec,
    NormalizedLandmarkLists
);
impl_stream_type!(Vec<ClassificationList>, ClassificationListVec, ClassificationLists);
impl_stream_type!(LandmarkList, LandmarkList, Landmarks);
impl_stream_type!(NormalizedLandmarkList, NormalizedLandmarkList, NormalizedLandmarks);
impl_stream_type!(bool, Bool, Flag);

impl<T: StreamType> Packet<T> {
    /// Erases the payload type, keeping the timestamp.
    pub fn into_dyn(self) -> Packet<Payload> {
        self.map(StreamType::into_payload)
    }
}

impl Packet<Payload> {
    /// Recovers a typed packet received on `tag`.
    pub fn downcast<T: StreamType>(self, tag: PortTag) -> NodeResult<Packet<T>> {
        let (payload, timestamp) = self.into_parts();
        match T::from_payload(payload) {
            Ok(value) => Ok(Packet::new(value, timestamp)),
            Err(other) => Err(NodeError::PayloadMismatch {
                tag,
                expected: T::KIND,
                got: other.kind(),
            }),
        }
    }
}

/// Packets available on a node's input ports for one tick.
///
/// Ports without an entry are absent this tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSet {
    packets: BTreeMap<PortTag, Packet<Payload>>,
}

impl InputSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a packet on a port, returning any packet it replaces.
    pub fn insert(&mut self, tag: PortTag, packet: Packet<Payload>) -> Option<Packet<Payload>> {
        self.packets.insert(tag, packet)
    }

    /// Builder form of [`InputSet::insert`] for typed packets.
    pub fn with<T: StreamType>(mut self, tag: PortTag, packet: Packet<T>) -> Self {
        self.packets.insert(tag, packet.into_dyn());
        self
    }

    /// Removes the packet on `tag` and converts it to `T`.
    pub fn take<T: StreamType>(&mut self, tag: PortTag) -> NodeResult<Option<Packet<T>>> {
        self.packets
            .remove(&tag)
            .map(|packet| packet.downcast(tag))
            .transpose()
    }

    /// Returns `true` if a packet is present on `tag`.
    pub fn contains(&self, tag: PortTag) -> bool {
        self.packets.contains_key(&tag)
    }

    /// Returns the lowest tag that still holds a packet.
    pub fn first_tag(&self) -> Option<PortTag> {
        self.packets.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{InputSet, Payload, PayloadKind};
    use crate::packet::{Packet, Timestamp};
    use crate::port::PortTag;
    use crate::types::{LandmarkList, NormalizedRect};
    use crate::util::NodeError;

    #[test]
    fn take_converts_matching_payload() {
        let rects = vec![NormalizedRect::from_center(0.5, 0.5, 0.1, 0.1)];
        let mut set =
            InputSet::new().with(PortTag::Iterable, Packet::new(rects.clone(), Timestamp::new(7)));
        assert!(set.contains(PortTag::Iterable));
        assert_eq!(set.len(), 1);

        let packet = set.take::<Vec<NormalizedRect>>(PortTag::Iterable).unwrap();
        let packet = packet.unwrap();
        assert_eq!(packet.payload(), &rects);
        assert_eq!(packet.timestamp().value(), 7);
        assert!(set.is_empty());
        assert!(!set.contains(PortTag::Iterable));
        assert_eq!(set.first_tag(), None);
    }

    #[test]
    fn take_reports_wrong_payload_kind() {
        let mut set =
            InputSet::new().with(PortTag::Landmarks, Packet::new(true, Timestamp::new(1)));

        let err = set.take::<LandmarkList>(PortTag::Landmarks).err().unwrap();
        assert_eq!(
            err,
            NodeError::PayloadMismatch {
                tag: PortTag::Landmarks,
                expected: PayloadKind::LandmarkList,
                got: PayloadKind::Bool,
            }
        );
    }

    #[test]
    fn first_tag_reports_leftover_ports_in_order() {
        let set = InputSet::new()
            .with(
                PortTag::RectsFromDetection,
                Packet::new(Vec::<NormalizedRect>::new(), Timestamp::new(0)),
            )
            .with(PortTag::Index(1), Packet::new(true, Timestamp::new(0)));
        assert_eq!(set.len(), 2);
        assert_eq!(set.first_tag(), Some(PortTag::RectsFromDetection));
    }

    #[test]
    fn absent_port_is_none() {
        let mut set = InputSet::new();
        assert!(set.take::<bool>(PortTag::Index(0)).unwrap().is_none());
        assert_eq!(Payload::Flag(false).kind(), PayloadKind::Bool);
    }
}
