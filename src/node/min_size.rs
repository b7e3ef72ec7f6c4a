//! Boolean gate on collection size.

use crate::collection::Collection;
use crate::node::Node;
use crate::packet::Packet;
use crate::payload::{PayloadKind, StreamType};
use crate::port::{Contract, PortTag};
use std::marker::PhantomData;

/// Configuration for [`MinSizeGate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MinSizeOptions {
    /// Minimum number of elements for the gate to report `true`.
    pub min_size: usize,
}

/// Reports whether the incoming collection has at least `min_size` elements.
///
/// Input: `ITERABLE` carrying `C`. Output: port 0 carrying `bool`, stamped
/// with the input timestamp. Absent input produces no output, which is
/// distinct from an explicit `false`.
pub struct MinSizeGate<C> {
    options: MinSizeOptions,
    _collection: PhantomData<fn() -> C>,
}

impl<C> MinSizeGate<C> {
    pub fn new(options: MinSizeOptions) -> Self {
        Self {
            options,
            _collection: PhantomData,
        }
    }

    /// Returns the configured threshold.
    pub fn min_size(&self) -> usize {
        self.options.min_size
    }
}

impl<C: Collection> MinSizeGate<C> {
    /// Applies the threshold to a collection.
    pub fn evaluate(&self, collection: &C) -> bool {
        collection.size() >= self.options.min_size
    }
}

impl<C: Collection + StreamType> Node for MinSizeGate<C> {
    type Inputs = Option<Packet<C>>;
    type Output = bool;

    fn contract(&self) -> Contract {
        Contract::new()
            .input(PortTag::Iterable, C::KIND)
            .output(PortTag::Index(0), PayloadKind::Bool)
    }

    fn process(&self, inputs: Self::Inputs) -> Option<Packet<bool>> {
        let packet = inputs?;
        Some(Packet::new(self.evaluate(packet.payload()), packet.timestamp()))
    }
}

#[cfg(test)]
mod tests {
    use super::{MinSizeGate, MinSizeOptions};
    use crate::types::ClassificationList;

    #[test]
    fn zero_threshold_accepts_empty() {
        let gate = MinSizeGate::<Vec<ClassificationList>>::new(MinSizeOptions::default());
        assert_eq!(gate.min_size(), 0);
        assert!(gate.evaluate(&Vec::new()));
    }

    #[test]
    fn threshold_is_inclusive() {
        let gate = MinSizeGate::<Vec<u8>>::new(MinSizeOptions { min_size: 2 });
        assert!(!gate.evaluate(&vec![1]));
        assert!(gate.evaluate(&vec![1, 2]));
        assert!(gate.evaluate(&vec![1, 2, 3]));
    }
}
