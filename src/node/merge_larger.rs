//! Forwards the larger of two candidate collections.

use crate::collection::Collection;
use crate::node::{Node, TickInputs};
use crate::packet::Packet;
use crate::payload::{InputSet, StreamType};
use crate::port::{Contract, PortTag};
use crate::util::NodeResult;
use std::cmp::Ordering;
use std::marker::PhantomData;

/// Input side of a two-input node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    /// Port 0, the first declared input.
    #[default]
    Left,
    /// Port 1.
    Right,
}

/// Configuration for [`LargerOfTwoMerger`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergeByLargerOptions {
    /// Side forwarded when both collections have the same size.
    pub prefer: Side,
}

/// Packets on the two merger ports for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeInputs<C> {
    pub left: Option<Packet<C>>,
    pub right: Option<Packet<C>>,
}

impl<C: StreamType> TickInputs for MergeInputs<C> {
    fn from_input_set(set: &mut InputSet, _contract: &Contract) -> NodeResult<Self> {
        Ok(Self {
            left: set.take(PortTag::Index(0))?,
            right: set.take(PortTag::Index(1))?,
        })
    }
}

/// Forwards whichever input holds more elements.
///
/// Ties go to [`MergeByLargerOptions::prefer`]. When only one side is present
/// it is forwarded as is; when neither is, nothing is emitted. The chosen
/// packet is moved to the output untouched, timestamp included.
pub struct LargerOfTwoMerger<C> {
    options: MergeByLargerOptions,
    _collection: PhantomData<fn() -> C>,
}

impl<C> LargerOfTwoMerger<C> {
    pub fn new(options: MergeByLargerOptions) -> Self {
        Self {
            options,
            _collection: PhantomData,
        }
    }

    /// Returns the side that wins ties.
    pub fn preferred(&self) -> Side {
        self.options.prefer
    }
}

impl<C: Collection> LargerOfTwoMerger<C> {
    /// Picks the side to forward given both sizes.
    pub fn choose(&self, left_size: usize, right_size: usize) -> Side {
        match left_size.cmp(&right_size) {
            Ordering::Greater => Side::Left,
            Ordering::Less => Side::Right,
            Ordering::Equal => self.options.prefer,
        }
    }

    /// Selects between two optional packets.
    pub fn select(
        &self,
        left: Option<Packet<C>>,
        right: Option<Packet<C>>,
    ) -> Option<Packet<C>> {
        match (left, right) {
            (None, None) => None,
            (Some(left), None) => Some(left),
            (None, Some(right)) => Some(right),
            (Some(left), Some(right)) => {
                match self.choose(left.payload().size(), right.payload().size()) {
                    Side::Left => Some(left),
                    Side::Right => Some(right),
                }
            }
        }
    }
}

impl<C: Collection + StreamType> Node for LargerOfTwoMerger<C> {
    type Inputs = MergeInputs<C>;
    type Output = C;

    fn contract(&self) -> Contract {
        Contract::new()
            .input(PortTag::Index(0), C::KIND)
            .input(PortTag::Index(1), C::KIND)
            .output(PortTag::Index(0), C::KIND)
    }

    fn process(&self, inputs: Self::Inputs) -> Option<Packet<C>> {
        self.select(inputs.left, inputs.right)
    }
}
