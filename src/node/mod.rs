//! Decision nodes and the traits hosts use to drive them.
//!
//! [`Node`] is the typed, per-tick interface: one call consumes that tick's
//! inputs and returns at most one output packet. [`DynNode`] is the
//! object-safe counterpart used by the registry; every `Node` whose inputs
//! implement [`TickInputs`] and whose output is a [`StreamType`] gets it for
//! free.

use crate::packet::Packet;
use crate::payload::{InputSet, Payload, StreamType};
use crate::port::{Contract, Direction};
use crate::util::{NodeError, NodeResult};

pub mod landmark_convert;
pub mod merge_larger;
pub mod min_size;
pub mod roi_merge;

/// Stateless per-tick decision node.
pub trait Node: Send + Sync {
    /// Packets delivered for one tick; absent ports are `None`.
    type Inputs;
    /// Payload type of the single output port.
    type Output;

    /// Returns the port signature of this node.
    fn contract(&self) -> Contract;

    /// Processes one tick. `None` means no output this tick.
    fn process(&self, inputs: Self::Inputs) -> Option<Packet<Self::Output>>;
}

/// Typed node inputs that can be assembled from an [`InputSet`].
pub trait TickInputs: Sized {
    /// Takes the packets for this node's ports out of `set`.
    ///
    /// Packets on ports the node does not read stay in `set`.
    fn from_input_set(set: &mut InputSet, contract: &Contract) -> NodeResult<Self>;
}

/// Single-port inputs read from the contract's only input port.
impl<C: StreamType> TickInputs for Option<Packet<C>> {
    fn from_input_set(set: &mut InputSet, contract: &Contract) -> NodeResult<Self> {
        match contract.inputs() {
            [spec] => set.take(spec.tag),
            _ => Ok(None),
        }
    }
}

/// Object-safe node interface operating on erased payloads.
pub trait DynNode: Send + Sync {
    /// Returns the port signature of this node.
    fn ports(&self) -> Contract;

    /// Processes one tick of erased inputs.
    ///
    /// A packet on a port the contract does not declare is an
    /// `UnexpectedPort` error, not an absent input.
    fn process_dyn(&self, inputs: InputSet) -> NodeResult<Option<Packet<Payload>>>;
}

impl<N> DynNode for N
where
    N: Node,
    N::Inputs: TickInputs,
    N::Output: StreamType,
{
    fn ports(&self) -> Contract {
        self.contract()
    }

    fn process_dyn(&self, mut inputs: InputSet) -> NodeResult<Option<Packet<Payload>>> {
        let contract = self.contract();
        let typed = N::Inputs::from_input_set(&mut inputs, &contract)?;
        if let Some(tag) = inputs.first_tag() {
            return Err(NodeError::UnexpectedPort {
                direction: Direction::Input,
                tag,
            });
        }
        Ok(self.process(typed).map(Packet::into_dyn))
    }
}
