//! Running nodes over recorded tick sequences.
//!
//! Nodes keep no state between ticks, so a recorded sequence can be
//! replayed in any order. The parallel variant (feature `rayon`) returns the
//! same outputs as the sequential one, in tick order.

use crate::node::{DynNode, Node};
use crate::packet::Packet;
use crate::payload::{InputSet, Payload};
use crate::trace::{trace_event, trace_span};
use crate::util::NodeResult;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Processes each tick in order and collects one optional output per tick.
pub fn run_ticks<N: Node>(node: &N, ticks: Vec<N::Inputs>) -> Vec<Option<Packet<N::Output>>> {
    let _span = trace_span!("run_ticks", ticks = ticks.len()).entered();

    let outputs: Vec<_> = ticks.into_iter().map(|tick| node.process(tick)).collect();

    trace_event!("ticks_emitted", count = emitted(&outputs));
    outputs
}

/// Parallel counterpart of [`run_ticks`].
#[cfg(feature = "rayon")]
pub fn run_ticks_par<N>(node: &N, ticks: Vec<N::Inputs>) -> Vec<Option<Packet<N::Output>>>
where
    N: Node,
    N::Inputs: Send,
    N::Output: Send,
{
    let _span = trace_span!("run_ticks", ticks = ticks.len(), parallel = true).entered();

    let outputs: Vec<_> = ticks
        .into_par_iter()
        .map(|tick| node.process(tick))
        .collect();

    trace_event!("ticks_emitted", count = emitted(&outputs));
    outputs
}

/// Processes erased ticks in order, stopping at the first misrouted or mistyped packet.
pub fn run_ticks_dyn(
    node: &dyn DynNode,
    ticks: Vec<InputSet>,
) -> NodeResult<Vec<Option<Packet<Payload>>>> {
    let _span = trace_span!("run_ticks", ticks = ticks.len(), erased = true).entered();

    let outputs = ticks
        .into_iter()
        .map(|tick| node.process_dyn(tick))
        .collect::<NodeResult<Vec<_>>>()?;

    trace_event!("ticks_emitted", count = emitted(&outputs));
    Ok(outputs)
}

fn emitted<T>(outputs: &[Option<T>]) -> usize {
    outputs.iter().filter(|out| out.is_some()).count()
}
