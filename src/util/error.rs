//! Error types for roimerge.

use crate::payload::PayloadKind;
use crate::port::{Direction, PortTag};
use thiserror::Error;

/// Result alias for roimerge operations.
pub type NodeResult<T> = std::result::Result<T, NodeError>;

/// Errors raised while building or wiring nodes.
///
/// Every variant describes a configuration problem detected before the
/// graph starts running. Absent inputs and duplicate regions are regular
/// per-tick states, not errors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NodeError {
    /// The declaration has a different number of ports than the contract.
    #[error("{direction} port count mismatch: expected {expected}, got {got}")]
    PortCountMismatch {
        direction: Direction,
        expected: usize,
        got: usize,
    },
    /// A port required by the contract was not declared.
    #[error("missing {direction} port {tag}")]
    MissingPort { direction: Direction, tag: PortTag },
    /// A packet arrived on a port the contract does not declare.
    #[error("unexpected {direction} port {tag}")]
    UnexpectedPort { direction: Direction, tag: PortTag },
    /// The same port tag was declared twice.
    #[error("duplicate {direction} port {tag}")]
    DuplicatePort { direction: Direction, tag: PortTag },
    /// A port carries a payload of a different type than the contract.
    #[error("payload mismatch on port {tag}: expected {expected}, got {got}")]
    PayloadMismatch {
        tag: PortTag,
        expected: PayloadKind,
        got: PayloadKind,
    },
    /// A port tag string could not be parsed.
    #[error("invalid port tag: {tag:?}")]
    InvalidPortTag { tag: String },
    /// No factory is registered under the requested name.
    #[error("unknown node: {name}")]
    UnknownNode { name: String },
    /// A factory is already registered under this name.
    #[error("node already registered: {name}")]
    DuplicateNode { name: String },
    /// The node options are invalid.
    #[error("invalid option: {0}")]
    InvalidOption(&'static str),
}
