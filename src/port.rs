//! Port tags, contracts and declaration checks.
//!
//! A node states its ports in a [`Contract`]. A host describing a graph
//! declares which streams it connects to which ports in a [`NodeDecl`].
//! [`Contract::validate`] runs at graph-construction time so that arity,
//! tag and type mismatches surface before the first tick.

use crate::payload::PayloadKind;
use crate::util::{NodeError, NodeResult};
use std::fmt;
use std::str::FromStr;

/// Port identifier, either a well-known tag or a positional index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PortTag {
    /// Collection inspected by a size gate.
    Iterable,
    /// Regions derived from tracked landmarks.
    RectsFromLandmarks,
    /// Regions derived from a detector.
    RectsFromDetection,
    /// World-space landmarks.
    Landmarks,
    /// Normalized-space landmarks.
    NormLandmarks,
    /// Untagged port addressed by position.
    Index(usize),
}

impl PortTag {
    /// Returns the canonical tag text, or `None` for positional ports.
    pub fn name(self) -> Option<&'static str> {
        match self {
            PortTag::Iterable => Some("ITERABLE"),
            PortTag::RectsFromLandmarks => Some("RECTS_FROM_LANDMARKS"),
            PortTag::RectsFromDetection => Some("RECTS_FROM_DETECTION"),
            PortTag::Landmarks => Some("LANDMARKS"),
            PortTag::NormLandmarks => Some("NORM_LANDMARKS"),
            PortTag::Index(_) => None,
        }
    }
}

impl fmt::Display for PortTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortTag::Index(idx) => write!(f, "{idx}"),
            tag => f.write_str(tag.name().unwrap_or_default()),
        }
    }
}

impl FromStr for PortTag {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s {
            "ITERABLE" => PortTag::Iterable,
            "RECTS_FROM_LANDMARKS" => PortTag::RectsFromLandmarks,
            "RECTS_FROM_DETECTION" => PortTag::RectsFromDetection,
            "LANDMARKS" => PortTag::Landmarks,
            "NORM_LANDMARKS" => PortTag::NormLandmarks,
            _ => match s.parse::<usize>() {
                Ok(idx) => PortTag::Index(idx),
                Err(_) => {
                    return Err(NodeError::InvalidPortTag { tag: s.to_owned() });
                }
            },
        };
        Ok(tag)
    }
}

/// Whether a port consumes or produces packets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => f.write_str("input"),
            Direction::Output => f.write_str("output"),
        }
    }
}

/// A port a node requires, with the payload type it carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortSpec {
    pub tag: PortTag,
    pub kind: PayloadKind,
}

/// Full port signature of a node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contract {
    inputs: Vec<PortSpec>,
    outputs: Vec<PortSpec>,
}

impl Contract {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required input port.
    pub fn input(mut self, tag: PortTag, kind: PayloadKind) -> Self {
        self.inputs.push(PortSpec { tag, kind });
        self
    }

    /// Adds an output port.
    pub fn output(mut self, tag: PortTag, kind: PayloadKind) -> Self {
        self.outputs.push(PortSpec { tag, kind });
        self
    }

    pub fn inputs(&self) -> &[PortSpec] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[PortSpec] {
        &self.outputs
    }

    /// Looks up the input port with the given tag.
    pub fn input_spec(&self, tag: PortTag) -> Option<&PortSpec> {
        self.inputs.iter().find(|spec| spec.tag == tag)
    }

    /// Checks a graph declaration against this contract.
    ///
    /// Counts are checked first, then duplicate tags, then missing tags and
    /// finally declared payload types.
    pub fn validate(&self, decl: &NodeDecl) -> NodeResult<()> {
        check_ports(Direction::Input, &self.inputs, &decl.inputs)?;
        check_ports(Direction::Output, &self.outputs, &decl.outputs)
    }
}

fn check_ports(
    direction: Direction,
    expected: &[PortSpec],
    declared: &[DeclaredPort],
) -> NodeResult<()> {
    if expected.len() != declared.len() {
        return Err(NodeError::PortCountMismatch {
            direction,
            expected: expected.len(),
            got: declared.len(),
        });
    }

    for (idx, port) in declared.iter().enumerate() {
        if declared[..idx].iter().any(|prev| prev.tag == port.tag) {
            return Err(NodeError::DuplicatePort {
                direction,
                tag: port.tag,
            });
        }
    }

    for spec in expected {
        let port = declared
            .iter()
            .find(|port| port.tag == spec.tag)
            .ok_or(NodeError::MissingPort {
                direction,
                tag: spec.tag,
            })?;
        if let Some(kind) = port.kind {
            if kind != spec.kind {
                return Err(NodeError::PayloadMismatch {
                    tag: spec.tag,
                    expected: spec.kind,
                    got: kind,
                });
            }
        }
    }

    Ok(())
}

/// A port connection as written in a graph description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclaredPort {
    pub tag: PortTag,
    /// Name of the stream connected to the port.
    pub stream: String,
    /// Payload type of the connected stream, when the host knows it.
    pub kind: Option<PayloadKind>,
}

/// Port connections of one node instance in a graph description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeDecl {
    inputs: Vec<DeclaredPort>,
    outputs: Vec<DeclaredPort>,
}

impl NodeDecl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `TAG:stream` or bare `stream` entries.
    ///
    /// Bare entries become positional ports, numbered in order of
    /// appearance among the untagged entries of the same direction.
    pub fn from_streams<S: AsRef<str>>(inputs: &[S], outputs: &[S]) -> NodeResult<Self> {
        Ok(Self {
            inputs: parse_streams(inputs)?,
            outputs: parse_streams(outputs)?,
        })
    }

    /// Connects a stream to an input port.
    pub fn input(mut self, tag: PortTag, stream: impl Into<String>) -> Self {
        self.inputs.push(DeclaredPort {
            tag,
            stream: stream.into(),
            kind: None,
        });
        self
    }

    /// Connects a stream of known payload type to an input port.
    pub fn typed_input(mut self, tag: PortTag, stream: impl Into<String>, kind: PayloadKind) -> Self {
        self.inputs.push(DeclaredPort {
            tag,
            stream: stream.into(),
            kind: Some(kind),
        });
        self
    }

    /// Connects a stream to an output port.
    pub fn output(mut self, tag: PortTag, stream: impl Into<String>) -> Self {
        self.outputs.push(DeclaredPort {
            tag,
            stream: stream.into(),
            kind: None,
        });
        self
    }

    pub fn inputs(&self) -> &[DeclaredPort] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[DeclaredPort] {
        &self.outputs
    }
}

fn parse_streams<S: AsRef<str>>(entries: &[S]) -> NodeResult<Vec<DeclaredPort>> {
    let mut next_index = 0usize;
    let mut ports = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry = entry.as_ref();
        let (tag, stream) = match entry.split_once(':') {
            Some((tag, stream)) => (tag.parse::<PortTag>()?, stream),
            None => {
                let tag = PortTag::Index(next_index);
                next_index += 1;
                (tag, entry)
            }
        };
        if stream.is_empty() {
            return Err(NodeError::InvalidPortTag {
                tag: entry.to_owned(),
            });
        }
        ports.push(DeclaredPort {
            tag,
            stream: stream.to_owned(),
            kind: None,
        });
    }
    Ok(ports)
}
