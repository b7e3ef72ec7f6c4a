//! Timestamped batches delivered to and emitted from node ports.
//!
//! A port that received nothing this tick is modeled as `None` at the call
//! site; a `Packet` always holds a payload, possibly a zero-length one.

use std::fmt;

/// Stream timestamp in microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn new(micros: i64) -> Self {
        Self(micros)
    }

    /// Returns the raw value in microseconds.
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}

/// Payload paired with the timestamp of the tick that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Packet<T> {
    payload: T,
    timestamp: Timestamp,
}

impl<T> Packet<T> {
    pub fn new(payload: T, timestamp: Timestamp) -> Self {
        Self { payload, timestamp }
    }

    /// Returns a borrowed view of the payload.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Consumes the packet and returns the payload.
    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Consumes the packet and returns payload and timestamp.
    pub fn into_parts(self) -> (T, Timestamp) {
        (self.payload, self.timestamp)
    }

    /// Transforms the payload while keeping the timestamp.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Packet<U> {
        Packet {
            payload: f(self.payload),
            timestamp: self.timestamp,
        }
    }
}
