//! Identifier Allocation
//!
//! Monotonic, never-repeating identifiers for agents and worlds. Counters live
//! in an injected [`IdSpace`] rather than in globals, so each test (or each
//! independent run) can start from a fresh space.
//!
//! Identifiers render as six zero-padded digits, which bounds every space to
//! 1,000,000 values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{SimError, SimResult};

/// Number of identifiers a space can hand out (`000000` through `999999`)
pub const ID_CAPACITY: u32 = 1_000_000;

/// Which identifier space a counter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdSpaceKind {
    Agent,
    World,
}

impl fmt::Display for IdSpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdSpaceKind::Agent => write!(f, "agent"),
            IdSpaceKind::World => write!(f, "world"),
        }
    }
}

/// Unique identifier of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(u32);

impl AgentId {
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for AgentId {
    fn from(value: u32) -> Self {
        AgentId(value)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

/// Unique identifier of a population engine (one simulated world)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(u32);

impl From<u32> for WorldId {
    fn from(value: u32) -> Self {
        WorldId(value)
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

/// Atomic monotonic counter over a bounded identifier space.
///
/// Safe to share between threads; every value is handed out at most once.
#[derive(Debug)]
pub struct IdAllocator {
    kind: IdSpaceKind,
    next: AtomicU32,
    capacity: u32,
}

impl IdAllocator {
    pub fn new(kind: IdSpaceKind) -> Self {
        Self::with_capacity(kind, ID_CAPACITY)
    }

    /// Smaller spaces are useful for exercising exhaustion in tests
    pub fn with_capacity(kind: IdSpaceKind, capacity: u32) -> Self {
        Self {
            kind,
            next: AtomicU32::new(0),
            capacity: capacity.min(ID_CAPACITY),
        }
    }

    pub fn kind(&self) -> IdSpaceKind {
        self.kind
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Identifiers handed out so far
    pub fn issued(&self) -> u32 {
        self.next.load(Ordering::Relaxed)
    }

    pub fn remaining(&self) -> u32 {
        self.capacity - self.issued()
    }

    /// Hand out the next identifier
    pub fn allocate(&self) -> SimResult<u32> {
        let mut block = self.reserve(1)?;
        block.next().ok_or_else(|| self.exhausted())
    }

    /// Reserve `count` consecutive identifiers in one step.
    ///
    /// Either the whole block is reserved or nothing is, so a failed
    /// reservation leaves the counter untouched.
    pub fn reserve(&self, count: u64) -> SimResult<IdBlock> {
        let count = u32::try_from(count).map_err(|_| self.exhausted())?;
        let capacity = self.capacity;
        self.next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |next| {
                next.checked_add(count).filter(|end| *end <= capacity)
            })
            .map(|start| IdBlock {
                next: start,
                end: start + count,
            })
            .map_err(|_| self.exhausted())
    }

    fn exhausted(&self) -> SimError {
        SimError::CapacityExhausted {
            space: self.kind,
            capacity: self.capacity,
        }
    }
}

/// A reserved run of identifiers, consumed in ascending order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdBlock {
    next: u32,
    end: u32,
}

impl IdBlock {
    pub fn len(&self) -> usize {
        (self.end - self.next) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.next == self.end
    }
}

impl Iterator for IdBlock {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.next < self.end {
            let id = self.next;
            self.next += 1;
            Some(id)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl ExactSizeIterator for IdBlock {}

/// The allocator service: one counter per identifier space
#[derive(Debug)]
pub struct IdSpace {
    pub agents: IdAllocator,
    pub worlds: IdAllocator,
}

impl IdSpace {
    pub fn new() -> Self {
        Self {
            agents: IdAllocator::new(IdSpaceKind::Agent),
            worlds: IdAllocator::new(IdSpaceKind::World),
        }
    }

    pub fn with_agent_capacity(capacity: u32) -> Self {
        Self {
            agents: IdAllocator::with_capacity(IdSpaceKind::Agent, capacity),
            worlds: IdAllocator::new(IdSpaceKind::World),
        }
    }
}

impl Default for IdSpace {
    fn default() -> Self {
        Self::new()
    }
}
