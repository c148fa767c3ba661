//! The network entity model.
//!
//! A [`NeuralNet`] is an insertion-ordered sequence of [`Neuron`]s plus an
//! insertion-ordered sequence of directed, weighted [`Connection`]s between
//! neuron indices. It carries no behavior beyond construction and invariant
//! checking; the per-tick dynamics live in [`crate::growth`].
//!
//! # Invariants
//!
//! - Neuron indices are stable once assigned: neurons are only ever appended,
//!   never removed or renumbered.
//! - Connection endpoints must be valid indices into the neuron sequence
//!   whenever a propagator reads them. [`NeuralNet::validate`] checks this;
//!   [`crate::engine::Engine::new`] calls it before the first tick.
//! - Connection count is monotonically non-decreasing during a run.
//!
//! Self-loops (`from == to`) and duplicate edges are permitted.

use glam::Vec3;

use crate::error::NetError;

/// Classification tag for a neuron.
///
/// The growth engine treats all types uniformly; the tag exists for the
/// propagator kernel (and the persistence format), which receive it as an
/// `i32` code in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeuronType {
    Input,
    #[default]
    Excitatory,
    Inhibitory,
    Output,
}

impl NeuronType {
    /// The `i32` code stored in save files and handed to the propagator.
    #[inline]
    pub fn code(self) -> i32 {
        match self {
            NeuronType::Input => 0,
            NeuronType::Excitatory => 1,
            NeuronType::Inhibitory => 2,
            NeuronType::Output => 3,
        }
    }

    /// Decode a type code. Unknown codes fall back to `Excitatory`, the
    /// same variant the loader would have produced for the default neuron.
    #[inline]
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => NeuronType::Input,
            2 => NeuronType::Inhibitory,
            3 => NeuronType::Output,
            _ => NeuronType::Excitatory,
        }
    }
}

/// A point-like neuron in simulation space.
///
/// `energy` is mutated only by applying a propagation result; `threshold`
/// and `kind` are set at creation and immutable thereafter. Velocity and
/// connectedness are growth-engine state, not part of the entity model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neuron {
    /// Position in simulation space.
    pub position: Vec3,
    /// Current activation level.
    pub energy: f32,
    /// Firing/rewiring trigger level.
    pub threshold: f32,
    /// Classification tag.
    pub kind: NeuronType,
}

impl Neuron {
    /// A neuron at `position` with default energy 0 and threshold 1.
    pub fn new(position: Vec3, kind: NeuronType) -> Self {
        Self {
            position,
            energy: 0.0,
            threshold: 1.0,
            kind,
        }
    }
}

/// A directed, weighted edge between two neuron indices.
///
/// The weight is set at creation and never mutated by the growth engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Source neuron index.
    pub from: u32,
    /// Target neuron index.
    pub to: u32,
    /// Edge weight.
    pub weight: f32,
}

/// The aggregate network: neurons and connections in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeuralNet {
    pub neurons: Vec<Neuron>,
    pub connections: Vec<Connection>,
}

impl NeuralNet {
    /// An empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of neurons.
    #[inline]
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    /// Number of connections.
    #[inline]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Append a neuron, returning its (stable) index.
    pub fn push_neuron(&mut self, neuron: Neuron) -> u32 {
        let index = self.neurons.len() as u32;
        self.neurons.push(neuron);
        index
    }

    /// Append a connection. The caller must have appended both endpoint
    /// neurons first; [`validate`](Self::validate) catches violations.
    pub fn push_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Check that every connection's endpoints index an existing neuron.
    ///
    /// A network reconstituted from a malformed file can violate this;
    /// it must be rejected before the growth engine's first tick rather
    /// than clamped silently.
    pub fn validate(&self) -> Result<(), NetError> {
        let count = self.neurons.len() as u32;
        for (index, c) in self.connections.iter().enumerate() {
            if c.from >= count || c.to >= count {
                return Err(NetError::ConnectionOutOfRange {
                    index,
                    from: c.from,
                    to: c.to,
                    neuron_count: count,
                });
            }
        }
        Ok(())
    }
}
