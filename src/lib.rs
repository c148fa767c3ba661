//! # Neurogrow - Energy-Driven Neural Network Growth
//!
//! A headless engine for growing 3D neural network topologies. Neurons
//! carry a position, an energy level, a firing threshold, and a type;
//! every tick they drift toward the network's energy centroid, and
//! neurons that wander close enough to the center get wired up to
//! whichever neurons are currently firing. The topology is emergent:
//! you seed a random net and watch structure accrete around the
//! centroid.
//!
//! ## Quick Start
//!
//! ```ignore
//! use neurogrow::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let net = generate::randomize(4, 10, 2, 1, 3);
//!     let mut engine = Engine::new(net)?;
//!
//!     for _ in 0..1000 {
//!         engine.step();
//!     }
//!
//!     engine.save("grown.bin")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### The tick
//!
//! [`Engine::step`] runs one tick in a fixed order: propagate energy,
//! recompute the energy-weighted centroid, pull every neuron toward it,
//! rewire neurons that entered the proximity radius, and spawn a fresh
//! neuron on a timer. Each phase sees the previous phase's output.
//!
//! ### Propagators
//!
//! How energy actually moves through the net is injected, not baked in.
//! Anything implementing [`Propagator`] works, including plain closures:
//!
//! ```ignore
//! let engine = Engine::new(net)?
//!     .with_propagator(|input: PropagationInput<'_>| {
//!         input.energies.iter().map(|e| e * 0.99).collect()
//!     });
//! ```
//!
//! The built-in [`GpuPropagator`] evaluates a WGSL kernel on a headless
//! wgpu device, one invocation per neuron; the kernel body is pluggable
//! (see [`shader`]). [`NullPropagator`] passes energies through
//! untouched, useful for testing pure growth dynamics.
//!
//! ### Persistence
//!
//! [`persist::save`] and [`persist::load`] read and write a compact
//! little-endian binary format (24 bytes per neuron, 12 per connection),
//! so grown topologies survive across runs.
//!
//! ### Snapshots
//!
//! [`Engine::snapshot`] captures positions, energies, and edges into a
//! self-contained [`Snapshot`] a renderer can consume without borrowing
//! the live net.

pub mod engine;
pub mod error;
pub mod generate;
pub mod gpu;
pub mod growth;
pub mod net;
pub mod persist;
pub mod propagate;
pub mod shader;
pub mod snapshot;
pub mod time;

pub use bytemuck;
pub use engine::Engine;
pub use error::{EngineError, GpuError, NetError, PersistError};
pub use glam::Vec3;
pub use gpu::GpuPropagator;
pub use growth::{GrowthConfig, GrowthEngine};
pub use net::{Connection, NeuralNet, Neuron, NeuronType};
pub use propagate::{NullPropagator, PropagationInput, Propagator};
pub use snapshot::{Edge, Snapshot};
pub use time::Time;

/// Convenience re-exports for typical usage.
pub mod prelude {
    pub use crate::engine::Engine;
    pub use crate::error::{EngineError, GpuError, NetError, PersistError};
    pub use crate::generate;
    pub use crate::gpu::GpuPropagator;
    pub use crate::growth::{GrowthConfig, GrowthEngine};
    pub use crate::net::{Connection, NeuralNet, Neuron, NeuronType};
    pub use crate::persist;
    pub use crate::propagate::{NullPropagator, PropagationInput, Propagator};
    pub use crate::snapshot::{Edge, Snapshot};
    pub use crate::time::Time;
    pub use glam::Vec3;
}
