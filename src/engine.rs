//! The simulation driver.
//!
//! [`Engine`] owns the network, the growth state, the injected propagator,
//! and the clock, and advances them one tick at a time. Use method chaining
//! to configure, then call [`step`](Engine::step) in your loop:
//!
//! ```ignore
//! use neurogrow::prelude::*;
//!
//! let net = generate::randomize(4, 10, 2, 1, 3);
//! let mut engine = Engine::new(net)?
//!     .with_propagator(NullPropagator);
//!
//! loop {
//!     engine.step();
//!     let snapshot = engine.snapshot(); // hand to the renderer
//! }
//! engine.save("net.bin")?;
//! ```
//!
//! Construction validates the network's structural invariants: a net with
//! out-of-range connection endpoints (e.g. from a corrupt save file) is
//! rejected here, before any tick runs.

use std::path::Path;

use crate::error::{EngineError, NetError, PersistError};
use crate::growth::{GrowthConfig, GrowthEngine};
use crate::net::NeuralNet;
use crate::persist;
use crate::propagate::{NullPropagator, Propagator};
use crate::snapshot::Snapshot;
use crate::time::Time;

/// Owns and drives one simulation.
///
/// Single thread of control: the propagation call inside
/// [`step`](Engine::step) is the only point where execution logically
/// suspends, and all growth, spawning, and persistence happen strictly
/// between completed propagation calls.
pub struct Engine {
    net: NeuralNet,
    growth: GrowthEngine,
    propagator: Box<dyn Propagator>,
    time: Time,
}

impl Engine {
    /// Wrap a network in a ready-to-run engine with default settings
    /// (identity propagator, default growth config, wall-clock time).
    ///
    /// Fails if any connection references a missing neuron; a malformed
    /// net must be rejected before the first tick, never clamped.
    pub fn new(net: NeuralNet) -> Result<Self, NetError> {
        net.validate()?;
        let growth = GrowthEngine::new(&net, GrowthConfig::default());
        Ok(Self {
            net,
            growth,
            propagator: Box::new(NullPropagator),
            time: Time::new(),
        })
    }

    /// Load a network from a save file and wrap it in an engine.
    ///
    /// I/O failure and truncation surface as
    /// [`EngineError::Persist`](crate::error::EngineError); an intact file
    /// whose connections point past its neuron count surfaces as
    /// [`EngineError::Net`](crate::error::EngineError); the structural
    /// check always runs before the engine can tick.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let net = persist::load(path)?;
        Ok(Self::new(net)?)
    }

    /// Replace the propagator (default: [`NullPropagator`]).
    pub fn with_propagator(mut self, propagator: impl Propagator + 'static) -> Self {
        self.propagator = Box::new(propagator);
        self
    }

    /// Replace the growth tunables. Resets growth state (velocities,
    /// connected flags, spawn timer), so configure before stepping.
    pub fn with_config(mut self, config: GrowthConfig) -> Self {
        self.growth = GrowthEngine::new(&self.net, config);
        self
    }

    /// Seed the growth RNG for a reproducible run. Resets growth state,
    /// so configure before stepping.
    pub fn with_seed(mut self, seed: u64) -> Self {
        let config = *self.growth.config();
        self.growth = GrowthEngine::with_seed(&self.net, config, seed);
        self
    }

    /// Drive ticks with a fixed synthetic delta instead of wall time.
    pub fn with_fixed_delta(mut self, delta: f32) -> Self {
        self.time.set_fixed_delta(Some(delta));
        self
    }

    /// Run one tick: propagate, recompute the centroid, move neurons,
    /// rewire, maybe spawn.
    pub fn step(&mut self) {
        let (_, dt) = self.time.update();
        self.growth
            .tick(&mut self.net, self.propagator.as_mut(), dt);
    }

    /// Copy-on-read view of the renderable state. Take it after
    /// [`step`](Engine::step) returns and before the next call; the copy
    /// stays valid forever.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.net, self.time.tick())
    }

    /// Persist the network, typically at shutdown.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        persist::save(&self.net, path)
    }

    /// The live network (read-only).
    pub fn net(&self) -> &NeuralNet {
        &self.net
    }

    /// The growth state (centroid, per-neuron flags).
    pub fn growth(&self) -> &GrowthEngine {
        &self.growth
    }

    /// Ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.time.tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate;
    use crate::net::{Connection, Neuron, NeuronType};
    use glam::Vec3;

    #[test]
    fn test_new_rejects_invalid_net() {
        let mut net = NeuralNet::new();
        net.push_neuron(Neuron::new(Vec3::ZERO, NeuronType::Input));
        net.push_connection(Connection {
            from: 0,
            to: 5,
            weight: 1.0,
        });

        assert!(Engine::new(net).is_err());
    }

    #[test]
    fn test_step_and_snapshot() {
        let net = generate::randomize_seeded(4, 10, 2, 1, 3, 21);
        let mut engine = Engine::new(net)
            .unwrap()
            .with_seed(21)
            .with_fixed_delta(0.1);

        engine.step();
        let snap = engine.snapshot();

        assert_eq!(snap.tick, 1);
        assert_eq!(snap.positions.len(), engine.net().neuron_count());
        assert_eq!(snap.edges.len(), engine.net().connection_count());
    }

    #[test]
    fn test_load_rejects_out_of_range_endpoints() {
        let mut path = std::env::temp_dir();
        path.push(format!("neurogrow_engine_load_{}", std::process::id()));

        let mut net = NeuralNet::new();
        net.push_neuron(Neuron::new(Vec3::ZERO, NeuronType::Input));
        net.push_connection(Connection {
            from: 0,
            to: 7,
            weight: 1.0,
        });
        persist::save(&net, &path).unwrap();

        let result = Engine::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(EngineError::Net(_))));
    }
}
