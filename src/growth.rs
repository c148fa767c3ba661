//! The per-tick growth algorithm: centroid attraction, threshold-triggered
//! rewiring, and timed spawning.
//!
//! # Tick order
//!
//! 1. Run one propagation cycle through the injected [`Propagator`] and
//!    replace the energy array with its result.
//! 2. Recompute the energy centroid (energy-weighted mean position). A tick
//!    with zero total energy keeps the previous centre.
//! 3. Accelerate every neuron toward the centre, integrate position, damp
//!    velocity.
//! 4. Every still-unconnected neuron that has entered the proximity radius
//!    of the centre receives an inbound connection from each neuron whose
//!    energy has crossed its threshold, then latches `connected` (even if
//!    the scan matched nothing, so it is never rescanned).
//! 5. Once the accumulated time since the last spawn exceeds the spawn
//!    interval, append exactly one new excitatory neuron at a random
//!    position and reset the timer.
//!
//! Neuron and connection counts only ever grow; nothing is removed.
//!
//! The engine keeps struct-of-arrays mirrors of the net (energies,
//! thresholds, type codes, edge arrays). These are what the propagator
//! sees, and they are extended in lockstep whenever the net grows.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::net::{Connection, NeuralNet, Neuron, NeuronType};
use crate::propagate::{PropagationInput, Propagator};

/// Tunables for the growth rules.
///
/// Defaults: proximity radius 0.5, velocity damping 0.98 per tick, one
/// spawn every 5 time units inside `[-3, 3]^3`.
#[derive(Debug, Clone, Copy)]
pub struct GrowthConfig {
    /// Distance from the centroid inside which an unconnected neuron
    /// triggers rewiring.
    pub proximity_radius: f32,
    /// Velocity multiplier applied after each position update.
    pub damping: f32,
    /// Seconds of accumulated tick time between spawns.
    pub spawn_interval: f32,
    /// Half-size of the cube spawned neurons appear in.
    pub spawn_extent: f32,
    /// Energy assigned to spawned neurons.
    pub spawn_energy: f32,
    /// Threshold assigned to spawned neurons.
    pub spawn_threshold: f32,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            proximity_radius: 0.5,
            damping: 0.98,
            spawn_interval: 5.0,
            spawn_extent: 3.0,
            spawn_energy: 0.0,
            spawn_threshold: 1.0,
        }
    }
}

/// Per-run growth state: velocities, connected flags, the centroid, the
/// spawn timer, and the struct-of-arrays mirrors fed to the propagator.
pub struct GrowthEngine {
    config: GrowthConfig,
    rng: SmallRng,

    velocities: Vec<Vec3>,
    connected: Vec<bool>,
    center: Vec3,
    since_spawn: f32,

    // Mirrors of the net, kept in lockstep for the propagator.
    energies: Vec<f32>,
    thresholds: Vec<f32>,
    types: Vec<i32>,
    edge_from: Vec<u32>,
    edge_to: Vec<u32>,
    edge_weights: Vec<f32>,
}

impl GrowthEngine {
    /// Build growth state for `net`, seeding the RNG from OS entropy.
    ///
    /// Every neuron already in the net is treated as connected with zero
    /// velocity; only neurons spawned later start unconnected.
    pub fn new(net: &NeuralNet, config: GrowthConfig) -> Self {
        Self::with_rng(net, config, SmallRng::from_entropy())
    }

    /// Deterministic variant of [`new`](Self::new) for reproducible runs.
    pub fn with_seed(net: &NeuralNet, config: GrowthConfig, seed: u64) -> Self {
        Self::with_rng(net, config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(net: &NeuralNet, config: GrowthConfig, rng: SmallRng) -> Self {
        let n = net.neuron_count();
        Self {
            config,
            rng,
            velocities: vec![Vec3::ZERO; n],
            connected: vec![true; n],
            center: Vec3::ZERO,
            since_spawn: 0.0,
            energies: net.neurons.iter().map(|x| x.energy).collect(),
            thresholds: net.neurons.iter().map(|x| x.threshold).collect(),
            types: net.neurons.iter().map(|x| x.kind.code()).collect(),
            edge_from: net.connections.iter().map(|c| c.from).collect(),
            edge_to: net.connections.iter().map(|c| c.to).collect(),
            edge_weights: net.connections.iter().map(|c| c.weight).collect(),
        }
    }

    /// The growth tunables.
    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    /// The current energy centroid.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Whether neuron `index` has latched its inbound rewiring scan.
    pub fn is_connected(&self, index: usize) -> bool {
        self.connected[index]
    }

    /// Current velocity of neuron `index`.
    pub fn velocity(&self, index: usize) -> Vec3 {
        self.velocities[index]
    }

    /// Advance the simulation by one tick of `dt` seconds.
    ///
    /// Infallible given a valid net; degenerate geometry (zero total
    /// energy, a neuron sitting exactly on the centre) skips the affected
    /// update instead of producing NaN.
    pub fn tick(&mut self, net: &mut NeuralNet, propagator: &mut dyn Propagator, dt: f32) {
        debug_assert_eq!(self.energies.len(), net.neuron_count());
        debug_assert_eq!(self.edge_from.len(), net.connection_count());

        self.propagate(net, propagator);
        self.update_center(net);
        self.attract(net, dt);
        self.rewire(net);
        self.spawn(net, dt);
    }

    /// Step 1: one propagation cycle; the result replaces the energy array
    /// element-for-element.
    fn propagate(&mut self, net: &mut NeuralNet, propagator: &mut dyn Propagator) {
        let result = propagator.propagate(PropagationInput {
            energies: &self.energies,
            thresholds: &self.thresholds,
            types: &self.types,
            from: &self.edge_from,
            to: &self.edge_to,
            weights: &self.edge_weights,
        });
        debug_assert_eq!(result.len(), self.energies.len());

        self.energies = result;
        for (neuron, &energy) in net.neurons.iter_mut().zip(&self.energies) {
            neuron.energy = energy;
        }
    }

    /// Step 2: energy-weighted mean position. Zero total energy keeps the
    /// previous centre so the attraction step never divides by zero.
    fn update_center(&mut self, net: &NeuralNet) {
        let mut weighted = Vec3::ZERO;
        let mut total = 0.0f32;
        for (neuron, &energy) in net.neurons.iter().zip(&self.energies) {
            weighted += neuron.position * energy;
            total += energy;
        }
        if total > 0.0 {
            self.center = weighted / total;
        }
    }

    /// Step 3: accelerate toward the centre, integrate, damp.
    fn attract(&mut self, net: &mut NeuralNet, dt: f32) {
        for (neuron, velocity) in net.neurons.iter_mut().zip(&mut self.velocities) {
            let offset = self.center - neuron.position;
            // Direction is undefined on the centre itself; skip the
            // velocity kick for that neuron this tick.
            if offset.length_squared() > f32::EPSILON {
                *velocity += offset.normalize() * dt;
            }
            neuron.position += *velocity * dt;
            *velocity *= self.config.damping;
        }
    }

    /// Step 4: grow inbound connections into newly-proximate neurons.
    fn rewire(&mut self, net: &mut NeuralNet) {
        let radius = self.config.proximity_radius;
        for i in 0..net.neuron_count() {
            if self.connected[i] {
                continue;
            }
            if net.neurons[i].position.distance(self.center) >= radius {
                continue;
            }
            // Scan every neuron, including i itself, for crossed
            // thresholds; each firing neuron contributes one edge into i.
            for j in 0..net.neuron_count() {
                if self.energies[j] >= self.thresholds[j] {
                    let weight = 0.5 + self.rng.gen_range(-1.0..=1.0);
                    self.push_connection(
                        net,
                        Connection {
                            from: j as u32,
                            to: i as u32,
                            weight,
                        },
                    );
                }
            }
            // Latch even on a zero-match scan; a neuron connects at most
            // once and is never rescanned.
            self.connected[i] = true;
        }
    }

    /// Step 5: append one excitatory neuron per elapsed spawn interval.
    fn spawn(&mut self, net: &mut NeuralNet, dt: f32) {
        self.since_spawn += dt;
        if self.since_spawn <= self.config.spawn_interval {
            return;
        }
        self.since_spawn = 0.0;

        let extent = self.config.spawn_extent;
        let neuron = Neuron {
            position: Vec3::new(
                self.rng.gen_range(-extent..=extent),
                self.rng.gen_range(-extent..=extent),
                self.rng.gen_range(-extent..=extent),
            ),
            energy: self.config.spawn_energy,
            threshold: self.config.spawn_threshold,
            kind: NeuronType::Excitatory,
        };
        self.push_neuron(net, neuron, false);
    }

    /// Append a neuron to the net and all mirrors. Spawned neurons get a
    /// random initial velocity and start unconnected.
    fn push_neuron(&mut self, net: &mut NeuralNet, neuron: Neuron, connected: bool) {
        net.push_neuron(neuron);
        self.energies.push(neuron.energy);
        self.thresholds.push(neuron.threshold);
        self.types.push(neuron.kind.code());
        self.velocities.push(Vec3::new(
            self.rng.gen_range(-1.0..=1.0),
            self.rng.gen_range(-1.0..=1.0),
            self.rng.gen_range(-1.0..=1.0),
        ));
        self.connected.push(connected);
    }

    /// Append a connection to the net and the edge mirrors.
    fn push_connection(&mut self, net: &mut NeuralNet, connection: Connection) {
        net.push_connection(connection);
        self.edge_from.push(connection.from);
        self.edge_to.push(connection.to);
        self.edge_weights.push(connection.weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagate::NullPropagator;

    /// Two neurons: one firing at the origin, one idle nearby.
    fn two_neuron_net(idle_position: Vec3) -> NeuralNet {
        let mut net = NeuralNet::new();
        net.push_neuron(Neuron {
            position: Vec3::ZERO,
            energy: 2.0,
            threshold: 1.0,
            kind: NeuronType::Excitatory,
        });
        net.push_neuron(Neuron {
            position: idle_position,
            energy: 0.0,
            threshold: 1.0,
            kind: NeuronType::Excitatory,
        });
        net
    }

    #[test]
    fn test_centroid_follows_energy() {
        let mut net = NeuralNet::new();
        net.push_neuron(Neuron {
            position: Vec3::new(2.0, 0.0, 0.0),
            energy: 1.0,
            threshold: 1.0,
            kind: NeuronType::Excitatory,
        });
        net.push_neuron(Neuron {
            position: Vec3::new(-2.0, 0.0, 0.0),
            energy: 3.0,
            threshold: 1.0,
            kind: NeuronType::Excitatory,
        });

        let mut engine = GrowthEngine::with_seed(&net, GrowthConfig::default(), 1);
        engine.tick(&mut net, &mut NullPropagator, 0.01);

        // (2*1 + -2*3) / 4 = -1
        assert!((engine.center().x - (-1.0)).abs() < 1e-4);
    }

    #[test]
    fn test_zero_energy_keeps_previous_center_and_stays_finite() {
        let mut net = two_neuron_net(Vec3::new(1.0, 0.0, 0.0));
        net.neurons[0].energy = 0.0;

        let mut engine = GrowthEngine::with_seed(&net, GrowthConfig::default(), 2);
        // Zero the mirror too (with_rng copied the zeroed energies already).
        for _ in 0..10 {
            engine.tick(&mut net, &mut NullPropagator, 0.1);
        }

        assert_eq!(engine.center(), Vec3::ZERO);
        for (i, neuron) in net.neurons.iter().enumerate() {
            assert!(neuron.position.is_finite(), "neuron {} position", i);
            assert!(engine.velocity(i).is_finite(), "neuron {} velocity", i);
        }
    }

    #[test]
    fn test_neuron_on_center_produces_no_nan() {
        // Neuron 0 sits exactly on the centroid; its direction is
        // undefined and the velocity kick must be skipped, not NaN'd.
        let mut net = NeuralNet::new();
        net.push_neuron(Neuron {
            position: Vec3::ZERO,
            energy: 1.0,
            threshold: 2.0,
            kind: NeuronType::Excitatory,
        });

        let mut engine = GrowthEngine::with_seed(&net, GrowthConfig::default(), 3);
        engine.tick(&mut net, &mut NullPropagator, 0.1);

        assert!(net.neurons[0].position.is_finite());
        assert!(engine.velocity(0).is_finite());
    }

    #[test]
    fn test_rewiring_inside_radius() {
        let mut net = two_neuron_net(Vec3::new(0.4, 0.0, 0.0));
        let mut engine = GrowthEngine::with_seed(&net, GrowthConfig::default(), 4);
        engine.connected[1] = false;

        engine.tick(&mut net, &mut NullPropagator, 0.0);

        // Neuron 0 fires (2.0 >= 1.0); neuron 1 sits inside the 0.5
        // radius of the centroid at the origin. Exactly one inbound edge.
        assert_eq!(net.connection_count(), 1);
        assert_eq!(net.connections[0].from, 0);
        assert_eq!(net.connections[0].to, 1);
        assert!(engine.is_connected(1));
    }

    #[test]
    fn test_no_rewiring_outside_radius() {
        let mut net = two_neuron_net(Vec3::new(0.6, 0.0, 0.0));
        let mut engine = GrowthEngine::with_seed(&net, GrowthConfig::default(), 5);
        engine.connected[1] = false;

        engine.tick(&mut net, &mut NullPropagator, 0.0);

        assert_eq!(net.connection_count(), 0);
        assert!(!engine.is_connected(1));
    }

    #[test]
    fn test_rewiring_latches_on_zero_match_scan() {
        // In range of the centroid but nothing fires: still latches.
        let mut net = two_neuron_net(Vec3::new(0.4, 0.0, 0.0));
        net.neurons[0].energy = 0.5;

        let mut engine = GrowthEngine::with_seed(&net, GrowthConfig::default(), 6);
        engine.connected[1] = false;

        engine.tick(&mut net, &mut NullPropagator, 0.0);

        assert_eq!(net.connection_count(), 0);
        assert!(engine.is_connected(1));
    }

    #[test]
    fn test_self_loop_permitted() {
        // A firing neuron that is itself newly proximate connects to
        // itself; the scan includes j == i by design.
        let mut net = NeuralNet::new();
        net.push_neuron(Neuron {
            position: Vec3::new(0.1, 0.0, 0.0),
            energy: 2.0,
            threshold: 1.0,
            kind: NeuronType::Excitatory,
        });

        let mut engine = GrowthEngine::with_seed(&net, GrowthConfig::default(), 7);
        engine.connected[0] = false;

        engine.tick(&mut net, &mut NullPropagator, 0.0);

        assert_eq!(net.connection_count(), 1);
        assert_eq!(net.connections[0].from, 0);
        assert_eq!(net.connections[0].to, 0);
    }

    #[test]
    fn test_spawn_cadence() {
        let mut net = two_neuron_net(Vec3::ONE);
        let mut engine = GrowthEngine::with_seed(&net, GrowthConfig::default(), 8);

        // 0.5s ticks: the 5.0s interval elapses strictly after tick 11
        // (5.5s accumulated). No spawn before that.
        for _ in 0..10 {
            engine.tick(&mut net, &mut NullPropagator, 0.5);
            assert_eq!(net.neuron_count(), 2);
        }
        engine.tick(&mut net, &mut NullPropagator, 0.5);
        assert_eq!(net.neuron_count(), 3);

        // The spawned neuron has not moved yet this tick; check its
        // creation-time state.
        let spawned = net.neurons[2];
        assert_eq!(spawned.kind, NeuronType::Excitatory);
        assert_eq!(spawned.energy, 0.0);
        assert_eq!(spawned.threshold, 1.0);
        assert!(spawned.position.abs().max_element() <= 3.0);
        assert!(!engine.is_connected(2));

        // Exactly one more spawn over the next interval, never two.
        let mut counts = Vec::new();
        for _ in 0..11 {
            engine.tick(&mut net, &mut NullPropagator, 0.5);
            counts.push(net.neuron_count());
        }
        assert_eq!(net.neuron_count(), 4);
        for pair in counts.windows(2) {
            assert!(pair[1] - pair[0] <= 1);
        }
    }

    #[test]
    fn test_counts_monotonic_and_connect_once() {
        let mut net = crate::generate::randomize_seeded(4, 10, 2, 1, 3, 9);
        let mut engine = GrowthEngine::with_seed(&net, GrowthConfig::default(), 9);

        let mut energize = |input: PropagationInput<'_>| -> Vec<f32> {
            input.energies.iter().map(|e| e + 0.3).collect()
        };

        let mut neurons = net.neuron_count();
        let mut connections = net.connection_count();
        let mut latched: Vec<bool> = Vec::new();
        for _ in 0..200 {
            engine.tick(&mut net, &mut energize, 0.05);

            assert!(net.neuron_count() >= neurons);
            assert!(net.connection_count() >= connections);
            neurons = net.neuron_count();
            connections = net.connection_count();

            latched.resize(net.neuron_count(), false);
            for i in 0..net.neuron_count() {
                if latched[i] {
                    assert!(engine.is_connected(i), "connected latch reverted at {}", i);
                }
                latched[i] = engine.is_connected(i);
            }
        }
        assert!(net.validate().is_ok());
    }

    #[test]
    fn test_mirrors_track_growth() {
        let mut net = two_neuron_net(Vec3::new(0.4, 0.0, 0.0));
        let mut engine = GrowthEngine::with_seed(&net, GrowthConfig::default(), 10);
        engine.connected[1] = false;

        // Rewire once, then spawn once.
        engine.tick(&mut net, &mut NullPropagator, 0.0);
        engine.tick(&mut net, &mut NullPropagator, 6.0);

        assert_eq!(engine.energies.len(), net.neuron_count());
        assert_eq!(engine.thresholds.len(), net.neuron_count());
        assert_eq!(engine.types.len(), net.neuron_count());
        assert_eq!(engine.edge_from.len(), net.connection_count());
        assert_eq!(engine.edge_weights.len(), net.connection_count());
    }
}
