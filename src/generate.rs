//! Randomized initial topology construction.
//!
//! Builds a fresh [`NeuralNet`] with three blocks of neurons (input,
//! excitatory internals, output) scattered uniformly in `[-1, 1]^3`, then
//! wires each neuron to a random number of targets drawn over the whole
//! network. Self-loops and duplicate edges are allowed.
//!
//! [`randomize`] seeds from OS entropy; [`randomize_seeded`] produces the
//! same network for the same seed, for reproducible tests.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use glam::Vec3;

use crate::net::{Connection, NeuralNet, Neuron, NeuronType};

/// Build a randomized network.
///
/// * `inputs` / `internals` / `outputs` - neuron counts per block,
///   appended in that order (Input, Excitatory, Output).
/// * `min_links` / `max_links` - inclusive range for the number of
///   outgoing connections drawn per neuron.
///
/// Every neuron starts with energy 0 and threshold 1; connection weights
/// are `0.5 + U(-1, 1)`.
pub fn randomize(
    inputs: u32,
    internals: u32,
    outputs: u32,
    min_links: u32,
    max_links: u32,
) -> NeuralNet {
    randomize_with(
        inputs,
        internals,
        outputs,
        min_links,
        max_links,
        &mut SmallRng::from_entropy(),
    )
}

/// Deterministic variant of [`randomize`] for reproducible tests.
pub fn randomize_seeded(
    inputs: u32,
    internals: u32,
    outputs: u32,
    min_links: u32,
    max_links: u32,
    seed: u64,
) -> NeuralNet {
    randomize_with(
        inputs,
        internals,
        outputs,
        min_links,
        max_links,
        &mut SmallRng::seed_from_u64(seed),
    )
}

fn randomize_with(
    inputs: u32,
    internals: u32,
    outputs: u32,
    min_links: u32,
    max_links: u32,
    rng: &mut SmallRng,
) -> NeuralNet {
    let mut net = NeuralNet::new();

    let blocks = [
        (inputs, NeuronType::Input),
        (internals, NeuronType::Excitatory),
        (outputs, NeuronType::Output),
    ];
    for (count, kind) in blocks {
        for _ in 0..count {
            let position = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            );
            net.push_neuron(Neuron::new(position, kind));
        }
    }

    let neuron_count = net.neuron_count() as u32;
    if neuron_count == 0 {
        return net;
    }

    for from in 0..neuron_count {
        let links = rng.gen_range(min_links..=max_links);
        for _ in 0..links {
            net.push_connection(Connection {
                from,
                to: rng.gen_range(0..neuron_count),
                weight: 0.5 + rng.gen_range(-1.0..=1.0),
            });
        }
    }

    net
}
