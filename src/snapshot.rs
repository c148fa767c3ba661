//! Read-only snapshots for rendering.
//!
//! A renderer never sees the live [`crate::net::NeuralNet`]; it gets a
//! [`Snapshot`], an owned copy of exactly the arrays a draw pass needs,
//! taken between ticks. Snapshots are plain data and stay valid however
//! the simulation moves on.

use glam::Vec3;

use crate::net::NeuralNet;

/// An edge as a renderer sees it: endpoint indices plus weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: u32,
    pub to: u32,
    pub weight: f32,
}

/// Owned copy of the renderable network state after a tick.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Neuron positions, in neuron index order.
    pub positions: Vec<Vec3>,
    /// Neuron energies, parallel to `positions`.
    pub energies: Vec<f32>,
    /// Connection endpoints and weights, in insertion order.
    pub edges: Vec<Edge>,
    /// Tick counter at capture time.
    pub tick: u64,
}

impl Snapshot {
    /// Capture the renderable state of `net`.
    pub fn capture(net: &NeuralNet, tick: u64) -> Self {
        Self {
            positions: net.neurons.iter().map(|n| n.position).collect(),
            energies: net.neurons.iter().map(|n| n.energy).collect(),
            edges: net
                .connections
                .iter()
                .map(|c| Edge {
                    from: c.from,
                    to: c.to,
                    weight: c.weight,
                })
                .collect(),
            tick,
        }
    }

    /// Endpoint positions for every edge, two per edge in draw order.
    ///
    /// Convenience for line rendering; indices must be in range, which
    /// holds for any snapshot of a validated net.
    pub fn edge_vertices(&self) -> Vec<Vec3> {
        let mut verts = Vec::with_capacity(self.edges.len() * 2);
        for edge in &self.edges {
            verts.push(self.positions[edge.from as usize]);
            verts.push(self.positions[edge.to as usize]);
        }
        verts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{Connection, Neuron, NeuronType};

    #[test]
    fn test_capture_copies_state() {
        let mut net = NeuralNet::new();
        net.push_neuron(Neuron {
            position: Vec3::new(1.0, 2.0, 3.0),
            energy: 0.5,
            threshold: 1.0,
            kind: NeuronType::Input,
        });
        net.push_neuron(Neuron::new(Vec3::ZERO, NeuronType::Output));
        net.push_connection(Connection {
            from: 0,
            to: 1,
            weight: 0.25,
        });

        let snap = Snapshot::capture(&net, 42);

        // Mutating the net afterwards must not affect the snapshot.
        net.neurons[0].energy = 99.0;
        net.neurons[0].position = Vec3::splat(-1.0);

        assert_eq!(snap.tick, 42);
        assert_eq!(snap.positions[0], Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(snap.energies[0], 0.5);
        assert_eq!(snap.edges.len(), 1);
        assert_eq!(snap.edges[0].weight, 0.25);
    }

    #[test]
    fn test_edge_vertices_pairs() {
        let mut net = NeuralNet::new();
        net.push_neuron(Neuron::new(Vec3::X, NeuronType::Excitatory));
        net.push_neuron(Neuron::new(Vec3::Y, NeuronType::Excitatory));
        net.push_connection(Connection {
            from: 1,
            to: 0,
            weight: 1.0,
        });

        let verts = Snapshot::capture(&net, 0).edge_vertices();
        assert_eq!(verts, vec![Vec3::Y, Vec3::X]);
    }
}
