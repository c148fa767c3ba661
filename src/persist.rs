//! Binary persistence for [`NeuralNet`].
//!
//! # File format
//!
//! Little-endian throughout, no padding between records:
//!
//! ```text
//! u64 neuron_count
//! u64 connection_count
//! neuron_count     x { f32 pos_x, pos_y, pos_z; f32 energy; f32 threshold; i32 kind }   (24 bytes)
//! connection_count x { i32 from; i32 to; f32 weight }                                    (12 bytes)
//! ```
//!
//! [`load`] reads exactly the counts the header declares and fails with
//! [`PersistError::Truncated`] if the file is shorter. It does NOT check
//! connection endpoints against the neuron count: a malformed file can
//! reconstruct a net that violates the index invariant. Callers that feed
//! the result to the growth engine get that check from
//! [`crate::engine::Engine::new`]; anyone else must call
//! [`NeuralNet::validate`] themselves.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::error::PersistError;
use crate::net::{Connection, NeuralNet, Neuron, NeuronType};

/// On-disk neuron record. Field order matches the in-memory model.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct NeuronRecord {
    pos: [f32; 3],
    energy: f32,
    threshold: f32,
    kind: i32,
}

/// On-disk connection record.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ConnectionRecord {
    from: i32,
    to: i32,
    weight: f32,
}

const NEURON_RECORD_SIZE: u64 = std::mem::size_of::<NeuronRecord>() as u64;
const CONNECTION_RECORD_SIZE: u64 = std::mem::size_of::<ConnectionRecord>() as u64;

impl From<&Neuron> for NeuronRecord {
    fn from(n: &Neuron) -> Self {
        Self {
            pos: n.position.to_array(),
            energy: n.energy,
            threshold: n.threshold,
            kind: n.kind.code(),
        }
    }
}

impl From<&NeuronRecord> for Neuron {
    fn from(r: &NeuronRecord) -> Self {
        Self {
            position: Vec3::from_array(r.pos),
            energy: r.energy,
            threshold: r.threshold,
            kind: NeuronType::from_code(r.kind),
        }
    }
}

/// Write the network to `path`, replacing any existing file.
///
/// An empty network serializes to just the 16-byte header.
pub fn save(net: &NeuralNet, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(&(net.neurons.len() as u64).to_le_bytes())?;
    writer.write_all(&(net.connections.len() as u64).to_le_bytes())?;

    for neuron in &net.neurons {
        let record = NeuronRecord::from(neuron);
        writer.write_all(bytemuck::bytes_of(&record))?;
    }
    for connection in &net.connections {
        let record = ConnectionRecord {
            from: connection.from as i32,
            to: connection.to as i32,
            weight: connection.weight,
        };
        writer.write_all(bytemuck::bytes_of(&record))?;
    }

    writer.flush()?;
    Ok(())
}

/// Read a network from `path`.
///
/// Fails if the file cannot be opened or is shorter than its header
/// declares. On failure no partial network is returned. Endpoint indices
/// are taken at face value; see the module docs for where validation
/// happens.
pub fn load(path: impl AsRef<Path>) -> Result<NeuralNet, PersistError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut header = [0u8; 16];
    read_exact_or_truncated(&mut reader, &mut header, 16, 0)?;
    let neuron_count = u64::from_le_bytes(header[0..8].try_into().unwrap());
    let connection_count = u64::from_le_bytes(header[8..16].try_into().unwrap());

    let body_expected =
        neuron_count * NEURON_RECORD_SIZE + connection_count * CONNECTION_RECORD_SIZE;

    let mut net = NeuralNet {
        neurons: Vec::with_capacity(neuron_count.min(1 << 24) as usize),
        connections: Vec::with_capacity(connection_count.min(1 << 24) as usize),
    };

    let mut read_so_far = 0u64;
    let mut record = [0u8; NEURON_RECORD_SIZE as usize];
    for _ in 0..neuron_count {
        read_exact_or_truncated(&mut reader, &mut record, body_expected, read_so_far)?;
        read_so_far += NEURON_RECORD_SIZE;
        let raw: NeuronRecord = bytemuck::pod_read_unaligned(&record);
        net.neurons.push(Neuron::from(&raw));
    }

    let mut record = [0u8; CONNECTION_RECORD_SIZE as usize];
    for _ in 0..connection_count {
        read_exact_or_truncated(&mut reader, &mut record, body_expected, read_so_far)?;
        read_so_far += CONNECTION_RECORD_SIZE;
        let raw: ConnectionRecord = bytemuck::pod_read_unaligned(&record);
        net.connections.push(Connection {
            from: raw.from as u32,
            to: raw.to as u32,
            weight: raw.weight,
        });
    }

    Ok(net)
}

/// Read exactly `buf.len()` bytes, mapping a short read to `Truncated`.
fn read_exact_or_truncated(
    reader: &mut impl Read,
    buf: &mut [u8],
    expected: u64,
    read_so_far: u64,
) -> Result<(), PersistError> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            PersistError::Truncated {
                expected,
                actual: read_so_far,
            }
        } else {
            PersistError::Io(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("neurogrow_{}_{}", name, std::process::id()));
        path
    }

    fn sample_net() -> NeuralNet {
        let mut net = NeuralNet::new();
        net.push_neuron(Neuron {
            position: Vec3::new(0.1, -0.2, 0.3),
            energy: 0.5,
            threshold: 1.0,
            kind: NeuronType::Input,
        });
        net.push_neuron(Neuron {
            position: Vec3::new(-1.0, 0.0, 2.5),
            energy: 0.0,
            threshold: 1.5,
            kind: NeuronType::Output,
        });
        net.push_connection(Connection {
            from: 0,
            to: 1,
            weight: 0.75,
        });
        net.push_connection(Connection {
            from: 1,
            to: 1,
            weight: -0.25,
        });
        net
    }

    #[test]
    fn test_round_trip() {
        let path = temp_path("round_trip");
        let net = sample_net();
        save(&net, &path).unwrap();
        let loaded = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, net);
    }

    #[test]
    fn test_empty_net_round_trip() {
        let path = temp_path("empty");
        save(&NeuralNet::new(), &path).unwrap();
        let loaded = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.neuron_count(), 0);
        assert_eq!(loaded.connection_count(), 0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(temp_path("does_not_exist")).unwrap_err();
        assert!(matches!(err, PersistError::Io(_)));
    }

    #[test]
    fn test_load_truncated_file() {
        let path = temp_path("truncated");
        save(&sample_net(), &path).unwrap();

        // Chop off the last connection record.
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 6]).unwrap();

        let err = load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, PersistError::Truncated { .. }));
    }

    #[test]
    fn test_load_does_not_validate_endpoints() {
        // An edge pointing past the neuron count survives load; rejection
        // is the engine's job.
        let path = temp_path("bad_endpoint");
        let mut net = NeuralNet::new();
        net.push_neuron(Neuron::new(Vec3::ZERO, NeuronType::Excitatory));
        net.push_connection(Connection {
            from: 0,
            to: 9,
            weight: 1.0,
        });
        save(&net, &path).unwrap();
        let loaded = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.connections[0].to, 9);
        assert!(loaded.validate().is_err());
    }

    #[test]
    fn test_record_sizes_match_format() {
        assert_eq!(NEURON_RECORD_SIZE, 24);
        assert_eq!(CONNECTION_RECORD_SIZE, 12);
    }
}
