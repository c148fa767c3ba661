//! Error types for neurogrow.
//!
//! This module provides error types for persistence I/O, structural
//! invariant violations, and GPU propagator initialization.

use std::fmt;

/// Errors that can occur while saving or loading a network.
#[derive(Debug)]
pub enum PersistError {
    /// The file could not be opened, read, or written.
    Io(std::io::Error),
    /// The file ended before the declared record counts were satisfied.
    Truncated {
        /// Bytes the header's counts require.
        expected: u64,
        /// Bytes actually available after the header.
        actual: u64,
    },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "Network file I/O failed: {}", e),
            PersistError::Truncated { expected, actual } => write!(
                f,
                "Network file truncated: header declares {} bytes of records, found {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        PersistError::Io(e)
    }
}

/// Structural invariant violations in a [`crate::net::NeuralNet`].
///
/// These are fatal for the offending network: the engine refuses to tick
/// rather than clamp indices and mask a corrupt file.
#[derive(Debug)]
pub enum NetError {
    /// A connection references a neuron index that does not exist.
    ConnectionOutOfRange {
        /// Position of the offending connection in the sequence.
        index: usize,
        from: u32,
        to: u32,
        neuron_count: u32,
    },
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::ConnectionOutOfRange {
                index,
                from,
                to,
                neuron_count,
            } => write!(
                f,
                "Connection {} references neurons {}->{} but only {} neurons exist",
                index, from, to, neuron_count
            ),
        }
    }
}

impl std::error::Error for NetError {}

/// Errors that can occur when building an [`crate::engine::Engine`].
#[derive(Debug)]
pub enum EngineError {
    /// Loading the network file failed.
    Persist(PersistError),
    /// The network violates a structural invariant.
    Net(NetError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Persist(e) => write!(f, "Persistence error: {}", e),
            EngineError::Net(e) => write!(f, "Invalid network: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Persist(e) => Some(e),
            EngineError::Net(e) => Some(e),
        }
    }
}

impl From<PersistError> for EngineError {
    fn from(e: PersistError) -> Self {
        EngineError::Persist(e)
    }
}

impl From<NetError> for EngineError {
    fn from(e: NetError) -> Self {
        EngineError::Net(e)
    }
}

/// Errors that can occur while bringing up the GPU propagator.
#[derive(Debug)]
pub enum GpuError {
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::NoAdapter => write!(
                f,
                "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."
            ),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}
