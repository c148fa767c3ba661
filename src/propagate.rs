//! The propagator seam between the growth engine and the external
//! energy-propagation step.
//!
//! Once per tick the growth engine hands a [`Propagator`] flat views of the
//! network state (energies, thresholds, type codes, and the connection list
//! as parallel from/to/weight arrays) and receives a fresh energy array of
//! the same length back. The update rule behind that call is deliberately
//! opaque: production runs use a GPU compute kernel
//! ([`crate::gpu::GpuPropagator`]), but any in-process implementation works,
//! which is what makes the engine testable without hardware.
//!
//! # Example
//!
//! ```ignore
//! use neurogrow::propagate::{PropagationInput, Propagator};
//!
//! // Closures implement Propagator; here, a decay rule for tests.
//! let mut decay = |input: PropagationInput<'_>| {
//!     input.energies.iter().map(|e| e * 0.9).collect()
//! };
//! ```

/// Borrowed, struct-of-arrays view of the network handed to a propagator.
///
/// `energies`, `thresholds`, and `types` all have length `N` (neuron
/// count); `from`, `to`, and `weights` all have length `M` (connection
/// count), with every `from`/`to` value in `[0, N)`. Both `N == 0` and
/// `M == 0` are legal.
#[derive(Debug, Clone, Copy)]
pub struct PropagationInput<'a> {
    pub energies: &'a [f32],
    pub thresholds: &'a [f32],
    pub types: &'a [i32],
    pub from: &'a [u32],
    pub to: &'a [u32],
    pub weights: &'a [f32],
}

impl PropagationInput<'_> {
    /// Neuron count.
    #[inline]
    pub fn neuron_count(&self) -> usize {
        self.energies.len()
    }

    /// Connection count.
    #[inline]
    pub fn connection_count(&self) -> usize {
        self.from.len()
    }
}

/// One propagation cycle: current state in, new energy array out.
///
/// The call is synchronous from the growth engine's point of view: the
/// engine blocks on the result before computing the tick's centroid. An
/// implementation must return exactly `input.neuron_count()` energies and
/// must tolerate an empty connection list (a no-op returning the energies
/// unchanged is the expected behavior there).
pub trait Propagator {
    fn propagate(&mut self, input: PropagationInput<'_>) -> Vec<f32>;
}

/// Any `FnMut(PropagationInput) -> Vec<f32>` is a propagator. Handy for
/// injecting a synthetic rule in tests.
impl<F> Propagator for F
where
    F: FnMut(PropagationInput<'_>) -> Vec<f32>,
{
    fn propagate(&mut self, input: PropagationInput<'_>) -> Vec<f32> {
        self(input)
    }
}

/// Reference propagator that leaves every energy unchanged.
///
/// The engine's default: growth dynamics (attraction, rewiring, spawning)
/// run exactly as they would against real hardware, just without any
/// energy flow.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPropagator;

impl Propagator for NullPropagator {
    fn propagate(&mut self, input: PropagationInput<'_>) -> Vec<f32> {
        input.energies.to_vec()
    }
}
