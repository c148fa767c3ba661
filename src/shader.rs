//! WGSL generation for the GPU propagator.
//!
//! The propagation rule itself is pluggable: [`generate_propagation_shader`]
//! wraps a kernel body in a fixed scaffold that binds the six network
//! arrays and dispatches one invocation per neuron. The scaffold is the
//! contract; the body is yours.
//!
//! # What the kernel body sees
//!
//! | Name | Type | Meaning |
//! |------|------|---------|
//! | `index` | `u32` | this neuron's index |
//! | `energy` | `var<function> f32` | this neuron's energy; the value left here is written out |
//! | `energies_in` | `array<f32>` (read) | all energies at tick start |
//! | `thresholds` | `array<f32>` (read) | per-neuron thresholds |
//! | `types` | `array<i32>` (read) | per-neuron type codes |
//! | `edge_from`, `edge_to` | `array<u32>` (read) | connection endpoints |
//! | `edge_weights` | `array<f32>` (read) | connection weights |
//! | `params` | uniform | `neuron_count`, `connection_count` |
//!
//! Invocations never write anything but their own `energies_out[index]`,
//! so a body is race-free as long as it only reads the shared arrays.

/// Built-in kernel body: accumulate weighted input from inbound
/// connections (inhibitory sources subtract), leak, fire-and-reset on
/// threshold crossing.
///
/// This is a usable default, not a contract. Any body that fits the
/// scaffold (see the module docs) can replace it.
pub const DEFAULT_KERNEL: &str = r#"
    var input = 0.0;
    for (var c = 0u; c < params.connection_count; c = c + 1u) {
        if edge_to[c] != index {
            continue;
        }
        let source = edge_from[c];
        var contribution = energies_in[source] * edge_weights[c];
        if types[source] == 2 {
            contribution = -contribution;
        }
        input += contribution;
    }

    energy = energy * 0.95 + max(input, 0.0) * 0.05;
    if energy >= thresholds[index] {
        energy = 0.0;
    }
"#;

/// Wrap `kernel_body` in the propagation scaffold.
pub fn generate_propagation_shader(kernel_body: &str) -> String {
    format!(
        r#"struct Params {{
    neuron_count: u32,
    connection_count: u32,
    _pad0: u32,
    _pad1: u32,
}};

@group(0) @binding(0)
var<storage, read> energies_in: array<f32>;

@group(0) @binding(1)
var<storage, read_write> energies_out: array<f32>;

@group(0) @binding(2)
var<storage, read> thresholds: array<f32>;

@group(0) @binding(3)
var<storage, read> types: array<i32>;

@group(0) @binding(4)
var<storage, read> edge_from: array<u32>;

@group(0) @binding(5)
var<storage, read> edge_to: array<u32>;

@group(0) @binding(6)
var<storage, read> edge_weights: array<f32>;

@group(0) @binding(7)
var<uniform> params: Params;

@compute @workgroup_size(64)
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {{
    let index = global_id.x;
    if index >= params.neuron_count {{
        return;
    }}

    var energy = energies_in[index];

{kernel_body}

    energies_out[index] = energy;
}}
"#
    )
}
