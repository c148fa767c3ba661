//! Headless growth run: seed a random net, grow it for a fixed number of
//! ticks, and save the result.
//!
//! Run with: `cargo run --example headless`

use neurogrow::generate;
use neurogrow::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let net = generate::randomize(4, 10, 2, 1, 3);
    println!(
        "Seeded {} neurons, {} connections",
        net.neuron_count(),
        net.connection_count()
    );

    let mut engine = Engine::new(net)?.with_fixed_delta(0.016);

    // Prefer the GPU kernel, fall back to a simple CPU pump when no
    // adapter is available.
    engine = match GpuPropagator::new() {
        Ok(gpu) => {
            println!("Propagating on the GPU");
            engine.with_propagator(gpu)
        }
        Err(e) => {
            println!("No GPU ({}), propagating on the CPU", e);
            engine.with_propagator(|input: PropagationInput<'_>| {
                input.energies.iter().map(|e| e + 0.01).collect()
            })
        }
    };

    for _ in 0..2_000 {
        engine.step();
    }

    let snap = engine.snapshot();
    println!(
        "After {} ticks: {} neurons, {} connections, centroid {:?}",
        snap.tick,
        snap.positions.len(),
        snap.edges.len(),
        engine.growth().center()
    );

    engine.save("grown.bin")?;
    println!("Saved to grown.bin");
    Ok(())
}
