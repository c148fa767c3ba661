//! Headless GPU propagation.
//!
//! [`GpuPropagator`] runs a propagation kernel as a wgpu compute pass, one
//! invocation per neuron, and reads the resulting energies back to the CPU.
//! Device setup happens once at construction; each [`propagate`] call
//! uploads the flat network arrays, dispatches, and blocks on readback.
//!
//! The kernel body is pluggable through [`with_kernel`], see
//! [`crate::shader`] for the scaffold contract.
//!
//! [`propagate`]: crate::propagate::Propagator::propagate
//! [`with_kernel`]: GpuPropagator::with_kernel

use wgpu::util::DeviceExt;

use crate::error::GpuError;
use crate::propagate::{PropagationInput, Propagator};
use crate::shader::{generate_propagation_shader, DEFAULT_KERNEL};

const WORKGROUP_SIZE: u32 = 64;

/// Uniform parameters passed to the propagation shader.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Params {
    neuron_count: u32,
    connection_count: u32,
    _pad0: u32,
    _pad1: u32,
}

/// A [`Propagator`] that evaluates the network on the GPU.
pub struct GpuPropagator {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl GpuPropagator {
    /// Bring up a headless device and compile the built-in kernel.
    pub fn new() -> Result<Self, GpuError> {
        Self::with_kernel(DEFAULT_KERNEL)
    }

    /// Bring up a headless device and compile a custom kernel body.
    pub fn with_kernel(kernel_body: &str) -> Result<Self, GpuError> {
        pollster::block_on(Self::init(kernel_body))
    }

    async fn init(kernel_body: &str) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("neurogrow device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("propagation shader"),
            source: wgpu::ShaderSource::Wgsl(generate_propagation_shader(kernel_body).into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("propagation bind group layout"),
                entries: &[
                    storage_entry(0, true),
                    storage_entry(1, false),
                    storage_entry(2, true),
                    storage_entry(3, true),
                    storage_entry(4, true),
                    storage_entry(5, true),
                    storage_entry(6, true),
                    wgpu::BindGroupLayoutEntry {
                        binding: 7,
                        visibility: wgpu::ShaderStages::COMPUTE,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("propagation pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("propagation pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
        })
    }

    fn storage_buffer(&self, label: &str, contents: &[u8]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::STORAGE,
            })
    }

    fn run(&self, input: &PropagationInput<'_>) -> Vec<f32> {
        let neuron_count = input.neuron_count() as u32;
        let byte_len = (input.energies.len() * std::mem::size_of::<f32>()) as u64;

        let energies_in = self.storage_buffer("energies in", bytemuck::cast_slice(input.energies));
        let energies_out = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("energies out"),
            size: byte_len,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let thresholds = self.storage_buffer("thresholds", bytemuck::cast_slice(input.thresholds));
        let types = self.storage_buffer("types", bytemuck::cast_slice(input.types));
        let edge_from = self.storage_buffer("edge from", bytemuck::cast_slice(input.from));
        let edge_to = self.storage_buffer("edge to", bytemuck::cast_slice(input.to));
        let edge_weights = self.storage_buffer("edge weights", bytemuck::cast_slice(input.weights));

        let params = Params {
            neuron_count,
            connection_count: input.connection_count() as u32,
            _pad0: 0,
            _pad1: 0,
        };
        let params_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("propagation params"),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("energies staging"),
            size: byte_len,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("propagation bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                bind_entry(0, &energies_in),
                bind_entry(1, &energies_out),
                bind_entry(2, &thresholds),
                bind_entry(3, &types),
                bind_entry(4, &edge_from),
                bind_entry(5, &edge_to),
                bind_entry(6, &edge_weights),
                bind_entry(7, &params_buffer),
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("propagation encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("propagation pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(neuron_count.div_ceil(WORKGROUP_SIZE), 1, 1);
        }
        encoder.copy_buffer_to_buffer(&energies_out, 0, &staging, 0, byte_len);
        self.queue.submit(Some(encoder.finish()));

        let slice = staging.slice(..);
        slice.map_async(wgpu::MapMode::Read, |_| {});
        self.device.poll(wgpu::Maintain::Wait);

        let data = slice.get_mapped_range();
        let result = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        staging.unmap();
        result
    }
}

impl Propagator for GpuPropagator {
    fn propagate(&mut self, input: PropagationInput<'_>) -> Vec<f32> {
        // Nothing to dispatch over; also keeps zero-sized buffers off the
        // device, which wgpu rejects for bindings.
        if input.neuron_count() == 0 || input.connection_count() == 0 {
            return input.energies.to_vec();
        }
        self.run(&input)
    }
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn bind_entry<'a>(binding: u32, buffer: &'a wgpu::Buffer) -> wgpu::BindGroupEntry<'a> {
    wgpu::BindGroupEntry {
        binding,
        resource: buffer.as_entire_binding(),
    }
}
