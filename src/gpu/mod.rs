//! wgpu-backed [`Surface`] for the window host.
//!
//! Draw calls made during a tick are only recorded; [`GpuSurface::present`]
//! uploads them as instance buffers and replays them in a single render
//! pass. Every presented frame starts from the background colour, so a
//! full-surface `clear` just drops whatever was recorded before it. Partial
//! clears are drawn as opaque background rectangles.

mod batch;
mod pipelines;

use std::sync::Arc;

use glam::Vec2;
use tracing::{debug, info};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::GpuError;
use crate::surface::{Color, Fill, Rect, Stroke, Surface};
use batch::{BatchKind, Batcher, CircleInstance, LineInstance};
use pipelines::ViewportUniform;

/// Initial instance capacity; buffers grow to the next power of two as needed.
const INITIAL_CAPACITY: usize = 1024;

pub struct GpuSurface {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// Logical size; may be zero while the window is minimised.
    width: u32,
    height: u32,
    background: Color,
    circle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    viewport_buffer: wgpu::Buffer,
    viewport_bind_group: wgpu::BindGroup,
    circle_buffer: wgpu::Buffer,
    circle_capacity: usize,
    line_buffer: wgpu::Buffer,
    line_capacity: usize,
    batcher: Batcher,
}

impl GpuSurface {
    pub async fn new(window: Arc<Window>, background: Color) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        info!(
            adapter = %adapter_info.name,
            backend = ?adapter_info.backend,
            "GPU adapter selected"
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let viewport_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Viewport Buffer"),
            contents: bytemuck::bytes_of(&ViewportUniform::new(size.width, size.height)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let viewport_layout = pipelines::create_viewport_layout(&device);
        let viewport_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Viewport Bind Group"),
            layout: &viewport_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_buffer.as_entire_binding(),
            }],
        });

        let circle_pipeline =
            pipelines::create_circle_pipeline(&device, &viewport_layout, surface_format);
        let line_pipeline =
            pipelines::create_line_pipeline(&device, &viewport_layout, surface_format);

        let circle_buffer =
            create_instance_buffer::<CircleInstance>(&device, "Circle Instances", INITIAL_CAPACITY);
        let line_buffer =
            create_instance_buffer::<LineInstance>(&device, "Line Instances", INITIAL_CAPACITY);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            width: size.width,
            height: size.height,
            background,
            circle_pipeline,
            line_pipeline,
            viewport_buffer,
            viewport_bind_group,
            circle_buffer,
            circle_capacity: INITIAL_CAPACITY,
            line_buffer,
            line_capacity: INITIAL_CAPACITY,
            batcher: Batcher::default(),
        })
    }

    /// Reapply the current swapchain configuration after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Submit everything recorded since the last full clear.
    pub fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        if self.width == 0 || self.height == 0 {
            self.batcher.reset();
            return Ok(());
        }

        self.upload();

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let bg = self.background;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Field Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: bg.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.viewport_bind_group, &[]);
            for batch in &self.batcher.batches {
                match batch.kind {
                    BatchKind::Circles => {
                        render_pass.set_pipeline(&self.circle_pipeline);
                        render_pass.set_vertex_buffer(0, self.circle_buffer.slice(..));
                    }
                    BatchKind::Lines => {
                        render_pass.set_pipeline(&self.line_pipeline);
                        render_pass.set_vertex_buffer(0, self.line_buffer.slice(..));
                    }
                }
                render_pass.draw(0..6, batch.range.clone());
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.batcher.reset();

        Ok(())
    }

    fn upload(&mut self) {
        if self.batcher.circles.len() > self.circle_capacity {
            self.circle_capacity = self.batcher.circles.len().next_power_of_two();
            self.circle_buffer = create_instance_buffer::<CircleInstance>(
                &self.device,
                "Circle Instances",
                self.circle_capacity,
            );
            debug!(capacity = self.circle_capacity, "circle buffer grown");
        }
        if self.batcher.lines.len() > self.line_capacity {
            self.line_capacity = self.batcher.lines.len().next_power_of_two();
            self.line_buffer = create_instance_buffer::<LineInstance>(
                &self.device,
                "Line Instances",
                self.line_capacity,
            );
            debug!(capacity = self.line_capacity, "line buffer grown");
        }

        if !self.batcher.circles.is_empty() {
            self.queue.write_buffer(
                &self.circle_buffer,
                0,
                bytemuck::cast_slice(&self.batcher.circles),
            );
        }
        if !self.batcher.lines.is_empty() {
            self.queue
                .write_buffer(&self.line_buffer, 0, bytemuck::cast_slice(&self.batcher.lines));
        }
    }
}

impl Surface for GpuSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.batcher.reset();

        // A zero-sized swapchain is invalid; keep the old one until restored.
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.queue.write_buffer(
                &self.viewport_buffer,
                0,
                bytemuck::bytes_of(&ViewportUniform::new(width, height)),
            );
        }
    }

    fn clear(&mut self, region: Rect) {
        if region.covers(self.width, self.height) {
            self.batcher.reset();
        } else {
            self.batcher
                .push_line(LineInstance::rect(region, self.background));
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: &Fill) {
        self.batcher
            .push_circle(CircleInstance::new(center, radius, fill));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        self.batcher.push_line(LineInstance::new(from, to, stroke));
    }
}

fn create_instance_buffer<T>(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (capacity * std::mem::size_of::<T>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
