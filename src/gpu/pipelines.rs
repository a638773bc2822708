//! Render pipelines for instanced discs and line segments.
//!
//! Both pipelines share one uniform (the viewport size) and work in surface
//! pixels with a top-left origin, converting to clip space in the vertex
//! stage.

use std::mem::size_of;

use bytemuck::{Pod, Zeroable};

use super::batch::{CircleInstance, LineInstance};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct ViewportUniform {
    pub size: [f32; 2],
    pub _pad: [f32; 2],
}

impl ViewportUniform {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: [width.max(1) as f32, height.max(1) as f32],
            _pad: [0.0; 2],
        }
    }
}

/// Shared WGSL: viewport uniform and pixel-to-clip conversion.
pub(crate) const COMMON_WGSL: &str = r#"
struct Viewport {
    size: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> viewport: Viewport;

fn to_clip(p: vec2<f32>) -> vec4<f32> {
    let ndc = vec2<f32>(
        p.x / viewport.size.x * 2.0 - 1.0,
        1.0 - p.y / viewport.size.y * 2.0, // Y flipped
    );
    return vec4<f32>(ndc, 0.0, 1.0);
}
"#;

/// Disc with an anti-aliased edge and a gaussian-ish halo out to `glow` pixels.
pub(crate) const CIRCLE_WGSL: &str = r#"
struct CircleOut {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) from_center: vec2<f32>,
    @location(2) radius: f32,
    @location(3) glow: f32,
};

@vertex
fn vs_circle(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) center: vec2<f32>,
    @location(1) radius: f32,
    @location(2) glow: f32,
    @location(3) color: vec4<f32>,
) -> CircleOut {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    // One extra pixel so the anti-aliased edge isn't cut off
    let extent = radius + glow + 1.0;
    let from_center = quad_vertices[vertex_index] * extent;

    var out: CircleOut;
    out.clip_position = to_clip(center + from_center);
    out.color = color;
    out.from_center = from_center;
    out.radius = radius;
    out.glow = glow;
    return out;
}

@fragment
fn fs_circle(in: CircleOut) -> @location(0) vec4<f32> {
    let dist = length(in.from_center);
    let core = 1.0 - smoothstep(in.radius - 0.5, in.radius + 0.5, dist);

    var halo = 0.0;
    if in.glow > 0.0 {
        let t = max(dist - in.radius, 0.0) / in.glow;
        halo = exp(-4.0 * t * t) * 0.6;
    }

    let alpha = max(core, halo) * in.color.a;
    if alpha <= 0.002 {
        discard;
    }
    return vec4<f32>(in.color.rgb, alpha);
}
"#;

/// Segment expanded to a quad along its normal. Sub-pixel widths are drawn
/// one pixel wide with proportionally lower alpha.
pub(crate) const LINE_WGSL: &str = r#"
struct LineOut {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) start: vec2<f32>,
    @location(1) end: vec2<f32>,
    @location(2) color: vec4<f32>,
    @location(3) width: f32,
) -> LineOut {
    // x: 0 at start, 1 at end; y: -1/+1 across the stroke
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(0.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(0.0,  1.0),
        vec2<f32>(0.0,  1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0,  1.0),
    );

    let dir = end - start;
    let len = length(dir);
    var along = vec2<f32>(1.0, 0.0);
    if len > 0.0 {
        along = dir / len;
    }
    let normal = vec2<f32>(-along.y, along.x);
    let drawn_width = max(width, 1.0);

    let corner = quad_vertices[vertex_index];
    let pos = start + dir * corner.x + normal * (corner.y * drawn_width * 0.5);

    var out: LineOut;
    out.clip_position = to_clip(pos);
    out.color = vec4<f32>(color.rgb, color.a * width / drawn_width);
    return out;
}

@fragment
fn fs_line(in: LineOut) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

const CIRCLE_ATTRIBUTES: [wgpu::VertexAttribute; 4] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32, 2 => Float32, 3 => Float32x4];

const LINE_ATTRIBUTES: [wgpu::VertexAttribute; 4] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4, 3 => Float32];

pub(crate) fn circle_shader_source() -> String {
    format!("{COMMON_WGSL}\n{CIRCLE_WGSL}")
}

pub(crate) fn line_shader_source() -> String {
    format!("{COMMON_WGSL}\n{LINE_WGSL}")
}

pub(crate) fn create_viewport_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Viewport Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

pub(crate) fn create_circle_pipeline(
    device: &wgpu::Device,
    viewport_layout: &wgpu::BindGroupLayout,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let source = circle_shader_source();
    create_instanced_pipeline(
        device,
        viewport_layout,
        surface_format,
        "Circle",
        &source,
        ("vs_circle", "fs_circle"),
        wgpu::VertexBufferLayout {
            array_stride: size_of::<CircleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &CIRCLE_ATTRIBUTES,
        },
    )
}

pub(crate) fn create_line_pipeline(
    device: &wgpu::Device,
    viewport_layout: &wgpu::BindGroupLayout,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let source = line_shader_source();
    create_instanced_pipeline(
        device,
        viewport_layout,
        surface_format,
        "Line",
        &source,
        ("vs_line", "fs_line"),
        wgpu::VertexBufferLayout {
            array_stride: size_of::<LineInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &LINE_ATTRIBUTES,
        },
    )
}

fn create_instanced_pipeline(
    device: &wgpu::Device,
    viewport_layout: &wgpu::BindGroupLayout,
    surface_format: wgpu::TextureFormat,
    name: &str,
    source: &str,
    (vs_entry, fs_entry): (&str, &str),
    instance_layout: wgpu::VertexBufferLayout<'_>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{name} Shader")),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{name} Pipeline Layout")),
        bind_group_layouts: &[viewport_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{name} Pipeline")),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some(vs_entry),
            buffers: &[instance_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some(fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
