use wgpu::{
    BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry, BindingType, BlendState,
    ColorTargetState, ColorWrites, Device, FragmentState, PipelineLayoutDescriptor, RenderPipeline,
    RenderPipelineDescriptor, SamplerBindingType, ShaderModule, ShaderStages, TextureFormat,
    TextureSampleType, TextureViewDimension, VertexState, include_wgsl,
};

use crate::render::vertex::Vertex;

/// The two fixed render pipelines and the texture bind group layout
///
/// Both pipelines share one shader module and vertex stage; they differ only
/// in fragment entry point:
/// - `flat`: vertex color pass-through, no bind groups
/// - `textured`: samples the bound texture and multiplies by vertex color
pub struct Pipelines {
    pub flat: RenderPipeline,
    pub textured: RenderPipeline,
    pub texture_layout: BindGroupLayout,
}

impl Pipelines {
    pub fn new(device: &Device, surface_format: TextureFormat) -> Self {
        let shader = device.create_shader_module(include_wgsl!("../../shader.wgsl"));
        let texture_layout = create_texture_bind_group_layout(device);

        let flat = create_pipeline(device, surface_format, &shader, "fs_flat", &[]);
        let textured = create_pipeline(
            device,
            surface_format,
            &shader,
            "fs_textured",
            &[&texture_layout],
        );

        Self {
            flat,
            textured,
            texture_layout,
        }
    }
}

/// Bind group layout for texture sampling
///
/// - Binding 0: 2D texture (fragment shader)
/// - Binding 1: Sampler (fragment shader)
fn create_texture_bind_group_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("Texture Bind Group Layout"),
        entries: &[
            BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 1,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

fn create_pipeline(
    device: &Device,
    surface_format: TextureFormat,
    shader: &ShaderModule,
    fragment_entry: &str,
    bind_group_layouts: &[&BindGroupLayout],
) -> RenderPipeline {
    let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: None,
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some(fragment_entry),
        layout: Some(&pipeline_layout),
        vertex: VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        primitive: Default::default(),
        depth_stencil: None,
        multisample: Default::default(),
        fragment: Some(FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(ColorTargetState {
                format: surface_format,
                blend: Some(BlendState::ALPHA_BLENDING),
                write_mask: ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        multiview: None,
        cache: None,
    })
}
