pub mod pipeline;
pub mod texture;
pub mod vertex;

use std::ops::Range;

use wgpu::{
    Buffer, BufferDescriptor, BufferUsages, Device, DeviceDescriptor, Instance, LoadOp, Operations,
    PresentMode, Queue, RenderPassColorAttachment, RenderPassDescriptor, RequestAdapterOptions,
    StoreOp, Surface, SurfaceConfiguration, SurfaceError, SurfaceTarget, WindowHandle,
};

use crate::render::{
    pipeline::Pipelines,
    texture::{Texture, TextureError, TextureId},
    vertex::{Triangle, Vertex, vertices_of},
};

pub use wgpu::Color;

/// Capacity of the shared dynamic vertex buffer, in vertices
const MAX_VERTICES: usize = 16_384;

struct TexturedBatch {
    texture: TextureId,
    vertices: Vec<Vertex>,
}

/// Triangles submitted since the last frame, flat and textured kept apart
///
/// The flat set always draws first; consecutive submissions against the same
/// texture merge into one batch.
#[derive(Default)]
struct FrameGeometry {
    flat: Vec<Vertex>,
    textured: Vec<TexturedBatch>,
}

impl FrameGeometry {
    fn push_flat(&mut self, vertices: &[Vertex]) {
        self.flat.extend_from_slice(vertices);
    }

    fn push_textured(&mut self, vertices: &[Vertex], texture: TextureId) {
        if let Some(last) = self.textured.last_mut() {
            if last.texture == texture {
                last.vertices.extend_from_slice(vertices);
                return;
            }
        }
        self.textured.push(TexturedBatch {
            texture,
            vertices: vertices.to_vec(),
        });
    }

    fn vertex_count(&self) -> usize {
        self.flat.len() + self.textured.iter().map(|b| b.vertices.len()).sum::<usize>()
    }

    fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// Concatenates everything into one upload (flat first), returning the
    /// textured draw ranges
    fn pack(&self) -> (Vec<Vertex>, Vec<(TextureId, Range<u32>)>) {
        let mut vertices = Vec::with_capacity(self.vertex_count());
        vertices.extend_from_slice(&self.flat);

        let mut ranges = Vec::with_capacity(self.textured.len());
        for batch in &self.textured {
            let start = vertices.len() as u32;
            vertices.extend_from_slice(&batch.vertices);
            ranges.push((batch.texture, start..vertices.len() as u32));
        }

        (vertices, ranges)
    }

    fn clear(&mut self) {
        self.flat.clear();
        self.textured.clear();
    }
}

struct RenderTarget {
    surface: Surface<'static>,
    config: SurfaceConfiguration,
}

struct Gpu {
    device: Device,
    queue: Queue,
}

/// Low-level GPU renderer built on `wgpu`
///
/// Owns the surface, the two fixed pipelines, the texture list & a single
/// dynamic vertex buffer that the whole frame's vertex set is re-uploaded
/// into every [`render_frame`](Self::render_frame)
pub struct Renderer {
    gpu: Gpu,
    target: RenderTarget,
    pipelines: Pipelines,
    vertex_buffer: Buffer,
    geometry: FrameGeometry,
    textures: Vec<Texture>,
    default_texture: Texture,
    clear_color: Color,
}

impl Renderer {
    /// Creates a renderer with a configured surface, both pipelines & the
    /// default texture
    pub async fn new(
        inner_width: u32,
        inner_height: u32,
        window: impl Into<SurfaceTarget<'static>> + WindowHandle,
    ) -> Renderer {
        let instance = Instance::default();
        let surface = instance.create_surface(window).unwrap();
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                // Force find adapter that can present to this surface
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .unwrap();
        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                #[cfg(target_arch = "wasm32")]
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut surface_cfg = surface
            .get_default_config(&adapter, inner_width, inner_height)
            .unwrap();
        surface_cfg.present_mode = PresentMode::Fifo;
        surface.configure(&device, &surface_cfg);

        let pipelines = Pipelines::new(&device, surface_cfg.format);
        let default_texture = Texture::create_default(&device, &queue, &pipelines.texture_layout);

        let vertex_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("Frame Vertex Buffer"),
            size: (MAX_VERTICES * size_of::<Vertex>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Renderer {
            gpu: Gpu { device, queue },
            target: RenderTarget {
                surface,
                config: surface_cfg,
            },
            pipelines,
            vertex_buffer,
            geometry: FrameGeometry::default(),
            textures: Vec::new(),
            default_texture,
            clear_color: Color::BLACK,
        }
    }

    /// Queues flat-colored triangles for this frame
    pub fn submit(&mut self, triangles: &[Triangle]) {
        self.geometry.push_flat(vertices_of(triangles));
    }

    /// Queues textured triangles for this frame
    ///
    /// An id that no longer resolves to a texture draws with the default
    /// white texture instead
    pub fn submit_textured(&mut self, triangles: &[Triangle], texture: TextureId) {
        self.geometry.push_textured(vertices_of(triangles), texture);
    }

    /// Uploads the frame's full vertex set, draws the flat range then every
    /// textured range & presents
    pub fn render_frame(&mut self) {
        let surface_texture = match self.target.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::OutOfMemory) => panic!("out of GPU memory"),
            Err(err) => {
                // Lost/outdated surfaces recover on a later frame
                log::warn!("dropping frame: {err}");
                self.geometry.clear();
                return;
            }
        };

        assert!(
            self.geometry.vertex_count() <= MAX_VERTICES,
            "vertex buffer overflow"
        );

        let (vertices, textured_ranges) = self.geometry.pack();
        if !self.geometry.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }

        let view = surface_texture.texture.create_view(&Default::default());
        let mut encoder = self.gpu.device.create_command_encoder(&Default::default());
        {
            let mut r_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                })],
                ..Default::default()
            });

            r_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

            let flat_count = self.geometry.flat.len() as u32;
            if flat_count > 0 {
                r_pass.set_pipeline(&self.pipelines.flat);
                r_pass.draw(0..flat_count, 0..1);
            }

            if !textured_ranges.is_empty() {
                r_pass.set_pipeline(&self.pipelines.textured);
                for (texture_id, range) in textured_ranges {
                    let texture = self
                        .textures
                        .get(texture_id.0)
                        .unwrap_or(&self.default_texture);
                    texture.bind(&mut r_pass, 0);
                    r_pass.draw(range, 0..1);
                }
            }
        }

        self.gpu.queue.submit(Some(encoder.finish()));
        surface_texture.present();

        self.geometry.clear();
    }

    /// Resizes the surface to the new inner window size
    pub fn resize(&mut self, w: u32, h: u32) {
        (self.target.config.width, self.target.config.height) = (w.max(1), h.max(1));
        self.target
            .surface
            .configure(&self.gpu.device, &self.target.config);
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    /// Current surface dimensions (in pixels)
    pub fn surface_size(&self) -> (f32, f32) {
        (
            self.target.config.width as f32,
            self.target.config.height as f32,
        )
    }

    /// Loads a texture from image bytes & returns its id
    pub fn add_texture(&mut self, data: &[u8]) -> Result<TextureId, TextureError> {
        let img = image::load_from_memory(data)?.to_rgba8();
        let (w, h) = img.dimensions();
        Ok(self.add_texture_raw(w, h, &img))
    }

    /// Loads a texture from a PNG on disk & returns its id
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_texture(
        &mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<TextureId, TextureError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_texture(&bytes)
    }

    /// Adds a texture from raw RGBA bytes & returns its id
    pub fn add_texture_raw(&mut self, w: u32, h: u32, data: &[u8]) -> TextureId {
        let id = TextureId(self.textures.len());
        self.textures.push(Texture::from_bytes(
            &self.gpu.device,
            &self.gpu.queue,
            &self.pipelines.texture_layout,
            data,
            w,
            h,
        ));
        id
    }

    /// Width/height of a loaded texture
    pub fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.textures.get(id.0).map(|t| (t.width(), t.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vert(x: f32) -> Vertex {
        Vertex::new([x, 0.0, 0.0], [1.0, 1.0, 1.0, 1.0], [0.0, 0.0])
    }

    #[test]
    fn pack_orders_flat_before_textured() {
        let mut geometry = FrameGeometry::default();
        geometry.push_textured(&[vert(2.0), vert(3.0), vert(4.0)], TextureId(0));
        geometry.push_flat(&[vert(0.0), vert(1.0), vert(1.5)]);

        let (vertices, ranges) = geometry.pack();
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[0].position[0], 0.0);
        assert_eq!(ranges, vec![(TextureId(0), 3..6)]);
    }

    #[test]
    fn consecutive_same_texture_submissions_merge() {
        let mut geometry = FrameGeometry::default();
        geometry.push_textured(&[vert(0.0); 3], TextureId(1));
        geometry.push_textured(&[vert(1.0); 3], TextureId(1));
        geometry.push_textured(&[vert(2.0); 3], TextureId(0));

        assert_eq!(geometry.textured.len(), 2);
        let (_, ranges) = geometry.pack();
        assert_eq!(ranges, vec![(TextureId(1), 0..6), (TextureId(0), 6..9)]);
    }

    #[test]
    fn clear_empties_the_frame() {
        let mut geometry = FrameGeometry::default();
        geometry.push_flat(&[vert(0.0); 3]);
        geometry.push_textured(&[vert(0.0); 3], TextureId(0));
        assert_eq!(geometry.vertex_count(), 6);

        geometry.clear();
        assert!(geometry.is_empty());
        let (vertices, ranges) = geometry.pack();
        assert!(vertices.is_empty() && ranges.is_empty());
    }
}
