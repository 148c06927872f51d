//! Rendering system with wgpu pipeline built from the user's shaders.
//!
//! Bind group 0 layout seen by the shaders:
//! - binding 0: [`SceneUniforms`] uniform block
//! - binding 1/2: normal map texture + sampler (`normalTex`)
//! - binding 3/4: light probe texture + sampler (`envMapTex`)

use std::path::Path;
use std::sync::{mpsc, Arc};

use image::RgbaImage;
use wgpu::util::DeviceExt;

use crate::assets::SceneAssets;
use crate::error::{CaptureError, SetupError};
use crate::mesh::{MeshData, Vertex};
use crate::params::RenderConfig;
use crate::uniforms::{SceneUniforms, TextureSlot};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Texture binding for a slot; its sampler sits at the next binding
fn texture_binding(slot: TextureSlot) -> u32 {
    match slot {
        TextureSlot::NormalMap => 1,
        TextureSlot::EnvironmentMap => 3,
    }
}

/// Vertex + index buffers for one mesh
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertex_label = format!("{} Vertex Buffer", label);
        let index_label = format!("{} Index Buffer", label);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&vertex_label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&index_label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// Which mesh a frame draws
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawTarget {
    Surface,
    ReferenceSolid,
}

/// Rendering system managing wgpu device, pipeline, and buffers
pub struct RenderSystem {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    surface_mesh: GpuMesh,
    solid_mesh: GpuMesh,
    clear_color: wgpu::Color,
    can_capture: bool,
}

impl RenderSystem {
    /// Create new rendering system
    pub async fn new(
        window: Arc<winit::window::Window>,
        assets: &SceneAssets,
        surface_mesh: &MeshData,
        solid_mesh: &MeshData,
        render_config: &RenderConfig,
    ) -> Result<Self, SetupError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(SetupError::NoAdapter)?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
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

        // Screenshots need to copy out of the swapchain image
        let can_capture = surface_caps.usages.contains(wgpu::TextureUsages::COPY_SRC);
        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if can_capture {
            usage |= wgpu::TextureUsages::COPY_SRC;
        } else {
            log::warn!("Surface does not support COPY_SRC; screenshots disabled");
        }

        let config = wgpu::SurfaceConfiguration {
            usage,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, config.width, config.height);

        // Compile the user's shaders, catching validation errors instead of panicking
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Surface Vertex Shader"),
            source: wgpu::ShaderSource::Wgsl(assets.shaders.vertex.as_str().into()),
        });

        let fragment_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Surface Fragment Shader"),
            source: wgpu::ShaderSource::Wgsl(assets.shaders.fragment.as_str().into()),
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let normal_texture = upload_texture(
            &device,
            &queue,
            "Normal Map",
            &assets.normal_map,
            wgpu::TextureFormat::Rgba8Unorm,
        );
        let light_probe_texture = upload_texture(
            &device,
            &queue,
            "Light Probe",
            &assets.light_probe,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Texture Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        let normal_binding = texture_binding(TextureSlot::NormalMap);
        let probe_binding = texture_binding(TextureSlot::EnvironmentMap);
        for slot in [TextureSlot::NormalMap, TextureSlot::EnvironmentMap] {
            log::debug!(
                "{} (unit {}) bound at binding {}",
                slot.name(),
                slot.unit(),
                texture_binding(slot)
            );
        }

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                texture_entry(normal_binding),
                sampler_entry(normal_binding + 1),
                texture_entry(probe_binding),
                sampler_entry(probe_binding + 1),
            ],
        });

        let normal_view = normal_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let light_probe_view =
            light_probe_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: normal_binding,
                    resource: wgpu::BindingResource::TextureView(&normal_view),
                },
                wgpu::BindGroupEntry {
                    binding: normal_binding + 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: probe_binding,
                    resource: wgpu::BindingResource::TextureView(&light_probe_view),
                },
                wgpu::BindGroupEntry {
                    binding: probe_binding + 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Surface Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
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
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = device.pop_error_scope().await {
            return Err(SetupError::Pipeline(format!(
                "{} / {}: {}",
                assets.shaders.vertex_path.display(),
                assets.shaders.fragment_path.display(),
                err
            )));
        }

        let grey = render_config.clear_grey;
        Ok(Self {
            surface,
            surface_mesh: GpuMesh::upload(&device, "Surface", surface_mesh),
            solid_mesh: GpuMesh::upload(&device, "Reference Solid", solid_mesh),
            device,
            queue,
            config,
            render_pipeline,
            uniform_buffer,
            bind_group,
            depth_view,
            clear_color: wgpu::Color {
                r: grey,
                g: grey,
                b: grey,
                a: 1.0,
            },
            can_capture,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, width, height);
    }

    /// Reconfigure with the current size (after a lost surface)
    pub fn reconfigure(&mut self) {
        let (width, height) = self.size();
        self.resize(width, height);
    }

    pub fn update_uniforms(&self, uniforms: &SceneUniforms) {
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Render a frame, optionally saving it to `capture_path`
    pub fn render(
        &self,
        target: DrawTarget,
        capture_path: Option<&Path>,
    ) -> Result<(), wgpu::SurfaceError> {
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
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mesh = match target {
                DrawTarget::Surface => &self.surface_mesh,
                DrawTarget::ReferenceSolid => &self.solid_mesh,
            };

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));

        if let Some(path) = capture_path {
            if self.can_capture {
                match self.capture_frame(path, &output) {
                    Ok(()) => log::info!("Screenshot saved to {}", path.display()),
                    Err(e) => log::error!("Screenshot failed: {}", e),
                }
            } else {
                log::warn!("Screenshot skipped: surface cannot be read back");
            }
        }

        output.present();

        Ok(())
    }

    /// Copy the presented image to disk
    fn capture_frame(
        &self,
        path: &Path,
        texture: &wgpu::SurfaceTexture,
    ) -> Result<(), CaptureError> {
        let (width, height) = self.size();
        let bytes_per_pixel = 4; // RGBA8 / BGRA8
        let unpadded_bytes_per_row = width * bytes_per_pixel;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Capture Buffer"),
            size: (padded_bytes_per_row * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Capture Encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = buffer.slice(..);
        let (tx, rx) = mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        wait_for_map(&rx)?;

        let data = buffer_slice.get_mapped_range();
        let swap_red_blue = matches!(
            self.config.format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        );
        let image_data = unpad_rows(
            &data,
            width,
            height,
            padded_bytes_per_row,
            swap_red_blue,
        );

        drop(data);
        buffer.unmap();

        image::save_buffer(path, &image_data, width, height, image::ColorType::Rgba8).map_err(
            |source| CaptureError::Save {
                path: path.to_path_buf(),
                source,
            },
        )
    }
}

/// Outcome of a readback mapping; a dropped callback counts as a failure
fn wait_for_map(
    rx: &mpsc::Receiver<Result<(), wgpu::BufferAsyncError>>,
) -> Result<(), CaptureError> {
    rx.recv()??;
    Ok(())
}

/// Strip row padding from a mapped copy and normalise to RGBA order
fn unpad_rows(
    data: &[u8],
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
    swap_red_blue: bool,
) -> Vec<u8> {
    let row_bytes = (width * 4) as usize;
    let mut image_data = Vec::with_capacity(row_bytes * height as usize);

    for y in 0..height as usize {
        let start = y * padded_bytes_per_row as usize;
        image_data.extend_from_slice(&data[start..start + row_bytes]);
    }

    if swap_red_blue {
        for pixel in image_data.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
    }

    image_data
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &RgbaImage,
    format: wgpu::TextureFormat,
) -> wgpu::Texture {
    let (width, height) = image.dimensions();
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.as_raw(),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    texture
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpad_rows_drops_padding() {
        // 2x2 image, rows padded to 12 bytes
        let data = [
            1, 2, 3, 4, 5, 6, 7, 8, 0, 0, 0, 0, //
            9, 10, 11, 12, 13, 14, 15, 16, 0, 0, 0, 0,
        ];
        let out = unpad_rows(&data, 2, 2, 12, false);
        assert_eq!(out, (1..=16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_texture_bindings_follow_uniform_block() {
        assert_eq!(texture_binding(TextureSlot::NormalMap), 1);
        assert_eq!(texture_binding(TextureSlot::EnvironmentMap), 3);
    }

    #[test]
    fn test_failed_map_is_reported() {
        let (tx, rx) = mpsc::channel();
        tx.send(Ok(())).unwrap();
        assert!(wait_for_map(&rx).is_ok());

        tx.send(Err(wgpu::BufferAsyncError)).unwrap();
        assert!(matches!(wait_for_map(&rx), Err(CaptureError::Map(_))));

        drop(tx);
        assert!(matches!(wait_for_map(&rx), Err(CaptureError::Dropped(_))));
    }

    #[test]
    fn test_unpad_rows_swaps_bgra() {
        let data = [30, 20, 10, 255];
        assert_eq!(unpad_rows(&data, 1, 1, 4, true), vec![10, 20, 30, 255]);
    }
}
