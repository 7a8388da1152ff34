// First-person animal catching in a procedural forest.
// ECS-powered scene with INSTANCED rendering: ground, trees, grass, and
// animals are all unit cubes drawn in a single draw call.

mod engine;

use std::time::Instant;

use bevy_ecs::prelude::*;
use glam::{Mat4, Vec3};
use winit::{
    event::{ElementState, Event as WinitEvent, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

use engine::animals;
use engine::forest::Forest;
use engine::hud::{GameStats, Hud, HudFrame};
use engine::input::InputState;
use engine::net::{self, Net};
use engine::player::Player;
use engine::session::{Phase, Session};
use engine::spatial;
use engine::{Color as EntityColor, Heading, Transform};

// ============================================================================
// VERTEX DEFINITION
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
}

impl Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

// ============================================================================
// INSTANCE DATA (per-entity)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct InstanceData {
    position: [f32; 3],
    yaw: f32,
    scale: [f32; 3],
    _padding: f32, // Align to 16 bytes
    color: [f32; 4],
}

impl InstanceData {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceData>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance, // One per instance, not per vertex
            attributes: &[
                // Position (location 1)
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Yaw rotation (location 2)
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32,
                },
                // Scale (location 3)
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Color (location 4)
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }

    fn block(position: Vec3, yaw: f32, scale: Vec3, color: [f32; 3]) -> Self {
        Self {
            position: position.to_array(),
            yaw,
            scale: scale.to_array(),
            _padding: 0.0,
            color: [color[0], color[1], color[2], 1.0],
        }
    }
}

// Unit cube, centered at the origin; per-instance scale gives world size.
const CUBE_VERTICES: &[Vertex] = &[
    Vertex { position: [-0.5, -0.5,  0.5] },
    Vertex { position: [ 0.5, -0.5,  0.5] },
    Vertex { position: [ 0.5,  0.5,  0.5] },
    Vertex { position: [-0.5,  0.5,  0.5] },
    Vertex { position: [-0.5, -0.5, -0.5] },
    Vertex { position: [ 0.5, -0.5, -0.5] },
    Vertex { position: [ 0.5,  0.5, -0.5] },
    Vertex { position: [-0.5,  0.5, -0.5] },
];

const CUBE_INDICES: &[u16] = &[
    0, 1, 2,  0, 2, 3,  // Front
    5, 4, 7,  5, 7, 6,  // Back
    4, 0, 3,  4, 3, 7,  // Left
    1, 5, 6,  1, 6, 2,  // Right
    3, 2, 6,  3, 6, 7,  // Top
    4, 5, 1,  4, 1, 0,  // Bottom
];

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

// ============================================================================
// UNIFORM DATA (camera only)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

impl Uniforms {
    fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

// ============================================================================
// FRAME TIMING (drives the F3 stats panel)
// ============================================================================

struct FrameTimer {
    window_start: Instant,
    frames: u32,
    sum_ms: f32,
    min_ms: f32,
    max_ms: f32,
    // Last completed one-second window.
    fps: u32,
    avg_ms: f32,
    lo_ms: f32,
    hi_ms: f32,
}

impl FrameTimer {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            sum_ms: 0.0,
            min_ms: f32::MAX,
            max_ms: 0.0,
            fps: 0,
            avg_ms: 0.0,
            lo_ms: 0.0,
            hi_ms: 0.0,
        }
    }

    fn record(&mut self, dt: f32) {
        let ms = dt * 1000.0;
        self.frames += 1;
        self.sum_ms += ms;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);

        if self.window_start.elapsed().as_secs_f32() >= 1.0 {
            self.fps = self.frames;
            self.avg_ms = self.sum_ms / self.frames.max(1) as f32;
            self.lo_ms = self.min_ms;
            self.hi_ms = self.max_ms;
            self.window_start = Instant::now();
            self.frames = 0;
            self.sum_ms = 0.0;
            self.min_ms = f32::MAX;
            self.max_ms = 0.0;
        }
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct State {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    num_indices: u32,
    max_instances: usize,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,

    // Simulation
    world: World,
    player: Player,
    forest: Forest,
    net: Net,
    session: Session,
    input: InputState,
    hud: Hud,
    static_instances: Vec<InstanceData>,
    last_update: Instant,
    sim_time: f32,
    timer: FrameTimer,
}

impl State {
    async fn new(window: std::sync::Arc<winit::window::Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap();

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .unwrap();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader_instanced.wgsl").into()),
        });

        let uniforms = Uniforms::new();

        use wgpu::util::DeviceExt;

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
                label: Some("uniform_bind_group_layout"),
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Render Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc(), InstanceData::desc()], // Vertex + Instance buffers
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
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
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(CUBE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        // Create instance buffer (large enough for the whole forest + animals)
        let max_instances = 4096;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (max_instances * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_view = create_depth_view(&device, &config);

        let num_indices = CUBE_INDICES.len() as u32;

        // Build the session: forest, animals, player at the origin clearing.
        let mut rng = rand::thread_rng();
        let forest = Forest::generate(&mut rng);
        let mut world = World::new();
        let total = animals::spawn_animals(&mut world, &mut rng);
        println!("Spawned {} animals among {} trees", total, forest.trees.len());

        let static_instances = build_static_instances(&forest, &mut rng);

        let hud = Hud::new(&window, &device, surface_format);

        Self {
            surface,
            device,
            queue,
            config,
            size,
            render_pipeline,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            num_indices,
            max_instances,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            world,
            player: Player::new(),
            forest,
            net: Net::new(),
            session: Session::new(total),
            input: InputState::new(),
            hud,
            static_instances,
            last_update: Instant::now(),
            sim_time: 0.0,
            timer: FrameTimer::new(),
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
        }
    }

    /// Longest step the simulation will integrate in one tick. A window
    /// drag or GPU stall can inflate the real frame gap enormously; the
    /// sim treats anything past this as a 100 ms frame instead of letting
    /// animals teleport across the map.
    const MAX_FRAME_DT: f32 = 0.1;

    /// One simulation tick. Fixed order: player -> animals -> net -> UI.
    fn update(&mut self, window: &Window) {
        let now = Instant::now();
        let frame_dt = (now - self.last_update).as_secs_f32();
        self.last_update = now;
        self.timer.record(frame_dt);

        let dt = frame_dt.min(Self::MAX_FRAME_DT);
        self.sim_time += dt;

        // A click with the pointer free locks it and starts the session;
        // a click while locked asks for a net swing this frame.
        let mut swing_requested = false;
        if self.input.clicked {
            if self.input.pointer_locked {
                swing_requested = true;
            } else if self.session.phase() != Phase::Won {
                // No gameplay behind the win screen; leave the cursor free.
                self.grab_pointer(window);
                self.session.begin();
            }
        }

        // Look is unconditional; movement is collision- and bounds-gated.
        let (dx, dy) = self.input.look_delta;
        self.player.apply_look(dx, dy);

        if self.session.is_running() {
            self.player.update(&self.input, &self.forest, dt);
            let mut rng = rand::thread_rng();
            animals::update(
                &mut self.world,
                self.player.position,
                &self.forest,
                dt,
                &mut rng,
            );
        }

        // Catch resolution is instantaneous at swing start; a re-trigger
        // while a swing is in flight is dropped by try_swing.
        if swing_requested && self.session.is_running() && self.net.try_swing() {
            let caught =
                net::resolve_catches(&mut self.world, self.player.position, self.player.yaw);
            for species in caught {
                if self.session.record_catch(species) {
                    // Last animal: session over, hand the cursor back.
                    self.release_pointer(window);
                }
            }
        }
        self.net.update(dt);
        self.session.tick_message(dt);
    }

    fn grab_pointer(&mut self, window: &Window) {
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
            .is_ok();
        if grabbed {
            window.set_cursor_visible(false);
            self.input.pointer_locked = true;
        }
    }

    fn release_pointer(&mut self, window: &Window) {
        let _ = window.set_cursor_grab(CursorGrabMode::None);
        window.set_cursor_visible(true);
        self.input.pointer_locked = false;
    }

    fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Collect instance data BEFORE creating the render pass:
        // static scenery first, then one body + head box per live animal.
        let mut instance_data = self.static_instances.clone();
        let bob = (self.sim_time * 10.0).sin() * 0.1;
        let mut query = self.world.query::<(&Transform, &Heading, &EntityColor)>();
        for (transform, heading, color) in query.iter(&self.world) {
            let pos = transform.position;
            let rgb = [color.r, color.g, color.b];
            instance_data.push(InstanceData::block(
                pos + Vec3::new(0.0, 0.5 + bob, 0.0),
                heading.yaw,
                Vec3::new(1.0, 0.8, 1.2),
                rgb,
            ));
            // Head sits ahead of the body along the heading.
            let ahead = spatial::yaw_forward(heading.yaw);
            instance_data.push(InstanceData::block(
                pos + ahead * 0.55 + Vec3::new(0.0, 0.95 + bob, 0.0),
                heading.yaw,
                Vec3::splat(0.5),
                rgb,
            ));
        }

        let instance_count = instance_data.len().min(self.max_instances);

        // Write instance data to buffer BEFORE render pass
        if !instance_data.is_empty() {
            self.queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&instance_data[..instance_count]),
            );
        }

        // First-person camera from the player controller.
        let aspect = self.size.width as f32 / self.size.height as f32;
        let uniforms = Uniforms {
            view_proj: self.player.view_projection(aspect).to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        // NOW create render pass (after all buffer writes)
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
                        // Sky blue
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.53,
                            g: 0.81,
                            b: 0.92,
                            a: 1.0,
                        }),
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
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..)); // Instance data
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            // ONE DRAW CALL for the whole scene
            render_pass.draw_indexed(0..self.num_indices, 0, 0..instance_count as u32);
        }

        // HUD pass on top of the scene.
        let animal_count = self.world.query::<&Transform>().iter(&self.world).count();
        let stats = self.hud.stats_visible.then(|| GameStats {
            fps: self.timer.fps,
            frame_time_avg_ms: self.timer.avg_ms,
            frame_time_min_ms: self.timer.lo_ms,
            frame_time_max_ms: self.timer.hi_ms,
            animal_count,
            draw_calls: 1,
            resolution: (self.size.width, self.size.height),
            player_pos: (self.player.position.x, self.player.position.z),
            player_yaw_deg: self.player.yaw.to_degrees(),
        });
        let frame = HudFrame {
            phase: self.session.phase(),
            caught: self.session.caught.len(),
            total: self.session.total,
            timer: self.session.format_elapsed(),
            glyph_trail: self.session.caught_glyphs(),
            message: self.session.message(),
            swing_progress: self.net.progress(),
            stats,
        };
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };
        self.hud.render(
            &self.device,
            &self.queue,
            &mut encoder,
            window,
            &view,
            &screen_descriptor,
            &frame,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
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

// ============================================================================
// STATIC SCENERY
// ============================================================================

/// Instances that never change: the ground slab, every tree (trunk +
/// canopy), and scattered grass tufts. Built once, cloned per frame.
fn build_static_instances(forest: &Forest, rng: &mut impl rand::Rng) -> Vec<InstanceData> {
    let mut out = Vec::with_capacity(forest.trees.len() * 2 + 501);

    // Ground slab, top face at y = 0.
    out.push(InstanceData::block(
        Vec3::new(0.0, -0.05, 0.0),
        0.0,
        Vec3::new(spatial::GROUND_HALF * 2.0, 0.1, spatial::GROUND_HALF * 2.0),
        [0.13, 0.55, 0.13],
    ));

    const CANOPY_GREENS: [[f32; 3]; 3] = [
        [0.13, 0.55, 0.13],
        [0.00, 0.39, 0.00],
        [0.20, 0.80, 0.20],
    ];

    for tree in &forest.trees {
        let scale = rng.gen_range(0.7..1.3_f32);
        out.push(InstanceData::block(
            tree.position + Vec3::new(0.0, 2.0 * scale, 0.0),
            0.0,
            Vec3::new(0.7, 4.0, 0.7) * scale,
            [0.55, 0.27, 0.07],
        ));
        out.push(InstanceData::block(
            tree.position + Vec3::new(0.0, 5.2 * scale, 0.0),
            rng.gen_range(0.0..std::f32::consts::TAU),
            Vec3::new(3.2, 3.0, 3.2) * scale,
            CANOPY_GREENS[rng.gen_range(0..CANOPY_GREENS.len())],
        ));
    }

    // Grass tufts, purely decorative.
    for _ in 0..500 {
        let shade = if rng.gen_bool(0.5) {
            [0.20, 0.80, 0.20]
        } else {
            [0.13, 0.55, 0.13]
        };
        out.push(InstanceData::block(
            Vec3::new(
                rng.gen_range(-90.0..90.0),
                0.15,
                rng.gen_range(-90.0..90.0),
            ),
            rng.gen_range(0.0..std::f32::consts::TAU),
            Vec3::new(0.2, 0.3, 0.2),
            shade,
        ));
    }

    out
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new().unwrap();

    let window_attributes = Window::default_attributes()
        .with_title("Fox Hollow")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

    let window = std::sync::Arc::new(event_loop.create_window(window_attributes).unwrap());

    let mut state = pollster::block_on(State::new(window.clone()));

    event_loop
        .run(move |event, control_flow| {
            match event {
                WinitEvent::WindowEvent {
                    ref event,
                    window_id,
                } if window_id == window.id() => {
                    state.input.process_window_event(event);
                    let egui_response = state.hud.handle_window_event(&window, event);
                    if egui_response.consumed {
                        return;
                    }

                    match event {
                        WindowEvent::CloseRequested => control_flow.exit(),
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    state: ElementState::Pressed,
                                    physical_key: PhysicalKey::Code(key),
                                    ..
                                },
                            ..
                        } => match key {
                            KeyCode::Escape => control_flow.exit(),
                            KeyCode::F3 => state.hud.toggle_stats(),
                            _ => {}
                        },
                        WindowEvent::Resized(physical_size) => {
                            state.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            state.update(&window);
                            match state.render(&window) {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => control_flow.exit(),
                                Err(e) => eprintln!("{:?}", e),
                            }
                            state.input.end_frame();
                        }
                        _ => {}
                    }
                }
                WinitEvent::DeviceEvent { ref event, .. } => {
                    state.input.process_device_event(event);
                }
                WinitEvent::AboutToWait => {
                    window.request_redraw();
                }
                _ => {}
            }
        })
        .unwrap();
}
