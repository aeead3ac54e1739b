use egui_wgpu::wgpu;
use egui_winit::winit::{self, event::{Event, WindowEvent}, event_loop::EventLoop, window::Window};
use std::sync::Arc;
use egui_wgpu::Renderer as EguiRenderer;
use egui_winit::State as EguiState;
use image::GrayImage;

use crate::edges::Thresholds;
use crate::error::{Result, TracerError};
use crate::gui::{menu::{populate_preview, populate_threshold_menu, read_key_command, KeyCommand}, pipeline::EdgePreview};
use crate::session::{run_draw_pass, transition, DrawParams, Stage};

pub const WINDOW_TITLE: &str = "Image Tracer - Preview";

/// Startup settings for the preview window and the draw pass.
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct AppConfig {
    pub thresholds: Thresholds,
    pub draw: DrawParams,
}

// This struct manages all the wgpu-related state.
struct RenderState {
    _window: Arc<Window>, // Store the Arc to keep the window alive
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl RenderState {
    async fn new(_window: Arc<Window>) -> Result<Self> {
        let size = _window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(_window.clone())
            .map_err(|e| TracerError::Gui(format!("could not create surface: {e}")))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| TracerError::Gui("no compatible graphics adapter".into()))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .map_err(|e| TracerError::Gui(format!("could not open graphics device: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps.formats.iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| TracerError::Gui("surface reports no texture formats".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            _window,
            surface,
            device,
            queue,
            config,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }
}

/// Everything the preview loop owns. The draw pass only borrows the mask.
pub struct AppState {
    pub stage: Stage,
    pub preview: EdgePreview,
    // Slider positions; the preview's thresholds follow them via events.
    pub slider_thresholds: Thresholds,
    pub preview_texture: Option<egui::TextureHandle>,
    texture_dirty: bool,
    draw_requested: bool,
    draw_params: DrawParams,
}

impl AppState {
    pub fn new(source: GrayImage, config: &AppConfig) -> Self {
        Self {
            stage: Stage::ImageLoaded,
            preview: EdgePreview::new(source, config.thresholds),
            slider_thresholds: config.thresholds,
            preview_texture: None,
            texture_dirty: true,
            draw_requested: false,
            draw_params: config.draw,
        }
    }

    /// Uploads the mask to the GPU if it changed since the last upload.
    fn sync_texture(&mut self, ctx: &egui::Context) {
        if !self.texture_dirty {
            return;
        }
        let image = self.preview.mask().to_color_image();
        match &mut self.preview_texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.preview_texture = Some(ctx.load_texture("edge_mask", image, egui::TextureOptions::NEAREST));
            }
        }
        self.texture_dirty = false;
    }

    /// Blocks until region capture and replay finish, then resumes the preview.
    fn run_requested_draw(&mut self) {
        self.draw_requested = false;
        let stage = &mut self.stage;
        let result = run_draw_pass(self.preview.mask(), &self.draw_params, |next| transition(stage, next));
        if let Err(e) = result {
            log::error!("Drawing aborted: {e}");
        }
        transition(&mut self.stage, Stage::PreviewLoop);
    }
}


pub async fn run_app(source: GrayImage, config: AppConfig) -> Result<()> {
    // --- Basic Setup ---
    let event_loop = EventLoop::new()
        .map_err(|e| TracerError::Gui(format!("could not create event loop: {e}")))?;
    let window = Arc::new(winit::window::WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(winit::dpi::LogicalSize::new(760, 520))
        .build(&event_loop)
        .map_err(|e| TracerError::Gui(format!("could not open window: {e}")))?);

    // --- State Initialization ---
    let mut render_state = RenderState::new(Arc::clone(&window)).await?;
    let mut app_state = AppState::new(source, &config);
    transition(&mut app_state.stage, Stage::PreviewLoop);

    // --- Egui Setup ---
    let egui_ctx = egui::Context::default();
    let mut egui_state = EguiState::new(
        egui_ctx.clone(),
        egui::ViewportId::ROOT,
        &window,
        None,
        None,
    );
    let mut egui_renderer = EguiRenderer::new(
        &render_state.device,
        render_state.config.format,
        None, // No depth buffer
        1,    // msaa_samples
    );

    // --- Event Loop ---
    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                let response = egui_state.on_window_event(&window, &event);
                if response.consumed {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => {
                        transition(&mut app_state.stage, Stage::Exit);
                        elwt.exit();
                    }
                    WindowEvent::Resized(physical_size) => {
                        render_state.resize(physical_size);
                    }
                    WindowEvent::RedrawRequested => {
                        // --- Egui Frame ---
                        let raw_input = egui_state.take_egui_input(&window);
                        egui_ctx.begin_frame(raw_input);

                        match read_key_command(&egui_ctx) {
                            Some(KeyCommand::Quit) => {
                                transition(&mut app_state.stage, Stage::Exit);
                                elwt.exit();
                            }
                            Some(KeyCommand::Draw) => app_state.draw_requested = true,
                            None => {}
                        }

                        egui::SidePanel::right("controls_panel").show(&egui_ctx, |ui| {
                            if let Some(change) = populate_threshold_menu(&mut app_state, ui) {
                                app_state.preview.apply(change);
                                app_state.texture_dirty = true;
                            }
                        });

                        app_state.sync_texture(&egui_ctx);

                        egui::CentralPanel::default()
                            .show(&egui_ctx, |ui| {
                                populate_preview(&app_state, ui);
                            });

                        let egui_output = egui_ctx.end_frame();
                        egui_state.handle_platform_output(
                            &window,
                            egui_output.platform_output
                        );

                        // Texture updates have to land before tessellating.
                        for (id, image_delta) in &egui_output.textures_delta.set {
                            egui_renderer.update_texture(
                                &render_state.device,
                                &render_state.queue,
                                *id,
                                image_delta
                            );
                        }

                        let paint_jobs = egui_ctx.tessellate(
                            egui_output.shapes,
                            window.scale_factor() as f32
                        );

                        for id in &egui_output.textures_delta.free {
                            egui_renderer.free_texture(id);
                        }

                        // --- Get Surface Texture for Drawing ---
                        let output_frame = match render_state.surface.get_current_texture() {
                            Ok(frame) => frame,
                            Err(e) => {
                                log::warn!("Dropped frame: {:?}", e);
                                render_state.resize(window.inner_size());
                                return;
                            }
                        };
                        let output_view = output_frame.texture.create_view(
                            &wgpu::TextureViewDescriptor::default()
                        );

                        // --- Record Rendering Commands ---
                        let mut encoder = render_state.device.create_command_encoder(
                            &wgpu::CommandEncoderDescriptor::default()
                        );
                        let screen_descriptor = egui_wgpu::ScreenDescriptor {
                            size_in_pixels: [render_state.config.width, render_state.config.height],
                            pixels_per_point: window.scale_factor() as f32,
                        };

                        let egui_commands = egui_renderer.update_buffers(
                            &render_state.device,
                            &render_state.queue,
                            &mut encoder,
                            &paint_jobs,
                            &screen_descriptor
                        );
                        {
                            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                                label: Some("Preview Pass"),
                                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                    view: &output_view,
                                    resolve_target: None,
                                    ops: wgpu::Operations {
                                        load: wgpu::LoadOp::Clear(
                                            wgpu::Color { r: 0.1, g: 0.1, b: 0.12, a: 1.0 }
                                        ),
                                        store: wgpu::StoreOp::Store
                                    },
                                })],
                                depth_stencil_attachment: None,
                                timestamp_writes: None,
                                occlusion_query_set: None,
                            });
                            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
                        }

                        // --- Submit and Present ---
                        render_state.queue.submit(
                            egui_commands.into_iter().chain(std::iter::once(encoder.finish()))
                        );
                        output_frame.present();

                        // The draw pass blocks this loop until it is done.
                        if app_state.draw_requested && app_state.stage != Stage::Exit {
                            app_state.run_requested_draw();
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                window.request_redraw();
            }
            _ => (),
        }
    })
    .map_err(|e| TracerError::Gui(format!("event loop failed: {e}")))
}
