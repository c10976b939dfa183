//! Scene composition: owns the renderer, camera, controls, ground, grass field
//! and the animated time uniform, and drives one frame per redraw.

use crate::config::ViewerConfig;
use anyhow::{Context, Result};
use engine_core::{FpsMeter, FpsSample, ShaderClock, Time};
use glam::Vec2;
use input::InputState;
use procgen::{FieldBuffer, TextureData, TextureGenerator};
use renderer::{GrassField, GrassMaterial, Ground, OrbitCamera, Renderer, ShaderSources, Texture};
use std::path::Path;
use std::sync::Arc;
use winit::window::Window;

const FALLBACK_TEXTURE_SIZE: u32 = 512;
const WINDOW_TITLE: &str = "grassfield";

/// Everything needed to draw the field. Built once by the app; geometry is
/// never rebuilt after construction, only the time uniform and camera change.
pub struct SceneComposer {
    pub(crate) renderer: Renderer,
    pub(crate) camera: OrbitCamera,
    pub(crate) input: InputState,
    pub(crate) running: bool,

    time: Time,
    clock: ShaderClock,
    fps: FpsMeter,

    ground: Ground,
    grass: GrassField,
    material: GrassMaterial,
}

impl SceneComposer {
    pub async fn new(window: Arc<Window>, config: &ViewerConfig) -> Result<Self> {
        // Build the field before touching the GPU so bad parameters fail fast.
        let field = FieldBuffer::generate(&config.field, config.seed)
            .context("Invalid grass field configuration")?;

        let renderer = Renderer::new(window, &ShaderSources::default(), config.vsync).await?;

        let generator = TextureGenerator::new(config.seed.unwrap_or_default());
        let ground_texture = load_or_generate(&renderer, config.ground_texture.as_deref(), "Ground", || {
            generator.generate_ground(FALLBACK_TEXTURE_SIZE, FALLBACK_TEXTURE_SIZE)
        });
        let grass_texture = load_or_generate(&renderer, config.grass_texture.as_deref(), "Grass", || {
            generator.generate_grass(FALLBACK_TEXTURE_SIZE, FALLBACK_TEXTURE_SIZE)
        });

        let ground = renderer.create_ground(
            config.ground_radius,
            config.ground_segments,
            config.ground_rings,
            &ground_texture,
        );
        let material = renderer.create_grass_material(&grass_texture);
        let grass = renderer
            .upload_grass(&field)
            .context("Grass field does not fit on this device")?;

        let mut camera = OrbitCamera::new(config.camera_distance, config.camera_fov);
        let (width, height) = renderer.dimensions();
        camera.set_aspect(width, height);

        log::info!(
            "Scene ready: {} blades ({} vertices), time accumulation {:?}",
            grass.blade_count,
            grass.vertex_count,
            config.time_accumulation
        );

        Ok(Self {
            renderer,
            camera,
            input: InputState::new(),
            running: true,
            time: Time::new(),
            clock: ShaderClock::new(config.time_accumulation),
            fps: FpsMeter::default(),
            ground,
            grass,
            material,
        })
    }

    /// Per-frame step: advance the clock, write the time uniform, apply the
    /// orbit controls.
    pub fn tick(&mut self) {
        self.time.update();
        self.input.begin_frame();

        let orbit = self.input.orbit_drag();
        if orbit != Vec2::ZERO {
            self.camera.rotate(orbit);
        }
        let pan = self.input.pan_drag();
        if pan != Vec2::ZERO {
            self.camera.pan(pan);
        }
        let scroll = self.input.scroll();
        if scroll != 0.0 {
            self.camera.zoom(scroll);
        }
        self.renderer.update_camera(&self.camera);

        let time = self.clock.advance(&self.time);
        self.set_time_uniform(time);

        if let Some(sample) = self.fps.record(self.time.delta()) {
            self.show_fps(sample);
        }
    }

    /// Draw the full scene from the current camera pose.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let (output, mut encoder) = self.renderer.begin_frame()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.renderer
            .render_scene(&mut encoder, &view, self.ground(), self.grass(), self.material());
        self.renderer.end_frame(output, encoder);
        Ok(())
    }

    /// Viewport change: surface, depth buffer and projection only. Zero
    /// sizes (minimised window) are ignored.
    pub fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.renderer.resize(size);
        self.camera.set_aspect(size.width, size.height);
    }

    /// Current value of the grass time uniform.
    pub fn time_uniform(&self) -> f32 {
        self.material.time()
    }

    /// Write the grass time uniform. The next `tick` overwrites it with the
    /// accumulated clock value.
    pub fn set_time_uniform(&mut self, time: f32) {
        self.material.set_time(self.renderer.queue(), time);
    }

    /// The grass material: texture, time uniform and bind group.
    pub fn material(&self) -> &GrassMaterial {
        &self.material
    }

    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    pub fn grass(&self) -> &GrassField {
        &self.grass
    }

    fn show_fps(&self, sample: FpsSample) {
        let title = format!(
            "{} | {:.0} fps | {:.1} ms",
            WINDOW_TITLE, sample.fps, sample.frame_ms
        );
        log::debug!("{} | time uniform {:.2}", title, self.time_uniform());
        self.renderer.window.set_title(&title);
    }
}

/// Load `path` if configured, falling back to a generated texture.
fn load_or_generate<F>(renderer: &Renderer, path: Option<&Path>, label: &str, generate: F) -> Texture
where
    F: FnOnce() -> TextureData,
{
    if let Some(path) = path {
        match renderer.load_texture(path) {
            Ok(texture) => return texture,
            Err(e) => log::warn!("{} texture unavailable ({}), using procedural texture", label, e),
        }
    }

    let data = generate();
    log::info!("Generated {}x{} procedural {} texture", data.width, data.height, label.to_lowercase());
    renderer.texture_from_rgba(&data.to_bytes(), data.width, data.height, label)
}
