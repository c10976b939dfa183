//! grassfield - a million procedurally generated grass blades on a sphere.

mod config;
mod events;
mod scene;

use anyhow::Result;
use config::ViewerConfig;
use scene::SceneComposer;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

#[derive(Default)]
struct App {
    scene: Option<SceneComposer>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.scene.is_none() {
            let config = ViewerConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title("grassfield")
                .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(SceneComposer::new(window.clone(), &config)) {
                Ok(scene) => {
                    self.scene = Some(scene);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize scene: {:#}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(scene) = &mut self.scene {
            if scene.handle_window_event(event) || !scene.running {
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("grassfield");
    println!("  Left drag    - orbit");
    println!("  Right drag   - pan");
    println!("  Scroll       - zoom");
    println!("  Escape       - quit");

    let event_loop = EventLoop::new()?;
    // Redraw continuously; the grass animates every frame.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::default();
    event_loop.run_app(&mut app)?;

    Ok(())
}
