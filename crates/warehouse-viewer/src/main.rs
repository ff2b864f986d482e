//! Entry point for the Warehouse Fulfillment Viewer.

use anyhow::Result;
use clap::Parser;
use std::{sync::Arc, time::Duration};
use warehouse_viewer::{app::App, config::Config, sync};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

fn main() -> Result<()> {
    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    log::info!("Connecting to allocation service at {}", config.service_url);

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Warehouse Fulfillment Viewer")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .build(&event_loop)?,
    );

    let sync_handle = sync::spawn(
        config.service_url.clone(),
        Duration::from_secs(config.poll_interval_secs.max(1)),
    )?;

    // Initialise the application (async → sync).
    let mut app = pollster::block_on(App::new(window.clone(), sync_handle))?;

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                if !app.handle_event(&window, &event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::KeyboardInput { event, .. } => {
                            if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                                elwt.exit();
                            }
                        }
                        WindowEvent::RedrawRequested => match app.render(&window) {
                            Ok(()) => {}
                            Err(wgpu::SurfaceError::Lost) => app.resize(app.gfx.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("WGPU out of memory – exiting.");
                                elwt.exit();
                            }
                            Err(e) => log::error!("Render error: {:?}", e),
                        },
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                // The animation loop never stops: one redraw per frame,
                // whether or not any data has arrived yet.
                window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
