//! Application state: owns the scene, the UI and the sync channel ends.

use crate::{
    draw,
    gfx::GfxContext,
    panels::{self, PanelState},
    sync::{SyncEvent, SyncHandle},
};
use anyhow::Result;
use scene::{Animator, SceneState};
use std::sync::Arc;
use winit::{event::WindowEvent, window::Window};

pub struct App {
    pub gfx: GfxContext,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    scene: SceneState,
    animator: Animator,
    sync: SyncHandle,
    panels: PanelState,
}

impl App {
    pub async fn new(window: Arc<Window>, sync: SyncHandle) -> Result<Self> {
        let gfx = GfxContext::new(window.clone()).await?;

        let egui_ctx = egui::Context::default();
        egui_ctx.set_visuals(egui::Visuals::dark());
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        Ok(Self {
            gfx,
            egui_ctx,
            egui_state,
            scene: SceneState::default(),
            animator: Animator::default(),
            sync,
            panels: PanelState::default(),
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gfx.resize(new_size);
    }

    /// Forwards window events to egui; returns true when egui consumed one.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        if response.consumed {
            return true;
        }

        if let WindowEvent::Resized(physical_size) = event {
            self.resize(*physical_size);
        }

        false
    }

    /// One frame: merge pending sync results, advance every agent's progress,
    /// rebuild the UI and present.
    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        self.drain_sync_events();
        self.animator.tick(&mut self.scene);

        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        panels::side_panel(
            &self.egui_ctx,
            &mut self.panels,
            &self.scene,
            &self.sync.commands,
        );
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(&self.egui_ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::hover());
                draw::draw_scene(&painter, response.rect, &self.scene);
            });

        let egui::FullOutput {
            platform_output,
            textures_delta,
            shapes,
            pixels_per_point,
            ..
        } = self.egui_ctx.end_frame();
        self.egui_state.handle_platform_output(window, platform_output);

        let primitives = self.egui_ctx.tessellate(shapes, pixels_per_point);
        self.gfx.render(&primitives, &textures_delta, pixels_per_point)
    }

    /// Applies everything the sync thread produced since the last frame.
    /// Updates arrive as complete values and replace whole fields, so the
    /// renderer never sees a partial merge.
    fn drain_sync_events(&mut self) {
        while let Ok(event) = self.sync.events.try_recv() {
            match event {
                SyncEvent::Warehouse(warehouse) => self.scene.warehouse = Some(warehouse),
                SyncEvent::Products(products) => self.scene.products = products,
                SyncEvent::Agents(agents) => self.scene.agents = agents,
                SyncEvent::Update(update) => self.scene.merge_poll(update),
                SyncEvent::OrderAccepted { order_id, update } => {
                    self.scene.merge_order_ack(update);
                    self.panels
                        .notify_success(format!("Order {order_id} created."));
                }
                SyncEvent::OrderRejected(reason) => self.panels.notify_error(reason),
            }
        }
    }
}
