//! Control panels: allocation method, statistics, order metrics, order form.

use crate::sync::SyncCommand;
use api::{AllocParams, OrderItemRequest, OrderRequest};
use egui::{Color32, ComboBox, Context, DragValue, Grid, RichText, ScrollArea, SidePanel, TextEdit};
use scene::SceneState;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

const SUCCESS_COLOR: Color32 = Color32::from_rgb(0x9e, 0xce, 0x6a);
const ERROR_COLOR: Color32 = Color32::from_rgb(0xf7, 0x76, 0x8e);
/// Success confirmations clear themselves; errors stay until the next action.
const MESSAGE_LIFETIME: Duration = Duration::from_secs(3);

pub struct ItemRow {
    pub product_id: String,
    pub quantity: u32,
}

impl Default for ItemRow {
    fn default() -> Self {
        Self {
            product_id: String::new(),
            quantity: 1,
        }
    }
}

struct Message {
    text: String,
    is_error: bool,
    shown_at: Instant,
}

/// UI-side state: form fields and the transient feedback message.
pub struct PanelState {
    pub alloc_method: String,
    pub received_time: String,
    pub deadline: String,
    pub priority: String,
    pub items: Vec<ItemRow>,
    message: Option<Message>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            alloc_method: "first_fit".into(),
            received_time: "12:00".into(),
            deadline: "18:00".into(),
            priority: "standard".into(),
            items: vec![ItemRow::default()],
            message: None,
        }
    }
}

impl PanelState {
    pub fn alloc_params(&self) -> AllocParams {
        AllocParams {
            alloc: self.alloc_method.clone(),
            solver: "cbc".into(),
        }
    }

    pub fn notify_success(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: false,
            shown_at: Instant::now(),
        });
    }

    pub fn notify_error(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: true,
            shown_at: Instant::now(),
        });
    }

    fn expire_message(&mut self) {
        let expired = self
            .message
            .as_ref()
            .is_some_and(|m| !m.is_error && m.shown_at.elapsed() > MESSAGE_LIFETIME);
        if expired {
            self.message = None;
        }
    }
}

pub fn side_panel(
    ctx: &Context,
    state: &mut PanelState,
    scene: &SceneState,
    commands: &UnboundedSender<SyncCommand>,
) {
    state.expire_message();
    SidePanel::right("control-panel")
        .resizable(true)
        .default_width(340.0)
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                allocation_section(ui, state, commands);
                ui.separator();
                stats_section(ui, scene);
                ui.separator();
                orders_table(ui, scene);
                ui.separator();
                order_form(ui, state, scene, commands);
            });
        });
}

fn allocation_section(ui: &mut egui::Ui, state: &mut PanelState, commands: &UnboundedSender<SyncCommand>) {
    let previous = state.alloc_method.clone();
    ComboBox::from_label("Allocation method")
        .selected_text(method_label(&state.alloc_method))
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut state.alloc_method, "first_fit".into(), "First fit");
            ui.selectable_value(&mut state.alloc_method, "minizinc".into(), "MiniZinc");
        });
    if state.alloc_method != previous {
        send_command(commands, SyncCommand::Refresh(state.alloc_params()));
    }
}

fn method_label(method: &str) -> &str {
    match method {
        "minizinc" => "MiniZinc",
        _ => "First fit",
    }
}

fn stats_section(ui: &mut egui::Ui, scene: &SceneState) {
    let stats = &scene.stats;
    ui.heading("Fulfillment");
    Grid::new("stats-totals").num_columns(2).show(ui, |ui| {
        ui.label("Orders");
        ui.label(stats.n_orders.to_string());
        ui.end_row();
        ui.label("Assigned");
        ui.label(stats.n_assigned.to_string());
        ui.end_row();
        ui.label("Unassigned");
        ui.label(stats.n_unassigned.to_string());
        ui.end_row();
        ui.label("Total distance");
        ui.label(stats.total_distance.to_string());
        ui.end_row();
        ui.label("Total time (min)");
        ui.label(stats.total_time_min.to_string());
        ui.end_row();
        ui.label("Total cost (€)");
        ui.label(stats.total_cost_euros.to_string());
        ui.end_row();
    });

    if scene.stats.by_type.is_empty() {
        ui.label("No agents");
    } else {
        for (kind, breakdown) in &stats.by_type {
            ui.label(format!(
                "{}: {} orders / {} agent(s)",
                kind_label(kind),
                breakdown.orders,
                breakdown.count
            ));
        }
    }

    if let Some(warehouse) = &scene.warehouse {
        let legend = warehouse
            .zones
            .iter()
            .map(|(id, zone)| format!("{id} {}", zone.name))
            .collect::<Vec<_>>()
            .join(", ");
        ui.label(RichText::new(if legend.is_empty() {
            "Zones: —".to_owned()
        } else {
            format!("Zones: {legend}")
        })
        .weak());
    }
}

fn kind_label(kind: &str) -> &str {
    match kind {
        "robot" => "Robots",
        "human" => "Humans",
        "cart" => "Carts",
        other => other,
    }
}

fn orders_table(ui: &mut egui::Ui, scene: &SceneState) {
    ui.heading("Order metrics");
    if scene.orders_metrics.is_empty() {
        ui.label("No data");
        return;
    }
    Grid::new("orders-metrics")
        .num_columns(5)
        .striped(true)
        .show(ui, |ui| {
            ui.label(RichText::new("Order").strong());
            ui.label(RichText::new("Agent").strong());
            ui.label(RichText::new("Distance").strong());
            ui.label(RichText::new("Min").strong());
            ui.label(RichText::new("€").strong());
            ui.end_row();
            for metrics in &scene.orders_metrics {
                ui.label(metrics.order_id.as_str());
                ui.label(metrics.agent_id.as_deref().unwrap_or("—"));
                ui.label(metrics.distance.to_string());
                ui.label(metrics.time_min.to_string());
                ui.label(metrics.cost_euros.to_string());
                ui.end_row();
            }
        });
}

fn order_form(
    ui: &mut egui::Ui,
    state: &mut PanelState,
    scene: &SceneState,
    commands: &UnboundedSender<SyncCommand>,
) {
    ui.heading("New order");

    Grid::new("order-fields").num_columns(2).show(ui, |ui| {
        ui.label("Received");
        ui.add(TextEdit::singleline(&mut state.received_time).desired_width(64.0));
        ui.end_row();
        ui.label("Deadline");
        ui.add(TextEdit::singleline(&mut state.deadline).desired_width(64.0));
        ui.end_row();
        ui.label("Priority");
        ComboBox::from_id_source("order-priority")
            .selected_text(state.priority.clone())
            .show_ui(ui, |ui| {
                for priority in ["standard", "express", "urgent"] {
                    ui.selectable_value(&mut state.priority, priority.into(), priority);
                }
            });
        ui.end_row();
    });

    for (index, row) in state.items.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ComboBox::from_id_source(("order-item", index))
                .width(190.0)
                .selected_text(product_label(scene, &row.product_id))
                .show_ui(ui, |ui| {
                    for product in &scene.products {
                        ui.selectable_value(
                            &mut row.product_id,
                            product.id.clone(),
                            format!("{} — {}", product.id, truncated(&product.name, 30)),
                        );
                    }
                });
            ui.add(DragValue::new(&mut row.quantity).range(1..=99));
        });
    }

    ui.horizontal(|ui| {
        if ui.button("Add item").clicked() {
            state.items.push(ItemRow::default());
        }
        if ui.button("Submit order").clicked() {
            submit(state, commands);
        }
    });

    if let Some(message) = &state.message {
        let color = if message.is_error { ERROR_COLOR } else { SUCCESS_COLOR };
        ui.colored_label(color, message.text.as_str());
    }
}

fn product_label(scene: &SceneState, product_id: &str) -> String {
    if product_id.is_empty() {
        return "— pick a product —".into();
    }
    match scene.products.iter().find(|p| p.id == product_id) {
        Some(product) => format!("{} — {}", product.id, truncated(&product.name, 25)),
        None => product_id.to_owned(),
    }
}

fn truncated(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn submit(state: &mut PanelState, commands: &UnboundedSender<SyncCommand>) {
    let items: Vec<OrderItemRequest> = state
        .items
        .iter()
        .filter(|row| !row.product_id.is_empty())
        .map(|row| OrderItemRequest {
            product_id: row.product_id.clone(),
            quantity: row.quantity,
        })
        .collect();

    if items.is_empty() {
        state.notify_error("Add at least one product.".into());
        return;
    }

    let order = OrderRequest {
        params: state.alloc_params(),
        received_time: non_empty_or(&state.received_time, "12:00"),
        deadline: non_empty_or(&state.deadline, "18:00"),
        priority: non_empty_or(&state.priority, "standard"),
        items,
    };
    send_command(commands, SyncCommand::SubmitOrder(order));
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.into()
    } else {
        trimmed.into()
    }
}

fn send_command(commands: &UnboundedSender<SyncCommand>, command: SyncCommand) {
    if commands.send(command).is_err() {
        log::warn!("Sync thread is gone; command dropped");
    }
}
