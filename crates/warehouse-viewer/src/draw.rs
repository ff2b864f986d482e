//! Scene rendering: the static warehouse layer and the animated agent layer.
//!
//! Rendering is a pure function of the scene state and the panel rect; it is
//! re-invoked every frame and draws nothing until the warehouse has loaded.

use egui::{pos2, vec2, Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke};
use scene::{route_position, AgentKind, GridMapper, SceneState, Warehouse, FLOOR_LABEL_MARGIN};

/// Translucent wash behind the grid.
const BACKGROUND_WASH: Color32 = Color32::from_black_alpha(64);
const GRID_LINE: Color32 = Color32::from_rgba_premultiplied(20, 20, 20, 20);
const FLOOR_LABEL: Color32 = Color32::from_rgba_premultiplied(217, 217, 217, 217);
const PRODUCT_DOT: Color32 = Color32::from_rgba_premultiplied(51, 51, 51, 51);
const ENTRY_OUTLINE: Color32 = Color32::from_rgb(0x7a, 0xa2, 0xf7);
const AGENT_OUTLINE: Color32 = Color32::from_black_alpha(128);
const AGENT_LABEL: Color32 = Color32::from_rgb(0x1a, 0x1b, 0x26);

const ZONE_FALLBACK: Color32 = Color32::from_rgb(0x66, 0x66, 0x66);
const ROBOT_COLOR: Color32 = Color32::from_rgb(0x7d, 0xcf, 0xff);
const HUMAN_COLOR: Color32 = Color32::from_rgb(0xbb, 0x9a, 0xf7);
const CART_COLOR: Color32 = Color32::from_rgb(0x9e, 0xce, 0x6a);
/// Override while a human is transiting between floors.
const HUMAN_FLOOR_COLOR: Color32 = Color32::from_rgb(0xff, 0x9e, 0x64);

/// Fixed zone palette; identifiers outside the table get the gray fallback.
pub fn zone_color(zone_id: &str) -> Color32 {
    match zone_id {
        "A" => Color32::from_rgb(0x34, 0x98, 0xdb),
        "B" => Color32::from_rgb(0x2e, 0xcc, 0x71),
        "C" => Color32::from_rgb(0xe7, 0x4c, 0x3c),
        "D" => Color32::from_rgb(0x9b, 0x59, 0xb6),
        "E" => Color32::from_rgb(0xf3, 0x9c, 0x12),
        _ => ZONE_FALLBACK,
    }
}

/// Agent disc color; unknown kinds fall back to the robot blue, and only a
/// human mid floor change gets the transition override.
pub fn agent_fill_color(kind: AgentKind, vertical_segment: bool) -> Color32 {
    match kind {
        AgentKind::Human if vertical_segment => HUMAN_FLOOR_COLOR,
        AgentKind::Human => HUMAN_COLOR,
        AgentKind::Cart => CART_COLOR,
        AgentKind::Robot | AgentKind::Unknown => ROBOT_COLOR,
    }
}

/// Draws the full scene into `rect`. A missing warehouse skips the frame —
/// the animation loop keeps running and picks the data up once it arrives.
pub fn draw_scene(painter: &Painter, rect: Rect, scene: &SceneState) {
    let Some(warehouse) = &scene.warehouse else {
        return;
    };
    let mapper = GridMapper::fit(rect.width(), rect.height(), warehouse.width, warehouse.height);
    draw_base(painter, rect, &mapper, warehouse, scene);
    draw_agents(painter, rect, &mapper, warehouse, scene);
}

fn to_screen(rect: Rect, mapper: &GridMapper, grid_x: f32, grid_y: f32) -> Pos2 {
    let (x, y) = mapper.to_screen(grid_x, grid_y);
    rect.min + vec2(x, y)
}

/// Static layer: wash, floor labels, grid lines, zones, products, entry.
fn draw_base(
    painter: &Painter,
    rect: Rect,
    mapper: &GridMapper,
    warehouse: &Warehouse,
    scene: &SceneState,
) {
    let scale = mapper.scale;
    let width = warehouse.width;
    let height = warehouse.height;

    // Extent actually covered by the margin plus the (w+1) x (h+1) grid.
    let grid_right = rect.left() + FLOOR_LABEL_MARGIN + (width + 1) as f32 * scale;
    let grid_bottom = rect.top() + (height + 1) as f32 * scale;
    let canvas = Rect::from_min_max(rect.min, pos2(grid_right, grid_bottom));

    painter.rect_filled(canvas, 0.0, BACKGROUND_WASH);

    // Floor labels: one per grid row, ground floor at row 0.
    let label_font = FontId::monospace((scale * 0.5).clamp(10.0, 14.0));
    for row in 0..height {
        let label = if row == 0 {
            "Ground".to_owned()
        } else {
            format!("Floor {row}")
        };
        let center = pos2(
            rect.left() + FLOOR_LABEL_MARGIN / 2.0,
            to_screen(rect, mapper, 0.0, row as f32 + 0.5).y,
        );
        painter.text(center, Align2::CENTER_CENTER, label, label_font.clone(), FLOOR_LABEL);
    }

    let grid_stroke = Stroke::new(1.0, GRID_LINE);
    for col in 0..=width {
        let x = to_screen(rect, mapper, col as f32, 0.0).x;
        painter.line_segment([pos2(x, rect.top()), pos2(x, grid_bottom)], grid_stroke);
    }
    for row in 0..=height {
        let y = to_screen(rect, mapper, 0.0, row as f32).y;
        painter.line_segment(
            [pos2(rect.left() + FLOOR_LABEL_MARGIN, y), pos2(grid_right, y)],
            grid_stroke,
        );
    }

    // Zones: translucent disc per cell plus an outlined square.
    for (zone_id, zone) in &warehouse.zones {
        let color = zone_color(zone_id);
        for cell in &zone.cells {
            let center = to_screen(rect, mapper, cell.x as f32 + 0.5, cell.y as f32 + 0.5);
            painter.circle_filled(center, scale * 0.45, color.gamma_multiply(0.35));
        }
        let stroke = Stroke::new(2.0, color);
        for cell in &zone.cells {
            let center = to_screen(rect, mapper, cell.x as f32 + 0.5, cell.y as f32 + 0.5);
            painter.rect_stroke(
                Rect::from_center_size(center, vec2(scale * 0.8, scale * 0.8)),
                0.0,
                stroke,
            );
        }
    }

    // Product slots.
    let dot_radius = (scale * 0.15).max(2.0);
    for product in &scene.products {
        let center = to_screen(
            rect,
            mapper,
            product.location.x as f32 + 0.5,
            product.location.y as f32 + 0.5,
        );
        painter.circle_filled(center, dot_radius, PRODUCT_DOT);
    }

    // Entry point marker.
    let entry = to_screen(
        rect,
        mapper,
        warehouse.entry.x as f32 + 0.5,
        warehouse.entry.y as f32 + 0.5,
    );
    painter.add(Shape::convex_polygon(
        vec![
            pos2(entry.x, entry.y - scale * 0.4),
            pos2(entry.x + scale * 0.35, entry.y + scale * 0.35),
            pos2(entry.x - scale * 0.35, entry.y + scale * 0.35),
        ],
        Color32::WHITE,
        Stroke::new(2.0, ENTRY_OUTLINE),
    ));
}

/// Dynamic layer: every agent at its interpolated position, drawn on top.
fn draw_agents(
    painter: &Painter,
    rect: Rect,
    mapper: &GridMapper,
    warehouse: &Warehouse,
    scene: &SceneState,
) {
    let scale = mapper.scale;
    let label_font = FontId::monospace((scale * 0.25).max(8.0));

    for agent in &scene.agents {
        let progress = scene.progress.get(&agent.id).copied().unwrap_or(0.0);
        let position = scene
            .routes
            .get(&agent.id)
            .and_then(|route| route_position(route, progress, agent.kind.allows_vertical_motion()));

        // An agent without a route idles at the entry point.
        let (grid_x, grid_y, vertical) = match position {
            Some(p) => (p.x, p.y, p.vertical_segment),
            None => (
                warehouse.entry.x as f32 + 0.5,
                warehouse.entry.y as f32 + 0.5,
                false,
            ),
        };

        let center = to_screen(rect, mapper, grid_x, grid_y);
        painter.circle(
            center,
            scale * 0.35,
            agent_fill_color(agent.kind, vertical),
            Stroke::new(2.0, AGENT_OUTLINE),
        );
        painter.text(
            center,
            Align2::CENTER_CENTER,
            &agent.id,
            label_font.clone(),
            AGENT_LABEL,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_zone_uses_fallback_color() {
        assert_eq!(zone_color("Z"), ZONE_FALLBACK);
        assert_ne!(zone_color("A"), ZONE_FALLBACK);
    }

    #[test]
    fn zone_palette_is_total() {
        for id in ["A", "B", "C", "D", "E", "F", "", "mezzanine"] {
            // Any identifier maps to some opaque color.
            assert_eq!(zone_color(id).a(), 255);
        }
    }

    #[test]
    fn agent_colors_by_kind() {
        assert_eq!(agent_fill_color(AgentKind::Robot, false), ROBOT_COLOR);
        assert_eq!(agent_fill_color(AgentKind::Cart, false), CART_COLOR);
        assert_eq!(agent_fill_color(AgentKind::Human, false), HUMAN_COLOR);
        // Unknown kinds fall back to the robot blue.
        assert_eq!(agent_fill_color(AgentKind::Unknown, false), ROBOT_COLOR);
    }

    #[test]
    fn floor_transition_override_is_human_only() {
        assert_eq!(agent_fill_color(AgentKind::Human, true), HUMAN_FLOOR_COLOR);
        assert_eq!(agent_fill_color(AgentKind::Robot, true), ROBOT_COLOR);
        assert_eq!(agent_fill_color(AgentKind::Unknown, true), ROBOT_COLOR);
    }
}
