use eframe::egui::epaint::QuadraticBezierShape;
use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2, vec2};

use crate::net::{EdgeBatch, NodeBatch, Scene};

const PADDING: f32 = 36.0;
const ARROW_LENGTH: f32 = 9.0;
const ARROW_HALF_WIDTH: f32 = 4.0;

#[derive(Clone, Copy, Debug)]
pub(super) struct FitTransform {
    world_center: Pos2,
    screen_center: Pos2,
    scale: f32,
}

impl FitTransform {
    pub(super) fn new(world: Rect, screen: Rect) -> Self {
        let available = (screen.size() - Vec2::splat(PADDING * 2.0)).max(Vec2::splat(1.0));
        let scale = (available.x / world.width().max(1.0)).min(available.y / world.height().max(1.0));
        Self {
            world_center: world.center(),
            screen_center: screen.center(),
            scale,
        }
    }

    pub(super) fn apply(self, world: Vec2) -> Pos2 {
        self.screen_center + (world - self.world_center.to_vec2()) * self.scale
    }
}

pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color32::from_rgba_unmultiplied(r, g, b, (a as f32 * alpha.clamp(0.0, 1.0)) as u8)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::WHITE);
}

fn control_point(start: Pos2, end: Pos2, curvature: f32) -> Pos2 {
    let delta = end - start;
    let middle = start + delta * 0.5;
    middle + vec2(delta.y, -delta.x) * curvature
}

fn toward(from: Pos2, to: Pos2, distance: f32) -> Pos2 {
    let delta = to - from;
    let length = delta.length();
    if length <= distance || length <= f32::EPSILON {
        from
    } else {
        from + delta / length * distance
    }
}

fn draw_edge(
    painter: &Painter,
    start: Pos2,
    end: Pos2,
    batch: &EdgeBatch,
    stroke: Stroke,
    node_radius: f32,
) {
    let control = control_point(start, end, batch.curvature);
    let start = toward(start, control, node_radius);
    let end = toward(end, control, node_radius);

    painter.add(QuadraticBezierShape::from_points_stroke(
        [start, control, end],
        false,
        Color32::TRANSPARENT,
        stroke,
    ));

    if batch.arrows {
        let direction = (end - control).normalized();
        if direction.length_sq() > 0.0 {
            let base = end - direction * ARROW_LENGTH;
            let normal = direction.rot90() * ARROW_HALF_WIDTH;
            painter.add(Shape::convex_polygon(
                vec![end, base + normal, base - normal],
                stroke.color,
                Stroke::NONE,
            ));
        }
    }
}

fn draw_edge_batch(painter: &Painter, transform: FitTransform, batch: &EdgeBatch, node_radius: f32) {
    let stroke = Stroke::new(batch.width, with_alpha(batch.color, batch.alpha));
    for (from, to) in &batch.edges {
        draw_edge(
            painter,
            transform.apply(*from),
            transform.apply(*to),
            batch,
            stroke,
            node_radius,
        );
    }
}

fn draw_node_batch(painter: &Painter, transform: FitTransform, batch: &NodeBatch) {
    let fill = with_alpha(batch.fill, batch.alpha);
    let outline = Stroke::new(1.0, with_alpha(batch.outline, batch.alpha));
    for (_, position) in &batch.nodes {
        painter.circle(transform.apply(*position), batch.radius, fill, outline);
    }
}

pub(super) fn paint_scene(painter: &Painter, rect: Rect, scene: &Scene) {
    draw_background(painter, rect);

    let Some(world) = scene.bounds() else {
        return;
    };
    let transform = FitTransform::new(world, rect);
    let node_radius = scene
        .nodes
        .iter()
        .map(|batch| batch.radius)
        .fold(0.0, f32::max);

    for batch in scene.structural_edges().chain(scene.overlay_edges()) {
        draw_edge_batch(painter, transform, batch, node_radius);
    }

    for batch in &scene.nodes {
        draw_node_batch(painter, transform, batch);
    }

    for batch in &scene.labels {
        for (text, position) in &batch.labels {
            painter.text(
                transform.apply(*position),
                Align2::CENTER_CENTER,
                text,
                FontId::proportional(batch.size),
                batch.color,
            );
        }
    }
}
