use eframe::egui::{Pos2, Rect, Vec2};

use super::render::{Canvas, EdgeBatch, LabelBatch, NodeBatch};

#[derive(Clone, Debug)]
pub struct Scene {
    pub nodes: Vec<NodeBatch>,
    pub labels: Vec<LabelBatch>,
    pub edges: Vec<EdgeBatch>,
    bounds: Rect,
    finished: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            labels: Vec::new(),
            edges: Vec::new(),
            bounds: Rect::NOTHING,
            finished: false,
        }
    }
}

impl Scene {
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn bounds(&self) -> Option<Rect> {
        if !self.bounds.is_finite() {
            return None;
        }
        if self.bounds.is_positive() {
            Some(self.bounds)
        } else {
            Some(self.bounds.expand(1.0))
        }
    }

    pub fn structural_edges(&self) -> impl Iterator<Item = &EdgeBatch> {
        self.edges.iter().filter(|batch| batch.reaction.is_none())
    }

    pub fn overlay_edges(&self) -> impl Iterator<Item = &EdgeBatch> {
        self.edges.iter().filter(|batch| batch.reaction.is_some())
    }

    fn include(&mut self, point: Vec2) {
        self.bounds.extend_with(Pos2::new(point.x, point.y));
    }
}

impl Canvas for Scene {
    fn draw_nodes(&mut self, batch: NodeBatch) {
        for (_, position) in &batch.nodes {
            self.include(*position);
        }
        self.nodes.push(batch);
    }

    fn draw_labels(&mut self, batch: LabelBatch) {
        self.labels.push(batch);
    }

    fn draw_edges(&mut self, batch: EdgeBatch) {
        for (from, to) in &batch.edges {
            self.include(*from);
            self.include(*to);
        }
        self.edges.push(batch);
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}
