use anyhow::{Context, Result, anyhow};
use eframe::egui::{Color32, Vec2};
use tracing::{debug, info};

use crate::layout::{DEFAULT_ITERATIONS, Positions, force_layout};
use crate::model::MetabolicModel;

use super::graph::{BipartiteGraph, NodeKind};
use super::scale::{WidthRange, scale_fluxes};
use super::select::select_nodes;

pub const REACTION_COLOR: Color32 = Color32::from_rgb(31, 119, 180);
pub const METABOLITE_COLOR: Color32 = Color32::from_rgb(255, 127, 14);
pub const OUTLINE_COLOR: Color32 = Color32::from_rgb(127, 127, 127);
pub const EDGE_COLOR: Color32 = Color32::BLACK;

#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub node_radius: f32,
    pub node_alpha: f32,
    pub outline_color: Color32,
    pub reaction_color: Color32,
    pub metabolite_color: Color32,
    pub label_size: f32,
    pub label_color: Color32,
    pub edge_width: f32,
    pub edge_color: Color32,
    pub curvature: f32,
    pub overlay_alpha: f32,
    pub overlay_color: Color32,
    pub widths: WidthRange,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            node_radius: 9.0,
            node_alpha: 0.9,
            outline_color: OUTLINE_COLOR,
            reaction_color: REACTION_COLOR,
            metabolite_color: METABOLITE_COLOR,
            label_size: 10.0,
            label_color: Color32::WHITE,
            edge_width: 1.0,
            edge_color: EDGE_COLOR,
            curvature: 0.2,
            overlay_alpha: 0.5,
            overlay_color: REACTION_COLOR,
            widths: WidthRange::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeBatch {
    pub kind: NodeKind,
    pub nodes: Vec<(String, Vec2)>,
    pub fill: Color32,
    pub outline: Color32,
    pub radius: f32,
    pub alpha: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelBatch {
    pub labels: Vec<(String, Vec2)>,
    pub size: f32,
    pub color: Color32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeBatch {
    pub reaction: Option<String>,
    pub edges: Vec<(Vec2, Vec2)>,
    pub width: f32,
    pub alpha: f32,
    pub color: Color32,
    pub curvature: f32,
    pub arrows: bool,
}

pub trait Canvas {
    fn draw_nodes(&mut self, batch: NodeBatch);
    fn draw_labels(&mut self, batch: LabelBatch);
    fn draw_edges(&mut self, batch: EdgeBatch);
    fn finish(&mut self);
}

type LayoutFn<'a> = dyn Fn(&BipartiteGraph) -> Positions + 'a;

#[derive(Default)]
pub struct PlotRequest<'a> {
    pub reactions: Vec<String>,
    pub omit: Vec<String>,
    layout: Option<Box<LayoutFn<'a>>>,
}

impl<'a> PlotRequest<'a> {
    pub fn with_reactions(mut self, reactions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.reactions = reactions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_omitted(mut self, omit: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.omit = omit.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_layout(mut self, layout: impl Fn(&BipartiteGraph) -> Positions + 'a) -> Self {
        self.layout = Some(Box::new(layout));
        self
    }

    fn positions(&self, view: &BipartiteGraph) -> Positions {
        match &self.layout {
            Some(layout) => layout(view),
            None => force_layout(view, DEFAULT_ITERATIONS),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlotSummary {
    pub reactions: usize,
    pub metabolites: usize,
    pub edges: usize,
    pub overlays: usize,
    pub objective_value: Option<f64>,
}

pub struct NetPlotter<M> {
    model: M,
    graph: BipartiteGraph,
    style: PlotStyle,
}

impl<M: MetabolicModel> NetPlotter<M> {
    pub fn new(model: M) -> Self {
        let graph = BipartiteGraph::from_model(&model);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built reaction network"
        );
        Self {
            model,
            graph,
            style: PlotStyle::default(),
        }
    }

    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    pub fn graph(&self) -> &BipartiteGraph {
        &self.graph
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn plot(&self, request: &PlotRequest<'_>, canvas: &mut impl Canvas) -> Result<PlotSummary> {
        let selection = select_nodes(&self.graph, &self.model, &request.reactions, &request.omit);
        let view = &selection.view;
        let positions = request.positions(view);
        let at = |id: &str| {
            positions
                .get(id)
                .copied()
                .ok_or_else(|| anyhow!("layout produced no position for node `{id}`"))
        };

        let style = &self.style;
        for (kind, ids, fill) in [
            (NodeKind::Reaction, &selection.reactions, style.reaction_color),
            (NodeKind::Metabolite, &selection.metabolites, style.metabolite_color),
        ] {
            let nodes = ids
                .iter()
                .map(|id| Ok((id.clone(), at(id)?)))
                .collect::<Result<Vec<_>>>()?;
            canvas.draw_nodes(NodeBatch {
                kind,
                nodes,
                fill,
                outline: style.outline_color,
                radius: style.node_radius,
                alpha: style.node_alpha,
            });
        }

        let labels = view
            .nodes()
            .map(|(id, _)| Ok((id.to_owned(), at(id)?)))
            .collect::<Result<Vec<_>>>()?;
        canvas.draw_labels(LabelBatch {
            labels,
            size: style.label_size,
            color: style.label_color,
        });

        let structural = view
            .edges()
            .map(|(from, to)| Ok((at(from)?, at(to)?)))
            .collect::<Result<Vec<_>>>()?;
        canvas.draw_edges(EdgeBatch {
            reaction: None,
            edges: structural,
            width: style.edge_width,
            alpha: 1.0,
            color: style.edge_color,
            curvature: style.curvature,
            arrows: true,
        });

        let solution = self.model.optimize().context("failed to solve model fluxes")?;
        let fluxes = selection.reactions.iter().filter_map(|id| {
            let flux = solution.flux(id);
            if flux.is_none() {
                debug!(reaction = %id, "no flux in solution");
            }
            Some((id.as_str(), flux?))
        });
        let widths = scale_fluxes(fluxes, style.widths);

        for (reaction_id, width) in &widths {
            let edges = view
                .incident_edges(reaction_id)
                .map(|(from, to)| Ok((at(from)?, at(to)?)))
                .collect::<Result<Vec<_>>>()?;
            canvas.draw_edges(EdgeBatch {
                reaction: Some(reaction_id.clone()),
                edges,
                width: *width,
                alpha: style.overlay_alpha,
                color: style.overlay_color,
                curvature: style.curvature,
                arrows: false,
            });
        }

        canvas.finish();

        let summary = PlotSummary {
            reactions: selection.reactions.len(),
            metabolites: selection.metabolites.len(),
            edges: view.edge_count(),
            overlays: widths.len(),
            objective_value: solution.objective_value,
        };
        info!(
            reactions = summary.reactions,
            metabolites = summary.metabolites,
            edges = summary.edges,
            overlays = summary.overlays,
            "plotted reaction network"
        );
        Ok(summary)
    }
}
