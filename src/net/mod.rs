mod graph;
mod render;
mod scale;
mod scene;
mod select;

pub use graph::BipartiteGraph;
#[cfg(test)]
pub use graph::NodeKind;
pub use render::{EdgeBatch, NetPlotter, NodeBatch, PlotRequest, PlotStyle, PlotSummary};
pub use scale::WidthRange;
pub use scene::Scene;
