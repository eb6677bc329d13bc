use std::collections::HashSet;

use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::model::MetabolicModel;
use crate::util::closest_id;

use super::graph::{BipartiteGraph, NodeKind};

#[derive(Clone, Debug)]
pub struct Selection {
    pub metabolites: IndexSet<String>,
    pub reactions: IndexSet<String>,
    pub view: BipartiteGraph,
}

/// Resolves the view for a plot call.
///
/// An empty `reaction_ids` selects the whole graph. Otherwise only the listed
/// reactions and their reactants and products are kept; zero-coefficient
/// entries are not nodes and never selected, and ids that are not reactions of
/// the graph select nothing. `omitted` metabolites are removed in both cases.
pub fn select_nodes(
    graph: &BipartiteGraph,
    model: &impl MetabolicModel,
    reaction_ids: &[String],
    omitted: &[String],
) -> Selection {
    let omitted = omitted.iter().map(String::as_str).collect::<HashSet<_>>();

    let (reactions, metabolites) = if reaction_ids.is_empty() {
        let reactions = graph
            .nodes_of_kind(NodeKind::Reaction)
            .map(str::to_owned)
            .collect::<IndexSet<_>>();
        let metabolites = graph
            .nodes()
            .filter(|(id, kind)| *kind != NodeKind::Reaction && !omitted.contains(id))
            .map(|(id, _)| id.to_owned())
            .collect::<IndexSet<_>>();
        (reactions, metabolites)
    } else {
        let requested = reaction_ids.iter().map(String::as_str).collect::<HashSet<_>>();
        report_unknown_reactions(graph, reaction_ids);

        let reactions = graph
            .nodes_of_kind(NodeKind::Reaction)
            .filter(|id| requested.contains(id))
            .map(str::to_owned)
            .collect::<IndexSet<_>>();

        let mut metabolites = IndexSet::new();
        for reaction_id in &reactions {
            let Some(reaction) = model.reaction(reaction_id) else {
                continue;
            };
            let participants = reaction
                .reactants()
                .chain(reaction.products())
                .filter(|id| graph.kind(id) == Some(NodeKind::Metabolite));
            for metabolite in participants {
                if !omitted.contains(metabolite) {
                    metabolites.insert(metabolite.to_owned());
                }
            }
        }
        (reactions, metabolites)
    };

    let view = if reaction_ids.is_empty() && omitted.is_empty() {
        graph.clone()
    } else {
        graph.induced_subgraph(|id, kind| match kind {
            NodeKind::Reaction => reactions.contains(id),
            NodeKind::Metabolite => metabolites.contains(id),
        })
    };

    debug!(
        reactions = reactions.len(),
        metabolites = metabolites.len(),
        edges = view.edge_count(),
        "resolved plot selection"
    );

    Selection {
        metabolites,
        reactions,
        view,
    }
}

fn report_unknown_reactions(graph: &BipartiteGraph, reaction_ids: &[String]) {
    let unknown = reaction_ids
        .iter()
        .filter(|id| graph.kind(id) != Some(NodeKind::Reaction))
        .collect::<Vec<_>>();
    if unknown.is_empty() {
        return;
    }

    let known = graph.nodes_of_kind(NodeKind::Reaction).collect::<Vec<_>>();
    for id in unknown {
        match closest_id(id, &known) {
            Some(hint) => warn!(reaction = %id, hint, "unknown reaction id ignored; did you mean `{hint}`?"),
            None => warn!(reaction = %id, "unknown reaction id ignored"),
        }
    }
}
