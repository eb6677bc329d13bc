use indexmap::{IndexMap, IndexSet};
use tracing::warn;

use crate::model::MetabolicModel;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Reaction,
    Metabolite,
}

#[derive(Clone, Debug, Default)]
pub struct BipartiteGraph {
    nodes: IndexMap<String, NodeKind>,
    edges: IndexSet<(usize, usize)>,
}

impl BipartiteGraph {
    pub fn from_model(model: &impl MetabolicModel) -> Self {
        let mut graph = Self::default();
        for reaction in model.reactions() {
            let reaction_index = graph.add_node(&reaction.id, NodeKind::Reaction);
            for reactant in reaction.reactants() {
                let index = graph.add_node(reactant, NodeKind::Metabolite);
                graph.add_edge(index, reaction_index);
            }
            for product in reaction.products() {
                let index = graph.add_node(product, NodeKind::Metabolite);
                graph.add_edge(reaction_index, index);
            }
        }
        graph
    }

    pub fn add_node(&mut self, id: &str, kind: NodeKind) -> usize {
        if let Some((index, _, existing)) = self.nodes.get_full(id) {
            if *existing != kind {
                warn!(node = id, ?existing, requested = ?kind, "node id reused with another kind");
            }
            return index;
        }

        self.nodes.insert_full(id.to_owned(), kind).0
    }

    pub fn add_edge(&mut self, from: usize, to: usize) -> bool {
        let (Some(from_kind), Some(to_kind)) = (self.kind_at(from), self.kind_at(to)) else {
            return false;
        };

        if from_kind == to_kind {
            warn!(
                from = self.id_at(from).unwrap_or_default(),
                to = self.id_at(to).unwrap_or_default(),
                "refusing edge between nodes of the same kind"
            );
            return false;
        }

        self.edges.insert((from, to));
        true
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn kind(&self, id: &str) -> Option<NodeKind> {
        self.nodes.get(id).copied()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn id_at(&self, index: usize) -> Option<&str> {
        self.nodes.get_index(index).map(|(id, _)| id.as_str())
    }

    pub fn kind_at(&self, index: usize) -> Option<NodeKind> {
        self.nodes.get_index(index).map(|(_, kind)| *kind)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, NodeKind)> {
        self.nodes.iter().map(|(id, kind)| (id.as_str(), *kind))
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &str> {
        self.nodes()
            .filter(move |(_, node_kind)| *node_kind == kind)
            .map(|(id, _)| id)
    }

    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges.iter().filter_map(|&(from, to)| {
            Some((self.id_at(from)?, self.id_at(to)?))
        })
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(from), Some(to)) => self.edges.contains(&(from, to)),
            _ => false,
        }
    }

    pub fn incident_edges<'a>(&'a self, id: &str) -> impl Iterator<Item = (&'a str, &'a str)> {
        let index = self.index_of(id);
        self.edges
            .iter()
            .filter(move |&&(from, to)| index.is_some_and(|index| from == index || to == index))
            .filter_map(|&(from, to)| Some((self.id_at(from)?, self.id_at(to)?)))
    }

    pub fn induced_subgraph(&self, mut keep: impl FnMut(&str, NodeKind) -> bool) -> Self {
        let mut subgraph = Self::default();
        let mut remap = vec![None; self.nodes.len()];
        for (index, (id, kind)) in self.nodes.iter().enumerate() {
            if keep(id, *kind) {
                remap[index] = Some(subgraph.nodes.insert_full(id.clone(), *kind).0);
            }
        }

        for &(from, to) in &self.edges {
            if let (Some(from), Some(to)) = (remap[from], remap[to]) {
                subgraph.edges.insert((from, to));
            }
        }
        subgraph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MetabolicModel, toy_model};

    const GLYCOLYSIS_STUB: &str = r#"{
        "reactions": [
            {"id": "HEX1", "metabolites": {"glc": -1, "atp": -1, "g6p": 1, "adp": 1}},
            {"id": "PGI", "metabolites": {"g6p": -1, "f6p": 1}},
            {"id": "EX_glc", "metabolites": {"glc": -1}},
            {"id": "ATPM", "metabolites": {"atp": -1, "adp": 1}}
        ]
    }"#;

    #[test]
    fn every_edge_crosses_kinds() {
        let graph = BipartiteGraph::from_model(&toy_model(GLYCOLYSIS_STUB));
        assert!(graph.edge_count() > 0);
        for (from, to) in graph.edges() {
            assert_ne!(graph.kind(from), graph.kind(to), "{from} -> {to}");
        }
    }

    #[test]
    fn edges_follow_stoichiometric_roles() {
        let model = toy_model(GLYCOLYSIS_STUB);
        let graph = BipartiteGraph::from_model(&model);

        for reaction in model.reactions() {
            let reactants = reaction.reactants().collect::<Vec<_>>();
            let products = reaction.products().collect::<Vec<_>>();
            for reactant in &reactants {
                assert!(graph.has_edge(reactant, &reaction.id));
            }
            for product in &products {
                assert!(graph.has_edge(&reaction.id, product));
            }
            assert_eq!(
                graph.incident_edges(&reaction.id).count(),
                reactants.len() + products.len()
            );
        }
    }

    #[test]
    fn shared_metabolites_are_inserted_once() {
        let graph = BipartiteGraph::from_model(&toy_model(GLYCOLYSIS_STUB));
        assert_eq!(graph.nodes_of_kind(NodeKind::Reaction).count(), 4);
        assert_eq!(
            graph.nodes_of_kind(NodeKind::Metabolite).collect::<Vec<_>>(),
            vec!["glc", "atp", "g6p", "adp", "f6p"]
        );
        assert_eq!(graph.edge_count(), 9);
    }

    #[test]
    fn reaction_with_only_reactants_is_valid() {
        let graph = BipartiteGraph::from_model(&toy_model(GLYCOLYSIS_STUB));
        let edges = graph.incident_edges("EX_glc").collect::<Vec<_>>();
        assert_eq!(edges, vec![("glc", "EX_glc")]);
    }

    #[test]
    fn kind_is_fixed_at_first_insert() {
        let mut graph = BipartiteGraph::default();
        let reaction = graph.add_node("X", NodeKind::Reaction);
        let again = graph.add_node("X", NodeKind::Metabolite);
        assert_eq!(reaction, again);
        assert_eq!(graph.kind("X"), Some(NodeKind::Reaction));

        let other = graph.add_node("Y", NodeKind::Reaction);
        assert!(!graph.add_edge(reaction, other));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn induced_subgraph_drops_dangling_edges() {
        let graph = BipartiteGraph::from_model(&toy_model(GLYCOLYSIS_STUB));
        let view = graph.induced_subgraph(|id, _| id != "atp");
        assert!(!view.contains("atp"));
        assert!(view.edges().all(|(from, to)| from != "atp" && to != "atp"));
        assert!(view.has_edge("glc", "HEX1"));
        assert_eq!(view.edge_count(), graph.edge_count() - 2);
    }
}
