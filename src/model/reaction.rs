use std::collections::HashMap;
use std::path::PathBuf;

use indexmap::IndexMap;

// Zero-coefficient entries stay in `metabolites` but are neither reactants nor
// products.
#[derive(Clone, Debug)]
pub struct Reaction {
    pub id: String,
    pub metabolites: IndexMap<String, f64>,
}

impl Reaction {
    pub fn reactants(&self) -> impl Iterator<Item = &str> {
        self.metabolites
            .iter()
            .filter(|(_, coefficient)| **coefficient < 0.0)
            .map(|(id, _)| id.as_str())
    }

    pub fn products(&self) -> impl Iterator<Item = &str> {
        self.metabolites
            .iter()
            .filter(|(_, coefficient)| **coefficient > 0.0)
            .map(|(id, _)| id.as_str())
    }
}

#[derive(Clone, Debug, Default)]
pub struct FluxSolution {
    pub objective_value: Option<f64>,
    pub fluxes: IndexMap<String, f64>,
}

impl FluxSolution {
    pub fn flux(&self, reaction_id: &str) -> Option<f64> {
        self.fluxes.get(reaction_id).copied()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error("no flux solution is available for this model")]
    Unavailable,
    #[error("failed to read flux solution {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid flux solution: {0}")]
    Parse(String),
    #[error("solver finished with status `{status}`, expected `optimal`")]
    NotOptimal { status: String },
}

pub trait MetabolicModel {
    fn id(&self) -> Option<&str> {
        None
    }

    fn reactions(&self) -> &[Reaction];

    fn reaction(&self, id: &str) -> Option<&Reaction> {
        self.reactions().iter().find(|reaction| reaction.id == id)
    }

    fn optimize(&self) -> Result<FluxSolution, SolveError>;
}

#[derive(Clone, Debug, Default)]
pub struct StaticModel {
    pub id: Option<String>,
    reactions: Vec<Reaction>,
    index_by_id: HashMap<String, usize>,
    pub solution: Option<FluxSolution>,
}

impl StaticModel {
    pub fn new(id: Option<String>, reactions: Vec<Reaction>) -> Self {
        let mut index_by_id = HashMap::with_capacity(reactions.len());
        for (index, reaction) in reactions.iter().enumerate() {
            index_by_id.entry(reaction.id.clone()).or_insert(index);
        }

        Self {
            id,
            reactions,
            index_by_id,
            solution: None,
        }
    }

    #[cfg(test)]
    pub fn with_solution(mut self, solution: FluxSolution) -> Self {
        self.solution = Some(solution);
        self
    }
}

impl MetabolicModel for StaticModel {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    fn reaction(&self, id: &str) -> Option<&Reaction> {
        self.index_by_id
            .get(id)
            .and_then(|&index| self.reactions.get(index))
    }

    fn optimize(&self) -> Result<FluxSolution, SolveError> {
        self.solution.clone().ok_or(SolveError::Unavailable)
    }
}
