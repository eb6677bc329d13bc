use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::parse::{parse_cobra_model, parse_solution};
use super::reaction::{FluxSolution, MetabolicModel, Reaction, SolveError, StaticModel};

/// A COBRA JSON model whose solver output lives in a separate flux file.
///
/// The flux file is read on every [`MetabolicModel::optimize`] call, so a
/// solver that rewrites it between plots is picked up by the next plot.
#[derive(Clone, Debug)]
pub struct CobraModel {
    inner: StaticModel,
    solution_path: Option<PathBuf>,
}

impl CobraModel {
    pub fn with_solution_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.solution_path = Some(path.into());
        self
    }
}

pub fn load_cobra_model(path: &Path) -> Result<CobraModel> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read model file {}", path.display()))?;
    let (id, reactions) = parse_cobra_model(&raw)
        .with_context(|| format!("failed to parse model file {}", path.display()))?;
    debug!(
        path = %path.display(),
        reactions = reactions.len(),
        "loaded COBRA model"
    );

    Ok(CobraModel {
        inner: StaticModel::new(id, reactions),
        solution_path: None,
    })
}

impl MetabolicModel for CobraModel {
    fn id(&self) -> Option<&str> {
        self.inner.id()
    }

    fn reactions(&self) -> &[Reaction] {
        self.inner.reactions()
    }

    fn reaction(&self, id: &str) -> Option<&Reaction> {
        self.inner.reaction(id)
    }

    fn optimize(&self) -> Result<FluxSolution, SolveError> {
        let Some(path) = &self.solution_path else {
            return Err(SolveError::Unavailable);
        };

        let raw = fs::read_to_string(path).map_err(|source| SolveError::Read {
            path: path.clone(),
            source,
        })?;
        let solution = parse_solution(&raw)?;
        debug!(
            path = %path.display(),
            fluxes = solution.fluxes.len(),
            "read flux solution"
        );
        Ok(solution)
    }
}
