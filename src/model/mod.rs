mod load;
mod parse;
mod reaction;

pub use load::load_cobra_model;
pub use reaction::MetabolicModel;
#[cfg(test)]
pub use reaction::{FluxSolution, StaticModel};

#[cfg(test)]
pub(crate) fn toy_model(raw: &str) -> StaticModel {
    let (id, reactions) = parse::parse_cobra_model(raw).expect("valid test model");
    StaticModel::new(id, reactions)
}
