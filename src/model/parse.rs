use anyhow::{Context, Result, anyhow};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::reaction::{FluxSolution, Reaction, SolveError};

#[derive(Debug, Deserialize)]
struct RawModel {
    #[serde(default)]
    id: Option<String>,
    reactions: Vec<RawReaction>,
}

#[derive(Debug, Deserialize)]
struct RawReaction {
    id: String,
    metabolites: IndexMap<String, f64>,
}

pub(super) fn parse_cobra_model(raw: &str) -> Result<(Option<String>, Vec<Reaction>)> {
    let model: RawModel = serde_json::from_str(raw).context("invalid COBRA JSON model")?;

    let mut reactions = Vec::with_capacity(model.reactions.len());
    for raw_reaction in model.reactions {
        if raw_reaction.id.is_empty() {
            return Err(anyhow!("model contains a reaction with an empty id"));
        }
        reactions.push(Reaction {
            id: raw_reaction.id,
            metabolites: raw_reaction.metabolites,
        });
    }

    Ok((model.id.filter(|id| !id.is_empty()), reactions))
}

pub(super) fn parse_solution(raw: &str) -> Result<FluxSolution, SolveError> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|error| SolveError::Parse(error.to_string()))?;
    let object = parsed
        .as_object()
        .ok_or_else(|| SolveError::Parse("expected a JSON object".to_owned()))?;

    if let Some(fluxes_value) = object.get("fluxes") {
        let status = object
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("optimal");
        if !status.eq_ignore_ascii_case("optimal") {
            return Err(SolveError::NotOptimal {
                status: status.to_owned(),
            });
        }

        let fluxes = IndexMap::<String, f64>::deserialize(fluxes_value)
            .map_err(|error| SolveError::Parse(format!("invalid fluxes map: {error}")))?;
        let objective_value = object.get("objective_value").and_then(Value::as_f64);
        return Ok(FluxSolution {
            objective_value,
            fluxes,
        });
    }

    let mut fluxes = IndexMap::with_capacity(object.len());
    for (key, value) in object {
        let flux = value
            .as_f64()
            .ok_or_else(|| SolveError::Parse(format!("flux for `{key}` is not a number")))?;
        fluxes.insert(key.clone(), flux);
    }

    Ok(FluxSolution {
        objective_value: None,
        fluxes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reactants_and_products_follow_coefficient_sign() {
        let raw = r#"{
            "id": "toy",
            "reactions": [
                {"id": "R1", "metabolites": {"glc": -1.0, "atp": -2.0, "g6p": 1.0, "adp": 2.0, "h2o": 0.0}}
            ]
        }"#;

        let (id, reactions) = parse_cobra_model(raw).unwrap();
        assert_eq!(id.as_deref(), Some("toy"));
        assert_eq!(reactions.len(), 1);

        let reaction = &reactions[0];
        assert_eq!(reaction.reactants().collect::<Vec<_>>(), vec!["glc", "atp"]);
        assert_eq!(reaction.products().collect::<Vec<_>>(), vec!["g6p", "adp"]);
        assert_eq!(reaction.metabolites.len(), 5);
        assert_eq!(reaction.metabolites["h2o"], 0.0);
    }

    #[test]
    fn reaction_without_metabolites_is_malformed() {
        let raw = r#"{"reactions": [{"id": "R1"}]}"#;
        assert!(parse_cobra_model(raw).is_err());
    }

    #[test]
    fn solution_with_status_wrapper() {
        let raw = r#"{"status": "optimal", "objective_value": 0.87, "fluxes": {"R1": 1.5, "R2": -0.5}}"#;
        let solution = parse_solution(raw).unwrap();
        assert_eq!(solution.objective_value, Some(0.87));
        assert_eq!(solution.flux("R2"), Some(-0.5));
    }

    #[test]
    fn bare_flux_map_is_optimal() {
        let solution = parse_solution(r#"{"R1": 2.0}"#).unwrap();
        assert_eq!(solution.objective_value, None);
        assert_eq!(solution.flux("R1"), Some(2.0));
        assert_eq!(solution.flux("R9"), None);
    }

    #[test]
    fn infeasible_status_is_an_error() {
        let raw = r#"{"status": "infeasible", "fluxes": {}}"#;
        assert!(matches!(
            parse_solution(raw),
            Err(SolveError::NotOptimal { status }) if status == "infeasible"
        ));
    }
}
