use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::layout::{circular_layout, force_layout};
use crate::model::{MetabolicModel, load_cobra_model};
use crate::net::{NetPlotter, PlotRequest, PlotStyle, PlotSummary, Scene, WidthRange};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LayoutKind {
    Force,
    Circular,
}

#[derive(Clone, Debug)]
pub struct PlotJob {
    pub model_path: PathBuf,
    pub fluxes_path: Option<PathBuf>,
    pub reactions: Vec<String>,
    pub omit: Vec<String>,
    pub layout: LayoutKind,
    pub iterations: usize,
    pub widths: WidthRange,
}

pub struct PlotOutput {
    pub model_id: Option<String>,
    pub scene: Scene,
    pub summary: PlotSummary,
}

impl PlotJob {
    pub fn run(&self) -> Result<PlotOutput> {
        let mut model = load_cobra_model(&self.model_path)?;
        if let Some(path) = &self.fluxes_path {
            model = model.with_solution_path(path);
        }

        let style = PlotStyle {
            widths: self.widths,
            ..PlotStyle::default()
        };
        let plotter = NetPlotter::new(model).with_style(style);

        let request = PlotRequest::default()
            .with_reactions(self.reactions.iter().cloned())
            .with_omitted(self.omit.iter().cloned());
        let iterations = self.iterations;
        let request = match self.layout {
            LayoutKind::Force => request.with_layout(move |view| force_layout(view, iterations)),
            LayoutKind::Circular => request.with_layout(circular_layout),
        };

        let mut scene = Scene::default();
        let summary = plotter.plot(&request, &mut scene)?;
        let model_id = plotter.model().id().map(str::to_owned);
        info!(
            model = model_id.as_deref().unwrap_or("<unnamed>"),
            layout = ?self.layout,
            "plot job finished"
        );

        Ok(PlotOutput {
            model_id,
            scene,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("netplot-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    fn job(model_path: PathBuf, fluxes_path: Option<PathBuf>) -> PlotJob {
        PlotJob {
            model_path,
            fluxes_path,
            reactions: Vec::new(),
            omit: vec!["h2o".to_owned()],
            layout: LayoutKind::Circular,
            iterations: 10,
            widths: WidthRange::default(),
        }
    }

    const MODEL: &str = r#"{
        "id": "mini",
        "reactions": [
            {"id": "EX_a", "metabolites": {"a": -1}},
            {"id": "CONV", "metabolites": {"a": -1, "b": 1, "h2o": 1}},
            {"id": "EX_b", "metabolites": {"b": -1}}
        ]
    }"#;

    #[test]
    fn runs_model_and_solution_files_end_to_end() {
        let model_path = scratch_file("end-to-end-model.json", MODEL);
        let fluxes_path = scratch_file(
            "end-to-end-fluxes.json",
            r#"{"status": "optimal", "objective_value": 10.0, "fluxes": {"EX_a": -10.0, "CONV": 10.0, "EX_b": 10.0}}"#,
        );

        let output = job(model_path.clone(), Some(fluxes_path.clone()))
            .run()
            .unwrap();
        fs::remove_file(model_path).ok();
        fs::remove_file(fluxes_path).ok();

        assert_eq!(output.model_id.as_deref(), Some("mini"));
        assert_eq!(output.summary.reactions, 3);
        assert_eq!(output.summary.metabolites, 2);
        assert_eq!(output.summary.overlays, 3);
        assert_eq!(output.summary.objective_value, Some(10.0));
        assert!(output.scene.overlay_edges().all(|batch| batch.width == 15.0));
    }

    #[test]
    fn missing_solution_file_fails_the_job() {
        let model_path = scratch_file("no-solution-model.json", MODEL);
        let result = job(model_path.clone(), None).run();
        fs::remove_file(model_path).ok();

        assert!(result.is_err());
    }
}
