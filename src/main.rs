mod app;
mod job;
mod layout;
mod model;
mod net;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use job::{LayoutKind, PlotJob};
use net::WidthRange;
use util::format_flux;

#[derive(Debug, Parser)]
#[command(author, version, about = "Plot a metabolic network with flux-scaled edges")]
struct Args {
    /// COBRA JSON model file
    model: PathBuf,

    /// Flux solution written by the solver (`{"status", "fluxes"}` or a bare map)
    #[arg(long)]
    fluxes: Option<PathBuf>,

    /// Only draw these reactions and their metabolites
    #[arg(long = "reaction", value_delimiter = ',')]
    reactions: Vec<String>,

    /// Metabolites to leave out of the diagram
    #[arg(long, value_delimiter = ',')]
    omit: Vec<String>,

    #[arg(long, value_enum, default_value_t = LayoutKind::Force)]
    layout: LayoutKind,

    #[arg(long, default_value_t = layout::DEFAULT_ITERATIONS)]
    iterations: usize,

    #[arg(long, default_value_t = net::WidthRange::default().min())]
    width_min: f32,

    #[arg(long, default_value_t = net::WidthRange::default().max())]
    width_max: f32,

    /// Plot without opening a window and print a summary
    #[arg(long)]
    headless: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("netplot=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let job = PlotJob {
        model_path: args.model,
        fluxes_path: args.fluxes,
        reactions: args.reactions,
        omit: args.omit,
        layout: args.layout,
        iterations: args.iterations,
        widths: WidthRange::new(args.width_min, args.width_max)?,
    };

    if args.headless {
        let output = job.run()?;
        let summary = output.summary;
        println!(
            "reactions: {}, metabolites: {}, edges: {}, with flux: {}, objective: {}",
            summary.reactions,
            summary.metabolites,
            summary.edges,
            summary.overlays,
            summary
                .objective_value
                .map(format_flux)
                .unwrap_or_else(|| "-".to_owned()),
        );
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "netplot",
        options,
        Box::new(move |cc| Ok(Box::new(app::NetPlotApp::new(cc, job)))),
    )
    .map_err(|error| anyhow::anyhow!("viewer failed: {error}"))
}

fn main() -> ExitCode {
    init_tracing();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
