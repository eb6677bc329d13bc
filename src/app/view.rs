use eframe::egui::{self, Align, Context, Layout, Sense};

use crate::job::{PlotJob, PlotOutput};
use crate::util::format_flux;

use super::paint::paint_scene;

pub(super) fn show(ctx: &Context, job: &PlotJob, output: &PlotOutput, is_replotting: bool) -> bool {
    let mut replot_requested = false;
    let summary = &output.summary;

    egui::TopBottomPanel::top("top_bar")
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("netplot");
                ui.separator();
                ui.label(format!(
                    "model: {}",
                    output.model_id.as_deref().unwrap_or("<unnamed>")
                ));
                ui.label(format!("file: {}", job.model_path.display()));
                let replot_button = ui.add_enabled(!is_replotting, egui::Button::new("Replot"));
                if replot_button.clicked() {
                    replot_requested = true;
                }
                if is_replotting {
                    ui.spinner();
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if let Some(objective) = summary.objective_value {
                        ui.label(format!("objective: {}", format_flux(objective)));
                    }
                    ui.label(format!(
                        "reactions: {} | metabolites: {} | edges: {} | with flux: {}",
                        summary.reactions, summary.metabolites, summary.edges, summary.overlays
                    ));
                });
            });
        });

    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let (rect, _response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
            let painter = ui.painter_at(rect);
            paint_scene(&painter, rect, &output.scene);
            if summary.reactions == 0 && summary.metabolites == 0 {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "No nodes matched the requested reactions.",
                    egui::FontId::proportional(16.0),
                    egui::Color32::DARK_GRAY,
                );
            }
        });

    replot_requested
}
