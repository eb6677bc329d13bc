use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::job::{PlotJob, PlotOutput};

mod paint;
mod view;

type PlotResult = Result<PlotOutput, String>;

pub struct NetPlotApp {
    job: PlotJob,
    state: AppState,
    replot_rx: Option<Receiver<PlotResult>>,
}

enum AppState {
    Loading { rx: Receiver<PlotResult> },
    Ready(Box<PlotOutput>),
    Error(String),
}

impl NetPlotApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, job: PlotJob) -> Self {
        let state = Self::start_plot(job.clone());
        Self {
            job,
            state,
            replot_rx: None,
        }
    }

    fn spawn_plot(job: PlotJob) -> Receiver<PlotResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = job.run().map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_plot(job: PlotJob) -> AppState {
        AppState::Loading {
            rx: Self::spawn_plot(job),
        }
    }
}

impl eframe::App for NetPlotApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => {
                        transition = Some(match result {
                            Ok(output) => AppState::Ready(Box::new(output)),
                            Err(error) => AppState::Error(error),
                        });
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error("Plot worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Solving and laying out the reaction network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to plot the reaction network");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_plot(self.job.clone()));
                    }
                });
            }
            AppState::Ready(output) => {
                let is_replotting = self.replot_rx.is_some();
                let replot_requested = view::show(ctx, &self.job, output, is_replotting);

                if replot_requested && self.replot_rx.is_none() {
                    self.replot_rx = Some(Self::spawn_plot(self.job.clone()));
                }

                if let Some(rx) = self.replot_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(output) => AppState::Ready(Box::new(output)),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.replot_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Plot worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.replot_rx = None;
            self.state = next_state;
        }
    }
}
