use std::sync::mpsc::{self, Receiver};
use std::thread;

use eframe::egui::{self, Context};

use crate::items::{ItemStat, MetricMode, load_items, sample_items};

mod bubbles;
mod physics;
mod render_utils;
mod ui;
mod viewport;

use physics::Simulation;
use viewport::ViewportAdapter;

pub struct SpendBubblesApp {
    items_path: Option<String>,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Vec<ItemStat>, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    items: Vec<ItemStat>,
    metric: MetricMode,
    adapter: ViewportAdapter,
    sim: Option<Simulation>,
    hovered: Option<usize>,
    dragging: Option<usize>,
    pulse: Option<BubblePulse>,
}

#[derive(Clone, Copy)]
struct BubblePulse {
    index: usize,
    started_at: f64,
}

impl ViewModel {
    fn new(items: Vec<ItemStat>) -> Self {
        Self {
            items,
            metric: MetricMode::Frequency,
            adapter: ViewportAdapter::new(),
            sim: None,
            hovered: None,
            dragging: None,
            pulse: None,
        }
    }

    fn show(&mut self, ctx: &Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.metric_controls(ui);
            ui.add_space(8.0);
            self.draw_bubbles(ui);
        });
    }
}

impl SpendBubblesApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, items_path: Option<String>) -> Self {
        let state = Self::start_load(items_path.clone());
        Self { items_path, state }
    }

    fn spawn_load(items_path: Option<String>) -> Receiver<Result<Vec<ItemStat>, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = match items_path {
                Some(path) => load_items(&path).map_err(|error| error.to_string()),
                None => Ok(sample_items()),
            };
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(items_path: Option<String>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(items_path),
        }
    }
}

impl eframe::App for SpendBubblesApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(items) => AppState::Ready(Box::new(ViewModel::new(items))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading item statistics...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load item statistics");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.items_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                model.show(ctx);
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
