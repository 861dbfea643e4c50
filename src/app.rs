use eframe::egui;

use crate::data::summary::ConditionSummary;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MbssPlotApp {
    pub state: AppState,
}

impl MbssPlotApp {
    pub fn new(title: String, summaries: Vec<ConditionSummary>) -> Self {
        Self {
            state: AppState::new(title, summaries),
        }
    }
}

impl eframe::App for MbssPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: experiment and view ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: conditions ----
        egui::SidePanel::left("condition_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::comparison_plot(ui, &self.state);
        });
    }
}

/// Open the viewer window and block until it is closed.
pub fn run_viewer(title: String, summaries: Vec<ConditionSummary>) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let window_title = format!("MBSS results – {title}");
    eframe::run_native(
        &window_title,
        options,
        Box::new(move |_cc| Ok(Box::new(MbssPlotApp::new(title, summaries)))),
    )
}
