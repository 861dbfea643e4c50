use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – condition and facet selection
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Conditions");
    ui.separator();

    if state.summaries.is_empty() {
        ui.label("No conditions in the parameters.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let mut clicked = None;
            for (i, summary) in state.summaries.iter().enumerate() {
                let text = format!("{}  ({} runs)", summary.condition.label(), summary.n_rows);
                let mut label = RichText::new(text);
                if summary.is_empty() {
                    label = label.weak();
                }
                if ui.selectable_label(state.selected == i, label).clicked() {
                    clicked = Some(i);
                }
            }
            if let Some(i) = clicked {
                state.select_condition(i);
            }

            let View::Boxes(group) = state.view else {
                return;
            };
            ui.separator();

            // ---- Metric row ----
            ui.strong("Metric");
            for &metric in group.metrics() {
                ui.radio_value(&mut state.metric, metric, metric.column());
            }
            ui.separator();

            // ---- Sources facet ----
            ui.strong("Sources");
            let sources = state
                .current()
                .map(|s| s.sources.clone())
                .unwrap_or_default();
            for src in sources {
                ui.radio_value(&mut state.sources, Some(src), src.to_string());
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top toolbar: experiment name and view selector.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.label(RichText::new(&state.title).strong());
        ui.separator();

        for view in View::ALL {
            if ui.selectable_label(state.view == view, view.label()).clicked() {
                state.set_view(view);
            }
        }

        ui.separator();
        if let Some(summary) = state.current() {
            ui.label(format!(
                "{} runs, {} algorithms",
                summary.n_rows,
                summary.algorithms.len()
            ));
        }
    });
}
