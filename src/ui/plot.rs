use eframe::egui::{Color32, Ui};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::data::model::Family;
use crate::data::stats::FacetKey;
use crate::data::summary::{ConditionSummary, RUNTIME_FAMILIES};
use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Comparison plot (central panel)
// ---------------------------------------------------------------------------

/// Render the selected view of the selected condition.
pub fn comparison_plot(ui: &mut Ui, state: &AppState) {
    let summary = match state.current() {
        Some(s) if !s.is_empty() => s,
        _ => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("No runs for this condition");
            });
            return;
        }
    };

    ui.label(summary.condition.label());
    match state.view {
        View::Boxes(_) => box_plot(ui, state, summary),
        View::RuntimeMedian => runtime_plot(ui, state, summary),
        View::RuntimeRatio => ratio_plot(ui, state, summary),
    }
}

/// Boxes for one metric and source count, grouped by mic count.
fn box_plot(ui: &mut Ui, state: &AppState, summary: &ConditionSummary) {
    let Some(sources) = state.sources else {
        return;
    };
    let metric = state.metric;
    let n_hue = summary.algorithms.len().max(1) as f64;
    let width = 0.8 / n_hue;

    Plot::new("box_plot")
        .legend(Legend::default())
        .x_axis_label("Mics")
        .y_axis_label(metric.column())
        .show(ui, |plot_ui| {
            for (h, algorithm) in summary.algorithms.iter().enumerate() {
                let color = state.palettes.algorithms.color_for(algorithm).to_color32();
                let offset = -0.4 + (h as f64 + 0.5) * width;

                let boxes: Vec<BoxElem> = summary
                    .mics
                    .iter()
                    .filter_map(|&mics| {
                        let key = FacetKey {
                            metric,
                            sources,
                            mics,
                            algorithm: algorithm.clone(),
                        };
                        let b = summary.boxes.get(&key)?;
                        Some(
                            BoxElem::new(
                                mics as f64 + offset,
                                BoxSpread::new(
                                    b.lower_whisker,
                                    b.q1,
                                    b.median,
                                    b.q3,
                                    b.upper_whisker,
                                ),
                            )
                            .box_width(width * 0.8)
                            .whisker_width(width * 0.4)
                            .name(format!("{mics} mics")),
                        )
                    })
                    .collect();

                if !boxes.is_empty() {
                    plot_ui.box_plot(BoxPlot::new(boxes).name(algorithm.label()).color(color));
                }
            }
        });
}

fn family_color(state: &AppState, family: &Family) -> Color32 {
    state.palettes.families.color_for(family).to_color32()
}

/// Median real-time factor of single-source runs.
fn runtime_plot(ui: &mut Ui, state: &AppState, summary: &ConditionSummary) {
    Plot::new("runtime_plot")
        .legend(Legend::default())
        .x_axis_label("Mics")
        .y_axis_label("Real-time factor [s]")
        .show(ui, |plot_ui| {
            for family in &RUNTIME_FAMILIES {
                let pts = summary.single_source_runtime(family);
                if pts.is_empty() {
                    continue;
                }
                let color = family_color(state, family);
                let xy: Vec<[f64; 2]> = pts.iter().map(|&(m, v)| [m as f64, v]).collect();

                plot_ui.line(
                    Line::new(PlotPoints::from(xy.clone()))
                        .name(family.label())
                        .color(color)
                        .width(1.5),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(xy))
                        .name(family.label())
                        .color(color)
                        .radius(3.0),
                );
            }
        });
}

/// Median runtime ratio to AuxIVA against K/M, with the x = y line.
fn ratio_plot(ui: &mut Ui, state: &AppState, summary: &ConditionSummary) {
    let shapes = [MarkerShape::Circle, MarkerShape::Cross, MarkerShape::Up];

    Plot::new("ratio_plot")
        .legend(Legend::default())
        .data_aspect(1.0)
        .x_axis_label("Ratio of sources to microphones (K/M)")
        .y_axis_label("Median runtime ratio to AuxIVA")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(vec![[0.0, 0.0], [1.0, 1.0]]))
                    .name("x = y")
                    .color(Color32::GRAY)
                    .style(egui_plot::LineStyle::dashed_loose()),
            );
            for (i, (family, pts)) in summary.ratios().into_iter().enumerate() {
                if pts.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(PlotPoints::from(pts))
                        .name(family.label())
                        .color(family_color(state, &family))
                        .shape(shapes[i % shapes.len()])
                        .radius(4.0),
                );
            }
        });
}
