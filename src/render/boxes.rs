use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use super::{facet_height, padded, ASPECT, FONT};
use crate::color::ColorMap;
use crate::data::model::{Algorithm, MetricGroup};
use crate::data::stats::FacetKey;
use crate::data::summary::ConditionSummary;

/// Share of a mic slot taken by the boxes of all algorithms.
const GROUP_WIDTH: f64 = 0.8;

/// Box plots of one metric group: rows are metrics, columns source counts,
/// x is the mic count and hue the algorithm.
pub fn draw_boxes(
    path: &Path,
    summary: &ConditionSummary,
    group: MetricGroup,
    colors: &ColorMap<Algorithm>,
) -> Result<()> {
    let metrics = group.metrics();
    let n_cols = summary.sources.len().max(1);
    let height = facet_height(n_cols);
    let width = (height as f64 * ASPECT) as u32 * n_cols as u32;

    let root = SVGBackend::new(path, (width, height * metrics.len() as u32)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((metrics.len(), n_cols));

    let mics = &summary.mics;
    let n_hue = summary.algorithms.len().max(1);
    let box_width = GROUP_WIDTH / n_hue as f64;
    let x_range = -0.5..(mics.len() as f64 - 0.5);
    let mic_label = |x: &f64| {
        let i = x.round();
        if (x - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        mics.get(i as usize).map(|m| m.to_string()).unwrap_or_default()
    };

    for (r, &metric) in metrics.iter().enumerate() {
        // y is shared along a row
        let (y0, y1) = summary
            .boxes
            .metric_extent(metric)
            .map_or((0.0, 1.0), |(lo, hi)| padded(lo, hi));

        for (c, &sources) in summary.sources.iter().enumerate() {
            let panel = &panels[r * n_cols + c];
            let mut chart = ChartBuilder::on(panel)
                .caption(format!("Sources={sources}"), (FONT, 14))
                .margin(6)
                .x_label_area_size(28)
                .y_label_area_size(if c == 0 { 48 } else { 32 })
                .build_cartesian_2d(x_range.clone(), y0..y1)?;

            let mut mesh = chart.configure_mesh();
            mesh.disable_x_mesh()
                .x_labels(mics.len().max(1))
                .x_label_formatter(&mic_label)
                .x_desc("Mics");
            if c == 0 {
                mesh.y_desc(metric.column());
            }
            mesh.draw()?;

            for (h, algorithm) in summary.algorithms.iter().enumerate() {
                let color = colors.color_for(algorithm).to_plotters();
                let offset = -GROUP_WIDTH / 2.0 + (h as f64 + 0.5) * box_width;
                let half = box_width * 0.4;

                let stats: Vec<(f64, _)> = mics
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &m)| {
                        let key = FacetKey {
                            metric,
                            sources,
                            mics: m,
                            algorithm: algorithm.clone(),
                        };
                        summary.boxes.get(&key).map(|b| (i as f64 + offset, b))
                    })
                    .collect();
                if stats.is_empty() {
                    continue;
                }

                let series = chart.draw_series(stats.iter().map(|(x, b)| {
                    Rectangle::new([(x - half, b.q1), (x + half, b.q3)], color.filled())
                }))?;
                if r == 0 && c + 1 == n_cols {
                    series
                        .label(algorithm.label())
                        .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 10, y + 4)], color.filled()));
                }

                chart.draw_series(stats.iter().flat_map(|(x, b)| {
                    let (x, b) = (*x, *b);
                    [
                        PathElement::new(vec![(x - half, b.median), (x + half, b.median)], BLACK.stroke_width(1)),
                        PathElement::new(vec![(x, b.lower_whisker), (x, b.q1)], BLACK.stroke_width(1)),
                        PathElement::new(vec![(x, b.q3), (x, b.upper_whisker)], BLACK.stroke_width(1)),
                        PathElement::new(
                            vec![(x - half / 2.0, b.lower_whisker), (x + half / 2.0, b.lower_whisker)],
                            BLACK.stroke_width(1),
                        ),
                        PathElement::new(
                            vec![(x - half / 2.0, b.upper_whisker), (x + half / 2.0, b.upper_whisker)],
                            BLACK.stroke_width(1),
                        ),
                    ]
                }))?;

                chart.draw_series(stats.iter().flat_map(|(x, b)| {
                    let x = *x;
                    b.outliers
                        .iter()
                        .map(move |&y| Circle::new((x, y), 1, BLACK.filled()))
                }))?;
            }

            if r == 0 && c + 1 == n_cols {
                chart
                    .configure_series_labels()
                    .position(SeriesLabelPosition::UpperLeft)
                    .background_style(WHITE.mix(0.85))
                    .border_style(BLACK)
                    .label_font((FONT, 10))
                    .draw()?;
            }
        }
    }

    root.present()?;
    Ok(())
}
