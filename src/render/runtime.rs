use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use super::{facet_height, padded, ASPECT, FONT};
use crate::color::ColorMap;
use crate::data::model::Family;
use crate::data::summary::{ConditionSummary, RUNTIME_FAMILIES};

/// Median real-time factor of single-source runs against mic count.
pub fn draw_runtime_points(
    path: &Path,
    summary: &ConditionSummary,
    colors: &ColorMap<Family>,
) -> Result<()> {
    let height = facet_height(summary.sources.len());
    let width = (height as f64 * ASPECT) as u32;

    let series: Vec<(Family, Vec<(u32, f64)>)> = RUNTIME_FAMILIES
        .iter()
        .map(|f| (f.clone(), summary.single_source_runtime(f)))
        .filter(|(_, pts)| !pts.is_empty())
        .collect();

    let mics = &summary.mics;
    let y_max = series
        .iter()
        .flat_map(|(_, pts)| pts.iter().map(|p| p.1))
        .fold(0.0_f64, f64::max);
    let (_, y1) = padded(0.0, y_max);

    let root = SVGBackend::new(path, (width.max(320), height.max(240))).into_drawing_area();
    root.fill(&WHITE)?;

    let mic_index = |m: u32| mics.iter().position(|&x| x == m).unwrap_or(0) as f64;
    let mic_label = |x: &f64| {
        let i = x.round();
        if (x - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        mics.get(i as usize).map(|m| m.to_string()).unwrap_or_default()
    };

    let mut chart = ChartBuilder::on(&root)
        .caption("Single source", (FONT, 14))
        .margin(6)
        .x_label_area_size(28)
        .y_label_area_size(48)
        .build_cartesian_2d(-0.5..(mics.len() as f64 - 0.5), 0.0..y1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(mics.len().max(1))
        .x_label_formatter(&mic_label)
        .x_desc("Mics")
        .y_desc("Real-time factor [s]")
        .draw()?;

    for (family, pts) in &series {
        let color = colors.color_for(family).to_plotters();
        let xy: Vec<(f64, f64)> = pts.iter().map(|&(m, v)| (mic_index(m), v)).collect();

        chart
            .draw_series(LineSeries::new(xy.iter().copied(), color.stroke_width(1)))?
            .label(family.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2)));
        chart.draw_series(xy.iter().map(|&p| Circle::new(p, 3, color.filled())))?;
    }

    if !series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .label_font((FONT, 10))
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Median runtime ratio to AuxIVA against the source to mic ratio, with
/// the x = y reference line.
pub fn draw_runtime_ratio(
    path: &Path,
    summary: &ConditionSummary,
    colors: &ColorMap<Family>,
) -> Result<()> {
    let side = facet_height(summary.sources.len()).max(320);
    let ratios = summary.ratios();

    let y_top = ratios
        .iter()
        .flat_map(|(_, pts)| pts.iter().map(|p| p[1]))
        .fold(1.1_f64, f64::max);

    let root = SVGBackend::new(path, (side, side)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(8)
        .x_label_area_size(32)
        .y_label_area_size(44)
        .build_cartesian_2d(0.0..1.0, -0.05..y_top)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Ratio of sources to microphones (K/M)")
        .y_desc("Median runtime ratio to AuxIVA")
        .draw()?;

    // dashed x = y
    let dashes = 20;
    chart
        .draw_series((0..dashes).map(|i| {
            let a = i as f64 / dashes as f64;
            let b = a + 0.5 / dashes as f64;
            PathElement::new(vec![(a, a), (b, b)], BLACK.stroke_width(1))
        }))?
        .label("x = y")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLACK.stroke_width(1)));

    for (i, (family, pts)) in ratios.iter().enumerate() {
        if pts.is_empty() {
            continue;
        }
        let color = colors.color_for(family).to_plotters();
        let xy = pts.iter().map(|p| (p[0], p[1]));
        let anno = match i % 3 {
            0 => chart.draw_series(xy.map(|p| Circle::new(p, 3, color.filled())))?,
            1 => chart.draw_series(xy.map(|p| Cross::new(p, 3, color.stroke_width(1))))?,
            _ => chart.draw_series(xy.map(|p| TriangleMarker::new(p, 3, color.filled())))?,
        };
        anno.label(family.label())
            .legend(move |(x, y)| Circle::new((x + 8, y), 3, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font((FONT, 10))
        .draw()?;

    root.present()?;
    Ok(())
}
