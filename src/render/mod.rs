//! Figure files: SVG plots and CSV median tables, one set per condition.

mod boxes;
mod runtime;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::data::filter::Condition;
use crate::data::model::{Algorithm, Family, MetricGroup, ResultTable};
use crate::data::pivot::RATIO_FAMILIES;
use crate::data::summary::{ConditionSummary, RUNTIME_FAMILIES};

pub use boxes::draw_boxes;
pub use runtime::{draw_runtime_points, draw_runtime_ratio};

/// Width of a full double-column figure, in pixels.
const FULL_WIDTH: u32 = 1100;
/// Width over height of one facet.
const ASPECT: f64 = 1.1;
const FONT: &str = "sans-serif";

/// Colours shared by every figure of a run.
#[derive(Debug, Clone)]
pub struct Palettes {
    pub algorithms: ColorMap<Algorithm>,
    pub families: ColorMap<Family>,
}

impl Palettes {
    /// Known algorithms plus any unknown ones found in the data.
    pub fn new<'a, I>(seen: I) -> Self
    where
        I: IntoIterator<Item = &'a Algorithm>,
    {
        let algorithms: Vec<Algorithm> = Algorithm::KNOWN.iter().chain(seen).cloned().collect();
        let families: Vec<Family> = RUNTIME_FAMILIES
            .iter()
            .chain(RATIO_FAMILIES.iter())
            .cloned()
            .collect();
        Self {
            algorithms: ColorMap::new(algorithms.iter()),
            families: ColorMap::new(families.iter()),
        }
    }
}

/// Facet height in pixels so that `n_cols` facets span the full width.
fn facet_height(n_cols: usize) -> u32 {
    (FULL_WIDTH as f64 / n_cols.max(1) as f64 / ASPECT) as u32
}

/// Write every figure and median table of one condition into `dir`.
/// Returns the paths written; nothing is written for an empty condition.
pub fn render_condition(
    dir: &Path,
    summary: &ConditionSummary,
    palettes: &Palettes,
) -> Result<Vec<PathBuf>> {
    let cond = summary.condition;
    if summary.is_empty() {
        log::warn!("No rows for {}, skipping", cond.label());
        return Ok(Vec::new());
    }

    let mut written = Vec::new();
    for group in MetricGroup::ALL {
        let path = dir.join(format!("{}.svg", cond.file_stem(group.name())));
        draw_boxes(&path, summary, group, &palettes.algorithms)
            .with_context(|| format!("drawing {}", path.display()))?;
        written.push(path);

        let path = dir.join(format!("{}_medians.csv", cond.file_stem(group.name())));
        if let Some(pivot) = summary.medians.get(&group) {
            let file = File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            pivot
                .write_csv(file)
                .with_context(|| format!("writing {}", path.display()))?;
            written.push(path);
        }
    }

    let path = dir.join(format!("{}.svg", cond.file_stem("runtime_agg")));
    draw_runtime_points(&path, summary, &palettes.families)
        .with_context(|| format!("drawing {}", path.display()))?;
    written.push(path);

    let path = dir.join(format!("{}.svg", cond.file_stem("runtime_ratio")));
    draw_runtime_ratio(&path, summary, &palettes.families)
        .with_context(|| format!("drawing {}", path.display()))?;
    written.push(path);

    Ok(written)
}

/// Render all conditions into `dir`, creating it when needed.
pub fn render_all(dir: &Path, summaries: &[ConditionSummary]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating figure directory {}", dir.display()))?;

    let palettes = Palettes::new(summaries.iter().flat_map(|s| s.algorithms.iter()));
    let mut written = Vec::new();
    for summary in summaries {
        log::info!("Plotting {}", summary.condition.label());
        written.extend(render_condition(dir, summary, &palettes)?);
    }
    log::info!("Wrote {} files to {}", written.len(), dir.display());
    Ok(written)
}

/// Summaries for every condition in parameter order.
pub fn summarize(table: &ResultTable, conditions: &[Condition]) -> Vec<ConditionSummary> {
    conditions
        .iter()
        .map(|&c| ConditionSummary::build(table, c))
        .collect()
}

/// Pad a value range so that points do not sit on the frame.
fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        return (lo - 0.5, hi + 0.5);
    }
    (lo - 0.05 * span, hi + 0.05 * span)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_handles_flat_and_missing_ranges() {
        assert_eq!(padded(1.0, 1.0), (0.5, 1.5));
        assert_eq!(padded(f64::NAN, 2.0), (0.0, 1.0));
        let (lo, hi) = padded(0.0, 10.0);
        assert!(lo < 0.0 && hi > 10.0);
    }

    #[test]
    fn palettes_colour_unknown_algorithms() {
        let extra = [Algorithm::Other("ilrma".into())];
        let pal = Palettes::new(extra.iter());
        assert_ne!(pal.algorithms.color_for(&extra[0]), crate::color::Rgb::GRAY);
        assert_ne!(
            pal.families.color_for(&Family::Ogive),
            pal.families.color_for(&Family::AuxIva)
        );
    }

    #[test]
    fn facet_height_shrinks_with_columns() {
        assert!(facet_height(4) < facet_height(2));
        assert_eq!(facet_height(0), facet_height(1));
    }
}
