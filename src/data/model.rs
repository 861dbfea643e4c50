use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Algorithm – the separation method that produced a run
// ---------------------------------------------------------------------------

/// Separation algorithm identifier as written by the simulation.
///
/// Variant order is the plot hue order, so sorted collections of algorithms
/// come out legend-ready. Unknown ids are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Algorithm {
    AuxIvaLaplace,
    OverIvaLaplace,
    PcaAuxIvaLaplace,
    OgiveLaplace,
    AuxIvaGauss,
    OverIvaGauss,
    PcaAuxIvaGauss,
    OgiveGauss,
    Other(String),
}

impl Algorithm {
    /// Every known algorithm, in hue order.
    pub const KNOWN: [Algorithm; 8] = [
        Algorithm::AuxIvaLaplace,
        Algorithm::OverIvaLaplace,
        Algorithm::PcaAuxIvaLaplace,
        Algorithm::OgiveLaplace,
        Algorithm::AuxIvaGauss,
        Algorithm::OverIvaGauss,
        Algorithm::PcaAuxIvaGauss,
        Algorithm::OgiveGauss,
    ];

    /// The raw id used in `data.json` and in the cache.
    pub fn id(&self) -> &str {
        match self {
            Algorithm::AuxIvaLaplace => "auxiva_laplace",
            Algorithm::AuxIvaGauss => "auxiva_gauss",
            Algorithm::PcaAuxIvaLaplace => "auxiva_pca_laplace",
            Algorithm::PcaAuxIvaGauss => "auxiva_pca_gauss",
            Algorithm::OverIvaLaplace => "overiva_laplace",
            Algorithm::OverIvaGauss => "overiva_gauss",
            Algorithm::OgiveLaplace => "ogive_laplace",
            Algorithm::OgiveGauss => "ogive_gauss",
            Algorithm::Other(id) => id,
        }
    }

    /// Human readable name used in legends.
    pub fn label(&self) -> &str {
        match self {
            Algorithm::AuxIvaLaplace => "AuxIVA (Laplace)",
            Algorithm::AuxIvaGauss => "AuxIVA (Gauss)",
            Algorithm::PcaAuxIvaLaplace => "PCA+AuxIVA (Laplace)",
            Algorithm::PcaAuxIvaGauss => "PCA+AuxIVA (Gauss)",
            Algorithm::OverIvaLaplace => "OverIVA (Laplace)",
            Algorithm::OverIvaGauss => "OverIVA (Gauss)",
            Algorithm::OgiveLaplace => "OGIVEw (Laplace)",
            Algorithm::OgiveGauss => "OGIVEw (Gauss)",
            Algorithm::Other(id) => id,
        }
    }

    /// The algorithm family, ignoring the source model.
    pub fn family(&self) -> Family {
        match self {
            Algorithm::AuxIvaLaplace | Algorithm::AuxIvaGauss => Family::AuxIva,
            Algorithm::PcaAuxIvaLaplace | Algorithm::PcaAuxIvaGauss => Family::PcaAuxIva,
            Algorithm::OverIvaLaplace | Algorithm::OverIvaGauss => Family::OverIva,
            Algorithm::OgiveLaplace | Algorithm::OgiveGauss => Family::Ogive,
            Algorithm::Other(id) => Family::Other(id.clone()),
        }
    }
}

impl From<String> for Algorithm {
    fn from(id: String) -> Self {
        Algorithm::KNOWN
            .iter()
            .find(|a| a.id() == id)
            .cloned()
            .unwrap_or(Algorithm::Other(id))
    }
}

impl From<Algorithm> for String {
    fn from(algo: Algorithm) -> Self {
        algo.id().to_string()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Algorithm with the Laplace/Gauss source model merged away.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    AuxIva,
    OverIva,
    PcaAuxIva,
    Ogive,
    Other(String),
}

impl Family {
    pub fn label(&self) -> &str {
        match self {
            Family::AuxIva => "AuxIVA",
            Family::OverIva => "OverIVA",
            Family::PcaAuxIva => "PCA+AuxIVA",
            Family::Ogive => "OGIVEw",
            Family::Other(id) => id,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RunRecord – one trial as written to data.json
// ---------------------------------------------------------------------------

/// A single simulation trial.
///
/// `sdr` and `sir` hold one vector of per-source values per separation
/// iteration: the first entry is the initial value, the last the final one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub algorithm: Algorithm,
    pub n_targets: u32,
    pub n_mics: u32,
    pub rt60: f64,
    pub sinr: f64,
    pub seed: i64,
    /// Wall-clock seconds, NaN when the run did not report timing.
    #[serde(deserialize_with = "f64_or_nan")]
    pub runtime: f64,
    pub n_samples: u64,
    #[serde(deserialize_with = "iterations_or_nan")]
    pub sdr: Vec<Vec<f64>>,
    #[serde(deserialize_with = "iterations_or_nan")]
    pub sir: Vec<Vec<f64>>,
}

// Non-finite literals are rewritten to `null` before parsing (see loader),
// so a null number means NaN here.
fn f64_or_nan<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(de)?.unwrap_or(f64::NAN))
}

fn iterations_or_nan<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<Vec<f64>>, D::Error> {
    let raw = Vec::<Vec<Option<f64>>>::deserialize(de)?;
    Ok(raw
        .into_iter()
        .map(|iter| iter.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        .collect())
}

// ---------------------------------------------------------------------------
// Parameters – the simulation configuration (parameters.json)
// ---------------------------------------------------------------------------

/// Simulation parameters of one run directory.
///
/// Only the fields used for aggregation and labelling are typed; the room
/// and algorithm configuration is carried along untouched in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    /// Sampling rate in Hz.
    pub fs: f64,
    pub name: String,
    #[serde(rename = "_date")]
    pub date: String,
    #[serde(rename = "_git_sha")]
    pub git_sha: String,
    pub rt60_list: Vec<f64>,
    pub sinr_list: Vec<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Metric – the derived numeric columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Runtime,
    Sdr,
    Sir,
    SdrImprovement,
    SirImprovement,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Runtime,
        Metric::Sdr,
        Metric::Sir,
        Metric::SdrImprovement,
        Metric::SirImprovement,
    ];

    /// Column header in the aggregated table.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Runtime => "Runtime [s]",
            Metric::Sdr => "SDR [dB]",
            Metric::Sir => "SIR [dB]",
            Metric::SdrImprovement => "SDR Improvement [dB]",
            Metric::SirImprovement => "SIR Improvement [dB]",
        }
    }

    pub fn value(self, row: &AggregatedRow) -> f64 {
        match self {
            Metric::Runtime => row.runtime,
            Metric::Sdr => row.sdr,
            Metric::Sir => row.sir,
            Metric::SdrImprovement => row.sdr_improvement,
            Metric::SirImprovement => row.sir_improvement,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Metrics that are plotted together on one figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricGroup {
    Improvements,
    Raw,
    Runtime,
}

impl MetricGroup {
    pub const ALL: [MetricGroup; 3] =
        [MetricGroup::Improvements, MetricGroup::Raw, MetricGroup::Runtime];

    /// Short name used in output file names.
    pub fn name(self) -> &'static str {
        match self {
            MetricGroup::Improvements => "improvements",
            MetricGroup::Raw => "raw",
            MetricGroup::Runtime => "runtime",
        }
    }

    /// Facet rows, top to bottom.
    pub fn metrics(self) -> &'static [Metric] {
        match self {
            MetricGroup::Improvements => &[Metric::SdrImprovement, Metric::SirImprovement],
            MetricGroup::Raw => &[Metric::Sdr, Metric::Sir],
            MetricGroup::Runtime => &[Metric::Runtime],
        }
    }
}

// ---------------------------------------------------------------------------
// AggregatedRow / ResultTable – the tabular dataset
// ---------------------------------------------------------------------------

/// Column headers of the aggregated table, in storage order.
pub const COLUMNS: [&str; 11] = [
    "Algorithm",
    "Sources",
    "Mics",
    "RT60",
    "SINR",
    "seed",
    "Runtime [s]",
    "SDR [dB]",
    "SIR [dB]",
    "SDR Improvement [dB]",
    "SIR Improvement [dB]",
];

/// One row of the aggregated table, derived from a single [`RunRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
    pub algorithm: Algorithm,
    pub sources: u32,
    pub mics: u32,
    pub rt60: f64,
    pub sinr: f64,
    pub seed: i64,
    /// Real-time factor: seconds of processing per second of audio.
    pub runtime: f64,
    pub sdr: f64,
    pub sir: f64,
    pub sdr_improvement: f64,
    pub sir_improvement: f64,
}

/// A row of the long ("melted") form: identifier columns plus one metric.
#[derive(Debug, Clone, Copy)]
pub struct MetricRow<'a> {
    pub row: &'a AggregatedRow,
    pub metric: Metric,
    pub value: f64,
}

/// The aggregated table. Row order follows the input records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    pub rows: Vec<AggregatedRow>,
}

impl ResultTable {
    pub fn new(rows: Vec<AggregatedRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    /// Unique source counts, ascending.
    pub fn sources(&self) -> Vec<u32> {
        let mut v: Vec<u32> = self.rows.iter().map(|r| r.sources).collect();
        v.sort_unstable();
        v.dedup();
        v
    }

    /// Unique microphone counts, ascending.
    pub fn mics(&self) -> Vec<u32> {
        let mut v: Vec<u32> = self.rows.iter().map(|r| r.mics).collect();
        v.sort_unstable();
        v.dedup();
        v
    }

    /// Unique algorithms in hue order.
    pub fn algorithms(&self) -> Vec<Algorithm> {
        let mut v: Vec<Algorithm> = self.rows.iter().map(|r| r.algorithm.clone()).collect();
        v.sort();
        v.dedup();
        v
    }

    /// Long form: one entry per (row, metric), metrics in column order.
    pub fn melt(&self) -> Vec<MetricRow<'_>> {
        self.rows
            .iter()
            .flat_map(|row| {
                Metric::ALL.iter().map(move |&metric| MetricRow {
                    row,
                    metric,
                    value: metric.value(row),
                })
            })
            .collect()
    }
}
