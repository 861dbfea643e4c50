use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::model::{Parameters, RunRecord};

/// Simulation results file expected in every run directory.
pub const DATA_FILE: &str = "data.json";
/// Simulation configuration file expected in every run directory.
pub const PARAMETERS_FILE: &str = "parameters.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no run directory given")]
    NoDirectories,

    #[error("file {} doesn't exist", .0.display())]
    MissingFile(PathBuf),

    #[error("reading {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "sampling rate mismatch: {} uses fs={first} but {} uses fs={other}",
        .first_dir.display(),
        .other_dir.display()
    )]
    SampleRateMismatch {
        first_dir: PathBuf,
        first: f64,
        other_dir: PathBuf,
        other: f64,
    },
}

// ---------------------------------------------------------------------------
// Run directories
// ---------------------------------------------------------------------------

/// One simulation output directory with its own parameters.
#[derive(Debug, Clone)]
pub struct RunDir {
    pub path: PathBuf,
    pub data_file: PathBuf,
    pub parameters: Parameters,
}

/// All run directories given on the command line, in order.
///
/// Every directory keeps its own [`Parameters`]. The sampling rate is
/// checked to be identical across directories when the set is built, so
/// [`RunSet::sample_rate`] is valid for every record. Only
/// [`scan_run_dirs`] builds a set, and never an empty one.
#[derive(Debug, Clone)]
pub struct RunSet {
    dirs: Vec<RunDir>,
}

impl RunSet {
    pub fn dirs(&self) -> &[RunDir] {
        &self.dirs
    }

    /// Experiment-wide sampling rate.
    pub fn sample_rate(&self) -> f64 {
        self.labels().fs
    }

    /// Parameters used for naming output: those of the last directory.
    pub fn labels(&self) -> &Parameters {
        &self.dirs[self.dirs.len() - 1].parameters
    }

    /// Union of every directory's `rt60_list`, in first-seen order.
    pub fn rt60_list(&self) -> Vec<f64> {
        union_in_order(self.dirs.iter().map(|d| &d.parameters.rt60_list))
    }

    /// Union of every directory's `sinr_list`, in first-seen order.
    pub fn sinr_list(&self) -> Vec<f64> {
        union_in_order(self.dirs.iter().map(|d| &d.parameters.sinr_list))
    }

    /// Read every data file and flatten all segments into one list.
    pub fn load_records(&self) -> Result<Vec<RunRecord>, LoadError> {
        let mut records = Vec::new();
        for dir in &self.dirs {
            let segments: Vec<Vec<RunRecord>> = read_json(&dir.data_file)?;
            let before = records.len();
            for seg in segments {
                records.extend(seg);
            }
            log::debug!(
                "{}: {} records",
                dir.data_file.display(),
                records.len() - before
            );
        }
        Ok(records)
    }
}

fn union_in_order<'a>(lists: impl Iterator<Item = &'a Vec<f64>>) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::new();
    for v in lists.flatten() {
        if !out.iter().any(|o| o == v) {
            out.push(*v);
        }
    }
    out
}

/// Check every directory for its data file and read its parameters.
pub fn scan_run_dirs<P: AsRef<Path>>(dirs: &[P]) -> Result<RunSet, LoadError> {
    if dirs.is_empty() {
        return Err(LoadError::NoDirectories);
    }

    let mut out: Vec<RunDir> = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let dir = dir.as_ref();
        log::info!("Reading in {}", dir.display());

        let data_file = dir.join(DATA_FILE);
        if !data_file.is_file() {
            return Err(LoadError::MissingFile(data_file));
        }
        let parameters: Parameters = read_json(&dir.join(PARAMETERS_FILE))?;

        if let Some(first) = out.first() {
            if first.parameters.fs != parameters.fs {
                return Err(LoadError::SampleRateMismatch {
                    first_dir: first.path.clone(),
                    first: first.parameters.fs,
                    other_dir: dir.to_path_buf(),
                    other: parameters.fs,
                });
            }
        }

        out.push(RunDir {
            path: dir.to_path_buf(),
            data_file,
            parameters,
        });
    }

    if out.len() > 1 {
        let last = &out[out.len() - 1];
        log::info!(
            "Labelling output with parameters from {} (name={})",
            last.path.display(),
            last.parameters.name
        );
    }

    Ok(RunSet { dirs: out })
}

/// Convenience: scan the directories and read all their records.
pub fn load_run_dirs<P: AsRef<Path>>(dirs: &[P]) -> Result<(RunSet, Vec<RunRecord>), LoadError> {
    let set = scan_run_dirs(dirs)?;
    let records = set.load_records()?;
    Ok((set, records))
}

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    if !path.is_file() {
        return Err(LoadError::MissingFile(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&sanitize_non_finite(&text)).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the bare `NaN` / `Infinity` / `-Infinity` tokens that Python's
/// `json` module emits with `null`. Text inside strings is left alone.
pub fn sanitize_non_finite(text: &str) -> Cow<'_, str> {
    const TOKENS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

    if !text.contains("NaN") && !text.contains("Infinity") {
        return Cow::Borrowed(text);
    }

    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        if b == b'"' {
            in_string = true;
            i += 1;
            continue;
        }
        match TOKENS.iter().find(|t| bytes[i..].starts_with(t.as_bytes())) {
            Some(tok) => {
                out.push_str(&text[copied..i]);
                out.push_str("null");
                i += tok.len();
                copied = i;
            }
            None => i += 1,
        }
    }
    out.push_str(&text[copied..]);
    Cow::Owned(out)
}
