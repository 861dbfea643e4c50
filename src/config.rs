use std::path::{Path, PathBuf};

use crate::cli::Args;
use crate::data::model::Parameters;

/// Default location of the aggregated table cache, relative to the
/// working directory.
pub const DEFAULT_CACHE: &str = ".mbss.parquet";
/// Default root for figure directories.
pub const DEFAULT_FIGURES: &str = "figures";

/// Resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub dirs: Vec<PathBuf>,
    pub use_cache: bool,
    pub show: bool,
    pub cache_path: PathBuf,
    pub figures_root: PathBuf,
}

impl RunConfig {
    pub fn from_args(args: Args) -> Self {
        Self {
            dirs: args.dirs,
            use_cache: args.pickle,
            show: args.show,
            cache_path: args.cache.unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE)),
            figures_root: args
                .figures
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FIGURES)),
        }
    }

    /// `<figures>/<name>_<date>_<git sha>` for the given parameters.
    pub fn figure_dir(&self, labels: &Parameters) -> PathBuf {
        figure_dir(&self.figures_root, labels)
    }
}

pub fn figure_dir(root: &Path, labels: &Parameters) -> PathBuf {
    root.join(format!("{}_{}_{}", labels.name, labels.date, labels.git_sha))
}
