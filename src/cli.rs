use std::path::PathBuf;

use clap::Parser;

/// Plot the data simulated by the multichannel separation experiment
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Read the aggregated data table from the cache instead of rebuilding it
    #[arg(short, long)]
    pub pickle: bool,

    /// Display the plots at the end of data analysis
    #[arg(short, long)]
    pub show: bool,

    /// Location of the aggregated table cache
    #[arg(long, value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// Root directory for the generated figures
    #[arg(long, value_name = "DIR")]
    pub figures: Option<PathBuf>,

    /// The directories containing the simulation output files
    #[arg(value_name = "DIR", required = true, num_args = 1..)]
    pub dirs: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_directories() {
        let args = Args::try_parse_from(["mbss-plot", "-p", "-s", "run_a", "run_b"]).unwrap();
        assert!(args.pickle);
        assert!(args.show);
        assert_eq!(args.dirs, vec![PathBuf::from("run_a"), PathBuf::from("run_b")]);
        assert!(args.cache.is_none());
    }

    #[test]
    fn requires_at_least_one_directory() {
        assert!(Args::try_parse_from(["mbss-plot", "--pickle"]).is_err());
    }

    #[test]
    fn accepts_path_overrides() {
        let args = Args::try_parse_from([
            "mbss-plot",
            "--cache",
            "/tmp/table.parquet",
            "--figures",
            "out",
            "run",
        ])
        .unwrap();
        assert_eq!(args.cache, Some(PathBuf::from("/tmp/table.parquet")));
        assert_eq!(args.figures, Some(PathBuf::from("out")));
        assert!(!args.pickle);
    }
}
