mod common;

use std::fs;

use mbss_plot::config::RunConfig;
use mbss_plot::data::model::{Algorithm, COLUMNS};
use mbss_plot::pipeline::prepare;

use common::{parameters, record, unique_dir, write_run_dir};

fn config(root: &std::path::Path, dirs: Vec<std::path::PathBuf>, use_cache: bool) -> RunConfig {
    RunConfig {
        dirs,
        use_cache,
        show: false,
        cache_path: root.join("table.parquet"),
        figures_root: root.join("figures"),
    }
}

#[test]
fn two_directories_give_one_row_per_algorithm() {
    let root = unique_dir("e2e_two_dirs");
    let a = root.join("run_a");
    let b = root.join("run_b");
    write_run_dir(&a, &[vec![record("auxiva_laplace", 2, 4, 2.0)]], &parameters(16000.0, "a"));
    write_run_dir(&b, &[vec![record("overiva_laplace", 2, 4, 1.0)]], &parameters(16000.0, "b"));

    let prepared = prepare(&config(&root, vec![a, b], false)).unwrap();
    fs::remove_dir_all(&root).ok();

    let rows = &prepared.table.rows;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].algorithm, Algorithm::AuxIvaLaplace);
    assert_eq!(rows[1].algorithm, Algorithm::OverIvaLaplace);
    for row in rows {
        assert_eq!(row.rt60, 0.3);
        assert_eq!(row.sinr, 10.0);
        assert_eq!(row.mics, 4);
        assert_eq!(row.sources, 2);
    }
    assert!((rows[0].runtime - 2.0).abs() < 1e-12);
    assert!((rows[0].sdr_improvement - 6.0).abs() < 1e-12);
    assert!((rows[0].sir - 11.0).abs() < 1e-12);

    assert_eq!(prepared.conditions().len(), 1);
    let report = prepared.report.as_ref().unwrap();
    assert_eq!(report.total, 2);
    assert!(report.dropped.is_empty());
}

#[test]
fn cached_table_matches_the_fresh_one() {
    let root = unique_dir("e2e_cache");
    let run = root.join("run");
    let mut broken = record("ogive_laplace", 1, 2, 1.0);
    broken["sdr"] = serde_json::json!([]);
    write_run_dir(
        &run,
        &[
            vec![record("auxiva_gauss", 1, 2, 0.5), broken],
            vec![record("auxiva_pca_laplace", 2, 3, f64::NAN)],
        ],
        &parameters(16000.0, "cache"),
    );

    let fresh = prepare(&config(&root, vec![run.clone()], false)).unwrap();
    assert_eq!(fresh.table.len(), 2);
    assert_eq!(fresh.report.as_ref().unwrap().dropped.len(), 1);
    assert!(root.join("table.parquet").is_file());

    // Remove the records: the cached run must not need them.
    fs::write(run.join("data.json"), "[]").unwrap();
    let cached = prepare(&config(&root, vec![run], true)).unwrap();
    fs::remove_dir_all(&root).ok();

    assert!(cached.report.is_none());
    assert_eq!(cached.table.column_names(), &COLUMNS[..]);
    assert_eq!(cached.table.len(), fresh.table.len());
    for (c, f) in cached.table.rows.iter().zip(&fresh.table.rows) {
        assert_eq!(c.algorithm, f.algorithm);
        assert_eq!((c.sources, c.mics, c.seed), (f.sources, f.mics, f.seed));
        assert_eq!(c.runtime.is_nan(), f.runtime.is_nan());
        assert_eq!(c.sdr, f.sdr);
        assert_eq!(c.sir_improvement, f.sir_improvement);
    }
}

#[test]
fn cache_flag_without_cache_file_rebuilds() {
    let root = unique_dir("e2e_no_cache");
    let run = root.join("run");
    write_run_dir(&run, &[vec![record("overiva_gauss", 1, 2, 1.0)]], &parameters(16000.0, "x"));

    let prepared = prepare(&config(&root, vec![run], true)).unwrap();
    let cache_written = root.join("table.parquet").is_file();
    fs::remove_dir_all(&root).ok();

    assert!(prepared.report.is_some());
    assert_eq!(prepared.table.len(), 1);
    assert!(cache_written);
}
