#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

pub fn unique_dir(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "mbss_plot_{}_{}_{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    fs::create_dir_all(&path).unwrap();
    path
}

pub fn record(algorithm: &str, n_targets: u32, n_mics: u32, runtime: f64) -> Value {
    json!({
        "algorithm": algorithm,
        "n_targets": n_targets,
        "n_mics": n_mics,
        "rt60": 0.3,
        "sinr": 10,
        "seed": 12345,
        "runtime": runtime,
        "n_samples": 16000,
        "sdr": [[0.0, 2.0], [3.0, 5.0], [6.0, 8.0]],
        "sir": [[1.0, 1.0], [10.0, 12.0]],
    })
}

pub fn parameters(fs: f64, name: &str) -> Value {
    json!({
        "fs": fs,
        "name": name,
        "_date": "20190301-101010",
        "_git_sha": "deadbee",
        "rt60_list": [0.3],
        "sinr_list": [10],
        "room_dim": [10.0, 7.5, 3.0],
        "n_interferers": 10,
    })
}

/// Write a run directory with the given segments and parameters.
pub fn write_run_dir(dir: &Path, segments: &[Vec<Value>], params: &Value) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("data.json"), serde_json::to_string(segments).unwrap()).unwrap();
    fs::write(dir.join("parameters.json"), params.to_string()).unwrap();
}
