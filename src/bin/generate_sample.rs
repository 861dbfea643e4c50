//! Write a synthetic run directory (`data.json` + `parameters.json`) so the
//! plotting pipeline can be exercised without running the simulation.
//!
//! Usage: `generate_sample [OUT_DIR]` (default `sample_run`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;

use mbss_plot::data::loader::{DATA_FILE, PARAMETERS_FILE};
use mbss_plot::data::model::{Algorithm, Family, Parameters, RunRecord};

/// SplitMix64: enough randomness for fake separation scores.
struct Rng(u64);

impl Rng {
    fn uniform(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        ((z ^ (z >> 31)) >> 11) as f64 / (1u64 << 53) as f64
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let radius = (-2.0 * self.uniform().max(f64::MIN_POSITIVE).ln()).sqrt();
        let angle = std::f64::consts::TAU * self.uniform();
        mean + std_dev * radius * angle.cos()
    }
}

const FS: f64 = 16000.0;
const N_SAMPLES: u64 = 160_000;
const N_ITER: usize = 4;

/// Seconds of processing for one run, roughly following each family's
/// cost in the number of mics and sources.
fn runtime_model(family: &Family, sources: u32, mics: u32) -> f64 {
    let (k, m) = (sources as f64, mics as f64);
    let audio_s = N_SAMPLES as f64 / FS;
    let per_second = match family {
        Family::AuxIva => 0.02 * m * m,
        Family::PcaAuxIva => 0.02 * k * k + 0.005 * m,
        Family::OverIva => 0.02 * k * m + 0.005 * m,
        Family::Ogive => 0.05 * k * m,
        Family::Other(_) => 0.03 * m * m,
    };
    per_second * audio_s
}

fn iterations(rng: &mut Rng, sources: u32, gain: f64) -> Vec<Vec<f64>> {
    let initial: Vec<f64> = (0..sources).map(|_| rng.normal(0.0, 2.0)).collect();
    (0..N_ITER)
        .map(|it| {
            let frac = it as f64 / (N_ITER - 1) as f64;
            initial
                .iter()
                .map(|v| v + frac * rng.normal(gain, 1.5))
                .collect()
        })
        .collect()
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_run"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = Rng(42);

    let rt60_list = vec![0.0, 0.3];
    let sinr_list = vec![5.0, 10.0];
    let n_targets = [1u32, 2, 3];
    let n_mics = [2u32, 3, 4, 6];
    let seeds_per_segment = 3;

    // One segment per batch of seeds, like the parallel simulation output.
    let mut segments: Vec<Vec<RunRecord>> = vec![Vec::new(), Vec::new()];
    let mut seed: i64 = 1000;

    for (s_idx, segment) in segments.iter_mut().enumerate() {
        for _ in 0..seeds_per_segment {
            seed += 1;
            for &rt60 in &rt60_list {
                for &sinr in &sinr_list {
                    for &k in &n_targets {
                        for &m in n_mics.iter().filter(|&&m| m >= k) {
                            for algorithm in Algorithm::KNOWN {
                                let family = algorithm.family();
                                let gain = 8.0 - 10.0 * rt60 + 0.2 * sinr;
                                let base = runtime_model(&family, k, m);
                                let mut runtime = base * (1.0 + rng.normal(0.0, 0.05)).max(0.5);
                                // an occasional run without timing
                                if s_idx == 1 && seed % 7 == 0 && k == 1 && m == 2 {
                                    runtime = f64::NAN;
                                }

                                segment.push(RunRecord {
                                    algorithm,
                                    n_targets: k,
                                    n_mics: m,
                                    rt60,
                                    sinr,
                                    seed,
                                    runtime,
                                    n_samples: N_SAMPLES,
                                    sdr: iterations(&mut rng, k, gain),
                                    sir: iterations(&mut rng, k, gain + 5.0),
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    let extra = json!({
        "room_dim": [10.0, 7.5, 3.0],
        "n_interferers": 10,
        "n_blinkies": 40,
        "ref_mic": 0,
        "blinky_geometry": "grid",
    });
    let parameters = Parameters {
        fs: FS,
        name: "sample".into(),
        date: "20190101-000000".into(),
        git_sha: "0000000".into(),
        rt60_list,
        sinr_list,
        extra: extra.as_object().cloned().unwrap_or_default(),
    };

    let data_path = out_dir.join(DATA_FILE);
    let text = serde_json::to_string(&segments).context("encoding records")?;
    std::fs::write(&data_path, text).with_context(|| format!("writing {}", data_path.display()))?;

    let params_path = out_dir.join(PARAMETERS_FILE);
    let text = serde_json::to_string_pretty(&parameters).context("encoding parameters")?;
    std::fs::write(&params_path, text)
        .with_context(|| format!("writing {}", params_path.display()))?;

    let n: usize = segments.iter().map(|s| s.len()).sum();
    println!(
        "Wrote {n} records in {} segments to {}",
        segments.len(),
        out_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_is_deterministic_and_in_unit_interval() {
        let (mut a, mut b) = (Rng(7), Rng(7));
        for _ in 0..1000 {
            let u = a.uniform();
            assert_eq!(u, b.uniform());
            assert!((0.0..1.0).contains(&u));
        }
        assert!(Rng(1).normal(0.0, 1.0).is_finite());
    }

    #[test]
    fn iterations_have_one_value_per_source() {
        let mut rng = Rng(3);
        let sdr = iterations(&mut rng, 2, 8.0);
        assert_eq!(sdr.len(), N_ITER);
        assert!(sdr.iter().all(|it| it.len() == 2));
    }
}
