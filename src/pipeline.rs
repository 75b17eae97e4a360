//! Batch driver - enumerate clean/noise pairs, mix, and write results.
//!
//! Pairing, SNR, and per-item seeds are all drawn from one master generator
//! on the coordinating thread, in enumeration order. Workers never touch the
//! master generator; each job carries its own seed and each worker rebuilds a
//! fresh generator from it before mixing. Output bytes are therefore
//! identical for a given seed no matter how many workers run.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;

use anyhow::{anyhow, ensure, Context, Result};
use crossbeam::channel;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::wav::{read_audio, write_audio};
use crate::config::PROGRESS_INTERVAL;
use crate::files::list_files;
use crate::mixer::{mix, PlacementScheme};

/// Configuration for one add-noise run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub clean_dir: PathBuf,
    pub clean_dir_depth: usize,
    pub noise_dir: PathBuf,
    pub noise_dir_depth: usize,
    pub save_dir: PathBuf,
    pub seed: u64,
    pub snr_range: [f32; 2],
    pub scheme: PlacementScheme,
    pub jobs: usize,
}

/// One clean/noise pairing with everything a worker needs, fixed up front by
/// the master generator.
#[derive(Debug)]
struct MixJob {
    clean_path: PathBuf,
    noise_path: PathBuf,
    snr_db: f32,
    item_seed: u64,
}

/// Output name: `{clean_stem}_{noise_stem}_{snr:.2}.wav`.
fn output_name(clean_path: &Path, noise_path: &Path, snr_db: f32) -> String {
    let stem = |p: &Path| {
        p.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    format!("{}_{}_{:.2}.wav", stem(clean_path), stem(noise_path), snr_db)
}

fn process_job(job: &MixJob, config: &PipelineConfig) -> Result<()> {
    let clean = read_audio(&job.clean_path)
        .with_context(|| format!("reading clean file {}", job.clean_path.display()))?;
    let noise = read_audio(&job.noise_path)
        .with_context(|| format!("reading noise file {}", job.noise_path.display()))?;

    let mut rng = StdRng::seed_from_u64(job.item_seed);
    let distorted = mix(&clean, &noise, job.snr_db, config.scheme, &mut rng).with_context(|| {
        format!(
            "mixing {} with {}",
            job.clean_path.display(),
            job.noise_path.display()
        )
    })?;

    let save_path = config
        .save_dir
        .join(output_name(&job.clean_path, &job.noise_path, job.snr_db));
    write_audio(&distorted, &save_path)
        .with_context(|| format!("writing {}", save_path.display()))?;
    debug!("wrote {}", save_path.display());
    Ok(())
}

/// Run a full add-noise pass. Fails fast: the first bad pair aborts the run
/// with the offending paths in the error chain.
pub fn run(config: &PipelineConfig) -> Result<()> {
    let clean_list = list_files(&config.clean_dir, config.clean_dir_depth)
        .with_context(|| format!("listing clean dir {}", config.clean_dir.display()))?;
    let noise_list = list_files(&config.noise_dir, config.noise_dir_depth)
        .with_context(|| format!("listing noise dir {}", config.noise_dir.display()))?;
    ensure!(
        !noise_list.is_empty(),
        "no noise files found in {}",
        config.noise_dir.display()
    );
    std::fs::create_dir_all(&config.save_dir)?;

    let [snr_low, snr_high] = config.snr_range;
    ensure!(
        snr_low <= snr_high,
        "invalid SNR range: {} > {}",
        snr_low,
        snr_high
    );

    // All random draws happen here, in enumeration order, before any worker
    // starts.
    let mut master = StdRng::seed_from_u64(config.seed);
    let jobs: Vec<MixJob> = clean_list
        .iter()
        .map(|clean_path| {
            let snr_db = if snr_low < snr_high {
                master.gen_range(snr_low..snr_high)
            } else {
                snr_low
            };
            let noise_idx = master.gen_range(0..noise_list.len());
            MixJob {
                clean_path: clean_path.clone(),
                noise_path: noise_list[noise_idx].clone(),
                snr_db,
                item_seed: master.gen(),
            }
        })
        .collect();

    let total = jobs.len();
    let workers = config.jobs.max(1).min(total.max(1));
    info!(
        "mixing {} clean files with {} noise files across {} worker{}",
        total,
        noise_list.len(),
        workers,
        if workers == 1 { "" } else { "s" }
    );

    let (tx, rx) = channel::unbounded::<MixJob>();
    let completed = AtomicU64::new(0);
    let failed = AtomicBool::new(false);

    thread::scope(|scope| -> Result<()> {
        let mut handles = Vec::new();
        for _ in 0..workers {
            let rx = rx.clone();
            let completed = &completed;
            let failed = &failed;
            handles.push(scope.spawn(move || -> Result<()> {
                while let Ok(job) = rx.recv() {
                    if failed.load(Ordering::SeqCst) {
                        break;
                    }
                    if let Err(e) = process_job(&job, config) {
                        failed.store(true, Ordering::SeqCst);
                        return Err(e);
                    }
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if done % PROGRESS_INTERVAL == 0 || done as usize == total {
                        info!("mixed {}/{} pairs", done, total);
                    }
                }
                Ok(())
            }));
        }
        drop(rx);

        for job in jobs {
            if tx.send(job).is_err() {
                break;
            }
        }
        drop(tx);

        let mut result = Ok(());
        for handle in handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if result.is_ok() {
                        result = Err(e);
                    }
                }
                Err(_) => {
                    if result.is_ok() {
                        result = Err(anyhow!("mixing worker panicked"));
                    }
                }
            }
        }
        result
    })?;

    info!(
        "add noise done, SNR range {} dB to {} dB",
        snr_low, snr_high
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::waveform::Waveform;
    use std::f32::consts::PI;
    use std::fs;

    fn write_sine(path: &Path, n: usize, freq: f32, amplitude: f32) {
        let samples = (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f32 / 16000.0).sin())
            .collect();
        write_audio(&Waveform::from_mono(samples, 16000), path).unwrap();
    }

    fn fixture_config(root: &Path, save_dir: PathBuf, jobs: usize) -> PipelineConfig {
        PipelineConfig {
            clean_dir: root.join("clean"),
            clean_dir_depth: 1,
            noise_dir: root.join("noise"),
            noise_dir_depth: 1,
            save_dir,
            seed: 42,
            snr_range: [-5.0, 20.0],
            scheme: PlacementScheme::RepeatTile,
            jobs,
        }
    }

    fn build_fixture(root: &Path) {
        fs::create_dir(root.join("clean")).unwrap();
        fs::create_dir(root.join("noise")).unwrap();
        write_sine(&root.join("clean").join("utt_a.wav"), 4000, 1000.0, 0.5);
        write_sine(&root.join("clean").join("utt_b.wav"), 2500, 440.0, 0.4);
        write_sine(&root.join("noise").join("hum.wav"), 1000, 50.0, 0.8);
    }

    fn read_outputs(dir: &Path) -> Vec<(String, Vec<u8>)> {
        let mut out: Vec<(String, Vec<u8>)> = fs::read_dir(dir)
            .unwrap()
            .map(|e| {
                let path = e.unwrap().path();
                (
                    path.file_name().unwrap().to_string_lossy().into_owned(),
                    fs::read(&path).unwrap(),
                )
            })
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_run_writes_one_output_per_clean_file() {
        let dir = tempfile::tempdir().unwrap();
        build_fixture(dir.path());
        let config = fixture_config(dir.path(), dir.path().join("out"), 1);
        run(&config).unwrap();

        let outputs = read_outputs(&config.save_dir);
        assert_eq!(outputs.len(), 2);
        assert!(outputs[0].0.starts_with("utt_a_hum_"));
        assert!(outputs[1].0.starts_with("utt_b_hum_"));
        assert!(outputs.iter().all(|(name, _)| name.ends_with(".wav")));
    }

    #[test]
    fn test_same_seed_same_bytes_across_worker_counts() {
        let dir = tempfile::tempdir().unwrap();
        build_fixture(dir.path());

        let serial = fixture_config(dir.path(), dir.path().join("out1"), 1);
        run(&serial).unwrap();
        let again = fixture_config(dir.path(), dir.path().join("out2"), 1);
        run(&again).unwrap();
        let parallel = fixture_config(dir.path(), dir.path().join("out4"), 4);
        run(&parallel).unwrap();

        let a = read_outputs(&serial.save_dir);
        let b = read_outputs(&again.save_dir);
        let c = read_outputs(&parallel.save_dir);
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_empty_noise_dir_aborts() {
        let dir = tempfile::tempdir().unwrap();
        build_fixture(dir.path());
        fs::remove_file(dir.path().join("noise").join("hum.wav")).unwrap();
        let config = fixture_config(dir.path(), dir.path().join("out"), 1);
        assert!(run(&config).is_err());
    }

    #[test]
    fn test_output_name_format() {
        let name = output_name(
            Path::new("/data/clean/spk/utt1.wav"),
            Path::new("/data/noise/babble.wav"),
            3.141,
        );
        assert_eq!(name, "utt1_babble_3.14.wav");
    }
}
