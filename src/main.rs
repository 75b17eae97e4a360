//! add-noise - synthesize noisy speech from clean/noise corpora.
//!
//! For every clean WAV an SNR is drawn from the configured range and a noise
//! file is picked at random; the pair is mixed and written to the save
//! directory as `{clean_stem}_{noise_stem}_{snr:.2}.wav`.

use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};

use noisemix::config::DEFAULT_SNR_RANGE;
use noisemix::mixer::PlacementScheme;
use noisemix::pipeline::{run, PipelineConfig};

const USAGE: &str = "\
Usage: add-noise --clean-dir DIR --noise-dir DIR --save-dir DIR [options]

Options:
  --clean-dir, -cd DIR        clean waveform directory (required)
  --clean-dir-depth, -cdd N   depth of clean directory (default: 2)
  --noise-dir, -nd DIR        noise waveform directory (required)
  --noise-dir-depth, -ndd N   depth of noise directory (default: 1)
  --save-dir, -sd DIR         output directory (required)
  --seed N                    random seed (default: 0)
  --snr-range, -snr LOW HIGH  SNR range in dB (default: -5 20)
  --scheme, -sc NAME          repeat_noise | sample_noise (default: repeat_noise)
  --jobs, -j N                worker threads (default: 1)
  --help, -h                  print this message";

fn value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(|s| s.as_str())
        .with_context(|| format!("missing value for {}\n{}", flag, USAGE))
}

fn parse_args(args: &[String]) -> Result<PipelineConfig> {
    let mut clean_dir = None;
    let mut clean_dir_depth = 2;
    let mut noise_dir = None;
    let mut noise_dir_depth = 1;
    let mut save_dir = None;
    let mut seed = 0u64;
    let mut snr_range = DEFAULT_SNR_RANGE;
    let mut scheme = PlacementScheme::RepeatTile;
    let mut jobs = 1usize;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--clean-dir" | "-cd" => clean_dir = Some(PathBuf::from(value(args, &mut i)?)),
            "--clean-dir-depth" | "-cdd" => {
                clean_dir_depth = value(args, &mut i)?
                    .parse()
                    .context("invalid --clean-dir-depth")?
            }
            "--noise-dir" | "-nd" => noise_dir = Some(PathBuf::from(value(args, &mut i)?)),
            "--noise-dir-depth" | "-ndd" => {
                noise_dir_depth = value(args, &mut i)?
                    .parse()
                    .context("invalid --noise-dir-depth")?
            }
            "--save-dir" | "-sd" => save_dir = Some(PathBuf::from(value(args, &mut i)?)),
            "--seed" => seed = value(args, &mut i)?.parse().context("invalid --seed")?,
            "--snr-range" | "-snr" => {
                let low = value(args, &mut i)?.parse().context("invalid SNR low")?;
                let high = value(args, &mut i)?.parse().context("invalid SNR high")?;
                if low > high {
                    bail!("SNR range low {} exceeds high {}", low, high);
                }
                snr_range = [low, high];
            }
            "--scheme" | "-sc" => scheme = value(args, &mut i)?.parse()?,
            "--jobs" | "-j" => jobs = value(args, &mut i)?.parse().context("invalid --jobs")?,
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => bail!("unknown argument: {}\n{}", other, USAGE),
        }
        i += 1;
    }

    let missing = |flag: &str| format!("{} is required\n{}", flag, USAGE);
    Ok(PipelineConfig {
        clean_dir: clean_dir.with_context(|| missing("--clean-dir"))?,
        clean_dir_depth,
        noise_dir: noise_dir.with_context(|| missing("--noise-dir"))?,
        noise_dir_depth,
        save_dir: save_dir.with_context(|| missing("--save-dir"))?,
        seed,
        snr_range,
        scheme,
        jobs,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Vec<String> = env::args().skip(1).collect();
    let config = parse_args(&args)?;
    run(&config)
}
