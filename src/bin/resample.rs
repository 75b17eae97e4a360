//! resample - convert a directory of WAV files to a target sample rate.

use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use log::info;
use ndarray::{s, Array2};

use noisemix::audio::resample::resample;
use noisemix::audio::wav::{read_audio, write_audio};
use noisemix::audio::waveform::Waveform;
use noisemix::config::DEFAULT_SAMPLE_RATE;
use noisemix::files::list_files;

const USAGE: &str = "\
Usage: resample --input-dir DIR --save-dir DIR [--sample-rate HZ]

Options:
  --input-dir, -i DIR     input wave directory (required)
  --save-dir, -o DIR      output wave directory (required)
  --sample-rate, -sr HZ   target rate (default: 16000)
  --help, -h              print this message";

struct ResampleArgs {
    input_dir: PathBuf,
    save_dir: PathBuf,
    sample_rate: u32,
}

fn value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(|s| s.as_str())
        .with_context(|| format!("missing value for {}\n{}", flag, USAGE))
}

fn parse_args(args: &[String]) -> Result<ResampleArgs> {
    let mut input_dir = None;
    let mut save_dir = None;
    let mut sample_rate = DEFAULT_SAMPLE_RATE;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input-dir" | "-i" => input_dir = Some(PathBuf::from(value(args, &mut i)?)),
            "--save-dir" | "-o" => save_dir = Some(PathBuf::from(value(args, &mut i)?)),
            "--sample-rate" | "-sr" => {
                sample_rate = value(args, &mut i)?
                    .parse()
                    .context("invalid --sample-rate")?
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => bail!("unknown argument: {}\n{}", other, USAGE),
        }
        i += 1;
    }

    let missing = |flag: &str| format!("{} is required\n{}", flag, USAGE);
    Ok(ResampleArgs {
        input_dir: input_dir.with_context(|| missing("--input-dir"))?,
        save_dir: save_dir.with_context(|| missing("--save-dir"))?,
        sample_rate,
    })
}

/// Resample every channel of a waveform to the target rate.
fn resample_waveform(wav: &Waveform, sample_rate: u32) -> Result<Waveform> {
    let mut channels: Vec<Vec<f32>> = Vec::with_capacity(wav.n_channels());
    for column in wav.data().columns() {
        channels.push(resample(&column.to_vec(), wav.sample_rate(), sample_rate)?);
    }

    let frames = channels.first().map(|c| c.len()).unwrap_or(0);
    let mut data = Array2::zeros((frames, channels.len()));
    for (c, channel) in channels.iter().enumerate() {
        data.slice_mut(s![.., c])
            .assign(&ndarray::ArrayView1::from(&channel[..]));
    }
    Ok(Waveform::new(data, sample_rate))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Vec<String> = env::args().skip(1).collect();
    let args = parse_args(&args)?;

    let wav_list = list_files(&args.input_dir, 1)
        .with_context(|| format!("listing {}", args.input_dir.display()))?;
    std::fs::create_dir_all(&args.save_dir)?;

    for path in &wav_list {
        let wav = read_audio(path).with_context(|| format!("reading {}", path.display()))?;
        let resampled = resample_waveform(&wav, args.sample_rate)
            .with_context(|| format!("resampling {}", path.display()))?;
        let name = path
            .file_name()
            .with_context(|| format!("bad file name in {}", path.display()))?;
        let save_path = args.save_dir.join(name);
        write_audio(&resampled, &save_path)
            .with_context(|| format!("writing {}", save_path.display()))?;
    }

    info!(
        "resampled {} waveforms to {} kHz",
        wav_list.len(),
        args.sample_rate / 1000
    );
    Ok(())
}
