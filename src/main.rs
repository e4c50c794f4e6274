mod audio;
mod bundle;
mod cli;
mod config;
mod error;
mod session;
mod video;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};

use cli::{Cli, Command};
use session::AudioAsset;
use video::ffmpeg::FfmpegVideoSource;

/// One row of manifest.json: maps an exported file back to its source range.
#[derive(Serialize)]
struct ManifestEntry {
    file: String,
    start_secs: f64,
    end_secs: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect syncprep.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = PathBuf::from("syncprep.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("syncprep").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("syncprep").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    let cfg = match config_path {
        Some(ref path) => match config::load_config(path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}", path.display());
                config::Config::default()
            }
        },
        None => config::Config::default(),
    };

    match cli.command {
        Command::Split {
            input,
            mut out_dir,
            mut max_segment,
            at,
            mut archive,
        } => {
            // Merge: config values apply only when CLI is at its default
            if max_segment == 15.0 {
                max_segment = cfg.split.max_segment_seconds;
            }
            if out_dir == Path::new("segments") {
                out_dir = cfg.export.out_dir.clone();
            }
            if !archive {
                archive = cfg.export.archive;
            }
            run_split(&input, &out_dir, max_segment, &at, archive)
        }
        Command::Peaks {
            input,
            mut width,
            channel,
            start,
            end,
            output,
        } => {
            if width == 800 {
                width = cfg.waveform.width;
            }
            run_peaks(&input, width, channel, start, end, output.as_deref())
        }
        Command::Frame { input, output } => run_frame(&input, &output),
    }
}

fn run_split(
    input: &Path,
    out_dir: &Path,
    max_segment: f64,
    manual: &[f64],
    archive: bool,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    log::info!("Input: {}", input.display());

    let buffer = audio::decode::decode_audio(input)?;
    let mut asset = AudioAsset::new(buffer);

    let detected = asset.auto_split(max_segment)?;
    log::info!(
        "Auto-split: {} point(s) over {:.1}s with max {:.1}s per segment",
        detected,
        asset.buffer().duration_secs(),
        max_segment
    );
    for &time in manual {
        asset
            .add_split(time)
            .with_context(|| format!("cannot add manual split at {time}s"))?;
    }

    let segments = asset.segments()?;
    log::info!("Sliced {} segment(s)", segments.len());

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");

    let mut manifest = Vec::with_capacity(segments.len());
    let mut entries: Vec<(String, Vec<u8>)> = Vec::with_capacity(segments.len());
    for (i, segment) in segments.into_iter().enumerate() {
        let name = format!("{stem}_{:02}.wav", i + 1);
        log::info!(
            "  {}: {:.2}s - {:.2}s",
            name,
            segment.start_secs,
            segment.end_secs
        );
        manifest.push(ManifestEntry {
            file: name.clone(),
            start_secs: segment.start_secs,
            end_secs: segment.end_secs,
        });
        entries.push((name, segment.bytes));
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let manifest_bytes =
        serde_json::to_vec_pretty(&manifest).context("failed to serialize manifest")?;

    if archive {
        entries.push(("manifest.json".to_string(), manifest_bytes));
        let archive_bytes = bundle::bundle(&entries)?;
        let zip_path = out_dir.join(format!("{stem}_segments.zip"));
        std::fs::write(&zip_path, archive_bytes)
            .with_context(|| format!("failed to write {}", zip_path.display()))?;
        log::info!("Done! Output: {}", zip_path.display());
    } else {
        let pb = ProgressBar::new(entries.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} segments")
                .unwrap()
                .progress_chars("=>-"),
        );
        for (name, bytes) in &entries {
            let path = out_dir.join(name);
            std::fs::write(&path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            pb.inc(1);
        }
        pb.finish_with_message("export complete");
        std::fs::write(out_dir.join("manifest.json"), manifest_bytes)
            .context("failed to write manifest.json")?;
        log::info!("Done! Output: {}", out_dir.display());
    }

    Ok(())
}

fn run_peaks(
    input: &Path,
    width: usize,
    channel: usize,
    start: f64,
    end: Option<f64>,
    output: Option<&Path>,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let buffer = audio::decode::decode_audio(input)?;
    let end = end.unwrap_or_else(|| buffer.duration_secs());
    let peaks = audio::waveform::summarize(&buffer, start, end, channel, width)?;

    let json = serde_json::to_string(&peaks).context("failed to serialize peaks")?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("Wrote {} peak pair(s) to {}", peaks.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_frame(input: &Path, output: &Path) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let mut source = FfmpegVideoSource::open(input)?;
    let frame = video::probe::extract_reference_frame(&mut source)?;
    std::fs::write(output, &frame.png)
        .with_context(|| format!("failed to write {}", output.display()))?;
    log::info!(
        "Done! Reference frame at {:.2}s -> {}",
        frame.timestamp_secs,
        output.display()
    );
    Ok(())
}
