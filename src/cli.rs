use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "syncprep", about = "Prepares audio and video assets for AI lip-sync pipelines")]
pub struct Cli {
    /// Config file (defaults to syncprep.toml or the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split an audio file into bounded-length WAV segments at quiet points
    Split {
        /// Input audio file (WAV, MP3, FLAC, OGG, AAC)
        input: PathBuf,

        /// Output directory for segment WAVs and the manifest
        #[arg(short, long, default_value = "segments")]
        out_dir: PathBuf,

        /// Maximum segment duration in seconds (recommended 5-30)
        #[arg(long, default_value_t = 15.0)]
        max_segment: f64,

        /// Extra manual split times in seconds (comma-separated)
        #[arg(long, value_delimiter = ',')]
        at: Vec<f64>,

        /// Pack segments and manifest into a single zip archive
        #[arg(long)]
        archive: bool,
    },

    /// Emit min/max waveform peaks for a sample range as JSON
    Peaks {
        /// Input audio file
        input: PathBuf,

        /// Number of output columns
        #[arg(long, default_value_t = 800)]
        width: usize,

        /// Channel to summarize
        #[arg(long, default_value_t = 0)]
        channel: usize,

        /// Range start in seconds
        #[arg(long, default_value_t = 0.0)]
        start: f64,

        /// Range end in seconds (defaults to the full duration)
        #[arg(long)]
        end: Option<f64>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract the last non-black frame of a video as a PNG reference image
    Frame {
        /// Input video file
        input: PathBuf,

        /// Output image path
        #[arg(short, long, default_value = "reference.png")]
        output: PathBuf,
    },
}
