use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub split: SplitConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub waveform: WaveformConfig,
}

#[derive(Debug, Deserialize)]
pub struct SplitConfig {
    #[serde(default = "default_max_segment")]
    pub max_segment_seconds: f64,
}

#[derive(Debug, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default)]
    pub archive: bool,
}

#[derive(Debug, Deserialize)]
pub struct WaveformConfig {
    #[serde(default = "default_waveform_width")]
    pub width: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_segment_seconds: default_max_segment(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            archive: false,
        }
    }
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            width: default_waveform_width(),
        }
    }
}

fn default_max_segment() -> f64 { 15.0 }
fn default_out_dir() -> PathBuf { PathBuf::from("segments") }
fn default_waveform_width() -> usize { 800 }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}
