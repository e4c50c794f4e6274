use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::EngineError;
use crate::video::source::{FramePixels, FrameSource};

/// Frame access over an `ffmpeg` subprocess.
///
/// Duration and dimensions are probed once with `ffprobe`; each seek runs a
/// blocking single-frame decode into raw RGBA. One seek at a time, which is
/// all the brightness prober ever issues.
pub struct FfmpegVideoSource {
    path: PathBuf,
    width: u32,
    height: u32,
    duration_secs: f64,
    current: Option<FramePixels>,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    streams: Vec<ProbeStream>,
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: String,
}

impl FfmpegVideoSource {
    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let output = Command::new("ffprobe")
            .args([
                "-v", "error",
                "-select_streams", "v:0",
                "-show_entries", "stream=width,height",
                "-show_entries", "format=duration",
                "-of", "json",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                EngineError::Decode(format!("failed to run ffprobe. Is ffmpeg installed? {e}"))
            })?;

        if !output.status.success() {
            return Err(EngineError::Decode(format!(
                "ffprobe failed for {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let probe: ProbeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| EngineError::Decode(format!("unexpected ffprobe output: {e}")))?;
        let stream = probe
            .streams
            .first()
            .ok_or_else(|| EngineError::Decode(format!("no video stream in {}", path.display())))?;
        let duration_secs: f64 = probe
            .format
            .duration
            .parse()
            .map_err(|e| EngineError::Decode(format!("unparseable duration: {e}")))?;

        log::info!(
            "Opened video: {}x{}, {:.2}s",
            stream.width,
            stream.height,
            duration_secs
        );

        Ok(Self {
            path: path.to_path_buf(),
            width: stream.width,
            height: stream.height,
            duration_secs,
            current: None,
        })
    }
}

impl FrameSource for FfmpegVideoSource {
    fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    fn seek(&mut self, time_secs: f64) -> Result<(), EngineError> {
        let output = Command::new("ffmpeg")
            .args(["-v", "error", "-ss", &format!("{time_secs:.3}")])
            .arg("-i")
            .arg(&self.path)
            .args(["-frames:v", "1", "-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                EngineError::Decode(format!("failed to spawn ffmpeg. Is ffmpeg installed? {e}"))
            })?;

        if !output.status.success() {
            return Err(EngineError::Decode(format!(
                "ffmpeg seek to {time_secs:.3}s failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let expected = self.width as usize * self.height as usize * 4;
        if output.stdout.len() != expected {
            return Err(EngineError::Decode(format!(
                "frame at {time_secs:.3}s decoded to {} byte(s), expected {expected}",
                output.stdout.len()
            )));
        }

        self.current = Some(FramePixels {
            width: self.width,
            height: self.height,
            rgba: output.stdout,
        });
        Ok(())
    }

    fn read_frame(&mut self) -> Result<FramePixels, EngineError> {
        self.current
            .clone()
            .ok_or_else(|| EngineError::Decode("no frame ready; seek first".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ffprobe_json() {
        let raw = r#"{
            "streams": [{ "width": 1280, "height": 720 }],
            "format": { "duration": "12.480000" }
        }"#;
        let probe: ProbeOutput = serde_json::from_str(raw).unwrap();
        assert_eq!(probe.streams[0].width, 1280);
        assert_eq!(probe.streams[0].height, 720);
        assert!((probe.format.duration.parse::<f64>().unwrap() - 12.48).abs() < 1e-9);
    }
}
