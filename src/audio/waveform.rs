use serde::Serialize;

use crate::audio::buffer::SampleBuffer;
use crate::error::EngineError;

/// Min/max amplitude extremes for one output pixel column.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PeakPair {
    pub min: f32,
    pub max: f32,
}

/// Decimate a sample range into `output_width` min/max peak pairs.
///
/// `start_secs`/`end_secs` clamp to the buffer duration; the drawing step is
/// an external concern, this only produces numbers. Pure and deterministic,
/// so it is safe to call repeatedly at different pan/zoom.
pub fn summarize(
    buffer: &SampleBuffer,
    start_secs: f64,
    end_secs: f64,
    channel: usize,
    output_width: usize,
) -> Result<Vec<PeakPair>, EngineError> {
    if channel >= buffer.channel_count() {
        return Err(EngineError::InvalidRange(format!(
            "channel {} out of range ({} available)",
            channel,
            buffer.channel_count()
        )));
    }
    let duration = buffer.duration_secs();
    let start = start_secs.clamp(0.0, duration);
    let end = end_secs.clamp(0.0, duration);
    if end <= start {
        return Err(EngineError::InvalidRange(format!(
            "cannot summarize [{start_secs:.3}, {end_secs:.3}]"
        )));
    }
    if output_width == 0 {
        return Ok(Vec::new());
    }

    let rate = buffer.sample_rate() as f64;
    let samples = buffer.channel(channel);
    let first = (start * rate) as usize;
    let last = ((end * rate) as usize).min(samples.len());
    let sample_count = last.saturating_sub(first);
    let step = sample_count.div_ceil(output_width).max(1);

    let mut peaks = Vec::with_capacity(output_width);
    for column in 0..output_width {
        let lo = first + column * step;
        let hi = (lo + step).min(last);
        if lo >= hi {
            // Column has no underlying samples (range narrower than width)
            peaks.push(PeakPair { min: 0.0, max: 0.0 });
            continue;
        }
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for &sample in &samples[lo..hi] {
            min = min.min(sample);
            max = max.max(sample);
        }
        peaks.push(PeakPair { min, max });
    }
    Ok(peaks)
}
