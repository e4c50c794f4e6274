use crate::error::EngineError;

/// Immutable multichannel PCM view shared by every engine pass.
///
/// Channels are stored as independent sample arrays (not interleaved) so the
/// split finder and summarizer can scan a single channel without striding.
/// Samples are floats in [-1, 1]; the engine never mutates the buffer.
#[derive(Clone, Debug)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Wrap per-channel sample arrays. All channels must be the same length.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self, EngineError> {
        if sample_rate == 0 {
            return Err(EngineError::InvalidRange("sample rate must be non-zero".into()));
        }
        let frame_count = match channels.first() {
            Some(first) => first.len(),
            None => return Err(EngineError::InvalidRange("buffer needs at least one channel".into())),
        };
        if channels.iter().any(|c| c.len() != frame_count) {
            return Err(EngineError::InvalidRange(
                "all channels must carry the same number of frames".into(),
            ));
        }
        Ok(Self { channels, sample_rate })
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frames per channel.
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Samples of one channel. Callers validate user-supplied indices first.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }
}
