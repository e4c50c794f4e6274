use crate::error::EngineError;

/// Raw RGBA pixels for one decoded frame.
#[derive(Clone, Debug)]
pub struct FramePixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Seekable video timeline the brightness prober walks.
///
/// `seek` returns once the frame at the requested time is ready; at most one
/// seek is in flight at a time. `read_frame` hands back the pixels of the
/// frame the last seek landed on.
pub trait FrameSource {
    fn duration_secs(&self) -> f64;

    fn seek(&mut self, time_secs: f64) -> Result<(), EngineError>;

    fn read_frame(&mut self) -> Result<FramePixels, EngineError>;
}
