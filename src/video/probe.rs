use crate::error::EngineError;
use crate::video::source::{FramePixels, FrameSource};

/// The first probe lands just shy of the clip end.
const INITIAL_OFFSET_SECS: f64 = 0.05;
/// Backward step between retries.
const RETRY_STEP_SECS: f64 = 0.1;
/// Average luma a frame must clear to count as non-black.
const MIN_BRIGHTNESS: f64 = 10.0;
/// At or below this timestamp the current frame is accepted regardless.
const FORCED_ACCEPT_SECS: f64 = 0.5;

/// The accepted reference frame: timestamp plus encoded PNG bytes.
#[derive(Clone, Debug)]
pub struct ExtractedFrame {
    pub timestamp_secs: f64,
    pub png: Vec<u8>,
}

/// Walk backward from the end of the clip until a frame's average luminance
/// clears the black threshold, then encode that frame as a PNG.
///
/// Generated clips often fade to black at the very end; stepping back in
/// 0.1s increments finds the last usable frame. The floor near the clip
/// start bounds the search: an all-black clip still terminates, accepting
/// whatever frame is current once the cursor reaches 0.5s. Each retry waits
/// for the prior seek to complete before issuing the next.
pub fn extract_reference_frame(
    source: &mut dyn FrameSource,
) -> Result<ExtractedFrame, EngineError> {
    let mut cursor = (source.duration_secs() - INITIAL_OFFSET_SECS).max(0.0);
    loop {
        source.seek(cursor)?;
        let frame = source.read_frame()?;
        let brightness = average_luma(&frame);
        if brightness >= MIN_BRIGHTNESS || cursor <= FORCED_ACCEPT_SECS {
            log::info!(
                "Reference frame at {:.2}s (brightness {:.1})",
                cursor,
                brightness
            );
            return Ok(ExtractedFrame {
                timestamp_secs: cursor,
                png: encode_png(&frame)?,
            });
        }
        cursor -= RETRY_STEP_SECS;
    }
}

/// Mean over all pixels of the per-pixel R/G/B average, on the 0-255 scale.
fn average_luma(frame: &FramePixels) -> f64 {
    let pixel_count = frame.rgba.len() / 4;
    if pixel_count == 0 {
        return 0.0;
    }
    let total: f64 = frame
        .rgba
        .chunks_exact(4)
        .map(|px| (px[0] as f64 + px[1] as f64 + px[2] as f64) / 3.0)
        .sum();
    total / pixel_count as f64
}

fn encode_png(frame: &FramePixels) -> Result<Vec<u8>, EngineError> {
    let image = image::RgbaImage::from_raw(frame.width, frame.height, frame.rgba.clone())
        .ok_or_else(|| {
            EngineError::EncodeFailure("frame pixel buffer does not match its dimensions".into())
        })?;
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)?;
    Ok(bytes)
}
