use rayon::prelude::*;

use crate::audio::buffer::SampleBuffer;
use crate::audio::wav;
use crate::error::EngineError;

/// Slivers shorter than this are dropped by `slice_all` as rounding artifacts.
const MIN_SEGMENT_SECS: f64 = 0.1;

/// One sliced sub-clip, materialized as WAV bytes.
///
/// Segments have no lifecycle of their own: regenerating the owning split
/// list invalidates the whole batch.
#[derive(Clone, Debug)]
pub struct Segment {
    pub start_secs: f64,
    pub end_secs: f64,
    pub bytes: Vec<u8>,
}

/// Extract `[start_secs, end_secs)` and serialize it as a standalone WAV.
///
/// Sample indices past the source end read as silence: float rounding can
/// push the final segment slightly past the last sample, and that must not
/// fail the export.
pub fn slice(buffer: &SampleBuffer, start_secs: f64, end_secs: f64) -> Result<Vec<u8>, EngineError> {
    if start_secs < 0.0 || end_secs <= start_secs {
        return Err(EngineError::InvalidRange(format!(
            "cannot slice [{start_secs:.3}, {end_secs:.3}]"
        )));
    }

    let rate = buffer.sample_rate() as f64;
    let first = (start_secs * rate) as usize;
    let frame_count = ((end_secs - start_secs) * rate) as usize;

    let channels: Vec<Vec<f32>> = buffer
        .channels()
        .iter()
        .map(|source| {
            (0..frame_count)
                .map(|i| source.get(first + i).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    Ok(wav::encode_wav(&channels, buffer.sample_rate()))
}

/// Slice the whole buffer at the given ascending split times.
///
/// Boundaries are `[0, *splits, duration]`; consecutive pairs shorter than
/// 0.1s are dropped. Each pair only reads the shared immutable buffer, so the
/// per-segment work fans out across threads; order is preserved on collect.
pub fn slice_all(buffer: &SampleBuffer, splits: &[f64]) -> Result<Vec<Segment>, EngineError> {
    let duration = buffer.duration_secs();
    let mut bounds = Vec::with_capacity(splits.len() + 2);
    bounds.push(0.0);
    bounds.extend_from_slice(splits);
    bounds.push(duration);

    let ranges: Vec<(f64, f64)> = bounds
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .filter(|(start, end)| end - start >= MIN_SEGMENT_SECS)
        .collect();

    ranges
        .par_iter()
        .map(|&(start_secs, end_secs)| {
            slice(buffer, start_secs, end_secs).map(|bytes| Segment {
                start_secs,
                end_secs,
                bytes,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 8000;

    fn sine_buffer(duration_secs: f64, channels: usize) -> SampleBuffer {
        let frames = (duration_secs * RATE as f64) as usize;
        let data: Vec<Vec<f32>> = (0..channels)
            .map(|ch| {
                (0..frames)
                    .map(|i| {
                        let t = i as f64 / RATE as f64;
                        ((2.0 * std::f64::consts::PI * (110.0 * (ch + 1) as f64) * t).sin() * 0.6)
                            as f32
                    })
                    .collect()
            })
            .collect();
        SampleBuffer::new(data, RATE).unwrap()
    }

    fn pcm_frames(wav_bytes: &[u8], channels: usize) -> Vec<Vec<i16>> {
        let data = &wav_bytes[44..];
        data.chunks_exact(2 * channels)
            .map(|frame| {
                frame
                    .chunks_exact(2)
                    .map(|b| i16::from_le_bytes([b[0], b[1]]))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn slice_frame_count_follows_range() {
        let buffer = sine_buffer(2.0, 1);
        let bytes = slice(&buffer, 0.25, 0.75).unwrap();
        let frames = pcm_frames(&bytes, 1);
        assert_eq!(frames.len(), (0.5 * RATE as f64) as usize);
    }

    #[test]
    fn slice_reads_source_at_the_right_offset() {
        let buffer = sine_buffer(2.0, 1);
        let bytes = slice(&buffer, 0.5, 1.0).unwrap();
        let frames = pcm_frames(&bytes, 1);
        let first_source = (0.5 * RATE as f64) as usize;
        let source = buffer.channel(0);
        for (i, frame) in frames.iter().enumerate() {
            let expected = source[first_source + i];
            let decoded = frame[0] as f32 / if frame[0] < 0 { 32768.0 } else { 32767.0 };
            assert!((decoded - expected).abs() <= 1.0 / 32767.0);
        }
    }

    #[test]
    fn slice_past_buffer_end_zero_fills() {
        let buffer = sine_buffer(1.0, 1);
        let bytes = slice(&buffer, 0.9, 1.1).unwrap();
        let frames = pcm_frames(&bytes, 1);
        assert_eq!(frames.len(), (0.2 * RATE as f64) as usize);
        // Everything past the real buffer end decodes as silence
        let real = (0.1 * RATE as f64) as usize;
        for frame in &frames[real..] {
            assert_eq!(frame[0], 0);
        }
    }

    #[test]
    fn slice_rejects_nonsense_ranges() {
        let buffer = sine_buffer(1.0, 1);
        assert!(slice(&buffer, 0.5, 0.5).is_err());
        assert!(slice(&buffer, 0.8, 0.2).is_err());
        assert!(slice(&buffer, -0.1, 0.5).is_err());
    }

    #[test]
    fn slice_all_without_splits_spans_the_whole_buffer() {
        let buffer = sine_buffer(3.0, 1);
        let segments = slice_all(&buffer, &[]).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_secs, 0.0);
        assert!((segments[0].end_secs - 3.0).abs() < 1e-9);
    }

    #[test]
    fn slice_all_covers_duration_in_order() {
        let buffer = sine_buffer(3.0, 2);
        let segments = slice_all(&buffer, &[0.8, 1.9]).unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].start_secs, 0.0);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end_secs, pair[1].start_secs);
            assert!(pair[0].start_secs < pair[1].start_secs);
        }
        assert!((segments[2].end_secs - 3.0).abs() < 1e-9);
    }

    #[test]
    fn slice_all_drops_sub_tenth_second_slivers() {
        let buffer = sine_buffer(1.0, 1);
        let segments = slice_all(&buffer, &[0.95]).unwrap();
        // The trailing 0.05s sliver is absorbed, not emitted
        assert_eq!(segments.len(), 1);
        assert!((segments[0].end_secs - 0.95).abs() < 1e-9);
    }

    #[test]
    fn wav_round_trips_through_a_standard_reader() {
        let buffer = sine_buffer(2.0, 2);
        let bytes = slice(&buffer, 0.25, 0.75).unwrap();

        let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, RATE);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);

        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        let expected_frames = (0.5 * RATE as f64) as usize;
        assert_eq!(decoded.len(), expected_frames * 2);

        let first_source = (0.25 * RATE as f64) as usize;
        for (i, frame) in decoded.chunks_exact(2).enumerate() {
            for (ch, &value) in frame.iter().enumerate() {
                let source = buffer.channel(ch)[first_source + i];
                let back = value as f32 / if value < 0 { 32768.0 } else { 32767.0 };
                assert!((back - source).abs() <= 1.0 / 32767.0);
            }
        }
    }
}
