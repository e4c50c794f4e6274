use crate::audio::buffer::SampleBuffer;
use crate::error::EngineError;

/// Fixed probe resolution for the quiet-moment scan.
const PROBE_CHUNK_SECS: f64 = 0.1;
/// Hard cap on the search window regardless of the segment budget.
const WINDOW_CAP_SECS: f64 = 5.0;
/// Every produced segment is at least this long.
const MIN_SEGMENT_LEAD_SECS: f64 = 1.0;

/// Propose split timestamps so no segment exceeds `max_segment_secs`,
/// placing each cut at the locally quietest moment.
///
/// Cutting at low-energy points keeps clicks and truncated words out of the
/// downstream playback. Returns a strictly ascending list; empty when the
/// whole buffer already fits in one segment. The caller must treat any
/// previously generated segments as invalid once this returns.
pub fn find_splits(buffer: &SampleBuffer, max_segment_secs: f64) -> Result<Vec<f64>, EngineError> {
    if max_segment_secs <= 0.0 {
        return Err(EngineError::InvalidRange(format!(
            "max segment duration must be positive, got {max_segment_secs}"
        )));
    }

    let duration = buffer.duration_secs();
    let mut splits = Vec::new();
    if max_segment_secs >= duration {
        return Ok(splits);
    }

    let mut cursor = 0.0f64;
    while cursor + max_segment_secs < duration {
        let window = WINDOW_CAP_SECS.min(max_segment_secs / 2.0);
        let window_end = cursor + max_segment_secs;
        let window_start = (cursor + MIN_SEGMENT_LEAD_SECS).max(window_end - window);
        let candidate = quietest_chunk_start(buffer, window_start, window_end).unwrap_or(window_end);
        splits.push(candidate);
        cursor = candidate;
    }

    log::debug!(
        "auto-split proposed {} point(s) over {:.1}s",
        splits.len(),
        duration
    );
    Ok(splits)
}

/// Start time of the minimum-energy probe chunk in `[window_start, window_end)`,
/// or `None` when the window holds no complete chunk. Energy is the sum of
/// absolute channel-0 amplitudes; strict `<` on a left-to-right scan breaks
/// ties to the earliest chunk.
fn quietest_chunk_start(
    buffer: &SampleBuffer,
    window_start: f64,
    window_end: f64,
) -> Option<f64> {
    let rate = buffer.sample_rate() as f64;
    let samples = buffer.channel(0);
    let chunk_frames = (PROBE_CHUNK_SECS * rate) as usize;
    if chunk_frames == 0 || window_end <= window_start {
        return None;
    }

    let chunk_count = ((window_end - window_start) / PROBE_CHUNK_SECS) as usize;
    let mut best: Option<(f64, f64)> = None;
    for i in 0..chunk_count {
        let chunk_start = window_start + i as f64 * PROBE_CHUNK_SECS;
        let first = (chunk_start * rate) as usize;
        let last = first + chunk_frames;
        if last > samples.len() {
            // Incomplete chunk at the buffer end; discard it and stop
            break;
        }
        let energy: f64 = samples[first..last].iter().map(|s| s.abs() as f64).sum();
        if best.map_or(true, |(lowest, _)| energy < lowest) {
            best = Some((energy, chunk_start));
        }
    }
    best.map(|(_, chunk_start)| chunk_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 8000;

    /// A steady 220Hz tone with silence zeroed over the given spans.
    fn tone_with_silence(duration_secs: f64, silences: &[(f64, f64)]) -> SampleBuffer {
        let frames = (duration_secs * RATE as f64) as usize;
        let mut samples: Vec<f32> = (0..frames)
            .map(|i| {
                let t = i as f64 / RATE as f64;
                ((2.0 * std::f64::consts::PI * 220.0 * t).sin() * 0.8) as f32
            })
            .collect();
        for &(start, end) in silences {
            let lo = (start * RATE as f64) as usize;
            let hi = ((end * RATE as f64) as usize).min(frames);
            for sample in &mut samples[lo..hi] {
                *sample = 0.0;
            }
        }
        SampleBuffer::new(vec![samples], RATE).unwrap()
    }

    #[test]
    fn finds_silence_clusters_in_each_window() {
        let buffer = tone_with_silence(35.0, &[(9.4, 9.8), (19.1, 19.5), (28.9, 29.3)]);
        let splits = find_splits(&buffer, 10.0).unwrap();

        assert_eq!(splits.len(), 3);
        assert!((splits[0] - 9.4).abs() < 1e-6);
        assert!((splits[1] - 19.1).abs() < 1e-6);
        assert!((splits[2] - 28.9).abs() < 1e-6);
    }

    #[test]
    fn splits_ascend_with_at_least_one_second_per_segment() {
        let buffer = tone_with_silence(35.0, &[(9.4, 9.8), (19.1, 19.5), (28.9, 29.3)]);
        let splits = find_splits(&buffer, 10.0).unwrap();

        let mut previous = 0.0;
        for &split in &splits {
            assert!(split > previous);
            assert!(split - previous >= 1.0);
            previous = split;
        }
    }

    #[test]
    fn constant_signal_cuts_at_window_start() {
        // No quiet spot: every chunk ties exactly, the earliest wins, so the
        // cut lands at the start of the search window
        let frames = (12.0 * RATE as f64) as usize;
        let buffer = SampleBuffer::new(vec![vec![0.5; frames]], RATE).unwrap();
        let splits = find_splits(&buffer, 10.0).unwrap();
        assert_eq!(splits.len(), 1);
        assert!((splits[0] - 5.0).abs() < 1e-6);
    }

    #[test]
    fn short_buffer_needs_no_split() {
        let buffer = tone_with_silence(8.0, &[]);
        assert!(find_splits(&buffer, 10.0).unwrap().is_empty());
        assert!(find_splits(&buffer, 8.0).unwrap().is_empty());
    }

    #[test]
    fn empty_window_defaults_to_segment_boundary() {
        // max/2 < 1s lead: the window collapses and every cut falls back to
        // cursor + max
        let buffer = tone_with_silence(1.0, &[]);
        let splits = find_splits(&buffer, 0.3).unwrap();
        assert_eq!(splits.len(), 3);
        assert!((splits[0] - 0.3).abs() < 1e-6);
        assert!((splits[1] - 0.6).abs() < 1e-6);
        assert!((splits[2] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn non_positive_budget_is_rejected() {
        let buffer = tone_with_silence(2.0, &[]);
        assert!(find_splits(&buffer, 0.0).is_err());
        assert!(find_splits(&buffer, -3.0).is_err());
    }
}
