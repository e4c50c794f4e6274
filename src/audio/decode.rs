use std::path::Path;
use symphonia::core::audio::SampleBuffer as InterleavedBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::audio::buffer::SampleBuffer;
use crate::error::EngineError;

/// Decode an audio file into a multichannel [`SampleBuffer`].
///
/// Channels are kept separate rather than downmixed: the slicer writes every
/// channel back out, only the split finder's energy scan is channel-0-only.
pub fn decode_audio(path: &Path) -> Result<SampleBuffer, EngineError> {
    let file = std::fs::File::open(path)
        .map_err(|e| EngineError::Decode(format!("failed to open {}: {e}", path.display())))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| EngineError::Decode("no audio tracks found".into()))?;

    let track_id = track.id;
    let channel_count = track.codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| EngineError::Decode("unknown sample rate".into()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())?;

    let mut channels: Vec<Vec<f32>> = vec![Vec::new(); channel_count];

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();

        let mut interleaved = InterleavedBuffer::<f32>::new(num_frames as u64, spec);
        interleaved.copy_interleaved_ref(decoded);

        // De-interleave frame by frame into per-channel arrays
        for frame in interleaved.samples().chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
    }

    let frame_count = channels.first().map_or(0, |c| c.len());
    log::info!(
        "Decoded audio: {} frames x {} channel(s), {}Hz, {:.1}s",
        frame_count,
        channel_count,
        sample_rate,
        frame_count as f64 / sample_rate as f64
    );

    SampleBuffer::new(channels, sample_rate)
}
