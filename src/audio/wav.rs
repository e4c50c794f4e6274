/// Serialize per-channel f32 frames as a 16-bit PCM RIFF/WAVE byte stream.
///
/// Standard 44-byte little-endian header (PCM format tag 1), samples
/// interleaved channel-major per frame. This layout is the one bit-exact
/// format contract of the tool and must round-trip through any WAV reader.
pub fn encode_wav(channels: &[Vec<f32>], sample_rate: u32) -> Vec<u8> {
    let num_channels = channels.len() as u16;
    let frame_count = channels.first().map_or(0, |c| c.len());
    let bits_per_sample: u16 = 16;
    let block_align = num_channels * 2;
    let byte_rate = sample_rate * u32::from(num_channels) * 2;
    let data_size = (frame_count * num_channels as usize * 2) as u32;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(data_size + 36).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt sub-chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    buf.extend_from_slice(&num_channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data sub-chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for frame in 0..frame_count {
        for channel in channels {
            buf.extend_from_slice(&quantize(channel[frame]).to_le_bytes());
        }
    }

    buf
}

/// Full-scale signed-16 mapping: negative samples scale by 32768, non-negative
/// by 32767, truncated toward zero after clamping to [-1, 1].
fn quantize(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}
