//! Float → signed 16-bit PCM conversion.
//!
//! Scaling is asymmetric: negative samples are multiplied by 32768 and
//! non-negative samples by 32767, so `-1.0` maps to `i16::MIN` and `1.0` to
//! `i16::MAX`. Fractional results are truncated toward zero.

/// Bytes per quantized sample.
pub const BYTES_PER_SAMPLE: usize = 2;

/// Convert one normalized sample to a 16-bit integer.
///
/// Out-of-range values are clamped first. NaN maps to 0.
pub fn sample_to_i16(sample: f32) -> i16 {
    let clamped = f64::from(sample.clamp(-1.0, 1.0));
    // Products are exact in f64, so truncation never depends on f32 rounding.
    let scaled = if clamped < 0.0 {
        clamped * 32768.0
    } else {
        clamped * 32767.0
    };
    scaled as i16
}

/// Quantize samples into little-endian 16-bit PCM bytes, in input order.
///
/// Output length = `samples.len() * 2`.
pub fn quantize(samples: &[f32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * BYTES_PER_SAMPLE);
    quantize_into(samples, &mut data);
    data
}

/// Append the quantized bytes of `samples` to `out`.
pub fn quantize_into(samples: &[f32], out: &mut Vec<u8>) {
    out.reserve(samples.len() * BYTES_PER_SAMPLE);
    for &sample in samples {
        out.extend_from_slice(&sample_to_i16(sample).to_le_bytes());
    }
}

/// Downmix interleaved multi-channel audio to mono by averaging channels per frame.
///
/// A trailing partial frame is dropped.
pub fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let scale = 1.0 / channels as f32;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect()
}
