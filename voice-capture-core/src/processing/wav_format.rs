//! WAV container encoding.
//!
//! Produces the canonical 44-byte RIFF header followed by 16-bit mono PCM.
//! The layout is the wire contract consumed by playback and upload
//! collaborators and must stay byte-exact.

use crate::models::error::CaptureError;
use crate::processing::pcm;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Channel count written to every container.
pub const CHANNELS: u16 = 1;

/// Bit depth written to every container.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Generate a 44-byte WAV RIFF header.
///
/// Format: PCM (format code 1), little-endian.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    36 + data_size
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * block_align
/// [32-33]  block_align = channels * bit_depth / 8
/// [34-35]  bit_depth
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
///
/// Callers must ensure `byte_rate` and `36 + data_size` fit in `u32`;
/// [`encode`] checks this before calling.
pub fn generate_wav_header(sample_rate: u32, bit_depth: u16, channels: u16, data_size: u32) -> [u8; WAV_HEADER_SIZE] {
    let block_align = channels * bit_depth / 8;
    let byte_rate = sample_rate * block_align as u32;
    let chunk_size = 36 + data_size;

    let mut header = [0u8; WAV_HEADER_SIZE];

    // RIFF chunk descriptor
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    // fmt sub-chunk
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes()); // PCM format size
    header[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM format code
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bit_depth.to_le_bytes());

    // data sub-chunk
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Encode normalized mono samples into a complete WAV container.
///
/// Fails only when the header fields cannot describe the input: a zero
/// sample rate, a rate whose byte rate overflows `u32`, or a payload larger
/// than the RIFF size fields allow. Zero samples yield a 44-byte header-only
/// container.
pub fn encode(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, CaptureError> {
    if sample_rate == 0 {
        return Err(CaptureError::EncodingFailed("sample rate must be non-zero".into()));
    }

    let block_align = u32::from(CHANNELS * BITS_PER_SAMPLE / 8);
    if sample_rate.checked_mul(block_align).is_none() {
        return Err(CaptureError::EncodingFailed(format!(
            "sample rate {} Hz overflows the byte rate field",
            sample_rate
        )));
    }

    let data_size = samples
        .len()
        .checked_mul(pcm::BYTES_PER_SAMPLE)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| n.checked_add(36).is_some())
        .ok_or_else(|| {
            CaptureError::EncodingFailed(format!(
                "{} samples exceed the WAV size limit",
                samples.len()
            ))
        })?;

    let header = generate_wav_header(sample_rate, BITS_PER_SAMPLE, CHANNELS, data_size);

    let mut data = Vec::with_capacity(WAV_HEADER_SIZE + data_size as usize);
    data.extend_from_slice(&header);
    pcm::quantize_into(samples, &mut data);
    Ok(data)
}

/// Header fields of a canonical 44-byte WAV container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_size: u32,
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

/// Parse the canonical header at the start of `bytes`.
///
/// Only the fixed layout produced by [`encode`] is understood; files with
/// extra chunks before `data` are rejected.
pub fn parse_wav_header(bytes: &[u8]) -> Result<WavHeader, CaptureError> {
    if bytes.len() < WAV_HEADER_SIZE {
        return Err(CaptureError::EncodingFailed(format!(
            "container is {} bytes, shorter than the {}-byte header",
            bytes.len(),
            WAV_HEADER_SIZE
        )));
    }
    if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(CaptureError::EncodingFailed("missing RIFF/WAVE tags".into()));
    }
    if &bytes[12..16] != b"fmt " || read_u32(bytes, 16) != 16 {
        return Err(CaptureError::EncodingFailed("unexpected fmt chunk".into()));
    }
    if &bytes[36..40] != b"data" {
        return Err(CaptureError::EncodingFailed("data chunk not at offset 36".into()));
    }

    Ok(WavHeader {
        chunk_size: read_u32(bytes, 4),
        audio_format: read_u16(bytes, 20),
        channels: read_u16(bytes, 22),
        sample_rate: read_u32(bytes, 24),
        byte_rate: read_u32(bytes, 28),
        block_align: read_u16(bytes, 32),
        bits_per_sample: read_u16(bytes, 34),
        data_size: read_u32(bytes, 40),
    })
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_size_is_44_bytes() {
        let header = generate_wav_header(48000, 16, 1, 0);
        assert_eq!(header.len(), 44);
    }

    #[test]
    fn header_riff_magic() {
        let header = generate_wav_header(48000, 16, 1, 0);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");
        assert_eq!(&header[36..40], b"data");
    }

    #[test]
    fn header_pcm_format() {
        let header = generate_wav_header(48000, 16, 1, 0);
        // Format code = 1 (PCM)
        assert_eq!(u16::from_le_bytes([header[20], header[21]]), 1);
        // fmt chunk size = 16
        assert_eq!(u32::from_le_bytes([header[16], header[17], header[18], header[19]]), 16);
    }

    #[test]
    fn header_44khz_mono_16bit() {
        let header = generate_wav_header(44100, 16, 1, 9600);

        assert_eq!(u16::from_le_bytes([header[22], header[23]]), 1);
        assert_eq!(u32::from_le_bytes([header[24], header[25], header[26], header[27]]), 44100);
        assert_eq!(u32::from_le_bytes([header[28], header[29], header[30], header[31]]), 88200);
        assert_eq!(u16::from_le_bytes([header[32], header[33]]), 2);
        assert_eq!(u16::from_le_bytes([header[34], header[35]]), 16);
        assert_eq!(u32::from_le_bytes([header[40], header[41], header[42], header[43]]), 9600);
        assert_eq!(u32::from_le_bytes([header[4], header[5], header[6], header[7]]), 36 + 9600);
    }

    #[test]
    fn encode_two_silent_samples_at_16k() {
        let wav = encode(&[0.0, 0.0], 16000).unwrap();

        assert_eq!(wav.len(), 48);
        assert_eq!(&wav[24..28], &16000u32.to_le_bytes());
        assert_eq!(&wav[28..32], &32000u32.to_le_bytes());
        assert_eq!(&wav[40..44], &4u32.to_le_bytes());
        assert_eq!(&wav[44..], &[0, 0, 0, 0]);
    }

    #[test]
    fn encode_matches_reference_bytes() {
        let wav = encode(&[1.0, -1.0], 8000).unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(b"RIFF");
        expected.extend_from_slice(&40u32.to_le_bytes());
        expected.extend_from_slice(b"WAVEfmt ");
        expected.extend_from_slice(&16u32.to_le_bytes());
        expected.extend_from_slice(&1u16.to_le_bytes());
        expected.extend_from_slice(&1u16.to_le_bytes());
        expected.extend_from_slice(&8000u32.to_le_bytes());
        expected.extend_from_slice(&16000u32.to_le_bytes());
        expected.extend_from_slice(&2u16.to_le_bytes());
        expected.extend_from_slice(&16u16.to_le_bytes());
        expected.extend_from_slice(b"data");
        expected.extend_from_slice(&4u32.to_le_bytes());
        expected.extend_from_slice(&[0xFF, 0x7F, 0x00, 0x80]);
        assert_eq!(wav, expected);
    }

    #[test]
    fn encode_empty_is_header_only() {
        let wav = encode(&[], 44100).unwrap();
        assert_eq!(wav.len(), WAV_HEADER_SIZE);

        let header = parse_wav_header(&wav).unwrap();
        assert_eq!(header.data_size, 0);
        assert_eq!(header.chunk_size, 36);
    }

    #[test]
    fn encode_rejects_zero_rate() {
        let err = encode(&[0.1, 0.2], 0).unwrap_err();
        assert!(err.is_encoding());

        let err = encode(&[], 0).unwrap_err();
        assert!(err.is_encoding());
    }

    #[test]
    fn encode_rejects_byte_rate_overflow() {
        let err = encode(&[0.0], u32::MAX / 2 + 1).unwrap_err();
        assert!(err.is_encoding());
        assert!(encode(&[0.0], u32::MAX / 2).is_ok());
    }

    #[test]
    fn payload_follows_quantizer() {
        let samples = [0.25, -0.75, 1.2];
        let wav = encode(&samples, 22050).unwrap();
        assert_eq!(&wav[WAV_HEADER_SIZE..], pcm::quantize(&samples).as_slice());
    }

    #[test]
    fn parse_round_trips_encoded_header() {
        let wav = encode(&[0.5; 10], 48000).unwrap();
        let header = parse_wav_header(&wav).unwrap();

        assert_eq!(
            header,
            WavHeader {
                chunk_size: 56,
                audio_format: 1,
                channels: 1,
                sample_rate: 48000,
                byte_rate: 96000,
                block_align: 2,
                bits_per_sample: 16,
                data_size: 20,
            }
        );
    }

    #[test]
    fn parse_rejects_short_or_foreign_input() {
        assert!(parse_wav_header(&[0u8; 10]).is_err());

        let mut wav = encode(&[], 16000).unwrap();
        wav[0..4].copy_from_slice(b"RIFX");
        assert!(parse_wav_header(&wav).is_err());
    }
}
