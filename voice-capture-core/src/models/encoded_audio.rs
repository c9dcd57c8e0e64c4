use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::error::CaptureError;
use crate::processing::wav_format::{self, WavHeader};

/// A finished recording: a complete WAV container plus the parameters used
/// to produce it.
///
/// Immutable once built. Playback and upload consumers take the bytes as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    bytes: Vec<u8>,
    sample_rate: u32,
    sample_count: usize,
}

impl EncodedAudio {
    /// MIME type of the container.
    pub const CONTENT_TYPE: &'static str = "audio/wav";

    /// Quantize and wrap `samples` into a WAV container.
    pub fn encode(samples: &[f32], sample_rate: u32) -> Result<Self, CaptureError> {
        let bytes = wav_format::encode(samples, sample_rate)?;
        Ok(Self {
            bytes,
            sample_rate,
            sample_count: samples.len(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false: even an empty recording carries its 44-byte header.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.sample_count as f64 / f64::from(self.sample_rate)
    }

    /// Parsed view of the container header.
    pub fn header(&self) -> Result<WavHeader, CaptureError> {
        wav_format::parse_wav_header(&self.bytes)
    }

    /// SHA-256 hex digest of the container bytes.
    pub fn checksum(&self) -> String {
        hex_encode(&Sha256::digest(&self.bytes))
    }

    /// Describe this recording for logs and upload collaborators.
    pub fn metadata(&self) -> RecordingMetadata {
        RecordingMetadata {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            sample_rate: self.sample_rate,
            sample_count: self.sample_count as u64,
            duration_secs: self.duration_secs(),
            byte_length: self.bytes.len() as u64,
            checksum: self.checksum(),
            content_type: Self::CONTENT_TYPE.to_string(),
        }
    }
}

/// Serializable description of one [`EncodedAudio`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub created_at: String,
    pub sample_rate: u32,
    pub sample_count: u64,
    pub duration_secs: f64,
    pub byte_length: u64,
    pub checksum: String,
    pub content_type: String,
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
