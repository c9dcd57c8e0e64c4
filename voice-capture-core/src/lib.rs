//! # voice-capture-core
//!
//! Platform-agnostic voice capture core library.
//!
//! Accumulates mono microphone chunks, quantizes them to 16-bit PCM and wraps
//! the result in a WAV container. Platform backends implement the
//! `CaptureProvider` trait and plug into the generic `CaptureSession`.
//!
//! ## Architecture
//!
//! ```text
//! voice-capture-core (this crate)
//! ├── traits/       ← CaptureProvider, CaptureDelegate, CancelFlag
//! ├── models/       ← CaptureError, CaptureState, CaptureConfiguration, EncodedAudio, etc.
//! ├── processing/   ← SampleBuffer, PCM quantizer, WAV encoder, level metering
//! └── session/      ← CaptureSession (state machine), DeviceClaims
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{AudioLevels, AudioSource, AudioTransportType, CaptureChunk, CaptureSessionDiagnostics};
pub use models::config::CaptureConfiguration;
pub use models::encoded_audio::{EncodedAudio, RecordingMetadata};
pub use models::error::CaptureError;
pub use models::state::CaptureState;
pub use processing::sample_buffer::SampleBuffer;
pub use session::capture_session::CaptureSession;
pub use session::device_claims::{DeviceClaim, DeviceClaims};
pub use traits::capture_delegate::CaptureDelegate;
pub use traits::capture_provider::{CancelFlag, CaptureProvider, ChunkCallback};
