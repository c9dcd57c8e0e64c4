//! # voice-capture-cpal
//!
//! Cross-platform microphone backend for voice-capture-core, built on cpal.
//!
//! Provides:
//! - `CpalMicCapture`: mono microphone capture through the host's default audio API
//! - `DeviceEnumerator`: input device listing with transport heuristics
//! - `permissions`: microphone access probe
//!
//! ## Usage
//! ```ignore
//! use voice_capture_cpal::CpalMicCapture;
//! use voice_capture_core::CaptureSession;
//!
//! let session = CaptureSession::new(CpalMicCapture::default_device());
//! session.start()?;
//! // ...
//! let audio = session.stop()?;
//! ```

pub mod cpal_mic;
pub mod device_enumerator;
pub mod permissions;

pub use cpal_mic::CpalMicCapture;
pub use device_enumerator::DeviceEnumerator;
