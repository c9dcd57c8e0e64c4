//! # voice-clone-client
//!
//! Client for the two services that consume a finished recording: the voice
//! profile upload service and the speech synthesis service.
//!
//! ```text
//! EncodedAudio ──upload──▶ VoiceProfileHandle ──synthesize(text, language)──▶ SynthesizedSpeech
//! ```
//!
//! `HttpVoiceService` talks to both over HTTP. `VoiceCloneWorkflow` keeps the
//! profile from the last successful upload and reuses it for synthesis.

pub mod config;
pub mod error;
pub mod http;
pub mod language;
pub mod service;
pub mod types;
pub mod workflow;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use http::HttpVoiceService;
pub use language::normalize_language;
pub use service::{SpeechSynthesizer, VoiceUploader};
pub use types::{
    SynthesisRequest, SynthesisResponse, SynthesizedSpeech, UploadOutcome, UploadResponse, VoiceProfileHandle,
};
pub use workflow::VoiceCloneWorkflow;
