use std::sync::Arc;

use async_trait::async_trait;

use voice_capture_core::models::encoded_audio::EncodedAudio;

use crate::error::ServiceError;
use crate::types::{SynthesisRequest, SynthesizedSpeech, UploadOutcome};

/// Service that turns a recording into a voice profile.
///
/// Implemented by:
/// - `HttpVoiceService`
/// - test doubles
#[async_trait]
pub trait VoiceUploader: Send + Sync {
    async fn upload(&self, audio: &EncodedAudio) -> Result<UploadOutcome, ServiceError>;
}

/// Service that speaks text in a profile's voice.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesizedSpeech, ServiceError>;
}

#[async_trait]
impl<T: VoiceUploader + ?Sized> VoiceUploader for Arc<T> {
    async fn upload(&self, audio: &EncodedAudio) -> Result<UploadOutcome, ServiceError> {
        (**self).upload(audio).await
    }
}

#[async_trait]
impl<T: SpeechSynthesizer + ?Sized> SpeechSynthesizer for Arc<T> {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesizedSpeech, ServiceError> {
        (**self).synthesize(request).await
    }
}
