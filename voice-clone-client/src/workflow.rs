use std::sync::Arc;

use voice_capture_core::models::encoded_audio::EncodedAudio;

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::http::HttpVoiceService;
use crate::service::{SpeechSynthesizer, VoiceUploader};
use crate::types::{SynthesisRequest, SynthesizedSpeech, UploadOutcome, VoiceProfileHandle};

/// Upload-then-synthesize flow around one voice profile.
///
/// Holds the profile from the most recent successful upload. A failed upload
/// keeps the previous profile.
pub struct VoiceCloneWorkflow<U, S> {
    uploader: U,
    synthesizer: S,
    profile: Option<VoiceProfileHandle>,
}

impl<U: VoiceUploader, S: SpeechSynthesizer> VoiceCloneWorkflow<U, S> {
    pub fn new(uploader: U, synthesizer: S) -> Self {
        Self {
            uploader,
            synthesizer,
            profile: None,
        }
    }

    pub fn profile(&self) -> Option<&VoiceProfileHandle> {
        self.profile.as_ref()
    }

    /// Reuse a profile created earlier, e.g. in a previous run.
    pub fn set_profile(&mut self, profile: VoiceProfileHandle) {
        self.profile = Some(profile);
    }

    pub async fn upload_recording(&mut self, audio: &EncodedAudio) -> Result<UploadOutcome, ServiceError> {
        let outcome = self.uploader.upload(audio).await.inspect_err(|e| {
            log::warn!("Upload failed: {}", e);
        })?;
        self.profile = Some(outcome.profile.clone());
        Ok(outcome)
    }

    /// Speak `text` in the current profile's voice.
    pub async fn synthesize(&self, text: &str, language: &str) -> Result<SynthesizedSpeech, ServiceError> {
        let profile = self.profile.as_ref().ok_or(ServiceError::NoProfile)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::EmptyText);
        }
        let request = SynthesisRequest::new(profile, text, language);
        self.synthesizer.synthesize(&request).await
    }
}

impl VoiceCloneWorkflow<Arc<HttpVoiceService>, Arc<HttpVoiceService>> {
    /// Workflow with both services on one HTTP client.
    pub fn http(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let service = Arc::new(HttpVoiceService::new(config)?);
        Ok(Self::new(Arc::clone(&service), service))
    }
}
