//! HTTP client for the upload and synthesis endpoints.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use voice_capture_core::models::encoded_audio::EncodedAudio;

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::service::{SpeechSynthesizer, VoiceUploader};
use crate::types::{SynthesisRequest, SynthesisResponse, SynthesizedSpeech, UploadOutcome, UploadResponse};

const UPLOAD_PATH: &str = "api/upload";
const SYNTHESIZE_PATH: &str = "api/synthesize";

/// File name the recording is uploaded under.
pub const UPLOAD_FILE_NAME: &str = "recorded.wav";

/// reqwest implementation of [`VoiceUploader`] and [`SpeechSynthesizer`].
#[derive(Debug, Clone)]
pub struct HttpVoiceService {
    client: Client,
    base_url: Url,
    skip_embedding: bool,
}

impl HttpVoiceService {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        config.validate().map_err(ServiceError::Config)?;

        let mut base_url = Url::parse(&config.base_url).map_err(|e| ServiceError::Config(e.to_string()))?;
        // Without a trailing slash `join` would replace the last path segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url,
            skip_embedding: config.skip_embedding,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a URL returned by the service. Relative paths are taken
    /// against the base URL; absolute URLs are kept.
    pub fn resolve(&self, url: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(url)
            .map_err(|e| ServiceError::Parse(format!("invalid url '{}': {}", url, e)))
    }

    /// Download synthesized audio.
    pub async fn fetch_audio(&self, speech: &SynthesizedSpeech) -> Result<Vec<u8>, ServiceError> {
        let url = self.resolve(&speech.url)?;
        log::debug!("Fetching synthesized audio from {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
        let status = response.status();
        let body = response.text().await?;
        parse_body(status, &body)
    }
}

/// Decode a response body. Error statuses still carry `{ok: false, error}`
/// bodies, so the body is tried first and the status only reported when it
/// does not parse.
fn parse_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ServiceError> {
    match serde_json::from_str(body) {
        Ok(value) => Ok(value),
        Err(e) if status.is_success() => Err(e.into()),
        Err(_) => Err(ServiceError::Http {
            status: status.as_u16(),
            message: body.to_string(),
        }),
    }
}

#[async_trait]
impl VoiceUploader for HttpVoiceService {
    async fn upload(&self, audio: &EncodedAudio) -> Result<UploadOutcome, ServiceError> {
        let part = Part::bytes(audio.as_bytes().to_vec())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(EncodedAudio::CONTENT_TYPE)?;
        let mut form = Form::new().part("audio", part);
        if self.skip_embedding {
            form = form.text("skip_embedding", "1");
        }

        let url = self.base_url.join(UPLOAD_PATH).map_err(|e| ServiceError::Config(e.to_string()))?;
        log::info!(
            "Uploading recording to {} ({} bytes, {:.2}s)",
            url,
            audio.len(),
            audio.duration_secs()
        );

        let response = self.client.post(url).multipart(form).send().await?;
        let outcome = Self::read_json::<UploadResponse>(response).await?.into_outcome()?;

        log::info!("Upload accepted, profile {}", outcome.profile);
        Ok(outcome)
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpVoiceService {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesizedSpeech, ServiceError> {
        let url = self
            .base_url
            .join(SYNTHESIZE_PATH)
            .map_err(|e| ServiceError::Config(e.to_string()))?;
        log::info!(
            "Synthesizing {} chars ({}) with profile {}",
            request.text.chars().count(),
            request.language,
            request.profile_id
        );

        let response = self.client.post(url).json(request).send().await?;
        let mut speech = Self::read_json::<SynthesisResponse>(response).await?.into_result()?;
        speech.url = self.resolve(&speech.url)?.to_string();

        log::info!("Synthesis finished via {:?}: {}", speech.method, speech.url);
        Ok(speech)
    }
}
