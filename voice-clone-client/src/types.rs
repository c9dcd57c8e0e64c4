use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::language::normalize_language;

/// Opaque identifier of a voice profile created by the upload service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceProfileHandle(String);

impl VoiceProfileHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoiceProfileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub ok: bool,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub duration_sec: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl UploadResponse {
    pub fn into_outcome(self) -> Result<UploadOutcome, ServiceError> {
        if !self.ok {
            return Err(ServiceError::Rejected(
                self.error.unwrap_or_else(|| "upload failed".into()),
            ));
        }
        let id = self
            .profile_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ServiceError::Parse("upload response has no profile_id".into()))?;
        Ok(UploadOutcome {
            profile: VoiceProfileHandle::new(id),
            duration_secs: self.duration_sec,
        })
    }
}

/// A successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub profile: VoiceProfileHandle,
    /// Duration measured by the service, when it could read the audio.
    pub duration_secs: Option<f64>,
}

/// Body sent to the synthesis endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub profile_id: String,
    pub text: String,
    pub language: String,
}

impl SynthesisRequest {
    /// Build a request with a normalized language tag.
    pub fn new(profile: &VoiceProfileHandle, text: impl Into<String>, language: &str) -> Self {
        Self {
            profile_id: profile.as_str().to_string(),
            text: text.into(),
            language: normalize_language(language),
        }
    }
}

/// Body returned by the synthesis endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisResponse {
    pub ok: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SynthesisResponse {
    pub fn into_result(self) -> Result<SynthesizedSpeech, ServiceError> {
        if !self.ok {
            return Err(ServiceError::Rejected(
                self.error.unwrap_or_else(|| "synthesis failed".into()),
            ));
        }
        let url = self
            .url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ServiceError::Parse("synthesis response has no url".into()))?;
        Ok(SynthesizedSpeech {
            url,
            file_name: self.file,
            method: self.method,
        })
    }
}

/// Location of synthesized audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedSpeech {
    pub url: String,
    pub file_name: Option<String>,
    /// Engine that produced the audio, e.g. `xtts_v2` or `edge_tts`.
    pub method: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_success() {
        let body = r#"{"ok": true, "profile_id": "3f2a", "duration_sec": 4.5}"#;
        let response: UploadResponse = serde_json::from_str(body).unwrap();
        let outcome = response.into_outcome().unwrap();

        assert_eq!(outcome.profile.as_str(), "3f2a");
        assert_eq!(outcome.duration_secs, Some(4.5));
    }

    #[test]
    fn upload_without_duration() {
        let body = r#"{"ok": true, "profile_id": "abc", "duration_sec": null}"#;
        let response: UploadResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_outcome().unwrap().duration_secs, None);
    }

    #[test]
    fn upload_rejection_carries_message() {
        let body = r#"{"ok": false, "error": "no audio field"}"#;
        let response: UploadResponse = serde_json::from_str(body).unwrap();
        match response.into_outcome() {
            Err(ServiceError::Rejected(message)) => assert_eq!(message, "no audio field"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn upload_success_without_profile_is_parse_error() {
        let response: UploadResponse = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert!(matches!(response.into_outcome(), Err(ServiceError::Parse(_))));
    }

    #[test]
    fn synthesis_request_normalizes_language() {
        let profile = VoiceProfileHandle::new("p1");
        let request = SynthesisRequest::new(&profile, "你好", "ZH");

        assert_eq!(request.language, "zh-cn");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["profile_id"], "p1");
        assert_eq!(json["text"], "你好");
        assert_eq!(json["language"], "zh-cn");
    }

    #[test]
    fn synthesis_success() {
        let body = r#"{"ok": true, "file": "a.wav", "url": "/outputs/a.wav", "method": "xtts_v2"}"#;
        let response: SynthesisResponse = serde_json::from_str(body).unwrap();
        let speech = response.into_result().unwrap();

        assert_eq!(speech.url, "/outputs/a.wav");
        assert_eq!(speech.file_name.as_deref(), Some("a.wav"));
        assert_eq!(speech.method.as_deref(), Some("xtts_v2"));
    }

    #[test]
    fn synthesis_rejection() {
        let body = r#"{"ok": false, "error": "profile not found"}"#;
        let response: SynthesisResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(response.into_result(), Err(ServiceError::Rejected(_))));
    }

    #[test]
    fn profile_handle_serializes_as_string() {
        let handle = VoiceProfileHandle::new("xyz");
        assert_eq!(serde_json::to_string(&handle).unwrap(), r#""xyz""#);
        assert_eq!(handle.to_string(), "xyz");
    }
}
