/// Options for opening a capture device.
///
/// The sample rate is not configurable: the container uses whatever rate the
/// device reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureConfiguration {
    /// Specific microphone device ID, or None for system default.
    pub mic_device_id: Option<String>,

    /// Frames delivered per hardware callback, or None for the backend default.
    pub frames_per_chunk: Option<u32>,
}

impl CaptureConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.frames_per_chunk == Some(0) {
            return Err("frames per chunk must be positive".into());
        }
        if let Some(id) = &self.mic_device_id {
            if id.trim().is_empty() {
                return Err("microphone device id must not be blank".into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(CaptureConfiguration::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_frames() {
        let config = CaptureConfiguration {
            frames_per_chunk: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_blank_device_id() {
        let config = CaptureConfiguration {
            mic_device_id: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err("microphone device id must not be blank".to_string())
        );
    }

    #[test]
    fn accepts_fixed_chunk_size() {
        let config = CaptureConfiguration {
            mic_device_id: Some("USB Microphone".into()),
            frames_per_chunk: Some(4096),
        };
        assert!(config.validate().is_ok());
    }
}
