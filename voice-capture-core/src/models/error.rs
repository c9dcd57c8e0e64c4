use thiserror::Error;

/// Errors that can occur during capture and encoding.
///
/// Three groups matter to callers: device acquisition failures
/// (`PermissionDenied`, `DeviceNotAvailable`, `AcquisitionFailed`),
/// encoding failures (`EncodingFailed`) and concurrent-start rejection (`Busy`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("device not available")]
    DeviceNotAvailable,

    #[error("device acquisition failed: {0}")]
    AcquisitionFailed(String),

    #[error("device acquisition cancelled")]
    AcquisitionCancelled,

    #[error("capture device busy: {0}")]
    Busy(String),

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("stream error: {0}")]
    StreamError(String),
}

impl CaptureError {
    /// Permission denied, missing device, or any other failure to open the device.
    pub fn is_device_acquisition(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied | Self::DeviceNotAvailable | Self::AcquisitionFailed(_)
        )
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy(_))
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::EncodingFailed(_))
    }
}
