//! Microphone access probe.
//!
//! cpal exposes no permission API. Desktop platforms surface a refused
//! microphone when the device is queried, so the probe reads the default
//! input configuration and classifies the failure.

use cpal::traits::{DeviceTrait, HostTrait};

use voice_capture_core::models::error::CaptureError;

use crate::cpal_mic::backend_error;

/// Check whether the default microphone can be opened.
///
/// Returns `Ok(false)` when there is no input device or access was refused.
pub fn check_microphone_permission() -> Result<bool, CaptureError> {
    let host = cpal::default_host();
    let device = match host.default_input_device() {
        Some(d) => d,
        None => return Ok(false),
    };

    match device.default_input_config() {
        Ok(_) => Ok(true),
        Err(cpal::DefaultStreamConfigError::BackendSpecific { err }) => {
            match backend_error(&err.description) {
                CaptureError::PermissionDenied => Ok(false),
                other => {
                    log::warn!("Unexpected error checking mic permission: {}", other);
                    Ok(true)
                }
            }
        }
        Err(cpal::DefaultStreamConfigError::DeviceNotAvailable) => Ok(false),
        Err(e) => {
            log::warn!("Unexpected error checking mic permission: {}", e);
            Ok(true)
        }
    }
}
