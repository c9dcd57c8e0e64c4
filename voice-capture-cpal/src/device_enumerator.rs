//! Input device enumeration through the cpal host.
//!
//! cpal identifies devices by name only, so the name doubles as the device
//! ID and transport types are inferred from it.

use cpal::traits::{DeviceTrait, HostTrait};

use voice_capture_core::models::audio_models::{AudioSource, AudioTransportType};
use voice_capture_core::models::error::CaptureError;

/// Audio device enumerator for the platform's default cpal host.
pub struct DeviceEnumerator {
    host: cpal::Host,
}

impl DeviceEnumerator {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }

    /// List input (microphone) devices.
    pub fn list_capture_devices(&self) -> Result<Vec<AudioSource>, CaptureError> {
        let default_name = self.default_capture_device_name().ok();

        let devices = self
            .host
            .input_devices()
            .map_err(|e| CaptureError::ConfigurationFailed(format!("failed to list input devices: {}", e)))?;

        let mut sources = Vec::new();
        for (i, device) in devices.enumerate() {
            let name = device.name().unwrap_or_else(|_| format!("Input {}", i));
            sources.push(AudioSource {
                id: name.clone(),
                is_default: default_name.as_deref() == Some(name.as_str()),
                transport_type: Some(transport_from_name(&name)),
                name,
            });
        }
        Ok(sources)
    }

    pub fn default_capture_device_name(&self) -> Result<String, CaptureError> {
        let device = self
            .host
            .default_input_device()
            .ok_or(CaptureError::DeviceNotAvailable)?;
        device
            .name()
            .map_err(|e| CaptureError::ConfigurationFailed(format!("failed to read device name: {}", e)))
    }

    /// Detect a Bluetooth hands-free (HFP) input, which records at 8 or 16 kHz.
    pub fn is_bluetooth_hfp(name: &str) -> bool {
        let lower = name.to_lowercase();
        transport_from_name(name) == AudioTransportType::Bluetooth
            && (lower.contains("hands-free") || lower.contains("handsfree") || lower.contains("headset"))
    }
}

impl Default for DeviceEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Guess the transport type from a device name.
pub fn transport_from_name(name: &str) -> AudioTransportType {
    let lower = name.to_lowercase();
    if ["bluetooth", "bthenum", "airpods", "hands-free", "handsfree"]
        .iter()
        .any(|k| lower.contains(k))
    {
        AudioTransportType::Bluetooth
    } else if lower.contains("usb") {
        AudioTransportType::Usb
    } else if ["virtual", "loopback", "monitor of", "blackhole", "cable output"]
        .iter()
        .any(|k| lower.contains(k))
    {
        AudioTransportType::Virtual
    } else if ["built-in", "internal", "macbook", "realtek", "hda intel"]
        .iter()
        .any(|k| lower.contains(k))
    {
        AudioTransportType::BuiltIn
    } else {
        AudioTransportType::Unknown
    }
}
