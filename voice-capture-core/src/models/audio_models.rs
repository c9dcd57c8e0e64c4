/// One hardware callback's worth of mono samples, normalized to `[-1.0, 1.0]`.
///
/// Immutable once built; ownership moves into the `SampleBuffer`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureChunk {
    samples: Box<[f32]>,
}

impl CaptureChunk {
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples: samples.into_boxed_slice(),
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl From<Vec<f32>> for CaptureChunk {
    fn from(samples: Vec<f32>) -> Self {
        Self::new(samples)
    }
}

impl From<&[f32]> for CaptureChunk {
    fn from(samples: &[f32]) -> Self {
        Self::new(samples.to_vec())
    }
}

/// Transport type for an audio device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioTransportType {
    BuiltIn,
    Bluetooth,
    Usb,
    Virtual,
    Unknown,
}

/// An input device available for capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSource {
    pub id: String,
    pub name: String,
    pub is_default: bool,
    pub transport_type: Option<AudioTransportType>,
}

/// Real-time level metering of the most recent chunk (RMS and peak, 0.0–1.0).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AudioLevels {
    pub level: f32,
    pub peak_level: f32,
}

/// Diagnostics for debugging capture sessions.
#[derive(Debug, Clone, Default)]
pub struct CaptureSessionDiagnostics {
    pub callback_count: u64,
    pub samples_total: u64,
    pub device_format: String,
}
