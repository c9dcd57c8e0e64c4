use super::error::CaptureError;

/// Capture session state machine.
///
/// State transitions:
/// ```text
/// idle → requesting → recording → stopping → stopped
///            │   │         │
///            │   └─────────┴──→ failed
///            └──(stop)──→ idle
/// ```
///
/// `start()` is accepted again from `Stopped` and `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureState {
    Idle,
    Requesting,
    Recording,
    Stopping,
    Stopped { duration_secs: f64 },
    Failed(CaptureError),
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_requesting(&self) -> bool {
        matches!(self, Self::Requesting)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    /// Whether the session currently holds (or is acquiring) the device.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Requesting | Self::Recording | Self::Stopping)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped { .. } | Self::Failed(_))
    }

    /// Short lowercase name, used in logs and event payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Recording => "recording",
            Self::Stopping => "stopping",
            Self::Stopped { .. } => "stopped",
            Self::Failed(_) => "failed",
        }
    }
}
