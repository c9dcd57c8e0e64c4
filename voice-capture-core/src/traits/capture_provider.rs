use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::audio_models::AudioSource;
use crate::models::error::CaptureError;

/// Callback invoked with each mono buffer the hardware delivers.
///
/// Samples are normalized `f32` in `[-1.0, 1.0]`. The callback fires on the
/// backend's audio thread and must not block.
pub type ChunkCallback = Arc<dyn Fn(&[f32]) + Send + Sync + 'static>;

/// Shared flag used to abandon a pending device acquisition.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Interface for platform-specific microphone sources.
///
/// A provider moves through acquire → subscribe → unsubscribe → release.
/// Implemented by:
/// - `CpalMicCapture` (voice-capture-cpal)
/// - test doubles in this crate
pub trait CaptureProvider: Send + Sync {
    /// Whether this capture source is currently available.
    fn is_available(&self) -> bool;

    /// Open the device and return the sample rate it will deliver.
    ///
    /// May block until the platform grants or denies access. Implementations
    /// should poll `cancel` while waiting and return
    /// `CaptureError::AcquisitionCancelled` once it is set.
    fn acquire(&mut self, cancel: &CancelFlag) -> Result<u32, CaptureError>;

    /// Start delivering buffers to `callback`.
    fn subscribe(&mut self, callback: ChunkCallback) -> Result<(), CaptureError>;

    /// Detach the callback. Once this returns, the callback is not running
    /// and will not be invoked again.
    fn unsubscribe(&mut self);

    /// Release the device. Safe to call repeatedly and without a prior
    /// successful `acquire`.
    fn release(&mut self);

    /// Information about the audio device backing this provider.
    fn device_info(&self) -> AudioSource;
}
