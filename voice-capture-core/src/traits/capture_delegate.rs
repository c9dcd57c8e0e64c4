use crate::models::audio_models::AudioLevels;
use crate::models::encoded_audio::EncodedAudio;
use crate::models::error::CaptureError;
use crate::models::state::CaptureState;

/// Event delegate for capture session notifications.
///
/// `on_levels_updated` is called from the backend's audio thread; the other
/// methods from whichever thread drives the session. Implementations should
/// marshal to the UI thread if needed.
pub trait CaptureDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, state: &CaptureState);

    /// Called with the level of every delivered chunk.
    fn on_levels_updated(&self, levels: &AudioLevels);

    /// Called when starting or stopping fails.
    fn on_error(&self, error: &CaptureError);

    /// Called once per successful stop with the finished recording.
    fn on_capture_finished(&self, audio: &EncodedAudio);
}
