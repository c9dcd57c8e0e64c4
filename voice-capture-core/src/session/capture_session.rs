use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::audio_models::{AudioLevels, AudioSource, CaptureChunk, CaptureSessionDiagnostics};
use crate::models::encoded_audio::EncodedAudio;
use crate::models::error::CaptureError;
use crate::models::state::CaptureState;
use crate::processing::levels;
use crate::processing::sample_buffer::SampleBuffer;
use crate::session::device_claims::{DeviceClaim, DeviceClaims};
use crate::traits::capture_delegate::CaptureDelegate;
use crate::traits::capture_provider::{CancelFlag, CaptureProvider, ChunkCallback};

/// Session state owned by the controlling thread. The audio thread never
/// touches it; chunks reach the buffer through `chunks`.
struct SessionInner {
    state: CaptureState,
    sample_rate: Option<u32>,
    buffer: SampleBuffer,
    chunks: Option<Receiver<CaptureChunk>>,
    cancel: CancelFlag,
    claim: Option<DeviceClaim>,
}

impl SessionInner {
    fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            sample_rate: None,
            buffer: SampleBuffer::new(),
            chunks: None,
            cancel: CancelFlag::new(),
            claim: None,
        }
    }

    /// Move every chunk delivered so far into the buffer, in arrival order.
    fn drain_pending(&mut self) {
        if let Some(rx) = &self.chunks {
            for chunk in rx.try_iter() {
                self.buffer.append(chunk);
            }
        }
    }
}

/// Metering updated from the audio thread.
#[derive(Default)]
struct StreamStats {
    levels: AudioLevels,
    diagnostics: CaptureSessionDiagnostics,
}

/// One microphone recording lifecycle over a [`CaptureProvider`].
///
/// Data flow:
/// ```text
/// [Provider callback] → mpsc → [SampleBuffer] → flatten → quantize → WAV → EncodedAudio
/// ```
///
/// All methods take `&self`, so `stop()` can be issued from another thread
/// while `start()` is still waiting for the device. Lock order is always
/// provider before session state.
pub struct CaptureSession<P: CaptureProvider> {
    provider: Mutex<P>,
    source: AudioSource,
    device_id: String,
    claims: DeviceClaims,
    inner: Mutex<SessionInner>,
    stats: Arc<Mutex<StreamStats>>,
    delegate: Option<Arc<dyn CaptureDelegate>>,
    // Held while a state notification is delivered, so observers see
    // transitions in the order they happened. Taken before `inner`.
    notify_order: Mutex<()>,
}

impl<P: CaptureProvider> CaptureSession<P> {
    /// Create a session with its own device registry.
    pub fn new(provider: P) -> Self {
        Self::with_claims(provider, DeviceClaims::new())
    }

    /// Create a session that shares `claims` with other sessions, so only one
    /// of them can record from a given device at a time.
    pub fn with_claims(provider: P, claims: DeviceClaims) -> Self {
        let source = provider.device_info();
        Self {
            device_id: source.id.clone(),
            source,
            provider: Mutex::new(provider),
            claims,
            inner: Mutex::new(SessionInner::new()),
            stats: Arc::new(Mutex::new(StreamStats::default())),
            delegate: None,
            notify_order: Mutex::new(()),
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CaptureDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> CaptureState {
        self.inner.lock().state.clone()
    }

    /// Sample rate reported by the device for the current or last recording.
    pub fn sample_rate(&self) -> Option<u32> {
        self.inner.lock().sample_rate
    }

    pub fn current_levels(&self) -> AudioLevels {
        self.stats.lock().levels
    }

    pub fn diagnostics(&self) -> CaptureSessionDiagnostics {
        self.stats.lock().diagnostics.clone()
    }

    /// Samples received so far in the current recording.
    pub fn buffered_samples(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.drain_pending();
        inner.buffer.len()
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Devices this session can record from.
    ///
    /// While `start()` is waiting for the device the provider is busy, so the
    /// source captured at construction is reported instead.
    pub fn available_audio_sources(&self) -> Result<Vec<AudioSource>, CaptureError> {
        let Some(provider) = self.provider.try_lock() else {
            return Ok(vec![self.source.clone()]);
        };
        let mut sources = Vec::new();
        if provider.is_available() {
            sources.push(provider.device_info());
        }
        Ok(sources)
    }

    /// Acquire the device and begin recording.
    ///
    /// Transitions: idle/stopped/failed → requesting → recording, or
    /// requesting → failed when the device is denied. Blocks while the device
    /// is being acquired. Returns `CaptureError::AcquisitionCancelled` when
    /// `stop()` interrupted the request.
    pub fn start(&self) -> Result<(), CaptureError> {
        // The claim stays with this call until the provider has released the
        // device, even if `stop()` cancels the request meanwhile.
        let (cancel, claim) = self.begin_request()?;
        log::info!("Requesting capture device '{}'", self.device_id);
        self.notify_if_current(&CaptureState::Requesting);

        let mut provider = self.provider.lock();
        let acquired = match provider.acquire(&cancel) {
            Ok(0) => Err(CaptureError::AcquisitionFailed(
                "device reported a zero sample rate".into(),
            )),
            other => other,
        };
        let sample_rate = match acquired {
            Ok(rate) => rate,
            Err(error) => {
                provider.release();
                drop(provider);
                drop(claim);
                return self.fail_request(&cancel, error);
            }
        };

        let mut inner = self.inner.lock();
        if cancel.is_cancelled() {
            drop(inner);
            provider.release();
            drop(claim);
            log::info!("Device '{}' granted after cancellation, released", self.device_id);
            return Err(CaptureError::AcquisitionCancelled);
        }

        {
            let mut stats = self.stats.lock();
            *stats = StreamStats::default();
            stats.diagnostics.device_format = format!("{} Hz mono f32", sample_rate);
        }

        let (tx, rx) = mpsc::channel();
        if let Err(error) = provider.subscribe(self.chunk_callback(tx)) {
            provider.release();
            drop(claim);
            inner.state = CaptureState::Failed(error.clone());
            drop(inner);
            drop(provider);
            log::error!("Failed to subscribe to device '{}': {}", self.device_id, error);
            self.notify_failed(&error);
            return Err(error);
        }

        inner.buffer = SampleBuffer::new();
        inner.chunks = Some(rx);
        inner.claim = Some(claim);
        inner.sample_rate = Some(sample_rate);
        inner.state = CaptureState::Recording;
        drop(inner);
        drop(provider);

        log::info!("Recording from '{}' at {} Hz", self.device_id, sample_rate);
        self.notify_if_current(&CaptureState::Recording);
        Ok(())
    }

    /// Stop recording and encode everything captured.
    ///
    /// Transitions: recording → stopping → stopped. From requesting the
    /// pending acquisition is cancelled and the session returns to idle. In
    /// every other state this is a no-op returning `Ok(None)`.
    pub fn stop(&self) -> Result<Option<EncodedAudio>, CaptureError> {
        {
            let mut inner = self.inner.lock();
            if inner.state.is_requesting() {
                // The blocked start() still owns the device claim and drops it
                // once the provider has released the device.
                inner.cancel.cancel();
                inner.state = CaptureState::Idle;
                drop(inner);
                log::info!("Stop during device request, acquisition cancelled");
                self.notify_state(&CaptureState::Idle);
                return Ok(None);
            }
            if !inner.state.is_recording() {
                log::debug!("stop() ignored in state {}", inner.state.name());
                return Ok(None);
            }
            inner.state = CaptureState::Stopping;
        }
        self.notify_state(&CaptureState::Stopping);

        // Detach before the final drain so no chunk can arrive after flatten.
        {
            let mut provider = self.provider.lock();
            provider.unsubscribe();
            provider.release();
        }

        let (samples, sample_rate) = {
            let mut inner = self.inner.lock();
            inner.drain_pending();
            inner.chunks = None;
            inner.claim = None;
            (inner.buffer.flatten(), inner.sample_rate.unwrap_or(0))
        };

        match EncodedAudio::encode(&samples, sample_rate) {
            Ok(audio) => {
                let stopped = CaptureState::Stopped {
                    duration_secs: audio.duration_secs(),
                };
                self.inner.lock().state = stopped.clone();
                log::info!(
                    "Recording stopped: {} samples at {} Hz ({} bytes)",
                    audio.sample_count(),
                    audio.sample_rate(),
                    audio.len()
                );
                self.notify_state(&stopped);
                if let Some(ref delegate) = self.delegate {
                    delegate.on_capture_finished(&audio);
                }
                Ok(Some(audio))
            }
            Err(error) => {
                self.inner.lock().state = CaptureState::Failed(error.clone());
                log::error!("Failed to encode recording: {}", error);
                self.notify_failed(&error);
                Err(error)
            }
        }
    }

    // --- Internal helpers ---

    /// Check for a concurrent start, claim the device, enter `Requesting`.
    fn begin_request(&self) -> Result<(CancelFlag, DeviceClaim), CaptureError> {
        let mut inner = self.inner.lock();
        if inner.state.is_active() {
            log::warn!("start() rejected: session is {}", inner.state.name());
            return Err(CaptureError::Busy(format!(
                "session is already {}",
                inner.state.name()
            )));
        }

        let claim = self.claims.claim(&self.device_id).inspect_err(|e| {
            log::warn!("start() rejected: {}", e);
        })?;

        let cancel = CancelFlag::new();
        inner.cancel = cancel.clone();
        inner.sample_rate = None;
        inner.state = CaptureState::Requesting;
        Ok((cancel, claim))
    }

    /// Resolve a failed acquisition: cancelled requests leave the state to
    /// `stop()`, everything else moves the session to `Failed`.
    fn fail_request(&self, cancel: &CancelFlag, error: CaptureError) -> Result<(), CaptureError> {
        {
            let mut inner = self.inner.lock();
            if cancel.is_cancelled() {
                log::info!("Acquisition of '{}' cancelled", self.device_id);
                return Err(CaptureError::AcquisitionCancelled);
            }
            inner.state = CaptureState::Failed(error.clone());
        }
        log::error!("Failed to acquire device '{}': {}", self.device_id, error);
        self.notify_failed(&error);
        Err(error)
    }

    /// The streaming callback: meters each chunk and forwards it to the
    /// session without blocking the audio thread.
    fn chunk_callback(&self, tx: Sender<CaptureChunk>) -> ChunkCallback {
        let stats = Arc::clone(&self.stats);
        let delegate = self.delegate.clone();

        Arc::new(move |samples: &[f32]| {
            let levels = levels::measure(samples);
            {
                let mut s = stats.lock();
                s.levels = levels;
                s.diagnostics.callback_count += 1;
                s.diagnostics.samples_total += samples.len() as u64;
            }

            if let Some(ref d) = delegate {
                d.on_levels_updated(&levels);
            }

            // The receiver outlives the subscription, so this only fails if
            // a backend keeps calling after unsubscribe.
            if tx.send(CaptureChunk::from(samples)).is_err() {
                log::debug!("Dropping chunk delivered after session teardown");
            }
        })
    }

    /// Must not be called while holding `inner`.
    fn notify_state(&self, state: &CaptureState) {
        if let Some(ref delegate) = self.delegate {
            let _order = self.notify_order.lock();
            delegate.on_state_changed(state);
        }
    }

    /// Notify `state` only if the session is still in it. A concurrent
    /// `stop()` may already have moved on and reported its own transition.
    fn notify_if_current(&self, state: &CaptureState) {
        if let Some(ref delegate) = self.delegate {
            let _order = self.notify_order.lock();
            if self.inner.lock().state == *state {
                delegate.on_state_changed(state);
            }
        }
    }

    fn notify_failed(&self, error: &CaptureError) {
        if let Some(ref delegate) = self.delegate {
            let _order = self.notify_order.lock();
            delegate.on_state_changed(&CaptureState::Failed(error.clone()));
            delegate.on_error(error);
        }
    }
}

impl<P: CaptureProvider> Drop for CaptureSession<P> {
    fn drop(&mut self) {
        if self.inner.get_mut().state.is_active() {
            let provider = self.provider.get_mut();
            provider.unsubscribe();
            provider.release();
            log::warn!("Capture session for '{}' dropped while active, device released", self.device_id);
        }
    }
}
