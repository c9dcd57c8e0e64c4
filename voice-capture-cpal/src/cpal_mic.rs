//! cpal microphone capture provider.
//!
//! Opens an input stream on the default (or a named) device and delivers
//! mono `f32` chunks via the `ChunkCallback`. A cpal `Stream` is not `Send`,
//! so it lives on a dedicated thread from acquisition until release.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use parking_lot::Mutex;

use voice_capture_core::models::audio_models::AudioSource;
use voice_capture_core::models::config::CaptureConfiguration;
use voice_capture_core::models::error::CaptureError;
use voice_capture_core::processing::pcm;
use voice_capture_core::traits::capture_provider::{CancelFlag, CaptureProvider, ChunkCallback};

use crate::device_enumerator::{self, DeviceEnumerator};

/// How often a pending acquisition checks its cancel flag.
const GRANT_POLL_INTERVAL: Duration = Duration::from_millis(20);

const DEFAULT_DEVICE_ID: &str = "default-mic";

type Subscriber = Arc<Mutex<Option<ChunkCallback>>>;

/// cpal microphone capture.
///
/// The stream starts playing as soon as the device is acquired; buffers are
/// discarded until a callback is subscribed.
pub struct CpalMicCapture {
    device_name: Option<String>,
    frames_per_chunk: Option<u32>,
    subscriber: Subscriber,
    release_tx: Option<mpsc::Sender<()>>,
    capture_handle: Option<thread::JoinHandle<()>>,
    sample_rate: Option<u32>,
}

impl CpalMicCapture {
    /// Create a capture for the system default microphone.
    pub fn default_device() -> Self {
        Self::build(None, None)
    }

    /// Create a capture for a specific microphone by its cpal device name.
    pub fn with_device(name: impl Into<String>) -> Self {
        Self::build(Some(name.into()), None)
    }

    pub fn from_config(config: &CaptureConfiguration) -> Result<Self, CaptureError> {
        config.validate().map_err(CaptureError::ConfigurationFailed)?;
        Ok(Self::build(config.mic_device_id.clone(), config.frames_per_chunk))
    }

    fn build(device_name: Option<String>, frames_per_chunk: Option<u32>) -> Self {
        Self {
            device_name,
            frames_per_chunk,
            subscriber: Arc::new(Mutex::new(None)),
            release_tx: None,
            capture_handle: None,
            sample_rate: None,
        }
    }

    /// Sample rate of the open stream, if the device is acquired.
    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }
}

impl CaptureProvider for CpalMicCapture {
    fn is_available(&self) -> bool {
        DeviceEnumerator::new()
            .list_capture_devices()
            .map(|devices| match self.device_name {
                Some(ref name) => devices.iter().any(|d| &d.id == name),
                None => !devices.is_empty(),
            })
            .unwrap_or(false)
    }

    fn acquire(&mut self, cancel: &CancelFlag) -> Result<u32, CaptureError> {
        if let Some(rate) = self.sample_rate {
            return Ok(rate);
        }

        let (grant_tx, grant_rx) = mpsc::channel::<Result<u32, CaptureError>>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let device_name = self.device_name.clone();
        let frames_per_chunk = self.frames_per_chunk;
        let subscriber = Arc::clone(&self.subscriber);

        let handle = thread::Builder::new()
            .name("cpal-mic-capture".into())
            .spawn(move || {
                let stream = match open_stream(device_name.as_deref(), frames_per_chunk, subscriber) {
                    Ok((stream, rate)) => {
                        let _ = grant_tx.send(Ok(rate));
                        stream
                    }
                    Err(e) => {
                        let _ = grant_tx.send(Err(e));
                        return;
                    }
                };
                // Park until released; dropping the stream closes the device.
                let _ = release_rx.recv();
                drop(stream);
                log::debug!("Microphone stream closed");
            })
            .map_err(|e| CaptureError::AcquisitionFailed(format!("failed to spawn mic thread: {}", e)))?;

        self.release_tx = Some(release_tx);
        self.capture_handle = Some(handle);

        loop {
            if cancel.is_cancelled() {
                self.release();
                return Err(CaptureError::AcquisitionCancelled);
            }
            match grant_rx.recv_timeout(GRANT_POLL_INTERVAL) {
                Ok(Ok(rate)) => {
                    self.sample_rate = Some(rate);
                    return Ok(rate);
                }
                Ok(Err(e)) => {
                    self.release();
                    return Err(e);
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    self.release();
                    return Err(CaptureError::AcquisitionFailed(
                        "mic thread exited before opening the device".into(),
                    ));
                }
            }
        }
    }

    fn subscribe(&mut self, callback: ChunkCallback) -> Result<(), CaptureError> {
        if self.capture_handle.is_none() {
            return Err(CaptureError::ConfigurationFailed(
                "subscribe called before the device was acquired".into(),
            ));
        }
        *self.subscriber.lock() = Some(callback);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        // The audio thread holds this lock while the callback runs.
        *self.subscriber.lock() = None;
    }

    fn release(&mut self) {
        if let Some(tx) = self.release_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.capture_handle.take() {
            if handle.join().is_err() {
                log::warn!("Microphone thread panicked during shutdown");
            }
        }
        self.sample_rate = None;
    }

    fn device_info(&self) -> AudioSource {
        let name = self
            .device_name
            .clone()
            .unwrap_or_else(|| "Default Microphone".into());
        AudioSource {
            id: self
                .device_name
                .clone()
                .unwrap_or_else(|| DEFAULT_DEVICE_ID.into()),
            transport_type: Some(device_enumerator::transport_from_name(&name)),
            name,
            is_default: self.device_name.is_none(),
        }
    }
}

impl Drop for CpalMicCapture {
    fn drop(&mut self) {
        self.unsubscribe();
        self.release();
    }
}

/// Open and start the input stream. Runs on the mic thread.
fn open_stream(
    device_name: Option<&str>,
    frames_per_chunk: Option<u32>,
    subscriber: Subscriber,
) -> Result<(Stream, u32), CaptureError> {
    let host = cpal::default_host();
    let device = match device_name {
        Some(name) => host
            .input_devices()
            .map_err(|e| backend_error(&e.to_string()))?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
            .ok_or(CaptureError::DeviceNotAvailable)?,
        None => host
            .default_input_device()
            .ok_or(CaptureError::DeviceNotAvailable)?,
    };

    let supported = device.default_input_config().map_err(map_default_config_error)?;
    let sample_format = supported.sample_format();
    let mut config: StreamConfig = supported.into();
    if let Some(frames) = frames_per_chunk {
        config.buffer_size = BufferSize::Fixed(frames);
    }
    let sample_rate = config.sample_rate.0;

    log::info!(
        "Opening microphone {:?}: {} Hz, {} channels, {:?}",
        device.name().unwrap_or_default(),
        sample_rate,
        config.channels,
        sample_format
    );

    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, subscriber)?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, subscriber)?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, subscriber)?,
        other => {
            return Err(CaptureError::ConfigurationFailed(format!(
                "unsupported sample format {:?}",
                other
            )))
        }
    };

    stream.play().map_err(|e| match e {
        cpal::PlayStreamError::DeviceNotAvailable => CaptureError::DeviceNotAvailable,
        cpal::PlayStreamError::BackendSpecific { err } => backend_error(&err.description),
    })?;

    Ok((stream, sample_rate))
}

fn build_stream<T>(device: &Device, config: &StreamConfig, subscriber: Subscriber) -> Result<Stream, CaptureError>
where
    T: SizedSample + Send + 'static,
    f32: FromSample<T>,
{
    let channels = usize::from(config.channels);

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let guard = subscriber.lock();
                if let Some(ref callback) = *guard {
                    let mono = to_mono_f32(data, channels);
                    callback(&mono);
                }
            },
            |err| log::error!("Microphone stream error: {}", err),
            None,
        )
        .map_err(map_build_error)
}

/// Convert interleaved device samples to normalized mono `f32`.
fn to_mono_f32<T>(data: &[T], channels: usize) -> Vec<f32>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let samples: Vec<f32> = data.iter().map(|&s| <f32 as FromSample<T>>::from_sample_(s)).collect();
    if channels <= 1 {
        return samples;
    }
    pcm::downmix_to_mono(&samples, channels)
}

fn map_build_error(err: cpal::BuildStreamError) -> CaptureError {
    match err {
        cpal::BuildStreamError::DeviceNotAvailable => CaptureError::DeviceNotAvailable,
        cpal::BuildStreamError::BackendSpecific { err } => backend_error(&err.description),
        other => CaptureError::ConfigurationFailed(other.to_string()),
    }
}

fn map_default_config_error(err: cpal::DefaultStreamConfigError) -> CaptureError {
    match err {
        cpal::DefaultStreamConfigError::DeviceNotAvailable => CaptureError::DeviceNotAvailable,
        cpal::DefaultStreamConfigError::BackendSpecific { err } => backend_error(&err.description),
        other => CaptureError::ConfigurationFailed(other.to_string()),
    }
}

/// Classify a backend message. Platforms report a refused microphone as a
/// backend-specific error, so the description is the only signal.
pub(crate) fn backend_error(description: &str) -> CaptureError {
    let lower = description.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized") {
        CaptureError::PermissionDenied
    } else {
        CaptureError::AcquisitionFailed(description.to_string())
    }
}
