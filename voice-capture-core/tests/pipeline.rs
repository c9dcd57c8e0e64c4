//! End-to-end: a fake microphone thread feeds a `CaptureSession`, and the
//! finished recording is checked byte for byte.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use voice_capture_core::processing::pcm;
use voice_capture_core::processing::wav_format::WAV_HEADER_SIZE;
use voice_capture_core::{
    AudioSource, AudioTransportType, CancelFlag, CaptureError, CaptureProvider, CaptureSession, CaptureState,
    ChunkCallback,
};

const RATE: u32 = 22050;
const CHUNKS: usize = 40;
const FRAMES: usize = 256;

/// Microphone that emits a fixed ramp from its own thread once subscribed.
struct ThreadedMic {
    callback: Arc<Mutex<Option<ChunkCallback>>>,
    running: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl ThreadedMic {
    fn new() -> Self {
        Self {
            callback: Arc::new(Mutex::new(None)),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }
}

fn chunk(index: usize) -> Vec<f32> {
    (0..FRAMES)
        .map(|j| ((index * FRAMES + j) % 200) as f32 / 100.0 - 1.0)
        .collect()
}

impl CaptureProvider for ThreadedMic {
    fn is_available(&self) -> bool {
        true
    }

    fn acquire(&mut self, _cancel: &CancelFlag) -> Result<u32, CaptureError> {
        self.running.store(true, Ordering::SeqCst);
        let callback = Arc::clone(&self.callback);
        let running = Arc::clone(&self.running);
        self.worker = Some(thread::spawn(move || {
            let mut sent = 0;
            while running.load(Ordering::SeqCst) && sent < CHUNKS {
                let guard = callback.lock();
                if let Some(ref cb) = *guard {
                    cb(&chunk(sent));
                    sent += 1;
                }
                drop(guard);
                thread::sleep(Duration::from_micros(200));
            }
        }));
        Ok(RATE)
    }

    fn subscribe(&mut self, callback: ChunkCallback) -> Result<(), CaptureError> {
        *self.callback.lock() = Some(callback);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        *self.callback.lock() = None;
    }

    fn release(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    fn device_info(&self) -> AudioSource {
        AudioSource {
            id: "threaded-mic".into(),
            name: "Threaded Test Microphone".into(),
            is_default: true,
            transport_type: Some(AudioTransportType::Virtual),
        }
    }
}

#[test]
fn recording_from_threaded_device_is_complete_and_ordered() {
    let session = CaptureSession::new(ThreadedMic::new());
    session.start().unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while session.diagnostics().callback_count < CHUNKS as u64 {
        assert!(Instant::now() < deadline, "fake microphone stalled");
        thread::sleep(Duration::from_millis(1));
    }

    let audio = session.stop().unwrap().expect("recording produced audio");
    let expected: Vec<f32> = (0..CHUNKS).flat_map(chunk).collect();

    assert_eq!(audio.sample_rate(), RATE);
    assert_eq!(audio.sample_count(), CHUNKS * FRAMES);
    assert_eq!(audio.len(), WAV_HEADER_SIZE + CHUNKS * FRAMES * 2);

    let header = audio.header().unwrap();
    assert_eq!(header.sample_rate, RATE);
    assert_eq!(header.channels, 1);
    assert_eq!(header.bits_per_sample, 16);
    assert_eq!(header.data_size as usize, CHUNKS * FRAMES * 2);

    assert_eq!(&audio.as_bytes()[WAV_HEADER_SIZE..], pcm::quantize(&expected).as_slice());
    assert!(matches!(session.state(), CaptureState::Stopped { .. }));
}

#[test]
fn stop_mid_stream_keeps_every_delivered_chunk() {
    let session = CaptureSession::new(ThreadedMic::new());
    session.start().unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while session.diagnostics().callback_count < 5 {
        assert!(Instant::now() < deadline, "fake microphone stalled");
        thread::sleep(Duration::from_millis(1));
    }

    let audio = session.stop().unwrap().unwrap();
    let delivered = session.diagnostics().callback_count as usize;

    // Every chunk that reached the callback is in the recording, in order.
    let expected: Vec<f32> = (0..delivered).flat_map(chunk).collect();
    assert_eq!(audio.sample_count(), expected.len());
    assert_eq!(&audio.as_bytes()[WAV_HEADER_SIZE..], pcm::quantize(&expected).as_slice());
}
