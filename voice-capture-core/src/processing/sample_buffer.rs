use crate::models::audio_models::CaptureChunk;

/// Ordered accumulator of capture chunks.
///
/// Arrival order is preserved; reordering would corrupt the audio. Growth is
/// unbounded, limited only by available memory.
///
/// Not synchronized. The capture session is its single writer: chunks reach
/// it over a channel and `flatten` runs only after the stream callback has
/// been detached.
#[derive(Debug, Default)]
pub struct SampleBuffer {
    chunks: Vec<CaptureChunk>,
    len: usize,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk at the end. Empty chunks are ignored.
    pub fn append(&mut self, chunk: CaptureChunk) {
        if chunk.is_empty() {
            return;
        }
        self.len += chunk.len();
        self.chunks.push(chunk);
    }

    /// Merge all chunks into one contiguous sequence and clear the buffer.
    ///
    /// The result length equals the sum of chunk lengths. An empty buffer
    /// yields an empty vector.
    pub fn flatten(&mut self) -> Vec<f32> {
        let mut merged = Vec::with_capacity(self.len);
        for chunk in self.chunks.drain(..) {
            merged.extend_from_slice(chunk.samples());
        }
        self.len = 0;
        merged
    }

    /// Number of samples currently buffered.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}
