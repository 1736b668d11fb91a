//! Audio output using cpal.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    BufferSize, Device, SampleFormat, SampleRate, Stream, StreamConfig,
};
use parking_lot::Mutex;
use podcastr_core::{Error, Result};
use tracing::{debug, error, info, trace};

/// Decoded samples shared between the engine worker and the output callback.
#[derive(Debug)]
pub struct PlaybackBuffer {
    samples: Mutex<VecDeque<f32>>,
    channels: usize,
    consumed_frames: AtomicU64,
    playing: AtomicBool,
}

impl PlaybackBuffer {
    pub fn new(channels: u16) -> Self {
        Self {
            samples: Mutex::new(VecDeque::new()),
            channels: usize::from(channels.max(1)),
            consumed_frames: AtomicU64::new(0),
            playing: AtomicBool::new(false),
        }
    }

    /// Append interleaved samples.
    pub fn push(&self, samples: &[f32]) {
        self.samples.lock().extend(samples.iter().copied());
    }

    /// Samples waiting to be played.
    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }

    /// Drop queued samples and restart the frame counter.
    pub fn reset(&self) {
        self.samples.lock().clear();
        self.consumed_frames.store(0, Ordering::Relaxed);
    }

    /// Frames handed to the device since the last reset.
    pub fn consumed_frames(&self) -> u64 {
        self.consumed_frames.load(Ordering::Relaxed)
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::Relaxed);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    /// Fill `out` from the queue, returning how many samples were real audio.
    ///
    /// Whatever is left over (paused or underrun) is silence.
    pub fn fill(&self, out: &mut [f32]) -> usize {
        if !self.is_playing() {
            out.fill(0.0);
            return 0;
        }

        let mut queue = self.samples.lock();
        let available = queue.len().min(out.len());
        // Only hand out whole frames so channels stay aligned.
        let available = available - available % self.channels;
        for (slot, sample) in out.iter_mut().zip(queue.drain(..available)) {
            *slot = sample;
        }
        drop(queue);

        out[available..].fill(0.0);
        self.consumed_frames
            .fetch_add((available / self.channels) as u64, Ordering::Relaxed);
        available
    }
}

/// An open output stream. Dropping it stops the device.
pub struct AudioOutput {
    _stream: Stream,
    device_name: String,
    sample_rate: u32,
    channels: u16,
}

impl AudioOutput {
    /// Open the default device at the track's own rate and channel count.
    pub fn open(buffer: Arc<PlaybackBuffer>, sample_rate: u32, channels: u16) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::AudioOutput("No output device found".to_string()))?;

        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        info!("Using audio output device: {device_name}");

        let sample_format = device
            .default_output_config()
            .map_err(|e| Error::AudioOutput(format!("Failed to get output config: {e}")))?
            .sample_format();

        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(sample_rate),
            buffer_size: BufferSize::Default,
        };
        debug!("Output config: {sample_rate}Hz, {channels} channels, {sample_format:?}");

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, buffer)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, buffer)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, buffer)?,
            _ => {
                return Err(Error::AudioOutput(format!(
                    "Unsupported sample format: {sample_format:?}"
                )));
            }
        };

        stream
            .play()
            .map_err(|e| Error::AudioOutput(format!("Failed to start stream: {e}")))?;

        Ok(Self {
            _stream: stream,
            device_name,
            sample_rate,
            channels,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub const fn channels(&self) -> u16 {
        self.channels
    }
}

fn build_stream<T>(device: &Device, config: &StreamConfig, buffer: Arc<PlaybackBuffer>) -> Result<Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let err_fn = |err| {
        error!("Audio stream error: {err}");
    };

    let mut scratch: Vec<f32> = Vec::new();
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                scratch.resize(data.len(), 0.0);
                let written = buffer.fill(&mut scratch);
                if written < data.len() && buffer.is_playing() {
                    trace!("Underrun: needed {}, got {written}", data.len());
                }
                for (out, sample) in data.iter_mut().zip(&scratch) {
                    *out = T::from_sample(*sample);
                }
            },
            err_fn,
            None,
        )
        .map_err(|e| Error::AudioOutput(format!("Failed to build stream: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_buffer_outputs_silence() {
        let buffer = PlaybackBuffer::new(2);
        buffer.push(&[0.5; 8]);

        let mut out = [1.0; 4];
        assert_eq!(buffer.fill(&mut out), 0);
        assert_eq!(out, [0.0; 4]);
        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer.consumed_frames(), 0);
    }

    #[test]
    fn test_fill_counts_whole_frames() {
        let buffer = PlaybackBuffer::new(2);
        buffer.set_playing(true);
        buffer.push(&[0.25; 5]);

        let mut out = [1.0; 8];
        assert_eq!(buffer.fill(&mut out), 4);
        assert_eq!(&out[..4], &[0.25; 4]);
        assert_eq!(&out[4..], &[0.0; 4]);
        assert_eq!(buffer.consumed_frames(), 2);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_reset_clears_queue_and_counter() {
        let buffer = PlaybackBuffer::new(1);
        buffer.set_playing(true);
        buffer.push(&[0.1, 0.2, 0.3]);
        let mut out = [0.0; 2];
        buffer.fill(&mut out);

        buffer.reset();
        assert!(buffer.is_empty());
        assert_eq!(buffer.consumed_frames(), 0);
    }
}
