//! CPAL-based audio output backend.
//!
//! Frames travel from the playback thread to the device callback through a
//! lock-free ring buffer of about 100 ms. The callback outputs silence on
//! underrun or while stopped.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use muse_engine::Frame;
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

use crate::traits::{AudioError, AudioOutput};

/// Output on the host's default device.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    producer: HeapProd<Frame>,
    running: Arc<AtomicBool>,
}

impl CpalOutput {
    /// Open the default output device.
    ///
    /// Returns the output and the consumer half of its ring buffer, to be
    /// handed to [`CpalOutput::build_stream`].
    pub fn new() -> Result<(Self, HeapCons<Frame>), AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        let mut config: StreamConfig = supported.into();
        // the callback writes interleaved stereo
        config.channels = 2;

        let capacity = (config.sample_rate.0 as usize / 10).max(1);
        let (producer, consumer) = HeapRb::<Frame>::new(capacity).split();

        info!(
            host = ?host.id(),
            device = %device.name().unwrap_or_default(),
            sample_rate = config.sample_rate.0,
            "audio output opened"
        );

        let output = Self {
            device,
            config,
            stream: None,
            producer,
            running: Arc::new(AtomicBool::new(false)),
        };
        Ok((output, consumer))
    }

    /// Build the device stream that drains `consumer`.
    pub fn build_stream(&mut self, mut consumer: HeapCons<Frame>) -> Result<(), AudioError> {
        let running = self.running.clone();
        let channels = self.config.channels as usize;

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let live = running.load(Ordering::Relaxed);
                    for chunk in data.chunks_mut(channels) {
                        let frame = if live {
                            consumer.try_pop().unwrap_or_default()
                        } else {
                            Frame::silence()
                        };
                        write_device_frame(chunk, frame);
                    }
                },
                |err| error!(%err, "audio stream error"),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        self.stream = Some(stream);
        Ok(())
    }
}

/// Spread one stereo frame over a device frame; extra channels get silence.
fn write_device_frame(chunk: &mut [f32], frame: Frame) {
    let left = frame.left as f32 / 32768.0;
    let right = frame.right as f32 / 32768.0;
    for (i, sample) in chunk.iter_mut().enumerate() {
        *sample = match i {
            0 => left,
            1 => right,
            _ => 0.0,
        };
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Spins until the device callback has made room; this paces the
    /// caller to the output sample rate.
    fn write(&mut self, frames: &[Frame]) -> Result<(), AudioError> {
        if self.stream.is_none() || !self.running.load(Ordering::Relaxed) {
            return Err(AudioError::Playback("output stream is not running".into()));
        }
        let mut pending = frames;
        while !pending.is_empty() {
            let pushed = self.producer.push_slice(pending);
            pending = &pending[pushed..];
            if pushed == 0 {
                std::hint::spin_loop();
            }
        }
        Ok(())
    }

    fn start(&mut self) -> Result<(), AudioError> {
        self.running.store(true, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream.pause().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }
}
