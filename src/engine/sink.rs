use std::collections::VecDeque;

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Device, Stream, StreamConfig,
};
use log::{debug, error, info};
use rtrb::{Consumer, RingBuffer};

use crate::{error::DeviceError, synth::SessionRenderer, MAX_BLOCK_SIZE};

const ERROR_QUEUE_CAPACITY: usize = 16;

/// Where a session's audio goes.
///
/// `activate` is the deferred first-use step and may fail; the engine treats
/// any failure as retryable. A connected renderer is owned by the sink until
/// `disconnect` or the next `connect`.
pub trait AudioSink {
    /// Open the device and report its sample rate.
    fn activate(&mut self) -> Result<f32, DeviceError>;

    fn connect(&mut self, renderer: SessionRenderer) -> Result<(), DeviceError>;

    fn disconnect(&mut self);

    /// Next error raised asynchronously by the output stream, if any.
    fn poll_error(&mut self) -> Option<DeviceError>;
}

/// Default output device through cpal.
pub struct CpalSink {
    device: Option<(Device, StreamConfig)>,
    stream: Option<Stream>,
    errors: Option<Consumer<DeviceError>>,
}

impl CpalSink {
    pub fn new() -> Self {
        Self {
            device: None,
            stream: None,
            errors: None,
        }
    }
}

impl Default for CpalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for CpalSink {
    fn activate(&mut self) -> Result<f32, DeviceError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(DeviceError::NoDevice)?;
        let config = device
            .default_output_config()
            .map_err(|e| DeviceError::Config(e.to_string()))?;

        let sample_rate = config.sample_rate().0 as f32;
        info!(
            "output device ready: {} Hz, {} channels",
            sample_rate,
            config.channels()
        );
        self.device = Some((device, config.into()));
        Ok(sample_rate)
    }

    fn connect(&mut self, mut renderer: SessionRenderer) -> Result<(), DeviceError> {
        self.disconnect();
        let (device, config) = self.device.as_ref().ok_or(DeviceError::NotReady)?;

        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;
        let (mut error_tx, error_rx) = RingBuffer::new(ERROR_QUEUE_CAPACITY);

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [f32], _| {
                    renderer.render_interleaved(data, channels, sample_rate);
                },
                move |err| {
                    // Full queue means the host is not ticking; dropping is fine
                    let _ = error_tx.push(DeviceError::Runtime(err.to_string()));
                },
                None,
            )
            .map_err(|e| DeviceError::Stream(e.to_string()))?;
        stream.play().map_err(|e| DeviceError::Stream(e.to_string()))?;

        debug!("output stream started ({channels} ch, block {MAX_BLOCK_SIZE})");
        self.stream = Some(stream);
        self.errors = Some(error_rx);
        Ok(())
    }

    fn disconnect(&mut self) {
        if self.stream.take().is_some() {
            debug!("output stream closed");
        }
    }

    fn poll_error(&mut self) -> Option<DeviceError> {
        let error = self.errors.as_mut()?.pop().ok()?;
        error!("{error}");
        Some(error)
    }
}

/// In-memory sink: renders on demand instead of on a device clock.
///
/// Used for tests and offline bounces. It can pretend the device is missing
/// and can inject stream errors.
pub struct OfflineSink {
    sample_rate: f32,
    available: bool,
    activations: usize,
    renderer: Option<SessionRenderer>,
    pending_errors: VecDeque<DeviceError>,
}

impl OfflineSink {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            available: true,
            activations: 0,
            renderer: None,
            pending_errors: VecDeque::new(),
        }
    }

    /// A sink whose device cannot be opened until `set_available(true)`.
    pub fn unavailable(sample_rate: f32) -> Self {
        Self {
            available: false,
            ..Self::new(sample_rate)
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Successful activations so far.
    pub fn activations(&self) -> usize {
        self.activations
    }

    pub fn is_connected(&self) -> bool {
        self.renderer.is_some()
    }

    pub fn renderer(&self) -> Option<&SessionRenderer> {
        self.renderer.as_ref()
    }

    pub fn inject_error(&mut self, error: DeviceError) {
        self.pending_errors.push_back(error);
    }

    /// Render `frames` mono samples; silence when nothing is connected.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render_interleaved(&mut out, 1, self.sample_rate);
        }
        out
    }
}

impl AudioSink for OfflineSink {
    fn activate(&mut self) -> Result<f32, DeviceError> {
        if !self.available {
            return Err(DeviceError::NoDevice);
        }
        self.activations += 1;
        Ok(self.sample_rate)
    }

    fn connect(&mut self, renderer: SessionRenderer) -> Result<(), DeviceError> {
        if !self.available {
            return Err(DeviceError::NotReady);
        }
        self.renderer = Some(renderer);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.renderer = None;
    }

    fn poll_error(&mut self) -> Option<DeviceError> {
        self.pending_errors.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        sequencing::{Genre, InstrumentClass},
        synth::{SharedControls, SynthMessage, VoiceBank},
    };
    use std::sync::Arc;

    #[test]
    fn offline_sink_renders_connected_session() {
        let mut sink = OfflineSink::new(8_000.0);
        assert_eq!(sink.render(64), vec![0.0; 64]);

        let (mut tx, rx) = RingBuffer::new(8);
        let bank = VoiceBank::new(&[InstrumentClass::Organ], Genre::Ambient);
        sink.activate().unwrap();
        let controls = Arc::new(SharedControls::new(1.0));
        sink.connect(SessionRenderer::new(bank, rx, controls, 0.5)).unwrap();
        tx.push(SynthMessage::NoteOn {
            voice: 0,
            note_id: 0,
            frequency: 220.0,
            velocity: 1.0,
        })
        .unwrap();

        assert!(sink.render(4_000).iter().any(|s| s.abs() > 0.01));
        sink.disconnect();
        assert!(!sink.is_connected());
    }

    #[test]
    fn unavailable_sink_fails_until_restored() {
        let mut sink = OfflineSink::unavailable(44_100.0);
        assert_eq!(sink.activate(), Err(DeviceError::NoDevice));
        sink.set_available(true);
        assert_eq!(sink.activate(), Ok(44_100.0));
        assert_eq!(sink.activations(), 1);
    }

    #[test]
    fn injected_errors_come_out_in_order() {
        let mut sink = OfflineSink::new(8_000.0);
        sink.inject_error(DeviceError::Runtime("underrun".into()));
        sink.inject_error(DeviceError::NoDevice);
        assert_eq!(sink.poll_error(), Some(DeviceError::Runtime("underrun".into())));
        assert_eq!(sink.poll_error(), Some(DeviceError::NoDevice));
        assert_eq!(sink.poll_error(), None);
    }
}
