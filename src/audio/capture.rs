use super::error::AudioError;
use super::format::AudioFormat;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, StreamConfig};
use ringbuf::{HeapCons, HeapRb, traits::*};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Names of the available input devices, in enumeration order.
pub fn list_input_devices() -> Result<Vec<String>, AudioError> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| AudioError::Device(e.to_string()))?;

    Ok(devices
        .map(|device| device.name().unwrap_or_else(|_| "<unknown>".to_string()))
        .collect())
}

/// Live input capture stream yielding fixed-size blocks of i32 PCM.
///
/// The cpal callback pushes whatever the device delivers into a ring buffer;
/// `read_block` hands out exact `block_size` blocks from it. Dropping the
/// stream releases the device, on error paths included.
pub struct CaptureStream {
    _stream: cpal::Stream,
    consumer: HeapCons<i32>,
    notify: Arc<Notify>,
    fault: Arc<Mutex<Option<String>>>,
    block_size: usize,
}

impl CaptureStream {
    /// Open the input device at `device_index` for capture.
    pub fn open(
        device_index: usize,
        format: AudioFormat,
        block_size: usize,
    ) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let mut devices: Vec<_> = host
            .input_devices()
            .map_err(|e| AudioError::Device(e.to_string()))?
            .collect();

        if device_index >= devices.len() {
            return Err(AudioError::DeviceOutOfRange {
                index: device_index,
                available: devices.len(),
            });
        }
        let device = devices.remove(device_index);

        let config = StreamConfig {
            channels: format.channels,
            sample_rate: SampleRate(format.sample_rate),
            buffer_size: BufferSize::Default,
        };

        // A minute of headroom so a briefly stalled consumer loses nothing.
        let ring = HeapRb::<i32>::new(format.samples_for_duration(60.0).max(block_size * 2));
        let (mut producer, consumer) = ring.split();

        let notify = Arc::new(Notify::new());
        let notify_callback = notify.clone();
        let fault = Arc::new(Mutex::new(None));
        let fault_callback = fault.clone();
        let notify_fault = notify.clone();

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[i32], _info: &cpal::InputCallbackInfo| {
                    producer.push_slice(data);
                    notify_callback.notify_one();
                },
                move |err| {
                    if let Ok(mut slot) = fault_callback.lock() {
                        slot.get_or_insert_with(|| err.to_string());
                    }
                    notify_fault.notify_one();
                },
                None,
            )
            .map_err(|e| AudioError::Device(e.to_string()))?;

        stream.play().map_err(|e| AudioError::Device(e.to_string()))?;

        tracing::info!("Audio capture started");
        Ok(Self {
            _stream: stream,
            consumer,
            notify,
            fault,
            block_size,
        })
    }

    /// Wait for and return the next full block of samples.
    ///
    /// Suspends until `block_size` samples are available; there is no
    /// timeout, so a stalled device blocks until it produces data or the
    /// stream reports a fault.
    pub async fn read_block(&mut self) -> Result<Vec<i32>, AudioError> {
        loop {
            if let Some(fault) = self.fault.lock().ok().and_then(|mut slot| slot.take()) {
                return Err(AudioError::Capture(fault));
            }

            if self.consumer.occupied_len() >= self.block_size {
                let mut block = vec![0i32; self.block_size];
                let n = self.consumer.pop_slice(&mut block);
                debug_assert_eq!(n, self.block_size);
                return Ok(block);
            }

            self.notify.notified().await;
        }
    }
}
