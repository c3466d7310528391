pub mod decoder;
pub mod demo;
pub mod protocol;
pub mod types;

use anyhow::{anyhow, Result};
use axis_config::MidiConfig;
use protocol::MidiParser;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use types::{DeviceEvent, MidiCommand};

pub use decoder::{ComponentDecoder, DecodeOutcome, OrientationState};
pub use types::{Axis, ControlChange};

/// Receiver for transport events, typically a handle into the UI event loop.
pub trait EventSink: Send + 'static {
    /// Deliver one event. Returns `false` once the receiver is gone.
    fn deliver(&self, event: DeviceEvent) -> bool;
}

/// Client for the orientation sensor's control link.
///
/// Reads the MIDI byte stream from a serial port, forwards control changes and
/// connection lifecycle events to an [`EventSink`], and writes outbound commands.
pub struct MidiClient {
    command_tx: mpsc::UnboundedSender<MidiCommand>,
    _task: tokio::task::JoinHandle<()>,
}

impl MidiClient {
    /// Open the configured serial port and start processing.
    pub fn connect<S: EventSink>(config: &MidiConfig, sink: S) -> Result<Self> {
        let port = config
            .port
            .as_deref()
            .ok_or_else(|| anyhow!("No MIDI port configured"))?;
        tracing::info!(port, baud = config.baud_rate, "Opening MIDI port");

        let stream = tokio_serial::new(port, config.baud_rate).open_native_async()?;
        tracing::info!(port, "MIDI port open");

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(midi_read_loop(stream, sink, command_rx));

        Ok(Self {
            command_tx,
            _task: task,
        })
    }

    /// Start the synthetic demo device instead of a real one.
    pub fn demo<S: EventSink>(sink: S) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(demo::demo_loop(sink, command_rx));
        Self {
            command_tx,
            _task: task,
        }
    }

    /// Queue a command for the device. Never blocks and never fails.
    pub fn send(&self, command: MidiCommand) {
        if self.command_tx.send(command).is_err() {
            tracing::warn!(?command, "MIDI link closed, command dropped");
        }
    }
}

/// Background task: read the port, parse control changes, forward events,
/// and write queued commands.
async fn midi_read_loop<S: EventSink>(
    mut stream: SerialStream,
    sink: S,
    mut command_rx: mpsc::UnboundedReceiver<MidiCommand>,
) {
    let mut parser = MidiParser::new();
    let mut buf = [0u8; 256];
    let mut message_count: u64 = 0;

    if !sink.deliver(DeviceEvent::Connected) {
        return;
    }

    loop {
        tokio::select! {
            result = stream.read(&mut buf) => {
                match result {
                    Ok(0) => {
                        tracing::warn!("MIDI port closed");
                        break;
                    }
                    Ok(n) => {
                        parser.push_data(&buf[..n]);

                        while let Some(message) = parser.next_event() {
                            if !sink.deliver(DeviceEvent::ControlChange(message)) {
                                tracing::debug!("Event sink closed, stopping MIDI reader");
                                return;
                            }
                            message_count += 1;
                            if message_count % 1000 == 0 {
                                tracing::debug!(message_count, "Control changes received");
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(?e, "MIDI read error");
                        break;
                    }
                }
            }
            Some(cmd) = command_rx.recv() => {
                if let Err(e) = stream.write_all(&cmd.to_bytes()).await {
                    tracing::warn!(?e, ?cmd, "Failed to send MIDI command");
                }
            }
        }
    }

    sink.deliver(DeviceEvent::Disconnected);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedSink;

    impl EventSink for ClosedSink {
        fn deliver(&self, _event: DeviceEvent) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn send_after_link_closed_is_dropped_quietly() {
        let mut client = MidiClient::demo(ClosedSink);
        // The sink refuses the first event, so the demo task ends at once.
        (&mut client._task).await.unwrap();

        assert!(client.command_tx.is_closed());
        client.send(MidiCommand::SystemReset);
    }
}
