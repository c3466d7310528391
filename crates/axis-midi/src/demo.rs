//! Synthetic device used when no control link is configured.
//!
//! Streams a slowly tumbling unit quaternion as MSB/LSB control-change pairs,
//! the same shape of traffic a real sensor produces.

use crate::decoder::encode_component;
use crate::types::{cc, Axis, ControlChange, DeviceEvent, MidiCommand};
use crate::EventSink;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Orientation of the demo device `t` seconds after its last recenter.
pub fn demo_orientation(t: f32) -> [f32; 4] {
    let axis = [(0.3 * t).sin(), (0.2 * t).cos(), 0.5];
    let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
    let half = 0.35 * t;
    let s = half.sin() / len;
    [axis[0] * s, axis[1] * s, axis[2] * s, half.cos()]
}

/// Control changes that transmit `q` (x, y, z, w storage order).
pub fn quaternion_messages(channel: u8, q: [f32; 4]) -> Vec<ControlChange> {
    Axis::ALL
        .into_iter()
        .flat_map(|axis| {
            let (msb, lsb) = encode_component(q[axis.storage_index()]);
            [
                ControlChange {
                    channel,
                    controller: axis.msb_controller(),
                    value: msb,
                },
                ControlChange {
                    channel,
                    controller: axis.lsb_controller(),
                    value: lsb,
                },
            ]
        })
        .collect()
}

pub(crate) async fn demo_loop<S: EventSink>(
    sink: S,
    mut command_rx: mpsc::UnboundedReceiver<MidiCommand>,
) {
    if !sink.deliver(DeviceEvent::Connected) {
        return;
    }

    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    let mut origin = Instant::now();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let q = demo_orientation(origin.elapsed().as_secs_f32());
                for message in quaternion_messages(0, q) {
                    if !sink.deliver(DeviceEvent::ControlChange(message)) {
                        tracing::debug!("Event sink closed, stopping demo source");
                        return;
                    }
                }
            }
            Some(cmd) = command_rx.recv() => {
                match cmd {
                    MidiCommand::SystemReset
                    | MidiCommand::ControlChange { controller: cc::RECENTER, .. } => {
                        origin = Instant::now();
                        tracing::info!(?cmd, "Demo source recentered");
                    }
                    _ => tracing::debug!(?cmd, "Demo source ignoring command"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::ComponentDecoder;

    #[test]
    fn demo_starts_at_identity() {
        assert_eq!(demo_orientation(0.0), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn demo_orientation_is_unit() {
        for t in [0.5, 3.0, 17.25, 120.0] {
            let q = demo_orientation(t);
            let norm = q.iter().map(|c| c * c).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5, "t={t} norm={norm}");
        }
    }

    #[test]
    fn messages_decode_back_to_quaternion() {
        let q = demo_orientation(4.2);
        let mut decoder = ComponentDecoder::new();
        for m in quaternion_messages(0, q) {
            let _ = decoder.apply(m.controller, m.value);
        }

        let decoded = decoder.orientation().quaternion;
        for (a, b) in decoded.iter().zip(q.iter()) {
            // One 14-bit step spans 2/16383.
            assert!((a - b).abs() <= 1.0 / 16383.0 + 1e-6);
        }
    }

    #[test]
    fn each_most_significant_precedes_its_least_significant() {
        let messages = quaternion_messages(2, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(messages.len(), 8);
        for pair in messages.chunks(2) {
            assert_eq!(pair[0].controller + 32, pair[1].controller);
            assert_eq!(pair[0].channel, 2);
        }
    }
}
