use crate::types::{ControlChange, MidiCommand};
use std::collections::VecDeque;

const STATUS_BIT: u8 = 0x80;
const CONTROL_CHANGE: u8 = 0xb0;
/// Bytes at or above this are real-time messages and may appear anywhere.
const REALTIME_FIRST: u8 = 0xf8;
pub const SYSTEM_RESET: u8 = 0xff;

/// What the parser does with data bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunningStatus {
    /// No status seen yet, or the last status was one we skip.
    Skip,
    /// Data bytes belong to control changes on this channel.
    ControlChange(u8),
}

/// Streaming parser that extracts control changes from a raw MIDI byte stream.
///
/// Feed bytes via `push_data`, then drain messages via `next_event`. All other
/// message types, including system exclusive, are skipped.
pub struct MidiParser {
    buffer: VecDeque<u8>,
    status: RunningStatus,
    data: [u8; 2],
    data_len: usize,
}

impl MidiParser {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(256),
            status: RunningStatus::Skip,
            data: [0; 2],
            data_len: 0,
        }
    }

    /// Append received bytes to the internal buffer.
    pub fn push_data(&mut self, data: &[u8]) {
        self.buffer.extend(data);
    }

    /// Extract the next complete control change.
    /// Returns `None` once the buffer holds no complete message.
    pub fn next_event(&mut self) -> Option<ControlChange> {
        while let Some(byte) = self.buffer.pop_front() {
            if byte >= REALTIME_FIRST {
                continue;
            }

            if byte & STATUS_BIT != 0 {
                self.data_len = 0;
                self.status = if byte & 0xf0 == CONTROL_CHANGE {
                    RunningStatus::ControlChange(byte & 0x0f)
                } else {
                    // Channel messages, system common and sysex (through
                    // its 0xf7 terminator) all have data we do not use.
                    RunningStatus::Skip
                };
                continue;
            }

            if let RunningStatus::ControlChange(channel) = self.status {
                self.data[self.data_len] = byte;
                self.data_len += 1;
                if self.data_len == self.data.len() {
                    self.data_len = 0;
                    return Some(ControlChange {
                        channel,
                        controller: self.data[0],
                        value: self.data[1],
                    });
                }
            }
        }

        None
    }
}

impl Default for MidiParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire bytes for an outbound control change.
pub fn control_change_bytes(channel: u8, controller: u8, value: u8) -> [u8; 3] {
    [CONTROL_CHANGE | (channel & 0x0f), controller & 0x7f, value & 0x7f]
}

impl MidiCommand {
    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            MidiCommand::ControlChange {
                channel,
                controller,
                value,
            } => control_change_bytes(channel, controller, value).to_vec(),
            MidiCommand::SystemReset => vec![SYSTEM_RESET],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(parser: &mut MidiParser) -> Vec<ControlChange> {
        std::iter::from_fn(|| parser.next_event()).collect()
    }

    fn cc(channel: u8, controller: u8, value: u8) -> ControlChange {
        ControlChange {
            channel,
            controller,
            value,
        }
    }

    #[test]
    fn parse_single_message() {
        let mut parser = MidiParser::new();
        parser.push_data(&[0xb3, 16, 99]);

        assert_eq!(parser.next_event(), Some(cc(3, 16, 99)));
        assert_eq!(parser.next_event(), None);
    }

    #[test]
    fn parse_fragmented_data() {
        let mut parser = MidiParser::new();

        parser.push_data(&[0xb0, 48]);
        assert_eq!(parser.next_event(), None);

        parser.push_data(&[7]);
        assert_eq!(parser.next_event(), Some(cc(0, 48, 7)));
    }

    #[test]
    fn running_status_reuses_control_change() {
        let mut parser = MidiParser::new();
        parser.push_data(&[0xb0, 16, 1, 48, 2, 17, 3]);

        assert_eq!(drain(&mut parser), vec![cc(0, 16, 1), cc(0, 48, 2), cc(0, 17, 3)]);
    }

    #[test]
    fn realtime_bytes_do_not_break_messages() {
        let mut parser = MidiParser::new();
        parser.push_data(&[0xb0, 0xf8, 16, 0xfe, 5, 48, 0xfa, 6]);

        assert_eq!(drain(&mut parser), vec![cc(0, 16, 5), cc(0, 48, 6)]);
    }

    #[test]
    fn other_messages_are_skipped() {
        let mut parser = MidiParser::new();
        parser.push_data(&[
            0x90, 60, 100, 62, 100, // note on with running status
            0xf0, 0x7d, 0x01, 0x02, 0xf7, // sysex
            0xc0, 5, // program change
            0xb1, 18, 64,
        ]);

        assert_eq!(drain(&mut parser), vec![cc(1, 18, 64)]);
    }

    #[test]
    fn status_byte_discards_partial_message() {
        let mut parser = MidiParser::new();
        parser.push_data(&[0xb0, 16, 0xb0, 17, 9]);

        assert_eq!(drain(&mut parser), vec![cc(0, 17, 9)]);
    }

    #[test]
    fn encode_outbound_commands() {
        assert_eq!(control_change_bytes(0, 123, 0), [0xb0, 123, 0]);
        assert_eq!(control_change_bytes(17, 200, 255), [0xb1, 0x48, 0x7f]);
        assert_eq!(MidiCommand::SystemReset.to_bytes(), vec![0xff]);
        assert_eq!(
            MidiCommand::ControlChange {
                channel: 0,
                controller: 14,
                value: 0
            }
            .to_bytes(),
            vec![0xb0, 14, 0]
        );
    }
}
