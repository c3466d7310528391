pub mod controller;
pub mod input;

use axis_midi::types::MidiCommand;
use axis_midi::MidiClient;

pub use controller::ViewController;
pub use input::ViewAction;

/// Outbound half of the control link. Fire-and-forget.
pub trait CommandSink {
    fn send(&self, command: MidiCommand);
}

impl CommandSink for MidiClient {
    fn send(&self, command: MidiCommand) {
        MidiClient::send(self, command);
    }
}

/// User-visible error display, used only when the renderer cannot be set up.
pub trait ErrorSurface {
    fn error(&mut self, message: &str);
}
