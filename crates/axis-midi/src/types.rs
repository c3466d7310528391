/// Controller numbers used on the control link.
pub mod cc {
    /// Recenter ("home") the device orientation.
    pub const RECENTER: u8 = 14;
    /// Ask the device to persist its calibration.
    pub const CALIBRATE_SAVE: u8 = 15;
    /// First most-significant orientation controller (general purpose 1).
    pub const GENERAL_PURPOSE_1: u8 = 16;
    /// First least-significant orientation controller (general purpose 1 LSB).
    pub const GENERAL_PURPOSE_1_LSB: u8 = 48;
    pub const ALL_NOTES_OFF: u8 = 123;
}

/// One quaternion component as carried on the control link.
///
/// Controllers are laid out in w, x, y, z order inside each block while the
/// quaternion itself is stored x, y, z, w.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    W,
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::W, Axis::X, Axis::Y, Axis::Z];

    pub(crate) fn block_offset(self) -> u8 {
        match self {
            Axis::W => 0,
            Axis::X => 1,
            Axis::Y => 2,
            Axis::Z => 3,
        }
    }

    /// Position of this component in (x, y, z, w) storage.
    pub fn storage_index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::W => 3,
        }
    }

    pub fn msb_controller(self) -> u8 {
        cc::GENERAL_PURPOSE_1 + self.block_offset()
    }

    pub fn lsb_controller(self) -> u8 {
        cc::GENERAL_PURPOSE_1_LSB + self.block_offset()
    }
}

/// Role of a recognized controller number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentByte {
    MostSignificant(Axis),
    LeastSignificant(Axis),
}

impl ComponentByte {
    /// Classify a controller number. Anything outside the two blocks is `None`.
    pub fn from_controller(controller: u8) -> Option<Self> {
        Axis::ALL.into_iter().find_map(|axis| {
            if controller == axis.msb_controller() {
                Some(ComponentByte::MostSignificant(axis))
            } else if controller == axis.lsb_controller() {
                Some(ComponentByte::LeastSignificant(axis))
            } else {
                None
            }
        })
    }
}

/// A decoded control-change message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlChange {
    pub channel: u8,
    pub controller: u8,
    pub value: u8,
}

/// Notifications delivered from the transport to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A device is attached and streaming. The view should reset, then show.
    Connected,
    /// The device went away. The view should reset.
    Disconnected,
    ControlChange(ControlChange),
}

/// Commands sent from the view to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiCommand {
    ControlChange {
        channel: u8,
        controller: u8,
        value: u8,
    },
    SystemReset,
}
