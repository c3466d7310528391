use winit::keyboard::KeyCode;

/// User actions on the orientation view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    /// Reset the device and return the local orientation to identity.
    ResetOrientation,
    /// Ask the device to take its current pose as home.
    Recenter,
    /// Ask the device to persist its calibration.
    CalibrateSave,
    /// Flip the render-only invert flag.
    ToggleInvert,
}

impl ViewAction {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyR => Some(ViewAction::ResetOrientation),
            KeyCode::KeyH => Some(ViewAction::Recenter),
            KeyCode::KeyS => Some(ViewAction::CalibrateSave),
            KeyCode::KeyI => Some(ViewAction::ToggleInvert),
            _ => None,
        }
    }
}
