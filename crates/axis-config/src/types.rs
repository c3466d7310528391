use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Window geometry.
    pub window: WindowConfig,
    /// Control link settings.
    pub midi: MidiConfig,
    /// Local view preferences.
    pub view: ViewConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Inner width in physical pixels.
    pub width: u32,
    /// Inner height in physical pixels.
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            title: "Axis".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiConfig {
    /// Serial device carrying the MIDI byte stream.
    /// `None` runs the built-in demo source instead of a device.
    pub port: Option<String>,
    /// Line rate. 31250 is the MIDI DIN rate; USB serial bridges ignore it.
    pub baud_rate: u32,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: 31250,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Render the conjugate orientation. Never sent to the device.
    pub invert: bool,
}
