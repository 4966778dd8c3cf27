// ── Operator actions ──
//
// All actuation flows through one `Command` enum. The store routes each
// variant to the right dialect call and broadcasts the outcome as an
// `ActionResult`, which is what the dashboard's status line renders.

use std::fmt;

use shellfly_api::ComponentKey;

/// An operator-initiated device action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Toggle a switch/light/rgb/rgbw component.
    Toggle { key: ComponentKey },
    TurnOn { key: ComponentKey },
    TurnOff { key: ComponentKey },

    // ── Cover motion ─────────────────────────────────────────────────
    OpenCover { id: u32, duration: Option<f64> },
    CloseCover { id: u32, duration: Option<f64> },
    StopCover { id: u32 },
    /// Drive a cover to an absolute position, 0–100.
    SetPosition { id: u32, pos: u8 },

    // ── Light tuning ─────────────────────────────────────────────────
    SetBrightness { key: ComponentKey, brightness: u8 },
    SetColor { key: ComponentKey, rgb: [u8; 3] },
    SetWhite { id: u32, white: u8 },

    // ── Thermostat ───────────────────────────────────────────────────
    SetThermostatTarget { id: u32, target_c: f64 },

    // ── Device-level ─────────────────────────────────────────────────
    Reboot { delay_ms: i64 },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggle { key } => write!(f, "toggle {key}"),
            Self::TurnOn { key } => write!(f, "turn on {key}"),
            Self::TurnOff { key } => write!(f, "turn off {key}"),
            Self::OpenCover { id, .. } => write!(f, "open cover:{id}"),
            Self::CloseCover { id, .. } => write!(f, "close cover:{id}"),
            Self::StopCover { id } => write!(f, "stop cover:{id}"),
            Self::SetPosition { id, pos } => write!(f, "set cover:{id} position to {pos}%"),
            Self::SetBrightness { key, brightness } => {
                write!(f, "set {key} brightness to {brightness}%")
            }
            Self::SetColor { key, rgb } => {
                write!(f, "set {key} color to {},{},{}", rgb[0], rgb[1], rgb[2])
            }
            Self::SetWhite { id, white } => write!(f, "set rgbw:{id} white to {white}%"),
            Self::SetThermostatTarget { id, target_c } => {
                write!(f, "set thermostat:{id} target to {target_c}\u{b0}C")
            }
            Self::Reboot { .. } => write!(f, "reboot"),
        }
    }
}

/// Outcome of one command, broadcast to subscribers.
#[derive(Debug, Clone)]
pub struct ActionResult {
    /// The registered device name the command addressed.
    pub device: String,
    pub action: Command,
    /// `None` on success; the rendered error otherwise.
    pub error: Option<String>,
}

impl ActionResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
