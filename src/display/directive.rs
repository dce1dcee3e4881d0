// Display directives published to the renderer

use serde::{Deserialize, Serialize};

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

// On-screen labels (the car's UI is in Spanish)
pub const LABEL_STOP: &str = "STOP";
pub const LABEL_WAITING: &str = "Esperando BT...";
pub const LABEL_CONNECTED: &str = "Conectado!";
pub const LABEL_READY: &str = "LISTO!";
pub const LABEL_DISCONNECTED: &str = "Desconectado!";
pub const LABEL_TEST_TITLE: &str = "Test Pantalla:";
pub const LABEL_TEST_OK: &str = "OLED OK!";
pub const LABEL_GENERAL_SPEED: &str = "Vel. General:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arrow {
    Up,
    Down,
    Left,
    Right,
}

/// Pixel position, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dot {
    pub x: i16,
    pub y: i16,
}

/// Frames of the one-shot connect animation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ConnectFrame {
    /// Dot orbiting the centre above the "connected" label
    Orbit { angle: u16, dot: Dot, label: String },
    /// Progress bar grown to `width` pixels
    Progress { width: i16 },
    /// Centered ready label
    Ready { label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayDirective {
    Clear,
    Arrow { arrow: Arrow },
    /// Small status line
    Text { label: String },
    /// Large centered label
    Banner { label: String },
    /// Centered "STOP"
    Stop { label: String },
    /// Centered general speed value under its caption
    SpeedReadout { caption: String, value: u8 },
    /// Bordered area sprinkled with dots
    TestPattern { title: String, dots: Vec<Dot> },
    /// One frame of the "waiting for Bluetooth" animation
    Waiting { angle: u16, dot: Dot, label: String },
    Connecting { frame: ConnectFrame },
}

impl DisplayDirective {
    pub fn text(label: &str) -> Self {
        Self::Text { label: label.to_string() }
    }

    pub fn banner(label: &str) -> Self {
        Self::Banner { label: label.to_string() }
    }

    pub fn stop() -> Self {
        Self::Stop { label: LABEL_STOP.to_string() }
    }

    pub fn speed_readout(value: u8) -> Self {
        Self::SpeedReadout {
            caption: LABEL_GENERAL_SPEED.to_string(),
            value,
        }
    }
}

/// Point on a circle of `radius` around the screen centre, truncated to pixels
pub fn orbit_dot(angle_deg: u16, radius: i16) -> Dot {
    let rad = f64::from(angle_deg).to_radians();
    let cx = f64::from(SCREEN_WIDTH / 2);
    let cy = f64::from(SCREEN_HEIGHT / 2);
    Dot {
        x: (cx + rad.cos() * f64::from(radius)) as i16,
        y: (cy + rad.sin() * f64::from(radius)) as i16,
    }
}
