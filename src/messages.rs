// Message types published by the runtime

use serde::{Deserialize, Serialize};

use crate::motor::SpeedConfig;

/// Link state as seen by the watchdog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    Disconnected,
    Connected,
}

/// Health status published every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeStatus {
    pub link: LinkState,
    pub speeds: SpeedConfig,
    pub compensation: i16,
    /// True while the watchdog holds the car stopped for lack of input
    pub idle_stop: bool,
}
