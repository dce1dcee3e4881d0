// Duty-cycle mapping for the two DC motors
//
// Each motor is driven through two PWM channels (IN1 = forward, IN2 = backward).
// At most one channel per motor is nonzero.

use serde::{Deserialize, Serialize};

use crate::command::{Direction, MotorDirection, SpeedTarget};
use crate::config::{DEFAULT_GENERAL_SPEED, DEFAULT_MOTOR1_SPEED, DEFAULT_MOTOR2_SPEED};

/// Forward/backward duties for one motor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorChannels {
    pub forward: u8,
    pub backward: u8,
}

impl MotorChannels {
    pub fn new(direction: MotorDirection, duty: u8) -> Self {
        match direction {
            MotorDirection::Forward => Self { forward: duty, backward: 0 },
            MotorDirection::Backward => Self { forward: 0, backward: duty },
            MotorDirection::Stop => Self::stopped(),
        }
    }

    pub fn stopped() -> Self {
        Self::default()
    }

    pub fn is_stopped(&self) -> bool {
        self.forward == 0 && self.backward == 0
    }
}

/// Channel duties for both motors. Motor 1 is the right one, motor 2 the left one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorOutputs {
    pub right: MotorChannels,
    pub left: MotorChannels,
}

impl MotorOutputs {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Duties in pin order: [right IN1, right IN2, left IN1, left IN2]
    pub fn channels(&self) -> [u8; 4] {
        [
            self.right.forward,
            self.right.backward,
            self.left.forward,
            self.left.backward,
        ]
    }
}

/// Configured duties. Only a valid speed command changes them; they reset on restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedConfig {
    pub motor1: u8,
    pub motor2: u8,
    pub general: u8,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            motor1: DEFAULT_MOTOR1_SPEED,
            motor2: DEFAULT_MOTOR2_SPEED,
            general: DEFAULT_GENERAL_SPEED,
        }
    }
}

impl SpeedConfig {
    pub fn set(&mut self, target: SpeedTarget, value: u8) {
        match target {
            SpeedTarget::Motor1 => self.motor1 = value,
            SpeedTarget::Motor2 => self.motor2 = value,
            SpeedTarget::General => self.general = value,
        }
    }
}

/// Apply the right-motor offset to a nonzero duty, clamped to 0-255
pub fn compensate(speed: u8, offset: i16) -> u8 {
    if speed == 0 {
        return 0;
    }
    i16::from(speed).saturating_add(offset).clamp(0, i16::from(u8::MAX)) as u8
}

/// Both motors at the shared general speed. No compensation here, only on F1/B1.
pub fn general_move(direction: Direction, speed: u8) -> MotorOutputs {
    use MotorDirection::{Backward, Forward};

    let (right, left) = match direction {
        Direction::Forward => (Forward, Forward),
        Direction::Backward => (Backward, Backward),
        // Physical left turn: right motor back, left motor forward
        Direction::Left => (Backward, Forward),
        Direction::Right => (Forward, Backward),
        Direction::Stop => return MotorOutputs::zero(),
    };

    MotorOutputs {
        right: MotorChannels::new(right, speed),
        left: MotorChannels::new(left, speed),
    }
}
