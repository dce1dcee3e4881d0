// Stateful motor driver for the FUTBOT car
//
// Owns the speed configuration, the compensation offset and the last
// commanded outputs. Turns commands into new channel duties.

use tracing::{debug, info};

use super::actuation::{compensate, general_move, MotorChannels, MotorOutputs, SpeedConfig};
use crate::command::{Command, MotorDirection, MotorId, SpeedTarget};

pub struct MotorDriver {
    speeds: SpeedConfig,
    compensation: i16, // right motor only, fixed after construction
    outputs: MotorOutputs,
}

impl MotorDriver {
    pub fn new(compensation: i16) -> Self {
        Self::with_speeds(SpeedConfig::default(), compensation)
    }

    pub fn with_speeds(speeds: SpeedConfig, compensation: i16) -> Self {
        Self {
            speeds,
            compensation,
            outputs: MotorOutputs::zero(),
        }
    }

    /// Apply a command. Returns the new outputs if the motor channels were written.
    ///
    /// Speed commands only change the configuration; they take effect on the
    /// next move.
    pub fn apply(&mut self, command: &Command) -> Option<MotorOutputs> {
        match *command {
            Command::SetSpeed { target, value } => {
                self.speeds.set(target, value);
                match target {
                    SpeedTarget::Motor1 => info!("Motor 1 (right) speed: {}", value),
                    SpeedTarget::Motor2 => info!("Motor 2 (left) speed: {}", value),
                    SpeedTarget::General => info!("General speed: {}", value),
                }
                None
            }
            Command::MotorMove { motor, direction } => {
                self.drive_motor(motor, direction);
                Some(self.outputs)
            }
            Command::GeneralMove(direction) => {
                self.outputs = general_move(direction, self.speeds.general);
                debug!("General move {:?}: {:?}", direction, self.outputs.channels());
                Some(self.outputs)
            }
            Command::DisplayTest | Command::Unknown(_) => None,
        }
    }

    /// Zero all four channels
    pub fn stop(&mut self) -> MotorOutputs {
        self.outputs = MotorOutputs::zero();
        self.outputs
    }

    fn drive_motor(&mut self, motor: MotorId, direction: MotorDirection) {
        match motor {
            MotorId::Motor1 => {
                let duty = compensate(self.speeds.motor1, self.compensation);
                self.outputs.right = MotorChannels::new(direction, duty);
            }
            MotorId::Motor2 => {
                self.outputs.left = MotorChannels::new(direction, self.speeds.motor2);
            }
        }
        debug!(
            "Motor {:?} {:?}: {:?}",
            motor,
            direction,
            self.outputs.channels()
        );
    }

    pub fn speeds(&self) -> SpeedConfig {
        self.speeds
    }

    pub fn outputs(&self) -> MotorOutputs {
        self.outputs
    }

    pub fn compensation(&self) -> i16 {
        self.compensation
    }
}
