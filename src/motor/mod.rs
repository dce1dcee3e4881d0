// Motor control for the FUTBOT two-motor car
//
// Provides:
// - Command -> per-motor channel duties (with right-motor compensation)
// - A stateful driver that owns the speed configuration and last outputs

mod actuation;
mod driver;

pub use actuation::{compensate, general_move, MotorChannels, MotorOutputs, SpeedConfig};
pub use driver::MotorDriver;
