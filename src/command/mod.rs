// Command protocol for the FUTBOT car
//
// One ASCII command per line, case-sensitive:
// - C1DDD / C2DDD / CGDDD: set right / left / general speed (000-255)
// - F1 B1 S1 / F2 B2 S2: drive or stop a single motor at its own speed
// - U D L R: general move at the general speed, S: stop both motors
// - X: display self-test

mod parser;

pub use parser::ParseError;

/// Which speed setting a `C` command writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedTarget {
    Motor1,
    Motor2,
    General,
}

/// Individually addressable motors. Motor 1 is the right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorId {
    Motor1,
    Motor2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorDirection {
    Forward,
    Backward,
    Stop,
}

/// Coordinated move of both motors, named from the driver's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Stop,
}

/// A decoded protocol line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetSpeed { target: SpeedTarget, value: u8 },
    MotorMove { motor: MotorId, direction: MotorDirection },
    GeneralMove(Direction),
    DisplayTest,
    Unknown(String),
}

impl Command {
    /// The stop the watchdog issues on timeout and on disconnect
    pub const STOP: Command = Command::GeneralMove(Direction::Stop);
}
