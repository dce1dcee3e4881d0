// Line -> Command decoding
//
// The first character selects the command family; each family then checks
// its own length and fields. Trimming and empty-line rejection happen before
// a line gets here.

use std::str::FromStr;

use super::{Command, Direction, MotorDirection, MotorId, SpeedTarget};

/// Length of a complete speed command: C + target + 3 digits
const SPEED_CMD_LEN: usize = 5;

/// Why a line was rejected. None of these are fatal: the caller logs and drops the line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Incomplete command {line:?}: expected {expected} characters")]
    Incomplete { line: String, expected: usize },

    #[error("Malformed command {line:?}: {reason}")]
    Malformed { line: String, reason: &'static str },

    #[error("Speed {value} out of range (0-255), keeping current speed")]
    OutOfRange { value: u16 },
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let bytes = line.as_bytes();
        let Some(&first) = bytes.first() else {
            return Ok(Command::Unknown(String::new()));
        };

        match first {
            b'C' => parse_speed(line),
            b'F' | b'B' | b'S' => parse_motor_move(line),
            // Single-letter commands: anything after the letter is ignored
            b'U' => Ok(Command::GeneralMove(Direction::Forward)),
            b'D' => Ok(Command::GeneralMove(Direction::Backward)),
            b'L' => Ok(Command::GeneralMove(Direction::Left)),
            b'R' => Ok(Command::GeneralMove(Direction::Right)),
            b'X' => Ok(Command::DisplayTest),
            _ => Ok(Command::Unknown(line.to_string())),
        }
    }
}

/// `C<T><DDD>`: the three digits sit at fixed offset 2..5, extra characters are ignored
fn parse_speed(line: &str) -> Result<Command, ParseError> {
    let bytes = line.as_bytes();
    if bytes.len() < SPEED_CMD_LEN {
        return Err(ParseError::Incomplete {
            line: line.to_string(),
            expected: SPEED_CMD_LEN,
        });
    }

    let target = match bytes[1] {
        b'1' => SpeedTarget::Motor1,
        b'2' => SpeedTarget::Motor2,
        b'G' => SpeedTarget::General,
        _ => {
            return Err(ParseError::Malformed {
                line: line.to_string(),
                reason: "speed target must be 1, 2 or G",
            });
        }
    };

    let digits = &bytes[2..SPEED_CMD_LEN];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(ParseError::Malformed {
            line: line.to_string(),
            reason: "speed must be three decimal digits",
        });
    }
    let value = digits
        .iter()
        .fold(0u16, |acc, &d| acc * 10 + u16::from(d - b'0'));

    let value = u8::try_from(value).map_err(|_| ParseError::OutOfRange { value })?;
    Ok(Command::SetSpeed { target, value })
}

/// `F<N>` / `B<N>` / `S<N>` for a single motor, or a bare `S` for a general stop
fn parse_motor_move(line: &str) -> Result<Command, ParseError> {
    let bytes = line.as_bytes();
    match bytes {
        [b'S'] => Ok(Command::GeneralMove(Direction::Stop)),
        [action, motor] => {
            let motor = match motor {
                b'1' => MotorId::Motor1,
                b'2' => MotorId::Motor2,
                _ => {
                    return Err(ParseError::Malformed {
                        line: line.to_string(),
                        reason: "motor must be 1 or 2",
                    });
                }
            };
            let direction = match action {
                b'F' => MotorDirection::Forward,
                b'B' => MotorDirection::Backward,
                _ => MotorDirection::Stop,
            };
            Ok(Command::MotorMove { motor, direction })
        }
        _ => Err(ParseError::Malformed {
            line: line.to_string(),
            reason: "expected F1, B1, S1, F2, B2, S2 or S",
        }),
    }
}
