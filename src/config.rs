// Timeouts, topics, speeds, display timings
use std::time::Duration;

// Runtime loop frequency
pub const LOOP_HZ: u64 = 250;

// Watchdog: stop the car if no line arrives within this window while connected
pub const COMMAND_TIMEOUT: Duration = Duration::from_millis(700);

// Speeds at power-up (0-255 duty)
pub const DEFAULT_MOTOR1_SPEED: u8 = 250; // right motor, F1/B1
pub const DEFAULT_MOTOR2_SPEED: u8 = 250; // left motor, F2/B2
pub const DEFAULT_GENERAL_SPEED: u8 = 250; // U/D/L/R

// Added to the right motor's duty on individual commands.
// Positive if the right motor is slower than the left one, negative if faster.
pub const DEFAULT_COMPENSATION: i16 = 0;

// Zenoh topics
pub const TOPIC_CMD: &str = "futbot/cmd"; // protocol lines from a remote driver
pub const TOPIC_LINK: &str = "futbot/link/**"; // liveliness of remote drivers
pub const TOPIC_RT_MOTORS: &str = "futbot/rt/motors"; // motor channel duties
pub const TOPIC_RT_DISPLAY: &str = "futbot/rt/display"; // display directives
pub const TOPIC_HEALTH: &str = "futbot/state/health"; // link + speed status

// Serial link (Bluetooth SPP shows up as an rfcomm device)
pub const SERIAL_PORT: &str = "/dev/rfcomm0";
pub const SERIAL_BAUDRATE: u32 = 115_200;
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(1);
pub const MAX_LINE_LEN: usize = 64;

// OLED geometry
pub const SCREEN_WIDTH: i16 = 128;
pub const SCREEN_HEIGHT: i16 = 64;

// Waiting animation: dot orbit while no driver is connected
pub const WAITING_STEP_DEG: u16 = 12;
pub const WAITING_FRAME: Duration = Duration::from_millis(40);

// Connect animation
pub const CONNECT_ORBIT_STEP_DEG: u16 = 25;
pub const CONNECT_ORBIT_RADIUS: i16 = 20;
pub const CONNECT_ORBIT_FRAME: Duration = Duration::from_millis(25);
pub const CONNECT_BAR_STEP: i16 = 5;
pub const CONNECT_BAR_FRAME: Duration = Duration::from_millis(8);
pub const CONNECT_READY_HOLD: Duration = Duration::from_millis(500);

// Display self-test
pub const TEST_PATTERN_DOTS: usize = 60;
pub const TEST_PATTERN_HOLD: Duration = Duration::from_millis(1000);
pub const TEST_CONFIRM_HOLD: Duration = Duration::from_millis(800);

// Disconnect label
pub const DISCONNECT_HOLD: Duration = Duration::from_millis(1000);

/// Command-line overrides, fixed for the lifetime of the process
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "futbot-runtime", about = "FUTBOT car command runtime")]
pub struct Args {
    /// Where protocol lines come from
    #[arg(long, value_enum, default_value_t = TransportKind::Serial)]
    pub transport: TransportKind,

    /// Serial device of the Bluetooth link
    #[arg(long, default_value = SERIAL_PORT)]
    pub port: String,

    #[arg(long, default_value_t = SERIAL_BAUDRATE)]
    pub baud: u32,

    /// Right motor duty offset for F1/B1
    #[arg(long, default_value_t = DEFAULT_COMPENSATION, allow_hyphen_values = true)]
    pub compensation: i16,

    /// Stop the car after this many milliseconds without a line
    #[arg(long, default_value_t = COMMAND_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TransportKind {
    Serial,
    Zenoh,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["futbot-runtime"]);
        assert_eq!(args.transport, TransportKind::Serial);
        assert_eq!(args.port, SERIAL_PORT);
        assert_eq!(args.compensation, DEFAULT_COMPENSATION);
        assert_eq!(args.timeout_ms, 700);
    }

    #[test]
    fn test_args_negative_compensation() {
        let args = Args::parse_from(["futbot-runtime", "--transport", "zenoh", "--compensation", "-8"]);
        assert_eq!(args.transport, TransportKind::Zenoh);
        assert_eq!(args.compensation, -8);
    }
}
