// Keyboard teleop over zenoh: WASD/arrows move, space stops, 1-3 speed, X screen test, Q quit
//
// Usage: cargo run --example teleop
// Start the runtime with `--transport zenoh`. The car counts as connected
// while this program holds its liveliness token.

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::{Duration, Instant};
use tracing::info;

const TOPIC_CMD: &str = "futbot/cmd";
const LINK_TOKEN: &str = "futbot/link/teleop";
const SPEEDS: [&str; 3] = ["CG085", "CG170", "CG255"];
// Longer than the terminal's initial key-repeat delay, so a held key never looks released
const INPUT_TIMEOUT_MS: u64 = 650;
// Re-send the held move well inside the car's 700ms watchdog
const REPUBLISH_MS: u64 = 100;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(TOPIC_CMD).await?;
    let _token = session.liveliness().declare_token(LINK_TOKEN).await?;

    info!("Controls: WASD/arrows=move, space=stop, 1-3=speed, X=screen test, Q=quit");

    enable_raw_mode()?;
    let result = run_teleop(&publisher).await;
    disable_raw_mode()?;

    result
}

async fn run_teleop(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut last_movement_input: Option<Instant> = None;
    let mut held: Option<&str> = None;
    let mut last_publish = Instant::now();

    loop {
        // Poll for key with 20ms timeout
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;
                if !pressed {
                    continue;
                }

                let line = match code {
                    KeyCode::Char('w') | KeyCode::Up => Some("U"),
                    KeyCode::Char('s') | KeyCode::Down => Some("D"),
                    KeyCode::Char('a') | KeyCode::Left => Some("L"),
                    KeyCode::Char('d') | KeyCode::Right => Some("R"),
                    KeyCode::Char(' ') => Some("S"),
                    KeyCode::Char('x') => Some("X"),
                    KeyCode::Char(c @ '1'..='3') => {
                        let idx = c as usize - '1' as usize;
                        info!("Speed: {}", &SPEEDS[idx][2..]);
                        Some(SPEEDS[idx])
                    }
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    _ => None,
                };

                // Auto-repeat of the held key is covered by the periodic re-send below
                let repeat = line.is_some() && line == held;
                if let Some(line) = line.filter(|_| !repeat) {
                    if matches!(line, "U" | "D" | "L" | "R") {
                        held = Some(line);
                    } else if line == "S" {
                        last_movement_input = None;
                        held = None;
                    }
                    publisher.put(line.to_string()).await?;
                    last_publish = Instant::now();
                }
                if held.is_some() && line == held {
                    last_movement_input = Some(Instant::now());
                }
            }
        }

        // Key released: stop instead of waiting for the car's watchdog
        if last_movement_input
            .is_some_and(|at| at.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS))
        {
            last_movement_input = None;
            held = None;
            publisher.put("S".to_string()).await?;
            last_publish = Instant::now();
        }

        // Keep the car moving while a key is held
        if let Some(line) = held {
            if last_publish.elapsed() >= Duration::from_millis(REPUBLISH_MS) {
                publisher.put(line.to_string()).await?;
                last_publish = Instant::now();
            }
        }
    }

    publisher.put("S".to_string()).await?;
    Ok(())
}
