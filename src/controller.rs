// Connection watchdog and command dispatch
//
// Note: the controller is stepped once per loop tick with the current time.
// It never sleeps; timed screens are sequences that keep the controller busy
// (no lines read, no motor updates) until their last frame expires.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::command::Command;
use crate::config::{COMMAND_TIMEOUT, DEFAULT_COMPENSATION};
use crate::display::{DisplayDirective, LinkEvent, Presenter, SequenceKind, Step};
use crate::messages::{LinkState, RuntimeStatus};
use crate::motor::{MotorDriver, MotorOutputs, SpeedConfig};
use crate::transport::Transport;

#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    pub speeds: SpeedConfig,
    pub compensation: i16,
    pub command_timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            speeds: SpeedConfig::default(),
            compensation: DEFAULT_COMPENSATION,
            command_timeout: COMMAND_TIMEOUT,
        }
    }
}

/// What one tick asks the outside world to do
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tick {
    /// New channel duties, if the motors were written
    pub motors: Option<MotorOutputs>,
    /// New screen, if it changed
    pub display: Option<DisplayDirective>,
}

pub struct Controller {
    motors: MotorDriver,
    presenter: Presenter,
    connected: bool,        // raw transport fact from the last tick
    connected_before: bool, // latch for one-time transition actions
    last_input: Instant,
    command_timeout: Duration,
    idle_stop: bool,
}

impl Controller {
    pub fn new(config: ControllerConfig, now: Instant) -> Self {
        Self::with_presenter(config, Presenter::new(), now)
    }

    pub fn with_presenter(config: ControllerConfig, presenter: Presenter, now: Instant) -> Self {
        Self {
            motors: MotorDriver::with_speeds(config.speeds, config.compensation),
            presenter,
            connected: false,
            connected_before: false,
            last_input: now,
            command_timeout: config.command_timeout,
            idle_stop: false,
        }
    }

    /// Run one loop iteration
    pub fn tick(&mut self, now: Instant, transport: &mut dyn Transport) -> Tick {
        let mut tick = Tick::default();

        if let Some(step) = self.presenter.advance(now) {
            match step {
                Step::Hold => return tick,
                Step::Show(directive) => {
                    tick.display = Some(directive);
                    return tick;
                }
                // The idle window starts once the car is ready to drive
                Step::Done(SequenceKind::Connect) => self.last_input = now,
                Step::Done(_) => {}
            }
        }

        self.connected = transport.is_connected();
        if self.connected {
            if !self.connected_before {
                self.on_connected(now, &mut tick);
            } else if let Some(line) = transport.next_line() {
                self.on_line(&line, now, &mut tick);
            } else if now.duration_since(self.last_input) > self.command_timeout {
                self.on_idle_timeout(now, &mut tick);
            }
        } else if self.connected_before {
            self.on_disconnected(now, &mut tick);
        } else {
            tick.display = self.presenter.present_link(LinkEvent::Connecting, now);
        }

        tick
    }

    fn on_connected(&mut self, now: Instant, tick: &mut Tick) {
        info!("Driver connected");
        self.connected_before = true;
        self.last_input = now;
        tick.display = self.presenter.present_link(LinkEvent::Connected, now);
    }

    fn on_disconnected(&mut self, now: Instant, tick: &mut Tick) {
        warn!("Driver disconnected, stopping motors");
        self.connected_before = false;
        self.idle_stop = false;
        tick.motors = Some(self.motors.stop());
        tick.display = self.presenter.present_link(LinkEvent::Disconnected, now);
    }

    fn on_line(&mut self, raw: &str, now: Instant, tick: &mut Tick) {
        self.last_input = now;
        self.idle_stop = false;

        let line = raw.trim();
        if line.is_empty() {
            return;
        }
        info!("RX: {}", line);

        match line.parse::<Command>() {
            Ok(Command::Unknown(text)) => warn!("Unknown command: {}", text),
            Ok(command) => self.dispatch(&command, now, tick),
            Err(e) => warn!("{}", e),
        }
    }

    fn on_idle_timeout(&mut self, now: Instant, tick: &mut Tick) {
        warn!(
            "No command for {}ms, stopping",
            self.command_timeout.as_millis()
        );
        self.dispatch(&Command::STOP, now, tick);
        // Re-arm so the stop is issued once per timeout window, not every tick
        self.last_input = now;
        self.idle_stop = true;
    }

    fn dispatch(&mut self, command: &Command, now: Instant, tick: &mut Tick) {
        tick.motors = self.motors.apply(command);
        tick.display = self.presenter.present(command, now);
    }

    pub fn link(&self) -> LinkState {
        if self.connected_before {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        }
    }

    /// Raw transport fact from the last tick that polled it
    pub fn transport_connected(&self) -> bool {
        self.connected
    }

    /// True while a timed screen holds the loop
    pub fn is_busy(&self) -> bool {
        self.presenter.is_busy()
    }

    pub fn outputs(&self) -> MotorOutputs {
        self.motors.outputs()
    }

    pub fn status(&self) -> RuntimeStatus {
        RuntimeStatus {
            link: self.link(),
            speeds: self.motors.speeds(),
            compensation: self.motors.compensation(),
            idle_stop: self.idle_stop,
        }
    }
}
