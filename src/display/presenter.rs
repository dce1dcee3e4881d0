// Command / link event -> display directive

use std::time::Instant;

use nanorand::WyRand;

use super::directive::{orbit_dot, Arrow, DisplayDirective, LABEL_WAITING};
use super::sequence::{
    connect_frames, display_test_frames, disconnect_frames, Frame, Sequence, SequenceKind, Step,
};
use crate::command::{Command, Direction, MotorDirection, MotorId, SpeedTarget};
use crate::config::{SCREEN_HEIGHT, WAITING_FRAME, WAITING_STEP_DEG};

/// Connection lifecycle events that have their own screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// Still waiting for a driver; one animation frame per call
    Connecting,
    Connected,
    Disconnected,
}

pub struct Presenter {
    waiting_angle: u16,
    next_waiting_frame: Option<Instant>,
    sequence: Option<Sequence>,
    rng: WyRand,
}

impl Presenter {
    pub fn new() -> Self {
        Self::with_rng(WyRand::new())
    }

    /// Use a seeded generator for a reproducible test pattern
    pub fn with_rng(rng: WyRand) -> Self {
        Self {
            waiting_angle: 0,
            next_waiting_frame: None,
            sequence: None,
            rng,
        }
    }

    /// Directive for a decoded command, `None` if the screen stays as it is.
    ///
    /// General moves are drawn mirrored: `U` shows a down arrow, `D` an up
    /// arrow, `R` a left arrow and `L` a right arrow.
    pub fn present(&mut self, command: &Command, now: Instant) -> Option<DisplayDirective> {
        match command {
            Command::GeneralMove(direction) => {
                let arrow = match direction {
                    Direction::Forward => Arrow::Down,
                    Direction::Backward => Arrow::Up,
                    Direction::Left => Arrow::Right,
                    Direction::Right => Arrow::Left,
                    Direction::Stop => return Some(DisplayDirective::stop()),
                };
                Some(DisplayDirective::Arrow { arrow })
            }
            Command::MotorMove { motor, direction } => {
                Some(DisplayDirective::text(motor_label(*motor, *direction)))
            }
            Command::SetSpeed {
                target: SpeedTarget::General,
                value,
            } => Some(DisplayDirective::speed_readout(*value)),
            Command::SetSpeed { .. } | Command::Unknown(_) => None,
            Command::DisplayTest => {
                let frames = display_test_frames(&mut self.rng);
                self.start(SequenceKind::DisplayTest, frames, now)
            }
        }
    }

    /// Directive for a link event. `Connecting` is rate limited and returns
    /// `None` between animation frames.
    pub fn present_link(&mut self, event: LinkEvent, now: Instant) -> Option<DisplayDirective> {
        match event {
            LinkEvent::Connecting => self.waiting_frame(now),
            LinkEvent::Connected => {
                self.next_waiting_frame = None;
                self.start(SequenceKind::Connect, connect_frames(), now)
            }
            LinkEvent::Disconnected => self.start(SequenceKind::Disconnect, disconnect_frames(), now),
        }
    }

    /// Step the running sequence, if any
    pub fn advance(&mut self, now: Instant) -> Option<Step> {
        let step = self.sequence.as_mut()?.advance(now);
        if matches!(step, Step::Done(_)) {
            self.sequence = None;
        }
        Some(step)
    }

    /// True while a one-shot sequence owns the screen
    pub fn is_busy(&self) -> bool {
        self.sequence.is_some()
    }

    pub fn waiting_angle(&self) -> u16 {
        self.waiting_angle
    }

    fn start(&mut self, kind: SequenceKind, frames: Vec<Frame>, now: Instant) -> Option<DisplayDirective> {
        let (sequence, first) = Sequence::start(kind, frames, now);
        self.sequence = Some(sequence);
        first
    }

    fn waiting_frame(&mut self, now: Instant) -> Option<DisplayDirective> {
        if self.next_waiting_frame.is_some_and(|at| now < at) {
            return None;
        }
        let angle = self.waiting_angle;
        self.waiting_angle = (angle + WAITING_STEP_DEG) % 360;
        self.next_waiting_frame = Some(now + WAITING_FRAME);

        Some(DisplayDirective::Waiting {
            angle,
            dot: orbit_dot(angle, SCREEN_HEIGHT / 2 - 12),
            label: LABEL_WAITING.to_string(),
        })
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

fn motor_label(motor: MotorId, direction: MotorDirection) -> &'static str {
    match (motor, direction) {
        (MotorId::Motor1, MotorDirection::Forward) => "Motor DER: Adelante",
        (MotorId::Motor1, MotorDirection::Backward) => "Motor DER: Atras",
        (MotorId::Motor1, MotorDirection::Stop) => "Motor DER: STOP",
        (MotorId::Motor2, MotorDirection::Forward) => "Motor IZQ: Adelante",
        (MotorId::Motor2, MotorDirection::Backward) => "Motor IZQ: Atras",
        (MotorId::Motor2, MotorDirection::Stop) => "Motor IZQ: STOP",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::ConnectFrame;
    use std::time::Duration;

    fn presenter() -> Presenter {
        Presenter::with_rng(WyRand::new_seed(1))
    }

    #[test]
    fn test_general_moves_draw_mirrored_arrows() {
        let mut p = presenter();
        let now = Instant::now();
        let cases = [
            (Direction::Forward, Arrow::Down),
            (Direction::Backward, Arrow::Up),
            (Direction::Right, Arrow::Left),
            (Direction::Left, Arrow::Right),
        ];
        for (direction, arrow) in cases {
            assert_eq!(
                p.present(&Command::GeneralMove(direction), now),
                Some(DisplayDirective::Arrow { arrow }),
                "{:?}",
                direction
            );
        }
    }

    #[test]
    fn test_stop_label() {
        let mut p = presenter();
        let now = Instant::now();
        for _ in 0..3 {
            assert_eq!(p.present(&Command::STOP, now), Some(DisplayDirective::stop()));
        }
    }

    #[test]
    fn test_motor_labels() {
        let mut p = presenter();
        let cmd = Command::MotorMove {
            motor: MotorId::Motor2,
            direction: MotorDirection::Backward,
        };
        assert_eq!(
            p.present(&cmd, Instant::now()),
            Some(DisplayDirective::text("Motor IZQ: Atras"))
        );
        let cmd = Command::MotorMove {
            motor: MotorId::Motor1,
            direction: MotorDirection::Stop,
        };
        assert_eq!(
            p.present(&cmd, Instant::now()),
            Some(DisplayDirective::text("Motor DER: STOP"))
        );
    }

    #[test]
    fn test_only_general_speed_is_shown() {
        let mut p = presenter();
        let now = Instant::now();
        let general = Command::SetSpeed { target: SpeedTarget::General, value: 128 };
        assert_eq!(p.present(&general, now), Some(DisplayDirective::speed_readout(128)));

        let motor1 = Command::SetSpeed { target: SpeedTarget::Motor1, value: 128 };
        assert_eq!(p.present(&motor1, now), None);
        assert_eq!(p.present(&Command::Unknown("?".into()), now), None);
    }

    #[test]
    fn test_display_test_is_a_sequence() {
        let mut p = presenter();
        let t0 = Instant::now();
        let first = p.present(&Command::DisplayTest, t0);
        assert!(matches!(first, Some(DisplayDirective::TestPattern { .. })));
        assert!(p.is_busy());

        assert_eq!(p.advance(t0 + Duration::from_millis(500)), Some(Step::Hold));
        let t1 = t0 + Duration::from_millis(1000);
        assert_eq!(
            p.advance(t1),
            Some(Step::Show(DisplayDirective::banner("OLED OK!")))
        );
        let t2 = t1 + Duration::from_millis(800);
        assert_eq!(p.advance(t2), Some(Step::Show(DisplayDirective::Clear)));
        assert_eq!(p.advance(t2), Some(Step::Done(SequenceKind::DisplayTest)));
        assert!(!p.is_busy());
        assert_eq!(p.advance(t2), None);
    }

    #[test]
    fn test_waiting_animation_paced() {
        let mut p = presenter();
        let t0 = Instant::now();

        let first = p.present_link(LinkEvent::Connecting, t0);
        assert!(matches!(first, Some(DisplayDirective::Waiting { angle: 0, .. })));
        assert_eq!(p.present_link(LinkEvent::Connecting, t0 + Duration::from_millis(20)), None);

        let second = p.present_link(LinkEvent::Connecting, t0 + Duration::from_millis(40));
        assert!(matches!(second, Some(DisplayDirective::Waiting { angle: 12, .. })));
    }

    #[test]
    fn test_waiting_angle_wraps() {
        let mut p = presenter();
        let mut now = Instant::now();
        for _ in 0..30 {
            p.present_link(LinkEvent::Connecting, now);
            now += WAITING_FRAME;
        }
        assert_eq!(p.waiting_angle(), 0);
    }

    #[test]
    fn test_connect_starts_with_orbit() {
        let mut p = presenter();
        let first = p.present_link(LinkEvent::Connected, Instant::now());
        assert!(matches!(
            first,
            Some(DisplayDirective::Connecting {
                frame: ConnectFrame::Orbit { angle: 0, .. }
            })
        ));
        assert!(p.is_busy());
    }
}
